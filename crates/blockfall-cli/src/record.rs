use std::path::{Path, PathBuf};

use blockfall_engine::{PlayerName, ScoreRecord, ScoreStore, ScoreTable};
use serde::{Deserialize, Serialize};

use crate::util;

pub const DEFAULT_SCORES_FILE: &str = "./data/scores.json";
pub const LAST_PLAYER_FILE_NAME: &str = "player.json";

/// The name used by the most recent game, kept next to the scores file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastPlayer {
    pub name: PlayerName,
}

impl LastPlayer {
    pub fn path_for(scores_file: &Path) -> PathBuf {
        scores_file.with_file_name(LAST_PLAYER_FILE_NAME)
    }

    /// Returns `None` when no name has been saved yet.
    pub fn load(path: &Path) -> anyhow::Result<Option<PlayerName>> {
        if !path.exists() {
            return Ok(None);
        }
        let last: Self = util::read_json_file("player", path)?;
        Ok(Some(last.name))
    }

    pub fn save(path: &Path, name: &PlayerName) -> anyhow::Result<()> {
        let last = Self { name: name.clone() };
        util::write_json_file("player", path, &last)
    }
}

/// High-score table persisted as a JSON array of [`ScoreRecord`]s.
///
/// The file is read once on [`load`](Self::load) and rewritten as a whole on
/// [`save`](Self::save).
#[derive(Debug)]
pub struct ScoreFile {
    path: PathBuf,
    table: ScoreTable,
}

impl ScoreFile {
    /// Loads the table from `path`, keeping the best `capacity` records.
    ///
    /// A missing file is an empty table.
    pub fn load<P>(path: P, capacity: usize) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let mut table = ScoreTable::new(capacity);
        if path.exists() {
            let records: Vec<ScoreRecord> = util::read_json_file("scores", &path)?;
            for record in records {
                table.append_ranked(record);
            }
        }
        log::debug!(
            "loaded {} score(s) from {}",
            table.records().len(),
            path.display()
        );
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> anyhow::Result<()> {
        util::write_json_file("scores", &self.path, self.table.records())
    }
}

impl ScoreStore for ScoreFile {
    fn append_ranked(&mut self, record: ScoreRecord) {
        self.table.append_ranked(record);
    }

    fn records(&self) -> &[ScoreRecord] {
        self.table.records()
    }
}
