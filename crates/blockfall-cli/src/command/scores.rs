use std::path::PathBuf;

use blockfall_engine::ScoreStore as _;

use crate::{
    record::{DEFAULT_SCORES_FILE, ScoreFile},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// Game settings (JSON) the table was recorded with; sets the table size
    #[clap(long)]
    config: Option<PathBuf>,
    /// High-score file
    #[clap(long, default_value = DEFAULT_SCORES_FILE)]
    scores_file: PathBuf,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let scores = load_scores(arg)?;
    if scores.records().is_empty() {
        eprintln!("No scores in {}", scores.path().display());
        return Ok(());
    }

    println!("{:>4}  {:<16} {:>10} {:>6}  DATE", "RANK", "PLAYER", "SCORE", "LINES");
    for (rank, record) in scores.records().iter().enumerate() {
        println!(
            "{:>4}  {:<16} {:>10} {:>6}  {}",
            rank + 1,
            record.player.as_str(),
            record.score,
            record.lines,
            record.date.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn load_scores(arg: &ScoresArg) -> anyhow::Result<ScoreFile> {
    let ScoresArg {
        config,
        scores_file,
    } = arg;
    let config = util::load_game_config(config.as_deref())?;
    ScoreFile::load(scores_file, config.max_scores)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path, process};

    use blockfall_engine::{PlayerName, ScoreRecord};
    use chrono::Utc;

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("blockfall-scores-test-{}", process::id()))
            .join(name)
    }

    fn write_records(path: &Path, count: u64) {
        let records: Vec<_> = (1..=count)
            .map(|score| ScoreRecord {
                player: PlayerName::new("ann").unwrap(),
                score,
                lines: 0,
                date: Utc::now(),
            })
            .collect();
        util::write_json_file("scores", path, &records).unwrap();
    }

    #[test]
    fn test_table_size_follows_config() {
        let dir = temp_dir("large");
        let scores_file = dir.join("scores.json");
        let config = dir.join("config.json");
        write_records(&scores_file, 15);
        fs::write(&config, r#"{"max_scores": 20}"#).unwrap();

        let arg = ScoresArg {
            config: Some(config),
            scores_file: scores_file.clone(),
        };
        assert_eq!(load_scores(&arg).unwrap().records().len(), 15);

        let arg = ScoresArg {
            config: None,
            scores_file,
        };
        assert_eq!(load_scores(&arg).unwrap().records().len(), 10);
    }
}
