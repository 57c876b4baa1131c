use std::path::{Path, PathBuf};

use anyhow::Context as _;
use blockfall_engine::{GameSession, PieceSeed, PlayerName};

use crate::{
    command::play::app::PlayApp,
    record::{DEFAULT_SCORES_FILE, LastPlayer, ScoreFile},
    tui::Tui,
    util,
};

mod app;

const DEFAULT_PLAYER: &str = "player";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Name recorded with your scores [default: the last name used]
    #[clap(long)]
    player: Option<String>,
    /// Game settings (JSON); missing fields take their default values
    #[clap(long)]
    config: Option<PathBuf>,
    /// High-score file
    #[clap(long, default_value = DEFAULT_SCORES_FILE)]
    scores_file: PathBuf,
    /// Piece seed (32 hex characters) for a reproducible piece sequence
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            player: None,
            config: None,
            scores_file: PathBuf::from(DEFAULT_SCORES_FILE),
            seed: None,
            log_file: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        player,
        config,
        scores_file,
        seed,
        log_file,
    } = arg;

    util::init_logging(log_file.as_deref())?;

    let config = util::load_game_config(config.as_deref())?;
    let player = resolve_player(
        player.as_deref(),
        &LastPlayer::path_for(scores_file),
    )?;
    let scores = ScoreFile::load(scores_file, config.max_scores)?;

    let session = match seed {
        Some(seed) => GameSession::with_seed(config, *seed),
        None => GameSession::new(config),
    };

    let mut app = PlayApp::new(session, player, scores);
    Tui::new().run(&mut app)?;

    let results = app.into_results();
    if results.finished.is_empty() {
        return Ok(());
    }
    if results.has_unsaved_scores {
        results.scores.save()?;
    }
    for record in &results.finished {
        eprintln!(
            "{}: score {} ({} lines)",
            record.player, record.score, record.lines
        );
    }
    eprintln!("Saved scores to {}", results.scores.path().display());
    Ok(())
}

/// Picks the player name: `--player` if given (and remembered for next
/// time), otherwise the last name used, otherwise [`DEFAULT_PLAYER`].
fn resolve_player(arg: Option<&str>, last_player_file: &Path) -> anyhow::Result<PlayerName> {
    if let Some(name) = arg {
        let player = PlayerName::new(name).context("Invalid --player")?;
        LastPlayer::save(last_player_file, &player)?;
        return Ok(player);
    }
    match LastPlayer::load(last_player_file)? {
        Some(player) => Ok(player),
        None => Ok(PlayerName::new(DEFAULT_PLAYER)?),
    }
}
