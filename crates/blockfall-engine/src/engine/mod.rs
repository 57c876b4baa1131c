//! Game rules and session state.
//!
//! This module builds the playable game on top of the core data structures:
//!
//! - [`GameSession`] - The controller: state machine, commands, timers and events
//! - [`GameStats`] - Score, cleared lines and level
//! - [`ProgressionRules`] - Scoring table, level thresholds and fall speed
//! - [`PieceFactory`] - Uniform random piece generation and rotation
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameConfig`] - Tunable constants, loadable from JSON
//! - [`ScoreRecord`] / [`ScoreStore`] - Ranked high-score history
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] and call [`GameSession::initialize`] with a player name
//! 2. Feed player input with [`GameSession::apply`]
//! 3. Feed elapsed time with [`GameSession::advance`]; the current piece falls
//!    one row per fall interval and locks when it cannot fall further
//! 4. Full rows are cleared, score and level are updated, the next piece spawns
//! 5. When a spawned piece does not fit, the game is over and a [`ScoreRecord`]
//!    is emitted
//!
//! Renderers and score storage observe the session through
//! [`GameSession::take_events`].

pub use self::{
    config::*, game_session::*, game_stats::*, piece_factory::*, progression::*,
    score_record::*, timer::*,
};

mod config;
mod game_session;
mod game_stats;
mod piece_factory;
mod progression;
mod score_record;
mod timer;
