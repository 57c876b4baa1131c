use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_COLS, DEFAULT_ROWS};

/// Tunable parameters of a game.
///
/// Every field has a default matching the reference game, so a partial JSON
/// document only needs to list what it changes:
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "lines_per_level": 5 }"#).unwrap();
/// assert_eq!(config.lines_per_level, 5);
/// assert_eq!(config.cols, 10);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells.
    pub cols: usize,
    /// Board height in cells.
    pub rows: usize,
    /// Fall interval at level 1, in milliseconds.
    pub initial_speed_ms: u64,
    /// Lower bound of the fall interval, in milliseconds.
    pub min_speed_ms: u64,
    /// How much faster each level falls, in milliseconds.
    pub speed_decrease_per_level_ms: u64,
    /// Cleared lines needed to advance one level.
    pub lines_per_level: u32,
    /// Points for clearing 1, 2, 3 and 4 lines at once (multiplied by level).
    pub score_multipliers: [u64; 4],
    /// Repeat interval of soft drop while it is held, in milliseconds.
    pub soft_drop_interval_ms: u64,
    /// How many records the high-score table keeps.
    pub max_scores: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            initial_speed_ms: 1000,
            min_speed_ms: 100,
            speed_decrease_per_level_ms: 100,
            lines_per_level: 10,
            score_multipliers: [40, 100, 300, 1200],
            soft_drop_interval_ms: 50,
            max_scores: 10,
        }
    }
}

/// Error returned by [`GameConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least 4x2 cells, got {cols}x{rows}")]
    BoardTooSmall { cols: usize, rows: usize },
    #[display("`lines_per_level` must be positive")]
    ZeroLinesPerLevel,
    #[display("`{name}` must be positive")]
    ZeroInterval { name: &'static str },
    #[display("`min_speed_ms` ({min}) exceeds `initial_speed_ms` ({initial})")]
    MinAboveInitial { min: u64, initial: u64 },
    #[display("`max_scores` must be positive")]
    ZeroMaxScores,
}

impl GameConfig {
    /// Checks that the configuration can drive a game.
    ///
    /// The board must fit the widest catalog piece (4 cells) and have room to
    /// fall at least one row.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < 4 || self.rows < 2 {
            return Err(ConfigError::BoardTooSmall {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        for (name, value) in [
            ("initial_speed_ms", self.initial_speed_ms),
            ("min_speed_ms", self.min_speed_ms),
            ("soft_drop_interval_ms", self.soft_drop_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { name });
            }
        }
        if self.min_speed_ms > self.initial_speed_ms {
            return Err(ConfigError::MinAboveInitial {
                min: self.min_speed_ms,
                initial: self.initial_speed_ms,
            });
        }
        if self.max_scores == 0 {
            return Err(ConfigError::ZeroMaxScores);
        }
        Ok(())
    }

    #[must_use]
    pub fn soft_drop_interval(&self) -> Duration {
        Duration::from_millis(self.soft_drop_interval_ms)
    }
}
