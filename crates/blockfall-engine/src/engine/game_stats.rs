use serde::{Deserialize, Serialize};

use super::progression::ProgressionRules;

/// Game statistics tracking score, lines cleared and level.
///
/// Besides the values shown to the player, the stats count locked pieces and
/// keep a histogram of how many lines each lock cleared.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameStats, ProgressionRules};
///
/// let rules = ProgressionRules::default();
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4, &rules); // four lines at level 1
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    cleared_lines: u64,
    level: u32,
    completed_pieces: u64,
    line_cleared_counter: [u64; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates statistics for a fresh game: zero score and lines, level 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            cleared_lines: 0,
            level: 1,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> u64 {
        self.cleared_lines
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    /// Returns a histogram of locks by lines cleared.
    ///
    /// Index 0 counts locks that cleared nothing; index 4 counts quads.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u64; 5] {
        &self.line_cleared_counter
    }

    /// Records one locked piece that cleared `cleared_lines` rows.
    ///
    /// The score delta uses the level in effect before the clear. Returns
    /// `true` when the level went up.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize, rules: &ProgressionRules) -> bool {
        self.completed_pieces += 1;
        if let Some(slot) = self.line_cleared_counter.get_mut(cleared_lines) {
            *slot += 1;
        }
        if cleared_lines == 0 {
            return false;
        }
        self.score = self.score.saturating_add(rules.score_delta(cleared_lines, self.level));
        self.cleared_lines += cleared_lines as u64;

        let new_level = rules.level_for(self.cleared_lines);
        if new_level > self.level {
            self.level = new_level;
            return true;
        }
        false
    }
}
