use std::time::Duration;

use super::config::GameConfig;

/// Score, level and fall-speed formulas.
///
/// All methods are pure; the rules are fixed when the value is built.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::ProgressionRules;
///
/// let rules = ProgressionRules::default();
/// assert_eq!(rules.score_delta(4, 1), 1200);
/// assert_eq!(rules.level_for(25), 3);
/// assert_eq!(rules.fall_interval_for(3), Duration::from_millis(800));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionRules {
    score_multipliers: [u64; 4],
    lines_per_level: u32,
    initial_speed: Duration,
    min_speed: Duration,
    speed_decrease_per_level: Duration,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl ProgressionRules {
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            score_multipliers: config.score_multipliers,
            lines_per_level: config.lines_per_level.max(1),
            initial_speed: Duration::from_millis(config.initial_speed_ms),
            min_speed: Duration::from_millis(config.min_speed_ms),
            speed_decrease_per_level: Duration::from_millis(config.speed_decrease_per_level_ms),
        }
    }

    /// Points awarded for clearing `lines` rows at once on `level`.
    ///
    /// Anything other than 1 to 4 lines scores nothing.
    #[must_use]
    pub fn score_delta(&self, lines: usize, level: u32) -> u64 {
        let multiplier = match lines {
            1..=4 => self.score_multipliers[lines - 1],
            _ => 0,
        };
        multiplier.saturating_mul(u64::from(level))
    }

    /// Level reached after clearing `total_lines` lines. Starts at 1.
    #[must_use]
    pub fn level_for(&self, total_lines: u64) -> u32 {
        let level = total_lines / u64::from(self.lines_per_level) + 1;
        u32::try_from(level).unwrap_or(u32::MAX)
    }

    /// Time between automatic fall ticks on `level`, never below the floor.
    #[must_use]
    pub fn fall_interval_for(&self, level: u32) -> Duration {
        let speedup = self
            .speed_decrease_per_level
            .saturating_mul(level.saturating_sub(1));
        self.initial_speed
            .saturating_sub(speedup)
            .max(self.min_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_delta_table() {
        let rules = ProgressionRules::default();
        assert_eq!(rules.score_delta(1, 1), 40);
        assert_eq!(rules.score_delta(2, 3), 300);
        assert_eq!(rules.score_delta(3, 2), 600);
        assert_eq!(rules.score_delta(4, 1), 1200);
    }

    #[test]
    fn test_score_delta_out_of_table_is_zero() {
        let rules = ProgressionRules::default();
        assert_eq!(rules.score_delta(0, 5), 0);
        assert_eq!(rules.score_delta(5, 1), 0);
        assert_eq!(rules.score_delta(20, 9), 0);
    }

    #[test]
    fn test_score_delta_saturates() {
        let config = GameConfig {
            score_multipliers: [u64::MAX; 4],
            ..GameConfig::default()
        };
        let rules = ProgressionRules::from_config(&config);
        assert_eq!(rules.score_delta(4, 2), u64::MAX);
        assert_eq!(rules.score_delta(1, 1), u64::MAX);
    }

    #[test]
    fn test_level_for() {
        let rules = ProgressionRules::default();
        assert_eq!(rules.level_for(0), 1);
        assert_eq!(rules.level_for(9), 1);
        assert_eq!(rules.level_for(10), 2);
        assert_eq!(rules.level_for(25), 3);
    }

    #[test]
    fn test_fall_interval_for() {
        let rules = ProgressionRules::default();
        assert_eq!(rules.fall_interval_for(1), Duration::from_millis(1000));
        assert_eq!(rules.fall_interval_for(5), Duration::from_millis(600));
        assert_eq!(rules.fall_interval_for(9), Duration::from_millis(200));
        assert_eq!(rules.fall_interval_for(10), Duration::from_millis(100));
        assert_eq!(rules.fall_interval_for(20), Duration::from_millis(100));
        assert_eq!(rules.fall_interval_for(u32::MAX), Duration::from_millis(100));
    }

    #[test]
    fn test_custom_rules() {
        let config = GameConfig {
            lines_per_level: 5,
            min_speed_ms: 250,
            ..GameConfig::default()
        };
        let rules = ProgressionRules::from_config(&config);
        assert_eq!(rules.level_for(5), 2);
        assert_eq!(rules.fall_interval_for(10), Duration::from_millis(250));
    }
}
