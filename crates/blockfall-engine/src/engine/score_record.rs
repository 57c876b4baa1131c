use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the player a game is attributed to.
///
/// Always non-empty; surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

/// Error returned when a player name is blank.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("player name must not be empty")]
pub struct InvalidPlayerName;

impl PlayerName {
    pub fn new(name: &str) -> Result<Self, InvalidPlayerName> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InvalidPlayerName);
        }
        Ok(Self(name.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = InvalidPlayerName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PlayerName> for String {
    fn from(value: PlayerName) -> Self {
        value.0
    }
}

/// Result of one finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player: PlayerName,
    pub score: u64,
    pub lines: u64,
    /// When the game ended (RFC 3339 in JSON).
    pub date: DateTime<Utc>,
}

/// Ranked high-score history.
///
/// Implementations keep records ordered by score, highest first, and retain
/// only a fixed number of them. Duplicates are allowed.
pub trait ScoreStore {
    /// Inserts `record` at its rank and drops whatever falls off the end.
    fn append_ranked(&mut self, record: ScoreRecord);

    /// Records, best first.
    fn records(&self) -> &[ScoreRecord];
}

/// In-memory [`ScoreStore`] holding the top `capacity` records.
///
/// Records with equal scores keep their insertion order.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PlayerName, ScoreRecord, ScoreStore as _, ScoreTable};
///
/// let mut table = ScoreTable::new(2);
/// for score in [100, 300, 200] {
///     table.append_ranked(ScoreRecord {
///         player: PlayerName::new("ann").unwrap(),
///         score,
///         lines: 0,
///         date: chrono::Utc::now(),
///     });
/// }
/// let scores: Vec<_> = table.records().iter().map(|r| r.score).collect();
/// assert_eq!(scores, [300, 200]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    capacity: usize,
    records: Vec<ScoreRecord>,
}

impl ScoreTable {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Vec::with_capacity(capacity + 1),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, truncating if it shrank.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.records.truncate(capacity);
    }
}

impl ScoreStore for ScoreTable {
    fn append_ranked(&mut self, record: ScoreRecord) {
        self.records.push(record);
        // Stable, so ties stay in insertion order.
        self.records.sort_by(|a, b| b.score.cmp(&a.score));
        self.records.truncate(self.capacity);
    }

    fn records(&self) -> &[ScoreRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn record(player: &str, score: u64) -> ScoreRecord {
        ScoreRecord {
            player: PlayerName::new(player).unwrap(),
            score,
            lines: score / 40,
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_player_name_trims_and_rejects_blank() {
        assert_eq!(PlayerName::new("  ann ").unwrap().as_str(), "ann");
        assert_eq!(PlayerName::new("   "), Err(InvalidPlayerName));
        assert_eq!(PlayerName::new(""), Err(InvalidPlayerName));
    }

    #[test]
    fn test_player_name_deserialize_rejects_blank() {
        assert!(serde_json::from_str::<PlayerName>("\" \"").is_err());
        let name: PlayerName = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(name.to_string(), "bob");
    }

    #[test]
    fn test_ranked_descending() {
        let mut table = ScoreTable::new(10);
        for score in [40, 1200, 300, 0] {
            table.append_ranked(record("p", score));
        }
        let scores: Vec<_> = table.records().iter().map(|r| r.score).collect();
        assert_eq!(scores, [1200, 300, 40, 0]);
    }

    #[test]
    fn test_keeps_top_n() {
        let mut table = ScoreTable::new(10);
        for score in 0..15 {
            table.append_ranked(record("p", score * 10));
        }
        assert_eq!(table.records().len(), 10);
        assert_eq!(table.records()[0].score, 140);
        assert_eq!(table.records()[9].score, 50);
    }

    #[test]
    fn test_ties_keep_insertion_order_and_duplicates() {
        let mut table = ScoreTable::new(10);
        table.append_ranked(record("first", 100));
        table.append_ranked(record("second", 100));
        table.append_ranked(record("first", 100));
        let players: Vec<_> = table.records().iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, ["first", "second", "first"]);
    }

    #[test]
    fn test_set_capacity_truncates() {
        let mut table = ScoreTable::new(10);
        for score in [1, 2, 3] {
            table.append_ranked(record("p", score));
        }
        table.set_capacity(2);
        assert_eq!(table.records().len(), 2);
        assert_eq!(table.capacity(), 2);
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(record("ann", 40)).unwrap();
        assert_eq!(json["player"], "ann");
        assert_eq!(json["score"], 40);
        assert_eq!(json["lines"], 1);
        assert_eq!(json["date"], "2024-05-01T12:00:00Z");
    }
}
