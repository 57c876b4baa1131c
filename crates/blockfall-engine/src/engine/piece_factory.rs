use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Color, Piece, PieceKind, Shape};

/// Creates spawn-ready pieces from the catalog.
///
/// Every catalog entry is equally likely on each draw; there is no bag or
/// history. The generator is seeded, so two factories with the same
/// [`PieceSeed`] produce the same sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceFactory, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceFactory::with_seed(10, seed);
/// let mut b = PieceFactory::with_seed(10, seed);
/// assert_eq!(a.create_random(), b.create_random());
/// ```
#[derive(Debug, Clone)]
pub struct PieceFactory {
    rng: Pcg32,
    board_width: usize,
}

impl PieceFactory {
    /// Creates a factory with a random seed.
    #[must_use]
    pub fn new(board_width: usize) -> Self {
        Self::with_seed(board_width, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(board_width: usize, seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            board_width,
        }
    }

    /// Draws a uniformly random piece positioned at the spawn point.
    pub fn create_random(&mut self) -> Piece {
        let kind: PieceKind = self.rng.random();
        Piece::spawn(kind, self.board_width)
    }

    /// Returns the 90° clockwise rotation of `shape`.
    ///
    /// Callers must check the result against the grid before committing it.
    #[must_use]
    pub fn rotate_matrix(shape: &Shape) -> Shape {
        shape.rotated_right()
    }

    /// 1-based catalog index of `color`, or `None` for a colour outside the catalog.
    #[must_use]
    pub fn color_index(color: Color) -> Option<u8> {
        crate::core::color_index(color)
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit value serialised as a 32-character hex string, so that a game
/// can be replayed piece for piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Error returned when parsing a [`PieceSeed`] from text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    #[error(not(source))]
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self::from_u128(num))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
