use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Display colour of a catalog piece, stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("#{_0:06x}")]
pub struct Color(u32);

impl Color {
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }

    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }
}

/// Immutable template for one of the seven pieces.
#[derive(Debug)]
pub struct CatalogEntry {
    pub name: char,
    pub shape: &'static [&'static [u8]],
    pub color: Color,
}

/// The seven canonical pieces.
///
/// The position of an entry in this table defines the 1-based id that locked
/// cells of that piece carry on the grid.
pub static CATALOG: [CatalogEntry; PieceKind::LEN] = [
    CatalogEntry {
        name: 'I',
        shape: &[&[1, 1, 1, 1]],
        color: Color::from_rgb(0x0000f0),
    },
    CatalogEntry {
        name: 'O',
        shape: &[&[1, 1], &[1, 1]],
        color: Color::from_rgb(0xf00000),
    },
    CatalogEntry {
        name: 'T',
        shape: &[&[0, 1, 0], &[1, 1, 1]],
        color: Color::from_rgb(0xa000f0),
    },
    CatalogEntry {
        name: 'S',
        shape: &[&[1, 1, 0], &[0, 1, 1]],
        color: Color::from_rgb(0x00f000),
    },
    CatalogEntry {
        name: 'Z',
        shape: &[&[0, 1, 1], &[1, 1, 0]],
        color: Color::from_rgb(0xf0f000),
    },
    CatalogEntry {
        name: 'L',
        shape: &[&[1, 0, 0], &[1, 1, 1]],
        color: Color::from_rgb(0xf0a000),
    },
    CatalogEntry {
        name: 'J',
        shape: &[&[0, 0, 1], &[1, 1, 1]],
        color: Color::from_rgb(0x00f0f0),
    },
];

/// Enum representing the type of piece.
///
/// Discriminants follow the order of [`CATALOG`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// L-piece.
    L = 5,
    /// J-piece.
    J = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::L,
        PieceKind::J,
    ];

    #[must_use]
    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self as usize]
    }

    #[must_use]
    pub fn color(self) -> Color {
        self.entry().color
    }

    #[must_use]
    pub fn as_char(self) -> char {
        self.entry().name
    }

    /// Returns the 1-based id stored in grid cells occupied by this piece.
    #[must_use]
    pub const fn color_index(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Self::color_index`].
    #[must_use]
    pub fn from_color_index(index: u8) -> Option<Self> {
        let i = usize::from(index.checked_sub(1)?);
        Self::ALL.get(i).copied()
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_char() == c)
    }
}

/// Returns the 1-based catalog position of the piece with the given colour.
///
/// `None` means the colour does not belong to any catalog entry.
#[must_use]
pub fn color_index(color: Color) -> Option<u8> {
    let i = CATALOG.iter().position(|entry| entry.color == color)?;
    u8::try_from(i + 1).ok()
}
