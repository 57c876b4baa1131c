use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::{Color, PieceKind};

/// Error returned when a shape matrix is not a non-empty rectangle.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape matrix has no cells")]
    Empty,
    #[display("shape row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Rectangular matrix of occupied/unoccupied sub-cells.
///
/// Always at least 1×1 and rectangular; every constructor checks this.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Builds a shape from rows of `0`/`1` (any non-zero value counts as occupied).
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, ShapeError>
    where
        R: AsRef<[u8]>,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if width == 0 {
            return Err(ShapeError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ShapeError::Ragged {
                    row: i,
                    len: row.len(),
                    expected: width,
                });
            }
            cells.extend(row.iter().map(|&c| c != 0));
        }
        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Returns an independent copy of the catalog template for `kind`.
    #[must_use]
    pub fn of(kind: PieceKind) -> Self {
        let template = kind.entry().shape;
        let width = template[0].len();
        Self {
            width,
            height: template.len(),
            cells: template
                .iter()
                .flat_map(|row| row.iter().map(|&c| c != 0))
                .collect(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// Iterates `(x, y)` offsets of occupied sub-cells, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &occupied)| occupied)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Returns this shape rotated 90° clockwise.
    ///
    /// The result is `height` wide and `width` tall, and the cell at
    /// `(row, col)` is taken from `(height - 1 - col, row)` of the original.
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        let (new_width, new_height) = (self.height, self.width);
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in 0..new_height {
            for col in 0..new_width {
                cells.push(self.cells[(self.height - 1 - col) * self.width + row]);
            }
        }
        Self {
            width: new_width,
            height: new_height,
            cells,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for &cell in row {
                f.write_str(if cell { "1" } else { "0" })?;
            }
        }
        Ok(())
    }
}

/// Top-left anchor of a piece in grid coordinates.
///
/// Rows above the visible board are negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PiecePosition {
    pub col: i32,
    pub row: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn offset(self, d_col: i32, d_row: i32) -> Self {
        Self::new(self.col + d_col, self.row + d_row)
    }
}

/// A falling piece: catalog kind, its own copy of the shape, and an anchor.
///
/// Unlike the catalog, a piece is mutated in place: translated while it falls
/// and re-shaped when rotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece at its spawn position on a board `board_width` columns wide.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let shape = Shape::of(kind);
        let col = board_width / 2 - shape.width() / 2;
        Self {
            kind,
            shape,
            position: PiecePosition::new(i32::try_from(col).unwrap_or(0), 0),
        }
    }

    #[must_use]
    pub fn with_position(kind: PieceKind, position: PiecePosition) -> Self {
        Self {
            kind,
            shape: Shape::of(kind),
            position,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.kind.color()
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    pub fn translate(&mut self, d_col: i32, d_row: i32) {
        self.position = self.position.offset(d_col, d_row);
    }

    /// Replaces the shape, returning the previous one.
    pub fn replace_shape(&mut self, shape: Shape) -> Shape {
        std::mem::replace(&mut self.shape, shape)
    }

    /// Absolute `(col, row)` of every occupied cell after applying an offset.
    pub fn occupied_positions_at(
        &self,
        d_col: i32,
        d_row: i32,
    ) -> impl Iterator<Item = (i32, i32)> + '_ {
        let origin = self.position.offset(d_col, d_row);
        self.shape.occupied_cells().map(move |(dx, dy)| {
            // Shapes are at most a few cells wide.
            #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let (dx, dy) = (dx as i32, dy as i32);
            (origin.col + dx, origin.row + dy)
        })
    }

    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.occupied_positions_at(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_empty() {
        let rows: [&[u8]; 0] = [];
        assert_eq!(Shape::from_rows(&rows), Err(ShapeError::Empty));
        assert_eq!(Shape::from_rows(&[[0u8; 0]]), Err(ShapeError::Empty));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows: [&[u8]; 2] = [&[1, 1, 1], &[1, 1]];
        assert_eq!(
            Shape::from_rows(&rows),
            Err(ShapeError::Ragged {
                row: 1,
                len: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn test_shape_of_is_independent_copy() {
        let mut piece = Piece::spawn(PieceKind::T, 10);
        piece.replace_shape(Shape::from_rows(&[[1u8]]).unwrap());
        assert_eq!(Shape::of(PieceKind::T).to_string(), "010/111");
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let t = Shape::of(PieceKind::T);
        let rotated = t.rotated_right();
        assert_eq!(rotated.width(), 2);
        assert_eq!(rotated.height(), 3);
        assert_eq!(rotated.to_string(), "10/11/10");
    }

    #[test]
    fn test_rotate_i_becomes_vertical() {
        let rotated = Shape::of(PieceKind::I).rotated_right();
        assert_eq!((rotated.width(), rotated.height()), (1, 4));
        assert_eq!(rotated.to_string(), "1/1/1/1");
    }

    #[test]
    fn test_rotate_l_clockwise() {
        // 100    11
        // 111 -> 10
        //         10
        let rotated = Shape::of(PieceKind::L).rotated_right();
        assert_eq!(rotated.to_string(), "11/10/10");
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        for kind in PieceKind::ALL {
            let shape = Shape::of(kind);
            let back = shape
                .rotated_right()
                .rotated_right()
                .rotated_right()
                .rotated_right();
            assert_eq!(back, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_spawn_column_is_centered() {
        assert_eq!(Piece::spawn(PieceKind::I, 10).position(), PiecePosition::new(3, 0));
        assert_eq!(Piece::spawn(PieceKind::O, 10).position(), PiecePosition::new(4, 0));
        assert_eq!(Piece::spawn(PieceKind::T, 10).position(), PiecePosition::new(4, 0));
    }

    #[test]
    fn test_occupied_positions_follow_anchor() {
        let mut piece = Piece::spawn(PieceKind::S, 10);
        piece.translate(1, 2);
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(5, 2), (6, 2), (6, 3), (7, 3)]);
        let above: Vec<_> = piece.occupied_positions_at(0, -3).collect();
        assert_eq!(above[0], (5, -1));
    }
}
