use super::{catalog::PieceKind, piece::Piece};

/// Width of the reference board.
pub const DEFAULT_COLS: usize = 10;
/// Height of the reference board.
pub const DEFAULT_ROWS: usize = 20;

/// A single cell of the grid.
///
/// A cell is either empty or remembers which catalog piece locked into it.
/// Its numeric id ([`Block::id`]) is 0 for empty and the 1-based catalog
/// index otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked piece of a specific type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.color_index(),
        }
    }

    /// Returns `None` for ids outside `0..=7`.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        if id == 0 {
            return Some(Block::Empty);
        }
        PieceKind::from_color_index(id).map(Block::Piece)
    }
}

/// The board cell matrix.
///
/// Row 0 is the top of the visible board. Dimensions are fixed at creation;
/// only [`Grid::merge`], [`Grid::clear_lines`], [`Grid::set_block`] and
/// [`Grid::reset`] change the contents.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Block, Grid, Piece, PieceKind};
///
/// let mut grid = Grid::new(10, 20);
/// let piece = Piece::spawn(PieceKind::O, grid.width());
/// assert!(grid.is_valid_position(&piece, 0, 0));
///
/// grid.merge(&piece, Block::Piece(piece.kind()));
/// assert!(!grid.is_valid_position(&piece, 0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<Block>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_ROWS)
    }
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must be at least 1x1");
        Self {
            width,
            height,
            rows: Self::empty_rows(width, height),
        }
    }

    fn empty_rows(width: usize, height: usize) -> Vec<Vec<Block>> {
        vec![vec![Block::Empty; width]; height]
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Numeric snapshot of the board: 0 for empty, 1-based catalog index otherwise.
    #[must_use]
    pub fn cell_ids(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|b| b.id()).collect())
            .collect()
    }

    #[must_use]
    pub fn block_at(&self, col: usize, row: usize) -> Option<Block> {
        self.rows.get(row)?.get(col).copied()
    }

    /// Overwrites a single cell. Out-of-bounds coordinates are ignored.
    pub fn set_block(&mut self, col: usize, row: usize, block: Block) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = block;
        }
    }

    fn cell_index(&self, col: i32, row: i32) -> Option<(usize, usize)> {
        let col = usize::try_from(col).ok().filter(|&c| c < self.width)?;
        let row = usize::try_from(row).ok().filter(|&r| r < self.height)?;
        Some((col, row))
    }

    /// Checks whether `piece`, shifted by the given offset, fits on the board.
    ///
    /// A position is invalid when any occupied cell falls outside the side
    /// walls, below the floor, or onto an occupied cell. Cells above the top
    /// row are allowed and are not checked for occupancy.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece, offset_col: i32, offset_row: i32) -> bool {
        piece
            .occupied_positions_at(offset_col, offset_row)
            .all(|(col, row)| {
                let Ok(c) = usize::try_from(col) else {
                    return false;
                };
                if c >= self.width {
                    return false;
                }
                let Ok(r) = usize::try_from(row) else {
                    // Above the visible board.
                    return true;
                };
                r < self.height && self.rows[r][c].is_empty()
            })
    }

    /// Writes `block` into every cell the piece occupies.
    ///
    /// Cells outside the board are skipped.
    pub fn merge(&mut self, piece: &Piece, block: Block) {
        for (col, row) in piece.occupied_positions() {
            if let Some((c, r)) = self.cell_index(col, row) {
                self.rows[r][c] = block;
            }
        }
    }

    /// Clears filled rows and returns how many were removed.
    ///
    /// Rows are scanned bottom to top. A full row is removed and an empty row
    /// is pushed in at the top; the same index is then examined again because
    /// it now holds the row that used to sit above it.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        let mut y = self.height;
        while y > 0 {
            let row = y - 1;
            if self.rows[row].iter().all(|b| !b.is_empty()) {
                self.rows.remove(row);
                self.rows.insert(0, vec![Block::Empty; self.width]);
                count += 1;
                continue;
            }
            y -= 1;
        }
        count
    }

    /// Empties every cell; dimensions are kept.
    pub fn reset(&mut self) {
        self.rows = Self::empty_rows(self.width, self.height);
    }
}

#[cfg(test)]
mod tests {
    use crate::core::piece::PiecePosition;

    use super::*;

    const X: Block = Block::Piece(PieceKind::I);

    fn fill_row(grid: &mut Grid, row: usize) {
        for col in 0..grid.width() {
            grid.set_block(col, row, X);
        }
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::default();
        assert_eq!((grid.width(), grid.height()), (10, 20));
        assert!(grid.rows().all(|row| row.iter().all(|b| b.is_empty())));
        assert!(grid.cell_ids().iter().flatten().all(|&id| id == 0));
    }

    #[test]
    fn test_block_id_roundtrip() {
        assert_eq!(Block::Empty.id(), 0);
        assert_eq!(Block::Piece(PieceKind::O).id(), 2);
        assert_eq!(Block::from_id(2), Some(Block::Piece(PieceKind::O)));
        assert_eq!(Block::from_id(0), Some(Block::Empty));
        assert_eq!(Block::from_id(9), None);
    }

    #[test]
    fn test_valid_position_walls_and_floor() {
        let grid = Grid::default();
        let piece = Piece::with_position(PieceKind::I, PiecePosition::new(0, 19));
        assert!(grid.is_valid_position(&piece, 0, 0));
        assert!(!grid.is_valid_position(&piece, -1, 0));
        assert!(!grid.is_valid_position(&piece, 0, 1));
        assert!(grid.is_valid_position(&piece, 6, 0));
        assert!(!grid.is_valid_position(&piece, 7, 0));
    }

    #[test]
    fn test_valid_position_above_top_is_allowed() {
        let mut grid = Grid::default();
        fill_row(&mut grid, 0);
        let piece = Piece::with_position(PieceKind::O, PiecePosition::new(4, -2));
        assert!(grid.is_valid_position(&piece, 0, 0));
        assert!(!grid.is_valid_position(&piece, 0, 1));
        // Still rejected horizontally even while above the board.
        assert!(!grid.is_valid_position(&piece, 5, 0));
    }

    #[test]
    fn test_valid_position_occupied_cell() {
        let mut grid = Grid::default();
        grid.set_block(5, 10, X);
        let piece = Piece::with_position(PieceKind::O, PiecePosition::new(4, 9));
        assert!(!grid.is_valid_position(&piece, 0, 0));
        assert!(grid.is_valid_position(&piece, -2, 0));
    }

    #[test]
    fn test_merge_writes_block_and_skips_out_of_bounds() {
        let mut grid = Grid::default();
        let piece = Piece::with_position(PieceKind::T, PiecePosition::new(0, -1));
        grid.merge(&piece, Block::Piece(PieceKind::T));
        // Only the bottom row of the T is on the board.
        let ids = grid.cell_ids();
        assert_eq!(&ids[0][..4], &[3, 3, 3, 0]);
        assert_eq!(ids.iter().flatten().filter(|&&id| id != 0).count(), 3);
    }

    #[test]
    fn test_clear_lines_no_full_rows_is_noop() {
        let mut grid = Grid::default();
        for col in 0..9 {
            grid.set_block(col, 19, X);
        }
        let before = grid.clone();
        assert_eq!(grid.clear_lines(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_lines_bottom_line() {
        let mut grid = Grid::default();
        fill_row(&mut grid, 19);
        grid.set_block(3, 18, Block::Piece(PieceKind::O));
        assert_eq!(grid.clear_lines(), 1);
        assert_eq!(grid.block_at(3, 19), Some(Block::Piece(PieceKind::O)));
        assert!(grid.rows().take(19).all(|row| row.iter().all(|b| b.is_empty())));
    }

    #[test]
    fn test_clear_lines_adjacent_rows() {
        let mut grid = Grid::default();
        fill_row(&mut grid, 18);
        fill_row(&mut grid, 19);
        grid.set_block(0, 17, Block::Piece(PieceKind::S));
        assert_eq!(grid.clear_lines(), 2);
        assert_eq!(grid.block_at(0, 19), Some(Block::Piece(PieceKind::S)));
        assert_eq!(grid.block_at(0, 18), Some(Block::Empty));
    }

    #[test]
    fn test_clear_lines_non_adjacent_rows_preserve_order() {
        let mut grid = Grid::default();
        grid.set_block(0, 15, Block::Piece(PieceKind::T));
        fill_row(&mut grid, 16);
        grid.set_block(1, 17, Block::Piece(PieceKind::L));
        fill_row(&mut grid, 18);
        grid.set_block(2, 19, Block::Piece(PieceKind::J));

        assert_eq!(grid.clear_lines(), 2);
        assert_eq!(grid.block_at(2, 19), Some(Block::Piece(PieceKind::J)));
        assert_eq!(grid.block_at(1, 18), Some(Block::Piece(PieceKind::L)));
        assert_eq!(grid.block_at(0, 17), Some(Block::Piece(PieceKind::T)));
        assert!(grid.rows().take(17).all(|row| row.iter().all(|b| b.is_empty())));
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut grid = Grid::default();
        for row in 0..grid.height() {
            fill_row(&mut grid, row);
        }
        assert_eq!(grid.clear_lines(), 20);
        assert_eq!(grid, Grid::default());
    }

    #[test]
    fn test_reset_keeps_dimensions() {
        let mut grid = Grid::new(6, 8);
        fill_row(&mut grid, 7);
        grid.reset();
        assert_eq!(grid, Grid::new(6, 8));
    }
}
