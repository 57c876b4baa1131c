use std::iter;

use blockfall_engine::{Grid, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::BlockDisplay;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    ghost: Option<&'a Piece>,
    current_piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            ghost: None,
            current_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: &'a Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn current_piece(self, piece: &'a Piece) -> Self {
        Self {
            current_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::cells(self.grid.width()) * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells(self.grid.height()) * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Grid cells with the ghost and then the current piece painted over them.
    fn cell_displays(&self) -> Vec<Vec<BlockDisplay>> {
        let mut cells: Vec<Vec<_>> = self
            .grid
            .rows()
            .map(|row| {
                row.iter()
                    .map(|block| BlockDisplay::from_block(*block, true))
                    .collect()
            })
            .collect();

        let layers = [
            self.ghost.map(|p| (p, BlockDisplay::ghost(p.kind()))),
            self.current_piece
                .map(|p| (p, BlockDisplay::piece(p.kind()))),
        ];
        for (piece, display) in layers.into_iter().flatten() {
            for (col, row) in piece.occupied_positions() {
                let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
                    continue;
                };
                if let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *cell = display;
                }
            }
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.grid.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.grid.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.cell_displays()) {
            for (grid_cell, display) in iter::zip(grid_row, row) {
                display.render(grid_cell, buf);
            }
        }
    }
}
