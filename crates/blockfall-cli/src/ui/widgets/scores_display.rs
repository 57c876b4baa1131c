use blockfall_engine::ScoreRecord;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Ranked high-score list; the most recent game's record is highlighted.
#[derive(Debug)]
pub struct ScoresDisplay<'a> {
    records: &'a [ScoreRecord],
    highlight: Option<&'a ScoreRecord>,
    capacity: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ScoresDisplay<'a> {
    pub fn new(records: &'a [ScoreRecord], capacity: usize) -> Self {
        Self {
            records,
            highlight: None,
            capacity,
            block: None,
        }
    }

    pub fn highlight(self, record: Option<&'a ScoreRecord>) -> Self {
        Self {
            highlight: record,
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
        24 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells(self.capacity.max(1)) + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> Vec<Line<'a>> {
        if self.records.is_empty() {
            return vec![Line::styled("no scores yet", style::EMPTY_DOT).centered()];
        }
        let mut highlighted = false;
        self.records
            .iter()
            .take(self.capacity)
            .enumerate()
            .map(|(i, record)| {
                let is_latest = !highlighted && self.highlight == Some(record);
                highlighted |= is_latest;
                let style = if is_latest {
                    style::HIGHLIGHT
                } else {
                    style::DEFAULT
                };
                Line::from(vec![
                    Span::styled(format!("{:>2}. ", i + 1), style),
                    Span::styled(format!("{:<10.10}", record.player.as_str()), style),
                    Span::styled(format!("{:>10}", record.score), style),
                ])
            })
            .collect()
    }
}

impl Widget for ScoresDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ScoresDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for (line, row) in self.lines().into_iter().zip(area.rows()) {
            line.render(row, buf);
        }
    }
}
