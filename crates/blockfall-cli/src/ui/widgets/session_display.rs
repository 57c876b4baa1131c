use blockfall_engine::{GameSession, ScoreRecord, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{
    BoardDisplay, PieceDisplay, ScoresDisplay, StatsDisplay, color, style,
};

/// The whole play screen: stats, board, next piece and high scores.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    scores: &'a [ScoreRecord],
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, scores: &'a [ScoreRecord]) -> Self {
        Self {
            session,
            scores,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn popup(&self) -> Option<(Vec<Line<'static>>, Style)> {
        match self.session.state() {
            SessionState::NotStarted | SessionState::Running => None,
            SessionState::Paused => Some((
                vec![Line::from("PAUSED")],
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            SessionState::GameOver => {
                let stats = self.session.stats();
                Some((
                    vec![
                        Line::from("GAME OVER!!"),
                        Line::from(format!("SCORE {}", stats.score())),
                        Line::from(format!("LINES {}", stats.cleared_lines())),
                    ],
                    Style::new().fg(color::WHITE).bg(color::RED),
                ))
            }
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.state() {
            SessionState::NotStarted | SessionState::Running => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let drop_position = self.session.drop_position();
        let game_board = {
            let mut widget = BoardDisplay::new(self.session.grid())
                .block(Block::bordered().border_style(border_style).style(style::DEFAULT));
            if let Some(ghost) = &drop_position {
                widget = widget.ghost(ghost);
            }
            if let Some(piece) = self.session.current_piece() {
                widget = widget.current_piece(piece);
            }
            widget
        };
        let next_panel = {
            let panel = PieceDisplay::new().block(panel("NEXT"));
            match self.session.next_piece() {
                Some(piece) => panel.piece(piece),
                None => panel,
            }
        };
        let stats = StatsDisplay::new(self.session).block(panel("STATS"));
        let scores = ScoresDisplay::new(self.scores, self.session.config().max_scores)
            .highlight(self.session.final_record())
            .block(panel("HIGH SCORES"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(u16::max(next_panel.width(), scores.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area, scores_area] = Layout::vertical([
            Constraint::Length(next_panel.height()),
            Constraint::Length(scores.height()),
        ])
        .spacing(1)
        .areas(right_column);
        let next_area = next_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(next_panel.width())]).flex(Flex::Start),
        )[0];

        let game_board_width = game_board.width();
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);
        scores.render(scores_area, buf);

        if let Some((lines, style)) = self.popup() {
            let height = super::cells(lines.len()) + 2;
            let block = Block::new().style(style);
            let text = Text::from(lines).style(style).centered();
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(height),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(
                inner.centered_vertically(Constraint::Length(height - 2)),
                buf,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Command, GameConfig, PieceSeed, PlayerName};

    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    fn render(session: &GameSession) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        SessionDisplay::new(session, &[]).render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn test_running_has_no_popup() {
        let mut session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_u128(3));
        session.initialize(PlayerName::new("ann").unwrap());
        let text = render(&session);
        assert!(text.contains("NEXT"));
        assert!(text.contains("ann"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_paused_popup() {
        let mut session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_u128(3));
        session.initialize(PlayerName::new("ann").unwrap());
        session.apply(Command::TogglePause);
        assert!(render(&session).contains("PAUSED"));
    }

    #[test]
    fn test_game_over_popup_shows_score_and_lines() {
        let mut session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_u128(3));
        session.initialize(PlayerName::new("ann").unwrap());
        while !session.state().is_game_over() {
            session.apply(Command::HardDrop);
        }
        let text = render(&session);
        assert!(text.contains("GAME OVER!!"));
        assert!(text.contains(&format!("SCORE {}", session.stats().score())));
        assert!(text.contains(&format!("LINES {}", session.stats().cleared_lines())));
    }
}
