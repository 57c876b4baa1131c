use std::time::{Duration, Instant};

use blockfall_engine::{
    Command, GameEvent, GameSession, PlayerName, ScoreRecord, ScoreStore as _, SessionState,
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    record::ScoreFile,
    tui::{App, Tui},
    ui::widgets::SessionDisplay,
};

const FPS: f64 = 60.0;

/// What a play run leaves behind once the UI has closed.
#[derive(Debug)]
pub struct PlayResults {
    pub scores: ScoreFile,
    /// Records of every game finished in this run.
    pub finished: Vec<ScoreRecord>,
    /// Whether the last save at game over failed.
    pub has_unsaved_scores: bool,
}

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    scores: ScoreFile,
    finished: Vec<ScoreRecord>,
    has_unsaved_scores: bool,
    key_release: bool,
    last_update: Option<Instant>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(mut session: GameSession, player: PlayerName, scores: ScoreFile) -> Self {
        session.initialize(player);
        Self {
            session,
            scores,
            finished: Vec::new(),
            has_unsaved_scores: false,
            key_release: false,
            last_update: None,
            is_exiting: false,
        }
    }

    pub fn into_results(self) -> PlayResults {
        PlayResults {
            scores: self.scores,
            finished: self.finished,
            has_unsaved_scores: self.has_unsaved_scores,
        }
    }

    /// Drains session events into the score table, saving it at each game
    /// over. Returns whether anything happened.
    fn process_events(&mut self) -> bool {
        let events = self.session.take_events();
        for event in &events {
            match event {
                GameEvent::GameOver(record) => {
                    self.scores.append_ranked(record.clone());
                    self.finished.push(record.clone());
                    match self.scores.save() {
                        Ok(()) => self.has_unsaved_scores = false,
                        Err(err) => {
                            log::error!("failed to save scores: {err:#}");
                            self.has_unsaved_scores = true;
                        }
                    }
                }
                GameEvent::LevelUp { level } => log::debug!("reached level {level}"),
                GameEvent::Changed | GameEvent::StatsChanged(_) => {}
            }
        }
        !events.is_empty()
    }
}

/// Maps a key event to session commands.
///
/// When the terminal reports key releases, holding Down keeps soft drop
/// active until release. Otherwise each Down press (including terminal
/// auto-repeat) moves the piece one row.
fn key_commands(key: &KeyEvent, key_release: bool) -> &'static [Command] {
    use KeyEventKind::{Press, Release};

    match (key.code, key.kind) {
        (KeyCode::Down, Release) => &[Command::SoftDrop(false)],
        (KeyCode::Down, _) if key_release => &[Command::SoftDrop(true)],
        (KeyCode::Down, _) => &[Command::SoftDrop(true), Command::SoftDrop(false)],
        (_, Release) => &[],
        (KeyCode::Left, _) => &[Command::MoveLeft],
        (KeyCode::Right, _) => &[Command::MoveRight],
        (KeyCode::Up, _) => &[Command::Rotate],
        (KeyCode::Char(' '), Press) => &[Command::HardDrop],
        (KeyCode::Char('p' | 'P') | KeyCode::Esc, Press) => &[Command::TogglePause],
        (KeyCode::Char('r' | 'R'), Press) => &[Command::Restart],
        _ => &[],
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && match key.code {
            KeyCode::Char('q' | 'Q') => true,
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
        self.key_release = tui.reports_key_release();
        self.last_update = Some(Instant::now());
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if is_quit_key(&key) {
            self.is_exiting = true;
            return;
        }
        for command in key_commands(&key, self.key_release) {
            self.session.apply(*command);
        }
        self.process_events();
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session, self.scores.records());
        let help_text = match self.session.state() {
            SessionState::NotStarted | SessionState::Running => {
                "Controls: ← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | Space (Hard Drop) | P (Pause) | R (Restart) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            SessionState::GameOver => "Controls: R (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, tui: &mut Tui) {
        let now = Instant::now();
        let elapsed = self
            .last_update
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_update = Some(now);

        self.session.advance(elapsed);
        if self.process_events() {
            tui.request_render();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use blockfall_engine::{GameConfig, PieceSeed};
    use crossterm::event::KeyEventState;

    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn scores_path(test_name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "blockfall-app-test-{}/{test_name}/scores.json",
            std::process::id()
        ))
    }

    fn app(test_name: &str) -> PlayApp {
        let path = scores_path(test_name);
        let _ = fs::remove_file(&path);
        let scores = ScoreFile::load(path, 10).unwrap();
        let session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_u128(5));
        PlayApp::new(session, PlayerName::new("ann").unwrap(), scores)
    }

    #[test]
    fn test_soft_drop_with_key_release() {
        assert_eq!(
            key_commands(&key(KeyCode::Down, KeyEventKind::Press), true),
            &[Command::SoftDrop(true)]
        );
        assert_eq!(
            key_commands(&key(KeyCode::Down, KeyEventKind::Repeat), true),
            &[Command::SoftDrop(true)]
        );
        assert_eq!(
            key_commands(&key(KeyCode::Down, KeyEventKind::Release), true),
            &[Command::SoftDrop(false)]
        );
    }

    #[test]
    fn test_soft_drop_without_key_release_steps_once() {
        assert_eq!(
            key_commands(&key(KeyCode::Down, KeyEventKind::Press), false),
            &[Command::SoftDrop(true), Command::SoftDrop(false)]
        );
    }

    #[test]
    fn test_releases_and_repeats_of_other_keys() {
        assert!(key_commands(&key(KeyCode::Left, KeyEventKind::Release), true).is_empty());
        assert_eq!(
            key_commands(&key(KeyCode::Left, KeyEventKind::Repeat), true),
            &[Command::MoveLeft]
        );
        assert!(key_commands(&key(KeyCode::Char(' '), KeyEventKind::Repeat), true).is_empty());
        assert!(key_commands(&key(KeyCode::Char('p'), KeyEventKind::Repeat), true).is_empty());
    }

    #[test]
    fn test_key_bindings() {
        let press = |code| key_commands(&key(code, KeyEventKind::Press), false);
        assert_eq!(press(KeyCode::Right), &[Command::MoveRight]);
        assert_eq!(press(KeyCode::Up), &[Command::Rotate]);
        assert_eq!(press(KeyCode::Char(' ')), &[Command::HardDrop]);
        assert_eq!(press(KeyCode::Esc), &[Command::TogglePause]);
        assert_eq!(press(KeyCode::Char('R')), &[Command::Restart]);
        assert!(press(KeyCode::Char('x')).is_empty());
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&key(KeyCode::Char('q'), KeyEventKind::Press)));
        assert!(!is_quit_key(&key(KeyCode::Char('c'), KeyEventKind::Press)));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit_key(&ctrl_c));
    }

    fn play_until_game_over(app: &mut PlayApp, tui: &mut Tui) {
        while !app.session.state().is_game_over() {
            app.handle_event(tui, Event::Key(key(KeyCode::Char(' '), KeyEventKind::Press)));
        }
    }

    #[test]
    fn test_game_over_is_saved_immediately() {
        let mut app = app("game-over");
        let mut tui = Tui::new();
        assert!(app.process_events());
        play_until_game_over(&mut app, &mut tui);

        assert_eq!(app.scores.records().len(), 1);
        let on_disk = ScoreFile::load(scores_path("game-over"), 10).unwrap();
        assert_eq!(on_disk.records(), app.scores.records());

        let results = app.into_results();
        assert!(!results.has_unsaved_scores);
        assert_eq!(results.finished.len(), 1);
        assert_eq!(results.finished[0].player.as_str(), "ann");
        assert_eq!(results.scores.records(), &results.finished[..]);
    }

    #[test]
    fn test_every_finished_game_is_saved() {
        let mut app = app("restart");
        let mut tui = Tui::new();
        play_until_game_over(&mut app, &mut tui);
        app.handle_event(&mut tui, Event::Key(key(KeyCode::Char('r'), KeyEventKind::Press)));
        assert!(app.session.state().is_running());
        play_until_game_over(&mut app, &mut tui);

        let on_disk = ScoreFile::load(scores_path("restart"), 10).unwrap();
        assert_eq!(on_disk.records().len(), 2);
    }

    #[test]
    fn test_failed_save_is_reported() {
        let blocker = scores_path("unwritable").with_file_name("blocker");
        fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        fs::write(&blocker, "").unwrap();
        let scores = ScoreFile::load(blocker.join("scores.json"), 10).unwrap();
        let session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_u128(5));
        let mut app = PlayApp::new(session, PlayerName::new("ann").unwrap(), scores);
        let mut tui = Tui::new();
        play_until_game_over(&mut app, &mut tui);

        let results = app.into_results();
        assert!(results.has_unsaved_scores);
        assert_eq!(results.scores.records().len(), 1);
    }

    #[test]
    fn test_quit_sets_exit() {
        let mut app = app("quit");
        let mut tui = Tui::new();
        assert!(!app.should_exit());
        app.handle_event(
            &mut tui,
            Event::Key(key(KeyCode::Char('q'), KeyEventKind::Press)),
        );
        assert!(app.should_exit());
    }
}
