use std::{mem, time::Duration};

use chrono::Utc;

use crate::core::{Block, Grid, Piece};

use super::{
    config::GameConfig,
    game_stats::GameStats,
    piece_factory::{PieceFactory, PieceSeed},
    progression::ProgressionRules,
    score_record::{PlayerName, ScoreRecord},
    timer::SessionTimers,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    const fn delta(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Player input, applied through [`GameSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
    HardDrop,
    /// Soft drop key pressed (`true`) or released (`false`).
    SoftDrop(bool),
    TogglePause,
    Restart,
}

/// Notifications for renderers, stat displays and score storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Grid, current piece or next piece changed.
    Changed,
    StatsChanged(GameStats),
    LevelUp { level: u32 },
    GameOver(ScoreRecord),
}

/// The game controller.
///
/// A session owns the grid, the falling and next pieces, the statistics and
/// both timers. Everything that mutates it goes through `&mut self`: input
/// via [`apply`](Self::apply) (or the individual command methods) and time via
/// [`advance`](Self::advance). Commands that make no sense in the current
/// state are silently ignored.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::{Command, GameConfig, GameSession, PlayerName, SessionState};
///
/// let mut session = GameSession::new(GameConfig::default());
/// session.initialize(PlayerName::new("ann").unwrap());
///
/// session.apply(Command::MoveLeft);
/// session.apply(Command::Rotate);
/// session.advance(Duration::from_secs(1)); // one fall tick at level 1
/// session.apply(Command::HardDrop);
///
/// assert_eq!(session.stats().completed_pieces(), 1);
/// assert_eq!(session.state(), SessionState::Running);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    rules: ProgressionRules,
    grid: Grid,
    factory: PieceFactory,
    current: Option<Piece>,
    next: Option<Piece>,
    stats: GameStats,
    state: SessionState,
    player: Option<PlayerName>,
    timers: SessionTimers,
    final_record: Option<ScoreRecord>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Creates a session that has not started yet, with a random piece seed.
    ///
    /// `config` should have passed [`GameConfig::validate`]; a board with a
    /// zero dimension panics.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let factory = PieceFactory::new(config.cols);
        Self::with_factory(config, factory)
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        let factory = PieceFactory::with_seed(config.cols, seed);
        Self::with_factory(config, factory)
    }

    fn with_factory(config: GameConfig, factory: PieceFactory) -> Self {
        Self {
            rules: ProgressionRules::from_config(&config),
            grid: Grid::new(config.cols, config.rows),
            factory,
            current: None,
            next: None,
            stats: GameStats::new(),
            state: SessionState::NotStarted,
            player: None,
            timers: SessionTimers::default(),
            final_record: None,
            events: Vec::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn player(&self) -> Option<&PlayerName> {
        self.player.as_ref()
    }

    /// The record produced when the last game ended, if it has ended.
    #[must_use]
    pub fn final_record(&self) -> Option<&ScoreRecord> {
        self.final_record.as_ref()
    }

    /// Where the current piece would land if hard-dropped now.
    #[must_use]
    pub fn drop_position(&self) -> Option<Piece> {
        let mut piece = self.current.clone()?;
        while self.grid.is_valid_position(&piece, 0, 1) {
            piece.translate(0, 1);
        }
        Some(piece)
    }

    /// Time until the next timer fires; `None` when no timer runs.
    #[must_use]
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Drains the notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Starts a new game for `player`.
    pub fn initialize(&mut self, player: PlayerName) {
        log::info!("starting game for {player}");
        self.grid.reset();
        self.current = Some(self.factory.create_random());
        self.next = Some(self.factory.create_random());
        self.stats = GameStats::new();
        self.final_record = None;
        self.player = Some(player);
        self.state = SessionState::Running;
        self.timers.cancel_all();
        self.timers.fall.start(self.rules.fall_interval_for(self.stats.level()));
        self.events.push(GameEvent::StatsChanged(self.stats.clone()));
        self.events.push(GameEvent::Changed);
    }

    /// Starts over with the same player. Ignored before the first game.
    pub fn restart(&mut self) {
        if let Some(player) = self.player.clone() {
            self.initialize(player);
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => {
                self.move_horizontal(Direction::Left);
            }
            Command::MoveRight => {
                self.move_horizontal(Direction::Right);
            }
            Command::Rotate => {
                self.rotate();
            }
            Command::HardDrop => self.hard_drop(),
            Command::SoftDrop(held) => self.set_soft_drop(held),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.restart(),
        }
    }

    /// Feeds elapsed wall-clock time to the timers and runs what became due.
    ///
    /// Soft-drop repeats run before fall ticks. Processing stops as soon as
    /// the game leaves the running state.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.state.is_running() {
            return;
        }
        self.timers.soft_drop.accumulate(elapsed);
        self.timers.fall.accumulate(elapsed);
        while self.state.is_running() && self.timers.soft_drop.try_fire() {
            self.move_down();
        }
        while self.state.is_running() && self.timers.fall.try_fire() {
            self.fall_tick();
        }
    }

    /// Shifts the current piece one column. Returns whether it moved.
    pub fn move_horizontal(&mut self, direction: Direction) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        let d_col = direction.delta();
        if !self.grid.is_valid_position(piece, d_col, 0) {
            return false;
        }
        piece.translate(d_col, 0);
        self.events.push(GameEvent::Changed);
        true
    }

    /// Rotates the current piece clockwise in place, without wall kicks.
    ///
    /// Returns whether the rotation was kept.
    pub fn rotate(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        let rotated = PieceFactory::rotate_matrix(piece.shape());
        let original = piece.replace_shape(rotated);
        if !self.grid.is_valid_position(piece, 0, 0) {
            piece.replace_shape(original);
            return false;
        }
        self.events.push(GameEvent::Changed);
        true
    }

    /// Drops the current piece as far as it goes and locks it immediately.
    pub fn hard_drop(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let Some(piece) = self.current.as_mut() else {
            return;
        };
        while self.grid.is_valid_position(piece, 0, 1) {
            piece.translate(0, 1);
        }
        self.fall_tick();
    }

    /// Pauses a running game or resumes a paused one.
    pub fn toggle_pause(&mut self) {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Paused;
                self.timers.cancel_all();
            }
            SessionState::Paused => {
                self.state = SessionState::Running;
                self.timers
                    .fall
                    .start(self.rules.fall_interval_for(self.stats.level()));
            }
            SessionState::NotStarted | SessionState::GameOver => {}
        }
    }

    /// Presses or releases soft drop.
    ///
    /// Pressing moves the piece down one row at once and then keeps moving it
    /// on the soft-drop interval until released. Soft drop never locks a piece.
    pub fn set_soft_drop(&mut self, held: bool) {
        if !held {
            self.timers.soft_drop.cancel();
            return;
        }
        if !self.state.is_running() || self.timers.soft_drop.is_running() {
            return;
        }
        self.move_down();
        self.timers
            .soft_drop
            .start(self.config.soft_drop_interval());
    }

    fn move_down(&mut self) -> bool {
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        if !self.grid.is_valid_position(piece, 0, 1) {
            return false;
        }
        piece.translate(0, 1);
        self.events.push(GameEvent::Changed);
        true
    }

    fn fall_tick(&mut self) {
        if !self.move_down() {
            self.lock_piece();
        }
    }

    fn lock_piece(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        self.grid.merge(&piece, Block::Piece(piece.kind()));
        let cleared = self.grid.clear_lines();
        let level_up = self.stats.complete_piece_drop(cleared, &self.rules);
        log::debug!(
            "locked {:?} at {:?}, cleared {cleared} line(s)",
            piece.kind(),
            piece.position()
        );

        if cleared > 0 {
            self.events.push(GameEvent::StatsChanged(self.stats.clone()));
        }
        if level_up {
            let level = self.stats.level();
            let interval = self.rules.fall_interval_for(level);
            log::info!("level up: {level} (fall interval {interval:?})");
            self.timers.fall.start(interval);
            self.events.push(GameEvent::LevelUp { level });
        }

        self.spawn_next();
        self.events.push(GameEvent::Changed);
    }

    fn spawn_next(&mut self) {
        let upcoming = self.factory.create_random();
        let spawned = self.next.replace(upcoming);
        let spawned = spawned.unwrap_or_else(|| self.factory.create_random());
        let fits = self.grid.is_valid_position(&spawned, 0, 0);
        self.current = Some(spawned);
        if !fits {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.state = SessionState::GameOver;
        self.timers.cancel_all();
        log::info!(
            "game over: score {}, lines {}",
            self.stats.score(),
            self.stats.cleared_lines()
        );
        let Some(player) = self.player.clone() else {
            return;
        };
        let record = ScoreRecord {
            player,
            score: self.stats.score(),
            lines: self.stats.cleared_lines(),
            date: Utc::now(),
        };
        self.events.push(GameEvent::GameOver(record.clone()));
        self.final_record = Some(record);
    }
}
