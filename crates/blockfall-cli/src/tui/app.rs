use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications.
///
/// Applications executed by `Tui::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called inside `Tui::run()` once the terminal is set up. Use this to
    /// configure the tick rate and to query terminal capabilities.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Advances application state (called on each tick).
    ///
    /// Ticks do not redraw by themselves; call [`Tui::request_render`] when
    /// something visible changed.
    fn update(&mut self, tui: &mut Tui);
}
