use std::{
    io::{self, Write},
    time::Duration,
};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};

use ratatui::DefaultTerminal;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
    key_release: bool,
}

impl Tui {
    /// Creates a new Tui.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Schedules a redraw before the next tick.
    pub fn request_render(&mut self) {
        self.events.mark_dirty();
    }

    /// Whether the terminal reports key release events.
    ///
    /// Only meaningful after `app.init()` has been called.
    pub fn reports_key_release(&self) -> bool {
        self.key_release
    }

    /// Runs the application.
    ///
    /// 1. Enables key release reporting if the terminal supports it
    /// 2. Calls `app.init()` for initialization
    /// 3. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Tick`: calls `app.update()`
    ///    - `Event::Render`: calls `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            let flags = KeyboardFlagsGuard {
                out: io::stdout(),
                pushed: enable_key_release_events(),
            };
            self.key_release = flags.pushed;
            log::debug!("key release events: {}", self.key_release);
            app.init(&mut self);

            self.event_loop(app, terminal)
        })
    }

    fn event_loop<A>(&mut self, app: &mut A, terminal: &mut DefaultTerminal) -> anyhow::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick => {
                    app.update(self);
                }
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => {
                    app.handle_event(self, event);
                }
            }
        }
        Ok(())
    }
}

fn enable_key_release_events() -> bool {
    if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
        return false;
    }
    execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok()
}

/// Pops the keyboard enhancement flags on drop, including during unwinding.
struct KeyboardFlagsGuard<W: Write> {
    out: W,
    pushed: bool,
}

impl<W: Write> Drop for KeyboardFlagsGuard<W> {
    fn drop(&mut self) {
        if self.pushed
            && let Err(err) = execute!(self.out, PopKeyboardEnhancementFlags)
        {
            log::warn!("failed to restore keyboard enhancement flags: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;

    const POP_FLAGS: &[u8] = b"\x1b[<1u";

    #[test]
    fn test_flags_popped_on_drop() {
        let mut out = Vec::new();
        drop(KeyboardFlagsGuard {
            out: &mut out,
            pushed: true,
        });
        assert_eq!(out, POP_FLAGS);

        let mut out = Vec::new();
        drop(KeyboardFlagsGuard {
            out: &mut out,
            pushed: false,
        });
        assert!(out.is_empty());
    }

    #[test]
    fn test_flags_popped_on_panic() {
        let mut out = Vec::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _flags = KeyboardFlagsGuard {
                out: &mut out,
                pushed: true,
            };
            panic!("event loop failed");
        }));
        assert!(result.is_err());
        assert_eq!(out, POP_FLAGS);
    }
}
