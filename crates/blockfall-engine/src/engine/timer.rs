use std::time::Duration;

/// A repeating timer driven by explicitly supplied elapsed time.
///
/// The timer never runs on its own: the owner feeds it time with
/// [`accumulate`](Self::accumulate) and polls [`try_fire`](Self::try_fire)
/// until it returns `false`. A stopped timer ignores elapsed time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalTimer {
    running: Option<Running>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Running {
    interval: Duration,
    elapsed: Duration,
}

impl IntervalTimer {
    /// Starts the timer, discarding any time accumulated by a previous run.
    pub fn start(&mut self, interval: Duration) {
        self.running = Some(Running {
            interval,
            elapsed: Duration::ZERO,
        });
    }

    pub fn cancel(&mut self) {
        self.running = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.running.as_ref().map(|r| r.interval)
    }

    pub fn accumulate(&mut self, elapsed: Duration) {
        if let Some(running) = &mut self.running {
            running.elapsed = running.elapsed.saturating_add(elapsed);
        }
    }

    /// Consumes one interval if it is due.
    pub fn try_fire(&mut self) -> bool {
        let Some(running) = &mut self.running else {
            return false;
        };
        if running.interval.is_zero() || running.elapsed < running.interval {
            return false;
        }
        running.elapsed -= running.interval;
        true
    }

    /// Time left until the next fire, or `None` while stopped.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.running
            .as_ref()
            .map(|r| r.interval.saturating_sub(r.elapsed))
    }
}

/// The two timers a game session owns: automatic fall and soft-drop repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTimers {
    pub fall: IntervalTimer,
    pub soft_drop: IntervalTimer,
}

impl SessionTimers {
    pub fn cancel_all(&mut self) {
        self.fall.cancel();
        self.soft_drop.cancel();
    }

    /// Time until whichever running timer fires first.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        [self.fall.remaining(), self.soft_drop.remaining()]
            .into_iter()
            .flatten()
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut timer = IntervalTimer::default();
        timer.accumulate(MS * 10_000);
        assert!(!timer.try_fire());
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut timer = IntervalTimer::default();
        timer.start(MS * 100);
        timer.accumulate(MS * 99);
        assert!(!timer.try_fire());
        timer.accumulate(MS * 151);
        assert!(timer.try_fire());
        assert!(timer.try_fire());
        assert!(!timer.try_fire());
        assert_eq!(timer.remaining(), Some(MS * 50));
    }

    #[test]
    fn test_restart_discards_elapsed() {
        let mut timer = IntervalTimer::default();
        timer.start(MS * 100);
        timer.accumulate(MS * 90);
        timer.start(MS * 50);
        assert_eq!(timer.remaining(), Some(MS * 50));
        assert_eq!(timer.interval(), Some(MS * 50));
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = SessionTimers::default();
        timers.fall.start(MS * 1000);
        timers.soft_drop.start(MS * 50);
        assert_eq!(timers.next_deadline(), Some(MS * 50));
        timers.cancel_all();
        assert!(!timers.fall.is_running());
        assert!(!timers.soft_drop.is_running());
        assert_eq!(timers.next_deadline(), None);
    }
}
