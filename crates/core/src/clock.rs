use derive_more::Display;
use log::warn;
use serde::Serialize;
use std::time::Duration;

/// Whether the simulation is currently ticking
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    Stopped,
    Running,
}

/// A periodic timer, driven by the host. The host reports elapsed time via
/// [Clock::advance], and the clock tells it how many intervals came due
/// during that time. Stopping the clock throws away any partial interval, so
/// once [Clock::stop] returns, no more ticks will come due until it's
/// started again.
#[derive(Clone, Debug)]
pub struct Clock {
    interval: Duration,
    state: ClockState,
    /// Time accumulated towards the next tick. Always less than `interval`
    /// between calls, and always zero while stopped.
    pending: Duration,
}

impl Clock {
    /// Most ticks a single [Clock::advance] will report. Anything past this
    /// (e.g. after the host was suspended for a while) is dropped.
    pub const MAX_CATCH_UP: u32 = 100;

    /// Create a new stopped clock. The interval must be non-zero.
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "clock interval must be non-zero");
        Self {
            interval,
            state: ClockState::Stopped,
            pending: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Arm the clock. The first tick comes due one full interval from now.
    /// Returns `false` if the clock was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.pending = Duration::ZERO;
        self.state = ClockState::Running;
        true
    }

    /// Disarm the clock. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.pending = Duration::ZERO;
        self.state = ClockState::Stopped;
        true
    }

    /// Let some time pass. Returns the number of ticks that came due, capped
    /// at [Clock::MAX_CATCH_UP]. A stopped clock never has any ticks due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.is_running() {
            return 0;
        }
        let total = self.pending.saturating_add(elapsed);
        let ticks = total.as_nanos() / self.interval.as_nanos();
        // Remainder is always less than the interval, so this fits
        self.pending = Duration::from_nanos(
            (total.as_nanos() % self.interval.as_nanos()) as u64,
        );
        if ticks > u128::from(Self::MAX_CATCH_UP) {
            warn!(
                "{} ticks came due at once, only running {}",
                ticks,
                Self::MAX_CATCH_UP
            );
            return Self::MAX_CATCH_UP;
        }
        ticks as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn test_start_stop() {
        let mut clock = Clock::new(INTERVAL);
        assert_eq!(clock.state(), ClockState::Stopped);
        assert!(clock.start());
        assert!(!clock.start());
        assert!(clock.is_running());
        assert!(clock.stop());
        assert!(!clock.stop());
        assert_eq!(clock.state(), ClockState::Stopped);
    }

    #[test]
    fn test_advance() {
        let mut clock = Clock::new(INTERVAL);
        // Nothing happens while stopped
        assert_eq!(clock.advance(Duration::from_secs(10)), 0);

        clock.start();
        assert_eq!(clock.advance(Duration::from_millis(50)), 0);
        assert_eq!(clock.advance(Duration::from_millis(50)), 1);
        assert_eq!(clock.advance(Duration::from_millis(350)), 3);
        // 50ms left over from the last call
        assert_eq!(clock.advance(Duration::from_millis(50)), 1);
    }

    #[test]
    fn test_stop_discards_partial_interval() {
        let mut clock = Clock::new(INTERVAL);
        clock.start();
        assert_eq!(clock.advance(Duration::from_millis(90)), 0);
        clock.stop();
        assert_eq!(clock.advance(Duration::from_secs(5)), 0);

        // Restarting waits a full interval again
        clock.start();
        assert_eq!(clock.advance(Duration::from_millis(90)), 0);
        assert_eq!(clock.advance(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut clock = Clock::new(INTERVAL);
        clock.start();
        assert_eq!(
            clock.advance(Duration::from_secs(3600)),
            Clock::MAX_CATCH_UP
        );
        assert_eq!(clock.advance(Duration::MAX), Clock::MAX_CATCH_UP);
        // Still ticking normally afterwards
        clock.stop();
        clock.start();
        assert_eq!(clock.advance(Duration::from_millis(250)), 2);
    }
}
