//! Timer-driven auto-advance.
//!
//! The driver only computes the next absolute offset; the caller issues it
//! as a programmatic scroll so it flows through the same wrap correction as
//! a drag.

/// Default advance per tick (columns).
pub const DEFAULT_TICK_DELTA: f64 = 0.35;
/// Default tick period (milliseconds).
pub const DEFAULT_TICK_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    Running,
    Stopped,
}

/// Fixed-increment autoscroll with a one-way stop.
#[derive(Debug, Clone)]
pub struct AutoscrollDriver {
    delta: f64,
    state: DriverState,
    ticks: u64,
}

impl AutoscrollDriver {
    pub fn new(delta: f64) -> Self {
        Self {
            delta,
            state: DriverState::Running,
            ticks: 0,
        }
    }

    /// A driver that never moves anything.
    pub fn stopped(delta: f64) -> Self {
        Self {
            delta,
            state: DriverState::Stopped,
            ticks: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Ticks that produced a scroll command.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Target offset for this tick, or `None` once stopped.
    pub fn tick(&mut self, current_offset: f64) -> Option<f64> {
        if !self.is_running() {
            return None;
        }
        self.ticks += 1;
        Some(current_offset + self.delta)
    }

    /// Permanently stop.  Returns `true` only for the call that actually
    /// stopped a running driver.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = DriverState::Stopped;
        if was_running {
            tracing::info!(ticks = self.ticks, "autoscroll stopped");
        }
        was_running
    }
}

impl Default for AutoscrollDriver {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_DELTA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_by_delta() {
        let mut d = AutoscrollDriver::default();
        let mut offset = 10.0;
        for _ in 0..4 {
            offset = d.tick(offset).unwrap();
        }
        assert!((offset - (10.0 + 4.0 * 0.35)).abs() < 1e-9);
        assert_eq!(d.ticks(), 4);
    }

    #[test]
    fn test_stop_is_one_way() {
        let mut d = AutoscrollDriver::default();
        assert!(d.stop());
        assert!(!d.stop());
        assert!(!d.is_running());
        for _ in 0..100 {
            assert_eq!(d.tick(5.0), None);
        }
        assert_eq!(d.ticks(), 0);
    }

    #[test]
    fn test_stopped_constructor() {
        let mut d = AutoscrollDriver::stopped(1.0);
        assert_eq!(d.tick(0.0), None);
    }
}
