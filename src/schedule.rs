use embassy_time::{Duration, Instant};

/// Fixed-period wake-up schedule. Each deadline is derived from the previous
/// intended deadline, never from when the sleep actually returned, so time
/// spent between wake-ups does not accumulate as drift.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicSchedule {
    last_wake: Instant,
}

impl PeriodicSchedule {
    pub const fn starting_at(start: Instant) -> Self {
        Self { last_wake: start }
    }

    /// Moves the schedule one period forward and returns the new deadline.
    pub fn advance(&mut self, period: Duration) -> Instant {
        self.last_wake += period;
        self.last_wake
    }

    pub fn last_wake(&self) -> Instant {
        self.last_wake
    }
}
