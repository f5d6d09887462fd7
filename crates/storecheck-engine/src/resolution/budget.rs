use std::time::Duration;

/// Default total budget for polling resolution (15 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Default bound on a single locator attempt
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 750;

/// Default pause between two full passes over a locator set
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Time limits for one polling resolution.
///
/// The per-attempt timeout never exceeds the total timeout; constructors clamp it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    total: Duration,
    attempt: Duration,
    interval: Duration,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
            Duration::from_millis(DEFAULT_ATTEMPT_TIMEOUT_MS),
        )
    }
}

impl PollBudget {
    pub fn new(total: Duration, attempt: Duration) -> Self {
        Self {
            total,
            attempt: attempt.min(total),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Same limits with a different total; the attempt bound is re-clamped.
    pub fn with_total(self, total: Duration) -> Self {
        Self {
            total,
            attempt: self.attempt.min(total),
            interval: self.interval,
        }
    }

    pub fn with_attempt(mut self, attempt: Duration) -> Self {
        self.attempt = attempt.min(self.total);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn attempt(&self) -> Duration {
        self.attempt
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
