use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Fixed-cadence scan polling.
///
/// There is no backoff: a failed poll is simply retried on the next tick.
/// Overlapping requests are allowed; the store sorts them out by sequence.
#[derive(Debug, Clone, Copy)]
pub struct PollScheduler {
    period: Duration,
}

impl PollScheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// The first tick completes immediately so data is requested at start.
    pub fn start(&self) -> Interval {
        let mut ticker = interval(self.period);
        // A stalled event loop should not fire a burst of catch-up polls.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}
