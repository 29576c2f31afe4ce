use crate::config::MAX_REFRESH_INTERVAL;
use std::{pin::Pin, time::Duration};
use tokio::time::{Instant, Sleep, sleep_until};

/// Repeating refresh timer that can be cancelled and re-armed with a new period.
///
/// [`RefreshSchedule::tick`] is cancel safe: dropping an in-progress tick leaves the pending
/// deadline in place. Periods longer than [`MAX_REFRESH_INTERVAL`] are clamped to it.
#[derive(Debug)]
pub struct RefreshSchedule {
    period: Duration,
    deadline: Pin<Box<Sleep>>,
}

impl RefreshSchedule {
    /// Arm a schedule whose first tick fires one `period` from now.
    pub fn new(period: Duration) -> Self {
        let period = period.min(MAX_REFRESH_INTERVAL);
        Self {
            period,
            deadline: Box::pin(sleep_until(Instant::now() + period)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_deadline(&self) -> Instant {
        self.deadline.deadline()
    }

    /// Cancel the pending tick and re-arm one `period` from now.
    pub fn reschedule(&mut self, period: Duration) {
        self.period = period.min(MAX_REFRESH_INTERVAL);
        self.deadline.as_mut().reset(Instant::now() + self.period);
    }

    /// Wait for the pending deadline, then arm the next one a full period after it.
    pub async fn tick(&mut self) -> Instant {
        self.deadline.as_mut().await;
        let fired = self.deadline.deadline();
        self.deadline.as_mut().reset(fired + self.period);
        fired
    }
}
