//! One-second cadence for the countdown.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Source of tick signals.
///
/// `restart` is called whenever a countdown starts so the first tick lands a
/// full period later instead of immediately.
pub trait TickSource {
    fn restart(&mut self);

    /// Resolve at the next tick. Must be cancel-safe: the runner drops the
    /// future whenever a command arrives first.
    fn next_tick(&mut self) -> impl Future<Output = ()> + Send;
}

/// Tokio interval ticking every `period` (one second by default).
pub struct IntervalTicker {
    period: Duration,
    interval: Interval,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            interval: delayed_interval(period),
        }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for IntervalTicker {
    fn restart(&mut self) {
        self.interval = delayed_interval(self.period);
    }

    async fn next_tick(&mut self) {
        self.interval.tick().await;
    }
}

// A slow log write delays the following tick instead of bursting to catch up.
fn delayed_interval(period: Duration) -> Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
