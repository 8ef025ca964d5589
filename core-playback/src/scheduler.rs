//! # Progress Scheduler
//!
//! Fixed-period ticker armed while the controller is playing.
//!
//! The scheduler does not sample the resource itself. Each tick invokes a
//! callback with the scheduler's current epoch; the controller posts that to
//! its own mailbox and checks [`ProgressScheduler::accepts`] before emitting a
//! sample. Every [`start`](ProgressScheduler::start) bumps the epoch, so ticks
//! queued before a [`stop`](ProgressScheduler::stop) are recognizably stale.

use core_async::sync::CancellationToken;
use core_async::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::trace;

#[derive(Debug)]
pub struct ProgressScheduler {
    period: Duration,
    epoch: u64,
    running: Option<CancellationToken>,
}

impl ProgressScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            epoch: 0,
            running: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// `true` if a tick stamped with `epoch` belongs to the live arming.
    pub fn accepts(&self, epoch: u64) -> bool {
        self.is_running() && epoch == self.epoch
    }

    /// Arm the ticker. No-op while already running.
    ///
    /// The first tick fires one period after arming. `on_tick` returning
    /// `false` ends the ticker task.
    pub fn start<F>(&mut self, on_tick: F)
    where
        F: Fn(u64) -> bool + Send + 'static,
    {
        if self.running.is_some() {
            return;
        }

        self.epoch += 1;
        let epoch = self.epoch;
        let period = self.period;
        let token = CancellationToken::new();
        let cancelled = token.clone();

        core_async::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        if !on_tick(epoch) {
                            break;
                        }
                    }
                }
            }
            trace!(epoch, "Progress ticker exited");
        });

        self.running = Some(token);
    }

    /// Disarm the ticker. Ticks already in flight fail [`accepts`](Self::accepts).
    pub fn stop(&mut self) {
        if let Some(token) = self.running.take() {
            token.cancel();
        }
    }
}

impl Drop for ProgressScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
