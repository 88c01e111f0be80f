//! Inter-cycle timing
//!
//! The monitor sleeps for a fixed interval after every cycle. There is no
//! backoff and no jitter: the pause is the same whatever the previous cycle
//! did. The sleep ends early when the cancellation token fires.

use crate::config::MonitorConfig;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fixed-interval pacing for the monitoring loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(Duration::from_millis(config.interval_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the configured interval
    ///
    /// # Returns
    ///
    /// * `true` - The interval elapsed; run the next cycle
    /// * `false` - Cancelled while waiting (or before)
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Cancelled during inter-cycle wait");
                false
            }
            _ = tokio::time::sleep(self.interval) => true,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}
