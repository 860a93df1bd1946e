// src/batch/rate.rs
// =============================================================================
// Keeps our request rate under the API's limit.
//
// The Indexing API allows about 200 publish calls per minute.
// 200 / 60 = ~3.3 calls per second, so waiting 300ms between calls keeps
// us safely below it. The driver calls pause() between URLs (never after
// the last one).
//
// The actual sleeping is behind the Sleeper trait so tests can record the
// pauses instead of waiting for real.
// =============================================================================

use async_trait::async_trait;
use std::time::Duration;

/// Default gap between two publish calls
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

#[async_trait]
pub trait Sleeper: Send {
    async fn sleep(&mut self, duration: Duration);
}

// Real sleeping on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// Waits a fixed interval every time pause() is called
#[derive(Debug)]
pub struct FixedIntervalGate<S> {
    interval: Duration,
    sleeper: S,
}

impl FixedIntervalGate<TokioSleeper> {
    pub fn new(interval: Duration) -> Self {
        Self::with_sleeper(interval, TokioSleeper)
    }
}

impl<S: Sleeper> FixedIntervalGate<S> {
    pub fn with_sleeper(interval: Duration, sleeper: S) -> Self {
        Self { interval, sleeper }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn pause(&mut self) {
        if self.interval.is_zero() {
            return;
        }
        tracing::trace!(
            interval_ms = self.interval.as_millis() as u64,
            "pausing before next request"
        );
        self.sleeper.sleep(self.interval).await;
    }

    #[cfg(test)]
    pub(crate) fn sleeper(&self) -> &S {
        &self.sleeper
    }
}
