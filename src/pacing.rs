//! Request pacing
//!
//! The air-quality API is rate limited, so the collector pauses after every
//! coordinate that consumed an air-quality request. Sleeping goes through
//! [`Sleeper`] so pacing can be observed in tests without real delays.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

/// Suspends the pipeline for a duration
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Pacing policy applied between coordinates
#[async_trait]
pub trait Pacer: Send {
    async fn pause(&mut self);
}

/// Fixed pause after each paced request
#[derive(Debug)]
pub struct IntervalPacer<S = TokioSleeper> {
    interval: Duration,
    sleeper: S,
    pauses: u64,
}

impl IntervalPacer<TokioSleeper> {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self::with_sleeper(interval, TokioSleeper)
    }
}

impl<S: Sleeper> IntervalPacer<S> {
    #[must_use]
    pub fn with_sleeper(interval: Duration, sleeper: S) -> Self {
        Self {
            interval,
            sleeper,
            pauses: 0,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of pauses taken so far
    #[must_use]
    pub fn pauses(&self) -> u64 {
        self.pauses
    }
}

#[async_trait]
impl<S: Sleeper> Pacer for IntervalPacer<S> {
    async fn pause(&mut self) {
        self.pauses += 1;
        if self.interval.is_zero() {
            return;
        }
        trace!("Pausing {:.3}s", self.interval.as_secs_f64());
        self.sleeper.sleep(self.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSleeper {
        slept: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    #[tokio::test]
    async fn test_interval_pacer_sleeps_fixed_interval() {
        let sleeper = RecordingSleeper::default();
        let mut pacer = IntervalPacer::with_sleeper(Duration::from_millis(1500), sleeper.clone());

        pacer.pause().await;
        pacer.pause().await;

        assert_eq!(pacer.pauses(), 2);
        assert_eq!(
            *sleeper.slept.lock().unwrap(),
            vec![Duration::from_millis(1500); 2]
        );
    }

    #[tokio::test]
    async fn test_zero_interval_never_sleeps() {
        let sleeper = RecordingSleeper::default();
        let mut pacer = IntervalPacer::with_sleeper(Duration::ZERO, sleeper.clone());

        pacer.pause().await;

        assert_eq!(pacer.pauses(), 1);
        assert!(sleeper.slept.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tokio_sleeper_waits() {
        let start = std::time::Instant::now();
        let mut pacer = IntervalPacer::new(Duration::from_millis(20));
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(pacer.interval(), Duration::from_millis(20));
    }
}
