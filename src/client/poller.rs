//! Bounded polling for queue items and builds

use std::{future::Future, time::Duration};

use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, instrument};

use super::{
    config::PollingConfig,
    error::{ClientError, Result},
};

/// Outcome of a single poll attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<T> {
    Ready(T),
    Pending,
}

/// Repeats a check at a fixed interval until it is ready or a bound elapses
///
/// A zero bound performs exactly one check. A zero interval with a non-zero
/// bound is rejected before the first check. An error from the check ends
/// polling immediately.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
    bound: Duration,
}

impl Poller {
    /// Create a new poller
    pub fn new(interval: Duration, bound: Duration) -> Self {
        Self { interval, bound }
    }

    /// Poller for queue item resolution
    pub fn for_queue(config: &PollingConfig) -> Self {
        Self::new(config.queue_interval, config.queue_timeout)
    }

    /// Poller for build completion
    pub fn for_build(config: &PollingConfig) -> Self {
        Self::new(config.build_interval, config.build_timeout)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn bound(&self) -> Duration {
        self.bound
    }

    pub fn is_single_shot(&self) -> bool {
        self.bound.is_zero()
    }

    /// Run `check` until it reports [`Progress::Ready`].
    ///
    /// Returns `Ok(None)` when the bound elapsed first.
    #[instrument(skip(self, check), fields(interval = ?self.interval, bound = ?self.bound))]
    pub async fn poll<T, F, Fut>(&self, mut check: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Progress<T>>>,
    {
        if self.is_single_shot() {
            return match check().await? {
                Progress::Ready(value) => Ok(Some(value)),
                Progress::Pending => Ok(None),
            };
        }

        if self.interval.is_zero() {
            return Err(ClientError::config_validation(
                "polling.interval",
                "must be non-zero when the polling bound is non-zero",
            ));
        }

        let started = Instant::now();
        let interval = self.interval;

        let outcome = timeout(self.bound, async move {
            let mut attempt = 0u32;
            loop {
                attempt += 1;
                if let Progress::Ready(value) = check().await? {
                    debug!(attempt, "Poll ready");
                    return Ok::<T, ClientError>(value);
                }

                debug!(attempt, "Still pending, retrying in {:?}", interval);
                sleep(interval).await;
            }
        })
        .await;

        match outcome {
            Ok(result) => result.map(Some),
            Err(_) => {
                debug!(elapsed = ?started.elapsed(), "Poll bound elapsed");
                Ok(None)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::*;

    #[test]
    fn test_poller_from_config() {
        let config = PollingConfig::default();

        let poller = Poller::for_queue(&config);
        assert_eq!(poller.interval(), Duration::from_secs(1));
        assert_eq!(poller.bound(), Duration::from_secs(60));

        let poller = Poller::for_build(&PollingConfig::single_shot());
        assert!(!poller.is_single_shot());
        assert!(Poller::for_queue(&PollingConfig::single_shot()).is_single_shot());
    }

    #[tokio::test]
    async fn test_single_shot_checks_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let poller = Poller::new(Duration::from_millis(1), Duration::ZERO);

        let counter = calls.clone();
        let result: Option<()> = poller
            .poll(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(Progress::Pending) }
            })
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ready_after_pending() {
        let calls = Arc::new(AtomicU32::new(0));
        let poller = Poller::new(Duration::from_millis(5), Duration::from_secs(5));

        let counter = calls.clone();
        let result = poller
            .poll(|| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Ok(Progress::Pending)
                    } else {
                        Ok(Progress::Ready(n))
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, Some(3));
    }

    #[tokio::test]
    async fn test_bound_elapses() {
        let poller = Poller::new(Duration::from_millis(5), Duration::from_millis(50));

        let result: Option<()> = poller
            .poll(|| async { Ok(Progress::Pending) })
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let calls = Arc::new(AtomicU32::new(0));
        let poller = Poller::new(Duration::ZERO, Duration::from_millis(300));

        let counter = calls.clone();
        let result: Result<Option<()>> = poller
            .poll(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(Progress::Pending) }
            })
            .await;

        assert!(matches!(result, Err(ClientError::ConfigValidation { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_interval_allowed_for_single_shot() {
        let poller = Poller::new(Duration::ZERO, Duration::ZERO);

        let result = poller
            .poll(|| async { Ok(Progress::Ready(7)) })
            .await
            .unwrap();

        assert_eq!(result, Some(7));
    }

    #[tokio::test]
    async fn test_error_stops_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let poller = Poller::new(Duration::from_millis(5), Duration::from_secs(5));

        let counter = calls.clone();
        let result: Result<Option<()>> = poller
            .poll(|| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(ClientError::Authentication) }
            })
            .await;

        assert!(matches!(result, Err(ClientError::Authentication)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
