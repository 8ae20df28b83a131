//! Bounded polling against an abstract fetch operation.
//!
//! The poller owns the retry loop and nothing else: fetch, evaluate the
//! predicate, then either finish or sleep one interval and try again. It never
//! overlaps fetches; the interval for the next attempt starts only once the
//! previous fetch has returned.

use crate::error::{FetchError, PollError};
use crate::fetch::FetchResult;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

/// Interval between attempts unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What to do when a fetch reports the target as unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Count the attempt as "not satisfied" and keep polling.
    #[default]
    Retry,
    /// Stop immediately with [`PollError::TargetUnavailable`].
    Abort,
}

/// Final result of a polling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub succeeded: bool,
    /// Time from session start to success, or to detecting the deadline.
    pub elapsed: Duration,
    pub attempts: u32,
}

impl PollOutcome {
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Retry loop configuration. Cheap to clone; one session per [`Poller::run`].
#[derive(Debug, Clone)]
pub struct Poller {
    timeout: Duration,
    poll_interval: Duration,
    on_unavailable: FetchFailurePolicy,
    cancel: Option<CancellationToken>,
}

impl Poller {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
            on_unavailable: FetchFailurePolicy::default(),
            cancel: None,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_fetch_failure(mut self, policy: FetchFailurePolicy) -> Self {
        self.on_unavailable = policy;
        self
    }

    /// Honor `token` at every suspension point between attempts.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll until `predicate` accepts the fetched text or the timeout elapses.
    ///
    /// The first fetch is always made, even with a zero timeout. A timeout is
    /// reported as `Ok` with `succeeded == false`; `Err` is reserved for fetch
    /// errors, an unavailable target under [`FetchFailurePolicy::Abort`],
    /// cancellation and a zero poll interval.
    pub async fn run<F, Fut, P>(&self, mut fetch: F, predicate: P) -> Result<PollOutcome, PollError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<FetchResult, FetchError>>,
        P: Fn(&str) -> bool,
    {
        if self.poll_interval.is_zero() {
            return Err(PollError::InvalidInterval);
        }

        let start = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let result = fetch()
                .await
                .map_err(|source| PollError::Fetch {
                    attempt: attempts,
                    source,
                })?;

            if result.status_ok {
                if predicate(result.text_or_empty()) {
                    let elapsed = start.elapsed();
                    tracing::debug!(attempts, elapsed_ms = elapsed.as_millis() as u64, "condition met");
                    return Ok(PollOutcome {
                        succeeded: true,
                        elapsed,
                        attempts,
                    });
                }
            } else if self.on_unavailable == FetchFailurePolicy::Abort {
                return Err(PollError::TargetUnavailable {
                    attempts,
                    elapsed: start.elapsed(),
                });
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                tracing::debug!(attempts, elapsed_ms = elapsed.as_millis() as u64, "deadline exceeded");
                return Ok(PollOutcome {
                    succeeded: false,
                    elapsed,
                    attempts,
                });
            }

            tracing::trace!(
                attempt = attempts,
                status_ok = result.status_ok,
                elapsed_ms = elapsed.as_millis() as u64,
                "condition not met, retrying"
            );

            match &self.cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            return Err(PollError::Cancelled {
                                attempts,
                                elapsed: start.elapsed(),
                            });
                        }
                        _ = sleep(self.poll_interval) => {}
                    }
                }
                None => sleep(self.poll_interval).await,
            }
        }
    }
}
