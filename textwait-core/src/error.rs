//! Error types for fetching and polling.

use std::time::Duration;
use thiserror::Error;

/// Hard failure raised by a [`TextFetcher`](crate::fetch::TextFetcher).
///
/// A target that simply is not there yet is *not* an error; fetchers report
/// that through [`FetchResult::unavailable`](crate::fetch::FetchResult::unavailable).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backing browser or page could not be reached.
    #[error("browser unavailable: {0}")]
    Browser(String),
}

/// Reasons a polling session ends without producing a [`PollOutcome`](crate::poller::PollOutcome).
#[derive(Debug, Error)]
pub enum PollError {
    #[error("poll interval must be greater than zero")]
    InvalidInterval,

    #[error("fetch failed on attempt {attempt}: {source}")]
    Fetch {
        attempt: u32,
        #[source]
        source: FetchError,
    },

    #[error("target unavailable on attempt {attempts} after {} ms", .elapsed.as_millis())]
    TargetUnavailable { attempts: u32, elapsed: Duration },

    #[error("polling cancelled after {attempts} attempt(s) and {} ms", .elapsed.as_millis())]
    Cancelled { attempts: u32, elapsed: Duration },
}
