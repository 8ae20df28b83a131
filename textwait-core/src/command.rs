//! One-shot "wait for this element's text" command.
//!
//! Resolves the timeout, drives a [`Poller`] against a [`TextFetcher`], turns
//! the result into exactly one [`Assertion`] and completes exactly once.

use crate::error::PollError;
use crate::fetch::{LocateStrategy, Target, TextFetcher};
use crate::globals::Globals;
use crate::poller::{PollOutcome, Poller, DEFAULT_POLL_INTERVAL};
use crate::reporter::{Assertion, AssertionReporter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// The command always polls at this rate.
pub const POLL_INTERVAL: Duration = DEFAULT_POLL_INTERVAL;

const EXPECTED_LABEL: &str = "expression true";
const ACTUAL_TRUE: &str = "expression true";
const ACTUAL_FALSE: &str = "expression false";

/// Terminal result of one command invocation.
#[derive(Debug, Clone)]
pub struct Completion {
    pub selector: String,
    pub strategy: LocateStrategy,
    pub timeout: Duration,
    /// `None` when the session ended with an error instead of an outcome.
    pub outcome: Option<PollOutcome>,
    pub error: Option<String>,
    pub assertion: Assertion,
}

impl Completion {
    pub fn passed(&self) -> bool {
        self.assertion.passed
    }
}

#[derive(Clone)]
pub struct WaitForTextCommand {
    fetcher: Arc<dyn TextFetcher>,
    reporter: Arc<dyn AssertionReporter>,
    globals: Globals,
    cancel: Option<CancellationToken>,
}

impl WaitForTextCommand {
    pub fn new(fetcher: Arc<dyn TextFetcher>, reporter: Arc<dyn AssertionReporter>) -> Self {
        Self {
            fetcher,
            reporter,
            globals: Globals::default(),
            cancel: None,
        }
    }

    pub fn with_globals(mut self, globals: Globals) -> Self {
        self.globals = globals;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Wait until `predicate` accepts the target's text.
    ///
    /// Never fails: every outcome, including fetch errors and cancellation, is
    /// reported as an assertion and returned as a [`Completion`].
    pub async fn run<P>(&self, target: Target, predicate: P, timeout_ms: Option<u64>) -> Completion
    where
        P: Fn(&str) -> bool,
    {
        let timeout = self.globals.resolve_timeout(timeout_ms);
        let mut poller = Poller::new(timeout)
            .with_poll_interval(POLL_INTERVAL)
            .with_fetch_failure(self.globals.fetch_failure);
        if let Some(token) = &self.cancel {
            poller = poller.with_cancellation(token.clone());
        }

        tracing::debug!(
            selector = %target.selector,
            strategy = %target.strategy,
            timeout_ms = timeout.as_millis() as u64,
            "waitForText started"
        );

        let fetcher = &self.fetcher;
        let result = poller.run(|| fetcher.get_text(&target), predicate).await;
        let completion = self.complete(target, timeout, result);
        self.reporter.assertion(completion.assertion.clone());

        tracing::info!(
            selector = %completion.selector,
            passed = completion.passed(),
            attempts = completion.outcome.map(|o| o.attempts),
            "waitForText complete"
        );
        completion
    }

    /// Run on a separate task and deliver the completion over a one-shot channel.
    pub fn spawn<P>(
        &self,
        target: Target,
        predicate: P,
        timeout_ms: Option<u64>,
    ) -> oneshot::Receiver<Completion>
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let command = self.clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let completion = command.run(target, predicate, timeout_ms).await;
            let _ = tx.send(completion);
        });
        rx
    }

    fn complete(
        &self,
        target: Target,
        timeout: Duration,
        result: Result<PollOutcome, PollError>,
    ) -> Completion {
        let (outcome, error, passed, message) = match result {
            Ok(outcome) if outcome.succeeded => {
                let message = format!(
                    "waitForText: {}. Expression was true after {} ms.",
                    target.selector,
                    outcome.elapsed_ms()
                );
                (Some(outcome), None, true, message)
            }
            Ok(outcome) => {
                let message = format!(
                    "waitForText: {}. Expression wasn't true in {} ms.",
                    target.selector,
                    timeout.as_millis()
                );
                (Some(outcome), None, false, message)
            }
            Err(e) => {
                let message = format!(
                    "waitForText: {}. Expression could not be evaluated: {}.",
                    target.selector, e
                );
                (None, Some(e.to_string()), false, message)
            }
        };

        Completion {
            selector: target.selector,
            strategy: target.strategy,
            timeout,
            outcome,
            error,
            assertion: Assertion {
                passed,
                expected: EXPECTED_LABEL.to_string(),
                actual: if passed { ACTUAL_TRUE } else { ACTUAL_FALSE }.to_string(),
                message,
                abort_on_failure: self.globals.abort_on_assertion_failure,
            },
        }
    }
}
