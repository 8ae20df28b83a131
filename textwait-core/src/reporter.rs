//! Assertion reporting.

use serde::Serialize;
use std::sync::Mutex;

/// One pass/fail record handed to the surrounding test framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assertion {
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub message: String,
    pub abort_on_failure: bool,
}

pub trait AssertionReporter: Send + Sync {
    fn assertion(&self, assertion: Assertion);
}

/// Reports assertions to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl AssertionReporter for TracingReporter {
    fn assertion(&self, assertion: Assertion) {
        if assertion.passed {
            tracing::info!(expected = %assertion.expected, "{}", assertion.message);
        } else {
            tracing::warn!(
                expected = %assertion.expected,
                actual = %assertion.actual,
                abort_on_failure = assertion.abort_on_failure,
                "{}",
                assertion.message
            );
        }
    }
}

/// Keeps every reported assertion in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    assertions: Mutex<Vec<Assertion>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assertions(&self) -> Vec<Assertion> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Assertion>> {
        // A panic while holding the lock cannot leave a Vec half-pushed.
        self.assertions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AssertionReporter for RecordingReporter {
    fn assertion(&self, assertion: Assertion) {
        self.lock().push(assertion);
    }
}
