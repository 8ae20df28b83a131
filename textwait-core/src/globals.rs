//! Suite-wide settings and timeout resolution.
//!
//! Globals are read from a JSON file using the camelCase keys test suites
//! already carry, e.g.:
//!
//! ```json
//! { "waitForConditionTimeout": 8000, "abortOnAssertionFailure": true, "fetchFailure": "retry" }
//! ```

use crate::poller::FetchFailurePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timeout used when neither the caller nor the globals provide one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Globals {
    /// Default wait timeout in milliseconds. Malformed values are dropped.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub wait_for_condition_timeout: Option<u64>,

    /// Passed through on every assertion report.
    #[serde(default)]
    pub abort_on_assertion_failure: bool,

    #[serde(default)]
    pub fetch_failure: FetchFailurePolicy,
}

impl Globals {
    /// Load globals from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read globals: {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse globals: {}", path.display()))
    }

    /// Pick the effective timeout: explicit argument, then globals, then
    /// [`DEFAULT_TIMEOUT`].
    pub fn resolve_timeout(&self, explicit: Option<u64>) -> Duration {
        explicit
            .or(self.wait_for_condition_timeout)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// Accept any JSON value and keep it only if it is a non-negative integer.
///
/// Used for every timeout read from untyped input, so a bad value falls
/// through to the next resolution tier.
pub(crate) fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let millis = value.as_u64();
    if millis.is_none() && !value.is_null() {
        tracing::warn!(%value, "ignoring malformed timeout");
    }
    Ok(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_explicit_timeout_wins() {
        let globals = Globals {
            wait_for_condition_timeout: Some(8000),
            ..Default::default()
        };
        assert_eq!(globals.resolve_timeout(Some(250)), Duration::from_millis(250));
    }

    #[test]
    fn test_global_timeout_used_without_explicit() {
        let globals = Globals {
            wait_for_condition_timeout: Some(8000),
            ..Default::default()
        };
        assert_eq!(globals.resolve_timeout(None), Duration::from_millis(8000));
    }

    #[test]
    fn test_hardcoded_default() {
        assert_eq!(Globals::default().resolve_timeout(None), DEFAULT_TIMEOUT);
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_millis(5000));
    }

    #[test]
    fn test_explicit_zero_is_honored() {
        let globals = Globals {
            wait_for_condition_timeout: Some(8000),
            ..Default::default()
        };
        assert_eq!(globals.resolve_timeout(Some(0)), Duration::ZERO);
    }

    #[test]
    fn test_parse_camel_case_keys() {
        let globals: Globals = serde_json::from_str(
            r#"{"waitForConditionTimeout": 1200, "abortOnAssertionFailure": true, "fetchFailure": "abort"}"#,
        )
        .unwrap();
        assert_eq!(globals.wait_for_condition_timeout, Some(1200));
        assert!(globals.abort_on_assertion_failure);
        assert_eq!(globals.fetch_failure, FetchFailurePolicy::Abort);
    }

    #[test]
    fn test_malformed_timeout_falls_through() {
        for raw in [r#""soon""#, "-5", "1.5", "null", "{}"] {
            let json = format!(r#"{{"waitForConditionTimeout": {}}}"#, raw);
            let globals: Globals = serde_json::from_str(&json).unwrap();
            assert_eq!(globals.wait_for_condition_timeout, None, "input {}", raw);
            assert_eq!(globals.resolve_timeout(None), DEFAULT_TIMEOUT);
        }
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let globals: Globals = serde_json::from_str("{}").unwrap();
        assert_eq!(globals, Globals::default());
        assert_eq!(globals.fetch_failure, FetchFailurePolicy::Retry);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"waitForConditionTimeout": 750}}"#).unwrap();

        let globals = Globals::load(file.path()).unwrap();
        assert_eq!(globals.resolve_timeout(None), Duration::from_millis(750));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Globals::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read globals"));
    }
}
