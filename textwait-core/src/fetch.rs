//! The text-fetch seam consumed by the poller.
//!
//! A fetcher reads the current text of a [`Target`]. The locate strategy
//! travels with the target on every call, so concurrent or nested waits never
//! observe each other's strategy.

use crate::error::FetchError;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a fetcher interprets a selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LocateStrategy {
    #[default]
    Css,
    Xpath,
}

impl fmt::Display for LocateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css => f.write_str("css"),
            Self::Xpath => f.write_str("xpath"),
        }
    }
}

/// A selector together with the strategy used to resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub selector: String,
    pub strategy: LocateStrategy,
}

impl Target {
    pub fn new(selector: impl Into<String>, strategy: LocateStrategy) -> Self {
        Self {
            selector: selector.into(),
            strategy,
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(selector, LocateStrategy::Css)
    }

    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::new(selector, LocateStrategy::Xpath)
    }
}

/// Outcome of a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// `false` when the target could not be read (e.g. no matching element).
    pub status_ok: bool,
    pub value: Option<String>,
}

impl FetchResult {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            status_ok: true,
            value: Some(value.into()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status_ok: false,
            value: None,
        }
    }

    /// The text a predicate sees; a readable target without text is empty.
    pub fn text_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// Reads the text of a target.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn get_text(&self, target: &Target) -> Result<FetchResult, FetchError>;
}

#[async_trait]
impl<T: TextFetcher + ?Sized> TextFetcher for Arc<T> {
    async fn get_text(&self, target: &Target) -> Result<FetchResult, FetchError> {
        (**self).get_text(target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_serde() {
        let s: LocateStrategy = serde_json::from_str("\"xpath\"").unwrap();
        assert_eq!(s, LocateStrategy::Xpath);
        assert_eq!(serde_json::to_string(&LocateStrategy::Css).unwrap(), "\"css\"");
        assert_eq!(LocateStrategy::default(), LocateStrategy::Css);
    }

    #[test]
    fn test_text_or_empty() {
        let readable = FetchResult {
            status_ok: true,
            value: None,
        };
        assert_eq!(readable.text_or_empty(), "");
        assert_eq!(FetchResult::text("hi").text_or_empty(), "hi");
        assert!(!FetchResult::unavailable().status_ok);
    }
}
