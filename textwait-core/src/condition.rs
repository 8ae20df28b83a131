//! Serializable text predicates.
//!
//! Callers that hold a closure pass it straight to the command. Callers that
//! speak JSON (the MCP tools) describe the predicate with a [`TextCondition`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TextCondition {
    Equals(String),
    Contains(String),
    NotContains(String),
    StartsWith(String),
    EndsWith(String),
    NotEmpty,
}

impl TextCondition {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Equals(expected) => text == expected,
            Self::Contains(needle) => text.contains(needle.as_str()),
            Self::NotContains(needle) => !text.contains(needle.as_str()),
            Self::StartsWith(prefix) => text.starts_with(prefix.as_str()),
            Self::EndsWith(suffix) => text.ends_with(suffix.as_str()),
            Self::NotEmpty => !text.trim().is_empty(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Equals(v) => format!("text equals {:?}", v),
            Self::Contains(v) => format!("text contains {:?}", v),
            Self::NotContains(v) => format!("text does not contain {:?}", v),
            Self::StartsWith(v) => format!("text starts with {:?}", v),
            Self::EndsWith(v) => format!("text ends with {:?}", v),
            Self::NotEmpty => "text is not empty".to_string(),
        }
    }

    /// Turn the condition into a predicate closure for the poller.
    pub fn into_predicate(self) -> impl Fn(&str) -> bool + Send + Sync + 'static {
        move |text: &str| self.matches(text)
    }
}
