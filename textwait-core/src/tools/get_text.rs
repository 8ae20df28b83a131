//! Read the text content of an element once.

use crate::browser::BrowserManager;
use crate::fetch::{LocateStrategy, Target, TextFetcher};
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct GetTextInput {
    /// Selector of the element to read
    #[validate(length(min = 1))]
    #[schemars(description = "Selector of the element to get text from")]
    pub selector: String,

    /// How the selector is interpreted
    #[serde(default)]
    #[schemars(description = "Selector strategy: \"css\" (default) or \"xpath\"")]
    pub strategy: LocateStrategy,
}

pub async fn execute(
    manager: &Arc<BrowserManager>,
    input: GetTextInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let target = Target::new(input.selector, input.strategy);
    let result = manager
        .get_text(&target)
        .await
        .map_err(|e| Error::internal(format!("Failed to get text from '{}': {}", target.selector, e)))?;

    if !result.status_ok {
        return Err(Error::internal(format!(
            "Element not found '{}' ({})",
            target.selector, target.strategy
        )));
    }

    Ok(json!({
        "text": result.text_or_empty(),
        "selector": target.selector,
        "strategy": target.strategy
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_defaults_to_css() {
        let input: GetTextInput = serde_json::from_value(json!({ "selector": "h1" })).unwrap();
        assert_eq!(input.strategy, LocateStrategy::Css);
    }

    #[test]
    fn test_rejects_empty_selector() {
        let input: GetTextInput = serde_json::from_value(json!({ "selector": "" })).unwrap();
        assert!(input.validate().is_err());
    }
}
