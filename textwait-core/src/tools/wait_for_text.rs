//! Wait for an element's text to satisfy a condition.

use crate::browser::BrowserManager;
use crate::command::WaitForTextCommand;
use crate::condition::TextCondition;
use crate::fetch::{LocateStrategy, Target};
use crate::globals::Globals;
use crate::reporter::TracingReporter;
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct WaitForTextInput {
    /// Selector of the element whose text is polled
    #[validate(length(min = 1))]
    #[schemars(description = "Selector of the element whose text is polled")]
    pub selector: String,

    #[serde(default)]
    #[schemars(description = "Selector strategy: \"css\" (default) or \"xpath\"")]
    pub strategy: LocateStrategy,

    #[schemars(
        description = "Condition the text must satisfy, e.g. {\"kind\": \"contains\", \"value\": \"Done\"}"
    )]
    pub condition: TextCondition,

    /// Maximum time to wait in milliseconds; malformed values are ignored
    #[serde(default, deserialize_with = "crate::globals::lenient_millis")]
    #[validate(range(max = 120000))]
    #[schemars(
        description = "Maximum time to wait in milliseconds (default: waitForConditionTimeout global, else 5000)"
    )]
    pub timeout_ms: Option<u64>,
}

pub async fn execute(
    manager: &Arc<BrowserManager>,
    globals: &Globals,
    input: WaitForTextInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let description = input.condition.describe();
    let command = WaitForTextCommand::new(manager.clone(), Arc::new(TracingReporter))
        .with_globals(globals.clone());

    let completion = command
        .run(
            Target::new(input.selector, input.strategy),
            input.condition.into_predicate(),
            input.timeout_ms,
        )
        .await;

    Ok(json!({
        "passed": completion.passed(),
        "selector": completion.selector,
        "strategy": completion.strategy,
        "condition": description,
        "timeout_ms": completion.timeout.as_millis() as u64,
        "elapsed_ms": completion.outcome.map(|o| o.elapsed_ms() as u64),
        "attempts": completion.outcome.map(|o| o.attempts),
        "error": completion.error,
        "assertion": completion.assertion
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_input() {
        let input: WaitForTextInput = serde_json::from_value(json!({
            "selector": "//h1",
            "strategy": "xpath",
            "condition": { "kind": "equals", "value": "Example Domain" },
            "timeout_ms": 2000
        }))
        .unwrap();

        assert_eq!(input.strategy, LocateStrategy::Xpath);
        assert_eq!(input.condition, TextCondition::Equals("Example Domain".into()));
        assert_eq!(input.timeout_ms, Some(2000));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_timeout_is_optional_and_bounded() {
        let input: WaitForTextInput = serde_json::from_value(json!({
            "selector": "#status",
            "condition": { "kind": "not_empty" }
        }))
        .unwrap();
        assert_eq!(input.timeout_ms, None);
        assert!(input.validate().is_ok());

        let input: WaitForTextInput = serde_json::from_value(json!({
            "selector": "#status",
            "condition": { "kind": "not_empty" },
            "timeout_ms": 600000
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_malformed_timeout_falls_back_to_globals() {
        let with_global = Globals {
            wait_for_condition_timeout: Some(1200),
            ..Default::default()
        };

        for raw in [json!("soon"), json!(-5), json!(1.5)] {
            let input: WaitForTextInput = serde_json::from_value(json!({
                "selector": "#status",
                "condition": { "kind": "not_empty" },
                "timeout_ms": raw
            }))
            .unwrap();

            assert_eq!(input.timeout_ms, None);
            assert!(input.validate().is_ok());
            assert_eq!(
                with_global.resolve_timeout(input.timeout_ms),
                Duration::from_millis(1200)
            );
            assert_eq!(
                Globals::default().resolve_timeout(input.timeout_ms),
                Duration::from_millis(5000)
            );
        }
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<WaitForTextInput, _> = serde_json::from_value(json!({
            "selector": "#status",
            "condition": { "kind": "not_empty" },
            "poll_interval_ms": 10
        }));
        assert!(result.is_err());
    }
}
