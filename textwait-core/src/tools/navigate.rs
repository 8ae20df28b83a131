//! Load the page whose elements `get_text` and `wait_for_text` will read.
//!
//! Navigation only waits for the load event. Content rendered afterwards is
//! what `wait_for_text` polls for, so the response reports the starting point
//! of that wait: the resolved URL and the page title at load time.

use crate::browser::BrowserManager;
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use validator::Validate;

fn default_load_timeout_ms() -> u64 {
    30000
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct NavigateInput {
    #[validate(url)]
    #[schemars(description = "URL of the page to poll")]
    pub url: String,

    #[serde(default = "default_load_timeout_ms")]
    #[validate(range(min = 1000, max = 120000))]
    #[schemars(
        description = "Page load timeout in milliseconds (default: 30000). Independent of the wait_for_text timeout."
    )]
    pub load_timeout_ms: u64,
}

pub async fn execute(
    manager: &Arc<BrowserManager>,
    input: NavigateInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let page = manager
        .page()
        .await
        .map_err(|e| Error::internal(format!("Browser error: {}", e)))?;

    let started = Instant::now();
    tokio::time::timeout(
        Duration::from_millis(input.load_timeout_ms),
        page.goto(&input.url),
    )
    .await
    .map_err(|_| {
        Error::internal(format!(
            "Page '{}' did not load within {}ms",
            input.url, input.load_timeout_ms
        ))
    })?
    .map_err(|e| Error::internal(format!("Navigation failed: {}", e)))?;
    let load_ms = started.elapsed().as_millis() as u64;

    let loaded_url = page
        .url()
        .await
        .map_err(|e| Error::internal(format!("Failed to get URL: {}", e)))?
        .unwrap_or_default();

    // Title is informational; a page without one is still ready to poll
    let title = page.get_title().await.ok().flatten();

    tracing::debug!(requested = %input.url, url = %loaded_url, load_ms, "page loaded");

    Ok(json!({
        "status": "ready_to_poll",
        "url": loaded_url,
        "title": title,
        "load_ms": load_ms
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_timeout_default() {
        let input: NavigateInput =
            serde_json::from_value(json!({ "url": "https://example.com" })).unwrap();
        assert_eq!(input.load_timeout_ms, 30000);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_url_and_short_timeout() {
        let input: NavigateInput = serde_json::from_value(json!({ "url": "not a url" })).unwrap();
        assert!(input.validate().is_err());

        let input: NavigateInput = serde_json::from_value(
            json!({ "url": "https://example.com", "load_timeout_ms": 10 }),
        )
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_data_urls_are_accepted() {
        let input: NavigateInput =
            serde_json::from_value(json!({ "url": "data:text/html,<p>Loading</p>" }))
                .unwrap();
        assert!(input.validate().is_ok());
    }
}
