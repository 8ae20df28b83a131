//! Bounded text polling with assertion reporting.
//!
//! [`poller::Poller`] repeatedly fetches a value and evaluates a predicate until
//! it holds or a deadline passes. [`command::WaitForTextCommand`] wraps it into
//! a one-shot "wait for this element's text" step that reports exactly one
//! assertion. `build_server()` exposes the same step as MCP tools backed by a
//! CDP browser.

pub mod browser;
pub mod command;
pub mod condition;
pub mod error;
pub mod fetch;
pub mod globals;
pub mod poller;
pub mod reporter;
pub mod tools;

use browser::{BrowserManager, BrowserManagerConfig};
use globals::Globals;
use pmcp::types::{ServerCapabilities, ToolCapabilities};
use pmcp::Server;
use std::sync::Arc;

pub use command::{Completion, WaitForTextCommand};
pub use condition::TextCondition;
pub use error::{FetchError, PollError};
pub use fetch::{FetchResult, LocateStrategy, Target, TextFetcher};
pub use poller::{FetchFailurePolicy, PollOutcome, Poller};
pub use reporter::{Assertion, AssertionReporter, RecordingReporter, TracingReporter};

/// Build an MCP server exposing the text-wait tools.
///
/// The browser manager is returned alongside so the caller can shut the
/// browser down on exit.
pub fn build_server(
    config: BrowserManagerConfig,
    globals: Globals,
) -> pmcp::Result<(Server, Arc<BrowserManager>)> {
    let manager = Arc::new(BrowserManager::new(config));

    let builder = Server::builder()
        .name("textwait")
        .version(env!("CARGO_PKG_VERSION"))
        .capabilities(ServerCapabilities {
            tools: Some(ToolCapabilities {
                list_changed: Some(true),
            }),
            ..Default::default()
        });

    let builder = tools::register_tools(builder, manager.clone(), Arc::new(globals));

    Ok((builder.build()?, manager))
}
