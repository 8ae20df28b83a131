//! MCP tool registration.

pub mod get_text;
pub mod navigate;
pub mod wait_for_text;

use crate::browser::BrowserManager;
use crate::globals::Globals;
use pmcp::TypedTool;
use std::sync::Arc;

/// Register the tools onto the server builder.
///
/// Each tool captures an `Arc<BrowserManager>`; `wait_for_text` also shares
/// the suite globals for timeout resolution.
pub fn register_tools(
    builder: pmcp::ServerBuilder,
    manager: Arc<BrowserManager>,
    globals: Arc<Globals>,
) -> pmcp::ServerBuilder {
    let m = manager.clone();
    let builder = builder.tool(
        "navigate",
        TypedTool::new("navigate", move |input: navigate::NavigateInput, _extra| {
            let m = m.clone();
            Box::pin(async move { navigate::execute(&m, input).await })
        })
        .with_description("Load the page to poll. Returns the resolved URL, title and load time; use wait_for_text for content rendered later."),
    );

    let m = manager.clone();
    let builder = builder.tool(
        "get_text",
        TypedTool::new(
            "get_text",
            move |input: get_text::GetTextInput, _extra| {
                let m = m.clone();
                Box::pin(async move { get_text::execute(&m, input).await })
            },
        )
        .with_description("Read the text content of an element once, by CSS or XPath selector."),
    );

    let m = manager;
    let builder = builder.tool(
        "wait_for_text",
        TypedTool::new(
            "wait_for_text",
            move |input: wait_for_text::WaitForTextInput, _extra| {
                let m = m.clone();
                let g = globals.clone();
                Box::pin(async move { wait_for_text::execute(&m, &g, input).await })
            },
        )
        .with_description(
            "Poll an element's text every 100ms until it satisfies a condition or the timeout elapses. \
             Returns the assertion outcome with elapsed time and attempt count.",
        ),
    );

    builder
}
