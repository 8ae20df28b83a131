//! Text-wait MCP server binary.
//!
//! Serves `navigate`, `get_text` and `wait_for_text` over Streamable HTTP,
//! backed by a headless (or attached) Chrome instance.

use clap::Parser;
use std::path::PathBuf;
use textwait_core::browser::BrowserManagerConfig;
use textwait_core::globals::Globals;

#[derive(Parser)]
#[command(name = "textwait-server", about = "Wait-for-text MCP server")]
struct Cli {
    #[clap(flatten)]
    server: server_common::CliArgs,

    /// Custom Chrome/Edge binary path
    #[clap(long)]
    browser_path: Option<String>,

    /// Connect to already-running browser via CDP URL
    #[clap(long)]
    cdp_url: Option<String>,

    /// Run browser in headless mode
    #[clap(long, default_value = "true", action = clap::ArgAction::Set)]
    headless: bool,

    /// JSON file with suite globals (waitForConditionTimeout, ...)
    #[clap(long)]
    globals: Option<PathBuf>,

    /// Default wait timeout in milliseconds; overrides the globals file
    #[clap(long)]
    wait_for_condition_timeout: Option<u64>,
}

impl Cli {
    fn load_globals(&self) -> anyhow::Result<Globals> {
        let mut globals = match &self.globals {
            Some(path) => Globals::load(path)?,
            None => Globals::default(),
        };
        if let Some(ms) = self.wait_for_condition_timeout {
            globals.wait_for_condition_timeout = Some(ms);
        }
        Ok(globals)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    server_common::init_logging();

    let globals = cli.load_globals()?;
    tracing::info!(
        default_timeout_ms = globals.resolve_timeout(None).as_millis() as u64,
        fetch_failure = ?globals.fetch_failure,
        "Loaded globals"
    );

    let config = BrowserManagerConfig {
        browser_path: cli.browser_path.clone(),
        cdp_url: cli.cdp_url.clone(),
        headless: cli.headless,
        ..Default::default()
    };

    let (server, manager) = textwait_core::build_server(config, globals)?;

    tokio::select! {
        result = server_common::run_http(server, &cli.server) => {
            manager.shutdown().await;
            result
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down browser");
            manager.shutdown().await;
            Ok(())
        }
    }
}
