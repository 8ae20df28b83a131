//! Shared bootstrap for the workspace binaries: CLI arguments, logging and
//! the Streamable HTTP transport.

use pmcp::server::streamable_http_server::{StreamableHttpServer, StreamableHttpServerConfig};
use pmcp::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Transport arguments shared by every server binary.
#[derive(Debug, Clone, clap::Args)]
pub struct CliArgs {
    /// Host to bind to
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[clap(long, default_value = "3100")]
    pub port: u16,
}

impl CliArgs {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Serve an MCP server over Streamable HTTP until the transport stops.
pub async fn run_http(server: Server, args: &CliArgs) -> anyhow::Result<()> {
    let addr = args.socket_addr()?;

    tracing::info!(host = %args.host, port = args.port, "Starting MCP HTTP server");

    let server = Arc::new(Mutex::new(server));

    let config = StreamableHttpServerConfig {
        session_id_generator: None,
        enable_json_response: true,
        event_store: None,
        on_session_initialized: None,
        on_session_closed: None,
        http_middleware: None,
    };

    let http_server = StreamableHttpServer::with_config(addr, server, config);
    let (bound_addr, server_handle) = http_server.start().await?;

    tracing::info!("MCP server listening on http://{}/mcp", bound_addr);

    server_handle.await?;

    Ok(())
}
