//! Caching reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌───────────────────────────────────────────────┐
//!                          │                CACHING PROXY                  │
//!     Client Request       │  ┌─────────┐    ┌─────────┐    ┌───────────┐  │
//!     ─────────────────────┼─▶│  http   │───▶│ handler │───▶│   cache   │  │
//!                          │  │ server  │    │ key/hit │    │   store   │  │
//!                          │  └─────────┘    └────┬────┘    └─────▲─────┘  │
//!                          │                      │ miss          │ insert │
//!                          │                      ▼               │        │
//!     Client Response      │                 ┌─────────┐          │        │
//!     ◀────────────────────┼─────────────────│ origin  │──────────┘        │
//!                          │                 │ client  │◀──────────────────┼──── Origin
//!                          │                 └─────────┘                   │
//!                          └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use caching_proxy::config::{load_config, Overrides};
use caching_proxy::http::HttpServer;
use caching_proxy::lifecycle::wait_for_signal;
use caching_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "caching-proxy")]
#[command(about = "Caching reverse proxy for a single JSON origin", long_about = None)]
struct Cli {
    /// Port on which the proxy server will run [default: 6000]
    #[arg(short, long)]
    port: Option<u16>,

    /// The origin server to forward requests to (e.g. http://localhost:3000)
    #[arg(short, long)]
    origin: Option<String>,

    /// Optional TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(
        cli.config.as_deref(),
        Overrides {
            port: cli.port,
            origin: cli.origin,
        },
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("caching-proxy: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("caching-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Proxy failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: caching_proxy::ProxyConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        origin = %config.origin.url,
        "Proxy started, forwarding to origin"
    );

    HttpServer::new(config)?
        .run(listener, wait_for_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
