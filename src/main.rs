//! Ethereum Explorer Proxy
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                EXPLORER PROXY                │
//!   Browser            │                                              │
//!   (static page) ─────┼─▶ cors ─▶ request id ─▶ trace ─▶ rate limit  │
//!                      │                                  │           │
//!                      │                                  ▼           │
//!                      │                    handlers (validate input) │
//!                      │                                  │           │
//!                      │                                  ▼           │
//!   JSON / error  ◀────┼─── response ◀── lookup ◀── etherscan client ─┼──▶ Etherscan v2
//!   envelope           │                             (pacer, timeout) │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use explorer_proxy::config::resolve_config;
use explorer_proxy::lifecycle::wait_for_signal;
use explorer_proxy::observability::{logging, metrics};
use explorer_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "explorer-proxy")]
#[command(about = "Etherscan lookup proxy for the explorer frontend", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "EXPLORER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local development keeps ETHERSCAN_APIKEY in .env
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("explorer-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_key_loaded = config.upstream.has_api_key(),
        chain_id = config.upstream.chain_id,
        rate_limit = config.rate_limit.enabled,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        "Configuration loaded"
    );
    if !config.upstream.has_api_key() {
        tracing::warn!("No Etherscan API key; upstream calls are paced at one per 5 seconds");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
