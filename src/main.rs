//! joke-api - Joke collection HTTP service
//!
//! # Usage
//!
//! ```bash
//! # Serve ./jokes.json on port 3000
//! cargo run --release
//!
//! # Different port and backing file
//! PORT=8080 ./joke-api --data-file /var/lib/jokes/jokes.json
//! ```
//!
//! # Environment Variables
//!
//! - `PORT`: Listen port (default: 3000)
//! - `JOKES_HOST`: Listen host (default: 0.0.0.0)
//! - `JOKES_FILE`: Backing JSON file (default: jokes.json)
//! - `JOKES_PERSIST_ON_CLEAR`: Rewrite the file on `DELETE /jokes` (default: false)
//! - `JOKES_CONFIG`: Path to a TOML config file (default: ./jokes.toml if present)
//! - `JOKES_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::info;

use joke_api::{create_app, ApiState, JokeStore, ServerConfig};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "joke-api")]
#[command(about = "Joke collection HTTP service backed by a JSON file")]
#[command(version)]
struct CliArgs {
    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the backing JSON file
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Rewrite the backing file when all jokes are deleted
    #[arg(long)]
    persist_on_clear: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "JOKES_LOG_FORMAT")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl CliArgs {
    /// CLI flags take precedence over file and environment.
    fn apply_to(&self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(path) = &self.data_file {
            config.data_file.clone_from(path);
        }
        if self.persist_on_clear {
            config.persist_on_clear = true;
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_format);

    let mut config = ServerConfig::load().context("Failed to load configuration")?;
    args.apply_to(&mut config);
    info!(
        data_file = %config.data_file.display(),
        persist_on_clear = config.persist_on_clear,
        "Configuration loaded"
    );

    let store = JokeStore::open(config.store_options()).await;
    let app = create_app(ApiState::new(store.clone()));

    let server_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("Server is running on {}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel_token.cancelled().await })
        .await
        .context("HTTP server error")?;

    // Let queued backing-file writes land before exiting.
    store.flush().await;
    info!("joke-api shutdown complete");
    Ok(())
}
