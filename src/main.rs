//! Bender site frontend.
//!
//! Serves skinned article pages and forwards browser API calls to the
//! backend service.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                 bender-web                   │
//!   Browser           │  ┌────────┐   ┌──────────┐   ┌───────────┐   │
//!   ──── /api_proxy ──┼─▶│ server │──▶│ gateway  │──▶│ upstream  │───┼──▶ Backend API
//!   ──── /api/...     │  │        │   │ +routing │   │  client   │   │    (/api/...)
//!                     │  │        │   └──────────┘   └─────▲─────┘   │
//!   ──── /articles/id─┼─▶│        │──▶ pages ──▶ skins ─────┘         │
//!                     │  └────────┘      registry + renderer         │
//!                     │                  (template | fallback)       │
//!                     └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use bender_web::config::{self, BenderConfig};
use bender_web::observability::{logging, metrics};
use bender_web::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "bender-web", version, about = "Bender site frontend and API gateway")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "BENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => BenderConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        "bender-web starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        connect_timeout_secs = config.timeouts.connect_secs,
        request_timeout_secs = config.timeouts.request_secs,
        template_root = %config.templates.root.display(),
        "Configuration loaded"
    );

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
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
