//! LexCompass analysis service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::handlers ──▶ AnalysisOrchestrator
//!                                                              │
//!                                                              ▼
//!                                                     prompts ──▶ TextGenerator (Gemini)
//!                                                              │
//!     Client Response                                          ▼
//!     ◀────────────── http::response ◀──────────────── normalizer
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use lexcompass::analysis::AnalysisOrchestrator;
use lexcompass::config::load_or_default;
use lexcompass::http::HttpServer;
use lexcompass::lifecycle::{spawn_signal_listener, Shutdown};
use lexcompass::observability::{logging, metrics};
use lexcompass::provider::{GeminiGenerator, SamplingConfig};

#[derive(Parser)]
#[command(name = "lexcompass")]
#[command(about = "Contract analysis service", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("lexcompass v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        model = %config.generation.model,
        server_request_secs = config.timeouts.server_request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let generator = GeminiGenerator::from_config(&config.generation).map_err(|e| {
        tracing::error!(error = %e, "Text generator unavailable");
        e
    })?;
    let orchestrator = AnalysisOrchestrator::new(
        Arc::new(generator),
        SamplingConfig::from(&config.generation),
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    HttpServer::new(config, orchestrator).run(listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
