//! Upload server binary
//!
//! Run with: cargo run -p apnea-backend --bin apnea-backend-server -- --config apnea.toml

use apnea_backend::{config::AppConfig, server::ApneaServer};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML config file (falls back to $APNEA_CONFIG, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apnea_backend=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());
    tracing::info!("  - Repair: {}", config.pipeline.repair.program);
    tracing::info!("  - Conversion: {}", config.pipeline.conversion.program);
    if config.pipeline.run_analysis {
        tracing::info!("  - Analysis: {}", config.pipeline.analysis.program);
    } else {
        tracing::info!("  - Analysis: disabled");
    }

    let server = ApneaServer::new(config);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload              - Upload a recording (file, channel_number)");
    println!("  GET  /status/:filename    - Processing status");
    println!("  GET  /results/:filename   - Analysis results");
    println!("  GET  /jobs                - All jobs");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
