//! Emotion Lens Daemon - emotion analysis proxy for the AI gateway
//!
//! Accepts text, voice and webcam captures over HTTP, forwards them to the
//! configured chat-completions gateway and returns a normalized result.

use anyhow::{Context, Result};
use clap::Parser;
use emotiond::config::EmotionConfig;
use emotiond::dispatcher::Dispatcher;
use emotiond::metrics::AnalyzeMetrics;
use emotiond::server::{self, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "emotiond")]
#[command(about = "Emotion Lens daemon - emotion analysis proxy", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: /etc/emotion-lens/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides server.bind
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("[BOOT] Emotion Lens daemon v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = EmotionConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    config.gateway.resolve_api_key();
    info!("[BOOT] Gateway {} (model {})", config.gateway.url, config.gateway.model);

    let dispatcher = Dispatcher::new(&config.gateway)?;
    let metrics = AnalyzeMetrics::new().context("Failed to register metrics")?;

    server::run(&config.server, AppState::new(dispatcher, metrics)).await
}
