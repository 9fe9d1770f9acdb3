mod config;
mod handler;
mod health;
mod responder;
mod voice;

use std::sync::Arc;

use anyhow::Context as _;
use serenity::prelude::*;
use songbird::SerenityInit;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

use config::Config;
use handler::Handler;
use health::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "kuukibot.json".to_string());
    let config = Config::load(&config_path)?;

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir '{}'", log_dir.display()))?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("kuukibot.log"))
        .context("failed to open log file")?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("🚀 Starting kuukibot...");
    info!("Loaded config from {config_path}");
    info!(
        "{} rules, rate limit {}/{}s",
        config.rules.len(),
        config.rate_limit.max_responses,
        config.rate_limit.window_secs
    );

    let health_state = AppState::new();
    if let Some(port) = config.health_port {
        let state = health_state.clone();
        tokio::spawn(async move {
            if let Err(e) = health::serve(state, port).await {
                error!("keep-alive server error: {e}");
            }
        });
    }

    let config = Arc::new(config);
    let mut client = Client::builder(&config.discord_token, Handler::intents())
        .event_handler(Handler::new(config.clone(), health_state))
        .register_songbird()
        .await
        .map_err(|e| anyhow::anyhow!("failed to create Discord client: {e}"))?;

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                Err(e) => {
                    error!("failed to install SIGTERM handler: {e}");
                    tokio::signal::ctrl_c().await.ok();
                }
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    // Blocks until all shards are stopped.
    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {e}"))?;

    info!("kuukibot stopped");
    Ok(())
}
