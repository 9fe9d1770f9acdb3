//! Keep-alive HTTP server.
//!
//! Free hosting platforms idle the process unless something answers
//! HTTP, so this exposes a root ping plus small health endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub bot_user: Option<String>,
    pub uptime_secs: u64,
}

/// State shared between the gateway side and the HTTP endpoints.
#[derive(Clone)]
pub struct AppState {
    start_time: SystemTime,
    bot_user: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            start_time: SystemTime::now(),
            bot_user: Arc::new(RwLock::new(None)),
        }
    }

    /// Record the bot account name once the gateway session is ready.
    pub async fn set_bot_user(&self, name: String) {
        let mut guard = self.bot_user.write().await;
        *guard = Some(name);
    }

    pub async fn bot_user(&self) -> Option<String> {
        self.bot_user.read().await.clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

async fn root_handler() -> &'static str {
    "Bot is running!"
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let uptime = state.start_time.elapsed().unwrap_or_default().as_secs();
    let bot_user = state.bot_user().await;

    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok".to_string(),
            bot_user,
            uptime_secs: uptime,
        }),
    )
}

async fn live_handler() -> StatusCode {
    StatusCode::OK
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Run the keep-alive server until the process exits.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("keep-alive server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
