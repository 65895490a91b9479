//! Health check endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

use fleet_relay::RelayQueue;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub uptime_secs: u64,
    pub queue_depth: usize,
    /// Per-identity gateway connection state.
    pub identities: HashMap<String, bool>,
}

/// Shared application state for health checks
#[derive(Clone)]
pub struct AppState {
    start_time: SystemTime,
    queue: Arc<RelayQueue>,
    connected: Arc<RwLock<HashMap<String, bool>>>,
}

impl AppState {
    pub fn new(queue: Arc<RelayQueue>, identities: impl IntoIterator<Item = String>) -> Self {
        let connected = identities.into_iter().map(|name| (name, false)).collect();
        Self {
            start_time: SystemTime::now(),
            queue,
            connected: Arc::new(RwLock::new(connected)),
        }
    }

    /// Mark an identity's gateway connection as established.
    pub async fn set_connected(&self, identity: &str) {
        let mut guard = self.connected.write().await;
        guard.insert(identity.to_string(), true);
    }

    pub async fn snapshot(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            uptime_secs: self.start_time.elapsed().unwrap_or_default().as_secs(),
            queue_depth: self.queue.len(),
            identities: self.connected.read().await.clone(),
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    (StatusCode::OK, Json(state.snapshot().await))
}

async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Create the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Start the health check server
pub async fn start_health_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_health_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Health check server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
