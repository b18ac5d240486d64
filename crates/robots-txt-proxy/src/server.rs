//! HTTP server for the robots.txt proxy
//!
//! Serves a static directory as the backend, with `/robots.txt` augmented by
//! the middleware, plus a /health endpoint.

use crate::types::HealthResponse;
use axum::{extract::State, middleware, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use robots_txt_layer::{robots_txt_middleware, RobotsTxt};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

/// Shared state for the HTTP server
pub struct ServerState {
    pub robots: Arc<RobotsTxt>,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(robots: RobotsTxt) -> Self {
        Self {
            robots: Arc::new(robots),
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState, static_dir: &Path) -> Router {
    let robots = state.robots.clone();

    Router::new()
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(robots, robots_txt_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, static_dir: &Path, port: u16) -> std::io::Result<()> {
    let router = create_router(state, static_dir);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cached_sources: state.robots.cache().len().await,
        metrics: state.robots.metrics(),
    })
}
