//! Status Routes
//!
//! Routes:
//! - GET / - Greeting
//! - GET /health - Health check (catalog reachable)

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /
async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello, world!" }))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.catalog.backend().as_str();
    let version = env!("CARGO_PKG_VERSION");

    match state.catalog.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                backend,
                version,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    backend,
                    version,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
