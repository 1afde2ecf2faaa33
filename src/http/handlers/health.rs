use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::http::server::AppState;

/// Liveness plus a database ping.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "up", "version": env!("CARGO_PKG_VERSION") })),
        ),
        Err(error) => {
            tracing::error!(error = %error, "Health check database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "down", "version": env!("CARGO_PKG_VERSION") })),
            )
        }
    }
}
