use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint
///
/// Reports whether a store connection can be acquired and used.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = if state.store.ping().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(json!({
        "status": if db_status == "connected" { "healthy" } else { "unhealthy" },
        "database": db_status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
