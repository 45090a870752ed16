use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::constants::MSG_REQUESTS_CLEARED;
use crate::error::{AppError, Result};
use crate::security::constant_time_eq;
use crate::AppState;

/// Query parameters for admin endpoints
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub key: Option<String>,
}

/// Database statistics response
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub user_count: i64,
    pub request_count: i64,
    pub pending_count: i64,
    pub helper_count: i64,
    pub database_size_bytes: u64,
    pub database_size_human: String,
}

#[derive(Debug, Serialize)]
pub struct ClearRequestsResponse {
    pub message: &'static str,
    pub deleted: u64,
}

/// Format bytes into human-readable string
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{} bytes", b),
    }
}

/// Admin endpoints are disabled unless ADMIN_SECRET_KEY is configured
fn authorize(state: &AppState, params: &AdminQuery) -> Result<()> {
    let admin_key = state
        .config
        .admin_secret_key
        .as_deref()
        .ok_or(AppError::Unauthorized)?;

    match params.key.as_deref() {
        Some(key) if constant_time_eq(key, admin_key) => Ok(()),
        _ => {
            tracing::warn!("Invalid admin key attempt");
            Err(AppError::Unauthorized)
        }
    }
}

/// Record counts and database size for monitoring
///
/// GET /admin/stats?key=<admin_secret_key>
pub async fn admin_stats(
    State(state): State<AppState>,
    Query(params): Query<AdminQuery>,
) -> Result<Json<AdminStatsResponse>> {
    authorize(&state, &params)?;

    let database_size_bytes = tokio::fs::metadata(&state.config.database_path)
        .await
        .map(|m| m.len())
        .unwrap_or(0);

    let user_count = state.store.count_users().await?;
    let (request_count, pending_count) = state.store.count_requests().await?;
    let helper_count = state.store.count_helpers().await?;

    tracing::info!(
        "Admin stats requested: {} users, {} requests ({} pending), {} helpers, {} database",
        user_count,
        request_count,
        pending_count,
        helper_count,
        format_bytes(database_size_bytes)
    );

    Ok(Json(AdminStatsResponse {
        user_count,
        request_count,
        pending_count,
        helper_count,
        database_size_bytes,
        database_size_human: format_bytes(database_size_bytes),
    }))
}

/// Delete every request and restart id numbering
///
/// POST /admin/clear_requests?key=<admin_secret_key>
pub async fn clear_requests(
    State(state): State<AppState>,
    Query(params): Query<AdminQuery>,
) -> Result<Json<ClearRequestsResponse>> {
    authorize(&state, &params)?;

    let deleted = state.store.clear_requests().await?;
    tracing::warn!("Admin cleared {} requests", deleted);

    Ok(Json(ClearRequestsResponse {
        message: MSG_REQUESTS_CLEARED,
        deleted,
    }))
}
