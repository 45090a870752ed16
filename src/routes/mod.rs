pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;
pub mod requests;
pub mod validation;

use axum::{
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;

use crate::AppState;

pub use admin::{admin_stats, clear_requests};
pub use auth::{current_session, login, signup};
pub use health::health_check;
pub use helpers::{list_helpers, update_helper_location};
pub use requests::{accept_request, create_request, delete_request, latest_request, list_requests};

/// `{"message": ...}` success body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// All API routes, without CORS or tracing layers
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/me", get(current_session))
        .route("/api/request", post(create_request))
        .route("/api/requests", get(list_requests))
        .route("/api/requests/latest", get(latest_request))
        .route("/api/accept_request/:id", post(accept_request))
        .route("/api/update_helper_location", post(update_helper_location))
        .route("/api/helpers", get(list_helpers))
        .route("/api/delete_request/:id", delete(delete_request))
        .route("/admin/stats", get(admin_stats))
        .route("/admin/clear_requests", post(clear_requests))
        .with_state(state)
}
