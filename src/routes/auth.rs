use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::constants::MSG_ACCOUNT_CREATED;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::routes::validation::{bearer_token, ApiJson};
use crate::routes::MessageResponse;
use crate::services::accounts::{self, LoginForm, LoginOutcome, SignupForm};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
}

/// Register a requester account
///
/// Returns 400 with "Email already exists!" when the email is taken.
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<SignupForm>,
) -> Result<Json<MessageResponse>> {
    accounts::signup(&state.store, form).await?;
    Ok(Json(MessageResponse::new(MSG_ACCOUNT_CREATED)))
}

/// Log in and receive the user, where to go next, and a session token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginForm>,
) -> Result<Json<LoginOutcome>> {
    let outcome = accounts::login(&state.store, &state.config.session_secret, form).await?;
    tracing::info!("User {} logged in ({})", outcome.user.id, outcome.user.role.as_str());
    Ok(Json(outcome))
}

/// Resolve the bearer token to the logged-in user
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = bearer_token(header).ok_or(AppError::Unauthorized)?;

    let user = accounts::current_user(&state.store, &state.config.session_secret, token).await?;
    Ok(Json(SessionResponse { user }))
}
