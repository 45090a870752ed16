use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::{MSG_REQUEST_DELETED, MSG_REQUEST_SENT};
use crate::error::Result;
use crate::models::{AcceptedRequest, Request, RequestDraft};
use crate::routes::validation::{ApiJson, ApiPath};
use crate::routes::MessageResponse;
use crate::services::requests::{self, SideEffects};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CreateRequestResponse {
    pub message: &'static str,
    pub whatsapp: String,
}

#[derive(Debug, Serialize)]
pub struct LatestRequestResponse {
    pub current_request_id: i64,
}

/// Submit a help request
///
/// POST /api/request
pub async fn create_request(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<RequestDraft>,
) -> Result<Json<CreateRequestResponse>> {
    let effects = SideEffects {
        geocoder: state.geocoder.as_ref(),
        alerts: &state.alerts,
        whatsapp_contact: state.config.whatsapp_contact.as_deref(),
    };

    let created = requests::create_request(&state.store, &effects, draft).await?;

    Ok(Json(CreateRequestResponse {
        message: MSG_REQUEST_SENT,
        whatsapp: created.whatsapp,
    }))
}

/// All requests, newest first
pub async fn list_requests(State(state): State<AppState>) -> Result<Json<Vec<Request>>> {
    Ok(Json(requests::list_requests(&state.store).await?))
}

/// Id of the most recent request, for dashboards polling for new work
pub async fn latest_request(State(state): State<AppState>) -> Result<Json<LatestRequestResponse>> {
    let current_request_id = requests::latest_request_id(&state.store).await?;
    Ok(Json(LatestRequestResponse { current_request_id }))
}

/// POST /api/accept_request/:id
pub async fn accept_request(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<AcceptedRequest>> {
    Ok(Json(requests::accept_request(&state.store, id).await?))
}

/// DELETE /api/delete_request/:id
pub async fn delete_request(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>> {
    requests::delete_request(&state.store, id).await?;
    Ok(Json(MessageResponse::new(MSG_REQUEST_DELETED)))
}
