use axum::{extract::State, Json};

use crate::constants::MSG_LOCATION_UPDATED;
use crate::error::Result;
use crate::models::{HelperLocation, LocationReport};
use crate::routes::validation::ApiJson;
use crate::routes::MessageResponse;
use crate::services::tracking;
use crate::AppState;

/// Volunteer position ping
///
/// POST /api/update_helper_location
pub async fn update_helper_location(
    State(state): State<AppState>,
    ApiJson(report): ApiJson<LocationReport>,
) -> Result<Json<MessageResponse>> {
    tracking::report_location(&state.store, report).await?;
    Ok(Json(MessageResponse::new(MSG_LOCATION_UPDATED)))
}

pub async fn list_helpers(State(state): State<AppState>) -> Result<Json<Vec<HelperLocation>>> {
    Ok(Json(tracking::list_helpers(&state.store).await?))
}
