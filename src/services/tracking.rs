use crate::db::helpers::UpsertOutcome;
use crate::db::Store;
use crate::error::Result;
use crate::models::{HelperLocation, LocationReport};

/// Record a volunteer's position for the request they are working
///
/// Identity is (name, phone, request_id): a repeat ping moves the existing
/// record, a ping for another request starts a new one. The request id is
/// not checked against existing requests.
pub async fn report_location(store: &Store, report: LocationReport) -> Result<UpsertOutcome> {
    let ping = report.validate()?;
    let outcome = store.upsert_helper_location(&ping).await?;

    tracing::debug!(
        "Helper {} for request {}: {:?} at ({}, {})",
        ping.name,
        ping.request_id,
        outcome,
        ping.latitude,
        ping.longitude
    );

    Ok(outcome)
}

pub async fn list_helpers(store: &Store) -> Result<Vec<HelperLocation>> {
    Ok(store.list_helpers().await?)
}
