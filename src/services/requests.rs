use chrono::Utc;

use crate::constants::{ERR_DELETE_NOT_FOUND, ERR_REQUEST_NOT_FOUND, REQUEST_TIME_FORMAT};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{AcceptedRequest, Request, RequestDraft};
use crate::outbound::{whatsapp_link, Alert, AlertQueue, Geocoder};

/// Collaborators invoked after a request has been persisted
pub struct SideEffects<'a> {
    pub geocoder: &'a dyn Geocoder,
    pub alerts: &'a AlertQueue,
    pub whatsapp_contact: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRequest {
    pub id: i64,
    pub whatsapp: String,
}

/// Validate and persist a request, then run the side effects
///
/// Nothing after the insert can fail this call: an unresolved address only
/// degrades the link, and alert delivery happens on the background worker.
pub async fn create_request(
    store: &Store,
    effects: &SideEffects<'_>,
    draft: RequestDraft,
) -> Result<CreatedRequest> {
    let request = draft.validate()?;
    let time = Utc::now().format(REQUEST_TIME_FORMAT).to_string();

    let id = store.insert_request(&request, &time).await?;
    tracing::info!("Request {} created: {} at {}", id, request.resource, request.address);

    let resolution = effects.geocoder.resolve(&request.address).await;
    let whatsapp = whatsapp_link(effects.whatsapp_contact, &request.resource, resolution);

    effects.alerts.enqueue(Alert {
        resource: request.resource,
        address: request.address,
        phone: request.phone,
        time,
    });

    Ok(CreatedRequest { id, whatsapp })
}

pub async fn list_requests(store: &Store) -> Result<Vec<Request>> {
    Ok(store.list_requests().await?)
}

/// Mark a request as `On The Way` and return it with the latest volunteer position
///
/// Calling this repeatedly is harmless; it also serves as the tracking poll.
pub async fn accept_request(store: &Store, id: i64) -> Result<AcceptedRequest> {
    store.mark_on_the_way(id).await?;

    let request = store
        .get_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(ERR_REQUEST_NOT_FOUND.to_string()))?;

    let volunteer = store.latest_helper_for_request(id).await?;

    Ok(AcceptedRequest {
        success: true,
        request,
        volunteer_lat: volunteer.as_ref().and_then(|v| v.latitude),
        volunteer_lng: volunteer.as_ref().and_then(|v| v.longitude),
    })
}

/// Remove a request; helper records for it are kept
pub async fn delete_request(store: &Store, id: i64) -> Result<()> {
    if !store.delete_request(id).await? {
        return Err(AppError::NotFound(ERR_DELETE_NOT_FOUND.to_string()));
    }
    tracing::info!("Request {} deleted", id);
    Ok(())
}

/// Id of the newest request, 0 when there are none
pub async fn latest_request_id(store: &Store) -> Result<i64> {
    Ok(store.latest_request_id().await?.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_store;
    use crate::models::{Coordinate, LocationPing, RequestStatus};
    use crate::outbound::geocoding::GeocodeError;
    use crate::outbound::{GeoPoint, LogSender, NotificationDispatcher};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedGeocoder(Option<GeoPoint>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn lookup(&self, _address: &str) -> std::result::Result<GeoPoint, GeocodeError> {
            self.0.ok_or(GeocodeError::NoMatch)
        }
    }

    fn alert_queue() -> AlertQueue {
        let dispatcher = NotificationDispatcher::new(Arc::new(LogSender), vec![]);
        AlertQueue::spawn(dispatcher, 8).0
    }

    fn draft() -> RequestDraft {
        RequestDraft {
            phone: Some("+911234567890".to_string()),
            resource: Some("Water".to_string()),
            address: Some("MG Road".to_string()),
            latitude: Some(Coordinate::Number(12.97)),
            longitude: Some(Coordinate::Number(77.59)),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_pending() {
        let (_dir, store) = temp_store().await;
        let geocoder = FixedGeocoder(Some(GeoPoint {
            latitude: 12.9,
            longitude: 77.6,
        }));
        let alerts = alert_queue();
        let effects = SideEffects {
            geocoder: &geocoder,
            alerts: &alerts,
            whatsapp_contact: Some("+919019790330"),
        };

        let created = create_request(&store, &effects, draft()).await.unwrap();
        assert!(created.whatsapp.starts_with("https://wa.me/919019790330?text="));
        assert!(created.whatsapp.contains("Location"));

        let requests = list_requests(&store).await.unwrap();
        assert_eq!(requests[0].id, created.id);
        assert_eq!(requests[0].resource, "Water");
        assert_eq!(requests[0].status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_succeeds_when_geocoding_fails() {
        let (_dir, store) = temp_store().await;
        let geocoder = FixedGeocoder(None);
        let alerts = alert_queue();
        let effects = SideEffects {
            geocoder: &geocoder,
            alerts: &alerts,
            whatsapp_contact: None,
        };

        let created = create_request(&store, &effects, draft()).await.unwrap();

        assert_eq!(
            created.whatsapp,
            "https://wa.me/?text=Water%20request%20received."
        );
        assert_eq!(list_requests(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_create_persists_nothing() {
        let (_dir, store) = temp_store().await;
        let geocoder = FixedGeocoder(None);
        let alerts = alert_queue();
        let effects = SideEffects {
            geocoder: &geocoder,
            alerts: &alerts,
            whatsapp_contact: None,
        };

        let result = create_request(
            &store,
            &effects,
            RequestDraft {
                address: None,
                ..draft()
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(list_requests(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accept_is_idempotent_and_reports_volunteer() {
        let (_dir, store) = temp_store().await;
        let id = store
            .insert_request(&draft().validate().unwrap(), "2024-01-01 10:00:00")
            .await
            .unwrap();

        let first = accept_request(&store, id).await.unwrap();
        assert_eq!(first.request.status, RequestStatus::OnTheWay);
        assert!(first.volunteer_lat.is_none());

        store
            .upsert_helper_location(&LocationPing {
                name: "Asha".to_string(),
                phone: "+9199".to_string(),
                latitude: 12.1,
                longitude: 77.1,
                request_id: id,
            })
            .await
            .unwrap();

        let second = accept_request(&store, id).await.unwrap();
        assert_eq!(second.request.status, RequestStatus::OnTheWay);
        assert_eq!(second.volunteer_lat, Some(12.1));
        assert_eq!(second.volunteer_lng, Some(77.1));
    }

    #[tokio::test]
    async fn test_accept_unknown_creates_nothing() {
        let (_dir, store) = temp_store().await;

        let result = accept_request(&store, 42).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(list_requests(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_keeps_helper_records() {
        let (_dir, store) = temp_store().await;
        let id = store
            .insert_request(&draft().validate().unwrap(), "t")
            .await
            .unwrap();
        store
            .upsert_helper_location(&LocationPing {
                name: "Asha".to_string(),
                phone: "+9199".to_string(),
                latitude: 1.0,
                longitude: 2.0,
                request_id: id,
            })
            .await
            .unwrap();

        delete_request(&store, id).await.unwrap();

        assert!(list_requests(&store).await.unwrap().is_empty());
        assert_eq!(store.count_helpers().await.unwrap(), 1);
        assert!(matches!(
            delete_request(&store, id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_latest_request_id() {
        let (_dir, store) = temp_store().await;
        assert_eq!(latest_request_id(&store).await.unwrap(), 0);

        let id = store
            .insert_request(&draft().validate().unwrap(), "t")
            .await
            .unwrap();
        assert_eq!(latest_request_id(&store).await.unwrap(), id);
    }
}
