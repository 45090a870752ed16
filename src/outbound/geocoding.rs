//! Address-to-coordinate lookup against a Nominatim-compatible search API.
//!
//! Lookups never fail the caller: `Geocoder::resolve` folds every error into
//! `Resolution::Unresolved` after logging it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// A resolved position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Resolved(GeoPoint),
    /// Degraded but non-fatal; links fall back to having no coordinates
    Unresolved,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geocoder returned status {0}")]
    Status(StatusCode),

    #[error("geocoder returned no results")]
    NoMatch,

    #[error("geocoder returned unusable coordinates: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up the best match for a free-text address
    async fn lookup(&self, address: &str) -> Result<GeoPoint, GeocodeError>;

    /// Look up an address, logging and swallowing any failure
    async fn resolve(&self, address: &str) -> Resolution {
        match self.lookup(address).await {
            Ok(point) => Resolution::Resolved(point),
            Err(e) => {
                tracing::warn!("Geo lookup failed for {:?}: {}", address, e);
                Resolution::Unresolved
            }
        }
    }
}

/// One entry of a Nominatim `format=json` search response
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Reqwest-backed geocoder with a bounded per-request timeout
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("limit", "1"), ("q", address)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let place = places.into_iter().next().ok_or(GeocodeError::NoMatch)?;

        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::Decode(place.lat.clone()))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::Decode(place.lon.clone()))?;

        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }
}

/// Build the WhatsApp deep-link handed back to the requester
///
/// `contact` is reduced to digits as wa.me expects; without a contact the
/// link opens WhatsApp's share-to-any-chat flow.
pub fn whatsapp_link(contact: Option<&str>, resource: &str, resolution: Resolution) -> String {
    let text = match resolution {
        Resolution::Resolved(point) => format!(
            "{} request received. Location: {}",
            resource,
            maps_link(point)
        ),
        Resolution::Unresolved => format!("{} request received.", resource),
    };

    let digits: String = contact
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    format!("https://wa.me/{}?text={}", digits, urlencoding::encode(&text))
}

pub fn maps_link(point: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        point.latitude, point.longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// Serve `router` on an ephemeral local port and return its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/search", addr)
    }

    fn geocoder(endpoint: String) -> NominatimGeocoder {
        NominatimGeocoder::new(endpoint, Duration::from_millis(500), "sea-backend-test").unwrap()
    }

    #[tokio::test]
    async fn test_resolve_first_match() {
        let router = Router::new().route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("format").map(String::as_str), Some("json"));
                assert_eq!(params.get("q").map(String::as_str), Some("MG Road"));
                Json(json!([
                    { "lat": "12.9756", "lon": "77.6050", "display_name": "MG Road" },
                    { "lat": "0", "lon": "0" }
                ]))
            }),
        );
        let endpoint = serve(router).await;

        let resolution = geocoder(endpoint).resolve("MG Road").await;

        assert_eq!(
            resolution,
            Resolution::Resolved(GeoPoint {
                latitude: 12.9756,
                longitude: 77.6050
            })
        );
    }

    #[tokio::test]
    async fn test_empty_result_is_unresolved() {
        let router = Router::new().route("/search", get(|| async { Json(json!([])) }));
        let endpoint = serve(router).await;

        let geocoder = geocoder(endpoint);
        assert!(matches!(
            geocoder.lookup("nowhere").await,
            Err(GeocodeError::NoMatch)
        ));
        assert_eq!(geocoder.resolve("nowhere").await, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn test_server_error_is_unresolved() {
        let router = Router::new().route(
            "/search",
            get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let endpoint = serve(router).await;

        let geocoder = geocoder(endpoint);
        assert!(matches!(
            geocoder.lookup("MG Road").await,
            Err(GeocodeError::Status(StatusCode::SERVICE_UNAVAILABLE))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_unresolved() {
        let router = Router::new().route(
            "/search",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(Value::Array(vec![]))
            }),
        );
        let endpoint = serve(router).await;

        assert_eq!(geocoder(endpoint).resolve("MG Road").await, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unresolved() {
        // Port 9 (discard) on localhost is not expected to be listening
        let geocoder = geocoder("http://127.0.0.1:9/search".to_string());
        assert_eq!(geocoder.resolve("MG Road").await, Resolution::Unresolved);
    }

    #[test]
    fn test_whatsapp_link_with_coordinates() {
        let link = whatsapp_link(
            Some("+91 90197 90330"),
            "Water",
            Resolution::Resolved(GeoPoint {
                latitude: 12.5,
                longitude: 77.25,
            }),
        );

        assert!(link.starts_with("https://wa.me/919019790330?text="));
        assert!(link.contains("Water%20request%20received."));
        assert!(link.contains(&*urlencoding::encode(
            "https://www.google.com/maps/search/?api=1&query=12.5,77.25"
        )));
    }

    #[test]
    fn test_whatsapp_link_unresolved_without_contact() {
        let link = whatsapp_link(None, "Medical Kit", Resolution::Unresolved);

        assert_eq!(
            link,
            "https://wa.me/?text=Medical%20Kit%20request%20received."
        );
    }
}
