use serde::{Deserialize, Serialize};

use crate::constants::{ERR_ALL_FIELDS_REQUIRED, ERR_COORDINATES_NOT_NUMERIC};
use crate::error::AppError;
use crate::models::request::{present, Coordinate};

/// Helper location as listed to clients
///
/// Phone is part of the upsert identity but not exposed in listings. The
/// numeric columns are nullable because older clients could post partial pings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct HelperLocation {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub request_id: Option<i64>,
}

/// A validated location ping
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPing {
    pub name: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub request_id: i64,
}

/// Raw location report from a volunteer's device
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationReport {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
    pub request_id: Option<RequestRef>,
}

/// Request id as sent by clients, which may stringify it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestRef {
    Id(i64),
    Text(String),
}

impl RequestRef {
    pub fn id(&self) -> Option<i64> {
        match self {
            RequestRef::Id(id) => Some(*id),
            RequestRef::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl LocationReport {
    pub fn validate(self) -> Result<LocationPing, AppError> {
        let (name, phone, latitude, longitude, request_id) = match (
            present(self.name),
            present(self.phone),
            self.latitude,
            self.longitude,
            self.request_id.as_ref().and_then(RequestRef::id),
        ) {
            (Some(n), Some(p), Some(lat), Some(lon), Some(id)) => (n, p, lat, lon, id),
            _ => return Err(AppError::Validation(ERR_ALL_FIELDS_REQUIRED.to_string())),
        };

        match (latitude.value(), longitude.value()) {
            (Some(latitude), Some(longitude)) => Ok(LocationPing {
                name,
                phone,
                latitude,
                longitude,
                request_id,
            }),
            _ => Err(AppError::Validation(
                ERR_COORDINATES_NOT_NUMERIC.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_report() {
        let report: LocationReport = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "phone": "+9199",
            "latitude": 12.0,
            "longitude": "77.0",
            "request_id": 5
        }))
        .unwrap();

        let ping = report.validate().unwrap();
        assert_eq!(ping.name, "Asha");
        assert_eq!(ping.longitude, 77.0);
        assert_eq!(ping.request_id, 5);
    }

    #[test]
    fn test_string_request_id() {
        let report: LocationReport = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "phone": "+9199",
            "latitude": 12.0,
            "longitude": 77.0,
            "request_id": "7"
        }))
        .unwrap();

        assert_eq!(report.validate().unwrap().request_id, 7);
    }

    #[test]
    fn test_validate_report_missing_request_id() {
        let report = LocationReport {
            name: Some("Asha".to_string()),
            phone: Some("+9199".to_string()),
            latitude: Some(Coordinate::Number(12.0)),
            longitude: Some(Coordinate::Number(77.0)),
            request_id: None,
        };
        assert!(matches!(report.validate(), Err(AppError::Validation(_))));
    }
}
