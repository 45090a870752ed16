use serde::{Deserialize, Serialize};

use crate::constants::{ERR_ALL_FIELDS_REQUIRED, ERR_COORDINATES_NOT_NUMERIC};
use crate::error::AppError;

/// Lifecycle of a request: `Pending` until a volunteer accepts it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum RequestStatus {
    #[serde(rename = "Pending")]
    #[sqlx(rename = "Pending")]
    Pending,
    #[serde(rename = "On The Way")]
    #[sqlx(rename = "On The Way")]
    OnTheWay,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => crate::constants::STATUS_PENDING,
            RequestStatus::OnTheWay => crate::constants::STATUS_ON_THE_WAY,
        }
    }
}

/// Request row as stored in the `requests` table
///
/// Coordinates are optional because rows written before the columns were
/// added by migration carry NULLs.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Request {
    pub id: i64,
    pub phone: String,
    pub resource: String,
    pub address: String,
    pub time: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: RequestStatus,
}

/// A validated request ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub phone: String,
    pub resource: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Coordinate as submitted by clients: either a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn is_blank(&self) -> bool {
        matches!(self, Coordinate::Text(s) if s.trim().is_empty())
    }

    /// Finite numeric value, if the coordinate parses as one
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Coordinate::Number(n) => *n,
            Coordinate::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

/// Raw create-request input; every field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestDraft {
    pub phone: Option<String>,
    pub resource: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
}

impl RequestDraft {
    /// Check that all five fields are present and the coordinates are numeric
    pub fn validate(self) -> Result<NewRequest, AppError> {
        let (phone, resource, address, latitude, longitude) = match (
            present(self.phone),
            present(self.resource),
            present(self.address),
            self.latitude.filter(|c| !c.is_blank()),
            self.longitude.filter(|c| !c.is_blank()),
        ) {
            (Some(p), Some(r), Some(a), Some(lat), Some(lon)) => (p, r, a, lat, lon),
            _ => return Err(AppError::Validation(ERR_ALL_FIELDS_REQUIRED.to_string())),
        };

        let (latitude, longitude) = match (latitude.value(), longitude.value()) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(AppError::Validation(
                    ERR_COORDINATES_NOT_NUMERIC.to_string(),
                ))
            }
        };

        Ok(NewRequest {
            phone,
            resource,
            address,
            latitude,
            longitude,
        })
    }
}

/// Accepted request detail plus the latest reported volunteer position
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AcceptedRequest {
    pub success: bool,
    #[serde(flatten)]
    pub request: Request,
    pub volunteer_lat: Option<f64>,
    pub volunteer_lng: Option<f64>,
}

/// Trimmed, non-empty string or nothing
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
