use axum::extract::{
    rejection::PathRejection, FromRequest, FromRequestParts,
};

use crate::error::AppError;

/// JSON body extractor whose rejections render as `{message}` with status 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections render as 404 `{message}`
///
/// A non-numeric id can never name a request.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path: {}", rejection.body_text());
        AppError::NotFound("Not found".to_string())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
