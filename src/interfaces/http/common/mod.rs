//! Shared HTTP plumbing: error mapping, JSON extraction and file
//! attachments.

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{DomainError, DomainResult};
use crate::shared::time::parse_iso_date;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Build an error response outside the `DomainError` flow (middleware,
/// extractor rejections).
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// Domain error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::NotFound { .. } | DomainError::NoData(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) | DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, transient = self.0.is_transient(), "Request failed");
        } else if status == StatusCode::FORBIDDEN {
            warn!(error = %self.0, "Access refused");
        }
        error_response(status, self.0.public_message())
    }
}

/// Parse a `YYYY-MM-DD` path or query parameter.
pub fn date_param(raw: &str) -> ApiResult<NaiveDate> {
    Ok(parse_iso_date(raw)?)
}

pub fn optional_date_param(raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => date_param(raw).map(Some),
        None => Ok(None),
    }
}

/// Downloadable file response.
pub fn attachment(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// Run a document renderer off the async runtime.
pub async fn render_blocking<F>(job: F) -> ApiResult<Vec<u8>>
where
    F: FnOnce() -> DomainResult<Vec<u8>> + Send + 'static,
{
    let bytes = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| DomainError::Internal(format!("Report task failed: {}", e)))??;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (DomainError::not_found("Membre", "id", 1), StatusCode::NOT_FOUND),
            (DomainError::NoData("vide".into()), StatusCode::NOT_FOUND),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError(error).status(), status);
        }
    }

    #[test]
    fn date_params() {
        assert_eq!(
            date_param("2025-01-05").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
        );
        assert_eq!(date_param("05/01/2025").unwrap_err().status(), StatusCode::BAD_REQUEST);
        assert_eq!(optional_date_param(Some("  ")).unwrap(), None);
        assert_eq!(optional_date_param(None).unwrap(), None);
    }

    #[test]
    fn attachment_sets_disposition() {
        let response = attachment(CSV_CONTENT_TYPE, "membres_2025-01-05.csv", b"a".to_vec());
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"membres_2025-01-05.csv\""
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], CSV_CONTENT_TYPE);
    }
}
