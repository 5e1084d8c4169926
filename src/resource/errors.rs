//! Error taxonomy and wire-format error reporting for resource dispatch.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::validator::ErrorSet;

/// Fixed marker prefixing every validation-failure body, so clients can
/// match it independently of the field detail.
pub const VALIDATION_FAILED: &str = "ERROR: validation failed";

/// Result type for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Everything that can terminate a request without a 200.
///
/// All errors are terminal for the request; no operation retries.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceError {
    /// Missing record, or an ambiguous primary-key match surfaced the same way.
    #[error("Resource not found")]
    NotFound,

    /// Operation not available: no validator configured, or an identifier
    /// was required but missing. Carries the full client-facing message.
    #[error("{0}")]
    MethodNotSupported(String),

    /// Request body failed to decode as a JSON object.
    #[error("Invalid {0} JSON")]
    MalformedBody(Method),

    /// The validator rejected the input.
    #[error("ERROR: validation failed")]
    ValidationFailed(ErrorSet),
}

impl ResourceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResourceError::NotFound => StatusCode::NOT_FOUND,
            ResourceError::MethodNotSupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            ResourceError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ResourceError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn method_not_supported(method: &Method) -> Self {
        ResourceError::MethodNotSupported(format!("{} not supported", method))
    }
}

/// Stable JSON error body.
///
/// Validation failures carry the field-to-messages mapping under `fields`;
/// every error carries the message and the status code.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ErrorSet>,
}

impl From<ResourceError> for ErrorBody {
    fn from(err: ResourceError) -> Self {
        let code = err.status_code().as_u16();
        let error = err.to_string();
        let fields = match err {
            ResourceError::ValidationFailed(set) => Some(set),
            _ => None,
        };
        Self { error, code, fields }
    }
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody::from(self));
        (status, body).into_response()
    }
}
