use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// What went wrong, independent of the status code it is reported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Unauthorized,
    Internal,
}

impl From<&ServiceError> for ErrorKind {
    fn from(e: &ServiceError) -> Self {
        match e {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::NotFound(_) | ServiceError::Hash(_) | ServiceError::Db(_) => ErrorKind::Internal,
        }
    }
}

impl From<&AuthError> for ErrorKind {
    fn from(e: &AuthError) -> Self {
        if e.is_credential_failure() {
            ErrorKind::Unauthorized
        } else {
            ErrorKind::Internal
        }
    }
}

/// Maps an [`ErrorKind`] to a status code.
///
/// `Uniform` answers every failure with 400, which is what existing clients
/// of this API expect. `Distinct` uses 400/409/401/500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    #[default]
    Uniform,
    Distinct,
}

impl StatusPolicy {
    pub fn from_config(distinct_status_codes: bool) -> Self {
        if distinct_status_codes {
            StatusPolicy::Distinct
        } else {
            StatusPolicy::Uniform
        }
    }

    pub fn status(self, kind: ErrorKind) -> StatusCode {
        match (self, kind) {
            (StatusPolicy::Uniform, _) => StatusCode::BAD_REQUEST,
            (StatusPolicy::Distinct, ErrorKind::Validation) => StatusCode::BAD_REQUEST,
            (StatusPolicy::Distinct, ErrorKind::Conflict) => StatusCode::CONFLICT,
            (StatusPolicy::Distinct, ErrorKind::Unauthorized) => StatusCode::UNAUTHORIZED,
            (StatusPolicy::Distinct, ErrorKind::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyShape {
    PlainText,
    Json,
}

/// `{"error": "..."}` body used by the registration endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler failure with its status already resolved.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub message: String,
    shape: BodyShape,
}

impl ApiError {
    /// Plain-text body.
    pub fn text(policy: StatusPolicy, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { status: policy.status(kind), kind, message: message.into(), shape: BodyShape::PlainText }
    }

    /// `{"error": message}` body.
    pub fn json(policy: StatusPolicy, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { status: policy.status(kind), kind, message: message.into(), shape: BodyShape::Json }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.shape {
            BodyShape::PlainText => (self.status, self.message).into_response(),
            BodyShape::Json => (self.status, Json(ErrorBody { error: self.message })).into_response(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("seeding failed: {0}")]
    Seed(#[from] ServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
