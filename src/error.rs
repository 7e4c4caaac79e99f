// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::supabase::BackendError;

/// Errors a handler can answer with. Bodies follow the established client
/// contract, so there is no common envelope: most carry `message`, sign-out
/// failures carry `error`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request, generic message
    BadRequest(String),

    // 400 Bad Request, remote message relayed as `error`
    Rejected(String),

    // 403 Forbidden
    Forbidden(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Rejected(msg) => msg,
            ApiError::Forbidden(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Rejected(msg) => json!({ "error": msg }),
            _ => json!({ "message": self.message() }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn token_expired() -> Self {
        ApiError::forbidden("Access token expired")
    }

    /// Relay the remote failure reason to the caller
    pub fn rejected(err: &BackendError) -> Self {
        ApiError::Rejected(err.client_message())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
