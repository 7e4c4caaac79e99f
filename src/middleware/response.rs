use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::supabase::BackendError;

/// What a pass-through handler answers with once the remote call is done.
///
/// Operations deal with remote failures in one of three ways, and callers
/// rely on each:
/// - swallow: log it and answer 200 with an empty body (`Nothing`), so a
///   failed read is indistinguishable from an empty one
/// - ignore: log it and report success anyway (`Success`)
/// - propagate: answer with an `ApiError` instead of a `RemoteReply`
#[derive(Debug)]
pub enum RemoteReply {
    /// Remote payload relayed as-is
    Relay(Value),
    /// `{"status":"success"}`
    Success,
    /// 200 with no body
    Nothing,
}

impl RemoteReply {
    /// Relay on success, swallow on failure
    pub fn relay_or_nothing(result: Result<Value, BackendError>, operation: &str) -> Self {
        match result {
            Ok(Value::Null) => RemoteReply::Nothing,
            Ok(value) => {
                tracing::debug!(operation, payload = %value, "relaying backend result");
                RemoteReply::Relay(value)
            }
            Err(e) => {
                tracing::error!(operation, error = %e, "backend call failed");
                RemoteReply::Nothing
            }
        }
    }

    /// Success on either outcome; failures only reach the log
    pub fn success_regardless<T>(result: Result<T, BackendError>, operation: &str) -> Self {
        if let Err(e) = result {
            tracing::error!(operation, error = %e, "backend call failed");
        }
        RemoteReply::Success
    }
}

impl IntoResponse for RemoteReply {
    fn into_response(self) -> Response {
        match self {
            RemoteReply::Relay(value) => (StatusCode::OK, Json(value)).into_response(),
            RemoteReply::Success => (StatusCode::OK, Json(json!({ "status": "success" }))).into_response(),
            RemoteReply::Nothing => StatusCode::OK.into_response(),
        }
    }
}
