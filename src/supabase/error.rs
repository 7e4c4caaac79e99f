use serde_json::Value;
use thiserror::Error;

/// Failure of a single call to the backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The call never produced a response
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Build an `Api` error from a non-success response body.
    ///
    /// The identity service reports `msg` or `error_description`, the table
    /// API reports `message`; fall back to the raw body.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                ["msg", "message", "error_description", "error"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().to_string());

        BackendError::Api { status, message }
    }

    /// Message safe to relay to a client
    pub fn client_message(&self) -> String {
        match self {
            BackendError::Api { message, .. } => message.clone(),
            BackendError::Http(_) => "backend unavailable".to_string(),
            BackendError::InvalidUrl(_) => "backend misconfigured".to_string(),
        }
    }
}
