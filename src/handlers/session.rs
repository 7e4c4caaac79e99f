// handlers/session.rs - sign-in and sign-out

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde_json::json;

use crate::auth::bearer_token;
use crate::error::ApiError;
use crate::server::AppState;
use crate::types::Credentials;

/// POST /signin - password grant against the identity service
///
/// Input: `{ "username": "...", "password": "..." }`
/// Output: `{ "token": <session object> }`
///
/// Every failure, including an unreachable backend, is a 400 with a generic
/// message; a 2xx always carries a session.
pub async fn signin(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    match state.backend.sign_in(&credentials).await {
        Ok(session) if !session.is_null() => Ok(Json(json!({ "token": session }))),
        Ok(_) => {
            tracing::error!(username = %credentials.username, "sign-in returned no session");
            Err(ApiError::bad_request("Error signing in"))
        }
        Err(e) => {
            tracing::error!(username = %credentials.username, error = %e, "sign-in failed");
            Err(ApiError::bad_request("Error signing in"))
        }
    }
}

/// POST /signout - revoke the caller's session
///
/// Not behind the expiry gate: a stale token can still be signed out.
pub async fn signout(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse, ApiError> {
    // Without a token there is no session to end
    if let Some(token) = bearer_token(&headers) {
        state.backend.sign_out(&token).await.map_err(|e| {
            tracing::error!(error = %e, "sign-out failed");
            ApiError::rejected(&e)
        })?;
    }

    Ok(Json(json!({ "success": true })))
}
