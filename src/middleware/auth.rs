use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{bearer_token, token_status, TokenStatus};
use crate::error::ApiError;

/// Caller's access token, forwarded as the credential of the remote call
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

/// Rejects requests whose token is missing, undecodable or past its expiry
/// with 403 before any handler (and so any remote call) runs.
pub async fn token_gate(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let token = bearer_token(&headers);

    match (token_status(token.as_deref()), token) {
        (TokenStatus::Valid, Some(token)) => {
            request.extensions_mut().insert(BearerToken(token));
            next.run(request).await
        }
        _ => {
            tracing::debug!(path = %request.uri().path(), "rejecting expired or missing access token");
            ApiError::token_expired().into_response()
        }
    }
}
