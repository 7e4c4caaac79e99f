use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::ApiError;
use crate::middleware::{BearerToken, RemoteReply};
use crate::server::AppState;
use crate::types::Credentials;

/// GET /users - every row of the users table visible to the caller
pub async fn list_users(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> RemoteReply {
    RemoteReply::relay_or_nothing(state.backend.list_users(&token).await, "list users")
}

/// POST /users - register an account through the identity service
///
/// Unlike the other user operations a failure here reaches the caller.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Json(credentials): Json<Credentials>,
) -> Result<RemoteReply, ApiError> {
    match state.backend.create_user(&token, &credentials).await {
        Ok(user) => {
            tracing::info!(username = %credentials.username, "user added");
            tracing::debug!(payload = %user, "created user");
            Ok(RemoteReply::Success)
        }
        Err(e) => {
            tracing::error!(username = %credentials.username, error = %e, "error adding auth user");
            Err(ApiError::bad_request("Error adding user"))
        }
    }
}

/// DELETE /users/:userId - remove an account with the elevated credential
///
/// The caller's token only passes the expiry gate; it is not used for the
/// deletion itself.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(BearerToken(_)): Extension<BearerToken>,
    Path(user_id): Path<String>,
) -> RemoteReply {
    tracing::info!(%user_id, "deleting user");
    RemoteReply::success_regardless(state.backend.delete_user(&user_id).await, "delete user")
}
