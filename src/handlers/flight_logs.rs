use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::middleware::{BearerToken, RemoteReply};
use crate::server::AppState;
use crate::types::FlightLogFields;

/// GET /flightLogs
pub async fn list_flight_logs(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> RemoteReply {
    RemoteReply::relay_or_nothing(state.backend.list_flight_logs(&token).await, "list flight logs")
}

/// GET /flightLogs/:flightId - rows whose `flightId` column matches (not the row id)
pub async fn get_flight_logs(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Path(flight_id): Path<String>,
) -> RemoteReply {
    RemoteReply::relay_or_nothing(
        state.backend.flight_logs_by_flight_id(&token, &flight_id).await,
        "get flight logs",
    )
}

/// POST /flightLogs
pub async fn create_flight_log(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Json(fields): Json<FlightLogFields>,
) -> RemoteReply {
    let result = state.backend.create_flight_log(&token, &fields).await;
    if let Ok(inserted) = &result {
        tracing::info!(payload = %inserted, "flight log added");
    }
    RemoteReply::success_regardless(result, "create flight log")
}

/// PUT /flightLogs/:flightLogId - answers with the updated rows
pub async fn update_flight_log(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Path(id): Path<String>,
    Json(fields): Json<FlightLogFields>,
) -> RemoteReply {
    RemoteReply::relay_or_nothing(
        state.backend.update_flight_log(&token, &id, &fields).await,
        "update flight log",
    )
}

/// DELETE /flightLogs/:flightLogId
pub async fn delete_flight_log(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Path(id): Path<String>,
) -> RemoteReply {
    tracing::info!(%id, "deleting flight log");
    RemoteReply::success_regardless(
        state.backend.delete_flight_log(&token, &id).await,
        "delete flight log",
    )
}
