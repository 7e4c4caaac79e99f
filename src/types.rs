//! Shared request/record types used across the codebase

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend table holding user rows
pub const USERS_TABLE: &str = "users";

/// Backend table holding flight log rows
pub const FLIGHT_LOGS_TABLE: &str = "FlightLogs";

/// `{ username, password }` body of sign-in and user creation.
///
/// The username is handed to the identity service as the email address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// The five writable flight log columns.
///
/// Values are relayed untouched, whatever JSON type the caller sent; a field
/// missing from the request is left out of the row sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLogFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail_number: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub takeoff: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
}
