// supabase/mod.rs - Backend-as-a-service client
//
// Three credential contexts exist against the backend:
// - anon:   the anonymous key, used for password sign-in
// - admin:  the service-role key, used only to delete accounts
// - scoped: the anon key plus the caller's access token, built per request
//           so row-level security applies to every table call

pub mod client;
pub mod error;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::config::SupabaseConfig;
use crate::types::{Credentials, FlightLogFields, FLIGHT_LOGS_TABLE, USERS_TABLE};

pub use client::{EqFilter, SupabaseClient};
pub use error::BackendError;

/// Every remote operation the HTTP handlers can trigger.
///
/// Each method issues exactly one call. Methods taking a `token` run under
/// that token; `delete_user` runs under the elevated credential.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Value, BackendError>;

    async fn sign_out(&self, token: &str) -> Result<(), BackendError>;

    async fn list_users(&self, token: &str) -> Result<Value, BackendError>;

    async fn create_user(&self, token: &str, credentials: &Credentials) -> Result<Value, BackendError>;

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError>;

    async fn list_flight_logs(&self, token: &str) -> Result<Value, BackendError>;

    async fn flight_logs_by_flight_id(&self, token: &str, flight_id: &str) -> Result<Value, BackendError>;

    async fn create_flight_log(&self, token: &str, fields: &FlightLogFields) -> Result<Value, BackendError>;

    async fn update_flight_log(
        &self,
        token: &str,
        id: &str,
        fields: &FlightLogFields,
    ) -> Result<Value, BackendError>;

    async fn delete_flight_log(&self, token: &str, id: &str) -> Result<(), BackendError>;
}

/// Long-lived handles, created once at startup
#[derive(Debug, Clone)]
pub struct SupabaseBackend {
    anon: SupabaseClient,
    admin: SupabaseClient,
}

impl SupabaseBackend {
    pub fn new(config: &SupabaseConfig) -> Result<Self, BackendError> {
        // Url::join drops the last path segment unless the base ends in '/'
        let mut base = config.url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("flightlog-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            anon: SupabaseClient::with_key(http.clone(), base_url.clone(), &config.anon_key),
            admin: SupabaseClient::with_key(http, base_url, &config.service_role_key),
        })
    }

    /// Per-request client carrying the caller's token
    pub fn scoped(&self, token: &str) -> SupabaseClient {
        self.anon.scoped(token)
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Value, BackendError> {
        self.anon
            .sign_in_with_password(&credentials.username, &credentials.password)
            .await
    }

    async fn sign_out(&self, token: &str) -> Result<(), BackendError> {
        self.scoped(token).sign_out().await
    }

    async fn list_users(&self, token: &str) -> Result<Value, BackendError> {
        self.scoped(token).select(USERS_TABLE, &[]).await
    }

    async fn create_user(&self, token: &str, credentials: &Credentials) -> Result<Value, BackendError> {
        self.scoped(token)
            .sign_up(&credentials.username, &credentials.password)
            .await
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        self.admin.admin_delete_user(user_id).await
    }

    async fn list_flight_logs(&self, token: &str) -> Result<Value, BackendError> {
        self.scoped(token).select(FLIGHT_LOGS_TABLE, &[]).await
    }

    async fn flight_logs_by_flight_id(&self, token: &str, flight_id: &str) -> Result<Value, BackendError> {
        self.scoped(token)
            .select(FLIGHT_LOGS_TABLE, &[EqFilter("flightId", flight_id)])
            .await
    }

    async fn create_flight_log(&self, token: &str, fields: &FlightLogFields) -> Result<Value, BackendError> {
        self.scoped(token).insert(FLIGHT_LOGS_TABLE, fields).await
    }

    async fn update_flight_log(
        &self,
        token: &str,
        id: &str,
        fields: &FlightLogFields,
    ) -> Result<Value, BackendError> {
        self.scoped(token)
            .update(FLIGHT_LOGS_TABLE, fields, &[EqFilter("id", id)])
            .await
    }

    async fn delete_flight_log(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.scoped(token)
            .delete(FLIGHT_LOGS_TABLE, &[EqFilter("id", id)])
            .await
    }
}
