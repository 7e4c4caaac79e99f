use reqwest::{header::HeaderValue, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use super::error::BackendError;

/// One credential context against the backend.
///
/// Cheap to build: the underlying `reqwest::Client` is shared, so a
/// token-scoped client can be created per request and dropped afterwards.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    bearer: String,
}

/// Equality filter on a table column, rendered as `column=eq.value`
#[derive(Debug, Clone, Copy)]
pub struct EqFilter<'a>(pub &'a str, pub &'a str);

impl SupabaseClient {
    /// Client whose bearer is the API key itself (anon or service role)
    pub fn with_key(http: reqwest::Client, base_url: Url, api_key: &str) -> Self {
        Self {
            http,
            base_url,
            api_key: api_key.to_string(),
            bearer: api_key.to_string(),
        }
    }

    /// Same project and key, but calls carry the caller's access token
    pub fn scoped(&self, token: &str) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            bearer: token.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let url = self.base_url.join(path)?;
        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer))
    }

    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::from_body(status.as_u16(), &body))
    }

    async fn json_or_null(response: Response) -> Result<Value, BackendError> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Api {
            status: 200,
            message: format!("unreadable response body: {}", e),
        })
    }

    // --- identity ---

    /// Password grant; returns the session object
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Value, BackendError> {
        let response = self
            .request(Method::POST, "auth/v1/token?grant_type=password")?
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::json_or_null(Self::check(response).await?).await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Value, BackendError> {
        let response = self
            .request(Method::POST, "auth/v1/signup")?
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::json_or_null(Self::check(response).await?).await
    }

    /// Revoke the session the bearer belongs to
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        let response = self.request(Method::POST, "auth/v1/logout")?.send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Requires the service-role key as bearer
    pub async fn admin_delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        let path = format!("auth/v1/admin/users/{}", urlencode_segment(user_id));
        let response = self.request(Method::DELETE, &path)?.send().await?;
        Self::check(response).await?;
        Ok(())
    }

    // --- tables ---

    fn table(&self, method: Method, table: &str, filters: &[EqFilter<'_>]) -> Result<RequestBuilder, BackendError> {
        let mut builder = self.request(method, &format!("rest/v1/{}", urlencode_segment(table)))?;
        let params: Vec<(&str, String)> = filters
            .iter()
            .map(|EqFilter(column, value)| (*column, format!("eq.{}", value)))
            .collect();
        if !params.is_empty() {
            builder = builder.query(&params);
        }
        Ok(builder)
    }

    pub async fn select(&self, table: &str, filters: &[EqFilter<'_>]) -> Result<Value, BackendError> {
        let response = self
            .table(Method::GET, table, filters)?
            .query(&[("select", "*")])
            .send()
            .await?;
        Self::json_or_null(Self::check(response).await?).await
    }

    /// Insert one row and return the stored representation
    pub async fn insert<T: Serialize + ?Sized>(&self, table: &str, row: &T) -> Result<Value, BackendError> {
        let response = self
            .table(Method::POST, table, &[])?
            .header("Prefer", HeaderValue::from_static("return=representation"))
            .query(&[("select", "*")])
            .json(row)
            .send()
            .await?;
        Self::json_or_null(Self::check(response).await?).await
    }

    pub async fn update<T: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &T,
        filters: &[EqFilter<'_>],
    ) -> Result<Value, BackendError> {
        let response = self
            .table(Method::PATCH, table, filters)?
            .header("Prefer", HeaderValue::from_static("return=representation"))
            .json(row)
            .send()
            .await?;
        Self::json_or_null(Self::check(response).await?).await
    }

    pub async fn delete(&self, table: &str, filters: &[EqFilter<'_>]) -> Result<(), BackendError> {
        let response = self.table(Method::DELETE, table, filters)?.send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Percent-encode a single path segment
fn urlencode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
