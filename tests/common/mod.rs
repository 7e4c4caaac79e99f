#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, delete, post},
    Json, Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Map, Value};

use flightlog_api::config::{AppConfig, Environment};
use flightlog_api::server::{app, AppState};

pub const ANON_KEY: &str = "anon-test-key";
pub const SERVICE_KEY: &str = "service-role-test-key";
pub const ORIGIN: &str = "https://flightlog.example.com";
pub const PILOT_EMAIL: &str = "pilot@example.com";
pub const PILOT_PASSWORD: &str = "correct-horse";

/// Access token expiring `secs` from now, signed with a key nobody checks
pub fn token_expiring_in(secs: i64) -> String {
    let claims = json!({
        "sub": "3f6c2e1a-pilot",
        "email": PILOT_EMAIL,
        "role": "authenticated",
        "aud": "authenticated",
        "exp": Utc::now().timestamp() + secs,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"fake-project-secret"))
        .expect("token encodes")
}

/// A request as it reached the fake backend
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub apikey: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Default)]
struct FakeState {
    tables: Mutex<HashMap<String, Vec<Map<String, Value>>>>,
    next_id: AtomicU64,
    seen: Mutex<Vec<Seen>>,
}

impl FakeState {
    fn record(&self, method: Method, path: String, headers: &HeaderMap) {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
        self.seen.lock().unwrap().push(Seen {
            method,
            path,
            apikey: header("apikey"),
            bearer: header("authorization").and_then(|v| v.strip_prefix("Bearer ").map(str::to_string)),
        });
    }
}

/// In-process stand-in for the identity and table APIs
pub struct FakeSupabase {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeSupabase {
    async fn start() -> Result<Self> {
        let state = Arc::new(FakeState::default());
        let router = Router::new()
            .route("/auth/v1/token", post(fake_token))
            .route("/auth/v1/logout", post(fake_logout))
            .route("/auth/v1/signup", post(fake_signup))
            .route("/auth/v1/admin/users/:id", delete(fake_admin_delete))
            .route("/rest/v1/:table", any(fake_table))
            .with_state(state.clone());

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        })
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().unwrap().clone()
    }

    pub fn rows(&self, table: &str) -> Vec<Map<String, Value>> {
        self.state.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    pub fn seed(&self, table: &str, row: Value) {
        if let Value::Object(mut row) = row {
            let id = self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            row.entry("id").or_insert(json!(id));
            self.state.tables.lock().unwrap().entry(table.to_string()).or_default().push(row);
        }
    }
}

async fn fake_token(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(Method::POST, "/auth/v1/token".into(), &headers);
    if body["email"] == PILOT_EMAIL && body["password"] == PILOT_PASSWORD {
        Json(json!({
            "access_token": token_expiring_in(3600),
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-me",
            "user": { "id": "3f6c2e1a-pilot", "email": PILOT_EMAIL }
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
        )
            .into_response()
    }
}

async fn fake_logout(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> StatusCode {
    state.record(Method::POST, "/auth/v1/logout".into(), &headers);
    StatusCode::NO_CONTENT
}

async fn fake_signup(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(Method::POST, "/auth/v1/signup".into(), &headers);
    if body["email"] == PILOT_EMAIL {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": 422, "msg": "User already registered" })),
        )
            .into_response();
    }
    Json(json!({ "id": "new-user", "email": body["email"] })).into_response()
}

async fn fake_admin_delete(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(Method::DELETE, format!("/auth/v1/admin/users/{}", id), &headers);
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", SERVICE_KEY));
    if !authorized {
        return (StatusCode::FORBIDDEN, Json(json!({ "msg": "User not allowed" }))).into_response();
    }
    Json(json!({})).into_response()
}

fn matches(row: &Map<String, Value>, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, expected)| match row.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

async fn fake_table(
    State(state): State<Arc<FakeState>>,
    method: Method,
    headers: HeaderMap,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> Response {
    state.record(method.clone(), format!("/rest/v1/{}", table), &headers);

    let filters: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| k.as_str() != "select")
        .filter_map(|(k, v)| v.strip_prefix("eq.").map(|v| (k.clone(), v.to_string())))
        .collect();

    let mut tables = state.tables.lock().unwrap();
    let rows = tables.entry(table).or_default();

    match method {
        Method::GET => {
            let found: Vec<Value> = rows
                .iter()
                .filter(|row| matches(row, &filters))
                .cloned()
                .map(Value::Object)
                .collect();
            Json(Value::Array(found)).into_response()
        }
        Method::POST => {
            let Some(Json(Value::Object(mut row))) = body else {
                return StatusCode::BAD_REQUEST.into_response();
            };
            let id = state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            row.insert("id".into(), json!(id));
            rows.push(row.clone());
            (StatusCode::CREATED, Json(json!([row]))).into_response()
        }
        Method::PATCH => {
            let Some(Json(Value::Object(changes))) = body else {
                return StatusCode::BAD_REQUEST.into_response();
            };
            let mut updated = Vec::new();
            for row in rows.iter_mut().filter(|row| matches(row, &filters)) {
                for (k, v) in &changes {
                    row.insert(k.clone(), v.clone());
                }
                updated.push(Value::Object(row.clone()));
            }
            Json(Value::Array(updated)).into_response()
        }
        Method::DELETE => {
            rows.retain(|row| !matches(row, &filters));
            StatusCode::NO_CONTENT.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// The API under test, wired to a fresh fake backend
pub struct TestServer {
    pub base_url: String,
    pub backend: FakeSupabase,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(customize: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let backend = FakeSupabase::start().await?;

        let mut config = AppConfig::defaults(Environment::Development);
        config.supabase.url = backend.base_url.clone();
        config.supabase.anon_key = ANON_KEY.to_string();
        config.supabase.service_role_key = SERVICE_KEY.to_string();
        config.security.cors_origin = ORIGIN.to_string();
        customize(&mut config);

        let router = app(AppState::from_config(&config)?, &config)?;
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            backend,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
