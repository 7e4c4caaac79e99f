use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers;
use crate::middleware::token_gate;
use crate::supabase::{Backend, SupabaseBackend};

/// Shared across requests; immutable after startup
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self { backend: Arc::new(backend) }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let backend = SupabaseBackend::new(&config.supabase).context("failed to initialize backend client")?;
        Ok(Self::new(backend))
    }
}

pub fn app(state: AppState, config: &AppConfig) -> anyhow::Result<Router> {
    Ok(Router::new()
        // Public
        .merge(session_routes())
        // Protected by the expiry gate
        .merge(protected_routes())
        .with_state(state)
        // Global middleware
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.security.cors_origin)?)
        .layer(TraceLayer::new_for_http()))
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/signin", post(handlers::signin))
        .route("/signout", post(handlers::signout))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/:userId", delete(handlers::delete_user))
        .route(
            "/flightLogs",
            get(handlers::list_flight_logs).post(handlers::create_flight_log),
        )
        // GET matches on the flightId column, PUT/DELETE on the row id
        .route(
            "/flightLogs/:flightLogId",
            get(handlers::get_flight_logs)
                .put(handlers::update_flight_log)
                .delete(handlers::delete_flight_log),
        )
        .route_layer(middleware::from_fn(token_gate))
}

/// Only the configured origin is allowed; preflights from anywhere else get
/// no `Access-Control-Allow-Origin` and the browser refuses the request.
fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin {:?}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Bind and serve until the process exits
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let router = app(state, config)?;

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("flightlog-api listening on http://{}", bind_addr);

    axum::serve(listener, router).await.context("server error")
}
