//! Router for the local dev server.
//!
//! Mirrors the deployed API: the frontend reads the count with GET and
//! registers a visit with POST, and both go through the same counting logic.

use aws_lambda_events::event::sns::SnsEvent;
use axum::{
    extract::{ConnectInfo, State},
    http::{header, Method},
    middleware as axum_middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use shared::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::alarm::{notify_alarms, NotifierResponse};
use crate::observability::request_log_middleware;
use crate::state::AppState;
use crate::visitor::{count_visit, VisitorCountResponse};

static START_TIME: OnceLock<Instant> = OnceLock::new();

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

pub fn get_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn create_dev_router(app_state: Arc<AppState>) -> Router {
    START_TIME.get_or_init(Instant::now);

    Router::new()
        .route("/visitor", get(visitor_count).post(visitor_count))
        .route("/alarm", post(forward_alarm))
        .route("/health", get(health))
        .with_state(app_state)
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(get_cors_layer())
}

async fn visitor_count(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Json<VisitorCountResponse>, AppError> {
    let outcome = count_visit(
        state.secrets.as_ref(),
        state.visitors.as_ref(),
        &state.config.visitor.ip_salt_parameter,
        &peer.ip().to_string(),
    )
    .await?;

    Ok(Json(outcome.into()))
}

async fn forward_alarm(
    State(state): State<Arc<AppState>>,
    Json(event): Json<SnsEvent>,
) -> Result<Json<NotifierResponse>, AppError> {
    notify_alarms(&state, &event).await?;
    Ok(Json(NotifierResponse::sent()))
}

async fn health() -> Json<HealthResponse> {
    let uptime_seconds = START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or_default();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
    })
}
