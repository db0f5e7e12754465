//! HTTP gateway (Axum) serving ranking requests.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::rank_handler;
pub use payload::{RankRequest, RankResponse, Recommendation};
pub use state::HandlerState;

use crate::artifacts::ArtifactFingerprint;
use crate::constants::{PRODUCT_ID_COLUMN, RANKER_STATUS_HEADER};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/meow", post(rank_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse<'a> {
    pub status: &'static str,
    pub products: usize,
    pub reference_rows: usize,
    pub num_features: usize,
    pub num_trees: Option<usize>,
    pub encoders: Vec<&'a str>,
    pub join_violations: usize,
    pub loaded_at: DateTime<Utc>,
    pub artifacts: &'a [ArtifactFingerprint],
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(RANKER_STATUS_HEADER, HeaderValue::from_static("ok"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Artifacts are loaded before the listener binds, so a running server is always ready.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let context = &state.context;
    let manifest = &state.manifest;

    let products = context
        .dataset()
        .key_index(PRODUCT_ID_COLUMN)
        .map(|index| index.len())
        .unwrap_or(0);

    let mut headers = HeaderMap::new();
    headers.insert(RANKER_STATUS_HEADER, HeaderValue::from_static("ok"));

    let body = ReadyResponse {
        status: "ok",
        products,
        reference_rows: manifest.reference_rows,
        num_features: manifest.num_features,
        num_trees: manifest.num_trees,
        encoders: context.encoders().names(),
        join_violations: manifest.join_violations,
        loaded_at: manifest.loaded_at,
        artifacts: &manifest.files,
    };

    (StatusCode::OK, headers, Json(body)).into_response()
}
