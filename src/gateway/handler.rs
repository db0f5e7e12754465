use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::constants::RANKER_STATUS_HEADER;

use super::error::GatewayError;
use super::payload::{RankRequest, RankResponse, Recommendation};
use super::state::HandlerState;

#[instrument(
    skip(state, body),
    fields(postal_code = tracing::field::Empty, top_k = tracing::field::Empty)
)]
pub async fn rank_handler(
    State(state): State<HandlerState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let request = RankRequest::from_value(body)?;
    request.validate(state.max_top_k)?;

    let span = tracing::Span::current();
    span.record("postal_code", tracing::field::display(&request.postal_code));
    span.record("top_k", request.top_k);

    let context = state.context.clone();
    let RankRequest {
        postal_code,
        top_k,
    } = request;

    // CPU-bound: one feature row and one booster call per batch.
    let ranking = tokio::task::spawn_blocking(move || context.rank(&postal_code, top_k))
        .await
        .map_err(|e| GatewayError::Internal(format!("ranking task failed: {e}")))??;

    debug!(
        resolution = %ranking.resolution,
        candidates = ranking.candidates,
        returned = ranking.len(),
        "Ranking complete"
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        RANKER_STATUS_HEADER,
        HeaderValue::from_static(ranking.resolution.status()),
    );

    let response = RankResponse {
        recommendations: ranking
            .products
            .into_iter()
            .map(Recommendation::from)
            .collect(),
    };

    Ok((StatusCode::OK, headers, Json(response)).into_response())
}
