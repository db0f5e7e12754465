use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::RANKER_STATUS_HEADER;
use crate::ranking::RankingError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Loaded artifacts cannot serve the request (missing encoder, absent column, bad code).
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RankingError> for GatewayError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::Model(_) => GatewayError::Model(err.to_string()),
            _ => GatewayError::Configuration(err.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, ranker_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            GatewayError::Model(_) => (StatusCode::INTERNAL_SERVER_ERROR, "model_error"),
            GatewayError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(RANKER_STATUS_HEADER, HeaderValue::from_static(ranker_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
