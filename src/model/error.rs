use thiserror::Error;

/// Errors returned while loading or evaluating a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model text could not be parsed.
    #[error("model parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The native booster rejected the model or failed to report on it.
    #[error("LightGBM booster error: {0}")]
    Booster(String),

    /// The model uses a feature this runtime does not serve.
    #[error("unsupported model: {0}")]
    Unsupported(String),

    /// Row width differs from the model's feature count.
    #[error("feature count mismatch: model expects {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// Predictor returned a different number of scores than rows.
    #[error("prediction count mismatch: expected {expected} scores, got {actual}")]
    PredictionCountMismatch { expected: usize, actual: usize },

    /// Feature column artifact is malformed.
    #[error("invalid feature columns: {0}")]
    InvalidFeatureColumns(String),

    /// Inference failed for a reason specific to the predictor.
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("feature columns JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
