use thiserror::Error;

/// Errors returned by label encoders and the encoder registry.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// Value is not one of the encoder's known classes.
    #[error("unknown label '{label}' for encoder '{encoder}'")]
    UnknownLabel { encoder: String, label: String },

    /// Code is negative, fractional, NaN, or beyond the class list.
    #[error("code {code} is out of range for encoder '{encoder}' ({classes} classes)")]
    CodeOutOfRange {
        encoder: String,
        code: f64,
        classes: usize,
    },

    /// The same class appears twice in an encoder's class list.
    #[error("duplicate class '{label}' in encoder '{encoder}'")]
    DuplicateClass { encoder: String, label: String },

    /// A class entry was neither a string nor a number.
    #[error("encoder '{encoder}' has unsupported class value: {value}")]
    UnsupportedClass { encoder: String, value: String },

    /// The registry file was not a JSON object of class arrays.
    #[error("invalid encoder registry: {0}")]
    InvalidRegistry(String),

    #[error("encoder registry JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EncoderResult<T> = Result<T, EncoderError>;
