use thiserror::Error;

/// Errors returned while loading or querying the reference dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A required column does not exist in the dataset.
    #[error("reference dataset has no column '{0}'")]
    MissingColumn(String),

    /// Columnar input had columns of different lengths.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// The artifact was not an array of row objects nor an object of column arrays.
    #[error("invalid reference dataset: {0}")]
    InvalidShape(String),

    #[error("reference dataset JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DatasetResult<T> = Result<T, DatasetError>;
