use thiserror::Error;

use crate::dataset::DatasetError;
use crate::encoding::EncoderError;
use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum RankingError {
    /// A required encoder is absent from the registry.
    #[error("{0} encoder not found")]
    MissingEncoder(&'static str),

    /// The postal code encoder has no classes to fall back to.
    #[error("{0} encoder has no classes")]
    EmptyEncoder(&'static str),

    #[error("reference dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("decode failed: {0}")]
    Decode(#[from] EncoderError),
}

impl RankingError {
    /// `true` when the loaded artifacts, not the request, are at fault.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RankingError::MissingEncoder(_)
                | RankingError::EmptyEncoder(_)
                | RankingError::Dataset(_)
        )
    }
}

pub type RankingResult<T> = Result<T, RankingError>;
