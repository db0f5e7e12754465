use std::sync::Arc;

use tracing::warn;

use crate::dataset::ReferenceDataset;
use crate::encoding::EncoderRegistry;
use crate::model::{FeatureColumns, ModelError, Predictor};

use super::error::RankingResult;
use super::ranker;
use super::types::Ranking;

/// Everything the ranking routine reads, loaded once and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct RankingContext {
    model: Arc<dyn Predictor>,
    encoders: Arc<EncoderRegistry>,
    dataset: Arc<ReferenceDataset>,
    feature_columns: Arc<FeatureColumns>,
}

impl RankingContext {
    /// Bundles the artifacts, rejecting a model whose input width differs from the column list.
    ///
    /// Differing feature names only produce a warning: the model consumes columns by position.
    pub fn new(
        model: Arc<dyn Predictor>,
        encoders: EncoderRegistry,
        dataset: ReferenceDataset,
        feature_columns: FeatureColumns,
    ) -> Result<Self, ModelError> {
        if model.num_features() != feature_columns.len() {
            return Err(ModelError::FeatureCountMismatch {
                expected: model.num_features(),
                actual: feature_columns.len(),
            });
        }

        if let Some(names) = model.feature_names()
            && names != feature_columns.names()
        {
            warn!(
                model_features = ?names,
                feature_columns = ?feature_columns.names(),
                "Model feature names differ from the feature column list; using column order"
            );
        }

        Ok(Self {
            model,
            encoders: Arc::new(encoders),
            dataset: Arc::new(dataset),
            feature_columns: Arc::new(feature_columns),
        })
    }

    pub fn model(&self) -> &dyn Predictor {
        self.model.as_ref()
    }

    pub fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    pub fn feature_columns(&self) -> &FeatureColumns {
        &self.feature_columns
    }

    /// Ranks every product for `postal_code` and keeps the best `top_k`.
    pub fn rank(&self, postal_code: &str, top_k: usize) -> RankingResult<Ranking> {
        ranker::rank(postal_code, top_k, self)
    }
}
