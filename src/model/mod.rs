//! Scoring model and the feature layout it expects.
//!
//! The ranking routine only needs batch inference, expressed by [`Predictor`]. The production
//! implementation is [`LightGbmModel`], a LightGBM booster loaded from a text dump.

pub mod booster;
pub mod error;
pub mod text;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use booster::LightGbmModel;
pub use error::{ModelError, ModelResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockPredictor;
pub use text::ModelText;

use std::collections::HashMap;

use ndarray::ArrayView2;

/// Batch scorer over a row-major feature matrix (one row per candidate).
pub trait Predictor: Send + Sync + std::fmt::Debug {
    /// Scores every row. Implementations return exactly one score per row.
    fn predict(&self, rows: ArrayView2<'_, f64>) -> ModelResult<Vec<f64>>;

    /// Row width the model was trained on.
    fn num_features(&self) -> usize;

    /// Training-time feature names, when the artifact records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    fn num_trees(&self) -> Option<usize> {
        None
    }
}

/// Ordered column names the model was trained on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureColumns {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureColumns {
    pub fn new(names: Vec<String>) -> ModelResult<Self> {
        if names.is_empty() {
            return Err(ModelError::InvalidFeatureColumns(
                "column list is empty".to_string(),
            ));
        }
        let mut positions = HashMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), pos).is_some() {
                return Err(ModelError::InvalidFeatureColumns(format!(
                    "duplicate column '{name}'"
                )));
            }
        }
        Ok(Self { names, positions })
    }

    /// Parses a JSON array of column names.
    pub fn from_json_slice(bytes: &[u8]) -> ModelResult<Self> {
        let names: Vec<String> = serde_json::from_slice(bytes)?;
        Self::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
