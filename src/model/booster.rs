//! LightGBM booster behind the [`Predictor`] seam.

use std::fmt;
use std::io::Write;

use lightgbm_rust::{Booster, predict_type};
use ndarray::ArrayView2;
use tempfile::NamedTempFile;
use tracing::debug;

use super::Predictor;
use super::error::{ModelError, ModelResult};
use super::text::ModelText;

/// A LightGBM text model loaded into the native booster.
pub struct LightGbmModel {
    booster: Booster,
    num_features: usize,
    feature_names: Vec<String>,
    num_trees: usize,
}

// SAFETY: the booster is never mutated after load, and LightGBM guards concurrent
// predictions on one booster with its own lock.
unsafe impl Send for LightGbmModel {}
unsafe impl Sync for LightGbmModel {}

impl LightGbmModel {
    /// Validates `text`, keeps the first `num_iteration` rounds (`None` = all) and loads it.
    pub fn from_text(text: &str, num_iteration: Option<usize>) -> ModelResult<Self> {
        let model = ModelText::parse(text)?;
        let num_trees = model.trees_for(num_iteration);

        // The booster loads from a path only.
        let mut file = NamedTempFile::new().map_err(|e| booster_error("temp file", e))?;
        file.write_all(model.truncated(num_iteration).as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| booster_error("temp file", e))?;
        let path = file.path().to_str().ok_or_else(|| {
            ModelError::Booster(format!("non UTF-8 temp path {}", file.path().display()))
        })?;

        let booster = Booster::load(path).map_err(|e| booster_error("load", e))?;

        let num_classes = booster
            .num_classes()
            .map_err(|e| booster_error("num_classes", e))?;
        if num_classes != 1 {
            return Err(ModelError::Unsupported(format!(
                "{num_classes} classes; only single-output models are served"
            )));
        }

        let num_features = booster
            .num_features()
            .map_err(|e| booster_error("num_features", e))? as usize;
        if num_features != model.num_features() {
            return Err(ModelError::FeatureCountMismatch {
                expected: model.num_features(),
                actual: num_features,
            });
        }

        debug!(
            trees = num_trees,
            total_trees = model.num_trees(),
            num_features,
            "Loaded LightGBM booster"
        );

        Ok(Self {
            booster,
            num_features,
            feature_names: model.feature_names().to_vec(),
            num_trees,
        })
    }
}

fn booster_error(stage: &str, err: impl fmt::Display) -> ModelError {
    ModelError::Booster(format!("{stage}: {err}"))
}

impl fmt::Debug for LightGbmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightGbmModel")
            .field("num_features", &self.num_features)
            .field("num_trees", &self.num_trees)
            .finish()
    }
}

impl Predictor for LightGbmModel {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> ModelResult<Vec<f64>> {
        if rows.ncols() != self.num_features {
            return Err(ModelError::FeatureCountMismatch {
                expected: self.num_features,
                actual: rows.ncols(),
            });
        }
        if rows.nrows() == 0 {
            return Ok(Vec::new());
        }

        // Row-major, as the booster expects.
        let data: Vec<f64> = rows.iter().copied().collect();
        let scores = self
            .booster
            .predict(&data, rows.nrows() as _, rows.ncols() as _, predict_type::NORMAL)
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        Ok(scores.into_iter().map(f64::from).collect())
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(&self.feature_names)
        }
    }

    fn num_trees(&self) -> Option<usize> {
        Some(self.num_trees)
    }
}
