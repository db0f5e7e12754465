use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::ArrayView2;

use super::Predictor;
use super::error::{ModelError, ModelResult};

/// Linear stand-in for a trained model: `score = bias + Σ weight[i] * row[i]`.
///
/// Counts calls to [`predict`](Predictor::predict) so tests can assert that a ranking
/// request issues a single batched inference.
#[derive(Debug, Clone)]
pub struct MockPredictor {
    weights: Vec<f64>,
    bias: f64,
    fail_with: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockPredictor {
    pub fn new(weights: Vec<f64>) -> Self {
        Self {
            weights,
            bias: 0.0,
            fail_with: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Predictor that returns the same score for every row.
    pub fn constant(num_features: usize, score: f64) -> Self {
        Self::new(vec![0.0; num_features]).with_bias(score)
    }

    /// Predictor whose every call fails with `reason`.
    pub fn failing(num_features: usize, reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::new(vec![0.0; num_features])
        }
    }

    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> ModelResult<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.fail_with {
            return Err(ModelError::Inference(reason.clone()));
        }
        if rows.ncols() != self.weights.len() {
            return Err(ModelError::FeatureCountMismatch {
                expected: self.weights.len(),
                actual: rows.ncols(),
            });
        }

        Ok(rows
            .rows()
            .into_iter()
            .map(|row| {
                self.bias
                    + row
                        .iter()
                        .zip(&self.weights)
                        .map(|(value, weight)| value * weight)
                        .sum::<f64>()
            })
            .collect())
    }

    fn num_features(&self) -> usize {
        self.weights.len()
    }
}
