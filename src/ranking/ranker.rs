use std::cmp::Ordering;

use ndarray::Array2;
use tracing::{debug, warn};

use crate::constants::{
    CATEGORY_COLUMN, CATEGORY_ENCODER, OUTLET_ATTRIBUTE_COLUMNS, POSTAL_CODE_COLUMN,
    POSTAL_CODE_ENCODER, PRODUCT_ATTRIBUTE_COLUMNS, PRODUCT_ID_COLUMN, PRODUCT_ID_ENCODER,
    PRODUCT_NAME_COLUMN, PRODUCT_NAME_ENCODER, SALES_COLUMN, UNKNOWN_LABEL,
};
use crate::dataset::ReferenceDataset;
use crate::encoding::{EncoderRegistry, LabelEncoder};
use crate::model::{FeatureColumns, ModelError};

use super::context::RankingContext;
use super::error::{RankingError, RankingResult};
use super::types::{PostalResolution, RankedProduct, Ranking};

/// A product with at least one reference row, ready to be scored.
struct Candidate<'a> {
    code: i64,
    rows: &'a [usize],
}

impl Candidate<'_> {
    fn first_row(&self) -> usize {
        self.rows[0]
    }
}

/// Where a feature column's value comes from when assembling a candidate row.
enum FeatureSource<'a> {
    PostalCode,
    ProductId,
    /// Read from the candidate's first reference row.
    ProductAttribute(&'a [f64]),
    /// Same value for every candidate: an outlet attribute or an imputed mean.
    Constant(f64),
}

/// Scores every product in the reference dataset for one postal code.
///
/// Products are joined to their attributes through the FIRST reference row of the postal code
/// and of the product; see [`ReferenceDataset::join_violations`] for the load-time check of
/// that precondition.
pub fn rank(postal_code: &str, top_k: usize, ctx: &RankingContext) -> RankingResult<Ranking> {
    let encoders = ctx.encoders();
    let dataset = ctx.dataset();

    let resolution = resolve_postal_code(postal_code, encoders)?;
    let product_encoder = encoders
        .get(PRODUCT_ID_ENCODER)
        .ok_or(RankingError::MissingEncoder(PRODUCT_ID_ENCODER))?;

    let postal_index = dataset.require_key_index(POSTAL_CODE_COLUMN)?;
    let product_index = dataset.require_key_index(PRODUCT_ID_COLUMN)?;

    let Some(outlet_row) = postal_index.first_row(resolution.code() as i64) else {
        debug!(
            postal_code,
            code = resolution.code(),
            "No reference rows for postal code; nothing to rank"
        );
        return Ok(Ranking::empty(resolution));
    };

    let candidates: Vec<Candidate<'_>> = product_index
        .keys()
        .iter()
        .map(|&code| Candidate {
            code,
            rows: product_index.rows(code),
        })
        .filter(|c| !c.rows.is_empty())
        .collect();

    let features = build_feature_matrix(
        &candidates,
        resolution.code(),
        outlet_row,
        dataset,
        ctx.feature_columns(),
    );

    let scores = ctx.model().predict(features.view())?;
    if scores.len() != candidates.len() {
        return Err(ModelError::PredictionCountMismatch {
            expected: candidates.len(),
            actual: scores.len(),
        }
        .into());
    }

    let name_encoder = encoders.get(PRODUCT_NAME_ENCODER);
    let category_encoder = encoders.get(CATEGORY_ENCODER);

    let mut products = candidates
        .iter()
        .zip(scores)
        .map(|(candidate, score)| {
            let first_row = candidate.first_row();
            Ok(RankedProduct {
                product_code: candidate.code,
                product_id: product_encoder
                    .inverse_transform(candidate.code as f64)?
                    .to_string(),
                product_name: name_encoder
                    .map(|enc| decode_attribute(enc, dataset, PRODUCT_NAME_COLUMN, first_row))
                    .transpose()?,
                category: category_encoder
                    .map(|enc| decode_attribute(enc, dataset, CATEGORY_COLUMN, first_row))
                    .transpose()?,
                predicted_potential: score,
                historical_sales: dataset.mean_over_rows(SALES_COLUMN, candidate.rows),
            })
        })
        .collect::<RankingResult<Vec<_>>>()?;

    sort_by_potential(&mut products);
    let scored = products.len();
    products.truncate(top_k);

    debug!(
        postal_code,
        resolution = %resolution,
        candidates = scored,
        returned = products.len(),
        "Ranked products"
    );

    Ok(Ranking {
        resolution,
        products,
        candidates: scored,
    })
}

/// Maps a postal code to its encoded form, falling back to the encoder's first class.
pub fn resolve_postal_code(
    postal_code: &str,
    encoders: &EncoderRegistry,
) -> RankingResult<PostalResolution> {
    let encoder = encoders
        .get(POSTAL_CODE_ENCODER)
        .ok_or(RankingError::MissingEncoder(POSTAL_CODE_ENCODER))?;

    if encoder.contains(postal_code) {
        let code = encoder.transform(postal_code)?;
        return Ok(PostalResolution::Known { code });
    }

    // First class in encoder order, not the most frequent outlet.
    let fallback = encoder
        .first_class()
        .ok_or(RankingError::EmptyEncoder(POSTAL_CODE_ENCODER))?;
    let code = encoder.transform(fallback)?;

    warn!(
        requested = postal_code,
        fallback, "Postal code not found; defaulting to first known postal code"
    );

    Ok(PostalResolution::Fallback {
        requested: postal_code.to_string(),
        fallback: fallback.to_string(),
        code,
    })
}

/// Builds one row per candidate in `feature_columns` order.
///
/// Columns the assembled record does not provide are imputed with the reference mean (or 0
/// when the dataset lacks the column); any NaN left afterwards becomes 0.
fn build_feature_matrix(
    candidates: &[Candidate<'_>],
    postal_code: usize,
    outlet_row: usize,
    dataset: &ReferenceDataset,
    feature_columns: &FeatureColumns,
) -> Array2<f64> {
    let sources: Vec<FeatureSource<'_>> = feature_columns
        .names()
        .iter()
        .map(|name| feature_source(name, outlet_row, dataset))
        .collect();

    let mut matrix = Array2::<f64>::zeros((candidates.len(), sources.len()));
    for (mut row, candidate) in matrix.rows_mut().into_iter().zip(candidates) {
        for (cell, source) in row.iter_mut().zip(&sources) {
            let value = match source {
                FeatureSource::PostalCode => postal_code as f64,
                FeatureSource::ProductId => candidate.code as f64,
                FeatureSource::ProductAttribute(values) => values[candidate.first_row()],
                FeatureSource::Constant(value) => *value,
            };
            *cell = if value.is_nan() { 0.0 } else { value };
        }
    }
    matrix
}

fn feature_source<'a>(
    name: &str,
    outlet_row: usize,
    dataset: &'a ReferenceDataset,
) -> FeatureSource<'a> {
    if name == POSTAL_CODE_COLUMN {
        return FeatureSource::PostalCode;
    }
    if name == PRODUCT_ID_COLUMN {
        return FeatureSource::ProductId;
    }
    if OUTLET_ATTRIBUTE_COLUMNS.contains(&name)
        && let Some(value) = dataset.value(name, outlet_row)
    {
        return FeatureSource::Constant(value);
    }
    if PRODUCT_ATTRIBUTE_COLUMNS.contains(&name)
        && let Some(values) = dataset.column(name)
    {
        return FeatureSource::ProductAttribute(values);
    }
    FeatureSource::Constant(dataset.mean(name).unwrap_or(0.0))
}

fn decode_attribute(
    encoder: &LabelEncoder,
    dataset: &ReferenceDataset,
    column: &str,
    row: usize,
) -> RankingResult<String> {
    match dataset.value(column, row) {
        Some(code) if !code.is_nan() => Ok(encoder.inverse_transform(code)?.to_string()),
        _ => Ok(UNKNOWN_LABEL.to_string()),
    }
}

/// Predicted potential descending, then historical sales descending; NaN last on both keys.
/// The sort is stable, so full ties keep reference-dataset order.
pub fn sort_by_potential(products: &mut [RankedProduct]) {
    products.sort_by(|a, b| {
        descending_nan_last(a.predicted_potential, b.predicted_potential)
            .then_with(|| descending_nan_last(a.historical_sales, b.historical_sales))
    });
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
