//! Immutable reference dataset of historical encoded records.
//!
//! The table is columnar and every cell is an `f64`; missing, null and non-numeric cells are
//! stored as NaN. Two artifact layouts are accepted:
//!
//! - an array of row objects (`[{"postal_code_encoded": 3, "Sales": 12.5}, ...]`)
//! - an object of equally long column arrays (`{"postal_code_encoded": [3, 3], "Sales": [...]}`)
//!
//! # Join Assumption
//!
//! Outlet attributes (region, city, state) are read from the first row of a postal code and
//! product attributes (category, sub-category, name) from the first row of a product. That is
//! only correct when those attributes are functionally determined by their key.
//! [`ReferenceDataset::join_violations`] reports every key for which this does not hold.

pub mod error;
pub mod index;

#[cfg(test)]
mod tests;

pub use error::{DatasetError, DatasetResult};
pub use index::{KeyIndex, as_key};

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use crate::constants::{
    OUTLET_ATTRIBUTE_COLUMNS, POSTAL_CODE_COLUMN, PRODUCT_ATTRIBUTE_COLUMNS, PRODUCT_ID_COLUMN,
    PRODUCT_NAME_COLUMN,
};

#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    values: Vec<Vec<f64>>,
    num_rows: usize,
    indices: HashMap<String, KeyIndex>,
}

/// A key whose rows disagree on an attribute that should depend on the key alone.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyViolation {
    pub key_column: String,
    pub attribute: String,
    /// Number of distinct keys with more than one attribute value.
    pub conflicting_keys: usize,
    /// One offending key, for log messages.
    pub example_key: i64,
}

impl ReferenceDataset {
    /// Builds a dataset from named columns. All columns must have the same length.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> DatasetResult<Self> {
        let num_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut positions = HashMap::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());

        for (name, column) in columns {
            if column.len() != num_rows {
                return Err(DatasetError::RaggedColumn {
                    column: name,
                    expected: num_rows,
                    actual: column.len(),
                });
            }
            if let Some(&pos) = positions.get(&name) {
                values[pos] = column;
                continue;
            }
            positions.insert(name.clone(), names.len());
            names.push(name);
            values.push(column);
        }

        let mut dataset = Self {
            columns: names,
            positions,
            values,
            num_rows,
            indices: HashMap::new(),
        };
        for key_column in [POSTAL_CODE_COLUMN, PRODUCT_ID_COLUMN] {
            if let Some(column) = dataset.column(key_column) {
                let index = KeyIndex::build(column);
                dataset.indices.insert(key_column.to_string(), index);
            }
        }
        Ok(dataset)
    }

    /// Parses the dataset artifact (row records or column lists).
    pub fn from_json_slice(bytes: &[u8]) -> DatasetResult<Self> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Array(records) => Self::from_records(&records),
            Value::Object(columns) => {
                let columns = columns
                    .into_iter()
                    .map(|(name, cells)| match cells {
                        Value::Array(cells) => Ok((name, cells.iter().map(cell_value).collect())),
                        _ => Err(DatasetError::InvalidShape(format!(
                            "column '{name}' must be an array"
                        ))),
                    })
                    .collect::<DatasetResult<Vec<_>>>()?;
                Self::from_columns(columns)
            }
            _ => Err(DatasetError::InvalidShape(
                "expected an array of records or an object of columns".to_string(),
            )),
        }
    }

    fn from_records(records: &[Value]) -> DatasetResult<Self> {
        let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (row, record) in records.iter().enumerate() {
            let Value::Object(fields) = record else {
                return Err(DatasetError::InvalidShape(format!(
                    "record {row} is not an object"
                )));
            };

            for (name, cell) in fields {
                let pos = *positions.entry(name.clone()).or_insert_with(|| {
                    columns.push((name.clone(), vec![f64::NAN; row]));
                    columns.len() - 1
                });
                let column = &mut columns[pos].1;
                if column.len() == row {
                    column.push(cell_value(cell));
                }
            }

            for (_, column) in columns.iter_mut() {
                if column.len() == row {
                    column.push(f64::NAN);
                }
            }
        }

        Self::from_columns(columns)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.positions
            .get(name)
            .map(|&pos| self.values[pos].as_slice())
    }

    pub fn value(&self, column: &str, row: usize) -> Option<f64> {
        self.column(column).and_then(|values| values.get(row).copied())
    }

    /// NaN-skipping column mean. `None` when the column does not exist; NaN when it holds no
    /// numeric value.
    pub fn mean(&self, column: &str) -> Option<f64> {
        self.column(column).map(|values| nan_mean(values.iter().copied()))
    }

    /// NaN-skipping mean of `column` over `rows`. NaN when the column is absent or no row holds
    /// a value.
    pub fn mean_over_rows(&self, column: &str, rows: &[usize]) -> f64 {
        match self.column(column) {
            Some(values) => nan_mean(rows.iter().filter_map(|&r| values.get(r).copied())),
            None => f64::NAN,
        }
    }

    /// Index of an integer-coded key column (built at load for postal code and product id).
    pub fn key_index(&self, column: &str) -> Option<&KeyIndex> {
        self.indices.get(column)
    }

    pub fn require_key_index(&self, column: &str) -> DatasetResult<&KeyIndex> {
        self.key_index(column)
            .ok_or_else(|| DatasetError::MissingColumn(column.to_string()))
    }

    /// Finds keys of `key_column` whose rows disagree on `attribute`.
    ///
    /// Returns `Ok(None)` when the attribute column does not exist.
    pub fn dependency_violation(
        &self,
        key_column: &str,
        attribute: &str,
    ) -> DatasetResult<Option<DependencyViolation>> {
        let index: Cow<'_, KeyIndex> = match self.key_index(key_column) {
            Some(index) => Cow::Borrowed(index),
            None => {
                let column = self
                    .column(key_column)
                    .ok_or_else(|| DatasetError::MissingColumn(key_column.to_string()))?;
                Cow::Owned(KeyIndex::build(column))
            }
        };
        let Some(values) = self.column(attribute) else {
            return Ok(None);
        };

        let mut conflicting_keys = 0;
        let mut example_key = None;
        for &key in index.keys() {
            let rows = index.rows(key);
            let first = values[rows[0]];
            let consistent = rows[1..].iter().all(|&r| same_cell(values[r], first));
            if !consistent {
                conflicting_keys += 1;
                example_key.get_or_insert(key);
            }
        }

        Ok(example_key.map(|example_key| DependencyViolation {
            key_column: key_column.to_string(),
            attribute: attribute.to_string(),
            conflicting_keys,
            example_key,
        }))
    }

    /// Checks every attribute the ranking routine reads through the first-row join.
    pub fn join_violations(&self) -> Vec<DependencyViolation> {
        let product_attributes = PRODUCT_ATTRIBUTE_COLUMNS
            .iter()
            .copied()
            .chain(std::iter::once(PRODUCT_NAME_COLUMN));

        OUTLET_ATTRIBUTE_COLUMNS
            .iter()
            .map(|&attr| (POSTAL_CODE_COLUMN, attr))
            .chain(product_attributes.map(|attr| (PRODUCT_ID_COLUMN, attr)))
            .filter_map(|(key, attr)| self.dependency_violation(key, attr).ok().flatten())
            .collect()
    }
}

/// Converts a JSON cell to `f64`; anything non-numeric becomes NaN.
fn cell_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Null | Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

fn same_cell(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Mean of the non-NaN values; NaN when there are none.
pub fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
