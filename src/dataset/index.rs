use std::collections::HashMap;

/// Row positions grouped by an integer-coded key column.
///
/// Keys are listed in first-appearance order, matching how the reference dataset enumerates
/// distinct products. Cells that are not finite integers (NaN, fractional codes) are not
/// indexed.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    order: Vec<i64>,
    rows: HashMap<i64, Vec<usize>>,
}

impl KeyIndex {
    pub fn build(values: &[f64]) -> Self {
        let mut order = Vec::new();
        let mut rows: HashMap<i64, Vec<usize>> = HashMap::new();
        for (row, value) in values.iter().enumerate() {
            let Some(key) = as_key(*value) else {
                continue;
            };
            rows.entry(key)
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(row);
        }
        Self { order, rows }
    }

    /// Distinct keys in first-appearance order.
    pub fn keys(&self) -> &[i64] {
        &self.order
    }

    /// Rows holding `key`, in table order. Empty when the key never occurs.
    pub fn rows(&self, key: i64) -> &[usize] {
        self.rows.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_row(&self, key: i64) -> Option<usize> {
        self.rows(key).first().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Interprets a cell as an encoded key.
pub fn as_key(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}
