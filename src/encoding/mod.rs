//! Categorical label encoders loaded from the offline pipeline's encoder registry.
//!
//! The registry artifact is a JSON object mapping encoder name to its ordered class list:
//!
//! ```json
//! { "Postal Code": ["10009", "10024", "98105"], "Product ID": ["FUR-BO-1000", "OFF-PA-1001"] }
//! ```
//!
//! Classes may be strings or numbers; numbers are normalised with [`normalize_label`] so that a
//! postal code stored as `10024` matches a request for `"10024"`.

pub mod error;
pub mod label;


pub use error::{EncoderError, EncoderResult};
pub use label::LabelEncoder;

use std::collections::HashMap;

use serde_json::Value;

/// Read-only set of named label encoders.
#[derive(Debug, Clone, Default)]
pub struct EncoderRegistry {
    encoders: HashMap<String, LabelEncoder>,
}

impl EncoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the registry artifact.
    pub fn from_json_slice(bytes: &[u8]) -> EncoderResult<Self> {
        let root: Value = serde_json::from_slice(bytes)?;
        let Value::Object(entries) = root else {
            return Err(EncoderError::InvalidRegistry(
                "expected a JSON object of encoder name to class list".to_string(),
            ));
        };

        let mut registry = Self::new();
        for (name, classes) in entries {
            let Value::Array(values) = classes else {
                return Err(EncoderError::InvalidRegistry(format!(
                    "encoder '{name}' must map to an array of classes"
                )));
            };

            let labels = values
                .iter()
                .map(|v| {
                    normalize_label(v).ok_or_else(|| EncoderError::UnsupportedClass {
                        encoder: name.clone(),
                        value: v.to_string(),
                    })
                })
                .collect::<EncoderResult<Vec<_>>>()?;

            registry.insert(LabelEncoder::new(name, labels)?);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, encoder: LabelEncoder) {
        self.encoders.insert(encoder.name().to_string(), encoder);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_encoder(mut self, encoder: LabelEncoder) -> Self {
        self.insert(encoder);
        self
    }

    pub fn get(&self, name: &str) -> Option<&LabelEncoder> {
        self.encoders.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.encoders.contains_key(name)
    }

    /// Encoder names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.encoders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}

/// Canonical string form of a JSON scalar used as a categorical label.
///
/// Integral floats lose their fractional part (`10024.0` → `"10024"`). Returns `None` for
/// null, arrays and objects.
pub fn normalize_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
