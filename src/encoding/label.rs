use std::collections::HashMap;

use super::error::{EncoderError, EncoderResult};

/// Bidirectional mapping between categorical labels and dense integer codes.
///
/// The code of a label is its position in the class list, which is the convention of the
/// offline pipeline that fitted the encoders (sorted classes, code = index).
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    name: String,
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(name: impl Into<String>, classes: Vec<String>) -> EncoderResult<Self> {
        let name = name.into();
        let mut index = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if index.insert(label.clone(), code).is_some() {
                return Err(EncoderError::DuplicateClass {
                    encoder: name,
                    label: label.clone(),
                });
            }
        }
        Ok(Self {
            name,
            classes,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// First class in the encoder's internal ordering.
    pub fn first_class(&self) -> Option<&str> {
        self.classes.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn transform(&self, label: &str) -> EncoderResult<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| EncoderError::UnknownLabel {
                encoder: self.name.clone(),
                label: label.to_string(),
            })
    }

    /// Decodes a code as stored in the reference dataset (which holds every cell as `f64`).
    pub fn inverse_transform(&self, code: f64) -> EncoderResult<&str> {
        code_to_index(code)
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
            .ok_or_else(|| EncoderError::CodeOutOfRange {
                encoder: self.name.clone(),
                code,
                classes: self.classes.len(),
            })
    }
}

fn code_to_index(code: f64) -> Option<usize> {
    if code.is_finite() && code >= 0.0 && code.fract() == 0.0 {
        Some(code as usize)
    } else {
        None
    }
}
