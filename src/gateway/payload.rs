use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::DEFAULT_TOP_K;
use crate::encoding::normalize_label;
use crate::ranking::RankedProduct;

use super::error::GatewayError;

/// Body of `POST /api/meow`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankRequest {
    /// Accepted as a string or a JSON number (`10024` and `"10024"` are the same outlet).
    #[serde(deserialize_with = "deserialize_postal_code")]
    pub postal_code: String,

    #[serde(default = "default_top_k", deserialize_with = "deserialize_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn deserialize_postal_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::String(_) | Value::Number(_) => normalize_label(&value)
            .ok_or_else(|| serde::de::Error::custom("postal_code is not a usable label")),
        other => Err(serde::de::Error::custom(format!(
            "postal_code must be a string or number, got {other}"
        ))),
    }
}

fn deserialize_top_k<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value
        .as_u64()
        .and_then(|k| usize::try_from(k).ok())
        .ok_or_else(|| {
            serde::de::Error::custom(format!("top_k must be a non-negative integer, got {value}"))
        })
}

impl RankRequest {
    pub fn from_value(body: Value) -> Result<Self, GatewayError> {
        serde_json::from_value(body)
            .map_err(|e| GatewayError::InvalidRequest(format!("invalid request body: {e}")))
    }

    pub fn validate(&self, max_top_k: usize) -> Result<(), GatewayError> {
        if self.top_k == 0 || self.top_k > max_top_k {
            return Err(GatewayError::InvalidRequest(format!(
                "top_k must be between 1 and {max_top_k}, got {}",
                self.top_k
            )));
        }
        Ok(())
    }
}

/// One output row. Field names follow the column names downstream consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "Product_ID")]
    pub product_id: String,

    /// Omitted entirely when no product name encoder is loaded.
    #[serde(rename = "Product_Name", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// `null` when no category encoder is loaded.
    #[serde(rename = "Category")]
    pub category: Option<String>,

    pub predicted_potential: f64,
}

impl From<RankedProduct> for Recommendation {
    fn from(product: RankedProduct) -> Self {
        Self {
            product_id: product.product_id,
            product_name: product.product_name,
            category: product.category,
            predicted_potential: product.predicted_potential,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub recommendations: Vec<Recommendation>,
}
