//! Cross-cutting, shared constants.
//!
//! Encoder names and reference-dataset column names are fixed by the offline pipeline that
//! produced the artifacts; they are collected here so the ranking routine, the loader and the
//! join-assumption check agree on spelling.

/// Encoder registry key for postal codes.
pub const POSTAL_CODE_ENCODER: &str = "Postal Code";
/// Encoder registry key for product identifiers.
pub const PRODUCT_ID_ENCODER: &str = "Product ID";
/// Encoder registry key for product names (optional).
pub const PRODUCT_NAME_ENCODER: &str = "Product Name";
/// Encoder registry key for product categories (optional).
pub const CATEGORY_ENCODER: &str = "Category";

pub const POSTAL_CODE_COLUMN: &str = "postal_code_encoded";
pub const PRODUCT_ID_COLUMN: &str = "product_id_encoded";
pub const PRODUCT_NAME_COLUMN: &str = "product_name_encoded";
pub const CATEGORY_COLUMN: &str = "category_encoded";
pub const SALES_COLUMN: &str = "Sales";

/// Attributes copied from the first reference row of the requested postal code.
pub const OUTLET_ATTRIBUTE_COLUMNS: [&str; 3] = ["region_encoded", "city_encoded", "state_encoded"];

/// Attributes copied from the first reference row of each product.
pub const PRODUCT_ATTRIBUTE_COLUMNS: [&str; 2] = [CATEGORY_COLUMN, "sub_category_encoded"];

/// Label used when a product has no reference row to decode a name or category from.
pub const UNKNOWN_LABEL: &str = "Unknown";

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_MAX_TOP_K: usize = 1000;

pub const DEFAULT_MODEL_FILE: &str = "model.txt";
pub const DEFAULT_ENCODERS_FILE: &str = "encoders.json";
pub const DEFAULT_FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const DEFAULT_DATASET_FILE: &str = "reference_data.json";

/// Response header carrying the request outcome (`ok`, `fallback` or an error kind).
pub const RANKER_STATUS_HEADER: &str = "X-Ranker-Status";
