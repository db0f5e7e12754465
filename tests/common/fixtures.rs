//! Artifact files written to a temporary directory.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use ranker::config::Config;
use ranker::constants::{
    DEFAULT_DATASET_FILE, DEFAULT_ENCODERS_FILE, DEFAULT_FEATURE_COLUMNS_FILE, DEFAULT_MODEL_FILE,
};

/// Two trees over five features. Tree 0 sends category 0 to 0.2, then splits products at
/// code 2.5 into 0.6 / 0.9. Tree 1 adds a constant 0.1.
pub const MODEL: &str = "tree
version=v4
num_class=1
num_tree_per_iteration=1
label_index=0
max_feature_idx=4
objective=regression
feature_names=postal_code_encoded product_id_encoded region_encoded category_encoded Quantity
feature_infos=[0:2] [0:3] [0:1] [0:1] [1:5]

Tree=0
num_leaves=3
num_cat=0
split_feature=3 1
split_gain=12.5 3.75
threshold=0.50000000000000011 2.5000000000000004
decision_type=2 2
left_child=-1 -2
right_child=1 -3
leaf_value=0.20000000000000001 0.59999999999999998 0.90000000000000002
leaf_weight=2 2 1
leaf_count=2 2 1
internal_value=0 0
internal_weight=5 3
internal_count=5 3
is_linear=0
shrinkage=1


Tree=1
num_leaves=1
num_cat=0
split_feature=
split_gain=
threshold=
decision_type=
left_child=
right_child=
leaf_value=0.10000000000000001
leaf_weight=5
leaf_count=5
internal_value=
internal_weight=
internal_count=
is_linear=0
shrinkage=0.1


end of trees

feature_importances:
category_encoded=1
product_id_encoded=1

parameters:
[boosting: gbdt]
[objective: regression]
end of parameters

pandas_categorical:null
";

/// "10009" is a known postal code with no reference rows.
pub const ENCODERS: &str = r#"{
    "Postal Code": [10024, 98105, 10009],
    "Product ID": ["P-100", "P-200", "P-300", "P-400"],
    "Product Name": ["Desk Lamp", "Office Chair", "Standing Desk", "Monitor Arm"],
    "Category": ["Furniture", "Office Supplies"],
    "Region": ["East", "West"]
}"#;

pub const FEATURE_COLUMNS: &str = r#"[
    "postal_code_encoded",
    "product_id_encoded",
    "region_encoded",
    "category_encoded",
    "Quantity"
]"#;

pub const DATASET: &str = r#"[
    {"postal_code_encoded": 0, "product_id_encoded": 0, "product_name_encoded": 0, "region_encoded": 0, "category_encoded": 0, "sub_category_encoded": 0, "Quantity": 2, "Sales": 100.0},
    {"postal_code_encoded": 0, "product_id_encoded": 1, "product_name_encoded": 1, "region_encoded": 0, "category_encoded": 1, "sub_category_encoded": 1, "Quantity": 3, "Sales": 50.0},
    {"postal_code_encoded": 1, "product_id_encoded": 2, "product_name_encoded": 2, "region_encoded": 1, "category_encoded": 1, "sub_category_encoded": 2, "Quantity": 1, "Sales": 80.0},
    {"postal_code_encoded": 1, "product_id_encoded": 3, "product_name_encoded": 3, "region_encoded": 1, "category_encoded": 1, "sub_category_encoded": 2, "Quantity": 5, "Sales": 20.0},
    {"postal_code_encoded": 0, "product_id_encoded": 2, "product_name_encoded": 2, "region_encoded": 0, "category_encoded": 1, "sub_category_encoded": 2, "Quantity": 4, "Sales": 40.0}
]"#;

/// Postal code 0 appears in two regions.
pub const INCONSISTENT_DATASET: &str = r#"[
    {"postal_code_encoded": 0, "product_id_encoded": 0, "product_name_encoded": 0, "region_encoded": 0, "category_encoded": 0, "Quantity": 2, "Sales": 100.0},
    {"postal_code_encoded": 0, "product_id_encoded": 1, "product_name_encoded": 1, "region_encoded": 1, "category_encoded": 1, "Quantity": 3, "Sales": 50.0}
]"#;

/// Product IDs in expected rank order for any postal code with rows.
pub const EXPECTED_ORDER: [&str; 4] = ["P-400", "P-300", "P-200", "P-100"];

pub fn write_artifacts(dir: &Path, dataset: &str) {
    fs::write(dir.join(DEFAULT_MODEL_FILE), MODEL).expect("write model");
    fs::write(dir.join(DEFAULT_ENCODERS_FILE), ENCODERS).expect("write encoders");
    fs::write(dir.join(DEFAULT_FEATURE_COLUMNS_FILE), FEATURE_COLUMNS)
        .expect("write feature columns");
    fs::write(dir.join(DEFAULT_DATASET_FILE), dataset).expect("write dataset");
}

pub fn artifact_dir() -> TempDir {
    artifact_dir_with(DATASET)
}

pub fn artifact_dir_with(dataset: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    write_artifacts(dir.path(), dataset);
    dir
}

pub fn config_for(dir: &TempDir) -> Config {
    Config {
        artifact_dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
