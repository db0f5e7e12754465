use super::*;
use serde_json::json;

fn sample_records() -> Vec<u8> {
    serde_json::to_vec(&json!([
        {"postal_code_encoded": 0, "product_id_encoded": 2, "region_encoded": 1, "category_encoded": 0, "Sales": 10.0},
        {"postal_code_encoded": 1, "product_id_encoded": 0, "region_encoded": 3, "category_encoded": 1, "Sales": 20.0},
        {"postal_code_encoded": 0, "product_id_encoded": 0, "region_encoded": 1, "category_encoded": 1, "Sales": null},
        {"postal_code_encoded": 1, "product_id_encoded": 1, "region_encoded": 3, "category_encoded": 2, "Sales": "33.5"},
        {"postal_code_encoded": 0, "product_id_encoded": 2, "category_encoded": 0, "Sales": 30.0}
    ]))
    .unwrap()
}

#[test]
fn test_from_records_shapes_columns() {
    let dataset = ReferenceDataset::from_json_slice(&sample_records()).expect("should parse");

    assert_eq!(dataset.num_rows(), 5);
    assert!(dataset.has_column("Sales"));
    assert!(!dataset.has_column("city_encoded"));
    assert_eq!(dataset.column("Sales").unwrap().len(), 5);
    assert_eq!(dataset.value("Sales", 3), Some(33.5));
    assert!(dataset.value("Sales", 2).unwrap().is_nan());
    assert!(dataset.value("region_encoded", 4).unwrap().is_nan());
    assert_eq!(dataset.value("unknown", 0), None);
}

#[test]
fn test_records_column_added_late_is_backfilled() {
    let bytes = serde_json::to_vec(&json!([
        {"a": 1},
        {"a": 2, "b": 5}
    ]))
    .unwrap();
    let dataset = ReferenceDataset::from_json_slice(&bytes).unwrap();

    let b = dataset.column("b").unwrap();
    assert!(b[0].is_nan());
    assert_eq!(b[1], 5.0);
}

#[test]
fn test_from_column_lists() {
    let bytes = serde_json::to_vec(&json!({
        "product_id_encoded": [1, 0, 1],
        "Sales": [1.0, 2.0, 3.0]
    }))
    .unwrap();
    let dataset = ReferenceDataset::from_json_slice(&bytes).unwrap();

    assert_eq!(dataset.num_rows(), 3);
    assert_eq!(dataset.key_index(PRODUCT_ID_COLUMN).unwrap().keys(), &[1, 0]);
}

#[test]
fn test_ragged_columns_rejected() {
    let err = ReferenceDataset::from_columns(vec![
        ("a".to_string(), vec![1.0, 2.0]),
        ("b".to_string(), vec![1.0]),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        DatasetError::RaggedColumn {
            expected: 2,
            actual: 1,
            ..
        }
    ));
}

#[test]
fn test_invalid_shapes_rejected() {
    assert!(matches!(
        ReferenceDataset::from_json_slice(b"42").unwrap_err(),
        DatasetError::InvalidShape(_)
    ));
    assert!(matches!(
        ReferenceDataset::from_json_slice(b"[1, 2]").unwrap_err(),
        DatasetError::InvalidShape(_)
    ));
    assert!(matches!(
        ReferenceDataset::from_json_slice(br#"{"a": 1}"#).unwrap_err(),
        DatasetError::InvalidShape(_)
    ));
}

#[test]
fn test_key_index_first_appearance_order() {
    let dataset = ReferenceDataset::from_json_slice(&sample_records()).unwrap();
    let products = dataset.key_index(PRODUCT_ID_COLUMN).unwrap();

    assert_eq!(products.keys(), &[2, 0, 1]);
    assert_eq!(products.rows(2), &[0, 4]);
    assert_eq!(products.first_row(0), Some(1));
    assert!(products.rows(9).is_empty());

    let postal = dataset.key_index(POSTAL_CODE_COLUMN).unwrap();
    assert_eq!(postal.first_row(1), Some(1));
}

#[test]
fn test_key_index_skips_non_integral_keys() {
    let index = KeyIndex::build(&[1.0, f64::NAN, 2.5, 1.0]);
    assert_eq!(index.keys(), &[1]);
    assert_eq!(index.rows(1), &[0, 3]);
}

#[test]
fn test_require_key_index_missing_column() {
    let dataset =
        ReferenceDataset::from_columns(vec![("Sales".to_string(), vec![1.0])]).unwrap();
    let err = dataset.require_key_index(PRODUCT_ID_COLUMN).unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == PRODUCT_ID_COLUMN));
}

#[test]
fn test_mean_skips_nan() {
    let dataset = ReferenceDataset::from_json_slice(&sample_records()).unwrap();

    // (10 + 20 + 33.5 + 30) / 4
    assert_eq!(dataset.mean("Sales"), Some(23.375));
    assert_eq!(dataset.mean("missing"), None);
}

#[test]
fn test_mean_over_rows() {
    let dataset = ReferenceDataset::from_json_slice(&sample_records()).unwrap();

    assert_eq!(dataset.mean_over_rows("Sales", &[0, 4]), 20.0);
    // product 0: rows 1 and 2, row 2 has null sales
    assert_eq!(dataset.mean_over_rows("Sales", &[1, 2]), 20.0);
    assert!(dataset.mean_over_rows("Sales", &[2]).is_nan());
    assert!(dataset.mean_over_rows("Sales", &[]).is_nan());
    assert!(dataset.mean_over_rows("missing", &[0]).is_nan());
}

#[test]
fn test_nan_mean() {
    assert_eq!(nan_mean([1.0, 2.0, f64::NAN, 3.0].into_iter()), 2.0);
    assert!(nan_mean([f64::NAN].into_iter()).is_nan());
    assert!(nan_mean(std::iter::empty()).is_nan());
}

#[test]
fn test_dependency_violation_detected() {
    let dataset = ReferenceDataset::from_json_slice(&sample_records()).unwrap();

    // product 0 appears with categories 1 and 1, product 2 with 0 and 0
    assert_eq!(
        dataset
            .dependency_violation(PRODUCT_ID_COLUMN, "category_encoded")
            .unwrap(),
        None
    );

    // postal code 0 has region 1, 1 and NaN
    let violation = dataset
        .dependency_violation(POSTAL_CODE_COLUMN, "region_encoded")
        .unwrap()
        .expect("region is not constant for postal code 0");
    assert_eq!(violation.conflicting_keys, 1);
    assert_eq!(violation.example_key, 0);
}

#[test]
fn test_dependency_violation_missing_attribute_is_none() {
    let dataset = ReferenceDataset::from_json_slice(&sample_records()).unwrap();
    assert_eq!(
        dataset
            .dependency_violation(POSTAL_CODE_COLUMN, "city_encoded")
            .unwrap(),
        None
    );
}

#[test]
fn test_dependency_violation_on_unindexed_key() {
    let dataset = ReferenceDataset::from_columns(vec![
        ("store".to_string(), vec![1.0, 1.0, 2.0]),
        ("tier".to_string(), vec![5.0, 6.0, 7.0]),
    ])
    .unwrap();

    let violation = dataset.dependency_violation("store", "tier").unwrap().unwrap();
    assert_eq!(violation.example_key, 1);

    assert!(matches!(
        dataset.dependency_violation("missing", "tier").unwrap_err(),
        DatasetError::MissingColumn(_)
    ));
}

#[test]
fn test_join_violations_lists_only_conflicts() {
    let dataset = ReferenceDataset::from_json_slice(&sample_records()).unwrap();
    let violations = dataset.join_violations();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].attribute, "region_encoded");
}
