//! End-to-end flow over the re-exported crate surface

use tabular_stats::service::{Analysis, AnalysisService};
use tabular_stats::{DatasetId, Error};

#[test]
fn test_upload_analyze_clean_chain() {
    let service = AnalysisService::new();

    let summary = service
        .upload(
            "measurements.csv",
            b"height,weight,site\n1.62,55,north\n1.78,80,north\n1.70,68,south\n1.85,92,south\n1.66,,north\n",
        )
        .unwrap();
    assert_eq!(summary.numeric_columns, vec!["height", "weight"]);
    assert_eq!(summary.categorical_columns, vec!["site"]);

    // Descriptive statistics straight off the upload
    let profile = service.statistics(&summary.dataset_id).unwrap();
    assert_eq!(profile.summary.len(), 2);
    assert_eq!(profile.histogram.column, "height");

    // Drop the gapped row, then regress on the derived dataset
    let request: Analysis = serde_json::from_value(serde_json::json!({
        "analysis": "clean_missing",
        "dataset": &summary.dataset_id,
        "operation": "drop_missing",
    }))
    .unwrap();
    let output = service.dispatch(&request).unwrap();
    let body = serde_json::to_value(&output).unwrap();
    let derived = DatasetId::from(body["new_dataset_id"].as_str().unwrap());
    assert_eq!(body["new_shape"]["rows"], 4);

    let request: Analysis = serde_json::from_value(serde_json::json!({
        "analysis": "regression",
        "dataset": derived,
        "y_column": "weight",
        "x_column": "height",
    }))
    .unwrap();
    let output = service.dispatch(&request).unwrap();
    let body = serde_json::to_value(&output).unwrap();
    assert!(body["model_stats"]["r_squared"].as_f64().unwrap() > 0.9);
    assert_eq!(body["scatter"].as_array().unwrap().len(), 4);

    // The original dataset is untouched by the whole chain
    let original = service.store().get(&summary.dataset_id).unwrap();
    assert_eq!(original.table.n_rows(), 5);
}

#[test]
fn test_error_kinds_surface_through_dispatch() {
    let service = AnalysisService::new();

    let request: Analysis = serde_json::from_value(serde_json::json!({
        "analysis": "statistics",
        "dataset": "does-not-exist",
    }))
    .unwrap();
    let err = service.dispatch(&request).unwrap_err();
    assert!(matches!(err, Error::DatasetNotFound(_)));
    assert_eq!(err.kind(), "dataset_not_found");

    let summary = service.upload("t.csv", b"x\n1\n2\n3\n").unwrap();
    let request: Analysis = serde_json::from_value(serde_json::json!({
        "analysis": "hypothesis_test",
        "dataset": summary.dataset_id,
        "column": "ghost",
        "mu0": 0.0,
    }))
    .unwrap();
    let err = service.dispatch(&request).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(_)));
}
