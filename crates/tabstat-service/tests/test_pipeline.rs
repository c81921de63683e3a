//! Cleaning/transform pipeline behavior through the service surface

mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use common::{single_column_csv, upload_csv};
use tabstat_clean::{CleanOperation, OutlierMethod, ScalingMethod};
use tabstat_core::{stats, Error};
use tabstat_service::{
    AnalysisService, CleanMissingRequest, RemoveOutliersRequest, ScaleDataRequest,
};
use tabstat_store::DatasetId;

fn clean_request(dataset: &DatasetId, operation: CleanOperation) -> CleanMissingRequest {
    CleanMissingRequest {
        dataset: dataset.clone(),
        operation,
        columns: None,
    }
}

#[test]
fn test_drop_missing_removes_exactly_the_gapped_rows() {
    let service = AnalysisService::new();
    let dataset = upload_csv(&service, "a,b\n1,2\n,3\n4,\n");

    let summary = service
        .clean_missing(&clean_request(&dataset, CleanOperation::DropMissing))
        .unwrap();

    assert_eq!(summary.original_shape.rows, 3);
    assert_eq!(summary.new_shape.rows, 1);
    assert_eq!(summary.missing_values_before, 2);
    assert_eq!(summary.missing_values_after, 0);
    assert_eq!(summary.preview.len(), 1);
    assert_eq!(summary.preview[0]["a"], serde_json::Value::from(1.0));
    assert_eq!(summary.preview[0]["b"], serde_json::Value::from(2.0));
}

#[test]
fn test_cleaning_never_mutates_the_source_dataset() {
    let service = AnalysisService::new();
    let dataset = upload_csv(&service, "a,b\n1,2\n,3\n4,100\n5,6\n");
    let before = service.store().get(&dataset).unwrap().table.clone();

    service
        .clean_missing(&clean_request(&dataset, CleanOperation::FillMean))
        .unwrap();
    service
        .remove_outliers(&RemoveOutliersRequest {
            dataset: dataset.clone(),
            method: OutlierMethod::Iqr,
            columns: vec!["b".to_string()],
            threshold: None,
        })
        .unwrap();
    service
        .scale_data(&ScaleDataRequest {
            dataset: dataset.clone(),
            method: ScalingMethod::Minmax,
            columns: vec!["a".to_string()],
        })
        .unwrap();

    let after = service.store().get(&dataset).unwrap().table.clone();
    assert_eq!(before, after);
}

#[test]
fn test_iqr_removes_the_classic_outlier() {
    let service = AnalysisService::new();
    let dataset = upload_csv(
        &service,
        &single_column_csv("x", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0].map(Some)),
    );

    let summary = service
        .remove_outliers(&RemoveOutliersRequest {
            dataset: dataset.clone(),
            method: OutlierMethod::Iqr,
            columns: vec!["x".to_string()],
            threshold: None,
        })
        .unwrap();

    assert_eq!(summary.outliers_removed, 1);
    assert_eq!(summary.new_shape.rows, 5);
    let cleaned = service.store().get(&summary.new_dataset_id).unwrap();
    assert_eq!(
        cleaned.table.column("x").unwrap().numeric_values(),
        vec![1.0, 2.0, 3.0, 4.0, 5.0]
    );
}

#[test]
fn test_scaling_moments_on_derived_dataset() {
    let service = AnalysisService::new();
    let values: Vec<Option<f64>> = (1..=20).map(|i| Some(i as f64 * 7.0 + 3.0)).collect();
    let dataset = upload_csv(&service, &single_column_csv("x", &values));

    let standard = service
        .scale_data(&ScaleDataRequest {
            dataset: dataset.clone(),
            method: ScalingMethod::Standard,
            columns: vec!["x".to_string()],
        })
        .unwrap();
    let scaled = service.store().get(&standard.new_dataset_id).unwrap();
    let scaled_values = scaled.table.column("x").unwrap().numeric_values();
    assert_abs_diff_eq!(stats::mean(&scaled_values), 0.0, epsilon = 1e-12);
    assert_relative_eq!(stats::population_std(&scaled_values), 1.0, epsilon = 1e-12);

    let minmax = service
        .scale_data(&ScaleDataRequest {
            dataset: dataset.clone(),
            method: ScalingMethod::Minmax,
            columns: vec!["x".to_string()],
        })
        .unwrap();
    let scaled = service.store().get(&minmax.new_dataset_id).unwrap();
    let scaled_values = scaled.table.column("x").unwrap().numeric_values();
    assert_relative_eq!(stats::min(&scaled_values), 0.0);
    assert_relative_eq!(stats::max(&scaled_values), 1.0);
    assert!(scaled_values.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_operations_chain_through_derived_identifiers() {
    let service = AnalysisService::new();
    let dataset = upload_csv(&service, "a,b\n1,2\n,3\n4,5\n5,6\n200,7\n");

    // clean -> remove outliers -> scale, each chaining off the previous id
    let cleaned = service
        .clean_missing(&clean_request(&dataset, CleanOperation::FillMedian))
        .unwrap();
    let trimmed = service
        .remove_outliers(&RemoveOutliersRequest {
            dataset: cleaned.new_dataset_id.clone(),
            method: OutlierMethod::Iqr,
            columns: vec!["a".to_string()],
            threshold: None,
        })
        .unwrap();
    let scaled = service
        .scale_data(&ScaleDataRequest {
            dataset: trimmed.new_dataset_id.clone(),
            method: ScalingMethod::Standard,
            columns: vec!["a".to_string(), "b".to_string()],
        })
        .unwrap();

    let record = service.store().get(&scaled.new_dataset_id).unwrap();
    let lineage = record.lineage.as_ref().unwrap();
    assert_eq!(lineage.parent, trimmed.new_dataset_id);
    assert_eq!(lineage.operation, "scaled_standard");
    assert_eq!(lineage.sequence, 1);
    // Median fill leaves a = [1, 4.5, 4, 5, 200]; the IQR fences
    // [2.5, 6.5] drop both extremes
    assert_eq!(trimmed.outliers_removed, 2);
    assert_eq!(record.table.n_rows(), 3);
}

#[test]
fn test_repeated_operation_sequences_in_lineage() {
    let service = AnalysisService::new();
    let dataset = upload_csv(&service, "x\n1\n2\n3\n");

    let first = service
        .clean_missing(&clean_request(&dataset, CleanOperation::FillMean))
        .unwrap();
    let second = service
        .clean_missing(&clean_request(&dataset, CleanOperation::FillMean))
        .unwrap();

    assert_ne!(first.new_dataset_id, second.new_dataset_id);
    assert!(first.lineage.ends_with("cleaned_fill_mean#1"));
    assert!(second.lineage.ends_with("cleaned_fill_mean#2"));
}

#[test]
fn test_transforms_on_unknown_dataset_fail() {
    let service = AnalysisService::new();
    let ghost = DatasetId::from("ghost");

    let err = service
        .clean_missing(&clean_request(&ghost, CleanOperation::DropMissing))
        .unwrap_err();
    assert!(matches!(err, Error::DatasetNotFound(_)));

    let err = service
        .scale_data(&ScaleDataRequest {
            dataset: ghost,
            method: ScalingMethod::Standard,
            columns: vec!["x".to_string()],
        })
        .unwrap_err();
    assert!(matches!(err, Error::DatasetNotFound(_)));
}

#[test]
fn test_knn_impute_fills_numeric_gaps() {
    let service = AnalysisService::new();
    let dataset = upload_csv(&service, "a,b\n1,1\n2,2\n,1.5\n10,10\n");

    let summary = service
        .clean_missing(&clean_request(&dataset, CleanOperation::KnnImpute))
        .unwrap();
    assert_eq!(summary.missing_values_after, 0);

    let record = service.store().get(&summary.new_dataset_id).unwrap();
    assert_eq!(record.table.column("a").unwrap().null_count(), 0);
}
