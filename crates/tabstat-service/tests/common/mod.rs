//! Common test utilities for service tests

use tabstat_service::AnalysisService;
use tabstat_store::DatasetId;

/// Upload a CSV body and return the new dataset identifier
pub fn upload_csv(service: &AnalysisService, csv: &str) -> DatasetId {
    service
        .upload("data.csv", csv.as_bytes())
        .expect("upload should succeed")
        .dataset_id
}

/// Render a single-column CSV, empty fields for missing values
pub fn single_column_csv(name: &str, values: &[Option<f64>]) -> String {
    let mut body = format!("{name}\n");
    for value in values {
        match value {
            Some(v) => body.push_str(&format!("{v}\n")),
            None => body.push('\n'),
        }
    }
    body
}

/// Render a two-column CSV of (value, group) rows
pub fn grouped_csv(rows: &[(f64, &str)]) -> String {
    let mut body = String::from("value,group\n");
    for (value, group) in rows {
        body.push_str(&format!("{value},{group}\n"));
    }
    body
}
