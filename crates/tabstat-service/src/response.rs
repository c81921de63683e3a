//! Response envelopes
//!
//! Every operation returns either its full structured result or a single
//! error; there is no partial-success shape. Previews are JSON objects per
//! row so charts and tables can consume them directly.

use serde::Serialize;
use serde_json::{Map, Value};
use tabstat_clean::ScalingMethod;
use tabstat_core::{Cell, ColumnKind, Table};
use tabstat_describe::{ColumnSummary, DescriptiveProfile};
use tabstat_infer::{
    AnovaResult, CorrelationResult, NormalityResult, RegressionResult, TTestResult,
};
use tabstat_metrics::{ForecastReport, KpiReport};
use tabstat_store::DatasetId;

/// One preview row as a JSON object
pub type PreviewRow = Map<String, Value>;

/// Rows shown in transform previews
pub const TRANSFORM_PREVIEW_ROWS: usize = 5;

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Number(v) => serde_json::Number::from_f64(*v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Text(s) => Value::String(s.clone()),
    }
}

/// First `limit` rows of a table as JSON objects keyed by column name
pub fn preview_rows(table: &Table, limit: usize) -> Vec<PreviewRow> {
    (0..table.n_rows().min(limit))
        .map(|i| {
            table
                .columns()
                .iter()
                .map(|col| (col.name().to_string(), cell_to_json(&col.cells()[i])))
                .collect()
        })
        .collect()
}

/// Row/column counts of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl From<&Table> for Shape {
    fn from(table: &Table) -> Self {
        Self {
            rows: table.n_rows(),
            columns: table.n_cols(),
        }
    }
}

/// Upload acknowledgment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSummary {
    pub dataset_id: DatasetId,
    pub filename: String,
    pub rows: usize,
    pub columns: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub preview: Vec<PreviewRow>,
}

/// Per-column schema entry of a dataset preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// Dataset preview: shape, schema, rows, numeric summaries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetPreview {
    pub dataset_id: DatasetId,
    pub shape: Shape,
    pub schema: Vec<ColumnInfo>,
    pub preview: Vec<PreviewRow>,
    pub summary: Vec<ColumnSummary>,
}

/// Result of a missing-value cleaning operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanSummary {
    pub message: String,
    pub new_dataset_id: DatasetId,
    /// Human-debuggable lineage label of the derived dataset
    pub lineage: String,
    pub original_shape: Shape,
    pub new_shape: Shape,
    /// Rows containing at least one missing value, before and after
    pub missing_values_before: usize,
    pub missing_values_after: usize,
    pub preview: Vec<PreviewRow>,
}

/// Result of an outlier-removal operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierSummary {
    pub message: String,
    pub new_dataset_id: DatasetId,
    pub lineage: String,
    pub original_shape: Shape,
    pub new_shape: Shape,
    pub outliers_removed: usize,
    pub preview: Vec<PreviewRow>,
}

/// Result of a scaling operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingSummary {
    pub message: String,
    pub new_dataset_id: DatasetId,
    pub lineage: String,
    pub method: ScalingMethod,
    pub scaled_columns: Vec<String>,
    pub preview: Vec<PreviewRow>,
}

/// Fixed health payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    /// Seconds since the unix epoch
    pub timestamp: u64,
}

/// Output envelope of the dispatcher, one variant per operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutput {
    Statistics(DescriptiveProfile),
    Correlation(CorrelationResult),
    HypothesisTest(TTestResult),
    Regression(Box<RegressionResult>),
    Anova(AnovaResult),
    Normality(Box<NormalityResult>),
    Clean(CleanSummary),
    Outliers(OutlierSummary),
    Scaling(ScalingSummary),
    Kpi(KpiReport),
    Forecast(ForecastReport),
    Preview(DatasetPreview),
    Health(HealthStatus),
}
