//! Typed request envelopes and the operation enum
//!
//! Every catalog operation is one variant of [`Analysis`], so dispatch is
//! exhaustive at compile time and an operation name outside the catalog
//! dies at deserialization instead of reaching computation.

use serde::{Deserialize, Serialize};
use tabstat_clean::{CleanOperation, OutlierMethod, ScalingMethod};
use tabstat_infer::{NormalityParams, TTestParams};
use tabstat_store::DatasetId;

fn default_preview_rows() -> usize {
    10
}

/// One-sample t-test request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisTestRequest {
    pub dataset: DatasetId,
    pub column: String,
    #[serde(flatten)]
    pub params: TTestParams,
}

/// Simple linear regression request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionRequest {
    pub dataset: DatasetId,
    pub y_column: String,
    pub x_column: String,
}

/// One-way ANOVA request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaRequest {
    pub dataset: DatasetId,
    pub value_column: String,
    pub group_column: String,
}

/// Normality battery request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalityTestRequest {
    pub dataset: DatasetId,
    pub column: String,
    #[serde(flatten)]
    pub params: NormalityParams,
}

/// Missing-value cleaning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanMissingRequest {
    pub dataset: DatasetId,
    pub operation: CleanOperation,
    /// Targeted columns; all numeric columns when absent
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

/// Outlier removal request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveOutliersRequest {
    pub dataset: DatasetId,
    pub method: OutlierMethod,
    pub columns: Vec<String>,
    /// Z-score cutoff; the method default when absent
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Scaling request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDataRequest {
    pub dataset: DatasetId,
    pub method: ScalingMethod,
    pub columns: Vec<String>,
}

/// KPI computation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRequest {
    pub dataset: DatasetId,
    pub revenue_column: String,
    #[serde(default)]
    pub cost_column: Option<String>,
}

/// Forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub dataset: DatasetId,
    pub column: String,
    pub periods: usize,
}

/// Dataset preview request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPreviewRequest {
    pub dataset: DatasetId,
    #[serde(default = "default_preview_rows")]
    pub rows: usize,
}

/// The fixed catalog of dispatchable operations
///
/// Tagged by `analysis` so the cleaning request keeps its own `operation`
/// field for the strategy name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum Analysis {
    /// Descriptive statistics of a stored dataset
    Statistics { dataset: DatasetId },
    /// Pairwise correlation of a stored dataset
    Correlation { dataset: DatasetId },
    HypothesisTest(HypothesisTestRequest),
    Regression(RegressionRequest),
    Anova(AnovaRequest),
    NormalityTest(NormalityTestRequest),
    CleanMissing(CleanMissingRequest),
    RemoveOutliers(RemoveOutliersRequest),
    ScaleData(ScaleDataRequest),
    Kpi(KpiRequest),
    Forecast(ForecastRequest),
    DataPreview(DataPreviewRequest),
    /// Fixed status payload
    Health,
}

impl Analysis {
    /// Operation name, as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Statistics { .. } => "statistics",
            Self::Correlation { .. } => "correlation",
            Self::HypothesisTest(_) => "hypothesis_test",
            Self::Regression(_) => "regression",
            Self::Anova(_) => "anova",
            Self::NormalityTest(_) => "normality_test",
            Self::CleanMissing(_) => "clean_missing",
            Self::RemoveOutliers(_) => "remove_outliers",
            Self::ScaleData(_) => "scale_data",
            Self::Kpi(_) => "kpi",
            Self::Forecast(_) => "forecast",
            Self::DataPreview(_) => "data_preview",
            Self::Health => "health",
        }
    }
}
