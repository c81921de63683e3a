//! The analysis service: store wiring and operation dispatch

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tabstat_clean as clean;
use tabstat_core::Result;
use tabstat_describe::{column_summary, profile, DescriptiveProfile};
use tabstat_infer as infer;
use tabstat_infer::{CorrelationResult, NormalityResult, RegressionResult, TTestResult};
use tabstat_ingest::DecoderRegistry;
use tabstat_metrics::{ForecastReport, KpiReport};
use tabstat_store::{DatasetId, DatasetStore};
use tracing::{debug, info};

use crate::request::{
    Analysis, AnovaRequest, CleanMissingRequest, DataPreviewRequest, ForecastRequest,
    HypothesisTestRequest, KpiRequest, NormalityTestRequest, RegressionRequest,
    RemoveOutliersRequest, ScaleDataRequest,
};
use crate::response::{
    preview_rows, AnalysisOutput, CleanSummary, ColumnInfo, DatasetPreview, HealthStatus,
    OutlierSummary, ScalingSummary, Shape, UploadSummary, TRANSFORM_PREVIEW_ROWS,
};

/// Rows included in the upload acknowledgment preview
const UPLOAD_PREVIEW_ROWS: usize = 10;

/// Request-facing facade over the dataset store and the analysis catalog
///
/// The service is cheap to share: the store is behind an [`Arc`] and every
/// operation takes `&self`.
pub struct AnalysisService {
    store: Arc<DatasetStore>,
    decoders: DecoderRegistry,
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisService {
    /// Service with a fresh store and the default decoders
    pub fn new() -> Self {
        Self::with_store(Arc::new(DatasetStore::new()))
    }

    /// Service sharing an existing store
    pub fn with_store(store: Arc<DatasetStore>) -> Self {
        Self {
            store,
            decoders: DecoderRegistry::with_defaults(),
        }
    }

    /// The shared dataset store
    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    /// Ingest an upload: decode, store, acknowledge
    pub fn upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadSummary> {
        let table = self.decoders.decode(filename, bytes)?;
        let rows = table.n_rows();
        let columns = table.n_cols();
        let numeric_columns = table.numeric_column_names();
        let categorical_columns = table.categorical_column_names();
        let preview = preview_rows(&table, UPLOAD_PREVIEW_ROWS);
        let dataset_id = self.store.put(table);
        info!(filename, %dataset_id, rows, columns, "stored uploaded dataset");
        Ok(UploadSummary {
            dataset_id,
            filename: filename.to_string(),
            rows,
            columns,
            numeric_columns,
            categorical_columns,
            preview,
        })
    }

    /// Descriptive profile of a stored dataset
    pub fn statistics(&self, dataset: &DatasetId) -> Result<DescriptiveProfile> {
        let record = self.store.get(dataset)?;
        profile(&record.table)
    }

    /// Pairwise correlation of a stored dataset
    pub fn correlation(&self, dataset: &DatasetId) -> Result<CorrelationResult> {
        let record = self.store.get(dataset)?;
        infer::pairwise_correlation(&record.table)
    }

    /// One-sample t-test
    pub fn hypothesis_test(&self, request: &HypothesisTestRequest) -> Result<TTestResult> {
        let record = self.store.get(&request.dataset)?;
        infer::one_sample_ttest(&record.table, &request.column, &request.params)
    }

    /// Simple linear regression
    pub fn regression(&self, request: &RegressionRequest) -> Result<RegressionResult> {
        let record = self.store.get(&request.dataset)?;
        infer::simple_ols(&record.table, &request.y_column, &request.x_column)
    }

    /// One-way ANOVA
    pub fn anova(&self, request: &AnovaRequest) -> Result<infer::AnovaResult> {
        let record = self.store.get(&request.dataset)?;
        infer::one_way_anova(&record.table, &request.value_column, &request.group_column)
    }

    /// Normality battery
    pub fn normality_test(&self, request: &NormalityTestRequest) -> Result<NormalityResult> {
        let record = self.store.get(&request.dataset)?;
        infer::normality_battery(&record.table, &request.column, &request.params)
    }

    /// Apply a missing-value strategy, storing the result as a derived
    /// dataset
    pub fn clean_missing(&self, request: &CleanMissingRequest) -> Result<CleanSummary> {
        let record = self.store.get(&request.dataset)?;
        let outcome = clean::clean_missing(
            &record.table,
            request.operation,
            request.columns.as_deref(),
        )?;

        let missing_values_before = record.table.rows_with_missing();
        let missing_values_after = outcome.table.rows_with_missing();
        let original_shape = Shape::from(&record.table);
        let new_shape = Shape::from(&outcome.table);
        let preview = preview_rows(&outcome.table, TRANSFORM_PREVIEW_ROWS);

        let new_dataset_id = self.store.derive(
            &request.dataset,
            &request.operation.lineage_tag(),
            outcome.table,
        )?;
        let lineage = self.lineage_label(&new_dataset_id)?;

        Ok(CleanSummary {
            message: outcome.message,
            new_dataset_id,
            lineage,
            original_shape,
            new_shape,
            missing_values_before,
            missing_values_after,
            preview,
        })
    }

    /// Remove outlier rows, storing the result as a derived dataset
    pub fn remove_outliers(&self, request: &RemoveOutliersRequest) -> Result<OutlierSummary> {
        let record = self.store.get(&request.dataset)?;
        let outcome = clean::remove_outliers(
            &record.table,
            request.method,
            &request.columns,
            request.threshold,
        )?;

        let original_shape = Shape::from(&record.table);
        let new_shape = Shape::from(&outcome.table);
        let preview = preview_rows(&outcome.table, TRANSFORM_PREVIEW_ROWS);
        let message = format!(
            "Removed {} outliers using {} method",
            outcome.outliers_removed,
            request.method.name()
        );

        let new_dataset_id =
            self.store
                .derive(&request.dataset, clean::OUTLIER_LINEAGE_TAG, outcome.table)?;
        let lineage = self.lineage_label(&new_dataset_id)?;

        Ok(OutlierSummary {
            message,
            new_dataset_id,
            lineage,
            original_shape,
            new_shape,
            outliers_removed: outcome.outliers_removed,
            preview,
        })
    }

    /// Rescale columns, storing the result as a derived dataset
    pub fn scale_data(&self, request: &ScaleDataRequest) -> Result<ScalingSummary> {
        let record = self.store.get(&request.dataset)?;
        let outcome = clean::scale_columns(&record.table, request.method, &request.columns)?;

        let preview = preview_rows(&outcome.table, TRANSFORM_PREVIEW_ROWS);
        let new_dataset_id = self.store.derive(
            &request.dataset,
            &request.method.lineage_tag(),
            outcome.table,
        )?;
        let lineage = self.lineage_label(&new_dataset_id)?;

        Ok(ScalingSummary {
            message: format!("Applied {}", request.method.description()),
            new_dataset_id,
            lineage,
            method: request.method,
            scaled_columns: outcome.scaled_columns,
            preview,
        })
    }

    /// Revenue/cost KPIs
    pub fn kpi(&self, request: &KpiRequest) -> Result<KpiReport> {
        let record = self.store.get(&request.dataset)?;
        tabstat_metrics::compute_kpis(
            &record.table,
            &request.revenue_column,
            request.cost_column.as_deref(),
        )
    }

    /// Exponential-smoothing trend projection
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastReport> {
        let record = self.store.get(&request.dataset)?;
        tabstat_metrics::forecast(&record.table, &request.column, request.periods)
    }

    /// Dataset preview: shape, schema, rows, numeric summaries
    pub fn data_preview(&self, request: &DataPreviewRequest) -> Result<DatasetPreview> {
        let record = self.store.get(&request.dataset)?;
        let table = &record.table;
        let schema = table
            .columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                kind: col.kind(),
                missing: col.null_count(),
            })
            .collect();
        let summary = table
            .numeric_columns()
            .into_iter()
            .map(column_summary)
            .collect();
        Ok(DatasetPreview {
            dataset_id: request.dataset.clone(),
            shape: Shape::from(table),
            schema,
            preview: preview_rows(table, request.rows),
            summary,
        })
    }

    /// Fixed status payload
    pub fn health(&self) -> HealthStatus {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        HealthStatus {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            timestamp,
        }
    }

    /// Resolve a request to its component and shape the result
    pub fn dispatch(&self, request: &Analysis) -> Result<AnalysisOutput> {
        debug!(operation = request.name(), "dispatching analysis");
        match request {
            Analysis::Statistics { dataset } => {
                self.statistics(dataset).map(AnalysisOutput::Statistics)
            }
            Analysis::Correlation { dataset } => {
                self.correlation(dataset).map(AnalysisOutput::Correlation)
            }
            Analysis::HypothesisTest(req) => self
                .hypothesis_test(req)
                .map(AnalysisOutput::HypothesisTest),
            Analysis::Regression(req) => self
                .regression(req)
                .map(|r| AnalysisOutput::Regression(Box::new(r))),
            Analysis::Anova(req) => self.anova(req).map(AnalysisOutput::Anova),
            Analysis::NormalityTest(req) => self
                .normality_test(req)
                .map(|r| AnalysisOutput::Normality(Box::new(r))),
            Analysis::CleanMissing(req) => self.clean_missing(req).map(AnalysisOutput::Clean),
            Analysis::RemoveOutliers(req) => {
                self.remove_outliers(req).map(AnalysisOutput::Outliers)
            }
            Analysis::ScaleData(req) => self.scale_data(req).map(AnalysisOutput::Scaling),
            Analysis::Kpi(req) => self.kpi(req).map(AnalysisOutput::Kpi),
            Analysis::Forecast(req) => self.forecast(req).map(AnalysisOutput::Forecast),
            Analysis::DataPreview(req) => self.data_preview(req).map(AnalysisOutput::Preview),
            Analysis::Health => Ok(AnalysisOutput::Health(self.health())),
        }
    }

    fn lineage_label(&self, id: &DatasetId) -> Result<String> {
        Ok(self
            .store
            .get(id)?
            .lineage
            .as_ref()
            .map(|l| l.label())
            .unwrap_or_default())
    }
}
