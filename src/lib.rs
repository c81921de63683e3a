//! Tabular statistics toolkit
//!
//! Upload a tabular dataset, run a fixed catalog of statistical analyses
//! and transformations against it, and get back numeric results plus
//! chart-ready series. Cleaning operations derive new datasets with typed
//! lineage instead of mutating their source, so analyses chain:
//! clean, remove outliers, scale, test.
//!
//! The workspace splits along component lines:
//!
//! - [`tabstat_core`]: table model, error taxonomy, moment helpers
//! - [`store`]: identifier store with derived-dataset lineage
//! - [`ingest`]: upload format detection and decoding
//! - [`describe`]: descriptive profiler
//! - [`infer`]: hypothesis tests, regression, ANOVA, correlation, normality
//! - [`clean`]: missing values, outliers, scaling
//! - [`metrics`]: KPI aggregates and trend projection
//! - [`service`]: request/response envelopes and dispatch

pub use tabstat_clean as clean;
pub use tabstat_describe as describe;
pub use tabstat_infer as infer;
pub use tabstat_ingest as ingest;
pub use tabstat_metrics as metrics;
pub use tabstat_service as service;
pub use tabstat_store as store;

pub use tabstat_core::{Cell, Column, ColumnKind, Error, Result, Table};
pub use tabstat_service::{Analysis, AnalysisOutput, AnalysisService, ServiceConfig};
pub use tabstat_store::{DatasetId, DatasetStore, Lineage};
