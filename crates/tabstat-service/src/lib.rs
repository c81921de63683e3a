//! Operation dispatcher and request/response surface
//!
//! A request names a dataset identifier, target column(s), and an
//! operation; the dispatcher resolves the identifier in the store,
//! delegates to the matching component, and returns a structured result.
//! Cleaning and transform operations additionally write a new store entry
//! and return its identifier so later requests can chain off it.
//!
//! The HTTP transport itself is out of scope; this crate exposes the typed
//! surface a transport mounts: [`Analysis`] deserializes straight from a
//! request body, [`AnalysisService::dispatch`] runs it, and the
//! [`AnalysisOutput`] envelope serializes straight back.
//!
//! # Example
//!
//! ```rust
//! use tabstat_service::{Analysis, AnalysisService};
//!
//! let service = AnalysisService::new();
//! let summary = service.upload("points.csv", b"x,y\n1,2\n2,4\n3,6\n").unwrap();
//!
//! let request: Analysis = serde_json::from_value(serde_json::json!({
//!     "analysis": "regression",
//!     "dataset": summary.dataset_id,
//!     "y_column": "y",
//!     "x_column": "x",
//! })).unwrap();
//! let output = service.dispatch(&request).unwrap();
//! let body = serde_json::to_value(&output).unwrap();
//! assert!(body["model_stats"]["r_squared"].as_f64().unwrap() > 0.99);
//! ```

pub mod config;
pub mod request;
pub mod response;
mod service;

pub use config::{ServiceConfig, API_PREFIX};
pub use request::{
    Analysis, AnovaRequest, CleanMissingRequest, DataPreviewRequest, ForecastRequest,
    HypothesisTestRequest, KpiRequest, NormalityTestRequest, RegressionRequest,
    RemoveOutliersRequest, ScaleDataRequest,
};
pub use response::{
    preview_rows, AnalysisOutput, CleanSummary, ColumnInfo, DatasetPreview, HealthStatus,
    OutlierSummary, PreviewRow, ScalingSummary, Shape, UploadSummary,
};
pub use service::AnalysisService;
