//! Cleaning and transform pipeline
//!
//! Missing-value handling, outlier removal, and numeric scaling. Every
//! operation takes a table and produces a new one; callers store the result
//! as a derived dataset so the source is never mutated. Method and
//! operation names outside the fixed enumerations are rejected before any
//! computation runs.

mod knn;
pub mod missing;
pub mod outliers;
pub mod scaling;

pub use missing::{clean_missing, CleanOperation, CleanOutcome};
pub use outliers::{remove_outliers, OutlierMethod, OutlierOutcome, OUTLIER_LINEAGE_TAG};
pub use scaling::{scale_columns, ScalingMethod, ScalingOutcome};
