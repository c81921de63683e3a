//! Outlier removal by IQR fences or z-score

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabstat_core::{stats, Error, Result, Table};

/// IQR fence multiplier
const IQR_MULTIPLIER: f64 = 1.5;
/// Default z-score cutoff
const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

/// Fixed enumeration of outlier-removal methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    Iqr,
    Zscore,
}

impl OutlierMethod {
    /// Request-body name of the method
    pub fn name(&self) -> &'static str {
        match self {
            Self::Iqr => "iqr",
            Self::Zscore => "zscore",
        }
    }
}

impl FromStr for OutlierMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "iqr" => Ok(Self::Iqr),
            "zscore" => Ok(Self::Zscore),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}

/// Lineage tag of datasets derived by outlier removal
pub const OUTLIER_LINEAGE_TAG: &str = "no_outliers";

/// Result of an outlier-removal pass
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierOutcome {
    pub table: Table,
    pub outliers_removed: usize,
}

/// Rows to keep for one column under the current bounds; missing cells
/// never satisfy the bounds and drop with the outliers
fn keep_mask(table: &Table, column: &str, within: impl Fn(f64) -> bool) -> Result<Vec<bool>> {
    Ok(table
        .column(column)?
        .cells()
        .iter()
        .map(|cell| cell.as_number().map(&within).unwrap_or(false))
        .collect())
}

/// Remove outlier rows column-by-column
///
/// Columns filter sequentially, so later columns see the already-reduced
/// table. Every targeted column must exist and be numeric. The z-score
/// method uses `threshold` (default 3); a zero-variance column is a
/// computation error.
pub fn remove_outliers(
    table: &Table,
    method: OutlierMethod,
    columns: &[String],
    threshold: Option<f64>,
) -> Result<OutlierOutcome> {
    for name in columns {
        let column = table.column(name)?;
        if !column.is_numeric() {
            return Err(Error::non_numeric_column(name));
        }
    }

    let mut current = table.clone();
    let mut outliers_removed = 0;

    for name in columns {
        let values = current.column(name)?.numeric_values();
        let keep = match method {
            OutlierMethod::Iqr => {
                let q1 = stats::quantile(&values, 0.25)?;
                let q3 = stats::quantile(&values, 0.75)?;
                let iqr = q3 - q1;
                let lower = q1 - IQR_MULTIPLIER * iqr;
                let upper = q3 + IQR_MULTIPLIER * iqr;
                keep_mask(&current, name, move |v| v >= lower && v <= upper)?
            }
            OutlierMethod::Zscore => {
                let cutoff = threshold.unwrap_or(DEFAULT_ZSCORE_THRESHOLD);
                let mean = stats::mean(&values);
                let std = stats::sample_std(&values);
                if !(std > 0.0) {
                    return Err(Error::zero_variance(&format!("column {name}")));
                }
                keep_mask(&current, name, move |v| ((v - mean) / std).abs() < cutoff)?
            }
        };
        let before = current.n_rows();
        current = current.filter_rows(&keep)?;
        outliers_removed += before - current.n_rows();
    }

    tracing::debug!(method = method.name(), outliers_removed, "removed outlier rows");
    Ok(OutlierOutcome {
        table: current,
        outliers_removed,
    })
}
