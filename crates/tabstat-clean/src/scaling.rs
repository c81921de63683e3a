//! Numeric column scaling

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabstat_core::{stats, Cell, Error, Result, Table};

/// Fixed enumeration of scaling methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    Standard,
    Minmax,
}

impl ScalingMethod {
    /// Request-body name of the method
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Minmax => "minmax",
        }
    }

    /// Human-readable description used in responses
    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "Standardization (mean=0, std=1)",
            Self::Minmax => "Min-Max Scaling (range 0-1)",
        }
    }

    /// Lineage tag of datasets derived by this method
    pub fn lineage_tag(&self) -> String {
        format!("scaled_{}", self.name())
    }
}

impl FromStr for ScalingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(Self::Standard),
            "minmax" => Ok(Self::Minmax),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}

/// Result of a scaling pass
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingOutcome {
    pub table: Table,
    pub scaled_columns: Vec<String>,
}

/// Rescale exactly the targeted numeric columns of a new table
///
/// `standard` centers on the mean and divides by the population standard
/// deviation (zero spread leaves centered zeros); `minmax` maps the
/// observed range onto `[0, 1]` (a degenerate range maps to 0). Missing
/// cells stay missing. Every targeted column must exist and be numeric.
pub fn scale_columns(
    table: &Table,
    method: ScalingMethod,
    columns: &[String],
) -> Result<ScalingOutcome> {
    for name in columns {
        let column = table.column(name)?;
        if !column.is_numeric() {
            return Err(Error::non_numeric_column(name));
        }
    }

    let mut scaled = table.clone();
    for name in columns {
        let column = scaled.column_mut(name)?;
        let values = column.numeric_values();
        if values.is_empty() {
            continue;
        }
        let transform: Box<dyn Fn(f64) -> f64> = match method {
            ScalingMethod::Standard => {
                let mean = stats::mean(&values);
                let std = stats::population_std(&values);
                let scale = if std > 0.0 { std } else { 1.0 };
                Box::new(move |v| (v - mean) / scale)
            }
            ScalingMethod::Minmax => {
                let min = stats::min(&values);
                let range = stats::max(&values) - min;
                Box::new(move |v| if range > 0.0 { (v - min) / range } else { 0.0 })
            }
        };
        for cell in column.cells_mut() {
            if let Cell::Number(v) = cell {
                *v = transform(*v);
            }
        }
    }

    tracing::debug!(method = method.name(), columns = columns.len(), "scaled columns");
    Ok(ScalingOutcome {
        table: scaled,
        scaled_columns: columns.to_vec(),
    })
}
