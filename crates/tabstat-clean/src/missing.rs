//! Missing-value strategies

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabstat_core::{stats, Cell, Column, ColumnKind, Error, Result, Table};

use crate::knn::knn_impute_columns;

/// Neighbor count of the KNN imputer
const KNN_NEIGHBORS: usize = 5;

/// Fixed enumeration of missing-value strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanOperation {
    DropMissing,
    FillMean,
    FillMedian,
    FillMode,
    KnnImpute,
}

impl CleanOperation {
    /// Request-body name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Self::DropMissing => "drop_missing",
            Self::FillMean => "fill_mean",
            Self::FillMedian => "fill_median",
            Self::FillMode => "fill_mode",
            Self::KnnImpute => "knn_impute",
        }
    }

    /// Lineage tag of datasets derived by this operation
    pub fn lineage_tag(&self) -> String {
        format!("cleaned_{}", self.name())
    }
}

impl FromStr for CleanOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "drop_missing" => Ok(Self::DropMissing),
            "fill_mean" => Ok(Self::FillMean),
            "fill_median" => Ok(Self::FillMedian),
            "fill_mode" => Ok(Self::FillMode),
            "knn_impute" => Ok(Self::KnnImpute),
            other => Err(Error::InvalidOperation(other.to_string())),
        }
    }
}

/// Result of a missing-value operation
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub table: Table,
    pub rows_removed: usize,
    pub message: String,
}

/// Resolve the targeted columns: explicit names must all exist; with no
/// explicit names the operation covers every numeric column.
fn resolve_targets(table: &Table, columns: Option<&[String]>) -> Result<Vec<String>> {
    match columns {
        Some(names) => {
            for name in names {
                if !table.has_column(name) {
                    return Err(Error::column_not_found(name));
                }
            }
            Ok(names.to_vec())
        }
        None => Ok(table.numeric_column_names()),
    }
}

fn fill_nulls_with(column: &mut Column, fill: Cell) {
    for cell in column.cells_mut() {
        if cell.is_null() {
            *cell = fill.clone();
        }
    }
}

/// Most frequent non-missing cell; ties resolve to the smallest value,
/// numeric before text
fn mode_cell(column: &Column) -> Option<Cell> {
    let mut counted: Vec<(Cell, usize)> = Vec::new();
    for cell in column.cells() {
        if cell.is_null() {
            continue;
        }
        match counted.iter_mut().find(|(c, _)| c == cell) {
            Some((_, count)) => *count += 1,
            None => counted.push((cell.clone(), 1)),
        }
    }
    let best = counted.iter().map(|(_, count)| *count).max()?;
    counted
        .into_iter()
        .filter(|(_, count)| *count == best)
        .map(|(cell, _)| cell)
        .min_by(|a, b| match (a, b) {
            (Cell::Number(x), Cell::Number(y)) => {
                x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal)
            }
            (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
            (Cell::Number(_), _) => std::cmp::Ordering::Less,
            (_, Cell::Number(_)) => std::cmp::Ordering::Greater,
            _ => std::cmp::Ordering::Equal,
        })
}

/// Apply a missing-value strategy, producing a new table
///
/// Explicitly targeted columns must exist; when no columns are given the
/// operation covers all numeric columns. `fill_mean`/`fill_median` skip
/// non-numeric targets; `fill_mode` covers every kind and falls back to a
/// zero default for modeless columns; `knn_impute` restricts to the numeric
/// subset of the targets and fails when that subset is empty.
pub fn clean_missing(
    table: &Table,
    operation: CleanOperation,
    columns: Option<&[String]>,
) -> Result<CleanOutcome> {
    let targets = resolve_targets(table, columns)?;
    tracing::debug!(operation = operation.name(), targets = targets.len(), "cleaning missing values");

    match operation {
        CleanOperation::DropMissing => {
            let keep: Vec<bool> = (0..table.n_rows())
                .map(|i| {
                    targets.iter().all(|name| {
                        table
                            .column(name)
                            .map(|c| !c.cells()[i].is_null())
                            .unwrap_or(true)
                    })
                })
                .collect();
            let cleaned = table.filter_rows(&keep)?;
            let rows_removed = table.n_rows() - cleaned.n_rows();
            Ok(CleanOutcome {
                table: cleaned,
                rows_removed,
                message: format!("Removed {rows_removed} rows with missing values"),
            })
        }
        CleanOperation::FillMean | CleanOperation::FillMedian => {
            let mut cleaned = table.clone();
            for name in &targets {
                let column = cleaned.column_mut(name)?;
                if column.kind() != ColumnKind::Numeric {
                    continue;
                }
                let values = column.numeric_values();
                if values.is_empty() {
                    continue;
                }
                let fill = match operation {
                    CleanOperation::FillMean => stats::mean(&values),
                    _ => stats::quantile(&values, 0.5)?,
                };
                fill_nulls_with(column, Cell::Number(fill));
            }
            let what = if operation == CleanOperation::FillMean {
                "means"
            } else {
                "medians"
            };
            Ok(CleanOutcome {
                table: cleaned,
                rows_removed: 0,
                message: format!("Filled missing values with column {what}"),
            })
        }
        CleanOperation::FillMode => {
            let mut cleaned = table.clone();
            for name in &targets {
                let column = cleaned.column_mut(name)?;
                let fill = mode_cell(column).unwrap_or(match column.kind() {
                    ColumnKind::Numeric => Cell::Number(0.0),
                    ColumnKind::Categorical => Cell::Text("0".to_string()),
                });
                fill_nulls_with(column, fill);
            }
            Ok(CleanOutcome {
                table: cleaned,
                rows_removed: 0,
                message: "Filled missing values with column modes".to_string(),
            })
        }
        CleanOperation::KnnImpute => {
            let numeric_targets: Vec<String> = targets
                .iter()
                .filter(|name| {
                    table
                        .column(name)
                        .map(Column::is_numeric)
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
            if numeric_targets.is_empty() {
                return Err(Error::NoNumericColumns);
            }
            let mut cleaned = table.clone();
            knn_impute_columns(&mut cleaned, &numeric_targets, KNN_NEIGHBORS)?;
            Ok(CleanOutcome {
                table: cleaned,
                rows_removed: 0,
                message: "Filled missing values using KNN imputation".to_string(),
            })
        }
    }
}
