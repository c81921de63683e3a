//! K-nearest-neighbor imputation over the numeric subset of a table
//!
//! Distances follow the nan-euclidean convention: only coordinates present
//! in both rows contribute, scaled up by the fraction of usable features.
//! Each missing entry takes the mean of its k nearest donors; columns with
//! no donors at all fall back to the column mean.

use tabstat_core::{stats, Cell, Error, Result, Table};

/// Nan-euclidean distance between two rows; `None` when no coordinate is
/// present in both
fn nan_distance(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let mut present = 0usize;
    let mut sum_sq = 0.0;
    for (x, y) in a.iter().zip(b) {
        if let (Some(x), Some(y)) = (x, y) {
            present += 1;
            sum_sq += (x - y) * (x - y);
        }
    }
    if present == 0 {
        None
    } else {
        Some((sum_sq * a.len() as f64 / present as f64).sqrt())
    }
}

/// Impute missing entries of the named numeric columns in place
pub fn knn_impute_columns(table: &mut Table, columns: &[String], k: usize) -> Result<()> {
    let n_rows = table.n_rows();

    // Row-major snapshot of the targeted numeric block
    let block: Vec<Vec<Option<f64>>> = (0..n_rows)
        .map(|i| {
            columns
                .iter()
                .map(|name| table.column(name).map(|c| c.cells()[i].as_number()))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    for (feature, name) in columns.iter().enumerate() {
        let observed: Vec<f64> = block.iter().filter_map(|row| row[feature]).collect();
        if observed.is_empty() {
            // Nothing to learn from; leave the column untouched
            continue;
        }
        let fallback = stats::mean(&observed);

        let mut imputed: Vec<(usize, f64)> = Vec::new();
        for (row_idx, row) in block.iter().enumerate() {
            if row[feature].is_some() {
                continue;
            }
            let mut donors: Vec<(f64, f64)> = block
                .iter()
                .enumerate()
                .filter(|(other_idx, other)| {
                    *other_idx != row_idx && other[feature].is_some()
                })
                .filter_map(|(_, other)| {
                    let value = other[feature]?;
                    nan_distance(row, other).map(|d| (d, value))
                })
                .collect();
            donors.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            donors.truncate(k);

            let fill = if donors.is_empty() {
                fallback
            } else {
                donors.iter().map(|(_, v)| v).sum::<f64>() / donors.len() as f64
            };
            imputed.push((row_idx, fill));
        }

        let column = table.column_mut(name)?;
        for (row_idx, fill) in imputed {
            column.cells_mut()[row_idx] = Cell::Number(fill);
        }
    }

    // The targeted block must come out complete
    for name in columns {
        let column = table.column(name)?;
        if column.null_count() > 0 && !column.numeric_values().is_empty() {
            return Err(Error::computation(format!(
                "KNN imputation left {} missing values in {name}",
                column.null_count()
            )));
        }
    }
    Ok(())
}
