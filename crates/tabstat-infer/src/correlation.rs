//! Pairwise Pearson correlation over numeric columns

use serde::{Deserialize, Serialize};
use tabstat_core::{Error, Result, Table};

/// Correlation matrix keyed by column name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major values, `values[i][j] == corr(columns[i], columns[j])`
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns
    pub fn get(&self, col1: &str, col2: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == col1)?;
        let j = self.columns.iter().position(|c| c == col2)?;
        Some(self.values[i][j])
    }
}

/// One unordered column pair with its correlation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub column_a: String,
    pub column_b: String,
    pub value: f64,
}

/// Full pairwise correlation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub matrix: CorrelationMatrix,
    /// One triangle only, so unordered pairs appear once
    pub pairs: Vec<CorrelationPair>,
}

/// Pearson correlation over pairwise-complete observations
///
/// NaN when fewer than two complete pairs remain or either side has zero
/// variance.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Compute the pairwise correlation matrix of a table's numeric columns
///
/// Fails with [`Error::InsufficientColumns`] below two numeric columns.
/// The matrix is symmetric with an exact unit diagonal; `pairs` carries the
/// upper triangle as flat `{column_a, column_b, value}` triples.
pub fn pairwise_correlation(table: &Table) -> Result<CorrelationResult> {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return Err(Error::InsufficientColumns {
            expected: 2,
            actual: numeric.len(),
        });
    }

    let columns: Vec<String> = numeric.iter().map(|c| c.name().to_string()).collect();
    let series: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.numbers()).collect();
    let k = series.len();

    let mut values = vec![vec![0.0; k]; k];
    let mut pairs = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        values[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
            pairs.push(CorrelationPair {
                column_a: columns[i].clone(),
                column_b: columns[j].clone(),
                value: r,
            });
        }
    }

    Ok(CorrelationResult {
        matrix: CorrelationMatrix { columns, values },
        pairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tabstat_core::{Cell, Column};

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let table = Table::new(vec![
            Column::from_numbers("a", &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            Column::from_numbers("b", &[Some(2.0), Some(4.0), Some(6.0), Some(8.0)]),
            Column::from_numbers("c", &[Some(4.0), Some(3.0), Some(2.0), Some(1.0)]),
        ])
        .unwrap();

        let result = pairwise_correlation(&table).unwrap();
        let m = &result.matrix;
        for i in 0..3 {
            assert_relative_eq!(m.values[i][i], 1.0);
            for j in 0..3 {
                assert_relative_eq!(m.values[i][j], m.values[j][i]);
            }
        }
        assert_relative_eq!(m.get("a", "b").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.get("a", "c").unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pairs_cover_one_triangle() {
        let table = Table::new(vec![
            Column::from_numbers("a", &[Some(1.0), Some(2.0), Some(3.0)]),
            Column::from_numbers("b", &[Some(1.0), Some(3.0), Some(2.0)]),
            Column::from_numbers("c", &[Some(2.0), Some(1.0), Some(3.0)]),
        ])
        .unwrap();

        let result = pairwise_correlation(&table).unwrap();
        assert_eq!(result.pairs.len(), 3);
        let names: Vec<(String, String)> = result
            .pairs
            .iter()
            .map(|p| (p.column_a.clone(), p.column_b.clone()))
            .collect();
        assert!(names.contains(&("a".into(), "b".into())));
        assert!(!names.contains(&("b".into(), "a".into())));
    }

    #[test]
    fn test_pairwise_complete_observations() {
        // Rows missing in one pair do not disturb another pair
        let table = Table::new(vec![
            Column::from_numbers("a", &[Some(1.0), Some(2.0), Some(3.0), None]),
            Column::from_numbers("b", &[Some(2.0), Some(4.0), None, Some(8.0)]),
        ])
        .unwrap();
        let result = pairwise_correlation(&table).unwrap();
        // Complete pairs for (a, b): (1, 2) and (2, 4) -> exactly linear
        assert_relative_eq!(result.matrix.get("a", "b").unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_categorical_columns_ignored() {
        let table = Table::new(vec![
            Column::from_numbers("a", &[Some(1.0), Some(2.0)]),
            Column::new("label", vec![Cell::Text("x".into()), Cell::Text("y".into())]),
            Column::from_numbers("b", &[Some(3.0), Some(4.0)]),
        ])
        .unwrap();
        let result = pairwise_correlation(&table).unwrap();
        assert_eq!(result.matrix.columns, vec!["a", "b"]);
    }

    #[test]
    fn test_single_numeric_column_fails() {
        let table = Table::new(vec![Column::from_numbers(
            "a",
            &[Some(1.0), Some(2.0)],
        )])
        .unwrap();
        let err = pairwise_correlation(&table).unwrap_err();
        assert!(matches!(err, Error::InsufficientColumns { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_zero_variance_pair_is_nan() {
        let table = Table::new(vec![
            Column::from_numbers("a", &[Some(1.0), Some(1.0), Some(1.0)]),
            Column::from_numbers("b", &[Some(1.0), Some(2.0), Some(3.0)]),
        ])
        .unwrap();
        let result = pairwise_correlation(&table).unwrap();
        assert!(result.matrix.get("a", "b").unwrap().is_nan());
    }
}
