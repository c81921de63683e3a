//! Simple linear regression (ordinary least squares with intercept)

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tabstat_core::{Error, Result, Table};

/// Number of points on the fitted regression line
const LINE_POINTS: usize = 100;
/// Complete observations required for a fit with one regressor
const MIN_OBSERVATIONS: usize = 3;

/// A point of the scatter or fitted-line series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionPoint {
    pub x: f64,
    pub y: f64,
}

/// One residual-diagnostic pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualPoint {
    pub fitted: f64,
    pub residual: f64,
}

/// A fitted coefficient with its standard error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEstimate {
    pub value: f64,
    pub std_error: f64,
}

/// Goodness-of-fit and coefficient estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionModelStats {
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub p_value: f64,
    pub intercept: CoefficientEstimate,
    pub slope: CoefficientEstimate,
}

/// Full regression output with chart-ready series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub model_stats: RegressionModelStats,
    pub equation: String,
    pub scatter: Vec<RegressionPoint>,
    pub regression_line: Vec<RegressionPoint>,
    pub residuals: Vec<ResidualPoint>,
}

/// Fit `y_column ~ x_column` by ordinary least squares
///
/// Rows missing either column are dropped; [`Error::InsufficientData`] when
/// fewer than three complete rows remain. A zero-variance regressor is a
/// singular fit and surfaces as a computation error.
pub fn simple_ols(table: &Table, y_column: &str, x_column: &str) -> Result<RegressionResult> {
    let y_col = table.column(y_column)?;
    let x_col = table.column(x_column)?;
    for (col, name) in [(y_col, y_column), (x_col, x_column)] {
        if !col.is_numeric() {
            return Err(Error::non_numeric_column(name));
        }
    }

    let pairs: Vec<(f64, f64)> = x_col
        .numbers()
        .into_iter()
        .zip(y_col.numbers())
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();
    let n = pairs.len();
    if n < MIN_OBSERVATIONS {
        return Err(Error::InsufficientData {
            expected: MIN_OBSERVATIONS,
            actual: n,
        });
    }
    let nf = n as f64;

    let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / nf;
    let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / nf;
    let sxx: f64 = pairs.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
    let sxy: f64 = pairs
        .iter()
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    if sxx == 0.0 {
        return Err(Error::Computation(format!(
            "regressor {x_column} has zero variance (singular fit)"
        )));
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let mut sse = 0.0;
    let mut sst = 0.0;
    let mut residuals = Vec::with_capacity(n);
    for &(x, y) in &pairs {
        let fitted = intercept + slope * x;
        let residual = y - fitted;
        sse += residual * residual;
        sst += (y - y_mean).powi(2);
        residuals.push(ResidualPoint { fitted, residual });
    }
    if sst == 0.0 {
        return Err(Error::Computation(format!(
            "response {y_column} has zero variance"
        )));
    }

    let r_squared = 1.0 - sse / sst;
    let df_resid = (n - 2) as f64;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (nf - 1.0) / df_resid;
    let f_statistic = (sst - sse) / (sse / df_resid);
    let p_value = if f_statistic.is_finite() {
        let dist = FisherSnedecor::new(1.0, df_resid)
            .map_err(|e| Error::Computation(format!("F distribution: {e}")))?;
        1.0 - dist.cdf(f_statistic)
    } else {
        // Perfect fit: the statistic diverges, the tail probability vanishes
        0.0
    };

    let residual_variance = sse / df_resid;
    let slope_se = (residual_variance / sxx).sqrt();
    let intercept_se = (residual_variance * (1.0 / nf + x_mean * x_mean / sxx)).sqrt();

    let x_min = pairs.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let x_max = pairs
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let step = (x_max - x_min) / (LINE_POINTS - 1) as f64;
    let regression_line = (0..LINE_POINTS)
        .map(|i| {
            let x = x_min + step * i as f64;
            RegressionPoint {
                x,
                y: intercept + slope * x,
            }
        })
        .collect();

    let scatter = pairs
        .iter()
        .map(|&(x, y)| RegressionPoint { x, y })
        .collect();

    Ok(RegressionResult {
        model_stats: RegressionModelStats {
            r_squared,
            adj_r_squared,
            f_statistic,
            p_value,
            intercept: CoefficientEstimate {
                value: intercept,
                std_error: intercept_se,
            },
            slope: CoefficientEstimate {
                value: slope,
                std_error: slope_se,
            },
        },
        equation: format!("y = {intercept:.4} + {slope:.4}x"),
        scatter,
        regression_line,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tabstat_core::{Cell, Column};

    fn xy_table(x: &[Option<f64>], y: &[Option<f64>]) -> Table {
        Table::new(vec![
            Column::from_numbers("x", x),
            Column::from_numbers("y", y),
        ])
        .unwrap()
    }

    #[test]
    fn test_noisy_linear_fit() {
        // y ~= 2 + 3x with small perturbations
        let x: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let y: Vec<Option<f64>> = (0..10)
            .map(|i| Some(2.0 + 3.0 * i as f64 + if i % 2 == 0 { 0.1 } else { -0.1 }))
            .collect();
        let result = simple_ols(&xy_table(&x, &y), "y", "x").unwrap();

        assert_relative_eq!(result.model_stats.slope.value, 3.0, epsilon = 0.05);
        assert_relative_eq!(result.model_stats.intercept.value, 2.0, epsilon = 0.2);
        assert!(result.model_stats.r_squared > 0.99);
        assert!(result.model_stats.p_value < 1e-6);
        assert_eq!(result.scatter.len(), 10);
        assert_eq!(result.residuals.len(), 10);
    }

    #[test]
    fn test_regression_line_spans_observed_range() {
        let x: Vec<Option<f64>> = vec![Some(1.0), Some(5.0), Some(3.0), Some(9.0)];
        let y: Vec<Option<f64>> = vec![Some(2.0), Some(11.0), Some(5.5), Some(19.0)];
        let result = simple_ols(&xy_table(&x, &y), "y", "x").unwrap();

        assert_eq!(result.regression_line.len(), 100);
        assert_relative_eq!(result.regression_line[0].x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.regression_line[99].x, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rows_with_missing_either_side_dropped() {
        let x = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let y = vec![Some(1.0), Some(2.0), None, Some(4.0)];
        let result = simple_ols(&xy_table(&x, &y), "y", "x").unwrap();
        assert_eq!(result.scatter.len(), 2);
    }

    #[test]
    fn test_too_few_rows_fail() {
        let x = vec![Some(1.0), Some(2.0)];
        let y = vec![Some(1.0), Some(2.0)];
        let err = simple_ols(&xy_table(&x, &y), "y", "x").unwrap_err();
        assert!(matches!(err, Error::InsufficientData { expected: 3, .. }));
    }

    #[test]
    fn test_constant_regressor_is_singular() {
        let x = vec![Some(2.0), Some(2.0), Some(2.0), Some(2.0)];
        let y = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let err = simple_ols(&xy_table(&x, &y), "y", "x").unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn test_categorical_column_rejected() {
        let table = Table::new(vec![
            Column::new("x", vec![Cell::Number(1.0), Cell::Number(2.0)]),
            Column::new("y", vec![Cell::Text("a".into()), Cell::Text("b".into())]),
        ])
        .unwrap();
        let err = simple_ols(&table, "y", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidColumn { .. }));
    }

    #[test]
    fn test_known_fit() {
        // Near-linear sample; closed form gives slope 82/42, intercept 10 - slope * 4.5
        let x: Vec<Option<f64>> = (1..=8).map(|i| Some(i as f64)).collect();
        let y: Vec<Option<f64>> =
            vec![Some(3.0), Some(5.0), Some(7.5), Some(9.0), Some(11.0), Some(13.0), Some(14.5), Some(17.0)];
        let result = simple_ols(&xy_table(&x, &y), "y", "x").unwrap();
        assert_relative_eq!(result.model_stats.slope.value, 82.0 / 42.0, epsilon = 1e-12);
        assert_relative_eq!(
            result.model_stats.intercept.value,
            10.0 - (82.0 / 42.0) * 4.5,
            epsilon = 1e-12
        );
        assert!(result.model_stats.adj_r_squared <= result.model_stats.r_squared);
    }
}
