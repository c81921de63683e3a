//! One-sample t-test

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tabstat_core::{stats, Error, Result, Table};

/// Parameters for the one-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestParams {
    /// Hypothesized mean
    pub mu0: f64,
    /// Significance level
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

pub(crate) fn default_alpha() -> f64 {
    0.05
}

impl Default for TTestParams {
    fn default() -> Self {
        Self {
            mu0: 0.0,
            alpha: default_alpha(),
        }
    }
}

/// Reject / fail-to-reject classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestDecision {
    Reject,
    FailToReject,
}

/// Confidence interval for the sample mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Confidence level, `1 - alpha`
    pub level: f64,
}

/// One-sample t-test result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub t_statistic: f64,
    pub p_value: f64,
    pub sample_mean: f64,
    pub sample_std: f64,
    pub sample_size: usize,
    pub confidence_interval: ConfidenceInterval,
    pub decision: TestDecision,
    pub interpretation: String,
}

/// Run a one-sample t-test of `column` against `params.mu0`
///
/// Missing values are dropped first; [`Error::EmptySample`] when none
/// remain. The two-sided p-value and the `(1 - alpha)` confidence interval
/// both use the Student-t distribution with `n - 1` degrees of freedom.
pub fn one_sample_ttest(table: &Table, column: &str, params: &TTestParams) -> Result<TTestResult> {
    let col = table.column(column)?;
    if !col.is_numeric() {
        return Err(Error::non_numeric_column(column));
    }
    let values = col.numeric_values();
    if values.is_empty() {
        return Err(Error::empty_sample(column));
    }
    let n = values.len();
    if n < 2 {
        return Err(Error::computation(
            "t-test needs at least two observations for a standard error",
        ));
    }

    let sample_mean = stats::mean(&values);
    let sample_std = stats::sample_std(&values);
    let std_error = sample_std / (n as f64).sqrt();
    if std_error == 0.0 {
        return Err(Error::zero_variance(&format!("column {column}")));
    }

    let t_statistic = (sample_mean - params.mu0) / std_error;
    let dist = StudentsT::new(0.0, 1.0, (n - 1) as f64)
        .map_err(|e| Error::Computation(format!("t distribution: {e}")))?;
    let p_value = 2.0 * (1.0 - dist.cdf(t_statistic.abs()));

    let t_crit = dist.inverse_cdf(1.0 - params.alpha / 2.0);
    let margin = t_crit * std_error;

    let decision = if p_value < params.alpha {
        TestDecision::Reject
    } else {
        TestDecision::FailToReject
    };
    let verdict = match decision {
        TestDecision::Reject => "reject",
        TestDecision::FailToReject => "fail to reject",
    };

    Ok(TTestResult {
        t_statistic,
        p_value,
        sample_mean,
        sample_std,
        sample_size: n,
        confidence_interval: ConfidenceInterval {
            lower: sample_mean - margin,
            upper: sample_mean + margin,
            level: 1.0 - params.alpha,
        },
        decision,
        interpretation: format!("At alpha={}, {verdict} the null hypothesis", params.alpha),
    })
}
