//! Descriptive statistics helpers
//!
//! Moment and quantile routines shared by the profiler, the inference
//! engine, and the cleaning pipeline. Quantiles use linear interpolation;
//! skewness and kurtosis use the adjusted (sample-corrected) estimators so
//! the numbers line up with the usual dataframe `describe` output.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Minimum, quartiles, and maximum of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    values.mean()
}

/// Sample variance (n - 1 denominator); NaN below two values
pub fn sample_variance(values: &[f64]) -> f64 {
    values.variance()
}

/// Sample standard deviation (n - 1 denominator); NaN below two values
pub fn sample_std(values: &[f64]) -> f64 {
    values.std_dev()
}

/// Population standard deviation (n denominator)
pub fn population_std(values: &[f64]) -> f64 {
    values.population_std_dev()
}

/// Smallest value; NaN for an empty slice
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::min)
}

/// Largest value; NaN for an empty slice
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}

/// Quantile with linear interpolation between order statistics
///
/// `q` must lie in `[0, 1]`; the input need not be sorted.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(Error::computation(format!("quantile {q} must be in [0, 1]")));
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(quantile_sorted(&sorted, q))
}

/// Quantile of an already sorted slice (linear interpolation)
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = pos - lower as f64;
        sorted[lower] + frac * (sorted[upper] - sorted[lower])
    }
}

/// Five-number summary of a sample
pub fn five_number_summary(values: &[f64]) -> Result<FiveNumberSummary> {
    if values.is_empty() {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(FiveNumberSummary {
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// A single bin in an equal-width histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Left edge (inclusive)
    pub left: f64,
    /// Right edge (exclusive, except for the last bin)
    pub right: f64,
    /// Number of values in this bin
    pub count: usize,
    /// count / (total_count * bin_width)
    pub density: f64,
}

/// Equal-width histogram over non-missing values
///
/// Degenerate samples (all values equal) get a single-width range centered
/// on the value; an empty sample yields no bins.
pub fn equal_width_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return vec![];
    }
    let lo = min(values);
    let hi = max(values);
    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let total = values.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let left = lo + i as f64 * width;
            let right = lo + (i + 1) as f64 * width;
            HistogramBin {
                left,
                right,
                count,
                density: count as f64 / (total * width),
            }
        })
        .collect()
}

/// Adjusted Fisher-Pearson skewness coefficient
///
/// Returns `None` below three values; zero-spread samples report 0.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let nf = n as f64;
    let m = mean(values);
    let (m2, m3) = values.iter().fold((0.0, 0.0), |(m2, m3), &x| {
        let d = x - m;
        (m2 + d * d, m3 + d * d * d)
    });
    let m2 = m2 / nf;
    let m3 = m3 / nf;
    if m2 == 0.0 {
        return Some(0.0);
    }
    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0))
}

/// Adjusted excess kurtosis
///
/// Returns `None` below four values; zero-spread samples report 0.
pub fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let nf = n as f64;
    let m = mean(values);
    let (m2, m4) = values.iter().fold((0.0, 0.0), |(m2, m4), &x| {
        let d = x - m;
        let d2 = d * d;
        (m2 + d2, m4 + d2 * d2)
    });
    let m2 = m2 / nf;
    let m4 = m4 / nf;
    if m2 == 0.0 {
        return Some(0.0);
    }
    let g2 = m4 / (m2 * m2) - 3.0;
    Some(((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0)))
}
