//! Normality battery: Shapiro-Wilk, Kolmogorov-Smirnov, Anderson-Darling
//!
//! All three tests run against the same cleaned sample, alongside the
//! chart-ready series (QQ plot, density histogram, fitted normal curve) the
//! front end renders.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use tabstat_core::{stats, Error, Result, Table};

use crate::swilk::shapiro_wilk;
use crate::ttest::default_alpha;

/// Shapiro-Wilk becomes unreliable above this size; larger samples are
/// subsampled deterministically
const SHAPIRO_MAX: usize = 5000;
/// Seed of the deterministic subsample
const SHAPIRO_SEED: u64 = 42;
/// Bucket count of the density histogram
const HISTOGRAM_BUCKETS: usize = 30;
/// Points on the fitted normal density curve
const CURVE_POINTS: usize = 100;

/// Anderson-Darling critical values for the normal case, before the
/// sample-size adjustment
const AD_CRITICAL: [f64; 5] = [0.576, 0.656, 0.787, 0.918, 1.092];
/// Significance levels (percent) matching [`AD_CRITICAL`]
const AD_LEVELS: [f64; 5] = [15.0, 10.0, 5.0, 2.5, 1.0];

/// Parameters for the normality battery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalityParams {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for NormalityParams {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

/// Normal / not-normal classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalityVerdict {
    Normal,
    NotNormal,
}

/// Statistic, p-value, and verdict of one test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestVerdict {
    pub statistic: f64,
    pub p_value: f64,
    pub result: NormalityVerdict,
}

/// Anderson-Darling statistic with its critical-value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndersonDarling {
    pub statistic: f64,
    /// Significance levels in percent
    pub significance_levels: Vec<f64>,
    /// Critical values adjusted for the sample size
    pub critical_values: Vec<f64>,
}

/// One (theoretical, sample) quantile pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QqPoint {
    pub theoretical: f64,
    pub sample: f64,
}

/// One density-histogram bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityBucket {
    /// Bucket start, two decimals
    pub bin: String,
    pub left: f64,
    pub frequency: f64,
}

/// One point of the fitted normal density curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// Full normality battery output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalityResult {
    pub shapiro_wilk: TestVerdict,
    pub kolmogorov_smirnov: TestVerdict,
    pub anderson_darling: AndersonDarling,
    pub qq_plot: Vec<QqPoint>,
    pub histogram: Vec<DensityBucket>,
    pub normal_curve: Vec<CurvePoint>,
}

fn verdict(p_value: f64, alpha: f64) -> NormalityVerdict {
    if p_value > alpha {
        NormalityVerdict::Normal
    } else {
        NormalityVerdict::NotNormal
    }
}

/// One-sample Kolmogorov-Smirnov statistic against N(mean, std), with the
/// asymptotic p-value (Stephens' small-sample correction)
fn kolmogorov_smirnov(sorted: &[f64], mean: f64, std: f64) -> Result<(f64, f64)> {
    let n = sorted.len() as f64;
    let dist = Normal::new(mean, std)
        .map_err(|e| Error::Computation(format!("normal distribution: {e}")))?;
    let mut d = 0.0f64;
    for (i, &x) in sorted.iter().enumerate() {
        let cdf = dist.cdf(x);
        let upper = (i + 1) as f64 / n - cdf;
        let lower = cdf - i as f64 / n;
        d = d.max(upper).max(lower);
    }
    let lambda = (n.sqrt() + 0.12 + 0.11 / n.sqrt()) * d;
    let mut p = 0.0;
    for j in 1..=100 {
        let jf = j as f64;
        let term = 2.0 * (-1.0f64).powi(j - 1) * (-2.0 * jf * jf * lambda * lambda).exp();
        p += term;
        if term.abs() < 1e-12 {
            break;
        }
    }
    Ok((d, p.clamp(0.0, 1.0)))
}

/// Anderson-Darling statistic for normality of a standardized sample
fn anderson_darling(sorted: &[f64], mean: f64, std: f64) -> Result<f64> {
    let n = sorted.len();
    let nf = n as f64;
    let dist = Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("normal distribution: {e}")))?;
    let eps = 1e-15;
    let mut sum = 0.0;
    for i in 0..n {
        let z_lo = dist.cdf((sorted[i] - mean) / std).clamp(eps, 1.0 - eps);
        let z_hi = dist
            .cdf((sorted[n - 1 - i] - mean) / std)
            .clamp(eps, 1.0 - eps);
        sum += (2.0 * i as f64 + 1.0) * (z_lo.ln() + (1.0 - z_hi).ln());
    }
    Ok(-nf - sum / nf)
}

/// Filliben order-statistic medians for the QQ plot
fn filliben_quantiles(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            if i == 0 {
                1.0 - 0.5f64.powf(1.0 / n as f64)
            } else if i == n - 1 {
                0.5f64.powf(1.0 / n as f64)
            } else {
                ((i + 1) as f64 - 0.3175) / (n as f64 + 0.365)
            }
        })
        .collect()
}

/// Run the normality battery against one column
///
/// Missing values are dropped; [`Error::InsufficientData`] below three
/// values. Samples above 5000 points are reduced to a fixed-seed random
/// subsample for the Shapiro-Wilk test only; the other tests and the plot
/// series always see the full sample.
pub fn normality_battery(
    table: &Table,
    column: &str,
    params: &NormalityParams,
) -> Result<NormalityResult> {
    let col = table.column(column)?;
    if !col.is_numeric() {
        return Err(Error::non_numeric_column(column));
    }
    let values = col.numeric_values();
    if values.len() < 3 {
        return Err(Error::InsufficientData {
            expected: 3,
            actual: values.len(),
        });
    }

    let mean = stats::mean(&values);
    let std = stats::sample_std(&values);
    if std == 0.0 {
        return Err(Error::zero_variance(&format!("column {column}")));
    }

    let mut sorted = values.clone();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let (shapiro_stat, shapiro_p) = if values.len() > SHAPIRO_MAX {
        tracing::debug!(
            sample_size = values.len(),
            subsample = SHAPIRO_MAX,
            "subsampling for Shapiro-Wilk"
        );
        let mut rng = ChaCha8Rng::seed_from_u64(SHAPIRO_SEED);
        let subsample: Vec<f64> = values
            .choose_multiple(&mut rng, SHAPIRO_MAX)
            .copied()
            .collect();
        shapiro_wilk(&subsample)?
    } else {
        shapiro_wilk(&values)?
    };

    let (ks_stat, ks_p) = kolmogorov_smirnov(&sorted, mean, std)?;

    let ad_stat = anderson_darling(&sorted, mean, std)?;
    let nf = sorted.len() as f64;
    let adjustment = 1.0 + 4.0 / nf - 25.0 / (nf * nf);
    let critical_values = AD_CRITICAL.iter().map(|cv| cv / adjustment).collect();

    let std_normal = Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("normal distribution: {e}")))?;
    let qq_plot = filliben_quantiles(sorted.len())
        .into_iter()
        .zip(&sorted)
        .map(|(p, &sample)| QqPoint {
            theoretical: std_normal.inverse_cdf(p),
            sample,
        })
        .collect();

    let histogram = stats::equal_width_histogram(&values, HISTOGRAM_BUCKETS)
        .into_iter()
        .map(|bin| DensityBucket {
            bin: format!("{:.2}", bin.left),
            left: bin.left,
            frequency: bin.density,
        })
        .collect();

    let fitted = Normal::new(mean, std)
        .map_err(|e| Error::Computation(format!("normal distribution: {e}")))?;
    let lo = sorted[0];
    let hi = sorted[sorted.len() - 1];
    let step = (hi - lo) / (CURVE_POINTS - 1) as f64;
    let normal_curve = (0..CURVE_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            CurvePoint { x, y: fitted.pdf(x) }
        })
        .collect();

    Ok(NormalityResult {
        shapiro_wilk: TestVerdict {
            statistic: shapiro_stat,
            p_value: shapiro_p,
            result: verdict(shapiro_p, params.alpha),
        },
        kolmogorov_smirnov: TestVerdict {
            statistic: ks_stat,
            p_value: ks_p,
            result: verdict(ks_p, params.alpha),
        },
        anderson_darling: AndersonDarling {
            statistic: ad_stat,
            significance_levels: AD_LEVELS.to_vec(),
            critical_values,
        },
        qq_plot,
        histogram,
        normal_curve,
    })
}
