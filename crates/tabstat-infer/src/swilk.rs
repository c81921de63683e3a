//! Shapiro-Wilk W statistic and significance level
//!
//! Port of algorithm AS R94 (Royston 1995), the reference implementation
//! behind the usual scientific-stack `shapiro` call. Valid for sample sizes
//! between 3 and 5000; larger samples must be subsampled by the caller.

use statrs::distribution::{ContinuousCDF, Normal};
use tabstat_core::{Error, Result};

// Polynomial coefficients from AS R94, ascending order
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];
const SMALL: f64 = 1e-19;
const PI6: f64 = 1.909859;
const STQR: f64 = 1.047198;

fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Compute the Shapiro-Wilk statistic and p-value for a sample
///
/// Returns `(w, p_value)`. The input need not be sorted. Fails below three
/// observations, above 5000, or on a zero-range sample.
pub fn shapiro_wilk(sample: &[f64]) -> Result<(f64, f64)> {
    let n = sample.len();
    if n < 3 {
        return Err(Error::InsufficientData {
            expected: 3,
            actual: n,
        });
    }
    if n > 5000 {
        return Err(Error::computation(
            "Shapiro-Wilk is unreliable above 5000 observations; subsample first",
        ));
    }

    let mut x = sample.to_vec();
    x.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let range = x[n - 1] - x[0];
    if range <= 0.0 {
        return Err(Error::zero_variance("sample"));
    }

    let std_normal = Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("normal distribution: {e}")))?;

    let an = n as f64;
    let n2 = n / 2;
    let mut a = vec![0.0; n2];
    if n == 3 {
        a[0] = std::f64::consts::FRAC_1_SQRT_2;
    } else {
        // Expected normal order statistics (lower half), then the Royston
        // polynomial corrections for the two extreme weights
        let an25 = an + 0.25;
        let mut summ2 = 0.0;
        for (i, ai) in a.iter_mut().enumerate() {
            *ai = std_normal.inverse_cdf(((i + 1) as f64 - 0.375) / an25);
            summ2 += *ai * *ai;
        }
        summ2 *= 2.0;
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / an.sqrt();
        let a1 = poly(&C1, rsn) - a[0] / ssumm2;

        let (rescale_from, fac) = if n > 5 {
            let a2 = -a[1] / ssumm2 + poly(&C2, rsn);
            let fac = ((summ2 - 2.0 * a[0] * a[0] - 2.0 * a[1] * a[1])
                / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
                .sqrt();
            a[1] = a2;
            (2, fac)
        } else {
            let fac = ((summ2 - 2.0 * a[0] * a[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
            (1, fac)
        };
        a[0] = a1;
        for ai in a.iter_mut().skip(rescale_from) {
            *ai = -*ai / fac;
        }
    }

    // Antisymmetric weight vector: negative weights on the lower half
    let weights: Vec<f64> = (0..n)
        .map(|i| {
            let j = n - 1 - i;
            if i < j {
                -a[i]
            } else if i > j {
                a[j]
            } else {
                0.0
            }
        })
        .collect();

    // W is the squared correlation between data and weights
    let x_mean = x.iter().sum::<f64>() / an;
    let w_mean = weights.iter().sum::<f64>() / an;
    let mut ssx = 0.0;
    let mut ssa = 0.0;
    let mut sxa = 0.0;
    for (xi, wi) in x.iter().zip(&weights) {
        let dx = (xi - x_mean) / range;
        let dw = wi - w_mean;
        ssx += dx * dx;
        ssa += dw * dw;
        sxa += dx * dw;
    }
    let ssassx = (ssa * ssx).sqrt();
    let w1 = (ssassx - sxa) * (ssassx + sxa) / (ssa * ssx);
    let w = 1.0 - w1;

    if n == 3 {
        let pw = PI6 * (w.sqrt().asin() - STQR);
        return Ok((w, pw.clamp(0.0, 1.0)));
    }

    let mut y = w1.ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return Ok((w, SMALL));
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let log_n = an.ln();
        (poly(&C5, log_n), poly(&C6, log_n).exp())
    };

    let pw = 1.0 - std_normal.cdf((y - m) / s);
    Ok((w, pw.clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_sample() {
        // The eleven adult weights from the original Shapiro-Wilk paper:
        // published coefficients give W = b^2 / SS = 70.08^2 / 6226 ~= 0.7888,
        // well below the 1% point
        let x = [
            148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0,
        ];
        let (w, p) = shapiro_wilk(&x).unwrap();
        assert_relative_eq!(w, 0.7888, epsilon = 1e-3);
        assert!(p < 0.01, "p = {p}");
        assert!(p > 1e-4, "p = {p}");
    }

    #[test]
    fn test_uniform_grid_close_to_normal() {
        // A short uniform grid is indistinguishable from normal order
        // statistics at this size
        let x: Vec<f64> = (1..=11).map(|i| i as f64).collect();
        let (w, p) = shapiro_wilk(&x).unwrap();
        assert!(w > 0.96, "w = {w}");
        assert!(p > 0.5, "p = {p}");
    }

    #[test]
    fn test_near_normal_sample_has_high_p() {
        // Symmetric, light-tailed sample: no evidence against normality
        let x = [
            -2.0, -1.5, -1.0, -0.7, -0.4, -0.2, 0.0, 0.2, 0.4, 0.7, 1.0, 1.5, 2.0,
        ];
        let (w, p) = shapiro_wilk(&x).unwrap();
        assert!(w > 0.93, "w = {w}");
        assert!(p > 0.3, "p = {p}");
    }

    #[test]
    fn test_heavily_skewed_sample_has_low_p() {
        let x: Vec<f64> = (0..50).map(|i| (i as f64 / 4.0).exp()).collect();
        let (_, p) = shapiro_wilk(&x).unwrap();
        assert!(p < 0.01, "p = {p}");
    }

    #[test]
    fn test_minimum_sample_size() {
        assert!(shapiro_wilk(&[1.0, 2.0]).is_err());
        let (w, p) = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert!(w > 0.9);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_zero_range_fails() {
        assert!(shapiro_wilk(&[5.0, 5.0, 5.0, 5.0]).is_err());
    }
}
