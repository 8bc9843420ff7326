//! Sample autocorrelation with the biased (divide-by-N) estimator.
//!
//! For a series x of length N with mean x̄:
//!   c0   = Σ (x_t - x̄)² / N
//!   r(h) = Σ_{t < N-h} (x_t - x̄)(x_{t+h} - x̄) / N / c0
//! Coefficients are rounded to 3 decimals. Lag 0 is never reported.

use rayon::prelude::*;

use crate::{SampleMatrix, StatsError};

/// Highest lag reported by [`acf`].
pub const ACF_MAX_LAG: usize = 30;

/// Lags 1..=30 of `series`. A constant (or empty) series gives all NaN.
pub fn acf(series: &[f64]) -> Vec<f64> {
    acf_lags(series, ACF_MAX_LAG)
}

/// Lags 1..=`max_lag` of `series`.
pub fn acf_lags(series: &[f64], max_lag: usize) -> Vec<f64> {
    let Some((avg, c0)) = moments(series) else {
        return vec![f64::NAN; max_lag];
    };
    (1..=max_lag)
        .map(|h| lag_coefficient(series, avg, c0, h))
        .collect()
}

/// The single lag-`h` coefficient of `series`.
pub fn acf_at(series: &[f64], h: usize) -> Result<f64, StatsError> {
    if h == 0 {
        return Err(StatsError::InvalidLag(h));
    }
    Ok(match moments(series) {
        Some((avg, c0)) => lag_coefficient(series, avg, c0, h),
        None => f64::NAN,
    })
}

/// The lag-`h` coefficient of every column of the matrix, in column order.
pub fn column_acf(matrix: &SampleMatrix, h: usize) -> Result<Vec<f64>, StatsError> {
    if h == 0 {
        return Err(StatsError::InvalidLag(h));
    }
    (0..matrix.n_cols())
        .into_par_iter()
        .map(|col| acf_at(&matrix.column_f64(col), h))
        .collect()
}

/// Mean and biased variance; None when the variance is zero or the series empty.
fn moments(series: &[f64]) -> Option<(f64, f64)> {
    if series.is_empty() {
        return None;
    }
    let n = series.len() as f64;
    let avg = series.iter().sum::<f64>() / n;
    let c0 = series.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / n;
    if c0 == 0.0 {
        None
    } else {
        Some((avg, c0))
    }
}

fn lag_coefficient(series: &[f64], avg: f64, c0: f64, h: usize) -> f64 {
    let n = series.len();
    let sum: f64 = if h < n {
        series[..n - h]
            .iter()
            .zip(&series[h..])
            .map(|(a, b)| (a - avg) * (b - avg))
            .sum()
    } else {
        0.0
    };
    round3(sum / n as f64 / c0)
}

/// Three decimals, ties to even on the scaled value.
fn round3(x: f64) -> f64 {
    (x * 1000.0).round_ties_even() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use keccak_core::{hash_to_bits, InputValue};

    #[test]
    fn test_constant_series_is_nan() {
        let zeros = vec![0.0; 40];
        let coeffs = acf(&zeros);
        assert_eq!(coeffs.len(), 30);
        assert!(coeffs.iter().all(|c| c.is_nan()));
        assert!(acf_at(&zeros, 1).unwrap().is_nan());
        assert!(acf(&[]).iter().all(|c| c.is_nan()));
    }

    #[test]
    fn test_alternating_series() {
        // mean 0.5, c0 = 0.25, every product is ±0.25
        let series: Vec<f64> = (0..10).map(|i| (i % 2) as f64).collect();
        let coeffs = acf(&series);
        // lag 1: 9 products of -0.25 / 10 / 0.25 = -0.9
        assert_eq!(coeffs[0], -0.9);
        // lag 2: 8 products of +0.25 → 0.8
        assert_eq!(coeffs[1], 0.8);
        // lags past the series length contribute nothing
        assert_eq!(coeffs[29], 0.0);
    }

    #[test]
    fn test_biased_estimator_divides_by_n() {
        let series = [1.0, 2.0, 3.0, 4.0];
        // avg 2.5, c0 = 1.25; lag 1 sum = (-1.5)(-0.5) + (-0.5)(0.5) + (0.5)(1.5) = 1.25
        // r(1) = 1.25 / 4 / 1.25 = 0.25
        assert_eq!(acf_at(&series, 1).unwrap(), 0.25);
        // lag 2 sum = (-1.5)(0.5) + (-0.5)(1.5) = -1.5 → -0.3
        assert_eq!(acf_at(&series, 2).unwrap(), -0.3);
    }

    #[test]
    fn test_rounding_to_three_decimals() {
        let series = [0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        for c in acf(&series) {
            assert_eq!((c * 1000.0).round_ties_even() / 1000.0, c);
        }
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        // mean 0.25, so every term is a dyadic fraction and r(1) is exactly 0.0625
        let mut series = vec![0.0; 10];
        series.extend([1.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        assert_eq!(acf_at(&series, 1).unwrap(), 0.062);
        assert_eq!(acf(&series)[0], 0.062);
    }

    #[test]
    fn test_lag_zero_rejected() {
        assert_eq!(acf_at(&[1.0, 0.0], 0), Err(StatsError::InvalidLag(0)));
    }

    #[test]
    fn test_column_acf_on_hashed_integers() {
        let rows: Vec<_> = (0..2000u64)
            .map(|i| hash_to_bits(&InputValue::from(i)).unwrap())
            .collect();
        let m = SampleMatrix::from_rows(&rows);
        let coeffs = column_acf(&m, 1).unwrap();
        assert_eq!(coeffs.len(), 256);
        // |r| for white noise is about 1/sqrt(N) ≈ 0.022
        for c in coeffs {
            assert!(c.abs() < 0.15, "lag-1 autocorrelation {} too large", c);
        }
        assert!(column_acf(&m, 0).is_err());
    }
}
