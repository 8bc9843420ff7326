//! Per-bit point and interval estimates.

use serde::{Deserialize, Serialize};

use crate::{SampleMatrix, StatsError};

/// Mean and standard error of one bit position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitStat {
    pub index: usize,
    pub mean: f64,
    /// Population standard deviation / sqrt(N).
    pub std_err: f64,
}

impl BitStat {
    /// `(mean - c·SE, mean + c·SE)`.
    pub fn band(&self, c: f64) -> (f64, f64) {
        (self.mean - c * self.std_err, self.mean + c * self.std_err)
    }

    /// Whether the band at critical value `c` contains `p`.
    pub fn covers(&self, p: f64, c: f64) -> bool {
        let (lo, hi) = self.band(c);
        lo <= p && p <= hi
    }
}

/// Mean and standard error for every column of the matrix.
///
/// An empty matrix yields NaN means.
pub fn per_bit_stats(matrix: &SampleMatrix) -> Vec<BitStat> {
    let n = matrix.n_rows() as f64;
    (0..matrix.n_cols())
        .map(|index| {
            let mean = matrix.column_ones(index) as f64 / n;
            // For 0/1 data the population variance is p(1-p).
            let variance = mean * (1.0 - mean);
            BitStat {
                index,
                mean,
                std_err: variance.max(0.0).sqrt() / n.sqrt(),
            }
        })
        .collect()
}

/// How the per-bit means sit against the fair-coin hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSummary {
    pub critical_z: f64,
    pub expected: f64,
    /// Average of the per-bit means.
    pub grand_mean: f64,
    pub min_mean: f64,
    pub max_mean: f64,
    /// Bit positions whose band excludes `expected`.
    pub outside_band: Vec<usize>,
}

impl BandSummary {
    pub fn from_stats(stats: &[BitStat], expected: f64, critical_z: f64) -> Self {
        let means: Vec<f64> = stats.iter().map(|s| s.mean).collect();
        let grand_mean = if means.is_empty() {
            f64::NAN
        } else {
            means.iter().sum::<f64>() / means.len() as f64
        };
        BandSummary {
            critical_z,
            expected,
            grand_mean,
            min_mean: means.iter().copied().fold(f64::INFINITY, f64::min),
            max_mean: means.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            outside_band: stats
                .iter()
                .filter(|s| !s.covers(expected, critical_z))
                .map(|s| s.index)
                .collect(),
        }
    }
}

/// Pearson correlation coefficient between two equal-length series.
///
/// NaN when either series is constant.
pub fn pearson_r(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::ShapeMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    Ok(cov / (var_x * var_y).sqrt())
}
