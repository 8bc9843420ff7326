//! Equal-width histograms of the pairwise coefficients.

use serde::{Deserialize, Serialize};

/// Bins used for the pairwise-statistic histograms.
pub const DEFAULT_BINS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin the finite values into `bins` equal-width bins spanning their range.
    ///
    /// The right edge is closed, so the maximum lands in the last bin. When
    /// every value is equal the range is widened to `[v - 0.5, v + 0.5]`.
    /// Returns None without finite values or with zero bins.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }
        let bin_width = (max - min) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - min) / bin_width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram {
            min,
            max,
            bin_width,
            counts,
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Left edge of bin `i`.
    pub fn bin_start(&self, i: usize) -> f64 {
        self.min + i as f64 * self.bin_width
    }

    /// `(left edge, count)` for every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (self.bin_start(i), c))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
