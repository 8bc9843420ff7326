//! Randomness statistics over the output bits of Keccak-256.
//!
//! Given an N×256 [`SampleMatrix`] of digest bits, this crate measures:
//! - per-bit mean and standard error, with a `±c·SE` confidence band
//! - lag-h autocorrelation of each bit position across the sample order
//! - pairwise association (Rogers–Tanimoto, phi correlation, Sokal–Michener)
//!   between every pair of bit positions
//!
//! [`experiment`] ties these together per input family and [`report`]
//! renders the results as console tables, JSON and SVG charts.

pub mod association;
pub mod autocorr;
pub mod experiment;
pub mod histogram;
pub mod report;
pub mod stats;

pub use keccak_core::{Family, HashError, SampleMatrix};

pub use association::{
    correlation, pairwise_all, rogers_tanimoto, sokal_michener, Contingency, PairwiseStat,
};
pub use autocorr::{acf, acf_at, column_acf, ACF_MAX_LAG};
pub use experiment::{run_experiment, ExperimentConfig, ExperimentReport};
pub use histogram::Histogram;
pub use report::ReportError;
pub use stats::{pearson_r, per_bit_stats, BandSummary, BitStat};

/// Two-sided normal critical value (~99.98%) used for the per-bit band.
pub const CRITICAL_Z: f64 = 3.725;

/// Expected probability of a set bit under the uniform hypothesis.
pub const FAIR_P: f64 = 0.5;

/// Errors from the statistics engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("shape mismatch: vectors of length {left} and {right}")]
    ShapeMismatch { left: usize, right: usize },

    #[error("degenerate column: correlation denominator is zero")]
    DegenerateColumn,

    #[error("invalid autocorrelation lag {0}, lags start at 1")]
    InvalidLag(usize),
}

/// Any failure that aborts an experiment.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("hashing failed: {0}")]
    Hash(#[from] HashError),

    #[error("statistics failed: {0}")]
    Stats(#[from] StatsError),

    #[error("report failed: {0}")]
    Report(#[from] ReportError),

    #[error("invalid experiment configuration: {0}")]
    Config(String),
}
