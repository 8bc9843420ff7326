//! Experiment orchestration: sample a family, hash, and run every statistic.
//!
//! Reference suite (N = 10000):
//!   1.1  integers 0..N                       (+ autocorrelation, + pairwise)
//!   1.2  integers 2^128 + (0..N)             (+ autocorrelation)
//!   2.1  "Transaction Number: " + (0..N)
//!   2.2  "Transaction Number: " + (2^128 + (0..N))
//!   3.1  random ASCII strings, length < 7
//!   3.2  random ASCII strings, length < 32

use std::time::Instant;

use keccak_core::sample_matrix;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::association::{pairwise_all, PairwiseStat};
use crate::autocorr::column_acf;
use crate::histogram::{Histogram, DEFAULT_BINS};
use crate::stats::{per_bit_stats, BandSummary, BitStat};
use crate::{Family, StudyError, CRITICAL_Z, FAIR_P};

/// Sample size of the reference experiments.
pub const DEFAULT_SAMPLES: usize = 10_000;

/// Sample size of the quick smoke-test suite.
pub const QUICK_SAMPLES: usize = 1_000;

/// One experiment block.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Short identifier such as "1.1".
    pub id: String,
    pub family: Family,
    pub n: usize,
    /// Autocorrelation lag to report per column; None skips it.
    pub acf_lag: Option<usize>,
    /// Whether to compute all 32,640 pairwise coefficients.
    pub pairwise: bool,
}

impl ExperimentConfig {
    pub fn new(id: &str, family: Family, n: usize) -> Self {
        ExperimentConfig {
            id: id.to_string(),
            family,
            n,
            acf_lag: None,
            pairwise: false,
        }
    }

    pub fn with_acf(mut self, lag: usize) -> Self {
        self.acf_lag = Some(lag);
        self
    }

    pub fn with_pairwise(mut self) -> Self {
        self.pairwise = true;
        self
    }

    /// `<id>_<family label>`, used for output file names.
    pub fn slug(&self) -> String {
        format!("{}_{}", self.id.replace('.', "_"), self.family.label())
    }

    pub fn validate(&self) -> Result<(), StudyError> {
        if self.n < 2 {
            return Err(StudyError::Config(format!(
                "experiment {} needs at least 2 samples, got {}",
                self.id, self.n
            )));
        }
        if self.acf_lag == Some(0) {
            return Err(StudyError::Config(format!(
                "experiment {}: autocorrelation lags start at 1",
                self.id
            )));
        }
        self.family.validate()?;
        Ok(())
    }
}

/// The six experiments of the reference study.
pub fn reference_suite(n: usize, lag: usize) -> Vec<ExperimentConfig> {
    vec![
        ExperimentConfig::new("1.1", Family::Integers, n)
            .with_acf(lag)
            .with_pairwise(),
        ExperimentConfig::new("1.2", Family::OffsetIntegers, n).with_acf(lag),
        ExperimentConfig::new("2.1", Family::LabelledIntegers, n),
        ExperimentConfig::new("2.2", Family::LabelledOffsetIntegers, n),
        ExperimentConfig::new("3.1", Family::RandomAscii { max_len: 7 }, n),
        ExperimentConfig::new("3.2", Family::RandomAscii { max_len: 32 }, n),
    ]
}

/// Reduced suite for smoke testing: small N, pairwise only on 1.1.
pub fn quick_suite() -> Vec<ExperimentConfig> {
    reference_suite(QUICK_SAMPLES, 1)
}

/// Mean, spread and range of one pairwise coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSummary {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub histogram: Option<Histogram>,
}

impl CoefficientSummary {
    pub fn from_values(name: &str, values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        CoefficientSummary {
            name: name.to_string(),
            mean,
            std_dev: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            histogram: Histogram::from_values(values, DEFAULT_BINS),
        }
    }
}

/// Pairwise results: summaries are serialized, raw pairs are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseReport {
    pub pair_count: usize,
    pub rogers_tanimoto: CoefficientSummary,
    pub correlation: CoefficientSummary,
    pub sokal_michener: CoefficientSummary,
    #[serde(skip)]
    pub pairs: Vec<PairwiseStat>,
}

impl PairwiseReport {
    pub fn from_pairs(pairs: Vec<PairwiseStat>) -> Self {
        let rt: Vec<f64> = pairs.iter().map(|p| p.rogers_tanimoto).collect();
        let corr: Vec<f64> = pairs.iter().map(|p| p.correlation).collect();
        let sm: Vec<f64> = pairs.iter().map(|p| p.sokal_michener).collect();
        PairwiseReport {
            pair_count: pairs.len(),
            rogers_tanimoto: CoefficientSummary::from_values("Rogers-Tanimoto", &rt),
            correlation: CoefficientSummary::from_values("Correlation", &corr),
            sokal_michener: CoefficientSummary::from_values("Sokal-Michener", &sm),
            pairs,
        }
    }

    pub fn coefficients(&self) -> [&CoefficientSummary; 3] {
        [&self.rogers_tanimoto, &self.correlation, &self.sokal_michener]
    }
}

/// Everything measured for one experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub id: String,
    pub family: String,
    pub description: String,
    pub n: usize,
    pub bit_stats: Vec<BitStat>,
    pub band: BandSummary,
    pub acf_lag: Option<usize>,
    pub column_acf: Option<Vec<f64>>,
    pub pairwise: Option<PairwiseReport>,
    pub elapsed_secs: f64,
}

/// Run one experiment end to end. Random families draw from `rng`.
pub fn run_experiment<R: Rng>(
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<ExperimentReport, StudyError> {
    config.validate()?;
    let start = Instant::now();
    log::info!(
        "experiment {}: hashing {} inputs ({})",
        config.id,
        config.n,
        config.family
    );

    let matrix = sample_matrix(config.family, config.n, rng)?;
    log::debug!("experiment {}: sample matrix in {:?}", config.id, start.elapsed());

    let bit_stats = per_bit_stats(&matrix);
    let band = BandSummary::from_stats(&bit_stats, FAIR_P, CRITICAL_Z);

    let column_acf = match config.acf_lag {
        Some(lag) => {
            let t = Instant::now();
            let coeffs = column_acf(&matrix, lag)?;
            log::debug!("experiment {}: lag-{} acf in {:?}", config.id, lag, t.elapsed());
            Some(coeffs)
        }
        None => None,
    };

    let pairwise = if config.pairwise {
        let t = Instant::now();
        let pairs = pairwise_all(&matrix)?;
        log::debug!(
            "experiment {}: {} pairs in {:?}",
            config.id,
            pairs.len(),
            t.elapsed()
        );
        Some(PairwiseReport::from_pairs(pairs))
    } else {
        None
    };

    let elapsed_secs = start.elapsed().as_secs_f64();
    log::info!(
        "experiment {}: done in {:.2}s, {} of {} bits outside the band",
        config.id,
        elapsed_secs,
        band.outside_band.len(),
        bit_stats.len()
    );

    Ok(ExperimentReport {
        id: config.id.clone(),
        family: config.family.label(),
        description: config.family.to_string(),
        n: config.n,
        bit_stats,
        band,
        acf_lag: config.acf_lag,
        column_acf,
        pairwise,
        elapsed_secs,
    })
}
