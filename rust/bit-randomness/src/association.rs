//! Binary association coefficients between bit positions.
//!
//! Every coefficient is derived from the 2×2 contingency table of two
//! equal-length binary vectors x1, x2:
//!
//! | | x2 = 1 | x2 = 0 |
//! |-|--------|--------|
//! | x1 = 1 | S11 | S10 |
//! | x1 = 0 | S01 | S00 |
//!
//! Counts come from popcounts over packed [`BitColumn`]s.

use keccak_core::{BitColumn, DIGEST_BITS};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{SampleMatrix, StatsError};

/// 2×2 contingency table of two binary vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contingency {
    pub s11: u64,
    pub s10: u64,
    pub s01: u64,
    pub s00: u64,
}

impl Contingency {
    pub fn between(x1: &BitColumn, x2: &BitColumn) -> Result<Self, StatsError> {
        if x1.len() != x2.len() {
            return Err(StatsError::ShapeMismatch {
                left: x1.len(),
                right: x2.len(),
            });
        }
        let s11 = x1.and_count(x2);
        let s10 = x1.ones() - s11;
        let s01 = x2.ones() - s11;
        let s00 = x1.len() as u64 - s11 - s10 - s01;
        Ok(Contingency { s11, s10, s01, s00 })
    }

    /// Same as [`Contingency::between`] for unpacked 0/1 slices.
    pub fn from_bits(x1: &[u8], x2: &[u8]) -> Result<Self, StatsError> {
        Contingency::between(&BitColumn::from_bits(x1), &BitColumn::from_bits(x2))
    }

    pub fn len(&self) -> u64 {
        self.s11 + self.s10 + self.s01 + self.s00
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn agreements(&self) -> u64 {
        self.s11 + self.s00
    }

    pub fn disagreements(&self) -> u64 {
        self.s10 + self.s01
    }

    /// Matches over length plus mismatches: (S11+S00) / (n + S10+S01).
    pub fn rogers_tanimoto(&self) -> f64 {
        self.agreements() as f64 / (self.len() + self.disagreements()) as f64
    }

    /// Phi coefficient with denominator
    /// sqrt((S10+S11)(S01+S00)) · sqrt((S11+S01)(S00+S10)).
    pub fn correlation(&self) -> Result<f64, StatsError> {
        let (s11, s10, s01, s00) = (
            self.s11 as f64,
            self.s10 as f64,
            self.s01 as f64,
            self.s00 as f64,
        );
        let sigma = ((s10 + s11) * (s01 + s00)).sqrt() * ((s11 + s01) * (s00 + s10)).sqrt();
        if sigma == 0.0 {
            return Err(StatsError::DegenerateColumn);
        }
        Ok((s11 * s00 - s10 * s01) / sigma)
    }

    /// Fraction of matching positions: (S11+S00) / n.
    pub fn sokal_michener(&self) -> f64 {
        self.agreements() as f64 / self.len() as f64
    }
}

pub fn rogers_tanimoto(x1: &BitColumn, x2: &BitColumn) -> Result<f64, StatsError> {
    Ok(Contingency::between(x1, x2)?.rogers_tanimoto())
}

pub fn correlation(x1: &BitColumn, x2: &BitColumn) -> Result<f64, StatsError> {
    Contingency::between(x1, x2)?.correlation()
}

pub fn sokal_michener(x1: &BitColumn, x2: &BitColumn) -> Result<f64, StatsError> {
    Ok(Contingency::between(x1, x2)?.sokal_michener())
}

/// Association scores for bit positions `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseStat {
    pub i: usize,
    pub j: usize,
    pub rogers_tanimoto: f64,
    pub correlation: f64,
    pub sokal_michener: f64,
}

/// Number of unordered pairs of bit positions.
pub const PAIR_COUNT: usize = DIGEST_BITS * (DIGEST_BITS - 1) / 2;

/// Every unordered pair of columns, ordered by `(i, j)`.
///
/// Fails on the first constant column (`DegenerateColumn`).
pub fn pairwise_all(matrix: &SampleMatrix) -> Result<Vec<PairwiseStat>, StatsError> {
    let columns = matrix.columns_packed();
    let n_cols = columns.len();
    let pairs: Vec<(usize, usize)> = (0..n_cols)
        .flat_map(|i| (i + 1..n_cols).map(move |j| (i, j)))
        .collect();

    pairs
        .par_iter()
        .map(|&(i, j)| {
            let table = Contingency::between(&columns[i], &columns[j])?;
            Ok(PairwiseStat {
                i,
                j,
                rogers_tanimoto: table.rogers_tanimoto(),
                correlation: table.correlation()?,
                sokal_michener: table.sokal_michener(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use keccak_core::{hash_to_bits, InputValue};

    fn col(bits: &[u8]) -> BitColumn {
        BitColumn::from_bits(bits)
    }

    #[test]
    fn test_contingency_counts() {
        let t = Contingency::from_bits(&[1, 1, 0, 0, 1, 0], &[1, 0, 1, 0, 1, 0]).unwrap();
        assert_eq!(
            t,
            Contingency {
                s11: 2,
                s10: 1,
                s01: 1,
                s00: 2
            }
        );
        assert_eq!(t.len(), 6);
        assert_eq!(t.agreements(), 4);
        assert_eq!(t.disagreements(), 2);
    }

    #[test]
    fn test_known_values() {
        let t = Contingency {
            s11: 2,
            s10: 1,
            s01: 1,
            s00: 2,
        };
        // 4 / (6 + 2)
        assert_eq!(t.rogers_tanimoto(), 0.5);
        // (4 - 1) / (sqrt(3*3) * sqrt(3*3)) = 3/9
        assert!((t.correlation().unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((t.sokal_michener() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_self_association() {
        let x = col(&[1, 0, 0, 1, 1, 0, 1, 1, 0, 0]);
        assert_eq!(sokal_michener(&x, &x).unwrap(), 1.0);
        assert_eq!(rogers_tanimoto(&x, &x).unwrap(), 1.0);
        assert!((correlation(&x, &x).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_complement_association() {
        let x = col(&[1, 0, 0, 1, 1, 0, 1, 1, 0, 0, 1]);
        let not_x = x.complement();
        assert_eq!(rogers_tanimoto(&x, &not_x).unwrap(), 0.0);
        assert_eq!(sokal_michener(&x, &not_x).unwrap(), 0.0);
        assert!((correlation(&x, &not_x).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let x = col(&[1, 1, 0, 1, 0, 0, 1, 0, 1, 1, 1, 0]);
        let y = col(&[0, 1, 1, 1, 0, 1, 0, 0, 1, 0, 1, 1]);
        assert_eq!(rogers_tanimoto(&x, &y), rogers_tanimoto(&y, &x));
        assert_eq!(correlation(&x, &y), correlation(&y, &x));
        assert_eq!(sokal_michener(&x, &y), sokal_michener(&y, &x));
    }

    #[test]
    fn test_shape_mismatch() {
        let x = col(&[1, 0, 1]);
        let y = col(&[1, 0]);
        let expected = Err(StatsError::ShapeMismatch { left: 3, right: 2 });
        assert_eq!(rogers_tanimoto(&x, &y), expected);
        assert_eq!(correlation(&x, &y), expected);
        assert_eq!(sokal_michener(&x, &y), expected);
    }

    #[test]
    fn test_degenerate_column() {
        let constant = col(&[0, 0, 0, 0]);
        let x = col(&[1, 0, 1, 0]);
        assert_eq!(correlation(&constant, &x), Err(StatsError::DegenerateColumn));
        // the other two coefficients stay defined
        assert_eq!(sokal_michener(&constant, &x).unwrap(), 0.5);
    }

    #[test]
    fn test_pairwise_all_order_and_count() {
        let rows: Vec<_> = (0..256u64)
            .map(|i| hash_to_bits(&InputValue::from(i)).unwrap())
            .collect();
        let m = SampleMatrix::from_rows(&rows);
        let pairs = pairwise_all(&m).unwrap();
        assert_eq!(pairs.len(), PAIR_COUNT);
        assert_eq!(PAIR_COUNT, 32_640);
        assert_eq!((pairs[0].i, pairs[0].j), (0, 1));
        assert_eq!((pairs[255].i, pairs[255].j), (1, 2));
        let last = pairs.last().unwrap();
        assert_eq!((last.i, last.j), (254, 255));

        let p = pairs.iter().find(|p| p.i == 3 && p.j == 77).unwrap();
        let direct = Contingency::between(&m.column_packed(3), &m.column_packed(77)).unwrap();
        assert_eq!(p.sokal_michener, direct.sokal_michener());
        for p in &pairs {
            assert!((0.0..=1.0).contains(&p.rogers_tanimoto));
            assert!((0.0..=1.0).contains(&p.sokal_michener));
            assert!((-1.0..=1.0).contains(&p.correlation));
        }
    }

    #[test]
    fn test_pairwise_all_fails_on_constant_column() {
        let zeros = keccak_core::to_bits(&"0".repeat(64)).unwrap();
        let m = SampleMatrix::from_rows(&[zeros, zeros, zeros]);
        assert_eq!(pairwise_all(&m), Err(StatsError::DegenerateColumn));
    }
}
