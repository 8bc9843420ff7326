//! Input families for the randomness experiments.
//!
//! Four deterministic families walk a contiguous integer range (optionally
//! offset by 2^128 and/or embedded in a string); the fifth draws random
//! printable ASCII strings.

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;
use rayon::prelude::*;
use std::fmt;

use crate::{hash_to_bits, BitVector, HashError, InputValue, SampleMatrix};

/// Prefix of the labelled string families.
pub const TRANSACTION_PREFIX: &str = "Transaction Number: ";

/// Letters, then punctuation, then digits (94 printable characters).
pub const ASCII_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~0123456789";

/// Shift applied by the offset families.
pub const OFFSET_BITS: u32 = 128;

/// The base value 2^128 of the offset families.
pub fn offset_base() -> BigUint {
    BigUint::one() << OFFSET_BITS
}

/// Experiment input family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// 0, 1, ..., N-1 as uint256.
    Integers,
    /// 2^128, ..., 2^128 + N-1 as uint256.
    OffsetIntegers,
    /// "Transaction Number: i" for i in 0..N.
    LabelledIntegers,
    /// "Transaction Number: i" for i in 2^128..2^128+N.
    LabelledOffsetIntegers,
    /// Random strings over [`ASCII_ALPHABET`], length uniform in `[2, max_len)`.
    RandomAscii { max_len: usize },
}

impl Family {
    /// Stable identifier used in file names and on the command line.
    pub fn label(&self) -> String {
        match self {
            Family::Integers => "integers".to_string(),
            Family::OffsetIntegers => "offset-integers".to_string(),
            Family::LabelledIntegers => "labelled-integers".to_string(),
            Family::LabelledOffsetIntegers => "labelled-offset-integers".to_string(),
            Family::RandomAscii { max_len } => format!("ascii-{}", max_len),
        }
    }

    /// Parse a command-line label. `max_len` applies to `ascii` only.
    pub fn from_label(label: &str, max_len: usize) -> Result<Self, HashError> {
        let family = match label {
            "integers" => Family::Integers,
            "offset-integers" => Family::OffsetIntegers,
            "labelled-integers" => Family::LabelledIntegers,
            "labelled-offset-integers" => Family::LabelledOffsetIntegers,
            "ascii" => Family::RandomAscii { max_len },
            other => {
                if let Some(len) = other.strip_prefix("ascii-") {
                    let max_len = len.parse().map_err(|_| {
                        HashError::InvalidFamily(format!("bad ascii length in {:?}", other))
                    })?;
                    Family::RandomAscii { max_len }
                } else {
                    return Err(HashError::InvalidFamily(format!(
                        "unknown family {:?}",
                        other
                    )));
                }
            }
        };
        family.validate()?;
        Ok(family)
    }

    /// Whether consecutive inputs follow the natural integer order.
    pub fn is_ordered(&self) -> bool {
        matches!(self, Family::Integers | Family::OffsetIntegers)
    }

    pub fn validate(&self) -> Result<(), HashError> {
        match self {
            Family::RandomAscii { max_len } if *max_len <= 2 => Err(HashError::InvalidFamily(
                format!("ascii max_len must exceed 2, got {}", max_len),
            )),
            _ => Ok(()),
        }
    }

    /// The first `n` inputs of this family. Deterministic families ignore `rng`
    /// and yield the same sequence on every call.
    pub fn inputs<'a, R: Rng>(&self, n: usize, rng: &'a mut R) -> Result<Inputs<'a, R>, HashError> {
        self.validate()?;
        Ok(Inputs {
            family: *self,
            index: 0,
            n,
            base: offset_base(),
            rng,
        })
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Integers => write!(f, "integers 0..N"),
            Family::OffsetIntegers => write!(f, "integers 2^128 + (0..N)"),
            Family::LabelledIntegers => write!(f, "\"{}\" + (0..N)", TRANSACTION_PREFIX),
            Family::LabelledOffsetIntegers => {
                write!(f, "\"{}\" + (2^128 + (0..N))", TRANSACTION_PREFIX)
            }
            Family::RandomAscii { max_len } => {
                write!(f, "random ASCII strings, length in [2, {})", max_len)
            }
        }
    }
}

/// Lazy, finite iterator over a family's inputs.
pub struct Inputs<'a, R> {
    family: Family,
    index: usize,
    n: usize,
    base: BigUint,
    rng: &'a mut R,
}

impl<R: Rng> Iterator for Inputs<'_, R> {
    type Item = InputValue;

    fn next(&mut self) -> Option<InputValue> {
        if self.index >= self.n {
            return None;
        }
        let i = self.index;
        self.index += 1;

        let value = match self.family {
            Family::Integers => InputValue::Uint(BigUint::from(i)),
            Family::OffsetIntegers => InputValue::Uint(&self.base + BigUint::from(i)),
            Family::LabelledIntegers => InputValue::Text(format!("{}{}", TRANSACTION_PREFIX, i)),
            Family::LabelledOffsetIntegers => InputValue::Text(format!(
                "{}{}",
                TRANSACTION_PREFIX,
                &self.base + BigUint::from(i)
            )),
            Family::RandomAscii { max_len } => {
                InputValue::Text(random_ascii(max_len, &mut *self.rng))
            }
        };
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n - self.index;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for Inputs<'_, R> {}

/// A random string over [`ASCII_ALPHABET`] with length uniform in `[2, max_len)`.
///
/// Panics if `max_len <= 2`; [`Family::validate`] rejects that first.
pub fn random_ascii<R: Rng>(max_len: usize, rng: &mut R) -> String {
    let len = rng.gen_range(2..max_len);
    (0..len)
        .map(|_| ASCII_ALPHABET[rng.gen_range(0..ASCII_ALPHABET.len())] as char)
        .collect()
}

/// Hash the first `n` inputs of `family` into an N×256 sample matrix.
///
/// Inputs are drawn sequentially (so random families consume `rng` in order),
/// then hashed in parallel; row `i` always belongs to input `i`.
pub fn sample_matrix<R: Rng>(
    family: Family,
    n: usize,
    rng: &mut R,
) -> Result<SampleMatrix, HashError> {
    let inputs: Vec<InputValue> = family.inputs(n, rng)?.collect();
    let rows: Vec<BitVector> = inputs
        .par_iter()
        .map(hash_to_bits)
        .collect::<Result<_, _>>()?;
    Ok(SampleMatrix::from_rows(&rows))
}
