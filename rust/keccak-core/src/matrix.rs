//! N×256 sample matrix of digest bits and packed bit columns.

use crate::{BitVector, DIGEST_BITS};

/// Rows of digest bits, stored row-major with 256 columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMatrix {
    rows: usize,
    bits: Vec<u8>,
}

impl SampleMatrix {
    pub fn from_rows(rows: &[BitVector]) -> Self {
        let mut bits = Vec::with_capacity(rows.len() * DIGEST_BITS);
        for row in rows {
            bits.extend_from_slice(row.as_slice());
        }
        SampleMatrix {
            rows: rows.len(),
            bits,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        DIGEST_BITS
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= DIGEST_BITS {
            return None;
        }
        Some(self.bits[row * DIGEST_BITS + col])
    }

    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.rows {
            return None;
        }
        Some(&self.bits[row * DIGEST_BITS..(row + 1) * DIGEST_BITS])
    }

    /// Column `col` as a sequence of 0/1 values in row order.
    ///
    /// Panics if `col >= 256`.
    pub fn column(&self, col: usize) -> Vec<u8> {
        assert!(col < DIGEST_BITS, "column {} out of range", col);
        self.bits
            .chunks_exact(DIGEST_BITS)
            .map(|row| row[col])
            .collect()
    }

    /// Column `col` as `f64` values, the form the series statistics consume.
    ///
    /// Panics if `col >= 256`.
    pub fn column_f64(&self, col: usize) -> Vec<f64> {
        self.column(col).into_iter().map(f64::from).collect()
    }

    /// Number of ones in column `col`.
    ///
    /// Panics if `col >= 256`.
    pub fn column_ones(&self, col: usize) -> usize {
        assert!(col < DIGEST_BITS, "column {} out of range", col);
        self.bits
            .chunks_exact(DIGEST_BITS)
            .filter(|row| row[col] == 1)
            .count()
    }

    /// Column `col` packed 64 rows per word.
    ///
    /// Panics if `col >= 256`.
    pub fn column_packed(&self, col: usize) -> BitColumn {
        BitColumn::from_bits(&self.column(col))
    }

    /// Every column packed, in column order.
    pub fn columns_packed(&self) -> Vec<BitColumn> {
        let words = self.rows.div_ceil(64);
        let mut columns: Vec<BitColumn> = (0..DIGEST_BITS)
            .map(|_| BitColumn {
                len: self.rows,
                words: vec![0u64; words],
            })
            .collect();

        for (r, row) in self.bits.chunks_exact(DIGEST_BITS).enumerate() {
            let (w, shift) = (r / 64, r % 64);
            for (c, &bit) in row.iter().enumerate() {
                columns[c].words[w] |= u64::from(bit & 1) << shift;
            }
        }
        columns
    }
}

/// A binary vector packed into `u64` words. Bit `i` lives at
/// `words[i / 64] >> (i % 64)`; bits past `len` are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitColumn {
    len: usize,
    words: Vec<u64>,
}

impl BitColumn {
    /// Pack a slice of bits; any non-zero value counts as 1.
    pub fn from_bits(bits: &[u8]) -> Self {
        let mut words = vec![0u64; bits.len().div_ceil(64)];
        for (i, &b) in bits.iter().enumerate() {
            if b != 0 {
                words[i / 64] |= 1u64 << (i % 64);
            }
        }
        BitColumn {
            len: bits.len(),
            words,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.words[index / 64] >> (index % 64)) & 1 == 1)
    }

    pub fn ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Positions set in both columns. Callers check lengths first.
    pub fn and_count(&self, other: &BitColumn) -> u64 {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones() as u64)
            .sum()
    }

    /// Positions where the columns differ. Callers check lengths first.
    pub fn xor_count(&self, other: &BitColumn) -> u64 {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones() as u64)
            .sum()
    }

    /// Bitwise complement within `len`.
    pub fn complement(&self) -> BitColumn {
        let mut words: Vec<u64> = self.words.iter().map(|w| !w).collect();
        let tail = self.len % 64;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
        BitColumn {
            len: self.len,
            words,
        }
    }
}
