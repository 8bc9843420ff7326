//! Shared types and utilities for Keccak-256 randomness experiments.
//!
//! Inputs are hashed the way Solidity's `keccak256(abi.encodePacked(..))`
//! hashes a single `uint256` or `string` argument, and each digest is
//! expanded into its 256 bits, most significant bit first.

pub mod matrix;
pub mod sampler;

use num_bigint::{BigInt, BigUint, Sign};
use sha3::{Digest as _, Keccak256};
use std::fmt;
use std::str::FromStr;

pub use matrix::{BitColumn, SampleMatrix};
pub use sampler::{sample_matrix, Family, Inputs};

/// Width of a Keccak-256 digest in bits.
pub const DIGEST_BITS: usize = 256;

/// Width of a Keccak-256 digest in bytes.
pub const DIGEST_BYTES: usize = 32;

/// Errors raised while encoding, hashing or expanding inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    #[error("invalid input: {0}")]
    InvalidInputKind(String),

    #[error("malformed digest {input:?}: {reason}")]
    MalformedDigest { input: String, reason: String },

    #[error("invalid sample family: {0}")]
    InvalidFamily(String),
}

/// A value fed to the hasher: a `uint256` word or a UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputValue {
    Uint(BigUint),
    Text(String),
}

impl InputValue {
    /// Build an integer input from a signed value, rejecting negatives.
    pub fn from_signed(value: BigInt) -> Result<Self, HashError> {
        match value.sign() {
            Sign::Minus => Err(HashError::InvalidInputKind(format!(
                "negative integer {} cannot be encoded as uint256",
                value
            ))),
            _ => Ok(InputValue::Uint(value.magnitude().clone())),
        }
    }

    /// Pre-hash encoding: 32 big-endian bytes for integers, raw UTF-8 for strings.
    pub fn encode(&self) -> Result<Vec<u8>, HashError> {
        match self {
            InputValue::Uint(n) => {
                if n.bits() > DIGEST_BITS as u64 {
                    return Err(HashError::InvalidInputKind(format!(
                        "integer needs {} bits, uint256 holds at most {}",
                        n.bits(),
                        DIGEST_BITS
                    )));
                }
                let bytes = n.to_bytes_be();
                let mut word = vec![0u8; DIGEST_BYTES];
                word[DIGEST_BYTES - bytes.len()..].copy_from_slice(&bytes);
                Ok(word)
            }
            InputValue::Text(s) => Ok(s.as_bytes().to_vec()),
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Uint(n) => write!(f, "{}", n),
            InputValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<u64> for InputValue {
    fn from(value: u64) -> Self {
        InputValue::Uint(BigUint::from(value))
    }
}

impl From<BigUint> for InputValue {
    fn from(value: BigUint) -> Self {
        InputValue::Uint(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Text(value)
    }
}

/// A 256-bit Keccak digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_BYTES]);

impl Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_BYTES]) -> Self {
        Digest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_BYTES] {
        &self.0
    }

    /// 64 lowercase hex characters, no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse 64 hex characters, optionally prefixed with `0x`.
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != 2 * DIGEST_BYTES {
            return Err(HashError::MalformedDigest {
                input: s.to_string(),
                reason: format!(
                    "expected {} hex characters, found {}",
                    2 * DIGEST_BYTES,
                    digits.len()
                ),
            });
        }

        let mut bytes = [0u8; DIGEST_BYTES];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| HashError::MalformedDigest {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Digest(bytes))
    }

    /// Expand into 256 bits, bit 0 = most significant bit of byte 0.
    pub fn to_bits(&self) -> BitVector {
        let mut bits = [0u8; DIGEST_BITS];
        for (byte_idx, &byte) in self.0.iter().enumerate() {
            for k in 0..8 {
                bits[byte_idx * 8 + k] = (byte >> (7 - k)) & 1;
            }
        }
        BitVector(bits)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::from_hex(s)
    }
}

/// The 256 bits of a digest as 0/1 values.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitVector([u8; DIGEST_BITS]);

impl BitVector {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        DIGEST_BITS
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Number of set bits.
    pub fn ones(&self) -> usize {
        self.0.iter().filter(|&&b| b == 1).count()
    }

    /// Pack the bits back into the digest they came from.
    pub fn to_digest(&self) -> Digest {
        let mut bytes = [0u8; DIGEST_BYTES];
        for (i, chunk) in self.0.chunks(8).enumerate() {
            bytes[i] = chunk.iter().fold(0u8, |acc, &b| (acc << 1) | b);
        }
        Digest(bytes)
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.0.iter().map(|&b| if b == 1 { '1' } else { '0' }).collect();
        write!(f, "BitVector({})", s)
    }
}

/// Keccak-256 of raw bytes (original Keccak padding, not FIPS-202 SHA3).
pub fn keccak256(bytes: &[u8]) -> Digest {
    let out = Keccak256::digest(bytes);
    let mut digest = [0u8; DIGEST_BYTES];
    digest.copy_from_slice(&out);
    Digest(digest)
}

/// Hash an input with its `uint256` / `string` packed encoding.
pub fn hash(value: &InputValue) -> Result<Digest, HashError> {
    let encoded = value.encode()?;
    Ok(keccak256(&encoded))
}

/// Parse a hex digest and expand it into bits.
pub fn to_bits(hex_digest: &str) -> Result<BitVector, HashError> {
    Ok(Digest::from_hex(hex_digest)?.to_bits())
}

/// Hash an input and expand the digest into bits.
pub fn hash_to_bits(value: &InputValue) -> Result<BitVector, HashError> {
    Ok(hash(value)?.to_bits())
}
