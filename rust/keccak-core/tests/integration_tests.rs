//! Integration tests for hashing, bit extraction and sampling.

use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use keccak_core::sampler::offset_base;
use keccak_core::{
    hash, hash_to_bits, sample_matrix, to_bits, Digest, Family, HashError, InputValue,
};

/// A uniformly random value in [0, 2^256).
fn random_uint256(rng: &mut impl Rng) -> BigUint {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes[..]);
    BigUint::from_bytes_be(&bytes)
}

#[test]
fn test_random_uint256_bits_are_well_formed() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let value = InputValue::Uint(random_uint256(&mut rng));
        let bits = hash_to_bits(&value).unwrap();
        assert_eq!(bits.len(), 256);
        assert!(bits.as_slice().iter().all(|&b| b == 0 || b == 1));
    }
}

#[test]
fn test_hex_and_bits_agree() {
    let digest = hash(&InputValue::from("Transaction Number: 42")).unwrap();
    let hex_digest = digest.to_hex();
    assert_eq!(hex_digest.len(), 64);
    assert_eq!(hex_digest, hex_digest.to_lowercase());

    let bits = to_bits(&hex_digest).unwrap();
    assert_eq!(bits, digest.to_bits());

    // The first nibble read back from the bits matches the first hex char.
    let nibble = bits.as_slice()[..4]
        .iter()
        .fold(0u32, |acc, &b| (acc << 1) | u32::from(b));
    let expected = hex_digest.chars().next().unwrap().to_digit(16).unwrap();
    assert_eq!(nibble, expected);
}

#[test]
fn test_offset_family_hashes_differ_from_plain() {
    let plain = hash(&InputValue::from(0u64)).unwrap();
    let offset = hash(&InputValue::Uint(offset_base())).unwrap();
    assert_ne!(plain, offset);
}

#[test]
fn test_digest_parse_errors_are_malformed() {
    let too_long = "f".repeat(65);
    for bad in ["", "0x", "zz", too_long.as_str()] {
        assert!(matches!(
            bad.parse::<Digest>(),
            Err(HashError::MalformedDigest { .. })
        ));
    }
}

#[test]
fn test_sample_matrix_every_family() {
    let mut rng = StdRng::seed_from_u64(77);
    for family in [
        Family::Integers,
        Family::OffsetIntegers,
        Family::LabelledIntegers,
        Family::LabelledOffsetIntegers,
        Family::RandomAscii { max_len: 7 },
        Family::RandomAscii { max_len: 32 },
    ] {
        let m = sample_matrix(family, 100, &mut rng).unwrap();
        assert_eq!(m.n_rows(), 100);
        for r in 0..100 {
            assert_eq!(m.row(r).unwrap().len(), 256);
        }
    }
}

#[test]
fn test_sample_matrix_rejects_bad_family() {
    let mut rng = StdRng::seed_from_u64(1);
    let err = sample_matrix(Family::RandomAscii { max_len: 1 }, 10, &mut rng).unwrap_err();
    assert!(matches!(err, HashError::InvalidFamily(_)));
}
