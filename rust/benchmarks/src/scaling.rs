//! Scaling timings for every stage of the bit-randomness pipeline.
//!
//! For each input family and sample size N, measures hashing (sample
//! matrix), per-bit statistics, lag-1 autocorrelation and the full
//! pairwise sweep, to show how each stage grows with N.

use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use bit_randomness::{column_acf, pairwise_all, per_bit_stats};
use keccak_core::{hash, sample_matrix, Family, InputValue};

const SAMPLE_SIZES: [usize; 4] = [1_000, 2_500, 5_000, 10_000];

fn time<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

fn main() {
    println!("================================================================");
    println!("  SCALING: Keccak-256 bit randomness pipeline");
    println!("================================================================\n");

    let mut rng = StdRng::seed_from_u64(12345);

    bench_single_hash();

    for family in [
        Family::Integers,
        Family::OffsetIntegers,
        Family::LabelledIntegers,
        Family::LabelledOffsetIntegers,
        Family::RandomAscii { max_len: 7 },
        Family::RandomAscii { max_len: 32 },
    ] {
        bench_family(family, &mut rng);
    }
}

fn bench_single_hash() {
    println!("  Single hash latency (mean over 10000 calls):");
    let inputs = [
        ("uint256 small", InputValue::from(7u64)),
        ("uint256 2^255", InputValue::Uint(BigUint::from(1u32) << 255u32)),
        ("labelled", InputValue::from("Transaction Number: 9999")),
    ];
    for (name, input) in &inputs {
        let (_, elapsed) = time(|| {
            for _ in 0..10_000 {
                let _ = hash(input);
            }
        });
        println!("    {:<16} {:>8.0} ns", name, elapsed.as_nanos() as f64 / 10_000.0);
    }
    println!();
}

fn bench_family(family: Family, rng: &mut StdRng) {
    println!("  Family: {}", family);
    println!(
        "  {:>7} {:>10} {:>10} {:>10} {:>12} {:>8}",
        "N", "hash_ms", "mean_ms", "acf_ms", "pairwise_ms", "status"
    );
    println!("  {}", "-".repeat(62));

    for &n in &SAMPLE_SIZES {
        let (matrix, hash_t) = time(|| sample_matrix(family, n, rng));
        let matrix = match matrix {
            Ok(m) => m,
            Err(e) => {
                println!("  {:>7} {:>10} {:>10} {:>10} {:>12} {}", n, "-", "-", "-", "-", e);
                continue;
            }
        };

        let (_, mean_t) = time(|| per_bit_stats(&matrix));
        let (acf, acf_t) = time(|| column_acf(&matrix, 1));
        let (pairs, pair_t) = time(|| pairwise_all(&matrix));

        let status = if acf.is_ok() && pairs.is_ok() { "OK" } else { "FAIL" };
        println!(
            "  {:>7} {:>10.1} {:>10.2} {:>10.1} {:>12.1} {:>8}",
            n,
            hash_t.as_secs_f64() * 1e3,
            mean_t.as_secs_f64() * 1e3,
            acf_t.as_secs_f64() * 1e3,
            pair_t.as_secs_f64() * 1e3,
            status
        );
    }
    println!();
}
