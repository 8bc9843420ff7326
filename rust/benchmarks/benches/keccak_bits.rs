use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bit_randomness::{acf, column_acf, pairwise_all, per_bit_stats};
use keccak_core::{hash, hash_to_bits, sample_matrix, Family, InputValue};

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("keccak256");

    let inputs = [
        ("uint256", InputValue::from(123_456_789u64)),
        ("labelled", InputValue::from("Transaction Number: 123456789")),
        ("ascii-32", InputValue::from("k#9Qz!T0p^m2@Lx&w7Rb*c4Vn$e8Yd")),
    ];
    for (name, input) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, v| {
            b.iter(|| hash(v));
        });
    }

    group.finish();
}

fn bench_bits(c: &mut Criterion) {
    let digest = hash(&InputValue::from(0u64)).unwrap();
    let hex_digest = digest.to_hex();

    c.bench_function("digest_to_bits", |b| b.iter(|| digest.to_bits()));
    c.bench_function("hex_to_bits", |b| b.iter(|| keccak_core::to_bits(&hex_digest)));
    c.bench_function("hash_to_bits", |b| {
        b.iter(|| hash_to_bits(&InputValue::from(42u64)))
    });
}

fn bench_sample_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_matrix");
    group.sample_size(10);

    for n in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| sample_matrix(Family::Integers, n, &mut rng));
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");
    group.sample_size(10);
    let mut rng = StdRng::seed_from_u64(2);

    for n in [1_000usize, 10_000] {
        let matrix = sample_matrix(Family::Integers, n, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("per_bit", n), &matrix, |b, m| {
            b.iter(|| per_bit_stats(m));
        });
        group.bench_with_input(BenchmarkId::new("column_acf", n), &matrix, |b, m| {
            b.iter(|| column_acf(m, 1));
        });
        group.bench_with_input(BenchmarkId::new("pairwise_all", n), &matrix, |b, m| {
            b.iter(|| pairwise_all(m));
        });

        let series = matrix.column_f64(0);
        group.bench_with_input(BenchmarkId::new("acf_30_lags", n), &series, |b, s| {
            b.iter(|| acf(s));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hash,
    bench_bits,
    bench_sample_matrix,
    bench_statistics,
);

criterion_main!(benches);
