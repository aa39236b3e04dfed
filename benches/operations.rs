use bigradix::{add, div_fractional, divmod, mul, Number};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigInt;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_decimal(rng: &mut ChaCha8Rng, digits: usize) -> Number {
    let s: String = (0..digits)
        .map(|i| {
            let lo: u8 = if i == 0 { 1 } else { 0 };
            char::from(b'0' + rng.random_range(lo..10u8))
        })
        .collect();
    Number::from_bigint(&BigInt::parse_bytes(s.as_bytes(), 10).unwrap(), 10).unwrap()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    let seed: [u8; 32] = [0; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for log_digits in [6usize, 8, 10, 12] {
        let digits: usize = 1 << log_digits;
        let a: Number = random_decimal(&mut rng, digits);
        let b: Number = random_decimal(&mut rng, digits);
        let mut out: Number = Number::new(10).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(digits), &(), |bench, _| {
            bench.iter(|| add(&mut out, &a, &b).unwrap())
        });
    }
    group.finish();
}

fn bench_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("mul");
    let seed: [u8; 32] = [1; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for log_digits in [4usize, 6, 8, 10] {
        let digits: usize = 1 << log_digits;
        let a: Number = random_decimal(&mut rng, digits);
        let b: Number = random_decimal(&mut rng, digits);
        let mut out: Number = Number::new(10).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(digits), &(), |bench, _| {
            bench.iter(|| mul(&mut out, &a, &b).unwrap())
        });
    }
    group.finish();
}

fn bench_divmod(c: &mut Criterion) {
    let mut group = c.benchmark_group("divmod");
    let seed: [u8; 32] = [2; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for log_digits in [4usize, 6, 8] {
        let digits: usize = 1 << log_digits;
        let a: Number = random_decimal(&mut rng, digits);
        let b: Number = random_decimal(&mut rng, digits / 2);
        let mut q: Number = Number::new(10).unwrap();
        let mut r: Number = Number::new(10).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(digits), &(), |bench, _| {
            bench.iter(|| divmod(&mut q, &mut r, &a, &b).unwrap())
        });
    }
    group.finish();
}

fn bench_div_fractional(c: &mut Criterion) {
    let mut group = c.benchmark_group("div_fractional");
    let seed: [u8; 32] = [3; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for precision in [16u32, 64, 256] {
        let a: Number = random_decimal(&mut rng, 32);
        let b: Number = random_decimal(&mut rng, 16);
        let mut out: Number = Number::new(10).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(precision), &(), |bench, _| {
            bench.iter(|| div_fractional(&mut out, &a, &b, precision).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add, bench_mul, bench_divmod, bench_div_fractional);
criterion_main!(benches);
