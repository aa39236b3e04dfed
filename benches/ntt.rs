use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use bigradix::NttContext;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");
    let seed: [u8; 32] = [0; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for log_n in 10..17 {
        let n: usize = 1 << log_n;
        let ctx: NttContext = NttContext::new(n).unwrap();
        let mut values: Vec<u64> = (0..n).map(|_| rng.random_range(0..ctx.modulus())).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &(), |bench, _| {
            bench.iter(|| ctx.forward(&mut values).unwrap())
        });
    }
    group.finish();
}

fn bench_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverse");
    let seed: [u8; 32] = [1; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for log_n in 10..17 {
        let n: usize = 1 << log_n;
        let ctx: NttContext = NttContext::new(n).unwrap();
        let mut values: Vec<u64> = (0..n).map(|_| rng.random_range(0..ctx.modulus())).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &(), |bench, _| {
            bench.iter(|| ctx.inverse(&mut values).unwrap())
        });
    }
    group.finish();
}

fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");
    let seed: [u8; 32] = [2; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for log_n in [8usize, 10, 12, 14] {
        let n: usize = 1 << log_n;
        let ctx: NttContext = NttContext::new(n).unwrap();
        let bound: u64 = {
            let mut b: u64 = 1;
            while (n as u128) * ((b + 1) as u128) * ((b + 1) as u128) < (ctx.modulus() as u128) {
                b += 1;
            }
            b
        };
        let a: Vec<u64> = (0..n / 2).map(|_| rng.random_range(0..=bound)).collect();
        let b: Vec<u64> = (0..n / 2).map(|_| rng.random_range(0..=bound)).collect();
        let mut out: Vec<u64> = vec![0; n];
        group.bench_with_input(BenchmarkId::from_parameter(n), &(), |bench, _| {
            bench.iter(|| ctx.convolve(&a, &b, &mut out).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_forward, bench_inverse, bench_convolve);
criterion_main!(benches);
