use bigradix::{mul, Error, Number, NttContext};
use num_bigint::BigInt;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn ntt() {
    sub_test("test_context_parameters", test_context_parameters);
    sub_test("test_forward_inverse_roundtrip", test_forward_inverse_roundtrip);
    sub_test("test_convolve_small", test_convolve_small);
    sub_test("test_convolve_matches_schoolbook", test_convolve_matches_schoolbook);
    sub_test("test_input_validation", test_input_validation);
    sub_test("test_mul_large_operands", test_mul_large_operands);
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn pow_mod(base: u64, mut exp: u64, p: u64) -> u64 {
    let mut acc: u64 = 1;
    let mut square: u64 = base % p;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = (acc as u128 * square as u128 % p as u128) as u64;
        }
        square = (square as u128 * square as u128 % p as u128) as u64;
        exp >>= 1;
    }
    acc
}

fn test_context_parameters() {
    for log_n in [1usize, 3, 6, 10] {
        let n: usize = 1 << log_n;
        let ctx: NttContext = NttContext::new(n).unwrap();
        assert_eq!(ctx.size(), n);
        let p: u64 = ctx.modulus();
        assert_eq!(p % n as u64, 1, "p = {} is not 1 mod {}", p, n);
        // the root has multiplicative order exactly n
        assert_eq!(pow_mod(ctx.root(), n as u64, p), 1);
        if n > 1 {
            assert_ne!(pow_mod(ctx.root(), n as u64 / 2, p), 1);
        }
    }
}

fn test_forward_inverse_roundtrip() {
    let n: usize = 1 << 10;
    let ctx: NttContext = NttContext::new(n).unwrap();
    let seed: [u8; 32] = [15; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    let original: Vec<u64> = (0..n).map(|_| rng.random_range(0..ctx.modulus())).collect();
    let mut values: Vec<u64> = original.clone();
    ctx.forward(&mut values).unwrap();
    assert_ne!(values, original);
    ctx.inverse(&mut values).unwrap();
    assert_eq!(values, original);
}

fn test_convolve_small() {
    let ctx: NttContext = NttContext::new(8).unwrap();
    let a: [u64; 4] = [1, 2, 3, 4];
    let b: [u64; 4] = [1, 1, 1, 1];
    let mut out: Vec<u64> = vec![0; 8];
    ctx.convolve(&a, &b, &mut out).unwrap();
    assert_eq!(out, vec![1, 3, 6, 10, 9, 7, 4, 0]);
}

fn test_convolve_matches_schoolbook() {
    let n: usize = 64;
    let ctx: NttContext = NttContext::new(n).unwrap();
    let p: u64 = ctx.modulus();
    let seed: [u8; 32] = [16; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    let len: usize = n / 2;
    let bound: u64 = {
        // keep n * max * max below p
        let mut b: u64 = 1;
        while (n as u128) * ((b + 1) as u128) * ((b + 1) as u128) < (p as u128) {
            b += 1;
        }
        b
    };
    let a: Vec<u64> = (0..len).map(|_| rng.random_range(0..=bound)).collect();
    let b: Vec<u64> = (0..len).map(|_| rng.random_range(0..=bound)).collect();
    let mut expected: Vec<u64> = vec![0; n];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            expected[i + j] += x * y;
        }
    }
    let mut out: Vec<u64> = vec![0; n];
    ctx.convolve(&a, &b, &mut out).unwrap();
    assert_eq!(out, expected);
}

fn test_input_validation() {
    assert!(matches!(NttContext::new(0), Err(Error::InvalidArgument(_))));
    assert!(matches!(NttContext::new(3), Err(Error::InvalidArgument(_))));

    let ctx: NttContext = NttContext::new(8).unwrap();
    let mut short: Vec<u64> = vec![0; 4];
    assert!(matches!(ctx.forward(&mut short), Err(Error::InvalidArgument(_))));

    let mut unreduced: Vec<u64> = vec![ctx.modulus(); 8];
    assert_eq!(ctx.forward(&mut unreduced), Err(Error::OutOfRange));

    let a: [u64; 5] = [1; 5];
    let b: [u64; 5] = [1; 5];
    let mut out: Vec<u64> = vec![0; 8];
    // |a| + |b| - 1 = 9 > 8 would wrap
    assert!(matches!(ctx.convolve(&a, &b, &mut out), Err(Error::InvalidArgument(_))));
}

fn test_mul_large_operands() {
    // wide dense decimal operands take the convolution path inside mul;
    // the product must agree with the bignum oracle
    let seed: [u8; 32] = [17; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for _ in 0..10 {
        let xs: String = (0..100)
            .map(|i| {
                let lo: u8 = if i == 0 { 1 } else { 0 };
                char::from(b'0' + rng.random_range(lo..10u8))
            })
            .collect();
        let ys: String = (0..100)
            .map(|i| {
                let lo: u8 = if i == 0 { 1 } else { 0 };
                char::from(b'0' + rng.random_range(lo..10u8))
            })
            .collect();
        let ox: BigInt = BigInt::parse_bytes(xs.as_bytes(), 10).unwrap();
        let oy: BigInt = BigInt::parse_bytes(ys.as_bytes(), 10).unwrap();
        let x: Number = Number::from_bigint(&ox, 10).unwrap();
        let y: Number = Number::from_bigint(&oy, 10).unwrap();
        assert!(!x.is_sparse() && !y.is_sparse());
        let mut prod: Number = Number::new(10).unwrap();
        mul(&mut prod, &x, &y).unwrap();
        assert_eq!(prod.to_bigint(), &ox * &oy);
    }
}
