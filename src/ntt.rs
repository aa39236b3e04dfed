//! Number-theoretic transform over a word-sized prime field, plus the
//! big-number multiplication built on it.
//!
//! A context fixes a power-of-two size `n`, a prime `p = k*n + 1` and the
//! twiddle factors derived from a primitive root; `forward`/`inverse` are
//! then in-place iterative radix-2 transforms and `convolve` is the usual
//! transform, pointwise multiply, inverse transform pipeline.

mod prime;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::number::normalize::Accumulator;
use crate::number::Number;
use crate::ntt::prime::{inv_mod, mul_mod, pow_mod};

/// NTT-friendly primes, ascending. Each is `k * 2^s + 1` for a generous
/// power of two, so every transform size up to `2^s` divides `p - 1`.
pub const PRIME_TABLE: [u64; 8] = [
    257,
    65537,
    167772161,
    469762049,
    998244353,
    2013265921,
    2281701377,
    3221225473,
];

/// Precomputed transform of size `n` modulo `p`.
pub struct NttContext {
    n: usize,
    log_n: u32,
    p: u64,
    root: u64,
    roots_forward: Vec<u64>,
    roots_inverse: Vec<u64>,
    n_inv: u64,
}

impl NttContext {
    /// Context for transforms of the power-of-two size `n`, using the
    /// default configuration.
    pub fn new(n: usize) -> Result<Self> {
        Self::with_config(n, &EngineConfig::default())
    }

    pub fn with_config(n: usize, config: &EngineConfig) -> Result<Self> {
        Self::with_min_modulus(n, 0, config)
    }

    /// As `with_config`, but requires `p > min_value` so the caller can
    /// guarantee convolution sums stay below the modulus.
    pub(crate) fn with_min_modulus(
        n: usize,
        min_value: u128,
        config: &EngineConfig,
    ) -> Result<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(Error::InvalidArgument("transform size must be a power of two >= 2"));
        }
        let table_len: usize = config.ntt_prime_table_size.min(PRIME_TABLE.len());
        let p: u64 = prime::find_prime(n as u64, min_value, &PRIME_TABLE[..table_len])?;
        let g: u64 = prime::primitive_root(p)?;
        let root: u64 = pow_mod(g, (p - 1) / n as u64, p);
        debug_assert!(pow_mod(root, n as u64, p) == 1, "root order does not divide n");
        debug_assert!(pow_mod(root, n as u64 / 2, p) != 1, "root order below n");
        let mut roots_forward: Vec<u64> = Vec::with_capacity(n);
        let mut w: u64 = 1;
        for _ in 0..n {
            roots_forward.push(w);
            w = mul_mod(w, root, p);
        }
        let roots_inverse: Vec<u64> =
            (0..n).map(|i| roots_forward[(n - i) % n]).collect();
        Ok(Self {
            n,
            log_n: n.trailing_zeros(),
            p,
            root,
            roots_forward,
            roots_inverse,
            n_inv: inv_mod(n as u64, p),
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn modulus(&self) -> u64 {
        self.p
    }

    /// The primitive `n`-th root of unity the twiddle factors are built on.
    pub fn root(&self) -> u64 {
        self.root
    }

    /// In-place forward transform. Values must be reduced modulo `p`.
    pub fn forward(&self, values: &mut [u64]) -> Result<()> {
        self.transform(values, &self.roots_forward)
    }

    /// In-place inverse transform, including the `n^-1` scaling.
    pub fn inverse(&self, values: &mut [u64]) -> Result<()> {
        self.transform(values, &self.roots_inverse)?;
        for v in values.iter_mut() {
            *v = mul_mod(*v, self.n_inv, self.p);
        }
        Ok(())
    }

    fn transform(&self, values: &mut [u64], roots: &[u64]) -> Result<()> {
        if values.len() != self.n {
            return Err(Error::InvalidArgument("input length must equal the transform size"));
        }
        if values.iter().any(|&v| v >= self.p) {
            return Err(Error::OutOfRange);
        }
        for i in 0..self.n {
            let j: usize = i.reverse_bits() >> (usize::BITS - self.log_n);
            if i < j {
                values.swap(i, j);
            }
        }
        let mut m: usize = 2;
        while m <= self.n {
            let stride: usize = self.n / m;
            let half: usize = m / 2;
            for start in (0..self.n).step_by(m) {
                for j in 0..half {
                    let w: u64 = roots[j * stride];
                    let t: u64 = mul_mod(values[start + j + half], w, self.p);
                    let u: u64 = values[start + j];
                    values[start + j] = add_mod(u, t, self.p);
                    values[start + j + half] = sub_mod(u, t, self.p);
                }
            }
            m <<= 1;
        }
        Ok(())
    }

    /// Cyclic-free convolution of `a` and `b` into `out` (length `n`).
    ///
    /// Requires `a.len() + b.len() - 1 <= n` so the product does not wrap,
    /// and `n * max(a) * max(b) < p` so no coefficient sum overflows the
    /// field; the latter fails with `OutOfRange`.
    pub fn convolve(&self, a: &[u64], b: &[u64], out: &mut [u64]) -> Result<()> {
        if a.is_empty() || b.is_empty() || a.len() + b.len() - 1 > self.n {
            return Err(Error::InvalidArgument("operand lengths must satisfy |a| + |b| - 1 <= n"));
        }
        if out.len() != self.n {
            return Err(Error::InvalidArgument("output length must equal the transform size"));
        }
        let max_a: u64 = a.iter().copied().max().unwrap_or(0);
        let max_b: u64 = b.iter().copied().max().unwrap_or(0);
        if self.n as u128 * max_a as u128 * max_b as u128 >= self.p as u128 {
            return Err(Error::OutOfRange);
        }
        let mut fa: Vec<u64> = vec![0; self.n];
        fa[..a.len()].copy_from_slice(a);
        let mut fb: Vec<u64> = vec![0; self.n];
        fb[..b.len()].copy_from_slice(b);
        self.forward(&mut fa)?;
        self.forward(&mut fb)?;
        for (o, (x, y)) in out.iter_mut().zip(fa.iter().zip(fb.iter())) {
            *o = mul_mod(*x, *y, self.p);
        }
        self.inverse(out)
    }
}

#[inline(always)]
fn add_mod(a: u64, b: u64, p: u64) -> u64 {
    let s: u64 = a + b;
    if s >= p {
        s - p
    } else {
        s
    }
}

#[inline(always)]
fn sub_mod(a: u64, b: u64, p: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        a + p - b
    }
}

/// Big-number multiplication through an NTT convolution of the dense digit
/// vectors, with the product digits renormalized by the carry engine.
/// Fails with `OutOfRange` when no table prime (or searched prime) can hold
/// the coefficient bound, in which case the caller falls back to schoolbook.
pub(crate) fn mul_convolution(dst: &mut Number, a: &Number, b: &Number) -> Result<()> {
    let base: u64 = a.base();
    let da: Vec<u64> = dense_digits(a);
    let db: Vec<u64> = dense_digits(b);
    let out_len: usize = da.len() + db.len() - 1;
    let n: usize = out_len.next_power_of_two().max(2);
    let max_a: u64 = da.iter().copied().max().unwrap_or(0);
    let max_b: u64 = db.iter().copied().max().unwrap_or(0);
    let min_value: u128 = n as u128 * max_a as u128 * max_b as u128;
    let config: EngineConfig = EngineConfig::default();
    let ctx: NttContext =
        NttContext::with_min_modulus(n, min_value, &config).map_err(|e| match e {
            Error::DidNotConverge => Error::OutOfRange,
            other => other,
        })?;
    let mut coeffs: Vec<u64> = vec![0; n];
    ctx.convolve(&da, &db, &mut coeffs)?;
    let min: i32 = i32::try_from(a.min_exponent() as i64 + b.min_exponent() as i64)
        .map_err(|_| Error::ExponentOverflow)?;
    let max: i32 = i32::try_from(min as i64 + out_len as i64 - 1)
        .map_err(|_| Error::ExponentOverflow)?;
    let mut acc: Accumulator = Accumulator::new(min, max, config.max_digit_capacity)?;
    for (i, &c) in coeffs[..out_len].iter().enumerate() {
        acc.add_at(min + i as i32, c as u128);
    }
    let negative: bool = a.negative != b.negative;
    *dst = acc.rebuild(base, negative, config.max_digit_capacity)?;
    Ok(())
}

/// Contiguous magnitude digits from `min_exponent` upward, zeros included.
fn dense_digits(x: &Number) -> Vec<u64> {
    let mut out: Vec<u64> = vec![0; x.span()];
    for (exp, v) in x.iter_nonzero() {
        out[(exp as i64 - x.min_exponent() as i64) as usize] = v;
    }
    out
}
