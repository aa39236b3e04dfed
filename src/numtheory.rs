//! Number-theoretic utilities: gcd, lcm, integer roots and exponentiation.
//!
//! All of these operate on the integer parts of their operands; fractional
//! digits are ignored the same way `divmod` ignores them.

use std::cmp::Ordering;

use crate::arith;
use crate::config::EngineConfig;
use crate::div::{divmod, divmod_magnitude};
use crate::error::{Error, Result};
use crate::modular;
use crate::number::{check_same_base, truncate, Number};

fn integer_magnitude(x: &Number) -> Result<Number> {
    let mut out: Number = Number::zero(x.base);
    truncate(&mut out, x, 0)?;
    out.negative = false;
    Ok(out)
}

/// `dst = gcd(|a|, |b|)` by the Euclidean algorithm; `gcd(0, 0) = 0`.
pub fn gcd(dst: &mut Number, a: &Number, b: &Number) -> Result<()> {
    check_same_base(a, b)?;
    let mut r0: Number = integer_magnitude(a)?;
    let mut r1: Number = integer_magnitude(b)?;
    while !r1.is_zero() {
        let (_, r2) = divmod_magnitude(&r0, &r1)?;
        r0 = std::mem::replace(&mut r1, r2);
    }
    *dst = r0;
    Ok(())
}

/// `dst = lcm(|a|, |b|) = |a * b| / gcd(a, b)`; zero if either input is zero.
pub fn lcm(dst: &mut Number, a: &Number, b: &Number) -> Result<()> {
    check_same_base(a, b)?;
    if a.is_zero() || b.is_zero() {
        *dst = Number::zero(a.base);
        return Ok(());
    }
    let mut g: Number = Number::zero(a.base);
    gcd(&mut g, a, b)?;
    let am: Number = integer_magnitude(a)?;
    let bm: Number = integer_magnitude(b)?;
    let mut prod: Number = Number::zero(a.base);
    arith::mul(&mut prod, &am, &bm)?;
    let (q, _) = divmod_magnitude(&prod, &g)?;
    *dst = q;
    Ok(())
}

/// True when `gcd(a, b) = 1`.
pub fn coprime(a: &Number, b: &Number) -> Result<bool> {
    let mut g: Number = Number::zero(a.base);
    gcd(&mut g, a, b)?;
    let one: Number = Number::from_integer(1, a.base)?;
    Ok(arith::compare(&g, &one)? == Ordering::Equal)
}

fn require_integer_exponent(exp: &Number) -> Result<()> {
    if exp.iter_nonzero().any(|(e, _)| e < 0) {
        return Err(Error::InvalidArgument("exponent must be an integer"));
    }
    Ok(())
}

/// `dst = a^exp` by binary exponentiation. Negative exponents have no
/// finite digit expansion and are rejected.
pub fn pow(dst: &mut Number, a: &Number, exp: &Number) -> Result<()> {
    check_same_base(a, exp)?;
    require_integer_exponent(exp)?;
    if exp.negative {
        return Err(Error::NotRepresentable);
    }
    let base: u64 = a.base;
    let two: Number = Number::from_integer(2, base)?;
    let mut result: Number = Number::from_integer(1, base)?;
    let mut square: Number = a.clone();
    let mut e: Number = exp.clone();
    let mut q: Number = Number::zero(base);
    let mut bit: Number = Number::zero(base);
    while !e.is_zero() {
        divmod(&mut q, &mut bit, &e, &two)?;
        if !bit.is_zero() {
            let mut next: Number = Number::zero(base);
            arith::mul(&mut next, &result, &square)?;
            result = next;
        }
        e = q.clone();
        if !e.is_zero() {
            let mut next: Number = Number::zero(base);
            arith::mul(&mut next, &square, &square)?;
            square = next;
        }
    }
    *dst = result;
    Ok(())
}

/// `dst = a^exp mod m`.
pub fn powmod(dst: &mut Number, a: &Number, exp: &Number, m: &Number) -> Result<()> {
    modular::mod_exp(dst, a, exp, m)
}

/// `a^k` for a machine-word exponent, used by the Newton iterations.
fn pow_u32(a: &Number, mut k: u32) -> Result<Number> {
    let base: u64 = a.base;
    let mut result: Number = Number::from_integer(1, base)?;
    let mut square: Number = a.clone();
    while k > 0 {
        if k & 1 == 1 {
            let mut next: Number = Number::zero(base);
            arith::mul(&mut next, &result, &square)?;
            result = next;
        }
        k >>= 1;
        if k > 0 {
            let mut next: Number = Number::zero(base);
            arith::mul(&mut next, &square, &square)?;
            square = next;
        }
    }
    Ok(result)
}

/// `dst = floor(sqrt(n))` by Newton's method.
///
/// Starts from `base^ceil(d/2)` for a `d`-digit integer part, which bounds
/// the true root from above; the iteration is then strictly decreasing and
/// stops at the first non-decrease. Negative inputs are rejected.
pub fn isqrt(dst: &mut Number, n: &Number, config: &EngineConfig) -> Result<()> {
    iroot(dst, n, 2, config)
}

/// `dst = floor(n^(1/k))` by the Newton step
/// `x' = ((k - 1) * x + n / x^(k-1)) / k`.
pub fn iroot(dst: &mut Number, n: &Number, k: u32, config: &EngineConfig) -> Result<()> {
    if k < 2 {
        return Err(Error::InvalidArgument("root order must be at least 2"));
    }
    if n.negative {
        return Err(Error::InvalidArgument("root of a negative value"));
    }
    let base: u64 = n.base;
    let nm: Number = integer_magnitude(n)?;
    if nm.is_zero() {
        *dst = Number::zero(base);
        return Ok(());
    }
    let digits: i64 = nm.max_exponent() as i64 + 1;
    let start_exp: i32 = i32::try_from((digits + k as i64 - 1) / k as i64)
        .map_err(|_| Error::ExponentOverflow)?;
    let kn: Number = Number::from_integer(k as i64, base)?;
    let mut x: Number = Number::unit_at(base, start_exp);
    for _ in 0..config.max_newton_iters {
        // x' = ((k - 1) * x + n / x^(k-1)) / k
        let xk1: Number = pow_u32(&x, k - 1)?;
        let (q, _) = divmod_magnitude(&nm, &xk1)?;
        let mut scaled: Number = Number::zero(base);
        arith::mul_scalar(&mut scaled, &x, (k - 1) as u64)?;
        let mut sum: Number = Number::zero(base);
        arith::add(&mut sum, &scaled, &q)?;
        let (next, _) = divmod_magnitude(&sum, &kn)?;
        if arith::compare(&next, &x)? != Ordering::Less {
            *dst = x;
            return Ok(());
        }
        x = next;
    }
    Err(Error::DidNotConverge)
}
