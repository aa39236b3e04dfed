//! Modular arithmetic over integer parts.
//!
//! All results are canonical representatives in `[0, |m|)`, regardless of
//! operand signs; `divmod`'s truncating remainder is adjusted upward when
//! negative.

use std::cmp::Ordering;

use crate::arith;
use crate::div::divmod;
use crate::error::{Error, Result};
use crate::number::{check_same_base, Number};

/// `dst = a mod m`, adjusted into `[0, |m|)`.
pub fn modulo(dst: &mut Number, a: &Number, m: &Number) -> Result<()> {
    check_same_base(a, m)?;
    let mut q: Number = Number::zero(a.base);
    let mut r: Number = Number::zero(a.base);
    divmod(&mut q, &mut r, a, m)?;
    if r.negative {
        let mut magnitude: Number = m.clone();
        magnitude.negative = false;
        let mut adjusted: Number = Number::zero(a.base);
        arith::add(&mut adjusted, &r, &magnitude)?;
        r = adjusted;
    }
    *dst = r;
    Ok(())
}

/// `dst = (a + b) mod m`.
pub fn mod_add(dst: &mut Number, a: &Number, b: &Number, m: &Number) -> Result<()> {
    let mut sum: Number = Number::zero(a.base);
    arith::add(&mut sum, a, b)?;
    modulo(dst, &sum, m)
}

/// `dst = (a - b) mod m`.
pub fn mod_sub(dst: &mut Number, a: &Number, b: &Number, m: &Number) -> Result<()> {
    let mut diff: Number = Number::zero(a.base);
    arith::sub(&mut diff, a, b)?;
    modulo(dst, &diff, m)
}

/// `dst = (a * b) mod m`.
pub fn mod_mul(dst: &mut Number, a: &Number, b: &Number, m: &Number) -> Result<()> {
    let mut prod: Number = Number::zero(a.base);
    arith::mul(&mut prod, a, b)?;
    modulo(dst, &prod, m)
}

fn require_nonnegative_integer(exp: &Number) -> Result<()> {
    if exp.negative {
        return Err(Error::InvalidArgument("exponent must be nonnegative"));
    }
    if exp.iter_nonzero().any(|(e, _)| e < 0) {
        return Err(Error::InvalidArgument("exponent must be an integer"));
    }
    Ok(())
}

/// `dst = a^exp mod m` by binary exponentiation, scanning `exp` least
/// significant bit first through repeated division by two.
pub fn mod_exp(dst: &mut Number, a: &Number, exp: &Number, m: &Number) -> Result<()> {
    check_same_base(a, m)?;
    check_same_base(a, exp)?;
    require_nonnegative_integer(exp)?;
    let base: u64 = a.base;
    let two: Number = Number::from_integer(2, base)?;
    let mut result: Number = Number::from_integer(1, base)?;
    let mut square: Number = Number::zero(base);
    modulo(&mut square, a, m)?;
    let mut e: Number = exp.clone();
    let mut q: Number = Number::zero(base);
    let mut bit: Number = Number::zero(base);
    while !e.is_zero() {
        divmod(&mut q, &mut bit, &e, &two)?;
        if !bit.is_zero() {
            let mut next: Number = Number::zero(base);
            mod_mul(&mut next, &result, &square, m)?;
            result = next;
        }
        e = q.clone();
        if !e.is_zero() {
            let mut next: Number = Number::zero(base);
            mod_mul(&mut next, &square, &square, m)?;
            square = next;
        }
    }
    // a final reduction folds the m = 1 case to zero
    modulo(dst, &result, m)
}

/// `dst = a^-1 mod m` via the extended Euclidean algorithm. Fails with
/// `NotInvertible` when `gcd(a, m) != 1`.
pub fn mod_inverse(dst: &mut Number, a: &Number, m: &Number) -> Result<()> {
    check_same_base(a, m)?;
    if m.is_zero() {
        return Err(Error::DivisionByZero);
    }
    let base: u64 = a.base;
    let mut r0: Number = m.clone();
    r0.negative = false;
    let mut r1: Number = Number::zero(base);
    modulo(&mut r1, a, m)?;
    let mut t0: Number = Number::zero(base);
    let mut t1: Number = Number::from_integer(1, base)?;
    let mut q: Number = Number::zero(base);
    let mut r2: Number = Number::zero(base);
    while !r1.is_zero() {
        divmod(&mut q, &mut r2, &r0, &r1)?;
        // t2 = t0 - q * t1
        let mut qt: Number = Number::zero(base);
        arith::mul(&mut qt, &q, &t1)?;
        let mut t2: Number = Number::zero(base);
        arith::sub(&mut t2, &t0, &qt)?;
        r0 = std::mem::replace(&mut r1, r2.clone());
        t0 = std::mem::replace(&mut t1, t2);
    }
    let one: Number = Number::from_integer(1, base)?;
    if arith::compare(&r0, &one)? != Ordering::Equal {
        return Err(Error::NotInvertible);
    }
    modulo(dst, &t0, m)
}
