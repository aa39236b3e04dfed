//! Classical long division.
//!
//! `divmod` is truncating integer division over the integer parts of its
//! operands; `div_fractional` scales both operands to integers by the same
//! power of the base, divides, then keeps extracting fractional quotient
//! digits from the remainder. Quotient digits are found by binary search
//! over `[0, base)`, so each position costs `O(|b| log base)`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::arith;
use crate::config::DEFAULT_MAX_DIGIT_CAPACITY;
use crate::error::{Error, Result};
use crate::number::normalize::rebuild_sparse;
use crate::number::{check_same_base, truncate, Number};

/// `quot = trunc(a) / trunc(b)`, `rem = trunc(a) mod trunc(b)`, truncating
/// toward zero. The remainder takes the dividend's sign, the quotient the
/// XOR of both. Fractional digits of either operand are ignored.
pub fn divmod(quot: &mut Number, rem: &mut Number, a: &Number, b: &Number) -> Result<()> {
    check_same_base(a, b)?;
    let mut bi: Number = Number::zero(b.base);
    truncate(&mut bi, b, 0)?;
    if bi.is_zero() {
        return Err(Error::DivisionByZero);
    }
    bi.negative = false;
    let mut ai: Number = Number::zero(a.base);
    truncate(&mut ai, a, 0)?;
    ai.negative = false;
    let (mut q, mut r) = divmod_magnitude(&ai, &bi)?;
    q.negative = (a.negative != b.negative) && !q.is_zero();
    r.negative = a.negative && !r.is_zero();
    *quot = q;
    *rem = r;
    Ok(())
}

/// `dst = a / b` to `precision` fractional digits, truncated (not rounded).
///
/// Both operands are scaled by the same `base^s` that clears their
/// fractional digits, which leaves the quotient unchanged; the integer
/// division then runs as usual and the remainder keeps yielding digits at
/// exponents `-1, -2, ...` until it vanishes or the precision is reached.
pub fn div_fractional(dst: &mut Number, a: &Number, b: &Number, precision: u32) -> Result<()> {
    check_same_base(a, b)?;
    if b.is_zero() {
        return Err(Error::DivisionByZero);
    }
    if a.is_zero() {
        *dst = Number::zero(a.base);
        return Ok(());
    }
    let shift: i32 = i32::try_from(-(a.min_exponent.min(b.min_exponent).min(0) as i64))
        .map_err(|_| Error::ExponentOverflow)?;
    let mut am: Number = arith::shifted(a, shift)?;
    am.negative = false;
    let mut bm: Number = arith::shifted(b, shift)?;
    bm.negative = false;
    let (q, mut rem) = divmod_magnitude(&am, &bm)?;
    let mut digits: BTreeMap<i64, u128> =
        q.iter_nonzero().map(|(exp, v)| (exp as i64, v as u128)).collect();
    let base: u64 = a.base;
    for i in 1..=precision as i64 {
        if rem.is_zero() {
            break;
        }
        rem = arith::shifted(&rem, 1)?;
        let d: u64 = quotient_digit(&rem, &bm)?;
        if d != 0 {
            let mut prod: Number = Number::zero(base);
            arith::mul_scalar(&mut prod, &bm, d)?;
            let mut next: Number = Number::zero(base);
            arith::sub(&mut next, &rem, &prod)?;
            rem = next;
            digits.insert(-i, d as u128);
        }
    }
    *dst = rebuild_sparse(base, a.negative != b.negative, digits, DEFAULT_MAX_DIGIT_CAPACITY)?;
    Ok(())
}

/// Long division of nonnegative integer magnitudes, `b` nonzero. Returns
/// `(quotient, remainder)`. While the running remainder is zero the scan
/// jumps between nonzero dividend digits, so sparse dividends do not pay
/// for their gaps.
pub(crate) fn divmod_magnitude(a: &Number, b: &Number) -> Result<(Number, Number)> {
    debug_assert!(!b.is_zero(), "division by zero magnitude");
    let base: u64 = a.base;
    if arith::magnitude_cmp(a, b) == Ordering::Less {
        return Ok((Number::zero(base), a.clone()));
    }
    let nonzero_exps: Vec<i32> = a.iter_nonzero_rev().map(|(exp, _)| exp).collect();
    let mut nzi: usize = 0;
    let mut rem: Number = Number::zero(base);
    let mut qdigits: BTreeMap<i64, u128> = BTreeMap::new();
    let mut exp: i32 = a.max_exponent;
    loop {
        if exp < 0 {
            break;
        }
        if rem.is_zero() {
            while nzi < nonzero_exps.len() && nonzero_exps[nzi] > exp {
                nzi += 1;
            }
            match nonzero_exps.get(nzi) {
                Some(&e) if e >= 0 => exp = e,
                _ => break,
            }
        }
        let d: u64 = a.digit_at(exp);
        let mut shifted: Number = arith::shifted(&rem, 1)?;
        if d != 0 {
            let dig: Number = Number::digit(base, d, 0);
            let mut sum: Number = Number::zero(base);
            arith::add(&mut sum, &shifted, &dig)?;
            shifted = sum;
        }
        rem = shifted;
        let qd: u64 = quotient_digit(&rem, b)?;
        if qd != 0 {
            let mut prod: Number = Number::zero(base);
            arith::mul_scalar(&mut prod, b, qd)?;
            let mut next: Number = Number::zero(base);
            arith::sub(&mut next, &rem, &prod)?;
            rem = next;
            qdigits.insert(exp as i64, qd as u128);
        }
        if exp == 0 {
            break;
        }
        exp -= 1;
    }
    let quot: Number = rebuild_sparse(base, false, qdigits, DEFAULT_MAX_DIGIT_CAPACITY)?;
    Ok((quot, rem))
}

/// Largest digit `q` in `[0, base)` with `q * b <= rem`, by binary search.
fn quotient_digit(rem: &Number, b: &Number) -> Result<u64> {
    let base: u64 = rem.base();
    let mut lo: u64 = 0;
    let mut hi: u64 = base - 1;
    let mut prod: Number = Number::zero(base);
    while lo < hi {
        let mid: u64 = lo + (hi - lo + 1) / 2;
        arith::mul_scalar(&mut prod, b, mid)?;
        if arith::magnitude_cmp(&prod, rem) != Ordering::Greater {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}
