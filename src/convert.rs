//! Radix conversion.
//!
//! Runs entirely in exact digit arithmetic: the integer part by repeated
//! division by the target base, the fractional part by repeated
//! multiplication. No intermediate floating point, so integer conversions
//! are exact at any size.

use std::collections::BTreeMap;

use crate::arith;
use crate::config::DEFAULT_MAX_DIGIT_CAPACITY;
use crate::div::divmod_magnitude;
use crate::error::Result;
use crate::number::normalize::rebuild_sparse;
use crate::number::{truncate, validate_base, Number};

/// `dst = src` re-expressed in `new_base`.
///
/// The integer part converts exactly. The fractional part is truncated to
/// as many `new_base` digits as `src` carries in its own base, since most
/// fractions have no finite expansion in both bases.
pub fn convert_base(dst: &mut Number, src: &Number, new_base: u64) -> Result<()> {
    validate_base(new_base)?;
    if new_base == src.base() {
        *dst = src.clone();
        return Ok(());
    }
    if src.is_zero() {
        *dst = Number::zero(new_base);
        return Ok(());
    }
    let old_base: u64 = src.base();
    let target: Number = Number::from_integer(new_base as i64, old_base)?;
    let mut digits: BTreeMap<i64, u128> = BTreeMap::new();

    let mut int_part: Number = Number::zero(old_base);
    truncate(&mut int_part, src, 0)?;
    int_part.negative = false;
    let mut exp: i64 = 0;
    while !int_part.is_zero() {
        let (q, r) = divmod_magnitude(&int_part, &target)?;
        let d: u64 = r.to_integer()? as u64;
        if d != 0 {
            digits.insert(exp, d as u128);
        }
        int_part = q;
        exp += 1;
    }

    let mut frac: Number = magnitude_fraction(src)?;
    for i in 1..=src.precision() as i64 {
        if frac.is_zero() {
            break;
        }
        let mut scaled: Number = Number::zero(old_base);
        arith::mul_scalar(&mut scaled, &frac, new_base)?;
        let mut int_digit: Number = Number::zero(old_base);
        truncate(&mut int_digit, &scaled, 0)?;
        let d: u64 = int_digit.to_integer()? as u64;
        debug_assert!(d < new_base, "fraction digit {} >= base {}", d, new_base);
        if d != 0 {
            digits.insert(-i, d as u128);
        }
        let mut next: Number = Number::zero(old_base);
        arith::sub(&mut next, &scaled, &int_digit)?;
        frac = next;
    }

    let negative: bool = matches!(src.sign(), crate::number::Sign::Negative);
    *dst = rebuild_sparse(new_base, negative, digits, DEFAULT_MAX_DIGIT_CAPACITY)?;
    Ok(())
}

/// The fractional digits of `|src|` as a nonnegative number below one.
fn magnitude_fraction(src: &Number) -> Result<Number> {
    let mut sums: BTreeMap<i64, u128> = BTreeMap::new();
    for (exp, v) in src.iter_nonzero() {
        if exp < 0 {
            sums.insert(exp as i64, v as u128);
        }
    }
    rebuild_sparse(src.base(), false, sums, DEFAULT_MAX_DIGIT_CAPACITY)
}
