//! Elementary arithmetic: comparison, signed addition and subtraction,
//! multiplication and radix shifts.
//!
//! Every signed operation reduces to magnitude arithmetic plus a final sign
//! decision; magnitudes always travel through the normalization engine in
//! [`crate::number::normalize`], so results come out canonical.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::DEFAULT_MAX_DIGIT_CAPACITY;
use crate::error::{Error, Result};
use crate::number::normalize::{rebuild_exact, rebuild_sparse, Accumulator};
use crate::number::repr::Repr;
use crate::number::{check_same_base, Number};

/// Dense operands at least this many digits wide go through the NTT
/// multiplier first, falling back to schoolbook when no prime fits.
const NTT_MUL_THRESHOLD: usize = 64;

/// Three-way value comparison. Fails only on a base mismatch.
pub fn compare(a: &Number, b: &Number) -> Result<Ordering> {
    check_same_base(a, b)?;
    Ok(match (a.negative, b.negative) {
        (false, false) => magnitude_cmp(a, b),
        (true, true) => magnitude_cmp(b, a),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    })
}

/// Compares |a| and |b| by merging the nonzero digits in descending
/// exponent order. O(nonzero), independent of the digit span.
pub(crate) fn magnitude_cmp(a: &Number, b: &Number) -> Ordering {
    let mut ia = a.iter_nonzero_rev();
    let mut ib = b.iter_nonzero_rev();
    let mut da: Option<(i32, u64)> = ia.next();
    let mut db: Option<(i32, u64)> = ib.next();
    loop {
        match (da, db) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some((ea, va)), Some((eb, vb))) => {
                if ea != eb {
                    return ea.cmp(&eb);
                }
                if va != vb {
                    return va.cmp(&vb);
                }
                da = ia.next();
                db = ib.next();
            }
        }
    }
}

/// `dst = a + b`.
pub fn add(dst: &mut Number, a: &Number, b: &Number) -> Result<()> {
    check_same_base(a, b)?;
    *dst = add_signed(a, a.negative, b, b.negative)?;
    Ok(())
}

/// `dst = a - b`.
pub fn sub(dst: &mut Number, a: &Number, b: &Number) -> Result<()> {
    check_same_base(a, b)?;
    *dst = add_signed(a, a.negative, b, !b.negative)?;
    Ok(())
}

pub(crate) fn add_signed(a: &Number, sa: bool, b: &Number, sb: bool) -> Result<Number> {
    let cap: usize = DEFAULT_MAX_DIGIT_CAPACITY;
    if a.is_zero() {
        let mut out: Number = b.clone();
        out.negative = sb && !b.is_zero();
        return Ok(out);
    }
    if b.is_zero() {
        let mut out: Number = a.clone();
        out.negative = sa;
        return Ok(out);
    }
    if sa == sb {
        return add_magnitude(a, b, sa, cap);
    }
    match magnitude_cmp(a, b) {
        Ordering::Equal => Ok(Number::zero(a.base)),
        Ordering::Greater => sub_magnitude(a, b, sa, cap),
        Ordering::Less => sub_magnitude(b, a, sb, cap),
    }
}

/// Exponent span of the union of two operands' digit ranges. Two compact
/// dense values far apart still produce a huge union, so this decides the
/// storage path, not the operands' current forms alone.
fn union_span(a: &Number, b: &Number) -> usize {
    let min: i64 = a.min_exponent.min(b.min_exponent) as i64;
    let max: i64 = a.max_exponent.max(b.max_exponent) as i64;
    (max - min + 1) as usize
}

/// |a| + |b| with the given result sign. Sparse operands and wide unions
/// take the exponent-keyed path so the digit span never gets materialized.
fn add_magnitude(a: &Number, b: &Number, negative: bool, cap: usize) -> Result<Number> {
    if a.is_sparse() || b.is_sparse() || union_span(a, b) > cap {
        let mut sums: BTreeMap<i64, u128> = BTreeMap::new();
        for (exp, v) in a.iter_nonzero().chain(b.iter_nonzero()) {
            *sums.entry(exp as i64).or_insert(0) += v as u128;
        }
        return rebuild_sparse(a.base, negative, sums, cap);
    }
    let min: i32 = a.min_exponent.min(b.min_exponent);
    let max: i32 = a.max_exponent.max(b.max_exponent);
    let mut acc: Accumulator = Accumulator::new(min, max, cap)?;
    for (exp, v) in a.iter_nonzero().chain(b.iter_nonzero()) {
        acc.add_at(exp, v as u128);
    }
    acc.rebuild(a.base, negative, cap)
}

/// |a| - |b| with the given result sign. Caller guarantees |a| >= |b|.
fn sub_magnitude(a: &Number, b: &Number, negative: bool, cap: usize) -> Result<Number> {
    if a.is_sparse() || b.is_sparse() || union_span(a, b) > cap {
        return sub_magnitude_sparse(a, b, negative, cap);
    }
    let base: u64 = a.base;
    let min: i32 = a.min_exponent.min(b.min_exponent);
    let max: i32 = a.max_exponent.max(b.max_exponent);
    let span: usize = (max as i64 - min as i64 + 1) as usize;
    let mut digits: Vec<u64> = Vec::new();
    digits.try_reserve_exact(span).map_err(|_| Error::OutOfMemory)?;
    let mut borrow: u64 = 0;
    for exp in min..=max {
        let da: u64 = a.digit_at(exp);
        let db: u64 = b.digit_at(exp) + borrow;
        if da >= db {
            digits.push(da - db);
            borrow = 0;
        } else {
            digits.push(base + da - db);
            borrow = 1;
        }
    }
    debug_assert!(borrow == 0, "magnitude underflow: |a| < |b|");
    rebuild_exact(base, negative, min, digits, cap)
}

/// Borrow propagation over nonzero entries only. A borrow crossing a run of
/// absent digits turns the whole run into `base - 1`, which can densify the
/// result; the capacity cap bounds that growth.
fn sub_magnitude_sparse(a: &Number, b: &Number, negative: bool, cap: usize) -> Result<Number> {
    let base: i128 = a.base as i128;
    let mut diff: BTreeMap<i64, i128> = BTreeMap::new();
    for (exp, v) in a.iter_nonzero() {
        *diff.entry(exp as i64).or_insert(0) += v as i128;
    }
    for (exp, v) in b.iter_nonzero() {
        *diff.entry(exp as i64).or_insert(0) -= v as i128;
    }
    let mut out: BTreeMap<i64, u128> = BTreeMap::new();
    let mut borrow: i128 = 0;
    let mut prev: i64 = 0;
    for (exp, v) in diff {
        if borrow != 0 {
            let mut gap: i64 = prev + 1;
            while gap < exp {
                out.insert(gap, (base - 1) as u128);
                if out.len() > cap {
                    return Err(Error::CapacityExceeded { needed: out.len(), cap });
                }
                gap += 1;
            }
        }
        let mut v: i128 = v + borrow;
        borrow = 0;
        if v < 0 {
            v += base;
            borrow = -1;
        }
        debug_assert!(v < base, "digit out of range after borrow");
        if v != 0 {
            out.insert(exp, v as u128);
            if out.len() > cap {
                return Err(Error::CapacityExceeded { needed: out.len(), cap });
            }
        }
        prev = exp;
    }
    debug_assert!(borrow == 0, "magnitude underflow: |a| < |b|");
    rebuild_sparse(a.base, negative, out, cap)
}

/// `dst = a * b`. Wide dense operands are routed through the NTT multiplier
/// when a suitable prime exists; everything else is schoolbook.
pub fn mul(dst: &mut Number, a: &Number, b: &Number) -> Result<()> {
    check_same_base(a, b)?;
    if a.is_zero() || b.is_zero() {
        *dst = Number::zero(a.base);
        return Ok(());
    }
    let negative: bool = a.negative != b.negative;
    if !a.is_sparse()
        && !b.is_sparse()
        && a.span() >= NTT_MUL_THRESHOLD
        && b.span() >= NTT_MUL_THRESHOLD
    {
        match crate::ntt::mul_convolution(dst, a, b) {
            Ok(()) => return Ok(()),
            Err(Error::OutOfRange) => {}
            Err(e) => return Err(e),
        }
    }
    let cap: usize = DEFAULT_MAX_DIGIT_CAPACITY;
    let product_span: usize = a.span() + b.span() - 1;
    if a.is_sparse() || b.is_sparse() || product_span > cap {
        let mut sums: BTreeMap<i64, u128> = BTreeMap::new();
        for (ea, va) in a.iter_nonzero() {
            for (eb, vb) in b.iter_nonzero() {
                *sums.entry(ea as i64 + eb as i64).or_insert(0) += va as u128 * vb as u128;
            }
        }
        *dst = rebuild_sparse(a.base, negative, sums, cap)?;
        return Ok(());
    }
    let min: i32 = i32::try_from(a.min_exponent as i64 + b.min_exponent as i64)
        .map_err(|_| Error::ExponentOverflow)?;
    let max: i32 = i32::try_from(a.max_exponent as i64 + b.max_exponent as i64)
        .map_err(|_| Error::ExponentOverflow)?;
    let mut acc: Accumulator = Accumulator::new(min, max, cap)?;
    for (ea, va) in a.iter_nonzero() {
        for (eb, vb) in b.iter_nonzero() {
            acc.add_at(ea + eb, va as u128 * vb as u128);
        }
    }
    *dst = acc.rebuild(a.base, negative, cap)?;
    Ok(())
}

/// `dst = a * scalar` for a machine-word scalar. The scalar may exceed the
/// base; carries renormalize it.
pub(crate) fn mul_scalar(dst: &mut Number, a: &Number, scalar: u64) -> Result<()> {
    if a.is_zero() || scalar == 0 {
        *dst = Number::zero(a.base);
        return Ok(());
    }
    let cap: usize = DEFAULT_MAX_DIGIT_CAPACITY;
    if a.is_sparse() {
        let mut sums: BTreeMap<i64, u128> = BTreeMap::new();
        for (exp, v) in a.iter_nonzero() {
            sums.insert(exp as i64, v as u128 * scalar as u128);
        }
        *dst = rebuild_sparse(a.base, a.negative, sums, cap)?;
        return Ok(());
    }
    let mut acc: Accumulator = Accumulator::new(a.min_exponent, a.max_exponent, cap)?;
    for (exp, v) in a.iter_nonzero() {
        acc.add_at(exp, v as u128 * scalar as u128);
    }
    *dst = acc.rebuild(a.base, a.negative, cap)?;
    Ok(())
}

/// `dst = a * base^count`: a pure exponent shift, no digit traffic.
pub fn shift_left(dst: &mut Number, a: &Number, count: u32) -> Result<()> {
    let delta: i32 = i32::try_from(count).map_err(|_| Error::ExponentOverflow)?;
    *dst = shifted(a, delta)?;
    Ok(())
}

/// `dst = a / base^count`; digits slide into fractional positions rather
/// than being dropped.
pub fn shift_right(dst: &mut Number, a: &Number, count: u32) -> Result<()> {
    let delta: i32 = i32::try_from(count).map_err(|_| Error::ExponentOverflow)?;
    *dst = shifted(a, -delta)?;
    Ok(())
}

pub(crate) fn shifted(a: &Number, delta: i32) -> Result<Number> {
    if a.is_zero() || delta == 0 {
        return Ok(a.clone());
    }
    let min: i32 = a.min_exponent.checked_add(delta).ok_or(Error::ExponentOverflow)?;
    let max: i32 = a.max_exponent.checked_add(delta).ok_or(Error::ExponentOverflow)?;
    let mut out: Number = a.clone();
    out.min_exponent = min;
    out.max_exponent = max;
    match &mut out.repr {
        Repr::Dense { offset, .. } => *offset += delta,
        Repr::Sparse(digits) => {
            for d in digits.iter_mut() {
                d.exponent += delta;
            }
        }
    }
    Ok(out)
}
