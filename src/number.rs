pub(crate) mod normalize;
pub mod repr;

use std::collections::BTreeMap;
use std::fmt;

use itertools::Either;
use num_bigint::{BigInt, BigUint, Sign as BigSign};
use num_integer::Integer;
use num_traits::{Pow, ToPrimitive, Zero};

use crate::config::DEFAULT_MAX_DIGIT_CAPACITY;
use crate::error::{Error, Result};
use crate::number::normalize::{rebuild_exact, rebuild_sparse};
use crate::number::repr::{Repr, SparseDigit};

/// Largest supported radix. Keeps every digit product inside `u64` and
/// every accumulator slot inside `u128`.
pub const MAX_BASE: u64 = 1 << 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    NonNegative,
    Negative,
}

/// An arbitrary-precision signed number in an arbitrary radix `>= 2`.
///
/// The value is `(-1)^sign * sum(digit * base^exponent)` over the stored
/// digits; negative exponents are fractional positions. Storage is hybrid:
/// a dense slice for compact numbers, an exponent-sorted list of nonzero
/// digits for wide sparse ones (see [`Number::optimize_representation`]).
///
/// Canonical form invariants, upheld by every constructor and operation:
/// digits lie in `[0, base)`, boundary zeros are trimmed (except for
/// explicit [`Number::set_precision`] padding), zero is the empty digit set
/// with a nonnegative sign, and `min_exponent`/`max_exponent` match the
/// stored digits.
#[derive(Clone, Debug)]
pub struct Number {
    pub(crate) base: u64,
    pub(crate) negative: bool,
    pub(crate) min_exponent: i32,
    pub(crate) max_exponent: i32,
    pub(crate) repr: Repr,
}

pub(crate) fn validate_base(base: u64) -> Result<()> {
    if base < 2 || base > MAX_BASE {
        return Err(Error::InvalidArgument("base must be in [2, 2^32]"));
    }
    Ok(())
}

pub(crate) fn check_same_base(a: &Number, b: &Number) -> Result<()> {
    if a.base != b.base {
        return Err(Error::BaseMismatch { lhs: a.base, rhs: b.base });
    }
    Ok(())
}

impl Number {
    /// Zero in the given base.
    pub fn new(base: u64) -> Result<Self> {
        validate_base(base)?;
        Ok(Self::zero(base))
    }

    /// Zero with `capacity` dense digit slots preallocated.
    pub fn with_capacity(base: u64, capacity: usize) -> Result<Self> {
        validate_base(base)?;
        let mut digits: Vec<u64> = Vec::new();
        digits.try_reserve_exact(capacity).map_err(|_| Error::OutOfMemory)?;
        let mut out: Self = Self::zero(base);
        out.repr = Repr::Dense { offset: 0, digits };
        Ok(out)
    }

    pub(crate) fn zero(base: u64) -> Self {
        Self {
            base,
            negative: false,
            min_exponent: 0,
            max_exponent: 0,
            repr: Repr::Dense { offset: 0, digits: Vec::new() },
        }
    }

    /// The single digit 1 at the given exponent.
    pub(crate) fn unit_at(base: u64, exponent: i32) -> Self {
        Self::digit(base, 1, exponent)
    }

    /// A single-digit value at the given exponent. `value` must be below
    /// `base`; zero collapses to the canonical zero.
    pub(crate) fn digit(base: u64, value: u64, exponent: i32) -> Self {
        debug_assert!(value < base, "digit {} >= base {}", value, base);
        if value == 0 {
            return Self::zero(base);
        }
        Self {
            base,
            negative: false,
            min_exponent: exponent,
            max_exponent: exponent,
            repr: Repr::Dense { offset: exponent, digits: vec![value] },
        }
    }

    /// Exact conversion from a machine integer.
    pub fn from_integer(value: i64, base: u64) -> Result<Self> {
        validate_base(base)?;
        let mut magnitude: u64 = value.unsigned_abs();
        let mut digits: Vec<u64> = Vec::new();
        while magnitude > 0 {
            digits.push(magnitude % base);
            magnitude /= base;
        }
        rebuild_exact(base, value < 0, 0, digits, DEFAULT_MAX_DIGIT_CAPACITY)
    }

    /// Best-effort conversion from a float: the integer part exactly, then
    /// up to `precision` fractional digits by repeated scaling. Non-finite
    /// inputs are rejected.
    pub fn from_real(value: f64, base: u64, precision: u32) -> Result<Self> {
        validate_base(base)?;
        if !value.is_finite() {
            return Err(Error::NotRepresentable);
        }
        let p: i32 = i32::try_from(precision).map_err(|_| Error::InvalidArgument("precision"))?;
        let magnitude: f64 = value.abs();
        if magnitude >= u128::MAX as f64 {
            return Err(Error::NotRepresentable);
        }
        let mut frac: f64 = magnitude.fract();
        let mut frac_digits: Vec<u64> = Vec::new();
        frac_digits.try_reserve_exact(precision as usize).map_err(|_| Error::OutOfMemory)?;
        for _ in 0..precision {
            frac *= base as f64;
            let d: f64 = frac.floor();
            frac_digits.push(d as u64);
            frac -= d;
        }
        let mut digits: Vec<u64> = Vec::new();
        digits.try_reserve(frac_digits.len() + 2).map_err(|_| Error::OutOfMemory)?;
        digits.extend(frac_digits.iter().rev());
        let mut int: u128 = magnitude.trunc() as u128;
        let b: u128 = base as u128;
        while int > 0 {
            digits.push((int % b) as u64);
            int /= b;
        }
        rebuild_exact(base, value < 0.0, -p, digits, DEFAULT_MAX_DIGIT_CAPACITY)
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn sign(&self) -> Sign {
        if self.negative {
            Sign::Negative
        } else {
            Sign::NonNegative
        }
    }

    pub fn is_zero(&self) -> bool {
        match &self.repr {
            Repr::Dense { digits, .. } => digits.iter().all(|&d| d == 0),
            Repr::Sparse(digits) => digits.is_empty(),
        }
    }

    pub fn min_exponent(&self) -> i32 {
        self.min_exponent
    }

    pub fn max_exponent(&self) -> i32 {
        self.max_exponent
    }

    /// Number of stored fractional positions: `max(0, -min_exponent)`.
    pub fn precision(&self) -> u32 {
        if self.min_exponent < 0 {
            -(self.min_exponent as i64) as u32
        } else {
            0
        }
    }

    /// Bytes held by this value, including heap digit storage.
    pub fn memory_bytes(&self) -> usize {
        let heap: usize = match &self.repr {
            Repr::Dense { digits, .. } => digits.capacity() * std::mem::size_of::<u64>(),
            Repr::Sparse(digits) => digits.capacity() * std::mem::size_of::<SparseDigit>(),
        };
        std::mem::size_of::<Self>() + heap
    }

    /// Digit span `max_exponent - min_exponent + 1`, or 0 for zero.
    pub(crate) fn span(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        (self.max_exponent as i64 - self.min_exponent as i64 + 1) as usize
    }

    pub(crate) fn nonzero_count(&self) -> usize {
        match &self.repr {
            Repr::Dense { digits, .. } => digits.iter().filter(|&&d| d != 0).count(),
            Repr::Sparse(digits) => digits.len(),
        }
    }

    /// Digit at the given exponent, zero when absent. O(1) dense,
    /// O(log n) sparse.
    pub(crate) fn digit_at(&self, exponent: i32) -> u64 {
        match &self.repr {
            Repr::Dense { offset, digits } => {
                let i: i64 = exponent as i64 - *offset as i64;
                if i < 0 || i >= digits.len() as i64 {
                    0
                } else {
                    digits[i as usize]
                }
            }
            Repr::Sparse(digits) => digits
                .binary_search_by_key(&exponent, |d| d.exponent)
                .map(|i| digits[i].value)
                .unwrap_or(0),
        }
    }

    /// Nonzero digits as `(exponent, value)` in ascending exponent order.
    pub(crate) fn iter_nonzero(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        match &self.repr {
            Repr::Dense { offset, digits } => {
                let offset: i32 = *offset;
                Either::Left(
                    digits
                        .iter()
                        .enumerate()
                        .filter(|(_, &v)| v != 0)
                        .map(move |(i, &v)| (offset + i as i32, v)),
                )
            }
            Repr::Sparse(digits) => {
                Either::Right(digits.iter().map(|d| (d.exponent, d.value)))
            }
        }
    }

    /// Nonzero digits in descending exponent order.
    pub(crate) fn iter_nonzero_rev(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        match &self.repr {
            Repr::Dense { offset, digits } => {
                let offset: i32 = *offset;
                Either::Left(
                    digits
                        .iter()
                        .enumerate()
                        .rev()
                        .filter(|(_, &v)| v != 0)
                        .map(move |(i, &v)| (offset + i as i32, v)),
                )
            }
            Repr::Sparse(digits) => {
                Either::Right(digits.iter().rev().map(|d| (d.exponent, d.value)))
            }
        }
    }

    /// Truncation toward zero of the integer part, as an `i64`.
    pub fn to_integer(&self) -> Result<i64> {
        let b: i128 = self.base as i128;
        let mut acc: i128 = 0;
        for (exp, v) in self.iter_nonzero() {
            if exp < 0 {
                continue;
            }
            let scale: i128 = b.checked_pow(exp as u32).ok_or(Error::Overflow)?;
            let term: i128 = (v as i128).checked_mul(scale).ok_or(Error::Overflow)?;
            acc = acc.checked_add(term).ok_or(Error::Overflow)?;
        }
        if self.negative {
            acc = -acc;
        }
        i64::try_from(acc).map_err(|_| Error::Overflow)
    }

    /// Exact conversion of the integer part to a [`BigInt`], truncating
    /// toward zero.
    pub fn to_bigint(&self) -> BigInt {
        let base: BigUint = BigUint::from(self.base);
        let mut acc: BigUint = BigUint::zero();
        let mut prev: Option<i32> = None;
        for (exp, v) in self.iter_nonzero_rev() {
            if exp < 0 {
                break;
            }
            if let Some(p) = prev {
                acc *= Pow::pow(&base, (p - exp) as u32);
            }
            acc += v;
            prev = Some(exp);
        }
        if let Some(p) = prev {
            if p > 0 {
                acc *= Pow::pow(&base, p as u32);
            }
        }
        let sign: BigSign = if self.negative && !acc.is_zero() {
            BigSign::Minus
        } else if acc.is_zero() {
            BigSign::NoSign
        } else {
            BigSign::Plus
        };
        BigInt::from_biguint(sign, acc)
    }

    /// Exact conversion from a [`BigInt`].
    pub fn from_bigint(value: &BigInt, base: u64) -> Result<Self> {
        validate_base(base)?;
        let b: BigUint = BigUint::from(base);
        let mut magnitude: BigUint = value.magnitude().clone();
        let mut digits: Vec<u64> = Vec::new();
        while !magnitude.is_zero() {
            let (q, r) = magnitude.div_rem(&b);
            digits.push(r.to_u64().ok_or(Error::Overflow)?);
            magnitude = q;
        }
        rebuild_exact(base, value.sign() == BigSign::Minus, 0, digits, DEFAULT_MAX_DIGIT_CAPACITY)
    }

    /// Lossy conversion to `f64`.
    pub fn to_real(&self) -> f64 {
        let b: f64 = self.base as f64;
        let mut acc: f64 = 0.0;
        for (exp, v) in self.iter_nonzero() {
            acc += v as f64 * b.powi(exp);
        }
        if self.negative {
            -acc
        } else {
            acc
        }
    }

    /// Pads or truncates the fractional digits so that exactly `precision`
    /// positions below the radix point are stored. Padding zeros survive
    /// until the next arithmetic operation or representation switch; zero
    /// stays the empty digit set. Densifies sparse values first.
    pub fn set_precision(&mut self, precision: u32) -> Result<()> {
        let p: i32 = i32::try_from(precision).map_err(|_| Error::InvalidArgument("precision"))?;
        if self.is_zero() {
            return Ok(());
        }
        self.to_dense()?;
        let base: u64 = self.base;
        let target: i32 = -p;
        let (offset, digits) = match &mut self.repr {
            Repr::Dense { offset, digits } => (offset, digits),
            Repr::Sparse(_) => unreachable!(),
        };
        if target < *offset {
            let pad: usize = (*offset as i64 - target as i64) as usize;
            let needed: usize = digits.len() + pad;
            if needed > DEFAULT_MAX_DIGIT_CAPACITY {
                return Err(Error::CapacityExceeded {
                    needed,
                    cap: DEFAULT_MAX_DIGIT_CAPACITY,
                });
            }
            digits.try_reserve(pad).map_err(|_| Error::OutOfMemory)?;
            digits.resize(digits.len() + pad, 0);
            digits.rotate_right(pad);
            *offset = target;
            self.min_exponent = target;
        } else if target > *offset {
            let drop: usize = ((target as i64 - *offset as i64) as usize).min(digits.len());
            digits.drain(..drop);
            if digits.iter().all(|&d| d == 0) {
                *self = Self::zero(base);
                return Ok(());
            }
            *offset = target;
            self.min_exponent = target;
        }
        Ok(())
    }
}

/// Half-away-from-zero rounding at `precision` fractional digits, decided
/// by the digit at exponent `-(precision + 1)`.
pub fn round(dst: &mut Number, src: &Number, precision: u32) -> Result<()> {
    let p: i32 = i32::try_from(precision).map_err(|_| Error::InvalidArgument("precision"))?;
    if src.is_zero() || src.min_exponent >= -p {
        *dst = src.clone();
        return dst.set_precision(precision);
    }
    let guard: u64 = src.digit_at(-p - 1);
    let mut kept: Number = src.clone();
    kept.set_precision(precision)?;
    if 2 * guard >= src.base {
        let mut step: Number = Number::unit_at(src.base, -p);
        step.negative = src.negative;
        crate::arith::add(dst, &kept, &step)?;
        dst.set_precision(precision)?;
    } else {
        *dst = kept;
    }
    Ok(())
}

/// Drops every digit below exponent `-precision`, without rounding and
/// without padding. The result is canonical.
pub fn truncate(dst: &mut Number, src: &Number, precision: u32) -> Result<()> {
    let p: i32 = i32::try_from(precision).map_err(|_| Error::InvalidArgument("precision"))?;
    let mut sums: BTreeMap<i64, u128> = BTreeMap::new();
    for (exp, v) in src.iter_nonzero() {
        if exp >= -p {
            sums.insert(exp as i64, v as u128);
        }
    }
    *dst = rebuild_sparse(src.base, src.negative, sums, DEFAULT_MAX_DIGIT_CAPACITY)?;
    Ok(())
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.negative {
            f.write_str("-")?;
        }
        // Wide sparse values print as a sum of terms instead of a digit
        // string.
        if self.span() > 4096 {
            let terms: Vec<(i32, u64)> = self.iter_nonzero().collect();
            for (i, (exp, v)) in terms.iter().rev().enumerate() {
                if i > 0 {
                    f.write_str(" + ")?;
                }
                write!(f, "{}*{}^{}", v, self.base, exp)?;
            }
            return Ok(());
        }
        let hi: i32 = self.max_exponent.max(0);
        let lo: i32 = self.min_exponent.min(0);
        let multichar: bool = self.base > 10;
        let mut exp: i32 = hi;
        loop {
            write!(f, "{}", self.digit_at(exp))?;
            if exp == lo {
                break;
            }
            if exp == 0 {
                f.write_str(".")?;
            } else if multichar {
                f.write_str(":")?;
            }
            exp -= 1;
        }
        Ok(())
    }
}
