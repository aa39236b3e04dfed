use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::number::repr::{Repr, SparseDigit};
use crate::number::Number;

/// Raw digit sums awaiting carry propagation.
///
/// Slot `i` holds the (possibly over-`base`) sum destined for exponent
/// `offset + i`. All magnitude operations funnel their results through an
/// accumulator and [`rebuild`], so carry handling, zero trimming, bound
/// bookkeeping and capacity checks live in exactly one place.
///
/// Slots are `u128`: a schoolbook product row sums fewer than `2^20` terms
/// of at most `(2^32 - 1)^2`, which stays far below `2^128`.
pub(crate) struct Accumulator {
    offset: i32,
    sums: Vec<u128>,
}

impl Accumulator {
    pub(crate) fn new(min_exp: i32, max_exp: i32, cap: usize) -> Result<Self> {
        debug_assert!(
            min_exp <= max_exp,
            "accumulator bounds reversed: [{}, {}]",
            min_exp,
            max_exp
        );
        let span: usize = (max_exp as i64 - min_exp as i64 + 1) as usize;
        if span > cap {
            return Err(Error::CapacityExceeded { needed: span, cap });
        }
        let mut sums: Vec<u128> = Vec::new();
        sums.try_reserve_exact(span).map_err(|_| Error::OutOfMemory)?;
        sums.resize(span, 0);
        Ok(Self { offset: min_exp, sums })
    }

    #[inline(always)]
    pub(crate) fn add_at(&mut self, exp: i32, v: u128) {
        let i: usize = (exp as i64 - self.offset as i64) as usize;
        debug_assert!(i < self.sums.len(), "exponent {} outside accumulator", exp);
        self.sums[i] += v;
    }

    /// Propagates carries, trims boundary zeros and produces a canonical
    /// [`Number`]. `negative` applies only if the magnitude is nonzero.
    pub(crate) fn rebuild(self, base: u64, negative: bool, cap: usize) -> Result<Number> {
        let b: u128 = base as u128;
        let mut digits: Vec<u64> = Vec::new();
        digits.try_reserve(self.sums.len() + 2).map_err(|_| Error::OutOfMemory)?;
        let mut carry: u128 = 0;
        for &s in self.sums.iter() {
            let t: u128 = s + carry;
            digits.push((t % b) as u64);
            carry = t / b;
        }
        while carry > 0 {
            digits.push((carry % b) as u64);
            carry /= b;
        }
        finish_dense(base, negative, self.offset, digits, cap)
    }
}

/// Canonicalizes an already carry-free dense digit vector (each entry below
/// `base`), as produced by borrow-style subtraction.
pub(crate) fn rebuild_exact(
    base: u64,
    negative: bool,
    offset: i32,
    digits: Vec<u64>,
    cap: usize,
) -> Result<Number> {
    debug_assert!(digits.iter().all(|&d| d < base), "digit >= base {}", base);
    finish_dense(base, negative, offset, digits, cap)
}

fn finish_dense(
    base: u64,
    negative: bool,
    offset: i32,
    mut digits: Vec<u64>,
    cap: usize,
) -> Result<Number> {
    while digits.last() == Some(&0) {
        digits.pop();
    }
    let low: usize = digits.iter().take_while(|&&d| d == 0).count();
    digits.drain(..low);
    if digits.is_empty() {
        return Ok(Number::zero(base));
    }
    if digits.len() > cap {
        return Err(Error::CapacityExceeded { needed: digits.len(), cap });
    }
    let min: i32 = i32::try_from(offset as i64 + low as i64).map_err(|_| Error::ExponentOverflow)?;
    let max: i32 = i32::try_from(min as i64 + digits.len() as i64 - 1)
        .map_err(|_| Error::ExponentOverflow)?;
    let mut out: Number = Number {
        base,
        negative,
        min_exponent: min,
        max_exponent: max,
        repr: Repr::Dense { offset: min, digits },
    };
    out.optimize_representation()?;
    Ok(out)
}

/// Carry propagation over exponent-keyed sums, for results whose digit span
/// is too wide to slot into a dense accumulator. Keys are `i64` so the carry
/// out of exponent `i32::MAX` is caught here rather than wrapping.
pub(crate) fn rebuild_sparse(
    base: u64,
    negative: bool,
    mut sums: BTreeMap<i64, u128>,
    cap: usize,
) -> Result<Number> {
    let b: u128 = base as u128;
    let mut digits: Vec<SparseDigit> = Vec::new();
    while let Some((exp, sum)) = sums.pop_first() {
        let v: u128 = sum % b;
        let carry: u128 = sum / b;
        if carry > 0 {
            *sums.entry(exp + 1).or_insert(0) += carry;
        }
        if v != 0 {
            if digits.len() == cap {
                return Err(Error::CapacityExceeded { needed: cap + 1, cap });
            }
            digits.push(SparseDigit {
                value: v as u64,
                exponent: i32::try_from(exp).map_err(|_| Error::ExponentOverflow)?,
            });
        }
    }
    if digits.is_empty() {
        return Ok(Number::zero(base));
    }
    let min: i32 = digits[0].exponent;
    let max: i32 = digits[digits.len() - 1].exponent;
    let mut out: Number = Number {
        base,
        negative,
        min_exponent: min,
        max_exponent: max,
        repr: Repr::Sparse(digits),
    };
    out.optimize_representation()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carry_propagation() {
        let mut acc: Accumulator = Accumulator::new(0, 1, 1 << 20).unwrap();
        acc.add_at(0, 27);
        acc.add_at(1, 9);
        // 27 + 90 = 117
        let n: Number = acc.rebuild(10, false, 1 << 20).unwrap();
        assert_eq!(n.to_integer().unwrap(), 117);
        assert_eq!(n.min_exponent(), 0);
        assert_eq!(n.max_exponent(), 2);
    }

    #[test]
    fn zero_is_canonical() {
        let acc: Accumulator = Accumulator::new(-3, 5, 1 << 20).unwrap();
        let n: Number = acc.rebuild(10, true, 1 << 20).unwrap();
        assert!(n.is_zero());
        assert!(!n.negative);
        assert_eq!(n.min_exponent(), 0);
        assert_eq!(n.max_exponent(), 0);
    }

    #[test]
    fn sparse_carry_chains_across_gaps() {
        let mut sums: BTreeMap<i64, u128> = BTreeMap::new();
        sums.insert(0, 10);
        sums.insert(1, 9);
        sums.insert(2, 9);
        sums.insert(1_000, 1);
        let n: Number = rebuild_sparse(10, false, sums, 1 << 20).unwrap();
        // 10 + 90 + 900 = 1000
        assert_eq!(n.digit_at(3), 1);
        assert_eq!(n.digit_at(0), 0);
        assert_eq!(n.digit_at(1), 0);
        assert_eq!(n.digit_at(2), 0);
        assert_eq!(n.digit_at(1_000), 1);
        assert_eq!(n.max_exponent(), 1_000);
    }

    #[test]
    fn span_cap_enforced() {
        assert!(matches!(
            Accumulator::new(0, 100, 50),
            Err(Error::CapacityExceeded { .. })
        ));
    }
}
