use crate::config::DEFAULT_MAX_DIGIT_CAPACITY;
use crate::error::{Error, Result};
use crate::number::Number;

/// A nonzero digit of a sparse number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SparseDigit {
    pub value: u64,
    pub exponent: i32,
}

/// Hybrid digit storage.
///
/// Dense stores one slot per exponent in `[offset, offset + len)`, zeros
/// included, so access by exponent is O(1). Sparse stores only nonzero
/// digits in ascending exponent order, so memory follows the nonzero count
/// instead of the span.
#[derive(Clone, Debug)]
pub(crate) enum Repr {
    Dense { offset: i32, digits: Vec<u64> },
    Sparse(Vec<SparseDigit>),
}

/// Below this span the dense form is always preferred.
pub(crate) const DENSE_SPAN_PREFERRED: usize = 100;

impl Number {
    /// True if the number currently uses the sparse form.
    pub fn is_sparse(&self) -> bool {
        matches!(self.repr, Repr::Sparse(_))
    }

    /// Fraction of the digit span occupied by zeros, in `[0, 1]`. Zero
    /// numbers report 0.
    pub fn sparsity(&self) -> f64 {
        let span = self.span();
        if span == 0 {
            return 0.0;
        }
        1.0 - self.nonzero_count() as f64 / span as f64
    }

    /// Converts to the dense form. Value-preserving; fails with
    /// `CapacityExceeded` when the span of the nonzero digits is too large
    /// to materialize.
    pub fn to_dense(&mut self) -> Result<()> {
        let digits = match &self.repr {
            Repr::Dense { .. } => return Ok(()),
            Repr::Sparse(digits) => digits,
        };
        if digits.is_empty() {
            self.repr = Repr::Dense { offset: 0, digits: Vec::new() };
            return Ok(());
        }
        let lo: i32 = digits[0].exponent;
        let hi: i32 = digits[digits.len() - 1].exponent;
        let span = (hi as i64 - lo as i64 + 1) as usize;
        if span > DEFAULT_MAX_DIGIT_CAPACITY {
            return Err(Error::CapacityExceeded { needed: span, cap: DEFAULT_MAX_DIGIT_CAPACITY });
        }
        let mut dense: Vec<u64> = Vec::new();
        dense.try_reserve_exact(span).map_err(|_| Error::OutOfMemory)?;
        dense.resize(span, 0);
        for d in digits {
            dense[(d.exponent as i64 - lo as i64) as usize] = d.value;
        }
        self.repr = Repr::Dense { offset: lo, digits: dense };
        self.min_exponent = lo;
        self.max_exponent = hi;
        Ok(())
    }

    /// Converts to the sparse form, dropping stored zero digits (including
    /// any fractional padding introduced by `set_precision`).
    pub fn to_sparse(&mut self) {
        let (offset, digits) = match &self.repr {
            Repr::Sparse(_) => return,
            Repr::Dense { offset, digits } => (*offset, digits),
        };
        let sparse: Vec<SparseDigit> = digits
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(i, &v)| SparseDigit { value: v, exponent: offset + i as i32 })
            .collect();
        if sparse.is_empty() {
            self.min_exponent = 0;
            self.max_exponent = 0;
        } else {
            self.min_exponent = sparse[0].exponent;
            self.max_exponent = sparse[sparse.len() - 1].exponent;
        }
        self.repr = Repr::Sparse(sparse);
    }

    /// Switches representation based on the sparsity ratio and span.
    /// Dense when the span is small or at least half the slots are nonzero,
    /// sparse otherwise. Value-preserving either way.
    pub fn optimize_representation(&mut self) -> Result<()> {
        let span = self.span();
        if span <= DENSE_SPAN_PREFERRED {
            return self.to_dense();
        }
        if self.nonzero_count() * 2 < span {
            self.to_sparse();
            Ok(())
        } else {
            self.to_dense()
        }
    }
}
