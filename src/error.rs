use std::fmt;

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy of the engine.
///
/// Operations either succeed with fully normalized outputs or return one of
/// these variants without half-writing their destinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Precondition failure the caller can fix (bad base, negative
    /// precision, non-integer exponent, ...).
    InvalidArgument(&'static str),
    /// Operands carry different bases.
    BaseMismatch { lhs: u64, rhs: u64 },
    DivisionByZero,
    /// Modular inverse of a non-coprime pair.
    NotInvertible,
    /// Digit buffer allocation failed.
    OutOfMemory,
    /// The configured digit cap was reached.
    CapacityExceeded { needed: usize, cap: usize },
    /// The signed 32-bit exponent range was exhausted.
    ExponentOverflow,
    /// Newton iteration cap reached.
    DidNotConverge,
    /// The result has no finite representation in the requested form.
    NotRepresentable,
    /// `to_integer` on a value outside the i64 range.
    Overflow,
    /// NTT prime too small for the input magnitudes.
    OutOfRange,
}

impl Error {
    /// Stable identifier string for the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::BaseMismatch { .. } => "base_mismatch",
            Error::DivisionByZero => "division_by_zero",
            Error::NotInvertible => "not_invertible",
            Error::OutOfMemory => "out_of_memory",
            Error::CapacityExceeded { .. } => "capacity_exceeded",
            Error::ExponentOverflow => "exponent_overflow",
            Error::DidNotConverge => "did_not_converge",
            Error::NotRepresentable => "not_representable",
            Error::Overflow => "overflow",
            Error::OutOfRange => "out_of_range",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(what) => write!(f, "invalid_argument: {}", what),
            Error::BaseMismatch { lhs, rhs } => {
                write!(f, "base_mismatch: lhs base {} != rhs base {}", lhs, rhs)
            }
            Error::CapacityExceeded { needed, cap } => {
                write!(f, "capacity_exceeded: {} digits > cap {}", needed, cap)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

impl std::error::Error for Error {}
