//! Arbitrary-precision signed arithmetic in an arbitrary radix.
//!
//! Values are positional digit sequences in any base from 2 to `2^32`,
//! with negative exponents for fractional positions and a hybrid
//! dense/sparse digit store that switches form based on how many of the
//! spanned positions are actually nonzero. On top of the elementary
//! operations sit truncating and fractional division, modular arithmetic,
//! gcd/lcm/root utilities, exact radix conversion and an NTT convolution
//! service that doubles as the fast multiplication path.
//!
//! Operations follow a uniform shape: results go to a `&mut` destination,
//! errors come back as [`Error`], and inputs are never mutated. Outputs are
//! always canonical: digits below the base, boundary zeros trimmed, zero as
//! the empty digit sequence with a nonnegative sign.

pub mod arith;
pub mod config;
pub mod convert;
pub mod div;
pub mod error;
pub mod modular;
pub mod ntt;
pub mod number;
pub mod numtheory;

pub use arith::{add, compare, mul, shift_left, shift_right, sub};
pub use config::EngineConfig;
pub use convert::convert_base;
pub use div::{div_fractional, divmod};
pub use error::{Error, Result};
pub use modular::{mod_add, mod_exp, mod_inverse, mod_mul, mod_sub, modulo};
pub use ntt::NttContext;
pub use number::{round, truncate, Number, Sign, MAX_BASE};
pub use numtheory::{coprime, gcd, iroot, isqrt, lcm, pow, powmod};
