use crate::ntt::PRIME_TABLE;

/// Tuning knobs threaded explicitly through the operations that consume them.
/// There is no global state; a fresh `EngineConfig::default()` is always valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Hard cap on Newton iterations in `isqrt`/`iroot`.
    pub max_newton_iters: u32,
    /// Hard cap on the digit span of any single `Number`.
    pub max_digit_capacity: usize,
    /// How much of the built-in NTT prime table to consult before falling
    /// back to a `k*n + 1` search.
    pub ntt_prime_table_size: usize,
}

pub(crate) const DEFAULT_MAX_NEWTON_ITERS: u32 = 64;
pub(crate) const DEFAULT_MAX_DIGIT_CAPACITY: usize = 1 << 20;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_newton_iters: DEFAULT_MAX_NEWTON_ITERS,
            max_digit_capacity: DEFAULT_MAX_DIGIT_CAPACITY,
            ntt_prime_table_size: PRIME_TABLE.len(),
        }
    }
}
