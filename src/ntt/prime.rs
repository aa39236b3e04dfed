use itertools::Itertools;
use prime_factorization::Factorization;

use crate::error::{Error, Result};

#[inline(always)]
pub(crate) fn mul_mod(a: u64, b: u64, p: u64) -> u64 {
    ((a as u128 * b as u128) % p as u128) as u64
}

pub(crate) fn pow_mod(base: u64, mut exp: u64, p: u64) -> u64 {
    let mut acc: u64 = 1;
    let mut square: u64 = base % p;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, square, p);
        }
        square = mul_mod(square, square, p);
        exp >>= 1;
    }
    acc
}

/// Inverse modulo a prime, by Fermat.
pub(crate) fn inv_mod(a: u64, p: u64) -> u64 {
    pow_mod(a, p - 2, p)
}

/// Smallest primitive root of the prime `p`: the first `g` whose order is
/// not a proper divisor of `p - 1`, checked against each prime factor.
pub(crate) fn primitive_root(p: u64) -> Result<u64> {
    if p == 2 {
        return Ok(1);
    }
    let factors: Vec<u64> = Factorization::run(p - 1).factors.into_iter().unique().collect();
    let mut g: u64 = 2;
    while g < p {
        if factors.iter().all(|&f| pow_mod(g, (p - 1) / f, p) != 1) {
            return Ok(g);
        }
        g += 1;
    }
    Err(Error::DidNotConverge)
}

/// Bound on the `k*n + 1` scan below.
const SEARCH_LIMIT: u64 = 1 << 22;

/// A prime `p = k*n + 1` with `p > min_value`, preferring the precomputed
/// table and falling back to an incremental search.
pub(crate) fn find_prime(n: u64, min_value: u128, table: &[u64]) -> Result<u64> {
    if let Some(&p) = table
        .iter()
        .find(|&&p| p % n == 1 && p as u128 > min_value)
    {
        return Ok(p);
    }
    let mut k: u64 = u64::try_from(min_value / n as u128 + 1).map_err(|_| Error::OutOfRange)?;
    for _ in 0..SEARCH_LIMIT {
        let candidate: u64 = k
            .checked_mul(n)
            .and_then(|kn| kn.checked_add(1))
            .ok_or(Error::OutOfRange)?;
        if candidate as u128 > min_value && Factorization::run(candidate).is_prime {
            return Ok(candidate);
        }
        k += 1;
    }
    Err(Error::DidNotConverge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_and_inverse() {
        assert_eq!(pow_mod(3, 4, 7), 4);
        assert_eq!(pow_mod(2, 16, 65537), 65536);
        let inv: u64 = inv_mod(5, 17);
        assert_eq!(mul_mod(inv, 5, 17), 1);
    }

    #[test]
    fn primitive_root_has_full_order() {
        for p in [257u64, 65537, 998244353] {
            let g: u64 = primitive_root(p).unwrap();
            let factors: Vec<u64> =
                Factorization::run(p - 1).factors.into_iter().unique().collect();
            for f in factors {
                assert_ne!(pow_mod(g, (p - 1) / f, p), 1);
            }
        }
    }

    #[test]
    fn prime_search() {
        // table hit
        assert_eq!(find_prime(8, 0, &[257, 65537]).unwrap(), 257);
        // table exhausted, scan k*n + 1 upward from the bound
        assert_eq!(find_prime(8, 300, &[257]).unwrap(), 313);
    }
}
