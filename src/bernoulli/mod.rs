//! Exact Bernoulli numbers: growable cache, reverse zeta generator, and
//! multi-modular reconstruction.
//!
//! Three backends, one contract: whatever path runs, the returned rational
//! is the exact mathematical Bernoulli number.
//!
//! - the defining recurrence seeds small indices,
//! - [`BernoulliRev`] fills contiguous ranges top-down (the shape the
//!   Stirling series consumes: all even indices up to a bound),
//! - [`bernoulli_multi_mod`] computes isolated large indices from prime
//!   residues plus a floating zeta refinement.
//!
//! [`BernoulliCache`] is the service object: a contiguous table with a
//! monotone high-water mark, extended by a single writer under the lock,
//! read concurrently. A process-wide instance backs [`bernoulli_number`]
//! and the Stirling coefficients; tests construct isolated instances.

use std::sync::{OnceLock, RwLock};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::config::{BERNOULLI_CACHE_LIMIT, BERNOULLI_REV_MIN};

mod multi_mod;
mod rev;
mod support;

#[cfg(test)]
mod tests;

pub use multi_mod::{bernoulli_mod_p, bernoulli_multi_mod};
pub use rev::BernoulliRev;
pub use support::{bound_2exp, denom, factorial, recurrence_table, zeta_even};

/// Process-wide growable table of exact Bernoulli numbers.
pub struct BernoulliCache {
    table: RwLock<Vec<BigRational>>,
}

impl BernoulliCache {
    pub fn new() -> Self {
        BernoulliCache { table: RwLock::new(Vec::new()) }
    }

    /// Number of cached entries (the high-water mark plus one).
    pub fn len(&self) -> usize {
        self.table.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extend the table so that index `n` is present. Writers are
    /// serialized by the lock; the table only grows.
    pub fn ensure(&self, n: u64) {
        assert!(
            n <= BERNOULLI_CACHE_LIMIT,
            "index {n} beyond the cache limit; use bernoulli_number"
        );
        {
            let t = self.table.read().unwrap();
            if (n as usize) < t.len() {
                return;
            }
        }
        let mut t = self.table.write().unwrap();
        let start = t.len() as u64;
        if n < start {
            return; // lost the race to another writer
        }
        let target = n + (n & 1); // round up to even

        // seed the recurrence range in one shot
        if start < BERNOULLI_REV_MIN {
            let top = target.min(BERNOULLI_REV_MIN - 2);
            let small = support::recurrence_table(top);
            t.extend_from_slice(&small[start as usize..]);
        }

        if target >= BERNOULLI_REV_MIN {
            let lo = t.len() as u64;
            let mut filled: Vec<Option<BigRational>> =
                vec![None; (target - lo + 1) as usize];
            for (i, value) in BernoulliRev::new(target) {
                if i < lo {
                    break;
                }
                filled[(i - lo) as usize] = Some(value);
            }
            for (off, slot) in filled.into_iter().enumerate() {
                let idx = lo + off as u64;
                match slot {
                    Some(v) => t.push(v),
                    None => {
                        debug_assert!(idx % 2 == 1);
                        t.push(BigRational::zero());
                    }
                }
            }
        }
    }

    /// Bₙ. Odd n > 1 are zero by convention and need no table entry.
    pub fn get(&self, n: u64) -> BigRational {
        if n % 2 == 1 {
            return if n == 1 {
                BigRational::new(BigInt::from(-1), BigInt::from(2))
            } else {
                BigRational::zero()
            };
        }
        self.ensure(n);
        self.table.read().unwrap()[n as usize].clone()
    }
}

impl Default for BernoulliCache {
    fn default() -> Self {
        Self::new()
    }
}

fn global() -> &'static BernoulliCache {
    static CACHE: OnceLock<BernoulliCache> = OnceLock::new();
    CACHE.get_or_init(BernoulliCache::new)
}

/// The shared cache backing the Stirling coefficients.
pub(crate) fn cached(n: u64) -> BigRational {
    global().get(n)
}

/// Exact Bₙ. Indices inside the cache window are remembered; larger even
/// indices go to the multi-modular backend without being cached.
pub fn bernoulli_number(n: u64) -> BigRational {
    if n % 2 == 1 || n <= BERNOULLI_CACHE_LIMIT {
        global().get(n)
    } else {
        bernoulli_multi_mod(n, None)
    }
}
