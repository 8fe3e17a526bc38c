//! Descending Bernoulli generator based on the zeta product formula.
//!
//! For even n, |Bₙ| = 2 n!/(2π)ⁿ · ζ(n). Starting from a top index, the
//! generator keeps the prefactor 2 n!/(2π)ⁿ and a table of powers j⁻ⁿ as
//! certified balls, and steps n → n−2 by multiplying the prefactor by
//! (2π)²/(n(n−1)) and every table entry by j². The working precision and
//! the table length are re-tuned downward as n shrinks, since the numerator
//! of Bₙ has fewer bits.
//!
//! Every yielded value is exact: the ball |Bₙ|·denom(n) must contain a
//! unique integer. A failed extraction is retried standalone at increasing
//! precision with a logged diagnostic; it is never accepted silently.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;

use crate::ball::{const_pi, RealBall};
use crate::config::{
    BERNOULLI_MAX_RETRIES, BERNOULLI_REFINE_STEP, BERNOULLI_REV_GUARD, BERNOULLI_REV_MIN,
    BERNOULLI_REV_RETUNE,
};
use crate::Mag;

use super::support;

/// Stateful descending iterator over even Bernoulli indices.
pub struct BernoulliRev {
    /// Next even index to yield; exhausted when below [`BERNOULLI_REV_MIN`].
    n: u64,
    /// Working precision of the current state.
    wp: u32,
    /// 2 n!/(2π)ⁿ at `wp`.
    prefactor: RealBall,
    /// `powers[i]` encloses (i+2)⁻ⁿ.
    powers: Vec<RealBall>,
    /// (2π)² at `wp`, for the prefactor update.
    two_pi_sq: RealBall,
}

fn working_prec(n: u64) -> u32 {
    let bits = support::numerator_bits(n);
    (bits + BERNOULLI_REV_GUARD as u64).min(u32::MAX as u64) as u32
}

/// Table length J such that the tail Σ_{j>J} j⁻ⁿ is below 2^-(wp+2).
fn table_len(n: u64, wp: u32) -> usize {
    let log2_j = (wp as u64 + 2).div_ceil(n - 1).min(30);
    ((1u64 << log2_j) - 1) as usize // entries j = 2 ..= 2^log2_j
}

impl BernoulliRev {
    /// Generator starting at `top` (rounded down to even), descending to
    /// [`BERNOULLI_REV_MIN`].
    pub fn new(top: u64) -> Self {
        let n = top & !1;
        assert!(n >= BERNOULLI_REV_MIN, "reverse generator starts above the recurrence range");
        let wp = working_prec(n);
        let fac = RealBall::from_bigint(&BigInt::from(support::factorial(n)));
        let two_pi = const_pi(wp).mul_2exp(1);
        let prefactor = fac.div(&two_pi.pow_u64(n, wp), wp).mul_2exp(1);
        let two_pi_sq = two_pi.mul(&two_pi, wp);
        let powers = (0..table_len(n, wp))
            .map(|i| RealBall::from_u64(i as u64 + 2).pow_u64(n, wp).inv(wp))
            .collect();
        BernoulliRev { n, wp, prefactor, powers, two_pi_sq }
    }

    /// Shrink the state to the precision the current index needs.
    fn retune(&mut self) {
        let need = working_prec(self.n);
        if self.wp.saturating_sub(need) < BERNOULLI_REV_RETUNE {
            return;
        }
        self.wp = need;
        self.prefactor = self.prefactor.set_round(need);
        self.powers.truncate(table_len(self.n, need));
        for p in self.powers.iter_mut() {
            *p = p.set_round(need);
        }
        self.two_pi_sq = {
            let two_pi = const_pi(need).mul_2exp(1);
            two_pi.mul(&two_pi, need)
        };
    }

    /// ζ(n) from the power table, with the integral tail bound.
    fn zeta_from_table(&self) -> RealBall {
        let wp = self.wp;
        let mut sum = RealBall::one();
        for p in &self.powers {
            sum = sum.add(p, wp);
        }
        // largest tabulated j is len+1; tail <= (len+2)^(1-n)/(n-1)
        let jnext = self.powers.len() as u64 + 2;
        let log2_floor = 63 - jnext.leading_zeros() as i64;
        let tail_exp = -(self.n as i64 - 1) * log2_floor + 1;
        sum.add_error(Mag::pow2(tail_exp));
        sum
    }

    /// Extract the exact Bₙ from an enclosure of |Bₙ|, retrying standalone
    /// at higher precision when the numerator is not pinned uniquely.
    fn extract(&self, abs: &RealBall) -> BigRational {
        let n = self.n;
        let den = support::denom(n);
        let den_ball = RealBall::from_bigint(&BigInt::from(den.clone()));
        let mut num_ball = abs.mul(&den_ball, self.wp + 8);
        let mut attempt = 0u32;
        let numerator = loop {
            if let Some(v) = num_ball.unique_bigint() {
                break v;
            }
            attempt += 1;
            assert!(
                attempt <= BERNOULLI_MAX_RETRIES,
                "bernoulli reverse generator: numerator of B_{n} not unique after retries"
            );
            log::debug!(
                "bernoulli rev: B_{} numerator not unique at wp {}, retrying",
                n,
                self.wp + attempt * BERNOULLI_REFINE_STEP
            );
            let wp2 = working_prec(n) + attempt * BERNOULLI_REFINE_STEP;
            num_ball = support::bernoulli_abs_ball(n, wp2).mul(&den_ball, wp2);
        };
        let signed = if n % 4 == 0 { -numerator } else { numerator };
        BigRational::new(signed, BigInt::from(den))
    }

    fn advance(&mut self) {
        let n = self.n;
        let wp = self.wp;
        self.prefactor = self
            .prefactor
            .mul(&self.two_pi_sq, wp)
            .div(&RealBall::from_bigint(&BigInt::from(BigUint::from(n) * BigUint::from(n - 1))), wp);
        for (i, p) in self.powers.iter_mut().enumerate() {
            let j = i as u64 + 2;
            *p = p.mul_u64(j * j, wp);
        }
        self.n = n - 2;
    }
}

impl Iterator for BernoulliRev {
    type Item = (u64, BigRational);

    fn next(&mut self) -> Option<(u64, BigRational)> {
        if self.n < BERNOULLI_REV_MIN {
            return None;
        }
        self.retune();
        let abs = self.prefactor.mul(&self.zeta_from_table(), self.wp);
        let value = self.extract(&abs);
        let n = self.n;
        self.advance();
        Some((n, value))
    }
}
