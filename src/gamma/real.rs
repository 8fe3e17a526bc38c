//! Real-argument gamma, log-gamma and digamma.
//!
//! Real input stays on the real evaluators: the branch-cut degeneracies of
//! the complex rectangle (poles at nonpositive integers) are then detected
//! on the real line, and no imaginary component is carried around.

use core::cmp::Ordering;

use num_bigint::BigInt;

use crate::ball::{const_pi, RealBall};
use crate::bernoulli;
use crate::config::GAMMA_EXACT_INT_LIMIT;
use crate::fp::Fp;
use crate::rising::rising;
use crate::stirling::{choose_param_real, eval_real, StirlingPlan};

pub(crate) fn bit_count(v: u32) -> u32 {
    32 - v.leading_zeros()
}

/// Exact Γ(n) = (n−1)! for exact small positive integers; indeterminate at
/// the poles. `None` when no fast path applies.
fn exact_fast_path(x: &RealBall) -> Option<RealBall> {
    if !x.is_exact() {
        return None;
    }
    let mid = x.mid();
    if let Some(n) = mid.to_u64_exact() {
        if n == 0 {
            return Some(RealBall::indeterminate());
        }
        if n <= GAMMA_EXACT_INT_LIMIT {
            return Some(RealBall::from_bigint(&BigInt::from(bernoulli::factorial(n - 1))));
        }
    }
    if mid.is_integer() && mid.signum() <= 0 {
        return Some(RealBall::indeterminate());
    }
    None
}

/// Low-accuracy plan: with almost no usable bits in the input there is no
/// point scanning for terms; a one-term series keeps the divisions from
/// blowing up.
pub(super) fn coarse_plan(mid: &Fp) -> StirlingPlan {
    if Fp::cmp(mid, &Fp::from_f64(-0.5)) == Some(Ordering::Less) {
        StirlingPlan { reflect: true, shift: 0, terms: 1 }
    } else if Fp::cmp(mid, &Fp::one()) == Some(Ordering::Less) {
        StirlingPlan { reflect: false, shift: 1, terms: 1 }
    } else {
        StirlingPlan { reflect: false, shift: 0, terms: 1 }
    }
}

/// Γ(x) over a real enclosure.
pub fn gamma_real(x: &RealBall, prec: u32) -> RealBall {
    if !x.is_finite() {
        return RealBall::indeterminate();
    }
    if let Some(fast) = exact_fast_path(x) {
        return fast;
    }

    let acc = x.rel_accuracy_bits().clamp(0, prec as i64) as u32;
    let wp0 = prec.min(acc + 20).max(2);
    let wp = wp0 + bit_count(wp0);

    let plan = if acc < 3 {
        coarse_plan(x.mid())
    } else {
        choose_param_real(x, true, false, wp)
    };

    if plan.reflect {
        // gamma(x) = pi rf(1-x, r) / (gamma(1-x+r) sin(pi x))
        let t = RealBall::one().sub(x, wp);
        let u = rising(&t, plan.shift, wp).mul(&const_pi(wp), wp);
        let lg = eval_real(&t.add_u64(plan.shift, wp), plan.terms, false, wp);
        let rg = lg.neg().exp(wp);
        let s = x.sin_pi(wp);
        u.mul(&rg, wp).div(&s, prec)
    } else {
        // gamma(x) = gamma(x+r) / rf(x, r)
        let lg = eval_real(&x.add_u64(plan.shift, wp), plan.terms, false, wp);
        let g = lg.exp(wp);
        g.div(&rising(x, plan.shift, wp), prec)
    }
}

/// log Γ(x); defined on the real line only for strictly positive
/// enclosures, everything else is indeterminate.
pub fn log_gamma_real(x: &RealBall, prec: u32) -> RealBall {
    if !x.is_finite() || !x.is_positive() {
        return RealBall::indeterminate();
    }
    let wp = prec + bit_count(prec);
    let plan = choose_param_real(x, false, false, wp);

    // log gamma(x) = log gamma(x+r) - log rf(x, r); the product is positive
    // on a positive enclosure, so the plain real logarithm is the right one
    let lg = eval_real(&x.add_u64(plan.shift, wp), plan.terms, false, wp);
    if plan.shift == 0 {
        return lg.set_round(prec);
    }
    let lr = rising(x, plan.shift, wp).log(wp);
    lg.sub(&lr, prec)
}

/// Σ_{k<r} 1/(x+k), the shift correction of the digamma recurrence.
fn harmonic_shift(x: &RealBall, r: u64, prec: u32) -> RealBall {
    let mut sum = RealBall::zero();
    for k in 0..r {
        sum = sum.add(&x.add_u64(k, prec).inv(prec), prec);
    }
    sum
}

/// ψ(x) over a real enclosure.
pub fn digamma_real(x: &RealBall, prec: u32) -> RealBall {
    if !x.is_finite() {
        return RealBall::indeterminate();
    }
    if x.is_exact() && x.mid().is_integer() && x.mid().signum() <= 0 {
        return RealBall::indeterminate();
    }
    let wp = prec + bit_count(prec);
    let plan = choose_param_real(x, true, true, wp);

    if plan.reflect {
        // psi(x) = psi(1-x) - pi cot(pi x)
        let u = RealBall::one().sub(x, wp);
        let refl = x.cot_pi(wp).mul(&const_pi(wp), wp);
        let s = eval_real(&u.add_u64(plan.shift, wp), plan.terms, true, wp);
        let h = harmonic_shift(&u, plan.shift, wp);
        s.sub(&h, wp).sub(&refl, prec)
    } else {
        // psi(x) = psi(x+r) - sum_{k<r} 1/(x+k)
        let s = eval_real(&x.add_u64(plan.shift, wp), plan.terms, true, wp);
        s.sub(&harmonic_shift(x, plan.shift, wp), prec)
    }
}
