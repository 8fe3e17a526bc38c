//! Complex gamma, log-gamma and digamma, including the reflection branch
//! correction for log-gamma.

use crate::ball::{const_pi, ComplexBall, RealBall};
use crate::config::LGAMMA_PHASE_PREC;
use crate::rising::rising;
use crate::stirling::{choose_param, eval_complex};

use super::real::{bit_count, digamma_real, gamma_real, log_gamma_real};

/// Γ(z) over a complex enclosure.
pub fn gamma(z: &ComplexBall, prec: u32) -> ComplexBall {
    if z.is_real() {
        return ComplexBall::from_real(gamma_real(z.re(), prec));
    }
    if !z.is_finite() {
        return ComplexBall::indeterminate();
    }

    let acc = z.rel_accuracy_bits().clamp(0, prec as i64) as u32;
    let wp0 = prec.min(acc + 20).max(2);
    let wp = wp0 + bit_count(wp0);

    let plan = if acc < 3 {
        super::real::coarse_plan(z.re().mid())
    } else {
        choose_param(z, true, false, wp)
    };

    if plan.reflect {
        // gamma(z) = pi rf(1-z, r) / (gamma(1-z+r) sin(pi z))
        let t = ComplexBall::one().sub(z, wp);
        let u = rising(&t, plan.shift, wp).mul_real(&const_pi(wp), wp);
        let lg = eval_complex(&t.add_u64(plan.shift, wp), plan.terms, false, wp);
        let rg = lg.neg().exp(wp);
        let s = z.sin_pi(wp);
        u.mul(&rg, wp).div(&s, prec)
    } else {
        // gamma(z) = gamma(z+r) / rf(z, r)
        let lg = eval_complex(&z.add_u64(plan.shift, wp), plan.terms, false, wp);
        let g = lg.exp(wp);
        g.div(&rising(z, plan.shift, wp), prec)
    }
}

/// Phase sum Σ_{k<r} arg(z+k) at a given precision.
fn phase_sum(z: &ComplexBall, r: u64, prec: u32) -> RealBall {
    let mut u = RealBall::zero();
    for k in 0..r {
        u = u.add(&z.add_u64(k, prec).arg(prec), prec);
    }
    u
}

/// log of the rising factorial with the branch matched to
/// Σ_{k<r} log(z+k): the principal log of the product can land on the
/// wrong branch, and the summed factor phases give the correct imaginary
/// part. The deviation is snapped to a unique multiple of π from a cheap
/// low-precision phase sum; when the snap is not unique, the phase sum is
/// recomputed at full precision instead of guessing.
fn log_rising(z: &ComplexBall, r: u64, prec: u32) -> ComplexBall {
    if r == 0 {
        return ComplexBall::zero();
    }
    let naive = rising(z, r, prec).log(prec);
    if !naive.is_finite() {
        return ComplexBall::indeterminate();
    }

    let argprec = prec.min(LGAMMA_PHASE_PREC);
    let coarse = phase_sum(z, r, argprec);
    if argprec == prec {
        return ComplexBall::new(naive.re().clone(), coarse);
    }

    let deviation = coarse.sub(naive.im(), argprec).div(&const_pi(argprec), argprec);
    match deviation.unique_bigint() {
        Some(mult) => {
            let corr = const_pi(prec).mul(&RealBall::from_bigint(&mult), prec);
            ComplexBall::new(naive.re().clone(), naive.im().add(&corr, prec))
        }
        None => {
            log::debug!(
                "log-gamma branch correction ambiguous for shift {r}, \
                 recomputing the phase sum at {prec} bits"
            );
            ComplexBall::new(naive.re().clone(), phase_sum(z, r, prec))
        }
    }
}

/// log Γ(z), continuous on the cut plane (principal branch).
pub fn log_gamma(z: &ComplexBall, prec: u32) -> ComplexBall {
    if z.is_real() && z.re().is_positive() {
        return ComplexBall::from_real(log_gamma_real(z.re(), prec));
    }
    if !z.is_finite() {
        return ComplexBall::indeterminate();
    }

    let wp = prec + bit_count(prec);
    let plan = choose_param(z, true, false, wp);

    if plan.reflect {
        // log gamma(z) = log rf(1-z, r) - log gamma(1-z+r)
        //               - log sin(pi z) + log pi
        let u = ComplexBall::one().sub(z, wp);
        let lr = log_rising(&u, plan.shift, wp);
        let lg = eval_complex(&u.add_u64(plan.shift, wp), plan.terms, false, wp);
        let ls = z.log_sin_pi(wp);
        let log_pi = const_pi(wp).log(wp);
        lr.sub(&lg, wp).sub(&ls, wp).add_real(&log_pi, prec)
    } else {
        // log gamma(z) = log gamma(z+r) - log rf(z, r)
        let lg = eval_complex(&z.add_u64(plan.shift, wp), plan.terms, false, wp);
        lg.sub(&log_rising(z, plan.shift, wp), prec)
    }
}

/// Σ_{k<r} 1/(z+k).
fn harmonic_shift(z: &ComplexBall, r: u64, prec: u32) -> ComplexBall {
    let mut sum = ComplexBall::zero();
    for k in 0..r {
        sum = sum.add(&z.add_u64(k, prec).inv(prec), prec);
    }
    sum
}

/// ψ(z) over a complex enclosure.
pub fn digamma(z: &ComplexBall, prec: u32) -> ComplexBall {
    if z.is_real() {
        return ComplexBall::from_real(digamma_real(z.re(), prec));
    }
    if !z.is_finite() {
        return ComplexBall::indeterminate();
    }

    let wp = prec + bit_count(prec);
    let plan = choose_param(z, true, true, wp);

    if plan.reflect {
        // psi(z) = psi(1-z) - pi cot(pi z)
        let u = ComplexBall::one().sub(z, wp);
        let refl = z.cot_pi(wp).mul_real(&const_pi(wp), wp);
        let s = eval_complex(&u.add_u64(plan.shift, wp), plan.terms, true, wp);
        let h = harmonic_shift(&u, plan.shift, wp);
        s.sub(&h, wp).sub(&refl, prec)
    } else {
        let s = eval_complex(&z.add_u64(plan.shift, wp), plan.terms, true, wp);
        s.sub(&harmonic_shift(z, plan.shift, wp), prec)
    }
}
