//! Rigorous remainder bounds for the truncated asymptotic series.
//!
//! For truncation at n terms the remainder of the order-k derivative is
//! bounded by
//!
//! ```text
//! 2 |B₂ₙ| Γ(2n+k−1) / (Γ(k+1) Γ(2n+1)) · |z| · c^(2n+k)
//! ```
//!
//! with c an upper bound for 1/(cos(arg(z)/2)·|z|). Everything is computed
//! in upward-rounded [`Mag`] / directed [`Fp`] arithmetic, so each bound is
//! a guaranteed overestimate. The same magnitude is applied to both radius
//! components of a complex result.

use crate::ball::{ComplexBall, RealBall};
use crate::config::RAD_PREC;
use crate::fp::{Fp, Round};
use crate::Mag;

/// Upper bound for sec(arg(z)/2) = √(1 + tan²(arg(z)/2)) over the whole
/// enclosure, from sign-dependent directed bounds of the components. The
/// worst case is the corner of the rectangle closest to the negative real
/// axis; an enclosure touching it yields +∞.
pub fn phase_bound(z: &ComplexBall) -> Mag {
    let prec = RAD_PREC;

    // real lower bound: the argument grows as the real part shrinks
    let (x, _) = Fp::sub(z.re().mid(), &z.re().rad().to_fp(), prec, Round::Floor);
    let xsign = x.signum();

    // imaginary bound: away from the axis for x >= 0, toward it for x < 0
    let y = if xsign >= 0 {
        z.im().abs_ubound().to_fp()
    } else {
        z.im().abs_lbound_fp()
    };

    if y.is_zero() {
        return if xsign > 0 { Mag::one() } else { Mag::inf() };
    }

    // t = tan(arg/2): y / (sqrt(x^2+y^2) + x) rounded up, via directed
    // intermediates whose direction depends on which side x sits
    let t = if xsign >= 0 {
        let (x2, _) = Fp::mul(&x, &x, prec, Round::Down);
        let (y2, _) = Fp::mul(&y, &y, prec, Round::Down);
        let (s, _) = Fp::add(&x2, &y2, prec, Round::Down);
        let (h, _) = Fp::sqrt(&s, prec, Round::Down);
        let (d, _) = Fp::add(&h, &x, prec, Round::Down);
        Fp::div(&y, &d, prec, Round::Up).0
    } else {
        // equivalent form (sqrt(x^2+y^2) - x) / y avoids cancellation
        let (x2, _) = Fp::mul(&x, &x, prec, Round::Up);
        let (y2, _) = Fp::mul(&y, &y, prec, Round::Up);
        let (s, _) = Fp::add(&x2, &y2, prec, Round::Up);
        let (h, _) = Fp::sqrt(&s, prec, Round::Up);
        let (d, _) = Fp::sub(&h, &x, prec, Round::Up);
        Fp::div(&d, &y, prec, Round::Up).0
    };

    let (t2, _) = Fp::mul(&t, &t, prec, Round::Up);
    let (t2p1, _) = Fp::add(&t2, &Fp::one(), prec, Round::Up);
    let (sec, _) = Fp::sqrt(&t2p1, prec, Round::Up);
    Mag::from_fp_upper(&sec)
}

/// Upward-rounded n! as a magnitude.
fn fac_ubound(n: u64) -> Mag {
    let mut f = Mag::one();
    for i in 2..=n {
        f = f.mul(&Mag::from_u64_upper(i));
    }
    f
}

/// Upward magnitude division by a positive directed lower bound.
fn div_lower(a: &Mag, lower: &Fp) -> Mag {
    if lower.signum() <= 0 {
        return Mag::inf();
    }
    let (q, _) = Fp::div(&a.to_fp(), lower, RAD_PREC, Round::Up);
    Mag::from_fp_upper(&q)
}

fn div_u64_upper(a: &Mag, v: u64) -> Mag {
    div_lower(a, &Fp::from_u64(v))
}

/// Upper bound for |B₂ₙ|/(2n)! = 2 ζ(2n)/(2π)^(2n) ≤ 4 (2π)^(−2n).
fn bernoulli_div_fac(n2: u64) -> Mag {
    let pi = crate::ball::const_pi(RAD_PREC);
    let two_pi_lb = pi.mul_2exp(1).lower_fp(RAD_PREC);
    let (inv, _) = Fp::div(&Fp::one(), &two_pi_lb, RAD_PREC, Round::Up);
    Mag::from_fp_upper(&inv).pow_u64(n2).mul_2exp(2)
}

/// Remainder magnitudes for a jet of `knum` derivative orders starting at
/// `k0`, for truncation at `n` terms. Enclosures that may straddle the
/// branch cut get +∞ everywhere.
pub fn stirling_bound(z: &ComplexBall, k0: u64, knum: usize, n: u64) -> Vec<Mag> {
    debug_assert!(n >= 1 && knum >= 1);
    if z.touches_branch_cut() {
        return vec![Mag::inf(); knum];
    }

    // 1/|z| as an upper bound via the directed lower bound of |z|
    let zlb = z.abs_lbound_fp();
    if zlb.signum() <= 0 {
        return vec![Mag::inf(); knum];
    }

    // c = sec(arg/2) / |z|
    let c = div_lower(&phase_bound(z), &zlb);

    let mut err = Vec::with_capacity(knum);
    let mut e = bernoulli_div_fac(2 * n).mul_2exp(1);
    if 2 * n + k0 >= 2 {
        e = e.mul(&fac_ubound(2 * n + k0 - 2));
    }
    e = e.mul(&z.abs_ubound());
    e = div_lower(&e, &Fp::from_biguint(&crate::bernoulli::factorial(k0)));
    e = e.mul(&c.pow_u64(2 * n + k0));
    err.push(e);

    for i in 1..knum {
        let k = k0 + i as u64;
        let prev = err[i - 1];
        let next = div_u64_upper(&prev.mul(&c).mul(&Mag::from_u64_upper(2 * n + k - 2)), k);
        err.push(next);
    }
    err
}

/// Real-argument wrapper: bound through the complex rectangle with a zero
/// imaginary component.
pub fn stirling_bound_real(x: &RealBall, k0: u64, knum: usize, n: u64) -> Vec<Mag> {
    let z = ComplexBall::from_real(x.clone());
    stirling_bound(&z, k0, knum, n)
}
