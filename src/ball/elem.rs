//! Certified elementary functions on real balls.
//!
//! Structure shared by every function here: the midpoint is run through a
//! series kernel evaluated *in ball arithmetic* at a guarded working
//! precision (so midpoint rounding is tracked automatically), an explicit
//! truncation bound enters the radius, and the input radius is propagated
//! through a Lipschitz bound on the derivative. Constants are computed by
//! rational series with first-omitted-term tails and memoized against a
//! precision high-water mark.

use std::sync::Mutex;

use num_bigint::BigUint;
use num_integer::Integer;

use crate::config::{ELEM_GUARD_BITS, EXP_REDUCE_TARGET, RAD_PREC};
use crate::fp::{Fp, Round};
use crate::Mag;

use super::RealBall;

// ── Cached constants ────────────────────────────────────────────────

static PI_CACHE: Mutex<Option<(u32, RealBall)>> = Mutex::new(None);
static LOG2_CACHE: Mutex<Option<(u32, RealBall)>> = Mutex::new(None);
static LOG_SQRT2PI_CACHE: Mutex<Option<(u32, RealBall)>> = Mutex::new(None);

fn cached_const(
    cache: &Mutex<Option<(u32, RealBall)>>,
    prec: u32,
    compute: fn(u32) -> RealBall,
) -> RealBall {
    let mut guard = cache.lock().unwrap();
    if let Some((cached_prec, value)) = guard.as_ref() {
        if *cached_prec >= prec {
            return value.set_round(prec);
        }
    }
    let wp = prec + 32;
    let value = compute(wp);
    let out = value.set_round(prec);
    *guard = Some((wp, value));
    out
}

/// π as a ball.
///
/// ```
/// use certus::ball::const_pi;
/// assert!(const_pi(64).contains_f64(core::f64::consts::PI));
/// ```
pub fn const_pi(prec: u32) -> RealBall {
    cached_const(&PI_CACHE, prec, compute_pi)
}

/// log 2 as a ball.
pub fn const_log2(prec: u32) -> RealBall {
    cached_const(&LOG2_CACHE, prec, compute_log2)
}

/// log √(2π) as a ball.
pub fn const_log_sqrt2pi(prec: u32) -> RealBall {
    cached_const(&LOG_SQRT2PI_CACHE, prec, compute_log_sqrt2pi)
}

/// Alternating Gregory series for atan(1/q), tail bounded by the first
/// omitted term.
fn atan_inv_u64(q: u64, wp: u32) -> RealBall {
    let qsq = BigUint::from(q) * BigUint::from(q);
    let mut qpow = BigUint::from(q);
    let mut sum = RealBall::zero();
    let mut k = 0u64;
    loop {
        let denom = &qpow * BigUint::from(2 * k + 1);
        if denom.bits() > wp as u64 + 2 {
            // |next term| <= 1/denom <= 2^-(wp+2)
            sum.add_error(Mag::pow2(-(wp as i64) - 2));
            return sum;
        }
        let term = RealBall::from_bigint(&denom.into()).inv(wp);
        sum = if k % 2 == 0 { sum.add(&term, wp) } else { sum.sub(&term, wp) };
        qpow *= &qsq;
        k += 1;
    }
}

/// Machin's formula: π = 16 atan(1/5) − 4 atan(1/239).
fn compute_pi(wp: u32) -> RealBall {
    let a = atan_inv_u64(5, wp + 8).mul_2exp(4);
    let b = atan_inv_u64(239, wp + 8).mul_2exp(2);
    a.sub(&b, wp)
}

/// log 2 = 2 atanh(1/3) = Σ 2 / ((2k+1) 3^(2k+1)).
fn compute_log2(wp: u32) -> RealBall {
    let mut pow3 = BigUint::from(3u32);
    let nine = BigUint::from(9u32);
    let mut sum = RealBall::zero();
    let mut k = 0u64;
    loop {
        let denom = &pow3 * BigUint::from(2 * k + 1);
        if denom.bits() > wp as u64 + 3 {
            // remaining tail < 2 * 2^-(wp+3) * 9/8
            sum.add_error(Mag::pow2(-(wp as i64) - 1));
            return sum;
        }
        let term = RealBall::from_bigint(&denom.into()).inv(wp).mul_2exp(1);
        sum = sum.add(&term, wp);
        pow3 *= &nine;
        k += 1;
    }
}

fn compute_log_sqrt2pi(wp: u32) -> RealBall {
    // log √(2π) = (log 2 + log π) / 2
    let pi = const_pi(wp + 8);
    let logpi = pi.log(wp + 4);
    logpi.add(&const_log2(wp + 4), wp).mul_2exp(-1)
}

// ── Elementary functions ────────────────────────────────────────────

impl RealBall {
    /// Exponential function.
    pub fn exp(&self, prec: u32) -> RealBall {
        if !self.is_finite() {
            return RealBall::indeterminate();
        }
        let wp = prec + ELEM_GUARD_BITS;
        let mut out = exp_fp(&self.mid, wp);
        if !self.rad.is_zero() {
            // |exp(x) - exp(x̂)| <= exp(ub) * rad
            let ub = self.upper_fp(RAD_PREC);
            out.add_error(exp_mag_upper(&ub).mul(&self.rad));
        }
        out.set_round(prec)
    }

    /// Natural logarithm. Indeterminate unless the enclosure is strictly
    /// positive.
    pub fn log(&self, prec: u32) -> RealBall {
        if !self.is_finite() {
            return RealBall::indeterminate();
        }
        let lb = self.lower_fp(RAD_PREC);
        if lb.signum() <= 0 {
            return RealBall::indeterminate();
        }
        let wp = prec + ELEM_GUARD_BITS;
        let mut out = log_fp(&self.mid, wp);
        if !self.rad.is_zero() {
            // |log'| <= 1/lb on the enclosure
            let (prop, _) = Fp::div(&self.rad.to_fp(), &lb, RAD_PREC, Round::Ceil);
            out.add_error(Mag::from_fp_upper(&prop));
        }
        out.set_round(prec)
    }

    /// Simultaneous sine and cosine.
    pub fn sin_cos(&self, prec: u32) -> (RealBall, RealBall) {
        if !self.is_finite() {
            return (RealBall::indeterminate(), RealBall::indeterminate());
        }
        // unresolvable phase: fall back to the trivial enclosure
        if self.rad.cmp_pow2(0) != core::cmp::Ordering::Less {
            return (unit_ball(), unit_ball());
        }
        let wp = prec + ELEM_GUARD_BITS;
        let (mut s, mut c) = sin_cos_fp(&self.mid, wp);
        if !self.rad.is_zero() {
            s.add_error(self.rad);
            c.add_error(self.rad);
        }
        (s.set_round(prec), c.set_round(prec))
    }

    pub fn sin(&self, prec: u32) -> RealBall {
        self.sin_cos(prec).0
    }

    pub fn cos(&self, prec: u32) -> RealBall {
        self.sin_cos(prec).1
    }

    /// sin(πx) and cos(πx), reduced modulo integers before the
    /// multiplication by π so huge arguments stay cheap and exact.
    pub fn sin_cos_pi(&self, prec: u32) -> (RealBall, RealBall) {
        if !self.is_finite() {
            return (RealBall::indeterminate(), RealBall::indeterminate());
        }
        if self.rad.cmp_pow2(-2) != core::cmp::Ordering::Less {
            return (unit_ball(), unit_ball());
        }
        let wp = prec + ELEM_GUARD_BITS;
        let n = self.mid.to_bigint_round(Round::Nearest);
        let (frac, _) = Fp::sub(&self.mid, &Fp::from_bigint(&n), u32::MAX, Round::Nearest);
        let r = RealBall::new_parts(frac, self.rad);
        let t = r.mul(&const_pi(wp), wp);
        let (s, c) = t.sin_cos(prec + 2);
        if n.is_odd() {
            (s.neg().set_round(prec), c.neg().set_round(prec))
        } else {
            (s.set_round(prec), c.set_round(prec))
        }
    }

    pub fn sin_pi(&self, prec: u32) -> RealBall {
        self.sin_cos_pi(prec).0
    }

    pub fn cos_pi(&self, prec: u32) -> RealBall {
        self.sin_cos_pi(prec).1
    }

    /// cot(πx); indeterminate across the poles at integers.
    pub fn cot_pi(&self, prec: u32) -> RealBall {
        let wp = prec + 4;
        let (s, c) = self.sin_cos_pi(wp);
        c.div(&s, prec)
    }

    /// Inverse tangent.
    pub fn atan(&self, prec: u32) -> RealBall {
        if !self.is_finite() {
            return RealBall::indeterminate();
        }
        let wp = prec + ELEM_GUARD_BITS;
        let mut out = atan_fp(&self.mid, wp);
        if !self.rad.is_zero() {
            out.add_error(self.rad); // |atan'| <= 1
        }
        out.set_round(prec)
    }

    /// Principal-value atan2 over balls. Enclosures touching the origin are
    /// indeterminate; enclosures straddling the negative real axis return
    /// the conservative `[-π, π]` ball.
    pub fn atan2(y: &RealBall, x: &RealBall, prec: u32) -> RealBall {
        if !x.is_finite() || !y.is_finite() {
            return RealBall::indeterminate();
        }
        let wp = prec + 8;
        if x.is_positive() {
            return y.div(x, wp).atan(prec);
        }
        if y.is_positive() {
            // atan2 = π/2 − atan(x/y)
            let half_pi = const_pi(wp).mul_2exp(-1);
            return half_pi.sub(&x.div(y, wp).atan(wp), prec);
        }
        if y.is_negative() {
            let half_pi = const_pi(wp).mul_2exp(-1);
            return half_pi.neg().sub(&x.div(y, wp).atan(wp), prec);
        }
        if x.is_negative() {
            // straddles the cut: every principal value fits in [-π, π]
            let mut out = RealBall::zero();
            out.add_error(const_pi(RAD_PREC).abs_ubound());
            return out;
        }
        RealBall::indeterminate()
    }

    /// sinh and cosh via the exponential.
    pub fn sinh_cosh(&self, prec: u32) -> (RealBall, RealBall) {
        if !self.is_finite() {
            return (RealBall::indeterminate(), RealBall::indeterminate());
        }
        let wp = prec + 8;
        let e = self.exp(wp);
        let ei = e.inv(wp);
        let c = e.add(&ei, wp).mul_2exp(-1);
        let s = e.sub(&ei, wp).mul_2exp(-1);
        (s.set_round(prec), c.set_round(prec))
    }

    /// `x^y = exp(y log x)` for strictly positive `x`.
    pub fn pow(&self, y: &RealBall, prec: u32) -> RealBall {
        let wp = prec + 8;
        self.log(wp).mul(y, wp).exp(prec)
    }
}

fn unit_ball() -> RealBall {
    let mut b = RealBall::zero();
    b.add_error(Mag::one());
    b
}

/// Upper bound for `exp(x)` as a magnitude: `2^(x·log2 e + 2)`.
fn exp_mag_upper(x: &Fp) -> Mag {
    if x.is_special() {
        return if x.signum() < 0 { Mag::zero() } else { Mag::inf() };
    }
    let l2 = x.to_f64() * core::f64::consts::LOG2_E;
    if l2 > 4.0e18 {
        return Mag::inf();
    }
    Mag::pow2(l2.ceil() as i64 + 2)
}

// ── Midpoint kernels ────────────────────────────────────────────────

/// exp of an exact value: halve the argument below `2^-EXP_REDUCE_TARGET`,
/// run the Taylor series with a two-term tail, square back up.
fn exp_fp(x: &Fp, wp: u32) -> RealBall {
    if x.is_zero() {
        return RealBall::one();
    }
    let me = x.mag_exp();
    if me >= 62 {
        // magnitudes beyond any realistic working range
        return if x.signum() < 0 {
            let mut b = RealBall::zero();
            b.add_error(exp_mag_upper(x));
            b
        } else {
            RealBall::indeterminate()
        };
    }
    let s = (me + EXP_REDUCE_TARGET as i64).max(0) as u32;
    let wp2 = wp + 2 * s + 8;
    let xr = RealBall::exact_fp(x.mul_2exp(-(s as i64)));

    let mut sum = RealBall::one();
    let mut term = RealBall::one();
    let mut k = 1u64;
    loop {
        term = term.mul(&xr, wp2).div_u64(k, wp2);
        sum = sum.add(&term, wp2);
        let tb = term.abs_ubound();
        if tb.cmp_pow2(-(wp2 as i64)) == core::cmp::Ordering::Less {
            // remaining tail is dominated by a geometric series of ratio
            // |x| <= 1/16
            sum.add_error(tb.mul_2exp(1));
            break;
        }
        k += 1;
    }
    for _ in 0..s {
        sum = sum.mul(&sum, wp2);
    }
    sum
}

/// log of an exact positive value via `log x = e·log 2 + 2 atanh(u)`,
/// `u = (m-1)/(m+1)` with the mantissa scaled into [3/4, 3/2).
fn log_fp(x: &Fp, wp: u32) -> RealBall {
    debug_assert!(x.signum() > 0);
    let wp2 = wp + 8;
    let mut e = x.mag_exp();
    let mut m = x.mul_2exp(-e);
    if Fp::cmp(&m, &Fp::from_f64(0.75)) == Some(core::cmp::Ordering::Less) {
        m = m.mul_2exp(1);
        e -= 1;
    }
    let mb = RealBall::exact_fp(m);
    let u = mb.sub(&RealBall::one(), wp2).div(&mb.add(&RealBall::one(), wp2), wp2);
    let usq = u.mul(&u, wp2);

    let mut sum = u.clone();
    let mut t = u;
    let mut k = 1u64;
    loop {
        t = t.mul(&usq, wp2);
        let term = t.div_u64(2 * k + 1, wp2);
        sum = sum.add(&term, wp2);
        let tb = term.abs_ubound();
        if tb.cmp_pow2(-(wp2 as i64)) == core::cmp::Ordering::Less {
            // ratio u² <= 1/25: tail < term * 25/24
            sum.add_error(tb.mul_2exp(1));
            break;
        }
        k += 1;
    }
    let atanh2 = sum.mul_2exp(1);
    if e == 0 {
        atanh2
    } else {
        atanh2.add(&const_log2(wp2).mul(&RealBall::from_i64(e), wp2), wp)
    }
}

/// Simultaneous sin/cos of an exact value: halve below
/// `2^-EXP_REDUCE_TARGET`, Taylor both series with alternating tails,
/// reassemble by double-angle steps.
fn sin_cos_fp(x: &Fp, wp: u32) -> (RealBall, RealBall) {
    if x.is_zero() {
        return (RealBall::zero(), RealBall::one());
    }
    let me = x.mag_exp();
    if me > wp as i64 + 64 {
        // cannot resolve the phase at any reasonable cost
        return (unit_ball(), unit_ball());
    }
    let s = (me + EXP_REDUCE_TARGET as i64).max(0) as u32;
    let wp2 = wp + 2 * s + 8;
    let xr = RealBall::exact_fp(x.mul_2exp(-(s as i64)));
    let xsq = xr.mul(&xr, wp2);

    // sin: t_0 = x, t_{k+1} = -t_k x² / ((2k+2)(2k+3))
    // cos: u_0 = 1, u_{k+1} = -u_k x² / ((2k+1)(2k+2))
    let mut sin_sum = xr.clone();
    let mut cos_sum = RealBall::one();
    let mut ts = xr.clone();
    let mut tc = RealBall::one();
    let mut k = 0u64;
    loop {
        ts = ts.mul(&xsq, wp2).div_u64((2 * k + 2) * (2 * k + 3), wp2).neg();
        tc = tc.mul(&xsq, wp2).div_u64((2 * k + 1) * (2 * k + 2), wp2).neg();
        sin_sum = sin_sum.add(&ts, wp2);
        cos_sum = cos_sum.add(&tc, wp2);
        let bs = ts.abs_ubound();
        let bc = tc.abs_ubound();
        if bs.cmp_pow2(-(wp2 as i64)) == core::cmp::Ordering::Less
            && bc.cmp_pow2(-(wp2 as i64)) == core::cmp::Ordering::Less
        {
            // alternating with decreasing terms: tail bounded by the next term
            sin_sum.add_error(bs);
            cos_sum.add_error(bc);
            break;
        }
        k += 1;
    }

    let mut sn = sin_sum;
    let mut cs = cos_sum;
    for _ in 0..s {
        let s2 = sn.mul(&cs, wp2).mul_2exp(1);
        let c2 = RealBall::one().sub(&sn.mul(&sn, wp2).mul_2exp(1), wp2);
        sn = s2;
        cs = c2;
    }
    (sn, cs)
}

/// atan of an exact value: reflect |x| > 1 through π/2 − atan(1/x), halve
/// the argument with t ← t/(1+√(1+t²)), then the Gregory series.
fn atan_fp(x: &Fp, wp: u32) -> RealBall {
    if x.is_zero() {
        return RealBall::zero();
    }
    let neg = x.signum() < 0;
    let a = x.abs();
    let wp2 = wp + 8;

    let r = if a.cmpabs_2exp(0) == core::cmp::Ordering::Greater {
        let inv = RealBall::exact_fp(a).inv(wp2);
        let half_pi = const_pi(wp2).mul_2exp(-1);
        half_pi.sub(&atan_small(inv, wp2), wp2)
    } else {
        atan_small(RealBall::exact_fp(a), wp2)
    };
    if neg {
        r.neg()
    } else {
        r
    }
}

// accepts |t| <= 1 and shrinks it below 2^-3 by angle halving
fn atan_small(mut t: RealBall, wp: u32) -> RealBall {
    let mut halvings = 0u32;
    while t.abs_ubound().cmp_pow2(-3) != core::cmp::Ordering::Less && halvings < 8 {
        let denom = RealBall::one().add(
            &RealBall::one().add(&t.mul(&t, wp), wp).sqrt(wp),
            wp,
        );
        t = t.div(&denom, wp);
        halvings += 1;
    }

    let tsq = t.mul(&t, wp);
    let mut sum = t.clone();
    let mut pow = t;
    let mut k = 1u64;
    loop {
        pow = pow.mul(&tsq, wp).neg();
        let term = pow.div_u64(2 * k + 1, wp);
        sum = sum.add(&term, wp);
        let tb = term.abs_ubound();
        if tb.cmp_pow2(-(wp as i64)) == core::cmp::Ordering::Less {
            sum.add_error(tb); // alternating tail
            break;
        }
        k += 1;
    }
    sum.mul_2exp(halvings as i64)
}
