//! Real and complex ball arithmetic.
//!
//! A ball is a midpoint/radius pair whose invariant — the true value lies
//! within `rad` of `mid` — is preserved by every operation: rounding error of
//! the midpoint computation is folded into the radius, and input radii are
//! propagated through derivative (Lipschitz) bounds. This is the numeric
//! substrate of the gamma engine; nothing in the crate performs unchecked
//! floating point.
//!
//! [`RealBall`] carries one real enclosure, [`ComplexBall`] a rectangular
//! (componentwise) complex one. Elementary functions live in `elem`,
//! complex arithmetic in `complex`.

use core::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::fp::{Fp, Round};
use crate::Mag;

mod complex;
mod elem;

#[cfg(test)]
mod tests;

pub use complex::ComplexBall;
pub use elem::{const_log2, const_log_sqrt2pi, const_pi};

/// Real number enclosure `[mid - rad, mid + rad]`.
///
/// # Example
///
/// ```
/// use certus::RealBall;
///
/// let third = RealBall::from_i64(1).div(&RealBall::from_i64(3), 64);
/// assert!(third.is_finite());
/// assert!(!third.is_exact()); // 1/3 is not a binary fraction
/// // the enclosure certifies the true value: 3 * (1/3) contains 1
/// assert!(third.mul(&RealBall::from_i64(3), 64).contains_f64(1.0));
/// ```
#[derive(Clone, Debug)]
pub struct RealBall {
    mid: Fp,
    rad: Mag,
}

impl RealBall {
    // ── Constructors ────────────────────────────────────────────────

    pub fn zero() -> Self {
        RealBall { mid: Fp::zero(), rad: Mag::zero() }
    }

    pub fn one() -> Self {
        RealBall { mid: Fp::one(), rad: Mag::zero() }
    }

    /// Exact ball (zero radius) around an [`Fp`] value.
    pub fn exact_fp(mid: Fp) -> Self {
        RealBall { mid, rad: Mag::zero() }
    }

    pub fn from_i64(v: i64) -> Self {
        Self::exact_fp(Fp::from_i64(v))
    }

    pub fn from_u64(v: u64) -> Self {
        Self::exact_fp(Fp::from_u64(v))
    }

    pub fn from_bigint(v: &BigInt) -> Self {
        Self::exact_fp(Fp::from_bigint(v))
    }

    /// Exact conversion from `f64` (finite input).
    pub fn from_f64(v: f64) -> Self {
        Self::exact_fp(Fp::from_f64(v))
    }

    /// Enclosure of an exact rational at `prec` bits.
    pub fn from_bigrational(q: &BigRational, prec: u32) -> Self {
        let n = Fp::from_bigint(q.numer());
        let d = Fp::from_bigint(q.denom());
        let (mid, err) = Fp::div(&n, &d, prec, Round::Nearest);
        RealBall { mid, rad: Mag::from_err_exp(err) }
    }

    /// The "anything" ball: NaN midpoint, infinite radius. Propagates
    /// through arithmetic without ever raising an error.
    pub fn indeterminate() -> Self {
        RealBall { mid: Fp::nan(), rad: Mag::inf() }
    }

    pub(crate) fn new_parts(mid: Fp, rad: Mag) -> Self {
        RealBall { mid, rad }
    }

    // ── Accessors and predicates ────────────────────────────────────

    pub fn mid(&self) -> &Fp {
        &self.mid
    }

    pub fn rad(&self) -> &Mag {
        &self.rad
    }

    pub fn is_exact(&self) -> bool {
        self.rad.is_zero()
    }

    pub fn is_finite(&self) -> bool {
        self.mid.is_finite() && self.rad.is_finite()
    }

    pub fn contains_zero(&self) -> bool {
        if !self.is_finite() {
            return true;
        }
        Fp::cmpabs(&self.mid, &self.rad.to_fp()) != Ordering::Greater
    }

    /// Entire enclosure strictly positive.
    pub fn is_positive(&self) -> bool {
        self.is_finite()
            && self.mid.signum() > 0
            && Fp::cmpabs(&self.mid, &self.rad.to_fp()) == Ordering::Greater
    }

    /// Entire enclosure strictly negative.
    pub fn is_negative(&self) -> bool {
        self.is_finite()
            && self.mid.signum() < 0
            && Fp::cmpabs(&self.mid, &self.rad.to_fp()) == Ordering::Greater
    }

    /// Enclosure may contain a value `<= 0`.
    pub fn contains_nonpositive(&self) -> bool {
        !self.is_positive()
    }

    /// Midpoint accuracy relative to the radius, in bits.
    pub fn rel_accuracy_bits(&self) -> i64 {
        if !self.is_finite() {
            return i64::MIN / 2;
        }
        if self.rad.is_zero() {
            return i64::MAX / 2;
        }
        let mid_mag = if self.mid.is_zero() { 0 } else { self.mid.mag_exp() };
        mid_mag - self.rad.mag_exp()
    }

    // ── Error management ────────────────────────────────────────────

    pub fn add_error(&mut self, e: Mag) {
        self.rad = self.rad.add(&e);
    }

    /// Re-round the midpoint to `prec` bits, folding the rounding error
    /// into the radius.
    pub fn set_round(&self, prec: u32) -> Self {
        let (mid, err) = self.mid.round(prec, Round::Nearest);
        RealBall { mid, rad: self.rad.add(&Mag::from_err_exp(err)) }
    }

    // ── Directed bounds ─────────────────────────────────────────────

    /// Upper bound of `|x|` over the enclosure.
    pub fn abs_ubound(&self) -> Mag {
        Mag::from_fp_upper(&self.mid).add(&self.rad)
    }

    /// Lower bound of `|x|` over the enclosure (zero if the enclosure
    /// contains zero), rounded toward zero.
    pub fn abs_lbound_fp(&self) -> Fp {
        if !self.is_finite() {
            return Fp::zero();
        }
        let (lb, _) = Fp::sub(&self.mid.abs(), &self.rad.to_fp(), crate::config::RAD_PREC, Round::Down);
        if lb.signum() <= 0 {
            Fp::zero()
        } else {
            lb
        }
    }

    /// Directed lower bound `mid - rad` (toward −∞).
    pub fn lower_fp(&self, prec: u32) -> Fp {
        Fp::sub(&self.mid, &self.rad.to_fp(), prec, Round::Floor).0
    }

    /// Directed upper bound `mid + rad` (toward +∞).
    pub fn upper_fp(&self, prec: u32) -> Fp {
        Fp::add(&self.mid, &self.rad.to_fp(), prec, Round::Ceil).0
    }

    // ── Containment ─────────────────────────────────────────────────

    /// Certified containment of an exact value. A `true` answer is
    /// rigorous; a `false` answer may be a near-boundary refusal.
    pub fn contains_fp(&self, x: &Fp) -> bool {
        if !self.is_finite() {
            return true;
        }
        if !x.is_finite() {
            return false;
        }
        let wp = (self.mid.man_bits().max(x.man_bits()).max(64) + 64).min(u32::MAX as u64) as u32;
        let (d, _) = Fp::sub(&self.mid, x, wp, Round::Up);
        Fp::cmpabs(&d, &self.rad.to_fp()) != Ordering::Greater
    }

    pub fn contains_f64(&self, x: f64) -> bool {
        self.contains_fp(&Fp::from_f64(x))
    }

    /// Two enclosures of the same quantity must overlap; used as a
    /// consistency check between independent evaluations.
    pub fn overlaps(&self, other: &RealBall) -> bool {
        if !self.is_finite() || !other.is_finite() {
            return true;
        }
        let wp = (self.mid.man_bits().max(other.mid.man_bits()).max(64) + 64)
            .min(u32::MAX as u64) as u32;
        let (d, _) = Fp::sub(&self.mid, &other.mid, wp, Round::Up);
        let sum = self.rad.add(&other.rad);
        Fp::cmpabs(&d, &sum.to_fp()) != Ordering::Greater
    }

    /// The unique integer contained in the enclosure, if there is exactly
    /// one candidate.
    pub fn unique_bigint(&self) -> Option<BigInt> {
        if !self.is_finite() {
            return None;
        }
        let wp = (self.mid.man_bits().max(64) + 64).min(u32::MAX as u64) as u32;
        let lo = self.lower_fp(wp);
        let hi = self.upper_fp(wp);
        let a = lo.to_bigint_round(Round::Ceil);
        let b = hi.to_bigint_round(Round::Floor);
        if a == b {
            Some(a)
        } else {
            None
        }
    }

    // ── Arithmetic ──────────────────────────────────────────────────

    pub fn neg(&self) -> Self {
        RealBall { mid: self.mid.neg(), rad: self.rad }
    }

    pub fn abs(&self) -> Self {
        RealBall { mid: self.mid.abs(), rad: self.rad }
    }

    pub fn mul_2exp(&self, k: i64) -> Self {
        RealBall { mid: self.mid.mul_2exp(k), rad: self.rad.mul_2exp(k) }
    }

    pub fn add(&self, other: &RealBall, prec: u32) -> Self {
        let (mid, err) = Fp::add(&self.mid, &other.mid, prec, Round::Nearest);
        let rad = self.rad.add(&other.rad).add(&Mag::from_err_exp(err));
        RealBall { mid, rad }
    }

    pub fn sub(&self, other: &RealBall, prec: u32) -> Self {
        self.add(&other.neg(), prec)
    }

    pub fn add_u64(&self, v: u64, prec: u32) -> Self {
        self.add(&RealBall::from_u64(v), prec)
    }

    pub fn sub_u64(&self, v: u64, prec: u32) -> Self {
        self.sub(&RealBall::from_u64(v), prec)
    }

    pub fn mul(&self, other: &RealBall, prec: u32) -> Self {
        let (mid, err) = Fp::mul(&self.mid, &other.mid, prec, Round::Nearest);
        // |xy - x̂ŷ| <= |x̂|·rb + |ŷ|·ra + ra·rb, plus midpoint rounding
        let am = Mag::from_fp_upper(&self.mid);
        let bm = Mag::from_fp_upper(&other.mid);
        let rad = am
            .mul(&other.rad)
            .add(&bm.mul(&self.rad))
            .add(&self.rad.mul(&other.rad))
            .add(&Mag::from_err_exp(err));
        RealBall { mid, rad }
    }

    pub fn mul_u64(&self, v: u64, prec: u32) -> Self {
        self.mul(&RealBall::from_u64(v), prec)
    }

    pub fn div_u64(&self, v: u64, prec: u32) -> Self {
        self.div(&RealBall::from_u64(v), prec)
    }

    /// Reciprocal. Indeterminate when the divisor may contain zero.
    pub fn inv(&self, prec: u32) -> Self {
        if !self.is_finite() || self.contains_zero() {
            return RealBall::indeterminate();
        }
        let (mid, err) = Fp::div(&Fp::one(), &self.mid, prec, Round::Nearest);
        // |1/x - 1/x̂| <= rad / (|x̂| (|x̂| - rad))
        let rp = crate::config::RAD_PREC;
        let absmid = self.mid.abs();
        let (lb, _) = Fp::sub(&absmid, &self.rad.to_fp(), rp, Round::Floor);
        let (den, _) = Fp::mul(&absmid, &lb, rp, Round::Floor);
        let (prop, _) = Fp::div(&self.rad.to_fp(), &den, rp, Round::Ceil);
        let rad = Mag::from_fp_upper(&prop).add(&Mag::from_err_exp(err));
        RealBall { mid, rad }
    }

    pub fn div(&self, other: &RealBall, prec: u32) -> Self {
        // one extra rounding versus a fused division; the radius tracks it
        self.mul(&other.inv(prec + 2), prec)
    }

    /// Square root. Indeterminate when the enclosure may reach below zero.
    pub fn sqrt(&self, prec: u32) -> Self {
        if !self.is_finite() {
            return RealBall::indeterminate();
        }
        if self.mid.is_zero() && self.rad.is_zero() {
            return RealBall::zero();
        }
        let rp = crate::config::RAD_PREC;
        let (lb, _) = Fp::sub(&self.mid, &self.rad.to_fp(), rp, Round::Floor);
        if lb.signum() <= 0 {
            return RealBall::indeterminate();
        }
        let (mid, err) = Fp::sqrt(&self.mid, prec, Round::Nearest);
        // |sqrt(x) - sqrt(x̂)| <= rad / (2 sqrt(lb))
        let (sl, _) = Fp::sqrt(&lb, rp, Round::Down);
        let (den, _) = Fp::mul(&Fp::from_i64(2), &sl, rp, Round::Floor);
        let (prop, _) = Fp::div(&self.rad.to_fp(), &den, rp, Round::Ceil);
        let rad = Mag::from_fp_upper(&prop).add(&Mag::from_err_exp(err));
        RealBall { mid, rad }
    }

    /// Integer power by binary exponentiation.
    pub fn pow_u64(&self, mut n: u64, prec: u32) -> Self {
        let wp = prec + 64 - (n | 1).leading_zeros();
        let mut acc = RealBall::one();
        let mut base = self.clone();
        while n > 0 {
            if n & 1 == 1 {
                acc = acc.mul(&base, wp);
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(&base, wp);
            }
        }
        acc.set_round(prec)
    }
}
