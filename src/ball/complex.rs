//! Rectangular complex balls.
//!
//! A complex enclosure is a pair of real balls, one per component; every
//! derived bound (norms, arguments, branch handling) is stated against that
//! rectangle. The principal branch is used throughout: `log` and `arg` cut
//! along the negative real axis, and enclosures that straddle the cut
//! degrade to wide-but-valid results rather than lying.

use num_bigint::BigInt;

use crate::config::RAD_PREC;
use crate::fp::{Fp, Round};
use crate::Mag;

use super::elem::const_pi;
use super::RealBall;

/// Complex enclosure with independent real and imaginary balls.
#[derive(Clone, Debug)]
pub struct ComplexBall {
    re: RealBall,
    im: RealBall,
}

impl ComplexBall {
    // ── Constructors ────────────────────────────────────────────────

    pub fn new(re: RealBall, im: RealBall) -> Self {
        ComplexBall { re, im }
    }

    pub fn from_real(re: RealBall) -> Self {
        ComplexBall { re, im: RealBall::zero() }
    }

    pub fn from_i64(v: i64) -> Self {
        Self::from_real(RealBall::from_i64(v))
    }

    pub fn from_f64s(re: f64, im: f64) -> Self {
        ComplexBall { re: RealBall::from_f64(re), im: RealBall::from_f64(im) }
    }

    pub fn zero() -> Self {
        Self::from_real(RealBall::zero())
    }

    pub fn one() -> Self {
        Self::from_real(RealBall::one())
    }

    pub fn indeterminate() -> Self {
        ComplexBall { re: RealBall::indeterminate(), im: RealBall::indeterminate() }
    }

    // ── Accessors and predicates ────────────────────────────────────

    pub fn re(&self) -> &RealBall {
        &self.re
    }

    pub fn im(&self) -> &RealBall {
        &self.im
    }

    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Exactly real (imaginary part identically zero).
    pub fn is_real(&self) -> bool {
        self.im.mid().is_zero() && self.im.rad().is_zero()
    }

    pub fn contains_zero(&self) -> bool {
        self.re.contains_zero() && self.im.contains_zero()
    }

    /// The enclosure may touch the standard branch cut (negative real axis
    /// including the origin).
    pub fn touches_branch_cut(&self) -> bool {
        self.im.contains_zero() && self.re.contains_nonpositive()
    }

    pub fn rel_accuracy_bits(&self) -> i64 {
        self.re.rel_accuracy_bits().min(self.im.rel_accuracy_bits())
    }

    pub fn add_error(&mut self, e: Mag) {
        self.re.add_error(e);
        self.im.add_error(e);
    }

    pub fn set_round(&self, prec: u32) -> Self {
        ComplexBall { re: self.re.set_round(prec), im: self.im.set_round(prec) }
    }

    // ── Norm bounds ─────────────────────────────────────────────────

    /// Upper bound of `|z|`.
    pub fn abs_ubound(&self) -> Mag {
        if !self.is_finite() {
            return Mag::inf();
        }
        let ru = self.re.abs_ubound().to_fp();
        let iu = self.im.abs_ubound().to_fp();
        let (r2, _) = Fp::mul(&ru, &ru, RAD_PREC, Round::Up);
        let (i2, _) = Fp::mul(&iu, &iu, RAD_PREC, Round::Up);
        let (s, _) = Fp::add(&r2, &i2, RAD_PREC, Round::Up);
        let (h, _) = Fp::sqrt(&s, RAD_PREC, Round::Up);
        Mag::from_fp_upper(&h)
    }

    /// Lower bound of `|z|` (zero when the enclosure contains the origin),
    /// rounded down.
    pub fn abs_lbound_fp(&self) -> Fp {
        if !self.is_finite() {
            return Fp::zero();
        }
        let rl = self.re.abs_lbound_fp();
        let il = self.im.abs_lbound_fp();
        let (r2, _) = Fp::mul(&rl, &rl, RAD_PREC, Round::Down);
        let (i2, _) = Fp::mul(&il, &il, RAD_PREC, Round::Down);
        let (s, _) = Fp::add(&r2, &i2, RAD_PREC, Round::Down);
        Fp::sqrt(&s, RAD_PREC, Round::Down).0
    }

    // ── Ring operations ─────────────────────────────────────────────

    pub fn neg(&self) -> Self {
        ComplexBall { re: self.re.neg(), im: self.im.neg() }
    }

    pub fn conj(&self) -> Self {
        ComplexBall { re: self.re.clone(), im: self.im.neg() }
    }

    pub fn add(&self, other: &ComplexBall, prec: u32) -> Self {
        ComplexBall {
            re: self.re.add(&other.re, prec),
            im: self.im.add(&other.im, prec),
        }
    }

    pub fn sub(&self, other: &ComplexBall, prec: u32) -> Self {
        ComplexBall {
            re: self.re.sub(&other.re, prec),
            im: self.im.sub(&other.im, prec),
        }
    }

    pub fn add_real(&self, other: &RealBall, prec: u32) -> Self {
        ComplexBall { re: self.re.add(other, prec), im: self.im.clone() }
    }

    pub fn add_u64(&self, v: u64, prec: u32) -> Self {
        ComplexBall { re: self.re.add_u64(v, prec), im: self.im.clone() }
    }

    pub fn sub_u64(&self, v: u64, prec: u32) -> Self {
        ComplexBall { re: self.re.sub_u64(v, prec), im: self.im.clone() }
    }

    pub fn sub_bigint(&self, v: &BigInt, prec: u32) -> Self {
        ComplexBall {
            re: self.re.sub(&RealBall::from_bigint(v), prec),
            im: self.im.clone(),
        }
    }

    pub fn mul(&self, other: &ComplexBall, prec: u32) -> Self {
        let ac = self.re.mul(&other.re, prec);
        let bd = self.im.mul(&other.im, prec);
        let ad = self.re.mul(&other.im, prec);
        let bc = self.im.mul(&other.re, prec);
        ComplexBall { re: ac.sub(&bd, prec), im: ad.add(&bc, prec) }
    }

    pub fn mul_real(&self, other: &RealBall, prec: u32) -> Self {
        ComplexBall { re: self.re.mul(other, prec), im: self.im.mul(other, prec) }
    }

    pub fn mul_2exp(&self, k: i64) -> Self {
        ComplexBall { re: self.re.mul_2exp(k), im: self.im.mul_2exp(k) }
    }

    /// Reciprocal via the conjugate; indeterminate when the enclosure may
    /// contain zero.
    pub fn inv(&self, prec: u32) -> Self {
        if !self.is_finite() || self.contains_zero() {
            return ComplexBall::indeterminate();
        }
        let wp = prec + 4;
        let n2 = self.norm_sq(wp);
        let ninv = n2.inv(wp);
        ComplexBall {
            re: self.re.mul(&ninv, prec),
            im: self.im.neg().mul(&ninv, prec),
        }
    }

    pub fn div(&self, other: &ComplexBall, prec: u32) -> Self {
        self.mul(&other.inv(prec + 2), prec)
    }

    /// `re² + im²` as a real ball.
    pub fn norm_sq(&self, prec: u32) -> RealBall {
        let r2 = self.re.mul(&self.re, prec);
        let i2 = self.im.mul(&self.im, prec);
        r2.add(&i2, prec)
    }

    pub fn pow_u64(&self, mut n: u64, prec: u32) -> Self {
        let wp = prec + 64 - (n | 1).leading_zeros();
        let mut acc = ComplexBall::one();
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

    // ── Elementary functions ────────────────────────────────────────

    /// Principal argument.
    pub fn arg(&self, prec: u32) -> RealBall {
        RealBall::atan2(&self.im, &self.re, prec)
    }

    /// Principal logarithm: `log|z| + i arg z`.
    pub fn log(&self, prec: u32) -> Self {
        if !self.is_finite() {
            return ComplexBall::indeterminate();
        }
        let wp = prec + 8;
        let n2 = self.norm_sq(wp);
        let re = n2.log(wp).mul_2exp(-1);
        let im = self.arg(prec);
        ComplexBall { re: re.set_round(prec), im }
    }

    pub fn exp(&self, prec: u32) -> Self {
        if !self.is_finite() {
            return ComplexBall::indeterminate();
        }
        let wp = prec + 8;
        let er = self.re.exp(wp);
        let (s, c) = self.im.sin_cos(wp);
        ComplexBall {
            re: er.mul(&c, prec),
            im: er.mul(&s, prec),
        }
    }

    /// sin(πz) and cos(πz):
    /// `sin(π(x+iy)) = sin(πx)cosh(πy) + i cos(πx)sinh(πy)` and the cosine
    /// counterpart, with the real factors reduced modulo integers.
    pub fn sin_cos_pi(&self, prec: u32) -> (ComplexBall, ComplexBall) {
        if !self.is_finite() {
            return (ComplexBall::indeterminate(), ComplexBall::indeterminate());
        }
        let wp = prec + 8;
        let (sx, cx) = self.re.sin_cos_pi(wp);
        let t = self.im.mul(&const_pi(wp), wp);
        let (sh, ch) = t.sinh_cosh(wp);
        let sin = ComplexBall {
            re: sx.mul(&ch, prec),
            im: cx.mul(&sh, prec),
        };
        let cos = ComplexBall {
            re: cx.mul(&ch, prec),
            im: sx.mul(&sh, prec).neg(),
        };
        (sin, cos)
    }

    pub fn sin_pi(&self, prec: u32) -> ComplexBall {
        self.sin_cos_pi(prec).0
    }

    pub fn cot_pi(&self, prec: u32) -> ComplexBall {
        let wp = prec + 4;
        let (s, c) = self.sin_cos_pi(wp);
        c.div(&s, prec)
    }

    /// log sin(πz), continuous off the real axis, matching the branch the
    /// log-gamma reflection formula requires. For enclosures whose
    /// imaginary part straddles zero this falls back to the principal
    /// logarithm of `sin(πz)`.
    pub fn log_sin_pi(&self, prec: u32) -> ComplexBall {
        if !self.is_finite() {
            return ComplexBall::indeterminate();
        }
        let wp = prec + 8;
        let im_positive = self.im.is_positive();
        let im_negative = self.im.is_negative();
        if !im_positive && !im_negative {
            return self.sin_pi(wp).log(prec);
        }
        // shift the real midpoint into [-1/2, 1/2): picks up -iπn (upper
        // half plane) or +iπn (lower half plane)
        let half = Fp::pow2(-1);
        let (sh, _) = Fp::add(self.re.mid(), &half, u32::MAX, Round::Nearest);
        let n = sh.to_bigint_round(Round::Floor);
        let w = self.sub_bigint(&n, wp);
        let l = w.sin_pi(wp).log(wp);
        let npi = const_pi(wp).mul(&RealBall::from_bigint(&n), wp);
        let corrected_im = if im_positive {
            l.im.sub(&npi, prec)
        } else {
            l.im.add(&npi, prec)
        };
        ComplexBall { re: l.re.set_round(prec), im: corrected_im }
    }
}
