//! Arbitrary-precision binary floating point with directed rounding.
//!
//! [`Fp`] is the midpoint type of the ball layer: an exact value
//! `(-1)^sign * mantissa * 2^exp` with an odd-normalized [`BigUint`] mantissa
//! and an `i64` exponent, plus zero / ±infinity / NaN classes. Every rounding
//! operation takes a precision in bits and a [`Round`] mode and reports an
//! upper bound on the committed rounding error, so callers can fold the error
//! into a ball radius.
//!
//! The companion [`crate::Mag`] type carries radii and one-sided bounds; this
//! module stays two-sided and exact-by-default.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

mod arith;
mod convert;
mod round;


pub use round::Round;
pub(crate) use round::{round_mantissa, MagDir};

/// Value class of an [`Fp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Class {
    Zero,
    Finite,
    Inf,
    Nan,
}

/// Arbitrary-precision binary float.
///
/// Finite values are `(-1)^neg * man * 2^exp` with `man` odd (normalized);
/// this makes representations canonical, so `==` is value equality.
/// Special values carry an empty mantissa.
///
/// # Example
///
/// ```
/// use certus::fp::{Fp, Round};
///
/// let a = Fp::from_i64(3);
/// let b = Fp::from_i64(4);
/// let (q, err) = Fp::div(&a, &b, 53, Round::Nearest);
/// assert_eq!(q.to_f64(), 0.75);
/// assert!(err.is_none()); // 3/4 is exact in binary
/// ```
#[derive(Clone, Debug)]
pub struct Fp {
    class: Class,
    neg: bool,
    man: BigUint,
    exp: i64,
}

impl Fp {
    // ── Constructors ────────────────────────────────────────────────

    pub fn zero() -> Self {
        Fp { class: Class::Zero, neg: false, man: BigUint::zero(), exp: 0 }
    }

    pub fn nan() -> Self {
        Fp { class: Class::Nan, neg: false, man: BigUint::zero(), exp: 0 }
    }

    pub fn pos_inf() -> Self {
        Fp { class: Class::Inf, neg: false, man: BigUint::zero(), exp: 0 }
    }

    pub fn neg_inf() -> Self {
        Fp { class: Class::Inf, neg: true, man: BigUint::zero(), exp: 0 }
    }

    /// Exact power of two, `2^e`.
    pub fn pow2(e: i64) -> Self {
        Fp { class: Class::Finite, neg: false, man: BigUint::one(), exp: e }
    }

    pub fn one() -> Self {
        Fp::pow2(0)
    }

    /// Exact value `(-1)^neg * man * 2^exp`; normalizes the mantissa.
    pub fn from_man_exp(neg: bool, man: BigUint, exp: i64) -> Self {
        Self::finite(neg, man, exp)
    }

    pub fn from_bigint(v: &BigInt) -> Self {
        match v.sign() {
            Sign::NoSign => Fp::zero(),
            Sign::Plus => Self::finite(false, v.magnitude().clone(), 0),
            Sign::Minus => Self::finite(true, v.magnitude().clone(), 0),
        }
    }

    pub fn from_biguint(v: &BigUint) -> Self {
        Self::finite(false, v.clone(), 0)
    }

    pub fn from_u64(v: u64) -> Self {
        Self::finite(false, BigUint::from(v), 0)
    }

    pub fn from_i64(v: i64) -> Self {
        Self::finite(v < 0, BigUint::from(v.unsigned_abs()), 0)
    }

    /// Internal: build a finite value, normalizing to an odd mantissa
    /// (empty mantissa collapses to zero).
    fn finite(neg: bool, man: BigUint, exp: i64) -> Self {
        if man.is_zero() {
            return Fp::zero();
        }
        let tz = man.trailing_zeros().unwrap_or(0);
        Fp { class: Class::Finite, neg, man: man >> tz, exp: exp + tz as i64 }
    }

    // ── Predicates and accessors ────────────────────────────────────

    pub fn is_zero(&self) -> bool {
        self.class == Class::Zero
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.class, Class::Zero | Class::Finite)
    }

    pub fn is_nan(&self) -> bool {
        self.class == Class::Nan
    }

    pub fn is_inf(&self) -> bool {
        self.class == Class::Inf
    }

    pub fn is_special(&self) -> bool {
        !matches!(self.class, Class::Finite)
    }

    /// Sign: −1, 0 or +1 (NaN reports 0).
    pub fn signum(&self) -> i32 {
        match self.class {
            Class::Zero | Class::Nan => 0,
            _ => {
                if self.neg {
                    -1
                } else {
                    1
                }
            }
        }
    }

    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    /// Binary magnitude exponent: the unique `e` with `2^(e-1) <= |x| < 2^e`.
    ///
    /// Panics on special values; callers branch on [`Fp::is_special`] first.
    pub fn mag_exp(&self) -> i64 {
        assert!(self.class == Class::Finite, "mag_exp of a special value");
        self.exp + self.man.bits() as i64
    }

    /// Number of mantissa bits of the normalized representation.
    pub fn man_bits(&self) -> u64 {
        self.man.bits()
    }

    /// True when the value is a (possibly negative) integer.
    pub fn is_integer(&self) -> bool {
        match self.class {
            Class::Zero => true,
            Class::Finite => self.exp >= 0,
            _ => false,
        }
    }

    // ── Sign manipulation ───────────────────────────────────────────

    pub fn neg(&self) -> Self {
        let mut r = self.clone();
        if !r.is_nan() && !r.is_zero() {
            r.neg = !r.neg;
        }
        r
    }

    pub fn abs(&self) -> Self {
        let mut r = self.clone();
        if !r.is_nan() {
            r.neg = false;
        }
        r
    }

    /// Exact multiplication by `2^k`.
    pub fn mul_2exp(&self, k: i64) -> Self {
        let mut r = self.clone();
        if r.class == Class::Finite {
            r.exp += k;
        }
        r
    }
}

impl PartialEq for Fp {
    fn eq(&self, other: &Self) -> bool {
        // NaN != NaN; canonical normalization makes the rest structural.
        match (self.class, other.class) {
            (Class::Nan, _) | (_, Class::Nan) => false,
            (a, b) if a != b => false,
            (Class::Zero, Class::Zero) => true,
            _ => self.neg == other.neg && self.exp == other.exp && self.man == other.man,
        }
    }
}
