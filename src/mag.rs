//! Coarse non-negative magnitudes with one-sided (upward) rounding.
//!
//! [`Mag`] is the radius type of every ball and the currency of every error
//! bound in the crate: a 30-bit mantissa and an `i64` exponent, so arithmetic
//! is a handful of word operations, and every operation rounds **up** — the
//! result is always an upper bound for the exact one. Whenever a lower bound
//! is needed instead (divisor magnitudes, phase bounds), the caller works in
//! directed-rounding [`Fp`](crate::fp::Fp) and converts.

use core::cmp::Ordering;

use crate::config::MAG_BITS;
use crate::fp::Fp;

const ONE_HALF_MAN: u64 = 1 << (MAG_BITS - 1);
const MAN_LIMIT: u64 = 1 << MAG_BITS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Zero,
    Finite,
    Inf,
}

/// Upper-bound magnitude: `man * 2^(exp - MAG_BITS)` with
/// `2^(MAG_BITS-1) <= man < 2^MAG_BITS`, i.e. the value lies in
/// `[2^(exp-1), 2^exp)`. Zero and +∞ are explicit.
#[derive(Clone, Copy, Debug)]
pub struct Mag {
    kind: Kind,
    man: u64,
    exp: i64,
}

impl Mag {
    // ── Constructors ────────────────────────────────────────────────

    pub fn zero() -> Self {
        Mag { kind: Kind::Zero, man: 0, exp: 0 }
    }

    pub fn inf() -> Self {
        Mag { kind: Kind::Inf, man: 0, exp: 0 }
    }

    /// Exactly `2^e`.
    pub fn pow2(e: i64) -> Self {
        Mag { kind: Kind::Finite, man: ONE_HALF_MAN, exp: e.saturating_add(1) }
    }

    pub fn one() -> Self {
        Mag::pow2(0)
    }

    pub fn from_u64_upper(v: u64) -> Self {
        if v == 0 {
            return Mag::zero();
        }
        let bits = 64 - v.leading_zeros() as u64;
        if bits <= MAG_BITS as u64 {
            Mag::normalized(v << (MAG_BITS as u64 - bits), bits as i64)
        } else {
            let drop = bits - MAG_BITS as u64;
            let kept = v >> drop;
            let sticky = v != kept << drop;
            Mag::normalized(kept + sticky as u64, bits as i64)
        }
    }

    /// Upper bound of `|x|`. NaN maps to +∞ (unknown magnitude).
    pub fn from_fp_upper(x: &Fp) -> Self {
        if x.is_zero() {
            return Mag::zero();
        }
        if x.is_special() {
            return Mag::inf();
        }
        let (top, mag_exp, inexact) = x.top_bits(MAG_BITS);
        Mag::normalized(top + inexact as u64, mag_exp)
    }

    /// Upper bound of `2^e` for the error exponent returned by `Fp` ops.
    pub fn from_err_exp(e: Option<i64>) -> Self {
        match e {
            None => Mag::zero(),
            Some(e) => Mag::pow2(e),
        }
    }

    fn normalized(mut man: u64, mut exp: i64) -> Self {
        debug_assert!(man > 0);
        while man >= MAN_LIMIT {
            man = (man + 1) >> 1;
            exp = exp.saturating_add(1);
        }
        while man < ONE_HALF_MAN {
            man <<= 1;
            exp = exp.saturating_sub(1);
        }
        Mag { kind: Kind::Finite, man, exp }
    }

    // ── Predicates and accessors ────────────────────────────────────

    pub fn is_zero(&self) -> bool {
        self.kind == Kind::Zero
    }

    pub fn is_inf(&self) -> bool {
        self.kind == Kind::Inf
    }

    pub fn is_finite(&self) -> bool {
        self.kind != Kind::Inf
    }

    /// The unique `e` with `2^(e-1) <= value < 2^e` (finite nonzero only).
    pub fn mag_exp(&self) -> i64 {
        assert!(self.kind == Kind::Finite, "mag_exp of zero/inf magnitude");
        self.exp
    }

    /// Upper `f64` approximation (saturating).
    pub fn to_f64_upper(&self) -> f64 {
        match self.kind {
            Kind::Zero => 0.0,
            Kind::Inf => f64::INFINITY,
            Kind::Finite => {
                let m = (self.man + 1) as f64;
                let e = self.exp - MAG_BITS as i64;
                if e > 1020 {
                    f64::INFINITY
                } else if e < -1070 {
                    // round up, never to zero
                    f64::MIN_POSITIVE
                } else {
                    m * f64::from_bits(((e + 1023) as u64) << 52)
                }
            }
        }
    }

    /// Exact conversion into an [`Fp`] (the representation is exact).
    pub fn to_fp(&self) -> Fp {
        match self.kind {
            Kind::Zero => Fp::zero(),
            Kind::Inf => Fp::pos_inf(),
            Kind::Finite => {
                Fp::from_man_exp(false, self.man.into(), self.exp - MAG_BITS as i64)
            }
        }
    }

    // ── Upward arithmetic ───────────────────────────────────────────

    pub fn add(&self, other: &Mag) -> Mag {
        match (self.kind, other.kind) {
            (Kind::Inf, _) | (_, Kind::Inf) => Mag::inf(),
            (Kind::Zero, _) => *other,
            (_, Kind::Zero) => *self,
            (Kind::Finite, Kind::Finite) => {
                let (hi, lo) = if self.exp >= other.exp { (self, other) } else { (other, self) };
                let d = (hi.exp - lo.exp) as u64;
                let add = if d >= MAG_BITS as u64 + 2 {
                    1 // dropped operand bounded by one ulp of hi
                } else {
                    (lo.man >> d) + 1
                };
                Mag::normalized(hi.man + add, hi.exp)
            }
        }
    }

    pub fn mul(&self, other: &Mag) -> Mag {
        match (self.kind, other.kind) {
            (Kind::Zero, _) | (_, Kind::Zero) => Mag::zero(),
            (Kind::Inf, _) | (_, Kind::Inf) => Mag::inf(),
            (Kind::Finite, Kind::Finite) => {
                let p = self.man as u128 * other.man as u128;
                let man = (p >> MAG_BITS) as u64 + 1;
                Mag::normalized(man, self.exp.saturating_add(other.exp))
            }
        }
    }

    pub fn mul_2exp(&self, k: i64) -> Mag {
        match self.kind {
            Kind::Finite => Mag { kind: Kind::Finite, man: self.man, exp: self.exp.saturating_add(k) },
            _ => *self,
        }
    }

    pub fn pow_u64(&self, mut n: u64) -> Mag {
        let mut acc = Mag::one();
        let mut base = *self;
        while n > 0 {
            if n & 1 == 1 {
                acc = acc.mul(&base);
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(&base);
            }
        }
        acc
    }

    pub fn max(&self, other: &Mag) -> Mag {
        if self.cmp(other) == Ordering::Less {
            *other
        } else {
            *self
        }
    }

    // ── Comparisons ─────────────────────────────────────────────────

    pub fn cmp(&self, other: &Mag) -> Ordering {
        match (self.kind, other.kind) {
            (Kind::Inf, Kind::Inf) => Ordering::Equal,
            (Kind::Inf, _) => Ordering::Greater,
            (_, Kind::Inf) => Ordering::Less,
            (Kind::Zero, Kind::Zero) => Ordering::Equal,
            (Kind::Zero, _) => Ordering::Less,
            (_, Kind::Zero) => Ordering::Greater,
            (Kind::Finite, Kind::Finite) => {
                self.exp.cmp(&other.exp).then(self.man.cmp(&other.man))
            }
        }
    }

    /// Compare against `2^e`.
    pub fn cmp_pow2(&self, e: i64) -> Ordering {
        match self.kind {
            Kind::Zero => Ordering::Less,
            Kind::Inf => Ordering::Greater,
            Kind::Finite => match (self.exp - 1).cmp(&e) {
                Ordering::Equal => {
                    if self.man == ONE_HALF_MAN {
                        Ordering::Equal
                    } else {
                        Ordering::Greater
                    }
                }
                ord => ord,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow2_roundtrip() {
        let m = Mag::pow2(5);
        assert_eq!(m.cmp_pow2(5), Ordering::Equal);
        let f = m.to_f64_upper();
        assert!((32.0..32.001).contains(&f));
    }

    #[test]
    fn addition_is_upper_bound() {
        let a = Mag::from_u64_upper(3);
        let b = Mag::from_u64_upper(5);
        let s = a.add(&b);
        assert!(s.to_f64_upper() >= 8.0);
        // coarse, but not wildly so
        assert!(s.to_f64_upper() < 8.0 * (1.0 + 1e-6));
    }

    #[test]
    fn multiplication_is_upper_bound() {
        let a = Mag::from_u64_upper(7);
        let b = Mag::from_u64_upper(9);
        let p = a.mul(&b);
        assert!(p.to_f64_upper() >= 63.0);
        assert!(p.to_f64_upper() < 63.0 * (1.0 + 1e-6));
    }

    #[test]
    fn far_add_bumps_one_ulp() {
        let big = Mag::pow2(100);
        let tiny = Mag::pow2(-100);
        let s = big.add(&tiny);
        assert_eq!(s.cmp(&big), Ordering::Greater);
        assert_eq!(s.cmp_pow2(101), Ordering::Less);
    }

    #[test]
    fn from_fp_upper_covers_value() {
        let x = Fp::from_f64(1.0 / 3.0);
        let m = Mag::from_fp_upper(&x);
        assert!(m.to_f64_upper() >= 1.0 / 3.0);
        let exact = Fp::from_i64(4);
        let m = Mag::from_fp_upper(&exact);
        assert_eq!(m.cmp_pow2(2), Ordering::Equal);
    }

    #[test]
    fn pow_u64_monotone() {
        // upward rounding may overshoot slightly but never undershoots
        let half = Mag::pow2(-1);
        let p = half.pow_u64(10);
        assert_ne!(p.cmp_pow2(-10), Ordering::Less);
        assert_eq!(p.cmp_pow2(-9), Ordering::Less);
        assert_eq!(Mag::one().pow_u64(0).cmp_pow2(0), Ordering::Equal);
    }

    #[test]
    fn inf_and_zero_absorb() {
        assert!(Mag::inf().add(&Mag::zero()).is_inf());
        assert!(Mag::inf().mul(&Mag::zero()).is_zero());
        assert!(Mag::zero().add(&Mag::zero()).is_zero());
    }
}
