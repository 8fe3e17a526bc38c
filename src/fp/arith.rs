//! Rounded arithmetic on [`Fp`] values.
//!
//! Every operation returns the rounded result together with `Option<i64>`:
//! `Some(e)` bounds the absolute error by `2^e`, `None` means exact. Directed
//! modes additionally guarantee the side of the true value, which is what the
//! one-sided bound computations in the Stirling remainder rely on.

use core::cmp::Ordering;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::{Integer, Roots};
use num_traits::{One, Zero};

use super::round::{round_mantissa, MagDir, Round};
use super::{Class, Fp};

/// Exponent span beyond which addition stops aligning mantissas exactly and
/// treats the small operand as a directed perturbation.
fn far_span(prec: u32) -> u64 {
    prec as u64 + 64
}

impl Fp {
    /// Round `self` to `prec` bits.
    pub fn round(&self, prec: u32, rnd: Round) -> (Fp, Option<i64>) {
        match self.class {
            Class::Finite => {
                let (man, exp, err) =
                    round_mantissa(self.man.clone(), self.exp, self.neg, prec, rnd);
                (Fp::finite(self.neg, man, exp), err)
            }
            _ => (self.clone(), None),
        }
    }

    /// `a + b`, rounded.
    pub fn add(a: &Fp, b: &Fp, prec: u32, rnd: Round) -> (Fp, Option<i64>) {
        match (a.class, b.class) {
            (Class::Nan, _) | (_, Class::Nan) => (Fp::nan(), None),
            (Class::Inf, Class::Inf) => {
                if a.neg == b.neg {
                    (a.clone(), None)
                } else {
                    (Fp::nan(), None)
                }
            }
            (Class::Inf, _) => (a.clone(), None),
            (_, Class::Inf) => (b.clone(), None),
            (Class::Zero, _) => b.round(prec, rnd),
            (_, Class::Zero) => a.round(prec, rnd),
            (Class::Finite, Class::Finite) => {
                let (hi, lo) = if a.mag_exp() >= b.mag_exp() { (a, b) } else { (b, a) };
                let span = (hi.mag_exp() - lo.mag_exp()) as u64;
                if span > far_span(prec) {
                    Self::add_far(hi, lo, prec, rnd)
                } else {
                    Self::add_exact(a, b, prec, rnd)
                }
            }
        }
    }

    /// `a - b`, rounded.
    pub fn sub(a: &Fp, b: &Fp, prec: u32, rnd: Round) -> (Fp, Option<i64>) {
        Self::add(a, &b.neg(), prec, rnd)
    }

    fn add_exact(a: &Fp, b: &Fp, prec: u32, rnd: Round) -> (Fp, Option<i64>) {
        let e0 = a.exp.min(b.exp);
        let ia = signed_shifted(a, e0);
        let ib = signed_shifted(b, e0);
        let sum = ia + ib;
        match sum.sign() {
            Sign::NoSign => (Fp::zero(), None),
            sign => {
                let neg = sign == Sign::Minus;
                let (man, exp, err) =
                    round_mantissa(sum.magnitude().clone(), e0, neg, prec, rnd);
                (Fp::finite(neg, man, exp), err)
            }
        }
    }

    /// Dominant/negligible addition: round the dominant operand, then move
    /// one ulp in whatever direction the dropped operand demands, so the
    /// directed-rounding contract survives the shortcut.
    fn add_far(hi: &Fp, lo: &Fp, prec: u32, rnd: Round) -> (Fp, Option<i64>) {
        let (res, _) = hi.round(prec, rnd);
        let res = match rnd {
            Round::Nearest => res,
            Round::Floor => {
                if lo.neg {
                    nudge(&res, prec, true)
                } else {
                    res
                }
            }
            Round::Ceil => {
                if !lo.neg {
                    nudge(&res, prec, false)
                } else {
                    res
                }
            }
            Round::Down => {
                if lo.neg != hi.neg {
                    // perturbation shrinks the magnitude
                    nudge(&res, prec, !hi.neg)
                } else {
                    res
                }
            }
            Round::Up => {
                if lo.neg == hi.neg {
                    nudge(&res, prec, hi.neg)
                } else {
                    res
                }
            }
        };
        let err = res.mag_exp() - prec as i64 + 2;
        (res, Some(err))
    }

    /// `a * b`, rounded.
    pub fn mul(a: &Fp, b: &Fp, prec: u32, rnd: Round) -> (Fp, Option<i64>) {
        match (a.class, b.class) {
            (Class::Nan, _) | (_, Class::Nan) => (Fp::nan(), None),
            (Class::Inf, Class::Zero) | (Class::Zero, Class::Inf) => (Fp::nan(), None),
            (Class::Inf, _) | (_, Class::Inf) => {
                let mut r = Fp::pos_inf();
                r.neg = a.neg != b.neg;
                (r, None)
            }
            (Class::Zero, _) | (_, Class::Zero) => (Fp::zero(), None),
            (Class::Finite, Class::Finite) => {
                let neg = a.neg != b.neg;
                let man = &a.man * &b.man;
                let exp = a.exp.saturating_add(b.exp);
                let (man, exp, err) = round_mantissa(man, exp, neg, prec, rnd);
                (Fp::finite(neg, man, exp), err)
            }
        }
    }

    /// `a / b`, rounded. Division by zero and 0/0 yield NaN; the ball layer
    /// screens divisors that may contain zero before getting here.
    pub fn div(a: &Fp, b: &Fp, prec: u32, rnd: Round) -> (Fp, Option<i64>) {
        match (a.class, b.class) {
            (Class::Nan, _) | (_, Class::Nan) => (Fp::nan(), None),
            (_, Class::Zero) => (Fp::nan(), None),
            (Class::Inf, Class::Inf) => (Fp::nan(), None),
            (Class::Inf, _) => {
                let mut r = Fp::pos_inf();
                r.neg = a.neg != b.neg;
                (r, None)
            }
            (_, Class::Inf) => (Fp::zero(), None),
            (Class::Zero, _) => (Fp::zero(), None),
            (Class::Finite, Class::Finite) => {
                let neg = a.neg != b.neg;
                let abits = a.man.bits() as i64;
                let bbits = b.man.bits() as i64;
                let s = (prec as i64 + 2 + bbits - abits).max(0) as u64;
                let num: BigUint = &a.man << s;
                let (mut q, r) = num.div_rem(&b.man);
                let inexact = !r.is_zero();
                if inexact {
                    q |= BigUint::one();
                }
                let exp = a.exp - b.exp - s as i64;
                let (man, rexp, err) = round_mantissa(q, exp, neg, prec, rnd);
                let err = combine_sticky_err(err, inexact, exp);
                (Fp::finite(neg, man, rexp), err)
            }
        }
    }

    /// `sqrt(a)`, rounded. Negative input yields NaN.
    pub fn sqrt(a: &Fp, prec: u32, rnd: Round) -> (Fp, Option<i64>) {
        match a.class {
            Class::Nan => (Fp::nan(), None),
            Class::Zero => (Fp::zero(), None),
            Class::Inf => {
                if a.neg {
                    (Fp::nan(), None)
                } else {
                    (Fp::pos_inf(), None)
                }
            }
            Class::Finite => {
                if a.neg {
                    return (Fp::nan(), None);
                }
                let bits = a.man.bits();
                let mut k = (2 * (prec as u64 + 2)).saturating_sub(bits);
                if (a.exp - k as i64) % 2 != 0 {
                    k += 1;
                }
                let wide: BigUint = &a.man << k;
                let q = wide.sqrt();
                let inexact = &q * &q != wide;
                let mut q = q;
                if inexact {
                    q |= BigUint::one();
                }
                let exp = (a.exp - k as i64) / 2;
                let (man, rexp, err) = round_mantissa(q, exp, false, prec, rnd);
                let err = combine_sticky_err(err, inexact, exp);
                (Fp::finite(false, man, rexp), err)
            }
        }
    }

    // ── Comparisons ─────────────────────────────────────────────────

    /// Total order over non-NaN values; `None` if either side is NaN.
    pub fn cmp(a: &Fp, b: &Fp) -> Option<Ordering> {
        if a.is_nan() || b.is_nan() {
            return None;
        }
        let sa = a.signum();
        let sb = b.signum();
        if sa != sb {
            return Some(sa.cmp(&sb));
        }
        if sa == 0 {
            return Some(Ordering::Equal);
        }
        let mag = Self::cmpabs(a, b);
        Some(if sa > 0 { mag } else { mag.reverse() })
    }

    /// Compare `|a|` with `|b|` (neither NaN).
    pub fn cmpabs(a: &Fp, b: &Fp) -> Ordering {
        match (a.class, b.class) {
            (Class::Inf, Class::Inf) => Ordering::Equal,
            (Class::Inf, _) => Ordering::Greater,
            (_, Class::Inf) => Ordering::Less,
            (Class::Zero, Class::Zero) => Ordering::Equal,
            (Class::Zero, _) => Ordering::Less,
            (_, Class::Zero) => Ordering::Greater,
            (Class::Finite, Class::Finite) => {
                match a.mag_exp().cmp(&b.mag_exp()) {
                    Ordering::Equal => {
                        let e0 = a.exp.min(b.exp);
                        let ma: BigUint = &a.man << (a.exp - e0) as u64;
                        let mb: BigUint = &b.man << (b.exp - e0) as u64;
                        ma.cmp(&mb)
                    }
                    ord => ord,
                }
            }
            _ => unreachable!("NaN screened above"),
        }
    }

    /// Compare `|a|` with `2^e`.
    pub fn cmpabs_2exp(&self, e: i64) -> Ordering {
        match self.class {
            Class::Zero => Ordering::Less,
            Class::Inf | Class::Nan => Ordering::Greater,
            Class::Finite => {
                let me = self.mag_exp() - 1;
                match me.cmp(&e) {
                    Ordering::Equal => {
                        if self.man.is_one() {
                            Ordering::Equal
                        } else {
                            Ordering::Greater
                        }
                    }
                    ord => ord,
                }
            }
        }
    }

    /// Round to an integer. Panics on special values.
    pub fn to_bigint_round(&self, rnd: Round) -> BigInt {
        match self.class {
            Class::Zero => return BigInt::zero(),
            Class::Finite => {}
            _ => panic!("to_bigint_round of a special value"),
        }
        if self.exp >= 0 {
            let mag: BigUint = &self.man << self.exp as u64;
            return make_signed(self.neg, mag);
        }
        let drop = (-self.exp) as u64;
        let bits = self.man.bits();
        if drop >= bits {
            // |value| < 1
            let inc = match rnd.mag_dir(self.neg) {
                MagDir::Trunc => false,
                MagDir::Away => true,
                MagDir::Nearest => {
                    // >= 1/2 rounds away unless exactly 1/2 (ties to even 0)
                    self.mag_exp() == 0 && !self.man.is_one()
                }
            };
            return if inc {
                make_signed(self.neg, BigUint::one())
            } else {
                BigInt::zero()
            };
        }
        let mut hi: BigUint = &self.man >> drop;
        let inc = match rnd.mag_dir(self.neg) {
            MagDir::Trunc => false,
            MagDir::Away => true, // mantissa is odd, so the tail is nonzero
            MagDir::Nearest => {
                let guard = self.man.bit(drop - 1);
                if !guard {
                    false
                } else if self.man.trailing_zeros().unwrap_or(0) < drop - 1 {
                    true
                } else {
                    hi.bit(0)
                }
            }
        };
        if inc {
            hi += 1u32;
        }
        make_signed(self.neg, hi)
    }
}

fn make_signed(neg: bool, mag: BigUint) -> BigInt {
    let sign = if mag.is_zero() {
        Sign::NoSign
    } else if neg {
        Sign::Minus
    } else {
        Sign::Plus
    };
    BigInt::from_biguint(sign, mag)
}

fn signed_shifted(x: &Fp, e0: i64) -> BigInt {
    let mag: BigUint = &x.man << (x.exp - e0) as u64;
    make_signed(x.neg, mag)
}

fn combine_sticky_err(round_err: Option<i64>, inexact: bool, sticky_exp: i64) -> Option<i64> {
    if !inexact {
        return round_err;
    }
    Some(round_err.unwrap_or(i64::MIN).max(sticky_exp) + 1)
}

/// Move one ulp (at `prec` bits) toward −∞ (`downward`) or +∞.
fn nudge(x: &Fp, prec: u32, downward: bool) -> Fp {
    debug_assert!(x.class == Class::Finite);
    let bits = x.man.bits();
    let pad = (prec as u64).saturating_sub(bits);
    let man: BigUint = &x.man << pad;
    let exp = x.exp - pad as i64;
    let v: BigInt = make_signed(x.neg, man);
    let v: BigInt = if downward { v - 1 } else { v + 1 };
    match v.sign() {
        Sign::NoSign => Fp::zero(),
        sign => Fp::finite(sign == Sign::Minus, v.magnitude().clone(), exp),
    }
}
