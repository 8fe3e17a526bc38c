//! Conversions between [`Fp`] and machine types.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use super::{Class, Fp};

/// Build `2.0^e` as an `f64`, saturating to 0 / ∞ outside the exponent range.
fn f64_pow2(e: i64) -> f64 {
    if e < -1100 {
        0.0
    } else if e > 1100 {
        f64::INFINITY
    } else if (-1022..=1023).contains(&e) {
        f64::from_bits(((e + 1023) as u64) << 52)
    } else {
        // subnormal / overflow margin: split the exponent
        let h = e / 2;
        f64_pow2(h) * f64_pow2(e - h)
    }
}

impl Fp {
    /// Nearest-`f64` approximation (midpoint proxy for the planner; the
    /// planner's large regime takes over before this can overflow
    /// meaningfully, so saturation to ±∞/0 is acceptable).
    pub fn to_f64(&self) -> f64 {
        match self.class {
            Class::Zero => 0.0,
            Class::Nan => f64::NAN,
            Class::Inf => {
                if self.neg {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }
            Class::Finite => {
                let bits = self.man.bits();
                let (top, top_exp) = if bits <= 53 {
                    (self.man.to_u64().expect("<= 53 bits"), self.exp)
                } else {
                    let drop = bits - 53;
                    let hi: BigUint = &self.man >> drop;
                    let mut hi = hi.to_u64().expect("53 bits");
                    // round to nearest on the dropped part
                    if self.man.bit(drop - 1) {
                        hi += 1;
                    }
                    (hi, self.exp + drop as i64)
                };
                let m = top as f64 * f64_pow2(top_exp);
                if self.neg {
                    -m
                } else {
                    m
                }
            }
        }
    }

    /// Exact conversion from `f64` (every finite `f64` is representable).
    pub fn from_f64(v: f64) -> Fp {
        if v == 0.0 {
            return Fp::zero();
        }
        if v.is_nan() {
            return Fp::nan();
        }
        if v.is_infinite() {
            return if v < 0.0 { Fp::neg_inf() } else { Fp::pos_inf() };
        }
        let bits = v.to_bits();
        let neg = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let frac = bits & ((1u64 << 52) - 1);
        let (man, exp) = if biased == 0 {
            (frac, -1074) // subnormal
        } else {
            (frac | (1u64 << 52), biased - 1075)
        };
        Fp::finite(neg, BigUint::from(man), exp)
    }

    /// Top `n` bits of the mantissa with the sticky flag, for magnitude
    /// conversions: returns `(top, mag_exp, inexact)` such that
    /// `|x| = (top + eps) * 2^(mag_exp - n)` with `0 <= eps < 1`,
    /// `eps > 0` iff `inexact`.
    pub(crate) fn top_bits(&self, n: u32) -> (u64, i64, bool) {
        debug_assert!(self.class == Class::Finite && n <= 63);
        let bits = self.man.bits();
        if bits <= n as u64 {
            let top = self.man.to_u64().expect("fits") << (n as u64 - bits);
            (top, self.mag_exp(), false)
        } else {
            let drop = bits - n as u64;
            let hi: BigUint = &self.man >> drop;
            (hi.to_u64().expect("fits"), self.mag_exp(), true)
        }
    }

    /// `true` when the value is zero or an exact multiple of `2^e`.
    pub fn is_multiple_of_2exp(&self, e: i64) -> bool {
        match self.class {
            Class::Zero => true,
            Class::Finite => self.exp >= e,
            _ => false,
        }
    }

    /// Nonnegative integer extraction for exact small arguments.
    pub fn to_u64_exact(&self) -> Option<u64> {
        match self.class {
            Class::Zero => Some(0),
            Class::Finite if !self.neg && self.exp >= 0 && self.mag_exp() <= 63 => {
                let v: BigUint = &self.man << self.exp as u64;
                v.to_u64()
            }
            _ => None,
        }
    }
}

impl Default for Fp {
    fn default() -> Self {
        Fp::zero()
    }
}

impl core::fmt::Display for Fp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.class {
            Class::Zero => write!(f, "0"),
            Class::Nan => write!(f, "nan"),
            Class::Inf => write!(f, "{}inf", if self.neg { "-" } else { "+" }),
            Class::Finite => {
                if self.man.bits() <= 53 {
                    write!(f, "{}", self.to_f64())
                } else {
                    write!(
                        f,
                        "{}{} * 2^{}",
                        if self.neg { "-" } else { "" },
                        self.man,
                        self.exp
                    )
                }
            }
        }
    }
}

impl Fp {
    pub(crate) fn is_zero_class(&self) -> bool {
        self.class == Class::Zero
    }
}

impl Zero for Fp {
    fn zero() -> Self {
        Fp::zero()
    }

    fn is_zero(&self) -> bool {
        self.is_zero_class()
    }
}

impl core::ops::Add for Fp {
    type Output = Fp;

    /// Exact addition (unbounded precision); used by `Zero` and test code.
    fn add(self, rhs: Fp) -> Fp {
        Fp::add(&self, &rhs, u32::MAX, super::Round::Nearest).0
    }
}
