//! Scalar seam between the real and complex ball types.
//!
//! Algorithms that are literally the same formula over [`RealBall`] and
//! [`ComplexBall`] — the rising-factorial evaluators above all — are written
//! once against [`BallRing`]. The trait exposes only ring structure plus the
//! precision-carrying entry points; anything branch- or ordering-sensitive
//! (logarithms, argument bounds) stays on the concrete types.

use num_bigint::BigInt;

use crate::ball::{ComplexBall, RealBall};

/// Ring operations over a ball type at an explicit working precision.
pub trait BallRing: Clone + Send + Sync + core::fmt::Debug {
    fn zero() -> Self;
    fn one() -> Self;
    fn from_bigint(v: &BigInt) -> Self;

    fn add(&self, other: &Self, prec: u32) -> Self;
    fn sub(&self, other: &Self, prec: u32) -> Self;
    fn mul(&self, other: &Self, prec: u32) -> Self;

    /// Shift by a small nonnegative integer, the rising-factorial step.
    fn add_u64(&self, v: u64, prec: u32) -> Self;

    /// Exact scaling by 2^k.
    fn mul_2exp(&self, k: i64) -> Self;

    /// Re-round the midpoint, folding the rounding error into the radius.
    fn set_round(&self, prec: u32) -> Self;

    fn is_finite(&self) -> bool;
}

impl BallRing for RealBall {
    fn zero() -> Self {
        RealBall::zero()
    }

    fn one() -> Self {
        RealBall::one()
    }

    fn from_bigint(v: &BigInt) -> Self {
        RealBall::from_bigint(v)
    }

    fn add(&self, other: &Self, prec: u32) -> Self {
        RealBall::add(self, other, prec)
    }

    fn sub(&self, other: &Self, prec: u32) -> Self {
        RealBall::sub(self, other, prec)
    }

    fn mul(&self, other: &Self, prec: u32) -> Self {
        RealBall::mul(self, other, prec)
    }

    fn add_u64(&self, v: u64, prec: u32) -> Self {
        RealBall::add_u64(self, v, prec)
    }

    fn mul_2exp(&self, k: i64) -> Self {
        RealBall::mul_2exp(self, k)
    }

    fn set_round(&self, prec: u32) -> Self {
        RealBall::set_round(self, prec)
    }

    fn is_finite(&self) -> bool {
        RealBall::is_finite(self)
    }
}

impl BallRing for ComplexBall {
    fn zero() -> Self {
        ComplexBall::zero()
    }

    fn one() -> Self {
        ComplexBall::one()
    }

    fn from_bigint(v: &BigInt) -> Self {
        ComplexBall::from_real(RealBall::from_bigint(v))
    }

    fn add(&self, other: &Self, prec: u32) -> Self {
        ComplexBall::add(self, other, prec)
    }

    fn sub(&self, other: &Self, prec: u32) -> Self {
        ComplexBall::sub(self, other, prec)
    }

    fn mul(&self, other: &Self, prec: u32) -> Self {
        ComplexBall::mul(self, other, prec)
    }

    fn add_u64(&self, v: u64, prec: u32) -> Self {
        ComplexBall::add_u64(self, v, prec)
    }

    fn mul_2exp(&self, k: i64) -> Self {
        ComplexBall::mul_2exp(self, k)
    }

    fn set_round(&self, prec: u32) -> Self {
        ComplexBall::set_round(self, prec)
    }

    fn is_finite(&self) -> bool {
        ComplexBall::is_finite(self)
    }
}
