//! Certified rising factorial x(x+1)···(x+m−1).
//!
//! Three evaluation strategies with identical semantics, chosen by the pure
//! sizing function [`choose_strategy`]:
//!
//! - [`Strategy::Simple`] — binary-splitting product tree, parallel via the
//!   fork-join pool; the shape of the tree is fixed, so results are
//!   bit-identical for any worker count.
//! - [`Strategy::EightTerm`] — blocks of eight consecutive factors through
//!   the closed form x(x+1)···(x+7) = (28+98x+63x²+14x³+x⁴)² − 16(7+2x)²,
//!   trading eight ball multiplications for a handful of additions and two
//!   squarings per block.
//! - [`Strategy::Rectangular`] — baby-step/giant-step over the exact
//!   degree-`step` rising polynomial, for long products at high precision.
//!
//! Everything is generic over [`BallRing`], so the same code serves the
//! real and the complex evaluators.

use crate::config::{RISING_BSPLIT_BASECASE, RISING_EIGHT_MIN, RISING_RS_MIN, RISING_RS_MIN_PREC};
use crate::pool;
use crate::traits::BallRing;

mod poly;

#[cfg(test)]
mod tests;

pub use poly::{rising_coefficients, rising_rectangular};

/// Evaluation plan for a rising factorial; selection is a pure performance
/// decision with no effect on the result's correctness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Simple,
    EightTerm,
    Rectangular { step: u64 },
}

/// Pure sizing function mapping (factor count, precision) to a strategy.
pub fn choose_strategy(m: u64, prec: u32) -> Strategy {
    if m >= RISING_RS_MIN && prec >= RISING_RS_MIN_PREC {
        // block length ~ sqrt(m), capped so coefficient growth stays tame
        let step = (m as f64).sqrt() as u64;
        Strategy::Rectangular { step: step.clamp(2, 64) }
    } else if m >= RISING_EIGHT_MIN {
        Strategy::EightTerm
    } else {
        Strategy::Simple
    }
}

/// x(x+1)···(x+m−1) as a certified ball.
pub fn rising<T: BallRing>(x: &T, m: u64, prec: u32) -> T {
    rising_with_strategy(x, m, choose_strategy(m, prec), prec)
}

/// Evaluation under an explicit strategy, exposed for the cross-checking
/// tests and benches.
pub fn rising_with_strategy<T: BallRing>(x: &T, m: u64, strategy: Strategy, prec: u32) -> T {
    match m {
        0 => return T::one(),
        1 => return x.set_round(prec),
        _ => {}
    }
    if !x.is_finite() {
        // propagate the indeterminate input through one multiplication
        return x.mul(x, prec);
    }
    let wp = prec + 64 - (m | 1).leading_zeros();
    let out = match strategy {
        Strategy::Simple => rising_bsplit(x, 0, m, wp),
        Strategy::EightTerm => rising_eight(x, m, wp),
        Strategy::Rectangular { step } => {
            if m >= step.max(2) {
                poly::rising_rectangular(x, m, step.max(2), wp)
            } else {
                rising_bsplit(x, 0, m, wp)
            }
        }
    };
    out.set_round(prec)
}

/// Product over the factor index range [lo, hi) by fixed-shape binary
/// splitting; the merge is a plain ball multiplication.
fn rising_bsplit<T: BallRing>(x: &T, lo: u64, hi: u64, prec: u32) -> T {
    pool::reduce(
        lo,
        hi,
        RISING_BSPLIT_BASECASE,
        &|a, b| {
            let mut p = x.add_u64(a, prec);
            for i in a + 1..b {
                p = p.mul(&x.add_u64(i, prec), prec);
            }
            p
        },
        &|a, b| a.mul(&b, prec),
    )
}

/// Eight factors at a time through the squared-quartic identity, then a
/// plain tail.
fn rising_eight<T: BallRing>(x: &T, m: u64, prec: u32) -> T {
    let blocks = m / 8;
    let mut acc = T::one();
    for j in 0..blocks {
        acc = acc.mul(&eight_block(&x.add_u64(8 * j, prec), prec), prec);
    }
    if blocks * 8 < m {
        acc = acc.mul(&rising_bsplit(x, blocks * 8, m, prec), prec);
    }
    acc
}

/// x(x+1)···(x+7) = (28 + 98x + 63x² + 14x³ + x⁴)² − 16(7 + 2x)².
fn eight_block<T: BallRing>(x: &T, prec: u32) -> T {
    let c28 = T::from_bigint(&28.into());
    let c98 = T::from_bigint(&98.into());
    let c63 = T::from_bigint(&63.into());
    let c14 = T::from_bigint(&14.into());
    let c7 = T::from_bigint(&7.into());
    // Horner for the quartic
    let q = x
        .add(&c14, prec)
        .mul(x, prec)
        .add(&c63, prec)
        .mul(x, prec)
        .add(&c98, prec)
        .mul(x, prec)
        .add(&c28, prec);
    let lin = x.mul_2exp(1).add(&c7, prec);
    let lin_sq = lin.mul(&lin, prec).mul_2exp(4);
    q.mul(&q, prec).sub(&lin_sq, prec)
}
