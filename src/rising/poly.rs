//! Exact rising-factorial polynomials and the rectangular evaluation scheme.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::traits::BallRing;

/// Coefficients of x(x+1)···(x+s−1) in ascending degree order: the unsigned
/// Stirling numbers of the first kind c(s, k), computed by expanding one
/// linear factor at a time.
pub fn rising_coefficients(s: u64) -> Vec<BigUint> {
    let mut c: Vec<BigUint> = vec![BigUint::one()]; // empty product
    for i in 0..s {
        // c <- c * (x + i)
        let mut next = vec![BigUint::zero(); c.len() + 1];
        for (k, ck) in c.iter().enumerate() {
            next[k + 1] += ck;
            next[k] += ck * BigUint::from(i);
        }
        c = next;
    }
    c
}

/// Horner evaluation of an exact-integer polynomial at a ball point.
fn eval_poly<T: BallRing>(coeffs: &[BigInt], x: &T, prec: u32) -> T {
    let mut acc = T::from_bigint(coeffs.last().expect("nonempty polynomial"));
    for c in coeffs.iter().rev().skip(1) {
        acc = acc.mul(x, prec).add(&T::from_bigint(c), prec);
    }
    acc
}

/// Baby-step/giant-step product: the degree-`step` rising polynomial is
/// precomputed once and evaluated on the arithmetic progression
/// x, x+step, x+2·step, …; a short tail of linear factors finishes the
/// product when `step` does not divide `m`.
pub fn rising_rectangular<T: BallRing>(x: &T, m: u64, step: u64, prec: u32) -> T {
    debug_assert!(step >= 2 && m >= step);
    let coeffs: Vec<BigInt> = rising_coefficients(step)
        .into_iter()
        .map(BigInt::from)
        .collect();
    let blocks = m / step;
    let mut acc = T::one();
    for j in 0..blocks {
        let base = x.add_u64(j * step, prec);
        acc = acc.mul(&eval_poly(&coeffs, &base, prec), prec);
    }
    for i in blocks * step..m {
        acc = acc.mul(&x.add_u64(i, prec), prec);
    }
    acc
}
