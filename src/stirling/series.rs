//! Asymptotic series evaluation with per-term adaptive precision.
//!
//! The Horner loop runs from the highest term down. Term k has predicted
//! magnitude bound_2exp(2k) − (2k−1)·log₂|z|, so the working precision for
//! that term is clamp(prec + term_mag, 10, prec): the negligible high-k
//! terms are computed almost entirely in noise, which costs nothing in the
//! certified radius because the remainder bound is attached independently.

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::ball::{const_log_sqrt2pi, ComplexBall, RealBall};
use crate::bernoulli;
use crate::config::{STIRLING_SET_ROUND_PREC, STIRLING_TERM_PREC_FLOOR};

use super::bound::{stirling_bound, stirling_bound_real};

/// Stirling coefficient bₖ = B₂ₖ/(2k(2k−1)), or B₂ₖ/(2k) for the digamma
/// series, as an enclosure at `prec` bits.
pub fn stirling_coeff(k: u64, digamma: bool, prec: u32) -> RealBall {
    let b = bernoulli::cached(2 * k);
    let scale = if digamma {
        BigInt::from(2 * k)
    } else {
        BigInt::from(2 * k) * BigInt::from(2 * k - 1)
    };
    let q = BigRational::new(b.numer().clone(), b.denom() * scale);
    RealBall::from_bigrational(&q, prec)
}

/// Working precision for term k given the argument's log₂ magnitude.
fn term_prec(k: u64, log2z: f64, prec: u32) -> u32 {
    let floor = STIRLING_TERM_PREC_FLOOR.min(prec);
    let mag = bernoulli::bound_2exp(2 * k) - (2 * k - 1) as f64 * log2z;
    if !mag.is_finite() {
        return prec;
    }
    let p = prec as f64 + mag;
    p.clamp(floor as f64, prec as f64) as u32
}

/// log Γ(z) or ψ(z) for a shifted complex argument, with the remainder
/// bound folded into both radius components.
pub fn eval_complex(z: &ComplexBall, nterms: u64, digamma: bool, prec: u32) -> ComplexBall {
    if !z.is_finite() {
        return ComplexBall::indeterminate();
    }
    let logz = z.log(prec);
    let zinv = z.inv(prec);
    let nterms = nterms.max(1);

    let mut s = ComplexBall::zero();
    if nterms > 1 {
        let zinv2 = zinv.mul(&zinv, prec);
        let log2z = logz.re().mid().to_f64() * core::f64::consts::LOG2_E;

        for k in (1..nterms).rev() {
            let tp = term_prec(k, log2z, prec);
            let b = stirling_coeff(k, digamma, tp);
            if prec > STIRLING_SET_ROUND_PREC {
                s = s.mul(&zinv2.set_round(tp), tp);
            } else {
                s = s.mul(&zinv2, tp);
            }
            s = s.add_real(&b, tp);
        }

        if digamma {
            s = s.mul(&zinv2, prec);
        } else {
            s = s.mul(&zinv, prec);
        }
    }

    let err = stirling_bound(z, u64::from(digamma), 1, nterms);
    s.add_error(err[0]);

    if digamma {
        // -s - 1/(2z) + log z
        s.neg().sub(&zinv.mul_2exp(-1), prec).add(&logz, prec)
    } else {
        // s + (z - 1/2) log z - z + log sqrt(2 pi)
        let zh = z.sub(&ComplexBall::from_real(RealBall::one().mul_2exp(-1)), prec);
        s.add(&logz.mul(&zh, prec), prec)
            .sub(z, prec)
            .add_real(&const_log_sqrt2pi(prec), prec)
    }
}

/// Real-argument variant running the identical schedule over [`RealBall`].
pub fn eval_real(x: &RealBall, nterms: u64, digamma: bool, prec: u32) -> RealBall {
    if !x.is_finite() {
        return RealBall::indeterminate();
    }
    let logx = x.log(prec);
    let xinv = x.inv(prec);
    if !logx.is_finite() || !xinv.is_finite() {
        return RealBall::indeterminate();
    }
    let nterms = nterms.max(1);

    let mut s = RealBall::zero();
    if nterms > 1 {
        let xinv2 = xinv.mul(&xinv, prec);
        let log2x = logx.mid().to_f64() * core::f64::consts::LOG2_E;

        for k in (1..nterms).rev() {
            let tp = term_prec(k, log2x, prec);
            let b = stirling_coeff(k, digamma, tp);
            if prec > STIRLING_SET_ROUND_PREC {
                s = s.mul(&xinv2.set_round(tp), tp);
            } else {
                s = s.mul(&xinv2, tp);
            }
            s = s.add(&b, tp);
        }

        if digamma {
            s = s.mul(&xinv2, prec);
        } else {
            s = s.mul(&xinv, prec);
        }
    }

    let err = stirling_bound_real(x, u64::from(digamma), 1, nterms);
    s.add_error(err[0]);

    if digamma {
        s.neg().sub(&xinv.mul_2exp(-1), prec).add(&logx, prec)
    } else {
        let xh = x.sub(&RealBall::one().mul_2exp(-1), prec);
        s.add(&logx.mul(&xh, prec), prec)
            .sub(x, prec)
            .add(&const_log_sqrt2pi(prec), prec)
    }
}
