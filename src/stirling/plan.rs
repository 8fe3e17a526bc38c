//! Precision planning for the asymptotic series.
//!
//! [`choose_param`] decides, for a target precision, whether to reflect,
//! how far to shift the argument up, and how many series terms to sum. The
//! decision is a pure function of the input midpoints; rigor is supplied
//! later by the remainder bound, so the planner is free to work with
//! double-precision proxies.
//!
//! Two magnitude regimes share the term scan: `small` works on `f64`
//! midpoints, `large` (midpoint exponent beyond 2^40) works on exponents
//! alone with a piecewise phase estimate, because converting to `f64`
//! would overflow.

use crate::ball::{ComplexBall, RealBall};
use crate::bernoulli;
use crate::config::{
    stirling_beta, STIRLING_LARGE_EXP, STIRLING_MAX_WIDEN, STIRLING_REFLECT_THRESHOLD,
    STIRLING_WIDEN_STEP,
};
use crate::fp::Fp;

/// Shift/term-count decision for one evaluation. A pure value, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StirlingPlan {
    /// Evaluate at 1−x and reflect back.
    pub reflect: bool,
    /// Argument shift r: the series runs at z + r.
    pub shift: u64,
    /// Number of series terms n.
    pub terms: u64,
}

impl StirlingPlan {
    /// The all-zero plan used for non-finite input.
    pub fn indeterminate() -> Self {
        StirlingPlan { reflect: false, shift: 0, terms: 0 }
    }
}

/// Scan for the smallest term count whose predicted magnitude drops below
/// −prec bits. `None` when the bound starts growing instead — the shift is
/// too small for the series to converge.
fn choose_n(log2z: f64, argz: f64, digamma: bool, prec: u32) -> Option<u64> {
    let argf = (1.0 / (0.5 * argz).cos()).log2();
    let mut n = 1u64;
    loop {
        let k = 2.0 * n as f64;
        let boundn = if digamma {
            bernoulli::bound_2exp(2 * n) - k * log2z + (k + 1.0) * argf
        } else {
            bernoulli::bound_2exp(2 * n) - (k - 1.0) * log2z + k * argf
        };
        if boundn <= -(prec as f64) {
            return Some(n);
        }
        if boundn > 1.0 {
            return None;
        }
        n += 1;
    }
}

/// Double-precision regime.
fn choose_small(
    mut x: f64,
    y: f64,
    use_reflect: bool,
    digamma: bool,
    prec: u32,
) -> StirlingPlan {
    let reflect = use_reflect && x < STIRLING_REFLECT_THRESHOLD;
    if reflect {
        x = 1.0 - x;
    }

    // shift until |z| clears the convergence threshold
    let w = (stirling_beta(prec) * prec as f64).max(1.0);
    let mut shift = 0u64;
    while x < 1.0 || x * x + y * y < w * w {
        x += 1.0;
        shift += 1;
    }

    // term scan, widening the shift whenever the bound fails to decrease
    for _ in 0..STIRLING_MAX_WIDEN {
        let log2z = 0.5 * (x * x + y * y).log2();
        let argz = y.atan2(x);
        if let Some(terms) = choose_n(log2z, argz, digamma, prec) {
            return StirlingPlan { reflect, shift, terms };
        }
        x += STIRLING_WIDEN_STEP as f64;
        shift += STIRLING_WIDEN_STEP;
    }
    // unreachable for finite parameters: every widening strictly grows |z|
    panic!("stirling planner failed to converge");
}

/// Exponent-only regime: |z| is so large that only its binary magnitude
/// matters, and the phase is classified by quadrant comparisons.
fn choose_large(a: &Fp, b: &Fp, use_reflect: bool, digamma: bool, prec: u32) -> StirlingPlan {
    let reflect = use_reflect && a.signum() < 0;

    // so big that zero terms suffice
    if a.cmpabs_2exp(i64::MAX / 8) != core::cmp::Ordering::Less
        || b.cmpabs_2exp(i64::MAX / 8) != core::cmp::Ordering::Less
    {
        return StirlingPlan { reflect, shift: 0, terms: 0 };
    }

    let mag = |v: &Fp| if v.is_zero() { i64::MIN / 4 } else { v.mag_exp() };
    let log2z = mag(a).max(mag(b)) as f64;

    const PI: f64 = core::f64::consts::PI;
    let argz = if b.is_zero() {
        if a.signum() < 0 && !reflect {
            PI
        } else {
            0.0
        }
    } else if a.signum() < 0 && !reflect {
        if Fp::cmpabs(a, b) != core::cmp::Ordering::Greater {
            PI * 0.75
        } else {
            PI
        }
    } else if Fp::cmpabs(a, b) != core::cmp::Ordering::Greater {
        PI * 0.25
    } else {
        PI * 0.5
    };

    // on the negative real axis the series bound diverges: no finite term
    // count helps, and the remainder bound will report the blow-up
    let terms = if argz == PI {
        0
    } else {
        choose_n(log2z, argz, digamma, prec).unwrap_or(0)
    };
    StirlingPlan { reflect, shift: 0, terms }
}

/// Plan from raw midpoints. Non-finite midpoints produce the all-zero plan,
/// which downstream evaluation turns into an indeterminate ball.
pub fn choose_param_mid(
    a: &Fp,
    b: &Fp,
    use_reflect: bool,
    digamma: bool,
    prec: u32,
) -> StirlingPlan {
    if !a.is_finite() || !b.is_finite() {
        return StirlingPlan::indeterminate();
    }
    if a.cmpabs_2exp(STIRLING_LARGE_EXP) == core::cmp::Ordering::Greater
        || b.cmpabs_2exp(STIRLING_LARGE_EXP) == core::cmp::Ordering::Greater
    {
        choose_large(a, b, use_reflect, digamma, prec)
    } else {
        choose_small(a.to_f64(), b.to_f64(), use_reflect, digamma, prec)
    }
}

/// Plan for a complex enclosure (midpoints only).
pub fn choose_param(z: &ComplexBall, use_reflect: bool, digamma: bool, prec: u32) -> StirlingPlan {
    choose_param_mid(z.re().mid(), z.im().mid(), use_reflect, digamma, prec)
}

/// Plan for a real enclosure.
pub fn choose_param_real(
    x: &RealBall,
    use_reflect: bool,
    digamma: bool,
    prec: u32,
) -> StirlingPlan {
    choose_param_mid(x.mid(), &Fp::zero(), use_reflect, digamma, prec)
}
