//! Tuning constants.
//!
//! Every empirically-tuned threshold in the crate lives here so that the
//! selection logic that consumes it stays independently testable and the
//! constants themselves can be benchmarked in isolation.

/// Mantissa width of the coarse magnitude type [`crate::Mag`].
pub const MAG_BITS: u32 = 30;

/// Working precision used for radius-side computations (phase bounds,
/// remainder factors). Matches the magnitude mantissa width plus guard.
pub const RAD_PREC: u32 = 32;

/// Guard bits added to the working precision of elementary-function kernels.
pub const ELEM_GUARD_BITS: u32 = 16;

/// Below this reduced-magnitude exponent, exp/sin/cos Taylor kernels stop
/// halving the argument (|x| <= 2^-EXP_REDUCE_TARGET).
pub const EXP_REDUCE_TARGET: u32 = 4;

// ── Stirling planner ────────────────────────────────────────────────

/// Argument-shift thresholds: the shifted argument must satisfy
/// |z| >= max(1, beta * prec) before the asymptotic series is applied.
/// Larger working precisions tolerate (and profit from) a larger shift.
pub fn stirling_beta(prec: u32) -> f64 {
    if prec <= 1536 {
        0.17
    } else if prec <= 6144 {
        0.20
    } else {
        0.24
    }
}

/// Real part below which the reflection formula is preferred.
pub const STIRLING_REFLECT_THRESHOLD: f64 = -5.0;

/// Midpoint exponent (base 2) above which the planner switches from the
/// double-precision regime to the exponent-only regime.
pub const STIRLING_LARGE_EXP: i64 = 40;

/// Shift increment applied when the term-bound scan fails to decrease.
pub const STIRLING_WIDEN_STEP: u64 = 4;

/// Hard cap on widen-and-retry rounds in the planner. Exceeding it is a
/// contract violation, not a numerical condition.
pub const STIRLING_MAX_WIDEN: u32 = 64;

/// Per-term working precision never drops below this floor.
pub const STIRLING_TERM_PREC_FLOOR: u32 = 10;

/// Above this precision the series loop rounds its 1/z^2 power explicitly
/// before each short-precision multiply.
pub const STIRLING_SET_ROUND_PREC: u32 = 2000;

// ── Rising factorial ────────────────────────────────────────────────

/// Below this many factors the plain product tree wins.
pub const RISING_EIGHT_MIN: u64 = 16;

/// At or above this many factors (and above [`RISING_RS_MIN_PREC`] bits) the
/// rectangular baby-step/giant-step scheme takes over.
pub const RISING_RS_MIN: u64 = 256;

/// Minimum precision for the rectangular scheme to pay off.
pub const RISING_RS_MIN_PREC: u32 = 512;

/// Base-case length of the binary-splitting product tree.
pub const RISING_BSPLIT_BASECASE: u64 = 8;

// ── Bernoulli subsystem ─────────────────────────────────────────────

/// Largest index the contiguous cache will grow to; isolated requests above
/// this go straight to the multi-modular backend and are not cached.
pub const BERNOULLI_CACHE_LIMIT: u64 = 1 << 15;

/// Below this index the multi-modular backend falls back to the direct
/// zeta evaluation (the crossover of the original tuning).
pub const BERNOULLI_MULTI_MOD_MIN: u64 = 10;

/// Smallest index handled by the reverse zeta generator; the cache fills
/// everything below it with the exact defining recurrence.
pub const BERNOULLI_REV_MIN: u64 = 34;

/// Default residue/refinement split for the multi-modular backend.
/// Returns the fraction of the numerator bits recovered from prime residues;
/// the rest comes from the floating zeta refinement.
pub fn bernoulli_default_alpha(n: u64) -> f64 {
    if n < 18000 {
        0.0
    } else if n < 60000 {
        0.005 + 3.6e-6 * n as f64
    } else {
        (0.18 + 0.5e-6 * n as f64).min(0.28)
    }
}

/// Precision step between zeta-refinement retries.
pub const BERNOULLI_REFINE_STEP: u32 = 32;

/// Bounded retry budget for uniqueness failures. A shortfall is retried at
/// higher precision, never accepted silently; exhausting the budget is
/// treated as a contract violation.
pub const BERNOULLI_MAX_RETRIES: u32 = 64;

/// Guard bits for the reverse generator's working precision.
pub const BERNOULLI_REV_GUARD: u32 = 64;

/// The reverse generator rebuilds its power table when the needed working
/// precision has dropped by at least this many bits.
pub const BERNOULLI_REV_RETUNE: u32 = 64;

// ── Branch correction ───────────────────────────────────────────────

/// Precision of the cheap phase-sum estimate used to correct the branch of
/// log-gamma under reflection. The full-precision fallback is used whenever
/// the estimate does not pin a unique multiple of pi.
pub const LGAMMA_PHASE_PREC: u32 = 40;

// ── Exact fast paths ────────────────────────────────────────────────

/// Largest exact integer argument expanded to a factorial inline.
pub const GAMMA_EXACT_INT_LIMIT: u64 = 4096;
