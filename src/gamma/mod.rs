//! Gamma-family public surface: Γ, log Γ and ψ over real and complex
//! enclosures.
//!
//! Every entry point is total over finite input: poles, branch-straddling
//! rectangles and hopeless accuracy all come back as indeterminate balls,
//! detectable with `is_finite()`, never as errors. The composition follows
//! the two-branch scheme of the planner:
//!
//! - DIRECT: Γ(x) = Γ(x+r) / x(x+1)···(x+r−1),
//! - REFLECT: Γ(x) = π · (1−x)(2−x)···(r−x) / (Γ(1−x+r) · sin(πx)),
//!
//! with log-gamma needing an extra branch correction under reflection
//! (the principal log of the rising product differs from the sum of factor
//! logs by a multiple of 2πi).
//!
//! Exact nonnegative-integer arguments take a factorial fast path with a
//! zero-radius result; richer exact-rational fast paths belong to the
//! callers layered above this engine.

mod complex;
mod real;

#[cfg(test)]
mod tests;

pub use complex::{digamma, gamma, log_gamma};
pub use real::{digamma_real, gamma_real, log_gamma_real};
