//! The Stirling-series engine: precision planning, rigorous remainder
//! bounds, and adaptive-precision evaluation.
//!
//! The pipeline for one gamma-family evaluation is
//!
//! 1. [`choose_param`] — decide reflection, argument shift and term count
//!    from double-precision (or exponent-only) proxies of the midpoint;
//! 2. shift the argument with the rising factorial;
//! 3. [`eval_complex`] / [`eval_real`] — sum the series with per-term
//!    working precision, then attach the [`stirling_bound`] remainder to
//!    the radius.
//!
//! The split keeps heuristics and rigor apart: a bad plan can only cost
//! performance or yield a wide (still correct) ball, never a wrong one.

mod bound;
mod plan;
mod series;


pub use bound::{phase_bound, stirling_bound, stirling_bound_real};
pub use plan::{choose_param, choose_param_mid, choose_param_real, StirlingPlan};
pub use series::{eval_complex, eval_real, stirling_coeff};
