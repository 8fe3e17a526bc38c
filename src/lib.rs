//! # certus
//!
//! Certified gamma, log-gamma and digamma over arbitrary-precision balls.
//! Every result is an enclosure — midpoint plus radius — that provably
//! contains the true value: rounding errors are folded into radii with
//! directed rounding, series truncations carry rigorous remainder bounds,
//! and undefined points (poles, branch-straddling input) come back as
//! indeterminate balls rather than errors.
//!
//! ## Quick start
//!
//! ```
//! use certus::{gamma_real, RealBall};
//!
//! // gamma(5) = 24, exactly
//! let g = gamma_real(&RealBall::from_u64(5), 64);
//! assert!(g.is_exact());
//! assert_eq!(g.mid().to_f64(), 24.0);
//!
//! // gamma(1/2) rigorously contains sqrt(pi)
//! let half = RealBall::one().mul_2exp(-1);
//! let g = certus::gamma_real(&half, 64);
//! let sqrt_pi = certus::ball::const_pi(72).sqrt(72);
//! assert!(g.overlaps(&sqrt_pi));
//! ```
//!
//! ## Modules
//!
//! - [`fp`] — Arbitrary-precision binary floats with directed rounding.
//!   Every operation takes `(precision, Round)` and reports its rounding
//!   error, the primitive the whole radius discipline is built on.
//!
//! - [`mag`](Mag) — Coarse upward-rounded magnitudes: the radius type of
//!   every ball and the currency of every error bound.
//!
//! - [`ball`] — [`RealBall`] and [`ComplexBall`] enclosures: ring
//!   arithmetic, certified elementary functions, cached constants, and the
//!   containment predicates the number-theoretic validators use.
//!
//! - [`bernoulli`] — Exact Bernoulli numbers: a process-wide growable
//!   cache, a descending reverse-zeta generator, and a multi-modular CRT
//!   backend for isolated large indices. [`bernoulli_number`] is the
//!   public entry.
//!
//! - [`rising`] — Certified rising factorial x(x+1)···(x+m−1) with three
//!   interchangeable strategies chosen by a pure sizing function.
//!
//! - [`stirling`] — The asymptotic-series engine: precision planner,
//!   rigorous remainder bound, and the adaptive-precision Horner
//!   evaluator.
//!
//! - [`gamma`] — The public gamma-family surface composing all of the
//!   above: [`gamma`](gamma()), [`log_gamma`], [`digamma`] over complex
//!   enclosures and the `*_real` variants.
//!
//! - [`pool`] — Fork-join helpers with a fixed merge tree, so parallel
//!   runs are bit-identical to serial ones.
//!
//! - [`config`] — Every tuning constant in one place.
//!
//! ## Cargo features
//!
//! | Feature    | Default | Description |
//! |------------|---------|-------------|
//! | `parallel` | yes     | rayon-backed fork-join for residue maps and product trees |

pub mod ball;
pub mod bernoulli;
pub mod config;
pub mod fp;
pub mod gamma;
pub mod pool;
pub mod rising;
pub mod stirling;
pub mod traits;

mod mag;

pub use ball::{ComplexBall, RealBall};
pub use bernoulli::{bernoulli_number, BernoulliCache};
pub use gamma::{digamma, digamma_real, gamma, gamma_real, log_gamma, log_gamma_real};
pub use mag::Mag;
pub use traits::BallRing;
