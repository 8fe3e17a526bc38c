#[cfg(test)]
mod tests {
    use crate::ball::{const_pi, ComplexBall, RealBall};
    use crate::Mag;

    use super::super::*;

    const PREC: u32 = 64;

    fn overlap_c(a: &ComplexBall, b: &ComplexBall, msg: &str) {
        assert!(
            a.re().overlaps(b.re()) && a.im().overlaps(b.im()),
            "{msg}: {a:?} vs {b:?}"
        );
    }

    /// Reference ball around an `f64` value, padded so the decimal literal's
    /// own rounding cannot cause a spurious miss.
    fn reference(v: f64) -> RealBall {
        let mut b = RealBall::from_f64(v);
        b.add_error(Mag::pow2(-48));
        b
    }

    // =====================================================================
    // exact fast paths and poles
    // =====================================================================

    #[test]
    fn gamma_of_five_is_exactly_24() {
        let g = gamma_real(&RealBall::from_u64(5), PREC);
        assert!(g.is_exact());
        assert_eq!(g.mid().to_f64(), 24.0);
    }

    #[test]
    fn gamma_at_poles_is_indeterminate() {
        for v in [0i64, -1, -7, -100] {
            assert!(!gamma_real(&RealBall::from_i64(v), PREC).is_finite());
            assert!(!digamma_real(&RealBall::from_i64(v), PREC).is_finite());
        }
    }

    #[test]
    fn nonfinite_input_propagates_everywhere() {
        let x = RealBall::indeterminate();
        let z = ComplexBall::indeterminate();
        assert!(!gamma_real(&x, PREC).is_finite());
        assert!(!log_gamma_real(&x, PREC).is_finite());
        assert!(!digamma_real(&x, PREC).is_finite());
        assert!(!gamma(&z, PREC).is_finite());
        assert!(!log_gamma(&z, PREC).is_finite());
        assert!(!digamma(&z, PREC).is_finite());
    }

    // =====================================================================
    // classical values
    // =====================================================================

    #[test]
    fn gamma_half_contains_sqrt_pi() {
        let half = RealBall::one().mul_2exp(-1);
        let g = gamma_real(&half, PREC);
        let sqrt_pi = const_pi(PREC + 8).sqrt(PREC + 8);
        assert!(g.overlaps(&sqrt_pi));
    }

    #[test]
    fn digamma_one_contains_minus_euler() {
        let d = digamma_real(&RealBall::one(), PREC);
        assert!(d.overlaps(&reference(-0.577_215_664_901_532_9)));
    }

    #[test]
    fn log_gamma_matches_log_factorial() {
        let lg = log_gamma_real(&RealBall::from_u64(4), PREC);
        let log6 = RealBall::from_u64(6).log(PREC + 8);
        assert!(lg.overlaps(&log6));
    }

    #[test]
    fn log_gamma_real_needs_a_positive_enclosure() {
        assert!(!log_gamma_real(&RealBall::from_f64(-1.5), PREC).is_finite());
        let mut straddling = RealBall::zero();
        straddling.add_error(Mag::one());
        assert!(!log_gamma_real(&straddling, PREC).is_finite());
    }

    // =====================================================================
    // functional equations
    // =====================================================================

    #[test]
    fn recurrence_holds_on_the_real_line() {
        let x = RealBall::from_f64(3.25);
        let lhs = gamma_real(&x.add_u64(1, PREC + 8), PREC);
        let rhs = x.mul(&gamma_real(&x, PREC), PREC);
        assert!(lhs.overlaps(&rhs));
    }

    #[test]
    fn digamma_recurrence_holds() {
        let x = RealBall::from_f64(2.5);
        let lhs = digamma_real(&x.add_u64(1, PREC + 8), PREC);
        let rhs = digamma_real(&x, PREC).add(&x.inv(PREC), PREC);
        assert!(lhs.overlaps(&rhs));
    }

    #[test]
    fn reflection_agrees_with_recurrence_far_left() {
        // gamma(-5.5) computed through reflection must satisfy
        // gamma(0.5) = gamma(-5.5) * (-5.5)(-4.5)...(-0.5)
        let x = RealBall::from_f64(-5.5);
        let g = gamma_real(&x, PREC);
        assert!(g.is_finite());
        let mut prod = g;
        for k in 0..6 {
            prod = prod.mul(&x.add_u64(k, PREC + 8), PREC + 8);
        }
        let ghalf = gamma_real(&RealBall::one().mul_2exp(-1), PREC);
        assert!(prod.overlaps(&ghalf));
    }

    #[test]
    fn complex_recurrence_holds() {
        let z = ComplexBall::from_f64s(1.0, 1.0);
        let lhs = gamma(&z.add_u64(1, PREC + 8), PREC);
        let rhs = z.mul(&gamma(&z, PREC), PREC);
        overlap_c(&lhs, &rhs, "gamma(z+1) = z gamma(z)");
    }

    #[test]
    fn complex_recurrence_holds_under_reflection() {
        let z = ComplexBall::from_f64s(-12.5, 0.5);
        let lhs = gamma(&z.add_u64(1, PREC + 8), PREC);
        let rhs = z.mul(&gamma(&z, PREC), PREC);
        overlap_c(&lhs, &rhs, "reflected gamma recurrence");
    }

    #[test]
    fn log_gamma_exponentiates_to_gamma() {
        for (re, im) in [(2.0, 3.0), (-9.25, 1.5), (0.5, -4.0)] {
            let z = ComplexBall::from_f64s(re, im);
            let via_log = log_gamma(&z, PREC).exp(PREC);
            let direct = gamma(&z, PREC);
            overlap_c(&via_log, &direct, "exp(log_gamma) = gamma");
        }
    }

    #[test]
    fn log_gamma_recurrence_in_the_right_half_plane() {
        // lgamma(z+1) = lgamma(z) + log z holds for Re z > 0 on the
        // principal branch, which pins the branch correction
        let z = ComplexBall::from_f64s(2.0, 3.0);
        let lhs = log_gamma(&z.add_u64(1, PREC + 8), PREC);
        let rhs = log_gamma(&z, PREC).add(&z.log(PREC), PREC);
        overlap_c(&lhs, &rhs, "lgamma recurrence");
    }

    #[test]
    fn complex_digamma_recurrence() {
        let z = ComplexBall::from_f64s(1.5, 2.0);
        let lhs = digamma(&z.add_u64(1, PREC + 8), PREC);
        let rhs = digamma(&z, PREC).add(&z.inv(PREC), PREC);
        overlap_c(&lhs, &rhs, "psi(z+1) = psi(z) + 1/z");
    }

    // =====================================================================
    // branch cut scenario
    // =====================================================================

    #[test]
    fn branch_straddling_enclosure_is_indeterminate() {
        // a ball around the origin on the imaginary axis with nonpositive
        // real part: the bound must refuse, never produce a finite lie
        let mut re = RealBall::from_i64(-2);
        re.add_error(Mag::pow2(-4));
        let mut im = RealBall::zero();
        im.add_error(Mag::pow2(-4));
        let z = ComplexBall::new(re, im);
        let g = log_gamma(&z, PREC);
        assert!(!g.is_finite());
    }

    #[test]
    fn real_routing_keeps_results_real() {
        let z = ComplexBall::from_real(RealBall::from_f64(6.5));
        let g = gamma(&z, PREC);
        assert!(g.im().mid().is_zero() && g.im().rad().is_zero());
        assert!(g.re().is_positive());
    }
}
