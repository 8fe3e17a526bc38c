#[cfg(test)]
mod tests {
    use crate::ball::{const_log2, const_log_sqrt2pi, const_pi, ComplexBall, RealBall};
    use crate::fp::Fp;

    const PREC: u32 = 64;

    fn ball_near(b: &RealBall, v: f64, tol: f64) {
        assert!(b.is_finite(), "not finite: {b:?}");
        let m = b.mid().to_f64();
        assert!(
            (m - v).abs() < tol,
            "midpoint {m} vs expected {v}, tol {tol}"
        );
    }

    // =====================================================================
    // ring operations
    // =====================================================================

    #[test]
    fn exact_integer_arithmetic_stays_exact() {
        let a = RealBall::from_i64(7);
        let b = RealBall::from_i64(-3);
        let s = a.add(&b, PREC);
        assert!(s.is_exact());
        assert_eq!(s.mid().to_f64(), 4.0);
        let p = a.mul(&b, PREC);
        assert!(p.is_exact());
        assert_eq!(p.mid().to_f64(), -21.0);
    }

    #[test]
    fn division_encloses_truth() {
        let q = RealBall::from_i64(1).div(&RealBall::from_i64(7), PREC);
        // certify: 7 * (1/7) contains 1
        let prod = q.mul(&RealBall::from_i64(7), PREC);
        assert!(prod.contains_fp(&Fp::one()));
        assert!(!q.is_exact());
    }

    #[test]
    fn division_by_zero_straddle_is_indeterminate() {
        let mut d = RealBall::from_i64(0);
        d.add_error(crate::Mag::one());
        let q = RealBall::one().div(&d, PREC);
        assert!(!q.is_finite());
    }

    #[test]
    fn sqrt_two_squares_back() {
        let r = RealBall::from_i64(2).sqrt(PREC);
        let sq = r.mul(&r, PREC);
        assert!(sq.contains_fp(&Fp::from_i64(2)));
        ball_near(&r, core::f64::consts::SQRT_2, 1e-14);
    }

    #[test]
    fn sqrt_of_possibly_negative_is_indeterminate() {
        let mut x = RealBall::from_i64(0);
        x.add_error(crate::Mag::one());
        assert!(!x.sqrt(PREC).is_finite());
    }

    #[test]
    fn pow_u64_matches_repeated_mul() {
        let x = RealBall::from_f64(1.5);
        let p = x.pow_u64(5, PREC);
        ball_near(&p, 1.5f64.powi(5), 1e-12);
    }

    // =====================================================================
    // predicates and extraction
    // =====================================================================

    #[test]
    fn sign_predicates() {
        let mut x = RealBall::from_f64(0.5);
        assert!(x.is_positive());
        x.add_error(crate::Mag::one());
        assert!(!x.is_positive());
        assert!(x.contains_zero());
        assert!(RealBall::from_i64(-2).is_negative());
    }

    #[test]
    fn unique_bigint_extraction() {
        let mut x = RealBall::from_i64(42);
        x.add_error(crate::Mag::pow2(-10));
        assert_eq!(x.unique_bigint().map(|v| v.to_string()), Some("42".into()));
        // radius spanning several integers: no unique candidate
        let mut wide = RealBall::from_i64(42);
        wide.add_error(crate::Mag::pow2(2));
        assert!(wide.unique_bigint().is_none());
    }

    #[test]
    fn indeterminate_propagates() {
        let bad = RealBall::indeterminate();
        let x = bad.add(&RealBall::one(), PREC);
        assert!(!x.is_finite());
        let y = x.mul(&RealBall::from_i64(3), PREC);
        assert!(!y.is_finite());
    }

    // =====================================================================
    // constants
    // =====================================================================

    #[test]
    fn pi_encloses_reference() {
        let pi = const_pi(128);
        ball_near(&pi, core::f64::consts::PI, 1e-15);
        // tight at the requested precision
        assert!(pi.rel_accuracy_bits() > 120);
    }

    #[test]
    fn log2_encloses_reference() {
        let l = const_log2(96);
        ball_near(&l, core::f64::consts::LN_2, 1e-15);
        assert!(l.rel_accuracy_bits() > 88);
    }

    #[test]
    fn log_sqrt2pi_value() {
        // log sqrt(2 pi) = 0.918938533204672741780329736...
        let l = const_log_sqrt2pi(96);
        ball_near(&l, 0.9189385332046727, 1e-14);
    }

    #[test]
    fn constants_cache_reuse_is_consistent() {
        let hi = const_pi(256);
        let lo = const_pi(32);
        assert!(hi.overlaps(&lo));
    }

    // =====================================================================
    // elementary functions
    // =====================================================================

    #[test]
    fn exp_known_values() {
        ball_near(&RealBall::zero().exp(PREC), 1.0, 1e-16);
        ball_near(&RealBall::one().exp(PREC), core::f64::consts::E, 1e-14);
        ball_near(&RealBall::from_i64(-1).exp(PREC), 1.0 / core::f64::consts::E, 1e-14);
        ball_near(&RealBall::from_i64(10).exp(PREC), 22026.465794806718, 1e-9);
    }

    #[test]
    fn log_inverts_exp() {
        for &v in &[0.25, 1.0, 3.5, 100.0] {
            let x = RealBall::from_f64(v);
            let roundtrip = x.exp(PREC + 16).log(PREC);
            assert!(roundtrip.contains_f64(v), "log(exp({v})) lost {v}");
        }
    }

    #[test]
    fn log_of_nonpositive_is_indeterminate() {
        assert!(!RealBall::from_i64(-1).log(PREC).is_finite());
        assert!(!RealBall::zero().log(PREC).is_finite());
    }

    #[test]
    fn sin_cos_pythagorean() {
        for &v in &[0.1, 1.0, 2.5, -4.0, 30.0] {
            let (s, c) = RealBall::from_f64(v).sin_cos(PREC);
            let one = s.mul(&s, PREC).add(&c.mul(&c, PREC), PREC);
            assert!(one.contains_fp(&Fp::one()), "sin²+cos² at {v}");
            ball_near(&s, v.sin(), 1e-13);
            ball_near(&c, v.cos(), 1e-13);
        }
    }

    #[test]
    fn sin_pi_integers_vanish() {
        for &n in &[0i64, 1, -1, 7, 1000] {
            let s = RealBall::from_i64(n).sin_pi(PREC);
            assert!(s.contains_fp(&Fp::zero()), "sin(π·{n})");
            assert!(s.rad().cmp_pow2(-60) == core::cmp::Ordering::Less);
        }
    }

    #[test]
    fn sin_pi_half_integers() {
        let s = RealBall::from_f64(0.5).sin_pi(PREC);
        assert!(s.contains_fp(&Fp::one()));
        let s = RealBall::from_f64(2.5).sin_pi(PREC);
        assert!(s.contains_fp(&Fp::one()));
        let s = RealBall::from_f64(-0.5).sin_pi(PREC);
        assert!(s.contains_fp(&Fp::from_i64(-1)));
    }

    #[test]
    fn cot_pi_quarter() {
        // cot(π/4) = 1
        let c = RealBall::from_f64(0.25).cot_pi(PREC);
        assert!(c.contains_fp(&Fp::one()));
    }

    #[test]
    fn cot_pi_pole_is_indeterminate() {
        assert!(!RealBall::from_i64(2).cot_pi(PREC).is_finite());
    }

    #[test]
    fn atan_known_values() {
        ball_near(&RealBall::one().atan(PREC), core::f64::consts::FRAC_PI_4, 1e-14);
        ball_near(&RealBall::from_i64(-1).atan(PREC), -core::f64::consts::FRAC_PI_4, 1e-14);
        // large argument approaches π/2
        ball_near(&RealBall::from_i64(1000).atan(PREC), (1000.0f64).atan(), 1e-13);
    }

    #[test]
    fn atan2_quadrants() {
        let one = RealBall::one();
        let mone = RealBall::from_i64(-1);
        ball_near(
            &RealBall::atan2(&one, &one, PREC),
            core::f64::consts::FRAC_PI_4,
            1e-13,
        );
        ball_near(
            &RealBall::atan2(&one, &mone, PREC),
            3.0 * core::f64::consts::FRAC_PI_4,
            1e-13,
        );
        ball_near(
            &RealBall::atan2(&mone, &mone, PREC),
            -3.0 * core::f64::consts::FRAC_PI_4,
            1e-13,
        );
        ball_near(
            &RealBall::atan2(&mone, &one, PREC),
            -core::f64::consts::FRAC_PI_4,
            1e-13,
        );
    }

    #[test]
    fn atan2_origin_is_indeterminate() {
        let z = RealBall::zero();
        assert!(!RealBall::atan2(&z, &z, PREC).is_finite());
    }

    #[test]
    fn sinh_cosh_identity() {
        // cosh² - sinh² = 1
        let (s, c) = RealBall::from_f64(1.7).sinh_cosh(PREC);
        let diff = c.mul(&c, PREC).sub(&s.mul(&s, PREC), PREC);
        assert!(diff.contains_fp(&Fp::one()));
    }

    // =====================================================================
    // complex balls
    // =====================================================================

    #[test]
    fn complex_mul_i_squared() {
        let i = ComplexBall::new(RealBall::zero(), RealBall::one());
        let m = i.mul(&i, PREC);
        assert!(m.re().contains_fp(&Fp::from_i64(-1)));
        assert!(m.im().contains_fp(&Fp::zero()));
    }

    #[test]
    fn complex_inv_times_self_is_one() {
        let z = ComplexBall::from_f64s(2.5, -1.25);
        let w = z.inv(PREC).mul(&z, PREC);
        assert!(w.re().contains_fp(&Fp::one()));
        assert!(w.im().contains_fp(&Fp::zero()));
    }

    #[test]
    fn complex_log_exp_roundtrip() {
        let z = ComplexBall::from_f64s(1.5, 0.75);
        let back = z.log(PREC + 16).exp(PREC);
        assert!(back.re().overlaps(z.re()));
        assert!(back.im().overlaps(z.im()));
    }

    #[test]
    fn complex_arg_of_negative_imag_axis() {
        let z = ComplexBall::from_f64s(0.0, -2.0);
        ball_near(&z.arg(PREC), -core::f64::consts::FRAC_PI_2, 1e-13);
    }

    #[test]
    fn complex_sin_pi_at_real_points_matches_real() {
        let z = ComplexBall::from_real(RealBall::from_f64(0.5));
        let s = z.sin_pi(PREC);
        assert!(s.re().contains_fp(&Fp::one()));
        assert!(s.im().contains_fp(&Fp::zero()));
    }

    #[test]
    fn complex_sin_pi_imaginary_growth() {
        // sin(π i) = i sinh(π): purely imaginary, sinh(π) ≈ 11.5487393573
        let z = ComplexBall::from_f64s(0.0, 1.0);
        let s = z.sin_pi(PREC);
        assert!(s.re().contains_fp(&Fp::zero()));
        ball_near(s.im(), 11.548739357257748, 1e-10);
    }

    #[test]
    fn log_sin_pi_continuation_steps_by_pi() {
        // For Im z > 0, log sin π(z+1) = log sin π(z) − iπ
        let z = ComplexBall::from_f64s(0.3, 1.0);
        let a = z.log_sin_pi(PREC);
        let b = z.add_u64(1, PREC).log_sin_pi(PREC);
        let diff = a.sub(&b, PREC);
        assert!(diff.re().contains_fp(&Fp::zero()));
        let pi = const_pi(PREC);
        assert!(diff.im().overlaps(&pi));
    }

    #[test]
    fn branch_cut_detection() {
        let z = ComplexBall::from_f64s(-1.0, 0.0);
        assert!(z.touches_branch_cut());
        let w = ComplexBall::from_f64s(-1.0, 0.5);
        assert!(!w.touches_branch_cut());
        let p = ComplexBall::from_f64s(1.0, 0.0);
        assert!(!p.touches_branch_cut());
    }
}
