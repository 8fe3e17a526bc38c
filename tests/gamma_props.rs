//! Property tests for the gamma-family surface: soundness against
//! references, functional equations as ball containment, the branch-cut
//! scenario, the accuracy floor, and determinism across worker counts.

use certus::ball::const_pi;
use certus::{digamma, digamma_real, gamma, gamma_real, log_gamma, log_gamma_real};
use certus::{ComplexBall, Mag, RealBall};

fn reference(v: f64) -> RealBall {
    let mut b = RealBall::from_f64(v);
    b.add_error(Mag::pow2(-40));
    b
}

fn overlap_c(a: &ComplexBall, b: &ComplexBall, msg: &str) {
    assert!(
        a.re().overlaps(b.re()) && a.im().overlaps(b.im()),
        "{msg}: {a:?} vs {b:?}"
    );
}

// =====================================================================
// soundness against double-precision references
// =====================================================================

#[test]
fn gamma_matches_f64_references() {
    // (x, gamma(x)) with the right-hand sides accurate to ~1e-15
    let cases = [
        (0.5, 1.772_453_850_905_516),
        (1.0, 1.0),
        (2.5, 1.329_340_388_179_137),
        (6.5, 287.885_277_815_044_3),
        (-0.5, -3.544_907_701_811_032),
        (-10.5, -2.640_121_8e-7),
    ];
    for (x, g) in cases {
        let got = gamma_real(&RealBall::from_f64(x), 64);
        assert!(got.overlaps(&reference(g)), "gamma({x}): {got:?}");
    }
}

#[test]
fn digamma_matches_f64_references() {
    let cases = [
        (1.0, -0.577_215_664_901_532_9),
        (0.5, -1.963_510_026_021_423_5),
        (10.0, 2.251_752_589_066_721),
        (-2.5, 1.103_156_640_645_243),
    ];
    for (x, d) in cases {
        let got = digamma_real(&RealBall::from_f64(x), 64);
        assert!(got.overlaps(&reference(d)), "digamma({x}): {got:?}");
    }
}

#[test]
fn log_gamma_matches_f64_references() {
    let cases = [(3.0, core::f64::consts::LN_2), (4.0, 1.791_759_469_228_055)];
    for (x, l) in cases {
        let got = log_gamma_real(&RealBall::from_f64(x), 64);
        assert!(got.overlaps(&reference(l)), "log_gamma({x}): {got:?}");
    }
}

// =====================================================================
// concrete scenarios
// =====================================================================

#[test]
fn gamma_five_is_exactly_24() {
    let g = gamma_real(&RealBall::from_u64(5), 128);
    assert!(g.is_exact());
    assert_eq!(g.mid().to_f64(), 24.0);
}

#[test]
fn gamma_half_contains_sqrt_pi() {
    let half = RealBall::one().mul_2exp(-1);
    for prec in [24u32, 64, 256] {
        let g = gamma_real(&half, prec);
        let sqrt_pi = const_pi(prec + 16).sqrt(prec + 16);
        assert!(g.overlaps(&sqrt_pi), "prec {prec}");
    }
}

#[test]
fn digamma_one_contains_minus_euler() {
    let d = digamma_real(&RealBall::one(), 64);
    assert!(d.overlaps(&reference(-0.577_215_664_901_532_9)));
}

// =====================================================================
// functional equations
// =====================================================================

#[test]
fn recurrence_along_the_real_line() {
    for x in [0.25, 1.0e-3, 3.7, 27.25, -1.5, -4.3, -25.75] {
        let xb = RealBall::from_f64(x);
        let lhs = gamma_real(&xb.add_u64(1, 96), 80);
        let rhs = xb.mul(&gamma_real(&xb, 80), 80);
        assert!(lhs.overlaps(&rhs), "gamma recurrence at {x}");
    }
}

#[test]
fn reflection_formula_real() {
    // gamma(x) gamma(1-x) sin(pi x) contains pi, off the poles
    for x in [0.3, 0.5, -0.75, -6.2] {
        let xb = RealBall::from_f64(x);
        let one_minus = RealBall::one().sub(&xb, 96);
        let prod = gamma_real(&xb, 96)
            .mul(&gamma_real(&one_minus, 96), 96)
            .mul(&xb.sin_pi(96), 96);
        assert!(prod.overlaps(&const_pi(96)), "reflection at {x}: {prod:?}");
    }
}

#[test]
fn reflection_formula_complex() {
    for (re, im) in [(0.3, 0.7), (-2.25, 1.5), (0.0, 3.0)] {
        let z = ComplexBall::from_f64s(re, im);
        let one_minus = ComplexBall::one().sub(&z, 144);
        let prod = gamma(&z, 128)
            .mul(&gamma(&one_minus, 128), 128)
            .mul(&z.sin_pi(128), 128);
        let pi_c = ComplexBall::from_real(const_pi(128));
        overlap_c(&prod, &pi_c, "complex reflection");
    }
}

#[test]
fn digamma_recurrence_real_and_complex() {
    for x in [0.3, 5.25, -3.4] {
        let xb = RealBall::from_f64(x);
        let lhs = digamma_real(&xb.add_u64(1, 96), 80);
        let rhs = digamma_real(&xb, 80).add(&xb.inv(80), 80);
        assert!(lhs.overlaps(&rhs), "digamma recurrence at {x}");
    }
    let z = ComplexBall::from_f64s(-7.5, 2.25);
    let lhs = digamma(&z.add_u64(1, 144), 128);
    let rhs = digamma(&z, 128).add(&z.inv(128), 128);
    overlap_c(&lhs, &rhs, "complex digamma recurrence");
}

#[test]
fn log_gamma_is_consistent_with_gamma_on_the_cut_plane() {
    for (re, im) in [(3.0, 0.25), (-6.75, 1.0), (-15.2, -2.5), (0.5, 8.0)] {
        let z = ComplexBall::from_f64s(re, im);
        let via_log = log_gamma(&z, 96).exp(96);
        let direct = gamma(&z, 96);
        overlap_c(&via_log, &direct, "exp(log_gamma) vs gamma");
    }
}

// =====================================================================
// branch cut and poles
// =====================================================================

#[test]
fn branch_straddling_enclosure_never_lies() {
    // encloses 0 on the imaginary axis, real part nonpositive
    let mut re = RealBall::from_f64(-1.0);
    re.add_error(Mag::one());
    let mut im = RealBall::zero();
    im.add_error(Mag::one());
    let z = ComplexBall::new(re, im);
    assert!(!gamma(&z, 64).is_finite());
    assert!(!log_gamma(&z, 64).is_finite());
    assert!(!digamma(&z, 64).is_finite());
}

#[test]
fn poles_are_indeterminate_not_wrong() {
    for v in [0i64, -1, -2, -33] {
        assert!(!gamma_real(&RealBall::from_i64(v), 64).is_finite());
    }
    // a wide ball covering a pole must also refuse
    let mut wide = RealBall::from_i64(-3);
    wide.add_error(Mag::pow2(-1));
    assert!(!gamma_real(&wide, 64).is_finite());
}

// =====================================================================
// accuracy floor
// =====================================================================

#[test]
fn accuracy_floor_for_exact_input() {
    let x = RealBall::from_f64(3.7);
    for prec in [24u32, 53, 128, 1000] {
        for (name, got) in [
            ("gamma", gamma_real(&x, prec)),
            ("log_gamma", log_gamma_real(&x, prec)),
            ("digamma", digamma_real(&x, prec)),
        ] {
            let acc = got.rel_accuracy_bits();
            assert!(
                acc >= prec as i64 - 16,
                "{name} at prec {prec}: accuracy {acc}"
            );
        }
    }
}

#[test]
#[ignore = "ten-thousand-bit evaluation, slow in debug builds"]
fn accuracy_floor_at_ten_thousand_bits() {
    let x = RealBall::from_f64(3.7);
    let got = gamma_real(&x, 10_000);
    assert!(got.rel_accuracy_bits() >= 10_000 - 16);
}

// =====================================================================
// determinism
// =====================================================================

#[test]
fn results_are_identical_across_worker_counts() {
    let run = || {
        let z = ComplexBall::from_f64s(-8.25, 3.5);
        (gamma(&z, 512), gamma_real(&RealBall::from_f64(17.3), 512))
    };
    let mut outputs = Vec::new();
    for workers in [1usize, 2, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .expect("worker pool");
        outputs.push(pool.install(run));
    }
    let (zc0, xr0) = &outputs[0];
    for (zc, xr) in &outputs[1..] {
        assert!(zc.re().mid() == zc0.re().mid() && zc.im().mid() == zc0.im().mid());
        assert_eq!(zc.re().rad().cmp(zc0.re().rad()), core::cmp::Ordering::Equal);
        assert_eq!(zc.im().rad().cmp(zc0.im().rad()), core::cmp::Ordering::Equal);
        assert!(xr.mid() == xr0.mid());
        assert_eq!(xr.rad().cmp(xr0.rad()), core::cmp::Ordering::Equal);
    }
}
