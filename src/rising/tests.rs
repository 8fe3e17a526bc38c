#[cfg(test)]
mod tests {
    use crate::ball::{ComplexBall, RealBall};
    use crate::fp::Fp;

    use super::super::*;

    const PREC: u32 = 64;

    fn exact_rising_u64(x: u64, m: u64) -> u64 {
        (0..m).map(|i| x + i).product::<u64>().max(1)
    }

    // =====================================================================
    // strategy selection
    // =====================================================================

    #[test]
    fn sizing_is_pure_and_monotone() {
        assert_eq!(choose_strategy(3, 64), Strategy::Simple);
        assert_eq!(choose_strategy(40, 64), Strategy::EightTerm);
        match choose_strategy(1024, 1024) {
            Strategy::Rectangular { step } => assert!((2..=64).contains(&step)),
            other => panic!("expected rectangular, got {other:?}"),
        }
        // same inputs, same answer
        assert_eq!(choose_strategy(40, 64), choose_strategy(40, 64));
    }

    // =====================================================================
    // all strategies agree with the exact product
    // =====================================================================

    #[test]
    fn strategies_contain_exact_integer_products() {
        let x = RealBall::from_u64(3);
        for m in [0u64, 1, 2, 7, 8, 9, 16] {
            let expected = Fp::from_u64(exact_rising_u64(3, m));
            for strat in [Strategy::Simple, Strategy::EightTerm, Strategy::Rectangular { step: 4 }] {
                let got = rising_with_strategy(&x, m, strat, PREC);
                assert!(
                    got.contains_fp(&expected),
                    "rising(3, {m}) via {strat:?} missed {expected}"
                );
            }
        }
    }

    #[test]
    fn strategies_overlap_on_fractional_argument() {
        let x = RealBall::from_i64(1).div(&RealBall::from_i64(3), 128);
        let a = rising_with_strategy(&x, 24, Strategy::Simple, 128);
        let b = rising_with_strategy(&x, 24, Strategy::EightTerm, 128);
        let c = rising_with_strategy(&x, 24, Strategy::Rectangular { step: 5 }, 128);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&c));
        assert!(a.overlaps(&c));
        assert!(a.rel_accuracy_bits() > 100);
    }

    #[test]
    fn complex_rising_matches_componentwise_identity() {
        // (i)(i+1)(i+2) = (i)(i+1) * (i+2); spot check against hand expansion:
        // i(i+1) = -1 + i; (-1+i)(i+2) = -3 + i
        let x = ComplexBall::from_f64s(0.0, 1.0);
        let r = rising(&x, 3, PREC);
        assert!(r.re().contains_f64(-3.0));
        assert!(r.im().contains_f64(1.0));
    }

    #[test]
    fn zero_factor_annihilates() {
        // x = -4 hits the factor (x+4) = 0
        let x = RealBall::from_i64(-4);
        let r = rising(&x, 9, PREC);
        assert!(r.contains_fp(&Fp::zero()));
        assert!(r.rad().is_zero() || r.contains_f64(0.0));
    }

    #[test]
    fn indeterminate_input_propagates() {
        let x = RealBall::indeterminate();
        assert!(!rising(&x, 5, PREC).is_finite());
    }

    #[test]
    fn rectangular_handles_non_divisible_block() {
        let x = RealBall::from_u64(2);
        // 11 = 2 blocks of 4 + 3 tail factors
        let got = rising_with_strategy(&x, 11, Strategy::Rectangular { step: 4 }, PREC);
        let expected = Fp::from_u64(exact_rising_u64(2, 11));
        assert!(got.contains_fp(&expected));
    }
}
