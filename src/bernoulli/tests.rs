#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use num_traits::{Signed, ToPrimitive, Zero};

    use super::super::support::{denom, invmod, is_prime, next_prime, primitive_root, powmod};
    use super::super::*;

    fn rat(num: i64, den: i64) -> BigRational {
        BigRational::new(BigInt::from(num), BigInt::from(den))
    }

    /// Reduce an exact rational modulo a prime not dividing its denominator.
    fn rational_mod_p(q: &BigRational, p: u64) -> u64 {
        let pb = BigInt::from(p);
        let num = ((q.numer() % &pb) + &pb) % &pb;
        let den = ((q.denom() % &pb) + &pb) % &pb;
        let den_inv = invmod(den.to_u64().unwrap(), p);
        (num.to_u64().unwrap() as u128 * den_inv as u128 % p as u128) as u64
    }

    // =====================================================================
    // small exact values
    // =====================================================================

    #[test]
    fn classical_values() {
        assert_eq!(bernoulli_number(0), rat(1, 1));
        assert_eq!(bernoulli_number(1), rat(-1, 2));
        assert_eq!(bernoulli_number(2), rat(1, 6));
        assert_eq!(bernoulli_number(4), rat(-1, 30));
        assert_eq!(bernoulli_number(12), rat(-691, 2730));
        assert_eq!(bernoulli_number(3), BigRational::zero());
        assert_eq!(bernoulli_number(99), BigRational::zero());
    }

    #[test]
    fn recurrence_matches_known_row() {
        let t = recurrence_table(14);
        assert_eq!(t[10], rat(5, 66));
        assert_eq!(t[14], rat(7, 6));
        assert!(t[7].is_zero());
    }

    #[test]
    fn von_staudt_clausen_denominators() {
        // denom(n) = product of primes p with (p-1) | n
        assert_eq!(denom(2).to_u64().unwrap(), 6);
        assert_eq!(denom(12).to_u64().unwrap(), 2730);
        assert_eq!(denom(40).to_u64().unwrap(), 2 * 3 * 5 * 11 * 41);
    }

    // =====================================================================
    // backends agree exactly
    // =====================================================================

    #[test]
    fn reverse_generator_matches_recurrence() {
        let reference = recurrence_table(60);
        let mut seen = 0;
        for (n, value) in BernoulliRev::new(60) {
            assert_eq!(value, reference[n as usize], "B_{n} mismatch");
            seen += 1;
        }
        assert_eq!(seen, (60 - 34) / 2 + 1);
    }

    #[test]
    fn multi_mod_matches_recurrence_across_alpha() {
        let reference = recurrence_table(120);
        for n in [10u64, 36, 84, 120] {
            for alpha in [0.0, 0.3, 0.7, 1.0] {
                let value = bernoulli_multi_mod(n, Some(alpha));
                assert_eq!(
                    value, reference[n as usize],
                    "B_{n} mismatch at alpha = {alpha}"
                );
            }
        }
    }

    #[test]
    fn residues_match_exact_values() {
        let reference = recurrence_table(40);
        for (n, p) in [(12u64, 11u64), (20, 23), (40, 29), (36, 1009)] {
            assert!(n % (p - 1) != 0);
            let got = bernoulli_mod_p(n, p);
            assert_eq!(got, rational_mod_p(&reference[n as usize], p), "B_{n} mod {p}");
        }
    }

    // =====================================================================
    // cache service
    // =====================================================================

    #[test]
    fn isolated_cache_grows_monotonically() {
        let cache = BernoulliCache::new();
        assert!(cache.is_empty());
        cache.ensure(8);
        let after_small = cache.len();
        assert!(after_small >= 9);
        cache.ensure(50);
        assert!(cache.len() > after_small);
        // re-ensuring a covered index is a no-op
        cache.ensure(10);
        assert_eq!(cache.get(12), rat(-691, 2730));
        assert_eq!(cache.get(50), recurrence_table(50)[50]);
    }

    #[test]
    fn odd_indices_bypass_the_table() {
        let cache = BernoulliCache::new();
        assert_eq!(cache.get(1), rat(-1, 2));
        assert!(cache.get(12345).is_zero());
        // no table growth for odd requests
        assert!(cache.is_empty());
    }

    #[test]
    #[should_panic(expected = "cache limit")]
    fn oversized_ensure_is_a_contract_violation() {
        BernoulliCache::new().ensure(crate::config::BERNOULLI_CACHE_LIMIT + 2);
    }

    // =====================================================================
    // support routines
    // =====================================================================

    #[test]
    fn magnitude_bound_is_an_upper_bound() {
        let reference = recurrence_table(60);
        for n in (2..=60u64).step_by(2) {
            let b = &reference[n as usize];
            let actual =
                b.numer().abs().to_f64().unwrap().log2() - b.denom().to_f64().unwrap().log2();
            assert!(
                bound_2exp(n) >= actual,
                "bound_2exp({n}) = {} below actual {actual}",
                bound_2exp(n)
            );
        }
    }

    #[test]
    fn zeta_even_encloses_classical_values() {
        // zeta(10) = pi^10 / 93555, zeta(12) = 691 pi^12 / 638512875
        let z10 = zeta_even(10, 64);
        assert!((z10.mid().to_f64() - 1.000_994_575_127_818).abs() < 1e-14);
        assert!(z10.rel_accuracy_bits() > 56);
        let z12 = zeta_even(12, 64);
        assert!((z12.mid().to_f64() - 1.000_246_086_553_308_1).abs() < 1e-14);
        let z = zeta_even(100, 128);
        assert!((z.mid().to_f64() - 1.0).abs() < 1e-15);
        assert!(z.rel_accuracy_bits() > 100);
    }

    #[test]
    fn prime_helpers() {
        assert!(is_prime(2) && is_prime(1009) && !is_prime(1));
        assert!(!is_prime(1007)); // 19 * 53
        assert_eq!(next_prime(5), 7);
        assert_eq!(next_prime(89), 97);
        // primitive root generates the full group
        let p = 1009u64;
        let g = primitive_root(p);
        assert_ne!(powmod(g, (p - 1) / 2, p), 1);
        assert_ne!(powmod(g, (p - 1) / 7, p), 1);
    }
}
