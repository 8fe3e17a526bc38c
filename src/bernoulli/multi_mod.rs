//! Multi-modular computation of isolated Bernoulli numbers.
//!
//! The numerator of Bₙ is reconstructed from two independent sources of
//! bits: residues Bₙ mod p for many word-sized primes, combined by a
//! deterministic balanced CRT tree, and a floating zeta evaluation that
//! resolves the remaining high bits. The split is controlled by α ∈ [0, 1]
//! (fraction of the bits taken from residues); every α yields the identical
//! exact result, which the cross-check tests exercise.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::config::{BERNOULLI_MAX_RETRIES, BERNOULLI_MULTI_MOD_MIN, BERNOULLI_REFINE_STEP};
use crate::pool;

use super::support::{
    self, addmod, invmod, mulmod, next_prime, powmod, primitive_root, submod,
};

/// Bₙ mod p as a residue of the rational, for p ≥ 5 prime with
/// n mod (p−1) ≠ 0 (von Staudt–Clausen guarantees p does not divide the
/// denominator). Kummer's congruence reduces the index: for
/// m = n mod (p−1), Bₙ/n ≡ Bₘ/m, so Bₙ ≡ n · (Bₘ/m) mod p.
pub fn bernoulli_mod_p(n: u64, p: u64) -> u64 {
    debug_assert!(p >= 5 && n >= 2 && n % 2 == 0);
    let m = n % (p - 1);
    debug_assert!(m != 0, "prime filter admitted n divisible by p-1");
    let g = primitive_root(p);
    let s = sum_powg(p, m, g);
    // s = (1 - g^m) B_m / (2m); divide out (1 - g^m) and double
    let t = invmod((p + 1 - powmod(g, m, p)) % p, p);
    let half = mulmod(s, t, p);
    let bm_over_m = addmod(half, half, p);
    mulmod(bm_over_m, n % p, p)
}

/// The power-sum of the generator: returns (1 − gᵏ)·Bₖ/(2k) mod p.
///
/// Σ_{j=1}^{(p-1)/2} h(g·g^{j-1}) (g^{k-1})^j where h(x) = ⌊x/p⌋ − (g−1)/2,
/// accumulated with the quotient produced by the running product g^j mod p.
fn sum_powg(p: u64, k: u64, g: u64) -> u64 {
    debug_assert!(k >= 2 && k <= p - 3 && k % 2 == 0);
    let half_gm1 = (g + if g % 2 == 1 { 0 } else { p } - 1) / 2;
    let g_to_km1 = powmod(g, k - 1, p);
    let mut g_to_jm1: u64 = 1;
    let mut g_to_km1_to_j = g_to_km1;
    let mut sum: u64 = 0;
    for _ in 1..=(p - 1) / 2 {
        let prod = g_to_jm1 as u128 * g as u128;
        let q = (prod / p as u128) as u64;
        g_to_jm1 = (prod % p as u128) as u64;
        let h = submod(q, half_gm1, p);
        sum = submod(sum, mulmod(h, g_to_km1_to_j, p), p);
        g_to_km1_to_j = mulmod(g_to_km1_to_j, g_to_km1, p);
    }
    sum
}

/// CRT merge of two residue/modulus pairs; the canonical representative in
/// [0, m1·m2) of the class matching r1 mod m1 and r2 mod m2.
fn crt_combine(a: (BigInt, BigInt), b: (BigInt, BigInt)) -> (BigInt, BigInt) {
    let (r1, m1) = a;
    let (r2, m2) = b;
    let gcd = m1.extended_gcd(&m2);
    debug_assert!(gcd.gcd.is_one(), "CRT over non-coprime moduli");
    let mm = &m1 * &m2;
    let mut r = (&r2 - &r1) * gcd.x * &m1 + &r1;
    r = r.mod_floor(&mm);
    (r, mm)
}

/// Exact Bₙ for even n via the multi-modular reconstruction. `alpha` is the
/// residue/refinement bit split; `None` selects the tuned default.
pub fn bernoulli_multi_mod(n: u64, alpha: Option<f64>) -> BigRational {
    assert!(n % 2 == 0, "multi-modular backend handles even indices");
    if n < BERNOULLI_MULTI_MOD_MIN {
        return support::recurrence_table(n)[n as usize].clone();
    }
    let alpha = alpha.unwrap_or_else(|| crate::config::bernoulli_default_alpha(n));
    assert!((0.0..=1.0).contains(&alpha), "alpha outside [0, 1]");

    let den = BigInt::from(support::denom(n));
    let bits = support::numerator_bits(n);
    let mod_bits = (bits as f64 * alpha) as u64;
    let zeta_bits = bits - mod_bits;

    // collect primes until the floor-log sum certifies product >= 2^mod_bits
    let mut primes: Vec<u64> = Vec::new();
    let mut bits_gathered = 0u64;
    let mut p = 5u64;
    while bits_gathered < mod_bits {
        if n % (p - 1) != 0 {
            primes.push(p);
            bits_gathered += 63 - p.leading_zeros() as u64;
        }
        p = next_prime(p);
    }

    let residues = pool::map(primes.len(), |i| bernoulli_mod_p(n, primes[i]));

    let (r, m) = if primes.is_empty() {
        (BigInt::zero(), BigInt::one())
    } else {
        pool::reduce(
            0,
            primes.len() as u64,
            1,
            &|lo, _| (BigInt::from(residues[lo as usize]), BigInt::from(primes[lo as usize])),
            &crt_combine,
        )
    };

    // residue of the numerator: B_n * den mod m, with the sign of B_n
    // (negative exactly when 4 | n) picked as the representative
    let mut num = (r * &den).mod_floor(&m);
    if n % 4 == 0 {
        num -= &m;
    }

    if zeta_bits > 0 {
        num = refine_with_zeta(n, &den, num, &m, zeta_bits);
    }

    BigRational::new(num, den)
}

/// Resolve the bits the residues did not cover: find the unique integer t
/// with Bₙ·den = num + t·m, from a certified ball of Bₙ at increasing
/// precision.
fn refine_with_zeta(n: u64, den: &BigInt, num: BigInt, m: &BigInt, zeta_bits: u64) -> BigInt {
    let den_abs = crate::ball::RealBall::from_bigint(den);
    let m_ball = crate::ball::RealBall::from_bigint(m);
    let mut prec = (zeta_bits + 10).min(u32::MAX as u64) as u32;
    for _ in 0..=BERNOULLI_MAX_RETRIES {
        let mut b = support::bernoulli_abs_ball(n, prec);
        if n % 4 == 0 {
            b = b.neg();
        }
        let t_ball = b
            .mul(&den_abs, prec)
            .sub(&crate::ball::RealBall::from_bigint(&num), prec)
            .div(&m_ball, prec);
        if let Some(t) = t_ball.unique_bigint() {
            return num + t * m;
        }
        log::debug!(
            "bernoulli multi-mod: n = {n}, zeta bits = {zeta_bits}, prec = {prec}: \
             refinement not unique, retrying"
        );
        prec += BERNOULLI_REFINE_STEP;
    }
    panic!("bernoulli multi-mod: refinement for B_{n} failed to converge");
}
