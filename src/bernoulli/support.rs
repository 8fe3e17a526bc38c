//! Support routines shared by the Bernoulli backends.
//!
//! Everything here is either exact (denominator, factorial, primes) or a
//! certified enclosure (zeta values). The asymptotic magnitude bound is the
//! one heuristic: it feeds precision schedules, never correctness.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::ball::RealBall;
use crate::pool;
use crate::Mag;

/// Upper bound on log₂ |Bₙ| for even n, from |Bₙ| = 2 ζ(n) n!/(2π)ⁿ with
/// Stirling's bound on n! and ζ(n) ≤ ζ(2).
pub fn bound_2exp(n: u64) -> f64 {
    debug_assert!(n % 2 == 0);
    if n == 0 {
        return 0.0;
    }
    if n == 2 {
        // |B_2| = 1/6
        return -2.0;
    }
    const LOG2_2PI: f64 = 2.651_496_129_472_319;
    let nf = n as f64;
    let log2n = nf.log2();
    // log2(n!) <= 0.5 log2(2 pi n) + n (log2 n - log2 e) + 1/(12 n ln 2)
    let log2_fac =
        0.5 * (LOG2_2PI + log2n) + nf * (log2n - core::f64::consts::LOG2_E) + 0.2;
    // 2 zeta(n) <= 4
    log2_fac - nf * LOG2_2PI + 2.0
}

/// Denominator of Bₙ by von Staudt–Clausen: the product of all primes p
/// with (p−1) | n. Exact; n must be even.
pub fn denom(n: u64) -> BigUint {
    debug_assert!(n % 2 == 0);
    if n == 0 {
        return BigUint::one();
    }
    let mut d = BigUint::one();
    // (p-1) | n means p = d+1 for a divisor d of n
    let mut div = 1u64;
    while div * div <= n {
        if n % div == 0 {
            if is_prime(div + 1) {
                d *= BigUint::from(div + 1);
            }
            let other = n / div;
            if other != div && is_prime(other + 1) {
                d *= BigUint::from(other + 1);
            }
        }
        div += 1;
    }
    d
}

/// Estimated bit length of the numerator of Bₙ, used to size working
/// precisions and the multi-modular bit budget. Always an over-estimate.
pub fn numerator_bits(n: u64) -> u64 {
    let b = bound_2exp(n).max(0.0).ceil() as u64;
    b + denom(n).bits() + 2
}

/// n! by binary-splitting product over [1, n], parallel above the base case.
pub fn factorial(n: u64) -> BigUint {
    if n < 2 {
        return BigUint::one();
    }
    pool::reduce(
        1,
        n + 1,
        32,
        &|lo, hi| {
            let mut p = BigUint::from(lo);
            for i in lo + 1..hi {
                p *= BigUint::from(i);
            }
            p
        },
        &|a, b| a * b,
    )
}

/// Certified enclosure of ζ(n) for even n ≥ 4, by direct summation with the
/// integral tail bound Σ_{j>N} j⁻ⁿ ≤ N^(1−n)/(n−1).
pub fn zeta_even(n: u64, prec: u32) -> RealBall {
    assert!(n >= 4 && n % 2 == 0, "zeta_even requires even n >= 4");
    let wp = prec + 8;
    // smallest N with (n-1) log2(N) >= wp + 2
    let log2_terms = (wp as u64 + 2).div_ceil(n - 1).min(30);
    let nmax: u64 = 1u64 << log2_terms;

    let mut sum = RealBall::one();
    let mut j = 2u64;
    while j <= nmax {
        let t = RealBall::from_u64(j).pow_u64(n, wp).inv(wp);
        sum = sum.add(&t, wp);
        j += 1;
    }
    // tail <= nmax^(1-n)/(n-1) <= 2 * 2^(-(n-1) log2 nmax)
    let tail_exp = -((n - 1) as i64).saturating_mul(log2_terms as i64) + 1;
    sum.add_error(Mag::pow2(tail_exp));
    sum.set_round(prec)
}

/// |Bₙ| as a ball: 2 n!/(2π)ⁿ · ζ(n), for even n ≥ 4. The sign is fixed by
/// the caller from n mod 4.
pub fn bernoulli_abs_ball(n: u64, prec: u32) -> RealBall {
    let wp = prec + 16;
    let fac = RealBall::from_bigint(&BigInt::from(factorial(n)));
    let two_pi_n = crate::ball::const_pi(wp).mul_2exp(1).pow_u64(n, wp);
    let pre = fac.div(&two_pi_n, wp).mul_2exp(1);
    pre.mul(&zeta_even(n, wp), prec)
}

/// B₀ … Bₙ by the defining recurrence Σ_{j≤m} C(m+1, j) Bⱼ = [m = 0].
/// Exact but quadratic; used to seed the cache below the reverse
/// generator's range and as the brute-force reference in tests.
pub fn recurrence_table(n_max: u64) -> Vec<BigRational> {
    let mut table: Vec<BigRational> = Vec::with_capacity(n_max as usize + 1);
    table.push(BigRational::one());
    for m in 1..=n_max as usize {
        let mut sum = BigRational::zero();
        let mut binom = BigInt::one(); // C(m+1, j), j ascending from 0
        for (j, bj) in table.iter().enumerate() {
            sum += bj * BigRational::from_integer(binom.clone());
            binom = binom * BigInt::from(m + 1 - j) / BigInt::from(j + 1);
        }
        table.push(-sum / BigRational::from_integer(BigInt::from(m as u64 + 1)));
    }
    table
}

// ── Primes ──────────────────────────────────────────────────────────

/// Deterministic trial-division primality for the word-sized moduli the
/// multi-modular backend uses.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    if n % 3 == 0 {
        return n == 3;
    }
    let mut d = 5u64;
    while d * d <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Smallest prime strictly greater than `n`.
pub fn next_prime(n: u64) -> u64 {
    let mut c = if n < 2 {
        2
    } else if n % 2 == 0 {
        n + 1
    } else {
        n + 2
    };
    while !is_prime(c) {
        c += 2;
    }
    c
}

// ── Word-sized modular arithmetic ───────────────────────────────────

pub fn mulmod(a: u64, b: u64, p: u64) -> u64 {
    ((a as u128 * b as u128) % p as u128) as u64
}

pub fn addmod(a: u64, b: u64, p: u64) -> u64 {
    let s = a + b;
    if s >= p {
        s - p
    } else {
        s
    }
}

pub fn submod(a: u64, b: u64, p: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        a + p - b
    }
}

pub fn powmod(mut b: u64, mut e: u64, p: u64) -> u64 {
    let mut acc = 1u64 % p;
    b %= p;
    while e > 0 {
        if e & 1 == 1 {
            acc = mulmod(acc, b, p);
        }
        b = mulmod(b, b, p);
        e >>= 1;
    }
    acc
}

/// Modular inverse for prime modulus, via Fermat.
pub fn invmod(a: u64, p: u64) -> u64 {
    debug_assert!(a % p != 0, "invmod of zero residue");
    powmod(a, p - 2, p)
}

/// Smallest multiplicative generator of GF(p)*.
pub fn primitive_root(p: u64) -> u64 {
    debug_assert!(is_prime(p) && p >= 3);
    let mut factors = Vec::new();
    let mut m = p - 1;
    let mut d = 2u64;
    while d * d <= m {
        if m % d == 0 {
            factors.push(d);
            while m % d == 0 {
                m /= d;
            }
        }
        d += 1;
    }
    if m > 1 {
        factors.push(m);
    }
    let mut g = 2u64;
    loop {
        if factors.iter().all(|&q| powmod(g, (p - 1) / q, p) != 1) {
            return g;
        }
        g += 1;
    }
}
