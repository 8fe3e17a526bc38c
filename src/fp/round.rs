//! Rounding modes and the shared mantissa-rounding kernel.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Rounding mode for [`crate::fp::Fp`] operations.
///
/// `Down`/`Up` act on the magnitude (toward/away from zero); `Floor`/`Ceil`
/// act on the signed value. `Nearest` is round-to-nearest, ties to even.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Round {
    Nearest,
    Down,
    Up,
    Floor,
    Ceil,
}

/// Magnitude-level rounding direction after the sign has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MagDir {
    Trunc,
    Away,
    Nearest,
}

impl Round {
    pub(crate) fn mag_dir(self, neg: bool) -> MagDir {
        match self {
            Round::Nearest => MagDir::Nearest,
            Round::Down => MagDir::Trunc,
            Round::Up => MagDir::Away,
            Round::Floor => {
                if neg {
                    MagDir::Away
                } else {
                    MagDir::Trunc
                }
            }
            Round::Ceil => {
                if neg {
                    MagDir::Trunc
                } else {
                    MagDir::Away
                }
            }
        }
    }
}

/// Round `man * 2^exp` (sign `neg`) to at most `prec` mantissa bits.
///
/// Returns `(man, exp, err_exp)` with `man` odd-normalized (or zero) and
/// `err_exp = Some(e)` meaning the absolute rounding error is at most `2^e`;
/// `None` means the result is exact.
pub(crate) fn round_mantissa(
    man: BigUint,
    exp: i64,
    neg: bool,
    prec: u32,
    rnd: Round,
) -> (BigUint, i64, Option<i64>) {
    let bits = man.bits();
    if bits <= prec as u64 {
        return normalize(man, exp, None);
    }

    let drop = bits - prec as u64;
    // Everything discarded (or added back by an increment) fits below one
    // unit in the last kept place.
    let err_exp = exp.saturating_add(drop as i64);

    let sticky_any = match man.trailing_zeros() {
        Some(tz) => tz < drop,
        None => false,
    };
    let mut hi: BigUint = &man >> drop;

    let inc = match rnd.mag_dir(neg) {
        MagDir::Trunc => false,
        MagDir::Away => sticky_any,
        MagDir::Nearest => {
            let guard = man.bit(drop - 1);
            if !guard {
                false
            } else {
                let sticky_below_guard = match man.trailing_zeros() {
                    Some(tz) => tz < drop - 1,
                    None => false,
                };
                if sticky_below_guard {
                    true
                } else {
                    // exact tie: round to even
                    hi.bit(0)
                }
            }
        }
    };

    if inc {
        hi += 1u32;
    }

    let err = if sticky_any { Some(err_exp) } else { None };
    normalize(hi, exp.saturating_add(drop as i64), err)
}

fn normalize(man: BigUint, exp: i64, err: Option<i64>) -> (BigUint, i64, Option<i64>) {
    if man.is_zero() {
        return (BigUint::zero(), 0, err);
    }
    let tz = man.trailing_zeros().unwrap_or(0);
    if tz == 0 && man.is_one() {
        return (man, exp, err);
    }
    (man >> tz, exp + tz as i64, err)
}
