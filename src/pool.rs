//! Fork-join helpers with a fixed, deterministic merge tree.
//!
//! Both entry points produce bit-identical results for any worker count:
//! [`map`] writes disjoint output slots in index order, and [`reduce`]
//! splits its range at the midpoint every time, so the shape of the merge
//! tree — and therefore the rounding history of every merge — does not
//! depend on scheduling. With the `parallel` feature disabled the same code
//! paths run serially.

/// Evaluate `f(0), …, f(n-1)` into a vector, possibly in parallel.
#[cfg(feature = "parallel")]
pub fn map<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    use rayon::prelude::*;
    (0..n).into_par_iter().map(f).collect()
}

/// Evaluate `f(0), …, f(n-1)` into a vector.
#[cfg(not(feature = "parallel"))]
pub fn map<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    (0..n).map(f).collect()
}

/// Binary-splitting reduction over `[lo, hi)`.
///
/// Ranges of at most `basecase` elements are handed to `base`; longer
/// ranges split at the midpoint and the two halves are combined with
/// `merge`. The split point is a pure function of the range, so the merge
/// tree is identical no matter how the halves are scheduled.
pub fn reduce<T, B, M>(lo: u64, hi: u64, basecase: u64, base: &B, merge: &M) -> T
where
    T: Send,
    B: Fn(u64, u64) -> T + Sync,
    M: Fn(T, T) -> T + Sync,
{
    debug_assert!(lo < hi, "reduce over an empty range");
    if hi - lo <= basecase {
        return base(lo, hi);
    }
    let mid = lo + (hi - lo) / 2;
    let (left, right) = join(
        || reduce(lo, mid, basecase, base, merge),
        || reduce(mid, hi, basecase, base, merge),
    );
    merge(left, right)
}

#[cfg(feature = "parallel")]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_preserves_index_order() {
        let v = map(100, |i| i * i);
        assert_eq!(v[7], 49);
        assert_eq!(v.len(), 100);
    }

    #[test]
    fn reduce_sums_range() {
        let s = reduce(
            0,
            1000,
            8,
            &|lo, hi| (lo..hi).sum::<u64>(),
            &|a, b| a + b,
        );
        assert_eq!(s, 499_500);
    }

    #[test]
    fn reduce_tree_shape_is_fixed() {
        // merge order sensitivity check: string concatenation is not
        // commutative, so any scheduling dependence would show up here
        let s = reduce(
            0,
            16,
            1,
            &|lo, _| lo.to_string(),
            &|a, b| format!("({a}{b})"),
        );
        let again = reduce(
            0,
            16,
            1,
            &|lo, _| lo.to_string(),
            &|a, b| format!("({a}{b})"),
        );
        assert_eq!(s, again);
    }
}
