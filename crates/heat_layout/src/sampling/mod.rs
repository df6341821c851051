//! Random draws used by sample generation.
//!
//! All randomness flows through an explicitly passed [`rand::Rng`]; nothing in
//! the crate seeds or reads a global generator. This module holds the small
//! primitives (unit floats, bounded indices, shuffles, Gaussian pairs) and the
//! per-component [`IntensitySampler`].
use rand::Rng as RngCore;

pub mod intensity;

pub use intensity::{IntensitySampler, IntensitySpec};

/// Generate a random float in the range [0, 1) with 53 bits of precision.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Generate a random float in the open range (0, 1), safe for logarithms.
#[inline]
pub(crate) fn rand_open01(rng: &mut dyn RngCore) -> f64 {
    rand01(rng).clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON)
}

/// Uniform index in `0..n`. `n` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn RngCore, n: usize) -> usize {
    debug_assert!(n > 0, "rand_index requires n > 0");
    ((rng.next_u64() as u128 * n as u128) >> 64) as usize
}

/// In-place Fisher–Yates shuffle.
pub(crate) fn shuffle<T>(items: &mut [T], rng: &mut dyn RngCore) {
    for i in (1..items.len()).rev() {
        let j = rand_index(rng, i + 1);
        items.swap(i, j);
    }
}

/// Pick `k` distinct values of `candidates` uniformly at random (all of them if `k`
/// exceeds the candidate count). The returned order is the shuffled order.
pub(crate) fn choose_distinct<T: Copy>(
    candidates: &[T],
    k: usize,
    rng: &mut dyn RngCore,
) -> Vec<T> {
    let mut pool = candidates.to_vec();
    shuffle(&mut pool, rng);
    pool.truncate(k);
    pool
}

/// Two independent standard normal draws (Box–Muller).
pub(crate) fn box_muller_pair(rng: &mut dyn RngCore) -> (f64, f64) {
    let u1 = (1.0 - rand01(rng)).clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rand01(rng);

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * core::f64::consts::PI * u2;

    (r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn rand01_values_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10_000 {
            let v = rand01(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn rand_index_stays_below_bound() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [false; 7];
        for _ in 0..1_000 {
            let i = rand_index(&mut rng, 7);
            assert!(i < 7);
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn shuffle_is_a_permutation_and_deterministic() {
        let mut a: Vec<usize> = (0..50).collect();
        let mut b = a.clone();
        shuffle(&mut a, &mut StdRng::seed_from_u64(11));
        shuffle(&mut b, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(a, sorted);
    }

    #[test]
    fn choose_distinct_truncates_and_keeps_unique() {
        let mut rng = StdRng::seed_from_u64(8);
        let picked = choose_distinct(&[1, 2, 3, 4, 5], 3, &mut rng);
        assert_eq!(picked.len(), 3);
        let mut dedup = picked.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), 3);

        assert_eq!(choose_distinct(&[1, 2], 10, &mut rng).len(), 2);
    }

    #[test]
    fn box_muller_is_roughly_standard() {
        let mut rng = StdRng::seed_from_u64(21);
        let n = 50_000;
        let draws: Vec<f64> = (0..n).map(|_| box_muller_pair(&mut rng).0).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.03, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "var {var}");
    }
}
