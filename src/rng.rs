//! Deterministic random number generation
//!
//! All state is the seed integer itself: `roll(seed)` yields a value and the
//! seed for the next draw, so any stream can be replayed from one `u64`.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One draw from a seeded stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roll {
    /// Uniform value in `[0, 1)`.
    pub value: f64,
    /// Seed to feed back in for the next draw.
    pub next_seed: u64,
}

/// Pure seeded draw. The same seed always yields the same `Roll`.
pub fn roll(seed: u64) -> Roll {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let value: f64 = rng.gen();
    let next_seed = rng.next_u64();
    Roll { value, next_seed }
}

/// Derive a per-tile seed from the world seed and absolute tile coordinates.
///
/// Depends only on its inputs, never on the order tiles are visited in.
pub fn derive_tile_seed(world_seed: u64, x: i32, y: i32) -> u64 {
    let mut seed = world_seed;
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed ^= (x as i64 as u64).wrapping_mul(1103515245);
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed ^= (y as i64 as u64).wrapping_mul(48271);
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed
}

/// Convenience cursor over `roll`. Cloning it forks the stream at the
/// current position; the draws that follow are identical on both copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedStream {
    seed: u64,
}

impl SeedStream {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Next uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let Roll { value, next_seed } = roll(self.seed);
        self.seed = next_seed;
        value
    }

    /// Integer in the inclusive range `[min, max]`, scaled from one draw.
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.next_f64() * span).floor() as u32;
        min + offset.min(max - min)
    }

    /// Pick one of `options` by weight, consuming one draw.
    /// Returns `None` only when every weight is zero or the slice is empty.
    pub fn pick_weighted<T: Copy>(&mut self, options: &[(T, u32)]) -> Option<T> {
        let total: u32 = options.iter().map(|(_, w)| *w).sum();
        if total == 0 {
            return None;
        }
        let mut target = (self.next_f64() * total as f64).floor() as u32;
        for (item, weight) in options {
            if target < *weight {
                return Some(*item);
            }
            target -= weight;
        }
        options.iter().rev().find(|(_, w)| *w > 0).map(|(item, _)| *item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_is_pure() {
        let a = roll(42);
        let b = roll(42);
        assert_eq!(a, b, "Same seed should produce same roll");
        assert!((0.0..1.0).contains(&a.value));
    }

    #[test]
    fn test_stream_replays_from_seed() {
        let mut first = SeedStream::new(7);
        let draws: Vec<f64> = (0..5).map(|_| first.next_f64()).collect();

        let mut second = SeedStream::new(7);
        let replay: Vec<f64> = (0..5).map(|_| second.next_f64()).collect();
        assert_eq!(draws, replay);

        // Feeding next_seed manually walks the same sequence
        let r0 = roll(7);
        let r1 = roll(r0.next_seed);
        assert_eq!(draws[0], r0.value);
        assert_eq!(draws[1], r1.value);
    }

    #[test]
    fn test_tile_seed_differs_by_position() {
        let a = derive_tile_seed(99, 0, 0);
        let b = derive_tile_seed(99, 1, 0);
        let c = derive_tile_seed(99, 0, 1);
        let d = derive_tile_seed(99, -1, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a, derive_tile_seed(99, 0, 0));
    }

    #[test]
    fn test_range_stays_inclusive() {
        let mut stream = SeedStream::new(3);
        for _ in 0..500 {
            let v = stream.range_u32(2, 5);
            assert!((2..=5).contains(&v));
        }
        assert_eq!(stream.range_u32(4, 4), 4);
    }

    #[test]
    fn test_pick_weighted_skips_zero_weights() {
        let mut stream = SeedStream::new(11);
        for _ in 0..200 {
            let picked = stream.pick_weighted(&[('a', 0), ('b', 3), ('c', 0)]);
            assert_eq!(picked, Some('b'));
        }
        assert_eq!(stream.pick_weighted::<char>(&[]), None);
    }
}
