//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed }
    }

    /// Seed from `STRPARSE_TEST_SEED` when set, so a failing run can be
    /// replayed; random otherwise.
    pub fn from_env_or_random() -> Self {
        match std::env::var("STRPARSE_TEST_SEED").ok().and_then(|s| s.parse().ok()) {
            Some(seed) => Self::new(seed),
            None => Self::new(rand::random()),
        }
    }

    /// Number of successes before the first failure, each with probability `p`.
    /// Small counts dominate.
    pub fn geometric(&mut self, p: f64) -> usize {
        (0..).take_while(|_| self.rng.gen_bool(p)).count()
    }

    /// Poisson-distributed count with mean `lambda` (Knuth's product method).
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let limit = (-lambda).exp();
        let mut product: f64 = self.rng.gen();
        let mut count = 0;
        while product > limit {
            product *= self.rng.gen::<f64>();
            count += 1;
        }
        count
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    fn pick(&mut self, pool: &[char], len: usize) -> String {
        (0..len).map(|_| pool[self.rng.gen_range(0..pool.len())]).collect()
    }

    /// Spaces, tabs and line breaks; spaces are the most likely.
    pub fn whitespace(&mut self) -> String {
        let len = self.geometric(0.7);
        self.pick(&[' ', ' ', ' ', '\t', '\n', '\r'], len)
    }

    /// Noise a JSON parser skips before its object. Never contains `{`.
    pub fn garbage(&mut self) -> String {
        let pool: Vec<char> = "abcxyz019 .;:=!?()[]<>\"'\\\nйé".chars().collect();
        let len = self.geometric(0.9);
        self.pick(&pool, len)
    }

    /// Initial ring buffer capacity. Mostly tiny, so marked lookahead has to
    /// grow the buffer.
    pub fn capacity(&mut self) -> usize {
        2 + self.geometric(0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_variations() {
        let (mut a, mut b) = (Gen::new(42), Gen::new(42));
        for _ in 0..10 {
            assert_eq!((a.garbage(), a.whitespace(), a.capacity()), (b.garbage(), b.whitespace(), b.capacity()));
        }
    }

    #[test]
    fn test_capacity_at_least_two() {
        let mut gen = Gen::new(3);
        assert!((0..100).all(|_| gen.capacity() >= 2));
    }

    #[test]
    fn test_garbage_has_no_open_brace() {
        let mut gen = Gen::new(7);
        for _ in 0..100 {
            assert!(!gen.garbage().contains('{'));
        }
    }
}
