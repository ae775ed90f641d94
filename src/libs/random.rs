use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Entropy seam for everything nondeterministic in the engine: reply gating,
/// peer selection and simulated delays. Tests inject [`SeededRandom`] to make
/// runs reproducible.
pub trait RandomSource {
    /// True with the given probability (0.0 never, 1.0 always).
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform index into a collection of `len` elements. `len` must be > 0.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform delay in `min_ms..=max_ms`.
    fn delay_ms(&mut self, min_ms: u64, max_ms: u64) -> u64;
}

/// Production source backed by the thread-local generator.
pub struct ThreadRandom {
    rng: ThreadRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn delay_ms(&mut self, min_ms: u64, max_ms: u64) -> u64 {
        self.rng.random_range(min_ms..=max_ms)
    }
}

/// Deterministic source for tests.
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn delay_ms(&mut self, min_ms: u64, max_ms: u64) -> u64 {
        self.rng.random_range(min_ms..=max_ms)
    }
}
