//! Seeded Gaussian noise for forecast paths.
//!
//! Every forecast owns its own generator, seeded from a stable 64-bit hash of
//! the event name. There is no process-wide RNG state, so repeated calls with
//! the same inputs are bit-identical and events can be generated in parallel
//! without coordinating randomness.
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use xxhash_rust::xxh64::xxh64;

/// Stable seed for an event name (`xxh64`, seed 0).
pub fn seed_from_name(name: &str) -> u64 {
    xxh64(name.as_bytes(), 0)
}

/// NoiseSource — zero-mean Gaussian draws from a seeded `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: ChaCha8Rng,
    normal: Normal<f64>,
}

impl NoiseSource {
    /// Gaussian source with standard deviation `std`.
    ///
    /// Returns `None` when `std` is not a finite positive number, i.e. when
    /// there is no noise to draw.
    pub fn new(std: f64, seed: u64) -> Option<Self> {
        if !std.is_finite() || std <= 0.0 {
            return None;
        }
        let normal = Normal::new(0.0, std).ok()?;
        Some(NoiseSource { rng: ChaCha8Rng::seed_from_u64(seed), normal })
    }

    /// Source seeded from an event name.
    pub fn for_event(name: &str, std: f64) -> Option<Self> {
        NoiseSource::new(std, seed_from_name(name))
    }

    pub fn std_dev(&self) -> f64 {
        self.normal.std_dev()
    }

    /// One draw.
    pub fn draw(&mut self) -> f64 {
        self.normal.sample(&mut self.rng)
    }

    /// `n` consecutive draws.
    pub fn draws(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.draw()).collect()
    }
}
