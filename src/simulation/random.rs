// src/simulation/random.rs

use std::collections::VecDeque;
use std::fmt::Debug;

use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal};

/// Every random draw the engine makes goes through this trait.
///
/// Implementations must be deterministic for a given construction so that
/// runs can be replayed.
pub trait RandomSource: Debug {
    /// Exponential draw with the given rate (mean `1 / rate`).
    fn exponential(&mut self, rate: f64) -> f64;

    /// Normal draw.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Index drawn with probability proportional to `weights[index]`.
    fn weighted_index(&mut self, weights: &[f64]) -> usize;
}

/// Pseudo-random source seeded from a `u64`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn exponential(&mut self, rate: f64) -> f64 {
        // A rate rejected by `Exp` means nothing ever arrives.
        match Exp::new(rate) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => f64::INFINITY,
        }
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => mean,
        }
    }

    fn weighted_index(&mut self, weights: &[f64]) -> usize {
        match WeightedIndex::new(weights) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => 0,
        }
    }
}

/// Replays pre-recorded draws.
///
/// When a script runs dry it falls back to a neutral value: no further
/// arrival (`f64::INFINITY`), the mean lead time, and the first demand size.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    exponentials: VecDeque<f64>,
    normals: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interarrivals(mut self, draws: impl IntoIterator<Item = f64>) -> Self {
        self.exponentials.extend(draws);
        self
    }

    pub fn with_lead_times(mut self, draws: impl IntoIterator<Item = f64>) -> Self {
        self.normals.extend(draws);
        self
    }

    pub fn with_indices(mut self, draws: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(draws);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn exponential(&mut self, _rate: f64) -> f64 {
        self.exponentials.pop_front().unwrap_or(f64::INFINITY)
    }

    fn normal(&mut self, mean: f64, _std_dev: f64) -> f64 {
        self.normals.pop_front().unwrap_or(mean)
    }

    fn weighted_index(&mut self, _weights: &[f64]) -> usize {
        self.indices.pop_front().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        assert_eq!(a.seed(), 7);
        for _ in 0..20 {
            assert_eq!(a.exponential(1.5), b.exponential(1.5));
            assert_eq!(a.normal(48.0, 3.5), b.normal(48.0, 3.5));
            assert_eq!(
                a.weighted_index(&[0.3, 0.4, 0.2, 0.1]),
                b.weighted_index(&[0.3, 0.4, 0.2, 0.1])
            );
        }
    }

    #[test]
    fn test_exponential_is_positive() {
        let mut rng = SeededRandom::new(1);
        for _ in 0..1000 {
            let draw = rng.exponential(1.5);
            assert!(draw >= 0.0 && draw.is_finite());
        }
    }

    #[test]
    fn test_exponential_mean_is_inverse_rate() {
        let mut rng = SeededRandom::new(99);
        let n = 20_000;
        let mean = (0..n).map(|_| rng.exponential(2.0)).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.05, "mean was {}", mean);
    }

    #[test]
    fn test_zero_std_dev_returns_mean() {
        let mut rng = SeededRandom::new(3);
        assert_eq!(rng.normal(48.0, 0.0), 48.0);
    }

    #[test]
    fn test_weighted_index_respects_zero_weights() {
        let mut rng = SeededRandom::new(11);
        for _ in 0..500 {
            assert_eq!(rng.weighted_index(&[0.0, 1.0, 0.0]), 1);
        }
    }

    #[test]
    fn test_script_falls_back_when_exhausted() {
        let mut rng = ScriptedRandom::new()
            .with_interarrivals([1.0])
            .with_lead_times([50.0])
            .with_indices([3]);
        assert_eq!(rng.exponential(1.0), 1.0);
        assert_eq!(rng.exponential(1.0), f64::INFINITY);
        assert_eq!(rng.normal(48.0, 3.5), 50.0);
        assert_eq!(rng.normal(48.0, 3.5), 48.0);
        assert_eq!(rng.weighted_index(&[1.0]), 3);
        assert_eq!(rng.weighted_index(&[1.0]), 0);
    }
}
