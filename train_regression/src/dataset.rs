//! Synthetic data for fitting a straight line.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A single `(x, y)` observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// Container for regression samples
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Draws `count` samples of `y = slope * x + intercept + e` with `x` uniform
    /// in `[-1, 1]` and `e` uniform in `[-noise, noise]`.
    ///
    /// The same seed always yields the same dataset.
    pub fn synthetic(count: usize, slope: f64, intercept: f64, noise: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = noise.abs();
        let samples = (0..count)
            .map(|_| {
                let x = rng.random_range(-1.0..=1.0);
                let e = rng.random_range(-noise..=noise);
                Sample {
                    x,
                    y: slope * x + intercept + e,
                }
            })
            .collect();
        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}
