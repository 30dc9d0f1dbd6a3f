#![forbid(unsafe_code)]

//! Random sources for fan scatter jitter.
//!
//! The layout asks for uniform samples in `[0, 1)`. Production code uses an
//! OS-seeded [`RandomScatter`]; tests use [`RandomScatter::seeded`] or a
//! [`FixedScatter`] to get reproducible layouts.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait ScatterSource {
    fn next_unit(&mut self) -> f64;
}

impl<S: ScatterSource + ?Sized> ScatterSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<S: ScatterSource + ?Sized> ScatterSource for Box<S> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Pseudo-random scatter backed by a small fast RNG.
#[derive(Debug, Clone)]
pub struct RandomScatter {
    rng: SmallRng,
}

impl RandomScatter {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomScatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterSource for RandomScatter {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Returns the same sample forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScatter(f64);

impl FixedScatter {
    /// The value is clamped into `[0, 1)`.
    pub fn new(value: f64) -> Self {
        let v = if value.is_nan() { 0.0 } else { value };
        Self(v.clamp(0.0, 1.0 - f64::EPSILON))
    }
}

impl ScatterSource for FixedScatter {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}
