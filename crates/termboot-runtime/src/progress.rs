#![forbid(unsafe_code)]

//! Scan progress simulation.
//!
//! [`ProgressSimulator`] is a pure policy: given the current progress it
//! returns the next value, drawing the increment from an injected
//! [`RandomSource`]. Tests inject a [`FixedSequence`]; the demo injects a
//! [`SeededRandom`].

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{DEFAULT_MAX_INCREMENT, DEFAULT_MIN_INCREMENT};

/// Progress value at which the scan is complete.
pub const SCAN_COMPLETE: f64 = 100.0;

/// Largest value a unit sample may take (keeps ranges half-open).
const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// `StdRng`-backed source, reproducible when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Deterministic source for the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Samples are clamped into `[0, 1)`. An empty list always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    /// Replay `values` in order.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// A source that always yields `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, MAX_UNIT)
        }
    }
}

/// Randomized progress policy.
pub struct ProgressSimulator {
    source: Box<dyn RandomSource>,
    min_increment: f64,
    max_increment: f64,
}

impl fmt::Debug for ProgressSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressSimulator")
            .field("min_increment", &self.min_increment)
            .field("max_increment", &self.max_increment)
            .finish_non_exhaustive()
    }
}

impl ProgressSimulator {
    /// Simulator with the default `[0.5, 3.5)` increment range.
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            min_increment: DEFAULT_MIN_INCREMENT,
            max_increment: DEFAULT_MAX_INCREMENT,
        }
    }

    /// Set the increment range `[min, max)` (builder).
    ///
    /// [`SequenceController::new`](crate::SequenceController::new) applies the
    /// configured range after checking it with
    /// [`SequenceConfig::validate`](crate::SequenceConfig::validate).
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min_increment = min;
        self.max_increment = max;
        self
    }

    /// Lower bound of the increment.
    pub fn min_increment(&self) -> f64 {
        self.min_increment
    }

    /// Upper (exclusive) bound of the increment.
    pub fn max_increment(&self) -> f64 {
        self.max_increment
    }

    /// Progress after one more tick: `progress + uniform(min, max)`.
    ///
    /// The result is not clamped; callers clamp to [`SCAN_COMPLETE`].
    pub fn next(&mut self, progress: f64) -> f64 {
        let span = self.max_increment - self.min_increment;
        progress + self.min_increment + self.source.next_unit() * span
    }

    /// Whether `progress` has reached [`SCAN_COMPLETE`].
    #[inline]
    pub fn is_complete(progress: f64) -> bool {
        progress >= SCAN_COMPLETE
    }
}
