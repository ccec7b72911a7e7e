//! Core trait definitions.
//!
//! The pool builder never reaches for ambient randomness; it draws from a
//! [`RandomSource`] handed to it by the caller.

use rand::rngs::ThreadRng;
use rand::Rng;

// ---------------------------------------------------------------------------
// Random source trait
// ---------------------------------------------------------------------------

/// A source of uniformly distributed reals in `[0, 1)`.
pub trait RandomSource {
    /// Produce the next random real number in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    fn next_index(&mut self, bound: usize) -> usize {
        let scaled = (self.next_unit() * bound as f64).floor() as usize;
        // Guard against sources that return exactly 1.0.
        scaled.min(bound - 1)
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<ThreadRng> {
    /// The thread-local generator. Selection is intentionally not reproducible.
    pub fn thread() -> Self {
        RngSource(rand::thread_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Deterministic source that cycles through a fixed list of values.
///
/// Values are clamped into `[0, 1)`. An empty list always yields `0.0`.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// A source that always returns the same value.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values consumed so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.position += 1;
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
