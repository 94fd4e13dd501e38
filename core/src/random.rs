//! Injectable randomness for the randomizer and the Random preset.

use civic_types::{Allocation, NormalizeError, equal_split, normalize};

pub trait RandomSource {
    /// Uniform draw from `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}

/// `n` independent draws, normalized to a complete allocation.
///
/// If every draw came back zero the equal split is used instead.
pub fn random_allocation(
    n: usize,
    source: &mut dyn RandomSource,
) -> Result<Allocation, NormalizeError> {
    let draws: Vec<f64> = (0..n).map(|_| source.next_unit()).collect();
    match normalize(&draws) {
        Err(NormalizeError::ZeroSum) => equal_split(n),
        other => other,
    }
}
