// src/utils/sampler.rs

use std::sync::Mutex;

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Source of randomness for question selection.
///
/// Held in `AppState` as `Arc<dyn QuestionSampler>` so tests can swap in a
/// seeded implementation and assert on exact draws.
pub trait QuestionSampler: Send + Sync {
    /// Draws up to `amount` distinct ids uniformly from `candidates`.
    /// Returns every candidate (in random order) when fewer are available.
    fn sample(&self, candidates: &[i64], amount: usize) -> Vec<i64>;
}

/// Production sampler backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSampler;

impl QuestionSampler for ThreadRngSampler {
    fn sample(&self, candidates: &[i64], amount: usize) -> Vec<i64> {
        let mut rng = rand::thread_rng();
        candidates
            .choose_multiple(&mut rng, amount)
            .copied()
            .collect()
    }
}

/// Deterministic sampler for tests and reproducible runs.
#[derive(Debug)]
pub struct SeededSampler {
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl QuestionSampler for SeededSampler {
    fn sample(&self, candidates: &[i64], amount: usize) -> Vec<i64> {
        // A poisoned lock only means another draw panicked; the RNG is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        candidates
            .choose_multiple(&mut *rng, amount)
            .copied()
            .collect()
    }
}
