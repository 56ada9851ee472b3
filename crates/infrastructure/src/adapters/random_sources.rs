//! Random source adapters for chaos injection

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use application::RandomSource;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws from the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn next_f64(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Reproducible draws from a seeded generator
pub struct SeededRandomSource {
    rng: Mutex<StdRng>,
}

impl SeededRandomSource {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl fmt::Debug for SeededRandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededRandomSource").finish_non_exhaustive()
    }
}

impl RandomSource for SeededRandomSource {
    fn next_f64(&self) -> f64 {
        self.rng.lock().random::<f64>()
    }
}

/// Replays a fixed script of draws, cycling when it runs out
///
/// Values are clamped into `[0, 1)`. An empty script always draws `0.0`.
#[derive(Debug)]
pub struct ScriptedRandomSource {
    script: Vec<f64>,
    cursor: AtomicUsize,
}

impl ScriptedRandomSource {
    #[must_use]
    pub fn new(script: impl Into<Vec<f64>>) -> Self {
        let script = script
            .into()
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0 - f64::EPSILON) })
            .collect();
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Always draw `value`
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RandomSource for ScriptedRandomSource {
    fn next_f64(&self) -> f64 {
        if self.script.is_empty() {
            return 0.0;
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.script[index % self.script.len()]
    }
}
