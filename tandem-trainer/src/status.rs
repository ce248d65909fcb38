//! Shared training status flags.
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide flags shared by the acting and learning loops.
///
/// `learn_started` is written by the learner, transitions from `false` to
/// `true` exactly once, and is read freely by the actor: until the first
/// optimization pass is reached the model is uninitialized for inference and
/// the actor must pick random actions.
#[derive(Debug, Default)]
pub struct TrainStatus {
    learn_started: AtomicBool,
}

impl TrainStatus {
    /// Creates the status with training not yet started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks that the first optimization pass has been reached.
    pub fn set_learn_started(&self) {
        self.learn_started.store(true, Ordering::Release);
    }

    /// Returns `true` once the model has reached its first optimization
    /// pass.
    pub fn learn_started(&self) -> bool {
        self.learn_started.load(Ordering::Acquire)
    }
}
