//! Trainable action-value model.
use crate::{frame_buffer::TransitionBatch, record::Record};
use anyhow::Result;
use std::path::Path;

/// A trainable action-value model with a synchronized target network.
///
/// The model executor is not thread-safe: [`Model::infer_action`] and
/// [`Model::opt`] must never run concurrently. Callers are responsible for
/// serializing them; the lockstep trainer does so through its handshake.
pub trait Model {
    /// Configurations.
    type Config: Clone;

    /// Builds a model with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Selects an action for the given stacked state.
    fn infer_action(&mut self, state: &[f32]) -> u32;

    /// Performs one optimization step on a batch of transitions and returns
    /// information about the step, typically a loss value.
    fn opt(&mut self, batch: TransitionBatch, learn_rate: f32) -> Record;

    /// Copies the online network parameters into the target network.
    fn sync_target(&mut self);

    /// Saves the model parameters in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads the model parameters from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
