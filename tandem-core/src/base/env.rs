//! Environment.
use crate::Frame;
use anyhow::Result;

/// Outcome of a single environment step.
pub struct EnvStep {
    /// Observation after the action was applied.
    pub obs: Frame,

    /// Reward received for the action.
    pub reward: f32,

    /// True if this step ended the episode.
    pub done: bool,
}

/// Represents an environment, typically an MDP with discrete actions.
///
/// Environments emit fixed-shape observation frames. Failures from
/// [`Env::reset`] and [`Env::step`] propagate out of the acting loop
/// uncaught; recovery policy belongs to the caller.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Frame>;

    /// Applies a discrete action and returns the resulting step.
    fn step(&mut self, act: u32) -> Result<EnvStep>;
}
