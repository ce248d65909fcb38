//! Batch of transitions sampled from [`FrameReplayBuffer`](super::FrameReplayBuffer).

/// Parallel sequences of sampled transitions
/// `(state, action, reward, next state, done)`.
///
/// States are stacks of `history_len` frames, flattened oldest first, so
/// `obs` and `next_obs` are laid out row-major as
/// `[len, history_len * frame_len]`.
#[derive(Debug)]
pub struct TransitionBatch {
    /// Stacked observations.
    pub obs: Vec<f32>,

    /// Discrete action indices.
    pub act: Vec<u32>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Stacked next observations.
    pub next_obs: Vec<f32>,

    /// Episode-termination flags.
    pub is_done: Vec<i8>,
}

impl TransitionBatch {
    /// Creates an empty batch with room for `n` transitions of states of
    /// `state_len` elements.
    pub(super) fn with_capacity(n: usize, state_len: usize) -> Self {
        Self {
            obs: Vec::with_capacity(n * state_len),
            act: Vec::with_capacity(n),
            reward: Vec::with_capacity(n),
            next_obs: Vec::with_capacity(n * state_len),
            is_done: Vec::with_capacity(n),
        }
    }

    /// The number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch contains no transitions.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    /// Decomposes the batch into its parallel sequences
    /// `(obs, act, reward, next_obs, is_done)`.
    pub fn unpack(self) -> (Vec<f32>, Vec<u32>, Vec<f32>, Vec<f32>, Vec<i8>) {
        (self.obs, self.act, self.reward, self.next_obs, self.is_done)
    }
}
