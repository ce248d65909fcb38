//! Frame-based experience replay.
//!
//! The buffer records raw observation frames and the transitions between
//! them in a fixed-capacity ring, reconstructs stacked multi-frame states on
//! demand and serves uniformly sampled training batches. Writes follow a
//! two-phase protocol: [`FrameReplayBuffer::store_frame`] records an
//! observation and returns a slot index, and the matching
//! [`FrameReplayBuffer::store_effect`] later fills in the action, reward and
//! termination flag for that slot.
mod base;
mod batch;
mod config;
mod encode;
mod store;

pub use base::FrameReplayBuffer;
pub use batch::TransitionBatch;
pub use config::FrameReplayBufferConfig;
use store::FrameStore;

/// A single raw observation frame, flattened row-major.
pub type Frame = Vec<f32>;
