#![warn(missing_docs)]
//! Storage substrate and collaborator interfaces for lockstep reinforcement
//! learning.
//!
//! This crate provides the pieces shared by the acting and learning sides of
//! a training run:
//!
//! * [`FrameReplayBuffer`] — a fixed-capacity ring of observation frames and
//!   the transitions between them, with on-demand reconstruction of stacked
//!   multi-frame states and uniform random batch sampling.
//! * The interfaces of the external collaborators: [`Env`], [`Model`] and
//!   [`Schedule`].
//! * A [`record`](crate::record) system for training telemetry.
//!
//! The two-thread protocol that drives these lives in the `tandem-trainer`
//! crate.
pub mod error;
pub mod frame_buffer;
pub mod record;

mod base;
pub use base::{ConstantSchedule, Env, EnvStep, LinearSchedule, Model, Schedule};
pub use frame_buffer::{Frame, FrameReplayBuffer, FrameReplayBufferConfig, TransitionBatch};
