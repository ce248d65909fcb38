//! Interfaces of the external collaborators of the training core.
mod env;
mod model;
mod schedule;

pub use env::{Env, EnvStep};
pub use model::Model;
pub use schedule::{ConstantSchedule, LinearSchedule, Schedule};
