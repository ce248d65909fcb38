//! Orchestration of the two lockstep loops.
mod base;
mod config;
mod stat;

pub use base::LockstepTrainer;
pub use config::LockstepTrainerConfig;
pub use stat::LockstepStat;
