//! Acting side of the lockstep protocol.
mod base;
mod stat;

pub use base::ActorLoop;
pub use stat::ActorStat;
