#![warn(missing_docs)]
//! Two-thread lockstep training over a shared, thread-unsafe model executor.
//!
//! An acting loop and a learning loop run for the same step horizon and are
//! interleaved by a pair of one-shot signals per step:
//!
//! * the actor waits for `train_done`, stores the current observation,
//!   chooses an action (through the model only once training has started),
//!   signals `act_chosen`, then steps the environment and completes the
//!   stored transition;
//! * the learner samples a batch (overlapping the actor's write of the same
//!   step), waits for `act_chosen`, optimizes the model, periodically
//!   refreshes the target network and checkpoints, then signals
//!   `train_done`.
//!
//! The handshake guarantees that model inference and model optimization are
//! never in flight at the same time, while environment I/O overlaps the
//! optimization work. `train_done` starts pre-signaled; both loops
//! terminate together after the configured horizon.
mod actor;
mod handshake;
mod learner;
mod lockstep_trainer;
mod messages;
mod status;

pub use actor::{ActorLoop, ActorStat};
pub use handshake::{signal_pair, ActorHandshake, Handshake, LearnerHandshake, SignalRx, SignalTx};
pub use learner::LearnerLoop;
pub use lockstep_trainer::{LockstepStat, LockstepTrainer, LockstepTrainerConfig};
pub use messages::ActorMessage;
pub use status::TrainStatus;
