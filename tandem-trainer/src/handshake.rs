//! One-shot per-step signals synchronizing the acting and learning loops.
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tandem_core::error::TandemError;

/// Sending side of a single-slot binary signal.
///
/// Raising the signal is idempotent within a step and wakes at most one
/// waiter. Realized as a capacity-1 channel so signaling never blocks.
pub struct SignalTx(Sender<()>);

impl SignalTx {
    /// Raises the signal. A no-op if it is already raised.
    ///
    /// Fails with [`TandemError::Disconnected`] when the waiting side has
    /// exited.
    pub fn signal(&self) -> Result<(), TandemError> {
        match self.0.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => Ok(()),
            Err(TrySendError::Disconnected(())) => Err(TandemError::Disconnected),
        }
    }
}

/// Waiting side of a single-slot binary signal.
pub struct SignalRx(Receiver<()>);

impl SignalRx {
    /// Blocks until the signal is raised, then resets it for the next step.
    ///
    /// Fails with [`TandemError::Disconnected`] when the signaling side has
    /// exited, so a crashed peer surfaces as an error instead of a hang.
    pub fn wait(&self) -> Result<(), TandemError> {
        self.0.recv().map_err(|_| TandemError::Disconnected)
    }
}

/// Creates a connected, unsignaled signal pair.
pub fn signal_pair() -> (SignalTx, SignalRx) {
    let (tx, rx) = bounded(1);
    (SignalTx(tx), SignalRx(rx))
}

/// The actor's ends of the per-step handshake: it waits for the learner to
/// finish the previous step and announces its own inference call returning.
pub struct ActorHandshake {
    train_done: SignalRx,
    act_chosen: SignalTx,
}

impl ActorHandshake {
    /// Blocks until the learner finished the previous step.
    pub fn wait_train_done(&self) -> Result<(), TandemError> {
        self.train_done.wait()
    }

    /// Announces that the inference call for this step has returned and the
    /// model executor is free.
    pub fn signal_act_chosen(&self) -> Result<(), TandemError> {
        self.act_chosen.signal()
    }
}

/// The learner's ends of the per-step handshake.
pub struct LearnerHandshake {
    act_chosen: SignalRx,
    train_done: SignalTx,
}

impl LearnerHandshake {
    /// Blocks until the actor's inference call for this step has returned.
    pub fn wait_act_chosen(&self) -> Result<(), TandemError> {
        self.act_chosen.wait()
    }

    /// Releases the actor's next iteration.
    pub fn signal_train_done(&self) -> Result<(), TandemError> {
        self.train_done.signal()
    }
}

/// The per-step handshake, split into its two participants.
///
/// Each loop holds only the channel ends it uses, so when either loop exits
/// the other's next wait or signal reports [`TandemError::Disconnected`]
/// rather than blocking forever.
pub struct Handshake {
    /// Ends held by the acting loop.
    pub actor: ActorHandshake,

    /// Ends held by the learning loop.
    pub learner: LearnerHandshake,
}

impl Handshake {
    /// Creates the handshake in its initial state: `train_done` pre-signaled
    /// so the actor's first wait returns immediately, `act_chosen`
    /// unsignaled. A missing pre-signal would deadlock both loops at the
    /// first step.
    pub fn new() -> Self {
        let (act_chosen_tx, act_chosen_rx) = signal_pair();
        let (train_done_tx, train_done_rx) = signal_pair();
        train_done_tx
            .signal()
            .expect("fresh signal cannot be disconnected");
        Self {
            actor: ActorHandshake {
                train_done: train_done_rx,
                act_chosen: act_chosen_tx,
            },
            learner: LearnerHandshake {
                act_chosen: act_chosen_rx,
                train_done: train_done_tx,
            },
        }
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn train_done_starts_pre_signaled() {
        let handshake = Handshake::new();
        handshake.actor.wait_train_done().unwrap();
    }

    #[test]
    fn signal_is_idempotent_within_a_step() {
        let Handshake { actor, learner } = Handshake::new();
        actor.wait_train_done().unwrap();
        learner.signal_train_done().unwrap();
        learner.signal_train_done().unwrap();
        actor.wait_train_done().unwrap();
        // The double signal collapsed into one: with the learner gone the
        // next wait disconnects instead of being satisfied.
        drop(learner);
        assert!(matches!(
            actor.wait_train_done(),
            Err(TandemError::Disconnected)
        ));
    }

    #[test]
    fn wait_blocks_until_peer_signals() {
        let Handshake { actor, learner } = Handshake::new();
        let waiter = thread::spawn(move || learner.wait_act_chosen());
        thread::sleep(std::time::Duration::from_millis(20));
        actor.signal_act_chosen().unwrap();
        waiter.join().unwrap().unwrap();
    }

    #[test]
    fn loops_alternate_for_a_bounded_horizon() {
        let n = 1000;
        let Handshake { actor, learner } = Handshake::new();
        let acting = thread::spawn(move || -> Result<(), TandemError> {
            for _ in 0..n {
                actor.wait_train_done()?;
                actor.signal_act_chosen()?;
            }
            Ok(())
        });
        for _ in 0..n {
            learner.wait_act_chosen().unwrap();
            learner.signal_train_done().unwrap();
        }
        acting.join().unwrap().unwrap();
    }

    #[test]
    fn dropped_peer_disconnects_instead_of_hanging() {
        let Handshake { actor, learner } = Handshake::new();
        let acting = thread::spawn(move || {
            actor.wait_train_done().unwrap();
            actor.signal_act_chosen().unwrap();
            // The actor exits early here, dropping its endpoints.
        });
        learner.wait_act_chosen().unwrap();
        acting.join().unwrap();
        assert!(matches!(
            learner.wait_act_chosen(),
            Err(TandemError::Disconnected)
        ));
    }
}
