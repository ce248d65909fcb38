use super::{LockstepStat, LockstepTrainerConfig};
use crate::{ActorLoop, Handshake, LearnerLoop, TrainStatus};
use anyhow::{anyhow, Result};
use crossbeam_channel::unbounded;
use std::{
    marker::PhantomData,
    sync::{Arc, Mutex},
    time::SystemTime,
};
use tandem_core::{
    error::TandemError, record::Recorder, Env, FrameReplayBuffer, FrameReplayBufferConfig, Model,
    Schedule,
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs the two-loop lockstep training protocol over a shared model
/// executor.
///
/// The acting loop runs on its own thread and the learning loop on the
/// calling thread; both iterate the identical step range `1..=max_steps`.
/// A pair of one-shot signals interleaves them so that, at any instant, at
/// most one of model inference and model optimization is in flight, while
/// environment stepping, buffer writes and batch sampling overlap the
/// optimization work.
///
/// ```mermaid
/// graph LR
///     A[ActorLoop]-->|store_frame, store_effect|B[FrameReplayBuffer]
///     B-->|batch|C[LearnerLoop]
///     C-->|opt, sync_target|D[Model]
///     D-->|infer_action|A
/// ```
///
/// The buffer and the model are shared behind mutexes; the handshake keeps
/// the model's mutex uncontended at the inference and optimization call
/// sites, and buffer locks are held only for the duration of a single
/// store or sampling call.
#[derive(Debug)]
pub struct LockstepTrainer<E, M>
where
    E: Env,
    M: Model,
{
    /// Configuration of the environment.
    env_config: E::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: FrameReplayBufferConfig,

    /// Configuration of the training loops.
    config: LockstepTrainerConfig,

    phantom: PhantomData<(E, M)>,
}

impl<E, M> LockstepTrainer<E, M>
where
    E: Env,
    M: Model,
{
    /// Constructs a trainer, validating the configuration.
    ///
    /// Fails with [`TandemError::InvalidConfiguration`] when the periodic
    /// gates are inconsistent (`target_sync_freq` not a multiple of
    /// `train_freq`), the buffer geometry is degenerate, or `train_start`
    /// comes too early for the first batch to be sampleable.
    pub fn build(
        config: LockstepTrainerConfig,
        env_config: E::Config,
        replay_buffer_config: FrameReplayBufferConfig,
    ) -> Result<Self> {
        config.check()?;
        replay_buffer_config.check()?;

        // When the learner samples at step t, the actor is guaranteed to
        // have completed the effects of steps 1..=t-2 only, and a wrapped
        // ring keeps at most capacity - 2 transitions eligible.
        if config.train_start < config.batch_size + 3 {
            return Err(TandemError::InvalidConfiguration(format!(
                "train_start ({}) must be at least batch_size + 3 ({})",
                config.train_start,
                config.batch_size + 3
            ))
            .into());
        }
        if config.train_start < replay_buffer_config.history_len + 2 {
            return Err(TandemError::InvalidConfiguration(format!(
                "train_start ({}) must be at least history_len + 2 ({})",
                config.train_start,
                replay_buffer_config.history_len + 2
            ))
            .into());
        }
        if replay_buffer_config.capacity < config.batch_size + 2 {
            return Err(TandemError::InvalidConfiguration(format!(
                "capacity ({}) must be at least batch_size + 2 ({})",
                replay_buffer_config.capacity,
                config.batch_size + 2
            ))
            .into());
        }

        Ok(Self {
            env_config,
            replay_buffer_config,
            config,
            phantom: PhantomData,
        })
    }

    /// Runs training for the configured horizon.
    ///
    /// The model executor is shared between both loops; the exploration
    /// schedule feeds the acting loop and the learning-rate schedule the
    /// optimization calls. Both loops terminate together after `max_steps`
    /// rounds; if either fails, the other's next wait disconnects and the
    /// root-cause error is returned.
    pub fn train<R>(
        &mut self,
        model: Arc<Mutex<M>>,
        exploration: Arc<dyn Schedule + Send + Sync>,
        learn_rate: Box<dyn Schedule>,
        recorder: &mut R,
    ) -> Result<LockstepStat>
    where
        R: Recorder,
        M: Send + 'static,
        E: 'static,
        E::Config: Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(FrameReplayBuffer::build(
            &self.replay_buffer_config,
        )?));
        let status = Arc::new(TrainStatus::new());
        let Handshake { actor, learner } = Handshake::new();
        let (progress_tx, progress_rx) = unbounded();
        let time = SystemTime::now();

        let acting =
            ActorLoop::<E>::build(&self.config, self.env_config.clone(), exploration.clone());
        let acting_handle = {
            let buffer = buffer.clone();
            let model = model.clone();
            let status = status.clone();
            std::thread::spawn(move || acting.run(buffer, model, actor, status, progress_tx))
        };

        let learning = LearnerLoop::build(&self.config, exploration, learn_rate);
        let learner_result = learning.run(buffer, model, learner, status, progress_rx, recorder);
        // The learner's handshake ends are dropped by now, so a failed
        // learner unblocks the actor instead of deadlocking it.

        let actor_result = match acting_handle.join() {
            Ok(result) => result,
            Err(_) => Err(anyhow!("acting thread panicked")),
        };

        match (learner_result, actor_result) {
            (Ok(opt_steps), Ok(stat)) => Ok(LockstepStat {
                env_steps: stat.env_steps,
                episodes: stat.episodes,
                opt_steps,
                duration: time.elapsed()?,
            }),
            (Err(e), Ok(_)) => Err(e),
            (Ok(_), Err(e)) => Err(e),
            (Err(learner_err), Err(actor_err)) => {
                // A disconnect is the consequence of the peer failing first.
                let learner_disconnected = matches!(
                    learner_err.downcast_ref::<TandemError>(),
                    Some(TandemError::Disconnected)
                );
                if learner_disconnected {
                    Err(actor_err)
                } else {
                    Err(learner_err)
                }
            }
        }
    }
}
