use super::ActorStat;
use crate::{ActorHandshake, ActorMessage, LockstepTrainerConfig, TrainStatus};
use anyhow::Result;
use crossbeam_channel::Sender;
use log::info;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::{
    marker::PhantomData,
    sync::{Arc, Mutex},
    time::SystemTime,
};
use tandem_core::{Env, FrameReplayBuffer, Model, Schedule};

/// Drives the environment, writes experience into the replay buffer and
/// requests actions from the shared model.
///
/// The loop follows the per-step protocol: wait for the learner to finish
/// the previous step, store the current observation, choose an action
/// (randomly until training has started, epsilon-greedily afterwards),
/// announce that the model executor is free again, then step the
/// environment and complete the stored slot with the outcome. Environment
/// stepping deliberately happens after the announcement so it overlaps the
/// learner's optimization work.
pub struct ActorLoop<E>
where
    E: Env,
{
    env_config: E::Config,
    exploration: Arc<dyn Schedule + Send + Sync>,
    n_actions: usize,
    max_steps: usize,
    log_interval: usize,
    seed: i64,
    phantom: PhantomData<fn() -> E>,
}

impl<E> ActorLoop<E>
where
    E: Env,
{
    /// Creates the acting loop; the environment itself is built inside
    /// [`run`](ActorLoop::run) so it never crosses a thread boundary.
    pub fn build(
        config: &LockstepTrainerConfig,
        env_config: E::Config,
        exploration: Arc<dyn Schedule + Send + Sync>,
    ) -> Self {
        Self {
            env_config,
            exploration,
            n_actions: config.n_actions,
            max_steps: config.max_steps,
            log_interval: config.log_interval,
            seed: config.seed,
            phantom: PhantomData,
        }
    }

    fn random_action(&self, rng: &mut StdRng) -> u32 {
        (rng.next_u32() as usize % self.n_actions) as u32
    }

    /// Runs environment interaction for the full training horizon.
    ///
    /// Episode boundaries reset the environment; episode returns are
    /// reported to the learner over `progress`. Environment failures
    /// propagate out uncaught.
    pub fn run<M: Model>(
        self,
        buffer: Arc<Mutex<FrameReplayBuffer>>,
        model: Arc<Mutex<M>>,
        handshake: ActorHandshake,
        status: Arc<TrainStatus>,
        progress: Sender<ActorMessage>,
    ) -> Result<ActorStat> {
        let mut rng = StdRng::seed_from_u64(self.seed as u64);
        let mut env = E::build(&self.env_config, self.seed)?;
        let mut last_obs = env.reset()?;
        let mut episodes = 0;
        let mut ep_ret = 0f32;
        let mut ep_len = 0;
        let time = SystemTime::now();

        for t in 1..=self.max_steps {
            handshake.wait_train_done()?;

            let slot = buffer.lock().unwrap().store_frame(&last_obs);

            let act = if status.learn_started() {
                let epsilon = self.exploration.value(t);
                if rng.gen::<f32>() < epsilon {
                    self.random_action(&mut rng)
                } else {
                    let state = buffer.lock().unwrap().recent_state();
                    model.lock().unwrap().infer_action(&state)
                }
            } else {
                // The model has seen no optimization pass yet; acting on it
                // would read uninitialized parameters.
                self.random_action(&mut rng)
            };

            handshake.signal_act_chosen()?;

            let step = env.step(act)?;
            buffer
                .lock()
                .unwrap()
                .store_effect(slot, act, step.reward, step.done)?;
            ep_ret += step.reward;
            ep_len += 1;

            if step.done {
                episodes += 1;
                let _ = progress.send(ActorMessage::Episode {
                    t,
                    ret: ep_ret,
                    len: ep_len,
                });
                ep_ret = 0.;
                ep_len = 0;
                last_obs = env.reset()?;
            } else {
                last_obs = step.obs;
            }

            if t % self.log_interval == 0 {
                info!("{} env steps, {} episodes", t, episodes);
            }
        }

        Ok(ActorStat {
            env_steps: self.max_steps,
            episodes,
            duration: time.elapsed()?,
        })
    }
}
