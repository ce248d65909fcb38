//! Learning side of the lockstep protocol.
use crate::{ActorMessage, LearnerHandshake, LockstepTrainerConfig, TrainStatus};
use anyhow::Result;
use crossbeam_channel::Receiver;
use log::info;
use std::{
    path::Path,
    sync::{Arc, Mutex},
};
use tandem_core::{
    record::{Record, RecordValue::Scalar, Recorder},
    FrameReplayBuffer, Model, Schedule,
};

/// Reads batches from the replay buffer and drives the shared model's
/// optimization, target refresh and checkpointing.
///
/// On a training step the batch is sampled *before* waiting for the actor's
/// inference call to return: sampling only touches already-completed slots,
/// so it may overlap the actor's frame write and action choice for the same
/// step. The optimization call itself runs strictly after `act_chosen`, which
/// is what keeps the thread-unsafe model executor exclusive.
pub struct LearnerLoop {
    exploration: Arc<dyn Schedule + Send + Sync>,
    learn_rate: Box<dyn Schedule>,
    max_steps: usize,
    train_start: usize,
    train_freq: usize,
    target_sync_freq: usize,
    checkpoint_freq: usize,
    batch_size: usize,
    record_interval: usize,
    model_dir: Option<String>,
}

impl LearnerLoop {
    /// Creates the learning loop.
    pub fn build(
        config: &LockstepTrainerConfig,
        exploration: Arc<dyn Schedule + Send + Sync>,
        learn_rate: Box<dyn Schedule>,
    ) -> Self {
        Self {
            exploration,
            learn_rate,
            max_steps: config.max_steps,
            train_start: config.train_start,
            train_freq: config.train_freq,
            target_sync_freq: config.target_sync_freq,
            checkpoint_freq: config.checkpoint_freq,
            batch_size: config.batch_size,
            record_interval: config.record_interval,
            model_dir: config.model_dir.clone(),
        }
    }

    fn save_model<M: Model>(model: &M, model_dir: &str) {
        match model.save_params(Path::new(model_dir)) {
            Ok(()) => info!("Saved the model in {:?}", model_dir),
            Err(_) => info!("Failed to save model in {:?}", model_dir),
        }
    }

    /// Runs optimization for the full training horizon and returns the
    /// number of optimization steps taken.
    pub fn run<M: Model, R: Recorder>(
        self,
        buffer: Arc<Mutex<FrameReplayBuffer>>,
        model: Arc<Mutex<M>>,
        handshake: LearnerHandshake,
        status: Arc<TrainStatus>,
        progress: Receiver<ActorMessage>,
        recorder: &mut R,
    ) -> Result<usize> {
        let mut opt_steps = 0;

        for t in 1..=self.max_steps {
            let batch = if t >= self.train_start && t % self.train_freq == 0 {
                status.set_learn_started();
                Some(buffer.lock().unwrap().batch(self.batch_size)?)
            } else {
                None
            };

            handshake.wait_act_chosen()?;

            if let Some(batch) = batch {
                let learn_rate = self.learn_rate.value(t);
                let mut record = model.lock().unwrap().opt(batch, learn_rate);
                opt_steps += 1;

                if t % self.target_sync_freq == 0 {
                    model.lock().unwrap().sync_target();
                }

                if opt_steps % self.record_interval == 0 {
                    record.insert("learn_rate", Scalar(learn_rate));
                    record.insert("epsilon", Scalar(self.exploration.value(t)));
                    record.insert("opt_steps", Scalar(opt_steps as f32));
                    record.insert("buffer_len", Scalar(buffer.lock().unwrap().len() as f32));
                    recorder.write(record);
                }
            }

            while let Ok(ActorMessage::Episode {
                t: env_step,
                ret,
                len,
            }) = progress.try_recv()
            {
                let mut record = Record::from_scalar("episode_return", ret);
                record.insert("episode_len", Scalar(len as f32));
                record.insert("env_steps", Scalar(env_step as f32));
                recorder.write(record);
            }

            if t % self.checkpoint_freq == 0 {
                if let Some(model_dir) = &self.model_dir {
                    let dir = format!("{}/{}", model_dir, t);
                    Self::save_model(&*model.lock().unwrap(), &dir);
                }
            }

            // The actor performs exactly max_steps waits against the
            // pre-signal plus the signals of steps 1..max_steps - 1; after
            // its last step it exits without waiting again and may already
            // have dropped its receiver.
            if t < self.max_steps {
                handshake.signal_train_done()?;
            }
        }

        Ok(opt_steps)
    }
}
