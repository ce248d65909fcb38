//! Configuration of [`LockstepTrainer`](super::LockstepTrainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tandem_core::error::TandemError;

/// Configuration of [`LockstepTrainer`](super::LockstepTrainer).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LockstepTrainerConfig {
    /// The number of steps both loops run, the training horizon.
    pub max_steps: usize,

    /// Step from which optimization may begin; must leave enough completed
    /// frames in the buffer for a full batch.
    pub train_start: usize,

    /// Interval of optimization steps in global steps.
    pub train_freq: usize,

    /// Interval of target-network refreshes in global steps; must be an
    /// integer multiple of `train_freq`.
    pub target_sync_freq: usize,

    /// Interval of checkpoints in global steps.
    pub checkpoint_freq: usize,

    /// The number of transitions per sampled batch.
    pub batch_size: usize,

    /// The number of discrete actions of the environment.
    pub n_actions: usize,

    /// Interval of writing training records in optimization steps.
    pub record_interval: usize,

    /// Interval of progress logging in global steps.
    pub log_interval: usize,

    /// Where to save model checkpoints. `None` disables checkpointing.
    pub model_dir: Option<String>,

    /// Seed for the acting loop's exploration RNG and the environment.
    pub seed: i64,
}

impl Default for LockstepTrainerConfig {
    /// Defaults follow common frame-based DQN settings.
    fn default() -> Self {
        Self {
            max_steps: 100000,
            train_start: 1000,
            train_freq: 4,
            target_sync_freq: 10000,
            checkpoint_freq: 50000,
            batch_size: 32,
            n_actions: 2,
            record_interval: 100,
            log_interval: 1000,
            model_dir: None,
            seed: 42,
        }
    }
}

impl LockstepTrainerConfig {
    /// Sets the training horizon.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the step from which optimization may begin.
    pub fn train_start(mut self, v: usize) -> Self {
        self.train_start = v;
        self
    }

    /// Sets the optimization interval in global steps.
    pub fn train_freq(mut self, v: usize) -> Self {
        self.train_freq = v;
        self
    }

    /// Sets the target-refresh interval in global steps.
    pub fn target_sync_freq(mut self, v: usize) -> Self {
        self.target_sync_freq = v;
        self
    }

    /// Sets the checkpoint interval in global steps.
    pub fn checkpoint_freq(mut self, v: usize) -> Self {
        self.checkpoint_freq = v;
        self
    }

    /// Sets the sampled batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the number of discrete actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the record interval in optimization steps.
    pub fn record_interval(mut self, v: usize) -> Self {
        self.record_interval = v;
        self
    }

    /// Sets the progress-log interval in global steps.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Sets the directory the model checkpoints are saved in.
    pub fn model_dir<T: Into<String>>(mut self, model_dir: T) -> Result<Self> {
        self.model_dir = Some(model_dir.into());
        Ok(self)
    }

    /// Sets the seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Validates the configuration.
    pub fn check(&self) -> Result<(), TandemError> {
        for (name, v) in [
            ("train_freq", self.train_freq),
            ("target_sync_freq", self.target_sync_freq),
            ("checkpoint_freq", self.checkpoint_freq),
            ("batch_size", self.batch_size),
            ("n_actions", self.n_actions),
            ("record_interval", self.record_interval),
            ("log_interval", self.log_interval),
        ] {
            if v == 0 {
                return Err(TandemError::InvalidConfiguration(format!(
                    "{} must be positive",
                    name
                )));
            }
        }
        if self.target_sync_freq % self.train_freq != 0 {
            return Err(TandemError::InvalidConfiguration(format!(
                "target_sync_freq ({}) must be a multiple of train_freq ({})",
                self.target_sync_freq, self.train_freq
            )));
        }
        Ok(())
    }

    /// Constructs [`LockstepTrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`LockstepTrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
