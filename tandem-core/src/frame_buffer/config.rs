//! Configuration of [`FrameReplayBuffer`](super::FrameReplayBuffer).
use crate::error::TandemError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`FrameReplayBuffer`](super::FrameReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct FrameReplayBufferConfig {
    /// The number of frame slots in the ring.
    pub capacity: usize,

    /// The number of stacked frames per state.
    pub history_len: usize,

    /// Shape of a single observation frame.
    pub obs_shape: Vec<usize>,

    /// Seed of the RNG used for batch sampling.
    pub seed: u64,
}

impl Default for FrameReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            history_len: 4,
            obs_shape: vec![1],
            seed: 42,
        }
    }
}

impl FrameReplayBufferConfig {
    /// Sets the capacity of the ring.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the number of stacked frames per state.
    pub fn history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }

    /// Sets the shape of a single observation frame.
    pub fn obs_shape(mut self, obs_shape: Vec<usize>) -> Self {
        self.obs_shape = obs_shape;
        self
    }

    /// Sets the sampling seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The number of elements in a flattened frame.
    pub fn frame_len(&self) -> usize {
        self.obs_shape.iter().product()
    }

    /// Validates the configuration.
    pub fn check(&self) -> Result<(), TandemError> {
        if self.capacity == 0 {
            return Err(TandemError::InvalidConfiguration(
                "capacity must be positive".into(),
            ));
        }
        if self.history_len == 0 {
            return Err(TandemError::InvalidConfiguration(
                "history_len must be positive".into(),
            ));
        }
        if self.capacity < self.history_len {
            return Err(TandemError::InvalidConfiguration(format!(
                "capacity ({}) must be at least history_len ({})",
                self.capacity, self.history_len
            )));
        }
        if self.frame_len() == 0 {
            return Err(TandemError::InvalidConfiguration(format!(
                "obs_shape {:?} has no elements",
                self.obs_shape
            )));
        }
        Ok(())
    }

    /// Constructs [`FrameReplayBufferConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`FrameReplayBufferConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn save_load_roundtrip() -> Result<()> {
        let config = FrameReplayBufferConfig::default()
            .capacity(50000)
            .history_len(4)
            .obs_shape(vec![84, 84])
            .seed(7);

        let dir = TempDir::new("frame_replay_buffer_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        assert_eq!(FrameReplayBufferConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn rejects_capacity_below_history_len() {
        let config = FrameReplayBufferConfig::default().capacity(3).history_len(4);
        assert!(matches!(
            config.check(),
            Err(TandemError::InvalidConfiguration(_))
        ));
    }
}
