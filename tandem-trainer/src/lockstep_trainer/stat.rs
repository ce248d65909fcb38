use std::time::Duration;

/// Stats of [`LockstepTrainer`](super::LockstepTrainer)`::train()`.
#[derive(Debug)]
pub struct LockstepStat {
    /// The number of environment steps taken.
    pub env_steps: usize,

    /// The number of completed episodes.
    pub episodes: usize,

    /// The number of optimization steps taken.
    pub opt_steps: usize,

    /// Duration of training.
    pub duration: Duration,
}

impl LockstepStat {
    /// Returns a formatted string.
    pub fn fmt(&self) -> String {
        let mut s = "env steps, episodes, opt steps, duration [sec]\n".to_string();
        s += format!(
            "{}, {}, {}, {}\n",
            self.env_steps,
            self.episodes,
            self.opt_steps,
            self.duration.as_secs_f32()
        )
        .as_str();
        s
    }
}
