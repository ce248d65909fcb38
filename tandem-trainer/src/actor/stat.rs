use std::time::Duration;

/// Stats of the environment-interaction loop of [`ActorLoop`](crate::ActorLoop).
#[derive(Clone, Debug)]
pub struct ActorStat {
    /// The number of steps of interaction between model and environment.
    pub env_steps: usize,

    /// The number of completed episodes.
    pub episodes: usize,

    /// Duration of the acting loop.
    pub duration: Duration,
}

impl ActorStat {
    /// Returns a formatted string for reporting.
    pub fn fmt(&self) -> String {
        let mut s = "env steps, episodes, duration [sec], steps per sec\n".to_string();
        let d = self.duration.as_secs_f32();
        s += format!(
            "{}, {}, {}, {}\n",
            self.env_steps,
            self.episodes,
            d,
            self.env_steps as f32 / d
        )
        .as_str();
        s
    }
}
