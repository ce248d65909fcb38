//! Messages passed from the acting loop to the learning loop.

/// Progress reports that the learner drains into its recorder.
pub enum ActorMessage {
    /// An episode finished at step `t` with the given return and length.
    Episode {
        /// Global step at which the episode ended.
        t: usize,
        /// Sum of rewards over the episode.
        ret: f32,
        /// The number of steps in the episode.
        len: usize,
    },
}
