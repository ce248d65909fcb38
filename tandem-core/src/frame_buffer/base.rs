//! Replay buffer over the frame ring.
use super::{encode, FrameReplayBufferConfig, FrameStore, TransitionBatch};
use crate::error::TandemError;
use log::warn;
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// A fixed-capacity store of observation frames and the transitions between
/// them.
///
/// Frames enter through a two-phase write: [`store_frame`] records an
/// observation in the next ring position and returns its slot, and the
/// matching [`store_effect`] later completes the slot with the action,
/// reward and termination flag. Between the two calls the slot is pending
/// and is never served as a transition of its own, though its observation
/// may already appear in another transition's next-state history.
///
/// Reads reconstruct states by stacking the `history_len` most recent
/// frames ending at a slot, zero-padding across episode boundaries and
/// across the ring's oldest live frame. [`batch`] samples transitions
/// independently and uniformly from the eligible slots: those whose frame
/// and effect are both stored, whose temporal successor's frame is stored,
/// excluding the newest slot and, once the ring has wrapped, the oldest.
///
/// Writes are expected from a single producer thread; reads may run from
/// another thread provided the caller serializes access, e.g. behind a
/// mutex, as the lockstep trainer does.
///
/// [`store_frame`]: FrameReplayBuffer::store_frame
/// [`store_effect`]: FrameReplayBuffer::store_effect
/// [`batch`]: FrameReplayBuffer::batch
pub struct FrameReplayBuffer {
    store: FrameStore,
    history_len: usize,

    /// Slot of the most recently stored frame whose effect is outstanding.
    pending: Option<usize>,

    rng: StdRng,
}

impl FrameReplayBuffer {
    /// Builds a buffer from the given configuration.
    ///
    /// Fails with [`TandemError::InvalidConfiguration`] when the capacity is
    /// smaller than the history length or the geometry is degenerate.
    pub fn build(config: &FrameReplayBufferConfig) -> Result<Self, TandemError> {
        config.check()?;
        Ok(Self {
            store: FrameStore::new(config.capacity, config.frame_len()),
            history_len: config.history_len,
            pending: None,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// The number of slots currently holding a frame.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no frame has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.store.stored() == 0
    }

    /// The number of frame slots in the ring.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// The number of stacked frames per state.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// The number of elements in a flattened frame.
    pub fn frame_len(&self) -> usize {
        self.store.frame_len()
    }

    /// Writes `obs` into the next ring position, marks the slot pending and
    /// returns its index for later completion.
    ///
    /// Never blocks; once the ring is full the oldest slot is overwritten.
    pub fn store_frame(&mut self, obs: &[f32]) -> usize {
        if let Some(p) = self.pending {
            warn!("slot {} dropped with its effect still outstanding", p);
        }
        let slot = self.store.store_frame(obs);
        self.pending = Some(slot);
        slot
    }

    /// Completes the pending slot with the outcome of acting on its frame.
    ///
    /// Fails with [`TandemError::InvalidSlot`] if `slot` is not the most
    /// recently issued pending slot: effects must be stored strictly in the
    /// order frames were.
    pub fn store_effect(
        &mut self,
        slot: usize,
        act: u32,
        reward: f32,
        done: bool,
    ) -> Result<(), TandemError> {
        match self.pending {
            Some(p) if p == slot => {
                self.store.store_effect(slot, act, reward, done);
                self.pending = None;
                Ok(())
            }
            expected => Err(TandemError::InvalidSlot {
                expected,
                got: slot,
            }),
        }
    }

    /// Returns the stacked state ending at the most recently stored frame.
    ///
    /// Used for live inference between `store_frame` and `store_effect`;
    /// only the newest frame's observation and older slots' metadata are
    /// read, so the pending slot's unset fields are never touched.
    ///
    /// # Panics
    ///
    /// Panics if no frame has been stored yet.
    pub fn recent_state(&self) -> Vec<f32> {
        let latest = self
            .store
            .latest()
            .expect("recent_state() requires at least one stored frame");
        encode::encode_state(&self.store, latest, self.history_len)
    }

    /// The sequence numbers of currently eligible transitions, inclusive.
    ///
    /// Eligible slots form a contiguous sequence interval: everything from
    /// the oldest live frame (skipped once the ring has wrapped) up to the
    /// slot before the newest. No slot is eligible until `history_len`
    /// frames are complete.
    fn eligible_seqs(&self) -> Option<(usize, usize)> {
        let stored = self.store.stored();
        let completed = stored - self.pending.map_or(0, |_| 1);
        if completed < self.history_len {
            return None;
        }
        let hi = (stored - 1).checked_sub(1)?;
        let lo = if stored > self.store.capacity() {
            stored - self.store.capacity() + 1
        } else {
            0
        };
        if hi < lo {
            None
        } else {
            Some((lo, hi))
        }
    }

    /// The number of transitions currently eligible for sampling.
    pub fn num_eligible(&self) -> usize {
        self.eligible_seqs().map_or(0, |(lo, hi)| hi - lo + 1)
    }

    /// Draws `size` transitions independently and uniformly at random from
    /// the eligible slots.
    ///
    /// Fails with [`TandemError::InsufficientData`] when fewer eligible
    /// transitions exist than requested; the training-start gate is meant to
    /// prevent this from ever surfacing in correct operation.
    pub fn batch(&mut self, size: usize) -> Result<TransitionBatch, TandemError> {
        let (lo, hi) = self.eligible_seqs().ok_or(TandemError::InsufficientData {
            requested: size,
            available: 0,
        })?;
        let n = hi - lo + 1;
        if n < size {
            return Err(TandemError::InsufficientData {
                requested: size,
                available: n,
            });
        }

        let state_len = self.history_len * self.store.frame_len();
        let mut batch = TransitionBatch::with_capacity(size, state_len);
        for _ in 0..size {
            let seq = lo + (self.rng.next_u32() as usize) % n;
            let slot = self.store.slot_of_seq(seq);
            let next = self.store.slot_of_seq(seq + 1);
            debug_assert!(self.store.is_complete(slot));
            encode::encode_state_into(&self.store, slot, self.history_len, &mut batch.obs);
            encode::encode_state_into(&self.store, next, self.history_len, &mut batch.next_obs);
            batch.act.push(self.store.act(slot));
            batch.reward.push(self.store.reward(slot));
            batch.is_done.push(self.store.done(slot) as i8);
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(capacity: usize, history_len: usize) -> FrameReplayBuffer {
        FrameReplayBuffer::build(
            &FrameReplayBufferConfig::default()
                .capacity(capacity)
                .history_len(history_len),
        )
        .unwrap()
    }

    /// Stores a single-element frame and its effect; the action records the
    /// frame's value so sampled transitions can be traced back.
    fn push(buf: &mut FrameReplayBuffer, v: f32, done: bool) -> usize {
        let slot = buf.store_frame(&[v]);
        buf.store_effect(slot, v as u32, v, done).unwrap();
        slot
    }

    #[test]
    fn recent_state_stacks_last_frames() {
        let mut buf = buffer(10, 4);
        for i in 0..6 {
            push(&mut buf, 10. + i as f32, false);
        }
        assert_eq!(buf.recent_state(), vec![12., 13., 14., 15.]);
    }

    #[test]
    fn recent_state_fixture_with_episode_boundary() {
        // capacity 10, H = 4, observations o0..o5, done only at index 2.
        let mut buf = buffer(10, 4);
        for i in 0..6 {
            push(&mut buf, 100. + i as f32, i == 2);
        }
        assert_eq!(buf.recent_state(), vec![0., 103., 104., 105.]);
    }

    #[test]
    fn recent_state_ends_at_pending_frame() {
        let mut buf = buffer(10, 2);
        push(&mut buf, 1., false);
        buf.store_frame(&[2.]);
        assert_eq!(buf.recent_state(), vec![1., 2.]);
    }

    #[test]
    fn store_effect_rejects_non_pending_slot() {
        let mut buf = buffer(10, 2);
        let slot = buf.store_frame(&[1.]);
        let err = buf.store_effect(slot + 1, 0, 0., false).unwrap_err();
        assert!(matches!(err, TandemError::InvalidSlot { .. }));
        // The pending slot itself still completes normally.
        buf.store_effect(slot, 0, 0., false).unwrap();
        // A second completion is a protocol violation.
        let err = buf.store_effect(slot, 0, 0., false).unwrap_err();
        assert!(matches!(
            err,
            TandemError::InvalidSlot { expected: None, .. }
        ));
    }

    #[test]
    fn nothing_eligible_below_history_len() {
        let mut buf = buffer(10, 4);
        push(&mut buf, 1., false);
        push(&mut buf, 2., false);
        push(&mut buf, 3., false);
        assert_eq!(buf.num_eligible(), 0);
        assert!(matches!(
            buf.batch(1),
            Err(TandemError::InsufficientData { .. })
        ));
        push(&mut buf, 4., false);
        assert_eq!(buf.num_eligible(), 3);
    }

    #[test]
    fn batch_larger_than_eligible_fails() {
        let mut buf = buffer(10, 2);
        for i in 0..4 {
            push(&mut buf, i as f32, false);
        }
        assert_eq!(buf.num_eligible(), 3);
        let err = buf.batch(4).unwrap_err();
        assert!(matches!(
            err,
            TandemError::InsufficientData {
                requested: 4,
                available: 3,
            }
        ));
        let (obs, act, reward, next_obs, is_done) = buf.batch(3).unwrap().unpack();
        assert_eq!(act.len(), 3);
        assert_eq!(reward.len(), 3);
        assert_eq!(is_done.len(), 3);
        assert_eq!(obs.len(), 3 * 2);
        assert_eq!(next_obs.len(), 3 * 2);
    }

    #[test]
    fn sampling_never_returns_newest_or_pending_slot() {
        let mut buf = buffer(10, 2);
        for i in 0..5 {
            push(&mut buf, i as f32, false);
        }
        // Leave a sixth frame pending: it must never be served as a current
        // transition, though the slot before it still is.
        let slot = buf.store_frame(&[5.]);
        for _ in 0..50 {
            let batch = buf.batch(3).unwrap();
            for &a in &batch.act {
                assert!(a <= 4, "sampled the pending slot");
            }
        }
        // Once completed, the newest slot is still excluded: its temporal
        // successor does not exist yet.
        buf.store_effect(slot, 5, 5., false).unwrap();
        for _ in 0..50 {
            let batch = buf.batch(3).unwrap();
            for &a in &batch.act {
                assert!(a <= 4, "sampled the slot with no successor");
            }
        }
    }

    #[test]
    fn next_state_may_end_at_pending_frame() {
        let mut buf = buffer(10, 1);
        push(&mut buf, 1., false);
        push(&mut buf, 2., false);
        buf.store_frame(&[3.]);
        // Transition at the newest completed slot uses the pending frame as
        // its next observation.
        let batch = buf.batch(2).unwrap();
        for i in 0..batch.len() {
            if batch.act[i] == 2 {
                assert_eq!(batch.next_obs[i], 3.);
            }
        }
    }

    #[test]
    fn ring_eviction_makes_old_frames_unrecoverable() {
        let cap = 8;
        let mut buf = buffer(cap, 1);
        for i in 0..(cap + 3) {
            push(&mut buf, 100. + i as f32, false);
        }
        // Sequences 0..2 were overwritten; sequence 3 is the oldest live
        // frame and is excluded once the ring has wrapped.
        for _ in 0..200 {
            let batch = buf.batch(4).unwrap();
            for &a in &batch.act {
                assert!(a >= 104, "sampled overwritten or oldest slot {}", a);
            }
            for &o in batch.obs.iter().chain(batch.next_obs.iter()) {
                assert!(o == 0. || o >= 104., "state leaked evicted frame {}", o);
            }
        }
    }

    #[test]
    fn transitions_pair_state_with_successor_state() {
        let mut buf = buffer(16, 2);
        for i in 0..10 {
            push(&mut buf, i as f32, false);
        }
        let batch = buf.batch(8).unwrap();
        for i in 0..batch.len() {
            let cur = batch.obs[i * 2 + 1];
            let next = batch.next_obs[i * 2 + 1];
            assert_eq!(next, cur + 1.);
            assert_eq!(batch.act[i] as f32, cur);
            assert_eq!(batch.reward[i], cur);
        }
    }

    #[test]
    fn done_transitions_keep_flag_and_block_history() {
        let mut buf = buffer(16, 3);
        for i in 0..4 {
            push(&mut buf, i as f32, i == 1);
        }
        for i in 4..8 {
            push(&mut buf, i as f32, false);
        }
        let batch = buf.batch(6).unwrap();
        for i in 0..batch.len() {
            let end = batch.obs[i * 3 + 2];
            let flag = batch.is_done[i];
            assert_eq!(flag == 1, end == 1.);
            if end == 2. {
                // History behind the post-boundary frame is zero-filled.
                assert_eq!(&batch.obs[i * 3..i * 3 + 3], &[0., 0., 2.]);
            }
        }
    }
}
