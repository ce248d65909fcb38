//! Reconstruction of stacked multi-frame states from the frame ring.
use super::FrameStore;

/// Appends the stacked state ending at `end` to `out`, oldest frame first.
///
/// The state is the `history_len` most recent frames ending at (and
/// including) `end`. Walking backward from `end`, history stops at the first
/// slot whose `done` flag is set (that slot belongs to the previous episode)
/// and at the oldest frame still live in the ring; the remaining leading
/// positions are zero-filled. Exactly `history_len * frame_len` elements are
/// appended.
///
/// Only the observations of strictly older slots and their `done` flags are
/// read besides `end`'s own frame, so encoding at a pending slot never
/// touches its unset metadata.
pub(super) fn encode_state_into(
    store: &FrameStore,
    end: usize,
    history_len: usize,
    out: &mut Vec<f32>,
) {
    debug_assert!(store.is_written(end));
    let avail = store.history_available(end);

    // The number of older frames to keep, capped by the episode boundary.
    let mut kept = 0;
    while kept + 1 < history_len && kept < avail {
        if store.done(store.back(end, kept + 1)) {
            break;
        }
        kept += 1;
    }

    let zeros = (history_len - 1 - kept) * store.frame_len();
    out.extend(std::iter::repeat(0.).take(zeros));
    for m in (0..=kept).rev() {
        out.extend_from_slice(store.frame(store.back(end, m)));
    }
}

/// Returns the stacked state ending at `end` as a fresh vector.
pub(super) fn encode_state(store: &FrameStore, end: usize, history_len: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(history_len * store.frame_len());
    encode_state_into(store, end, history_len, &mut out);
    out
}
