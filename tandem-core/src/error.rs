//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum TandemError {
    /// An invalid combination of configuration values, detected at
    /// construction. Fatal, no retry.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `store_effect()` targeted a slot other than the pending one,
    /// indicating a protocol violation in the caller.
    #[error("Invalid slot: the pending slot is {expected:?}, got {got}")]
    InvalidSlot {
        /// The slot of the frame whose effect is outstanding, if any.
        expected: Option<usize>,
        /// The slot the caller tried to complete.
        got: usize,
    },

    /// Fewer eligible transitions than the requested batch size. In correct
    /// operation the training-start gate prevents this from surfacing.
    #[error("Insufficient data: {available} eligible transitions, {requested} requested")]
    InsufficientData {
        /// The requested batch size.
        requested: usize,
        /// The number of currently eligible transitions.
        available: usize,
    },

    /// A handshake signal channel was closed because the peer loop exited.
    #[error("Handshake peer disconnected")]
    Disconnected,

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
