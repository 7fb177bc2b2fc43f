//! Error types for the bridge layer.

use weavedrive_resolve::ResolveError;

use crate::memory::MemoryError;

/// Errors that can cross the bridge boundary.
///
/// Recoverable storage-layer conditions never appear here — they are written
/// into guest memory as the empty buffer. What remains is fatal to the
/// evaluation: the determinism ceiling, guest ABI faults, and setup
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The guest asked for a block above the evaluation's ceiling. The
    /// evaluation must abort; downgrading this to an empty result would
    /// let replays diverge.
    #[error("determinism violation: block height {requested} above ceiling {ceiling}")]
    DeterminismViolation { requested: u64, ceiling: u64 },

    /// Building the evaluation context failed (bad gateway configuration).
    #[error("evaluation setup failed: {0}")]
    Setup(ResolveError),

    /// The guest handed us an unreadable or unwritable memory range.
    #[error("guest memory fault: {0}")]
    Memory(#[from] MemoryError),

    /// The fetch worker died before delivering its outcome.
    #[error("fetch worker failed: {message}")]
    Worker { message: String },
}

impl BridgeError {
    /// Whether this error must abort the whole evaluation.
    ///
    /// Every `BridgeError` is fatal; the method exists so harnesses can make
    /// the intent explicit at the call site.
    pub fn is_fatal(&self) -> bool {
        true
    }
}
