//! The error taxonomy of task-list and indicator operations

use crate::date_key::DateKey;

/// An error from a task-list or indicator operation.
///
/// None of these propagate past the event handler that triggered them: invalid input is
/// rejected before any store call, a vanished document or task resynchronizes the day, and
/// an unavailable store leaves the state machine untouched until the next operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The task text was empty after trimming. Rejected locally, no store call is made.
    #[error("a task needs a non-empty text")]
    InvalidInput,

    /// A mutation addressed a document or a task that no longer exists
    /// (typically a stale snapshot after a concurrent change)
    #[error("day {key} has no such task anymore")]
    NotFound { key: DateKey },

    /// The document store could not be reached, or refused the operation
    #[error("the document store is unavailable: {reason}")]
    StoreUnavailable { reason: String },
}

impl Error {
    pub(crate) fn store_unavailable(source: crate::traits::StoreError) -> Self {
        Error::StoreUnavailable { reason: source.to_string() }
    }
}
