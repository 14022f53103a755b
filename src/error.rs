//! Error types for the task store.

use std::path::PathBuf;

/// Failures that abort a command.
///
/// "Task not found" and unparsable storage are not errors: the former is
/// reported as a normal outcome, the latter is read as an empty store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the backing file (or stdout) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The task list could not be encoded.
    #[error("failed to encode tasks: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backing file is valid JSON but not a task list this tracker can
    /// read. Nothing is written so its content is kept as is.
    #[error("{} holds JSON that is not a task list: {source}", path.display())]
    UnexpectedContent {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Every id up to `u64::MAX` is taken.
    #[error("no task id left after {0}")]
    IdSpaceExhausted(u64),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
