//! Process-level failures of a transform run.
//!
//! Diagnostics about the input program are data, not errors; they are
//! collected and reported through events. `TransformError` is reserved for
//! I/O failures and broken internal invariants.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("{path} is outside the root directory {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl TransformError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TransformError::Io {
            path: path.into(),
            source,
        }
    }
}
