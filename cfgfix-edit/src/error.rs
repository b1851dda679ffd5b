//! Error types for cfgfix-edit.
//!
//! Distinguishes a refused write (the file changed under us) from plain
//! runtime failures. Callers report both as warnings; only the former is
//! worth telling the operator to re-run for.

use cfgfix_types::document::{DocumentError, FieldPath};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// The file on disk no longer matches what was loaded.
    #[error("precondition mismatch: {message}")]
    PreconditionMismatch { message: String },

    /// A planned value could not be placed in the document.
    #[error("cannot set {field}: {source}")]
    Document {
        field: FieldPath,
        #[source]
        source: DocumentError,
    },

    /// I/O and other runtime failures.
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

impl EditError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, EditError::PreconditionMismatch { .. })
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
