//! Errors raised while synthesizing or persisting artifacts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::artifacts::ArtifactKind;
use crate::doc::PathError;

/// Errors that can occur while producing output documents.
#[derive(Debug, Error)]
pub enum OutputError {
    /// A document that derive mode needs to patch could not be found.
    #[error("{kind} document `{name}` not found for deriving")]
    MissingDeriveTarget { kind: ArtifactKind, name: String },

    /// A derive target exists but is not valid JSON.
    #[error("{} is not a valid document: {source}", path.display())]
    MalformedTarget {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A derived document would be written over the document it derives
    /// from.
    #[error("deriving would overwrite the {kind} document {}", path.display())]
    DeriveOverwritesTarget { kind: ArtifactKind, path: PathBuf },

    /// The grammar's insertion scope does not exist.
    #[error("insertion scope missing: {0}")]
    MissingInsertionScope(#[from] PathError),

    /// Reading or writing a document failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
