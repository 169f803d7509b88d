//! Errors raised while reading scheme documents.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a scheme definition.
#[derive(Debug, Error)]
pub enum SchemeError {
    /// The document could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not a valid scheme.
    #[error("{} is not a valid scheme: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SchemeError {
    /// The path of the document that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. } | Self::Malformed { path, .. } => path,
        }
    }
}
