//! Tree navigation over JSON documents.
//!
//! Paths are dotted: `repository.main.patterns`. Each segment names an
//! object key, or an array index when the current node is an array. An
//! empty path addresses the root.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::error::OutputError;

/// A path segment that does not exist in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{segment}` not found (path `{path}`)")]
pub struct PathError {
    /// The first segment that could not be followed.
    pub segment: String,
    /// The full path being walked.
    pub path: String,
}

impl PathError {
    #[must_use]
    pub fn new(segment: &str, path: &str) -> Self {
        Self {
            segment: segment.to_string(),
            path: path.to_string(),
        }
    }
}

/// The non-empty segments of a dotted path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

/// Follow `path` from `root`.
///
/// # Errors
///
/// Returns a [`PathError`] naming the first segment that is missing.
pub fn navigate<'a>(root: &'a Value, path: &str) -> Result<&'a Value, PathError> {
    let mut node = root;
    for segment in segments(path) {
        node = match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
        .ok_or_else(|| PathError::new(segment, path))?;
    }
    Ok(node)
}

/// Follow `path` from `root`, mutably.
///
/// # Errors
///
/// Returns a [`PathError`] naming the first segment that is missing.
pub fn navigate_mut<'a>(root: &'a mut Value, path: &str) -> Result<&'a mut Value, PathError> {
    let mut node = root;
    for segment in segments(path) {
        node = match node {
            Value::Object(map) => map.get_mut(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
            _ => None,
        }
        .ok_or_else(|| PathError::new(segment, path))?;
    }
    Ok(node)
}

/// Read a JSON document from disk.
///
/// # Errors
///
/// [`OutputError::Io`] if the file cannot be read,
/// [`OutputError::MalformedTarget`] if it is not JSON.
pub fn read_document(path: &Path) -> Result<Value, OutputError> {
    let text = fs::read_to_string(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| OutputError::MalformedTarget {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
