//! Scheme definitions — the parsed input document.
//!
//! A scheme is one JSON document named after its file stem:
//!
//! ```json
//! {
//!     "keywords": { "function": "red", "=>": { "colour": "blue", "whole-word": true } },
//!     "include": ["shared"],
//!     "extensions": ["foo"],
//!     "autocompletion": true,
//!     "settings": { "tab_size": 2 },
//!     "auto_keywords": ["let", "const"],
//!     "random_keywords": ["todo"],
//!     "cyclic_keywords": ["a", "b", "c"],
//!     "cyclic_seed": "x",
//!     "deriving": { "grammar": "Base", "theme": "Base", "settings": "Base", "scope": "repository.main" }
//! }
//! ```
//!
//! Every field is optional. Unknown fields are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SchemeError;
use crate::style::StyleDescriptor;

/// Keyword pattern → style, in document order.
pub type KeywordMap = IndexMap<String, StyleDescriptor>;

/// File extension of scheme and include documents.
pub const SCHEME_EXTENSION: &str = "json";

/// Keyword lists that expand into generated colour entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Sugar {
    /// Each name gets a colour hashed from its own text.
    pub auto_keywords: Vec<String>,
    /// Each name gets a random colour.
    pub random_keywords: Vec<String>,
    /// Names share one golden-ratio colour sequence, in list order.
    pub cyclic_keywords: Vec<String>,
    /// Seed for the cyclic sequence. Unseeded sequences start at a random hue.
    pub cyclic_seed: Option<String>,
}

impl Sugar {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.auto_keywords.is_empty()
            && self.random_keywords.is_empty()
            && self.cyclic_keywords.is_empty()
    }
}

/// Patch pre-existing documents instead of generating fresh ones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeriveDirective {
    /// Base name of the grammar document to patch.
    pub grammar: String,
    /// Base name of the theme document to patch.
    pub theme: String,
    /// Base name of the settings document to patch.
    pub settings: String,
    /// Dotted path to the grammar node whose `patterns` receive the rules.
    /// Empty means the document root.
    #[serde(default, alias = "insertion_scope")]
    pub scope: String,
}

/// A parsed scheme document plus where it came from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemeDefinition {
    /// Scheme name: the file stem of the document.
    #[serde(skip)]
    pub name: String,
    /// Directory containing the document. Includes and derive targets are
    /// looked up here first.
    #[serde(skip)]
    pub directory: PathBuf,

    pub keywords: KeywordMap,
    pub include: Vec<String>,
    pub extensions: Vec<String>,
    pub autocompletion: bool,
    pub settings: Map<String, Value>,
    #[serde(flatten)]
    pub sugar: Sugar,
    pub deriving: Option<DeriveDirective>,
}

impl SchemeDefinition {
    /// Parse a scheme document from JSON text.
    ///
    /// The result has an empty name and directory; see [`Self::load`].
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is not a valid scheme document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read and parse a scheme document, naming it after the file.
    ///
    /// # Errors
    ///
    /// [`SchemeError::Read`] if the file cannot be read,
    /// [`SchemeError::Malformed`] if it is not a valid scheme document.
    pub fn load(path: &Path) -> Result<Self, SchemeError> {
        let text = fs::read_to_string(path).map_err(|source| SchemeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scheme = Self::from_json(&text).map_err(|source| SchemeError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        scheme.name = scheme_name(path);
        scheme.directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(scheme)
    }

    /// Set the name and directory. Used for documents not read from disk.
    #[must_use]
    pub fn named(mut self, name: &str, directory: impl Into<PathBuf>) -> Self {
        self.name = name.to_string();
        self.directory = directory.into();
        self
    }
}

/// The scheme name for a document path: the file name up to its first dot.
///
/// `schemes/rust.keywords.json` is the scheme `rust`.
#[must_use]
pub fn scheme_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
