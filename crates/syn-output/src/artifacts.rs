//! The three output documents and how they live on disk.
//!
//! A compiled scheme `name` owns three files in the output directory:
//!
//! | Kind     | File                       |
//! |----------|----------------------------|
//! | grammar  | `name.tmLanguage.json`     |
//! | theme    | `name.tmTheme.json`        |
//! | settings | `name.sublime-settings`    |
//!
//! Writes replace whole files. There is no atomic rename, so a failure
//! part-way through can leave a truncated document behind.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::OutputError;

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

/// Which of the three documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Grammar,
    Theme,
    Settings,
}

impl ArtifactKind {
    pub const ALL: [Self; 3] = [Self::Grammar, Self::Theme, Self::Settings];

    /// File extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Grammar => "tmLanguage.json",
            Self::Theme => "tmTheme.json",
            Self::Settings => "sublime-settings",
        }
    }

    /// The file name for scheme `name`.
    ///
    /// A name that already carries the extension is used as is.
    #[must_use]
    pub fn file_name(self, name: &str) -> String {
        let ext = self.extension();
        if name.ends_with(&format!(".{ext}")) {
            name.to_string()
        } else {
            format!("{name}.{ext}")
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Theme => "theme",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// Grammar, theme and settings documents for one scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub grammar: Value,
    pub theme: Value,
    pub settings: Value,
}

impl Artifacts {
    /// The document of the given kind.
    #[must_use]
    pub const fn get(&self, kind: ArtifactKind) -> &Value {
        match kind {
            ArtifactKind::Grammar => &self.grammar,
            ArtifactKind::Theme => &self.theme,
            ArtifactKind::Settings => &self.settings,
        }
    }

    /// Write all three documents for scheme `name` into `dir`, creating the
    /// directory if needed. Returns the written paths in kind order.
    ///
    /// # Errors
    ///
    /// [`OutputError::Io`] for the first directory or file that fails.
    pub fn write_to(&self, dir: &Path, name: &str) -> Result<Vec<PathBuf>, OutputError> {
        fs::create_dir_all(dir).map_err(|source| OutputError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(ArtifactKind::ALL.len());
        for kind in ArtifactKind::ALL {
            let path = dir.join(kind.file_name(name));
            let io_err = |source| OutputError::Io {
                path: path.clone(),
                source,
            };
            let mut text = serde_json::to_string_pretty(self.get(kind))
                .map_err(|e| io_err(io::Error::other(e)))?;
            text.push('\n');
            fs::write(&path, text).map_err(io_err)?;
            tracing::info!(kind = %kind, path = %path.display(), "written");
            written.push(path);
        }
        Ok(written)
    }

    /// Delete the documents of scheme `name` from `dir`.
    ///
    /// Missing files are skipped. Returns the paths actually removed, so an
    /// empty result means the scheme was not found.
    ///
    /// # Errors
    ///
    /// [`OutputError::Io`] if an existing file cannot be removed.
    pub fn remove(dir: &Path, name: &str) -> Result<Vec<PathBuf>, OutputError> {
        let mut removed = Vec::new();
        for kind in ArtifactKind::ALL {
            let path = dir.join(kind.file_name(name));
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "not found, nothing to delete");
                }
                Err(source) => return Err(OutputError::Io { path, source }),
            }
        }
        Ok(removed)
    }

    /// Names of the compiled schemes in `dir`, sorted.
    ///
    /// A scheme counts as compiled when its grammar document exists. A
    /// missing directory lists as empty.
    ///
    /// # Errors
    ///
    /// [`OutputError::Io`] if the directory exists but cannot be read.
    pub fn list(dir: &Path) -> Result<Vec<String>, OutputError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(OutputError::Io {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };

        let suffix = format!(".{}", ArtifactKind::Grammar.extension());
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                file_name.strip_suffix(&suffix).map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Artifacts {
        Artifacts {
            grammar: json!({ "name": "demo" }),
            theme: json!({ "settings": [] }),
            settings: json!({ "extensions": ["d"] }),
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(ArtifactKind::Grammar.file_name("x"), "x.tmLanguage.json");
        assert_eq!(ArtifactKind::Theme.file_name("x"), "x.tmTheme.json");
        assert_eq!(ArtifactKind::Settings.file_name("x"), "x.sublime-settings");
        assert_eq!(ArtifactKind::Theme.file_name("x.tmTheme.json"), "x.tmTheme.json");
    }

    #[test]
    fn write_creates_directory_and_files() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("nested").join("out");

        let written = sample().write_to(&out, "demo").unwrap();
        assert_eq!(written.len(), 3);
        for path in &written {
            assert!(path.is_file(), "{} missing", path.display());
        }

        let grammar: Value =
            serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(grammar, json!({ "name": "demo" }));
    }

    #[test]
    fn write_replaces_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut artifacts = sample();
        artifacts.write_to(dir.path(), "demo").unwrap();
        artifacts.grammar = json!({ "name": "second" });
        let written = artifacts.write_to(dir.path(), "demo").unwrap();

        let grammar: Value =
            serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(grammar["name"], "second");
    }

    #[test]
    fn list_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        sample().write_to(dir.path(), "beta").unwrap();
        sample().write_to(dir.path(), "alpha").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(Artifacts::list(dir.path()).unwrap(), ["alpha", "beta"]);

        let removed = Artifacts::remove(dir.path(), "alpha").unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(Artifacts::list(dir.path()).unwrap(), ["beta"]);

        assert!(Artifacts::remove(dir.path(), "alpha").unwrap().is_empty());
    }

    #[test]
    fn list_of_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Artifacts::list(&dir.path().join("absent")).unwrap().is_empty());
    }
}
