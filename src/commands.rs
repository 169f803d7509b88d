// SPDX-License-Identifier: MIT
//
// Housekeeping commands: remove a compiled scheme, scaffold a new scheme
// file, list what has been compiled.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use syn_output::{Artifacts, OutputError};

use crate::config::Config;

/// Starting point written by `new`.
pub const NEW_SCHEME_TEMPLATE: &str = r#"{
    "keywords": {
        "TODO": { "colour": "auto", "bold": true },
        "FIXME": "red"
    },
    "include": [],
    "extensions": [],
    "autocompletion": false,
    "settings": {}
}
"#;

/// Remove every artifact of scheme `name`. Returns the status line.
///
/// # Errors
///
/// [`OutputError::Io`] if an existing artifact cannot be removed.
pub fn delete(config: &Config, name: &str) -> Result<String, OutputError> {
    let removed = Artifacts::remove(&config.output_dir, name)?;
    if removed.is_empty() {
        Ok(format!("Highlighting scheme {name} not found."))
    } else {
        tracing::debug!(?removed, "artifacts removed");
        Ok(format!("Highlighting scheme {name} removed."))
    }
}

/// Write the template scheme to `path`, refusing to overwrite.
///
/// # Errors
///
/// [`io::ErrorKind::AlreadyExists`] if `path` exists, or any write error.
pub fn scaffold(path: &Path) -> io::Result<String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(NEW_SCHEME_TEMPLATE.as_bytes())?;
    Ok(format!("New scheme written to {}.", path.display()))
}

/// Names of the compiled schemes in the output directory.
///
/// # Errors
///
/// [`OutputError::Io`] if the output directory exists but cannot be read.
pub fn list(config: &Config) -> Result<Vec<String>, OutputError> {
    Artifacts::list(&config.output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::compile_file;
    use pretty_assertions::assert_eq;
    use syn_scheme::SchemeDefinition;

    #[test]
    fn template_is_a_valid_scheme() {
        let scheme = SchemeDefinition::from_json(NEW_SCHEME_TEMPLATE).unwrap();
        assert_eq!(scheme.keywords.len(), 2);
        assert!(scheme.deriving.is_none());
    }

    #[test]
    fn scaffold_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mine.json");

        scaffold(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), NEW_SCHEME_TEMPLATE);

        std::fs::write(&path, "keep me").unwrap();
        let err = scaffold(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn compile_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::in_dir(&dir.path().join("out"));
        assert_eq!(list(&config).unwrap(), Vec::<String>::new());

        let source = dir.path().join("mine.json");
        scaffold(&source).unwrap();
        compile_file(&source, &config).unwrap();
        assert_eq!(list(&config).unwrap(), vec!["mine".to_string()]);

        assert_eq!(delete(&config, "mine").unwrap(), "Highlighting scheme mine removed.");
        assert_eq!(list(&config).unwrap(), Vec::<String>::new());
        assert_eq!(delete(&config, "mine").unwrap(), "Highlighting scheme mine not found.");
    }
}
