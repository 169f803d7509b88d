//! Include resolution — merging keyword maps across documents.
//!
//! A scheme may `include` other keyword documents by name, and those may
//! include further documents. Resolution walks the include graph depth-first
//! in declared order and merges every reachable keyword map into the
//! scheme's own:
//!
//! ```text
//! scheme { a: red }  include [shared, extra]
//!     shared { a: blue, b: green }  include [extra]
//!         extra { c: gold }
//!
//! merged: { a: red, b: green, c: gold }
//! ```
//!
//! The merge is first-write-wins: a key already present is never replaced,
//! so the scheme's own definitions always beat included ones. Each name is
//! visited at most once, so cyclic and diamond graphs terminate.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::scheme::{KeywordMap, SCHEME_EXTENSION, SchemeDefinition};

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// A keyword document reachable through `include`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludeDocument {
    pub keywords: KeywordMap,
    pub include: Vec<String>,
}

impl From<SchemeDefinition> for IncludeDocument {
    fn from(scheme: SchemeDefinition) -> Self {
        Self {
            keywords: scheme.keywords,
            include: scheme.include,
        }
    }
}

/// Finds include documents by name.
pub trait IncludeLoader {
    /// Load the document called `name`, or `None` if it cannot be found or
    /// parsed.
    fn load(&self, name: &str) -> Option<IncludeDocument>;
}

/// Loads `<name>.json` from the scheme's directory, falling back to a
/// shared include directory.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    home: PathBuf,
    shared: Option<PathBuf>,
}

impl DirectoryLoader {
    #[must_use]
    pub fn new(home: impl Into<PathBuf>, shared: Option<PathBuf>) -> Self {
        Self {
            home: home.into(),
            shared,
        }
    }

    fn candidates(&self, name: &str) -> impl Iterator<Item = PathBuf> + '_ {
        let file = format!("{name}.{SCHEME_EXTENSION}");
        std::iter::once(self.home.as_path())
            .chain(self.shared.as_deref())
            .map(move |dir| dir.join(&file))
    }
}

impl IncludeLoader for DirectoryLoader {
    fn load(&self, name: &str) -> Option<IncludeDocument> {
        let path = self.candidates(name).find(|p| p.is_file())?;
        match SchemeDefinition::load(&path) {
            Ok(scheme) => Some(scheme.into()),
            Err(e) => {
                tracing::warn!(include = name, "{e}");
                None
            }
        }
    }
}

/// Resolve includes from an in-memory table. Handy for tests and for
/// callers that embed their keyword documents.
impl<S: std::hash::BuildHasher> IncludeLoader for std::collections::HashMap<String, IncludeDocument, S> {
    fn load(&self, name: &str) -> Option<IncludeDocument> {
        self.get(name).cloned()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Merge `keywords` with every keyword map reachable through `include`.
///
/// `name` is the including scheme's own name; an include cycle that leads
/// back to it is cut there. Unresolvable names are logged and skipped.
#[must_use]
pub fn resolve_includes(
    name: &str,
    keywords: &KeywordMap,
    include: &[String],
    loader: &impl IncludeLoader,
) -> KeywordMap {
    let mut merged = keywords.clone();
    let mut pending: Vec<String> = include.iter().rev().cloned().collect();
    let mut visited: HashSet<String> = HashSet::from([name.to_string()]);

    while let Some(next) = pending.pop() {
        if !visited.insert(next.clone()) {
            continue;
        }

        let Some(doc) = loader.load(&next) else {
            tracing::warn!(include = %next, scheme = name, "include not found, skipping");
            continue;
        };

        pending.extend(doc.include.into_iter().rev());
        let mut added = 0usize;
        for (pattern, style) in doc.keywords {
            if !merged.contains_key(&pattern) {
                merged.insert(pattern, style);
                added += 1;
            }
        }
        tracing::debug!(include = %next, added, "merged include");
    }

    merged
}

/// Resolve a scheme's includes against its own directory and `shared`.
#[must_use]
pub fn resolve_scheme(scheme: &SchemeDefinition, shared: Option<&Path>) -> KeywordMap {
    let loader = DirectoryLoader::new(&scheme.directory, shared.map(Path::to_path_buf));
    resolve_includes(&scheme.name, &scheme.keywords, &scheme.include, &loader)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{ColourSpec, StyleDescriptor};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;

    fn colour(name: &str) -> StyleDescriptor {
        StyleDescriptor::Simple(ColourSpec::Literal(name.to_string()))
    }

    fn keywords(pairs: &[(&str, &str)]) -> KeywordMap {
        pairs.iter().map(|(k, v)| ((*k).to_string(), colour(v))).collect()
    }

    fn doc(pairs: &[(&str, &str)], include: &[&str]) -> IncludeDocument {
        IncludeDocument {
            keywords: keywords(pairs),
            include: include.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Records every load attempt.
    struct CountingLoader {
        docs: HashMap<String, IncludeDocument>,
        calls: RefCell<Vec<String>>,
    }

    impl IncludeLoader for CountingLoader {
        fn load(&self, name: &str) -> Option<IncludeDocument> {
            self.calls.borrow_mut().push(name.to_string());
            self.docs.get(name).cloned()
        }
    }

    #[test]
    fn base_wins_on_conflict() {
        let docs = HashMap::from([("shared".to_string(), doc(&[("a", "blue"), ("b", "green")], &[]))]);
        let merged = resolve_includes("base", &keywords(&[("a", "red")]), &["shared".into()], &docs);
        assert_eq!(merged, keywords(&[("a", "red"), ("b", "green")]));
    }

    #[test]
    fn earlier_include_wins_over_later() {
        let docs = HashMap::from([
            ("one".to_string(), doc(&[("k", "gold")], &[])),
            ("two".to_string(), doc(&[("k", "navy")], &[])),
        ]);
        let merged = resolve_includes("s", &KeywordMap::new(), &["one".into(), "two".into()], &docs);
        assert_eq!(merged, keywords(&[("k", "gold")]));
    }

    #[test]
    fn nested_includes_follow_declared_order() {
        let docs = HashMap::from([
            ("a".to_string(), doc(&[("x", "red")], &["c"])),
            ("b".to_string(), doc(&[("x", "blue"), ("y", "blue")], &[])),
            ("c".to_string(), doc(&[("y", "green")], &[])),
        ]);
        // Depth-first: a, then a's include c, then b.
        let merged = resolve_includes("s", &KeywordMap::new(), &["a".into(), "b".into()], &docs);
        assert_eq!(merged, keywords(&[("x", "red"), ("y", "green")]));
    }

    #[test]
    fn mutual_includes_terminate() {
        let loader = CountingLoader {
            docs: HashMap::from([
                ("a".to_string(), doc(&[("p", "red")], &["b"])),
                ("b".to_string(), doc(&[("q", "blue")], &["a", "s"])),
            ]),
            calls: RefCell::new(Vec::new()),
        };
        let merged = resolve_includes("s", &KeywordMap::new(), &["a".into()], &loader);
        assert_eq!(merged, keywords(&[("p", "red"), ("q", "blue")]));
        assert_eq!(*loader.calls.borrow(), ["a", "b"]);
    }

    #[test]
    fn diamond_loads_each_name_once() {
        let loader = CountingLoader {
            docs: HashMap::from([
                ("left".to_string(), doc(&[], &["bottom"])),
                ("right".to_string(), doc(&[], &["bottom"])),
                ("bottom".to_string(), doc(&[("z", "tan")], &[])),
            ]),
            calls: RefCell::new(Vec::new()),
        };
        let merged = resolve_includes("top", &KeywordMap::new(), &["left".into(), "right".into()], &loader);
        assert_eq!(merged.len(), 1);
        assert_eq!(*loader.calls.borrow(), ["left", "bottom", "right"]);
    }

    #[test]
    fn missing_include_is_skipped() {
        let docs = HashMap::from([("real".to_string(), doc(&[("r", "red")], &[]))]);
        let merged = resolve_includes(
            "s",
            &keywords(&[("own", "blue")]),
            &["ghost".into(), "real".into()],
            &docs,
        );
        assert_eq!(merged, keywords(&[("own", "blue"), ("r", "red")]));
    }

    #[test]
    fn self_include_is_ignored() {
        let loader = CountingLoader {
            docs: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        };
        let merged = resolve_includes("me", &keywords(&[("a", "red")]), &["me".into()], &loader);
        assert_eq!(merged, keywords(&[("a", "red")]));
        assert!(loader.calls.borrow().is_empty());
    }

    #[test]
    fn directory_loader_prefers_home_then_shared() {
        let home = tempfile::tempdir().unwrap();
        let shared = tempfile::tempdir().unwrap();
        fs::write(home.path().join("both.json"), r#"{"keywords": {"w": "red"}}"#).unwrap();
        fs::write(shared.path().join("both.json"), r#"{"keywords": {"w": "blue"}}"#).unwrap();
        fs::write(shared.path().join("only.json"), r#"{"keywords": {"o": "green"}}"#).unwrap();
        fs::write(home.path().join("broken.json"), "{").unwrap();

        let loader = DirectoryLoader::new(home.path(), Some(shared.path().to_path_buf()));
        assert_eq!(loader.load("both").unwrap().keywords, keywords(&[("w", "red")]));
        assert_eq!(loader.load("only").unwrap().keywords, keywords(&[("o", "green")]));
        assert_eq!(loader.load("broken"), None);
        assert_eq!(loader.load("nowhere"), None);
    }

    #[test]
    fn resolve_scheme_uses_scheme_directory() {
        let home = tempfile::tempdir().unwrap();
        fs::write(home.path().join("lib.json"), r#"{"keywords": {"b": "green"}}"#).unwrap();
        let scheme = SchemeDefinition::from_json(r#"{"keywords": {"a": "red"}, "include": ["lib"]}"#)
            .unwrap()
            .named("main", home.path());

        let merged = resolve_scheme(&scheme, None);
        assert_eq!(merged, keywords(&[("a", "red"), ("b", "green")]));
    }
}
