//! Derive mode — patch existing documents with compiled rules.
//!
//! A scheme with a `deriving` directive names a grammar, a theme and a
//! settings document to extend. The patched copies are written under the
//! new scheme's name; the originals are never touched. A scheme whose output
//! would land on one of its own targets is rejected.
//!
//! Targets are looked up next to the scheme first, then in the output
//! directory. All three must be found and parsed before anything is
//! patched, so a missing target produces no output at all.
//!
//! Rules go into the grammar's `repository` under their identifier, and an
//! `{"include": "#identifier"}` reference is appended to the `patterns` of
//! the node the directive's scope path points at:
//!
//! ```text
//! scope "repository.main"
//!
//! repository
//! ├── main
//! │   └── patterns: [ …existing…, {include: #foo0}, {include: #bar1} ]
//! ├── foo0: {match: \bfoo\b, name: foo0.myscheme}
//! └── bar1: {match: \bbar\b, name: bar1.myscheme}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use syn_scheme::{CompiledRule, DeriveDirective, SchemeDefinition};

use crate::OutputContext;
use crate::artifacts::{ArtifactKind, Artifacts};
use crate::doc::{self, PathError};
use crate::error::OutputError;
use crate::generate::{rule_style, theme_reference};

/// Key of the rule list inside the insertion node.
pub const RULE_LIST_KEY: &str = "patterns";

/// Key of the grammar's definitions table.
pub const DEFINITIONS_KEY: &str = "repository";

/// Located paths of the three derive targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveTargets {
    pub grammar: PathBuf,
    pub theme: PathBuf,
    pub settings: PathBuf,
}

impl DeriveTargets {
    /// Find all three targets, searching `dirs` in order.
    ///
    /// # Errors
    ///
    /// [`OutputError::MissingDeriveTarget`] for the first target not found.
    pub fn locate(directive: &DeriveDirective, dirs: &[&Path]) -> Result<Self, OutputError> {
        let find = |kind: ArtifactKind, name: &str| {
            let file = kind.file_name(name);
            dirs.iter()
                .map(|dir| dir.join(&file))
                .find(|path| path.is_file())
                .ok_or_else(|| OutputError::MissingDeriveTarget {
                    kind,
                    name: name.to_string(),
                })
        };

        Ok(Self {
            grammar: find(ArtifactKind::Grammar, &directive.grammar)?,
            theme: find(ArtifactKind::Theme, &directive.theme)?,
            settings: find(ArtifactKind::Settings, &directive.settings)?,
        })
    }

    /// Fail if writing scheme `name` into `output_dir` would replace one of
    /// the targets.
    ///
    /// # Errors
    ///
    /// [`OutputError::DeriveOverwritesTarget`] for the first such target.
    pub fn ensure_not_overwritten(&self, output_dir: &Path, name: &str) -> Result<(), OutputError> {
        let targets = [
            (ArtifactKind::Grammar, &self.grammar),
            (ArtifactKind::Theme, &self.theme),
            (ArtifactKind::Settings, &self.settings),
        ];
        for (kind, target) in targets {
            let destination = output_dir.join(kind.file_name(name));
            if same_file(target, &destination) {
                return Err(OutputError::DeriveOverwritesTarget {
                    kind,
                    path: destination,
                });
            }
        }
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The scope name a derived rule is published under.
#[must_use]
pub fn qualified_scope(rule: &CompiledRule, scheme: &str) -> String {
    format!("{}.{scheme}", rule.identifier)
}

fn object_mut<'a>(doc: &'a mut Value, key: &str) -> Result<&'a mut Map<String, Value>, PathError> {
    doc.as_object_mut().ok_or_else(|| PathError::new(key, key))
}

/// Patch a grammar document in place.
///
/// # Errors
///
/// A [`PathError`] if the document root is not an object, or if the scope
/// path or its rule list is missing. The document may be partially edited
/// on error and should be discarded.
pub fn patch_grammar(
    grammar: &mut Value,
    scheme: &str,
    scope: &str,
    rules: &[CompiledRule],
) -> Result<(), PathError> {
    let root = object_mut(grammar, "name")?;
    let qualified = match root.get("scopeName").and_then(Value::as_str) {
        Some(base) => format!("{base}.{scheme}"),
        None => format!("source.{scheme}"),
    };
    root.insert("name".into(), scheme.into());
    root.insert("scopeName".into(), qualified.into());

    let full_path = if scope.is_empty() {
        RULE_LIST_KEY.to_string()
    } else {
        format!("{scope}.{RULE_LIST_KEY}")
    };
    let node = doc::navigate_mut(grammar, scope)?;
    let patterns = node
        .get_mut(RULE_LIST_KEY)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| PathError::new(RULE_LIST_KEY, &full_path))?;
    patterns.extend(
        rules
            .iter()
            .map(|rule| json!({ "include": format!("#{}", rule.identifier) })),
    );

    let root = object_mut(grammar, DEFINITIONS_KEY)?;
    let definitions = root
        .entry(DEFINITIONS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    let definitions = definitions
        .as_object_mut()
        .ok_or_else(|| PathError::new(DEFINITIONS_KEY, DEFINITIONS_KEY))?;
    for rule in rules {
        definitions.insert(
            rule.identifier.clone(),
            json!({ "match": rule.pattern, "name": qualified_scope(rule, scheme) }),
        );
    }
    Ok(())
}

/// Patch a theme document in place: rename it and append one styling entry
/// per rule.
pub fn patch_theme(theme: &mut Value, scheme: &str, rules: &[CompiledRule]) {
    if !theme.is_object() {
        *theme = json!({});
    }
    theme["name"] = scheme.into();
    if !theme["settings"].is_array() {
        theme["settings"] = json!([]);
    }
    if let Some(entries) = theme["settings"].as_array_mut() {
        entries.extend(rules.iter().map(|rule| {
            json!({
                "name": rule.identifier,
                "scope": qualified_scope(rule, scheme),
                "settings": rule_style(rule),
            })
        }));
    }
}

/// Patch a settings document in place: overlay `overrides`, then point the
/// active theme at `theme_path`.
pub fn patch_settings(settings: &mut Value, overrides: &Map<String, Value>, theme_path: &str) {
    if !settings.is_object() {
        *settings = json!({});
    }
    if let Some(doc) = settings.as_object_mut() {
        for (key, value) in overrides {
            doc.insert(key.clone(), value.clone());
        }
        doc.insert("color_scheme".into(), theme_path.into());
    }
}

/// Produce patched copies of the scheme's derive targets.
///
/// # Errors
///
/// - [`OutputError::MissingDeriveTarget`] if any target cannot be found.
/// - [`OutputError::MalformedTarget`] / [`OutputError::Io`] if a target
///   cannot be read.
/// - [`OutputError::MissingInsertionScope`] if the grammar lacks the scope
///   path. No documents are produced in that case.
pub fn derive(
    scheme: &SchemeDefinition,
    directive: &DeriveDirective,
    rules: &[CompiledRule],
    ctx: &OutputContext,
) -> Result<Artifacts, OutputError> {
    let search = [scheme.directory.as_path(), ctx.output_dir.as_path()];
    let targets = DeriveTargets::locate(directive, &search)?;
    tracing::debug!(?targets, "derive targets located");
    targets.ensure_not_overwritten(&ctx.output_dir, &scheme.name)?;

    let mut grammar = doc::read_document(&targets.grammar)?;
    let mut theme = doc::read_document(&targets.theme)?;
    let mut settings = doc::read_document(&targets.settings)?;

    patch_grammar(&mut grammar, &scheme.name, &directive.scope, rules)?;
    patch_theme(&mut theme, &scheme.name, rules);
    patch_settings(
        &mut settings,
        &scheme.settings,
        &theme_reference(ctx, &scheme.name),
    );

    Ok(Artifacts {
        grammar,
        theme,
        settings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use syn_colour::Rgb;
    use syn_scheme::FontStyle;

    fn rule(id: &str, pattern: &str) -> CompiledRule {
        CompiledRule {
            keyword: pattern.to_string(),
            pattern: pattern.to_string(),
            identifier: id.to_string(),
            foreground: Some(Rgb::new(0x12, 0x34, 0x56)),
            background: None,
            font_style: FontStyle::ITALIC,
        }
    }

    fn base_grammar() -> Value {
        json!({
            "name": "Base",
            "scopeName": "source.base",
            "patterns": [{ "include": "#main" }],
            "repository": {
                "main": { "patterns": [{ "match": "x", "name": "x.base" }] }
            }
        })
    }

    #[test]
    fn grammar_patch_inserts_references_and_definitions() {
        let mut grammar = base_grammar();
        patch_grammar(&mut grammar, "mine", "repository.main", &[rule("foo0", r"\bfoo\b")]).unwrap();

        assert_eq!(grammar["name"], "mine");
        assert_eq!(grammar["scopeName"], "source.base.mine");
        assert_eq!(
            grammar["repository"]["main"]["patterns"],
            json!([
                { "match": "x", "name": "x.base" },
                { "include": "#foo0" },
            ])
        );
        assert_eq!(
            grammar["repository"]["foo0"],
            json!({ "match": r"\bfoo\b", "name": "foo0.mine" })
        );
    }

    #[test]
    fn empty_scope_targets_root_patterns() {
        let mut grammar = base_grammar();
        patch_grammar(&mut grammar, "mine", "", &[rule("a0", "a")]).unwrap();
        assert_eq!(grammar["patterns"][1], json!({ "include": "#a0" }));
    }

    #[test]
    fn definitions_table_is_created_when_absent() {
        let mut grammar = json!({ "scopeName": "text.plain", "patterns": [] });
        patch_grammar(&mut grammar, "mine", "", &[rule("a0", "a")]).unwrap();
        assert_eq!(grammar["repository"]["a0"]["name"], "a0.mine");
    }

    #[test]
    fn missing_scope_segment_is_reported() {
        let mut grammar = base_grammar();
        let err = patch_grammar(&mut grammar, "mine", "repository.nope", &[rule("a0", "a")]).unwrap_err();
        assert_eq!(err.segment, "nope");
    }

    #[test]
    fn missing_rule_list_is_reported() {
        let mut grammar = json!({ "repository": { "main": {} } });
        let err = patch_grammar(&mut grammar, "mine", "repository.main", &[]).unwrap_err();
        assert_eq!(err, PathError::new("patterns", "repository.main.patterns"));
    }

    #[test]
    fn theme_patch_appends_entries() {
        let mut theme = json!({
            "name": "Base",
            "settings": [{ "settings": { "background": "#000000" } }]
        });
        patch_theme(&mut theme, "mine", &[rule("foo0", "foo")]);

        assert_eq!(theme["name"], "mine");
        assert_eq!(
            theme["settings"][1],
            json!({
                "name": "foo0",
                "scope": "foo0.mine",
                "settings": { "foreground": "#123456", "fontStyle": "italic" }
            })
        );
    }

    #[test]
    fn settings_patch_forces_theme_reference() {
        let mut settings = json!({ "color_scheme": "old", "font_size": 10 });
        let mut overrides = Map::new();
        overrides.insert("font_size".into(), 12.into());
        overrides.insert("color_scheme".into(), "user".into());
        patch_settings(&mut settings, &overrides, "/out/mine.tmTheme.json");

        assert_eq!(
            settings,
            json!({ "color_scheme": "/out/mine.tmTheme.json", "font_size": 12 })
        );
    }

    fn write_targets(dir: &Path) {
        fs::write(dir.join("Base.tmLanguage.json"), base_grammar().to_string()).unwrap();
        fs::write(dir.join("Base.tmTheme.json"), r#"{"settings": []}"#).unwrap();
        fs::write(dir.join("Base.sublime-settings"), "{}").unwrap();
    }

    fn deriving_scheme(dir: &Path, scope: &str) -> SchemeDefinition {
        let json = format!(
            r#"{{"settings": {{"tab_size": 3}},
                "deriving": {{"grammar": "Base", "theme": "Base", "settings": "Base", "scope": "{scope}"}}}}"#
        );
        SchemeDefinition::from_json(&json).unwrap().named("mine", dir)
    }

    #[test]
    fn derive_end_to_end() {
        let schemes = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_targets(schemes.path());

        let scheme = deriving_scheme(schemes.path(), "repository.main");
        let directive = scheme.deriving.clone().unwrap();
        let ctx = OutputContext::new(out.path());
        let artifacts = derive(&scheme, &directive, &[rule("foo0", "foo")], &ctx).unwrap();

        assert_eq!(artifacts.grammar["repository"]["main"]["patterns"][1]["include"], "#foo0");
        assert_eq!(artifacts.theme["settings"][0]["scope"], "foo0.mine");
        assert_eq!(artifacts.settings["tab_size"], 3);
        let reference = artifacts.settings["color_scheme"].as_str().unwrap();
        assert!(reference.ends_with("mine.tmTheme.json"));
    }

    #[test]
    fn targets_fall_back_to_output_dir() {
        let schemes = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_targets(out.path());

        let scheme = deriving_scheme(schemes.path(), "");
        let directive = scheme.deriving.clone().unwrap();
        let ctx = OutputContext::new(out.path());
        assert!(derive(&scheme, &directive, &[], &ctx).is_ok());
    }

    #[test]
    fn missing_target_aborts() {
        let schemes = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_targets(schemes.path());
        fs::remove_file(schemes.path().join("Base.tmTheme.json")).unwrap();

        let scheme = deriving_scheme(schemes.path(), "");
        let directive = scheme.deriving.clone().unwrap();
        let err = derive(&scheme, &directive, &[], &OutputContext::new(out.path())).unwrap_err();
        assert!(matches!(
            err,
            OutputError::MissingDeriveTarget { kind: ArtifactKind::Theme, .. }
        ));
    }

    #[test]
    fn deriving_onto_own_target_is_rejected() {
        let schemes = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_targets(out.path());

        let scheme = deriving_scheme(schemes.path(), "").named("Base", schemes.path());
        let directive = scheme.deriving.clone().unwrap();
        let err = derive(&scheme, &directive, &[], &OutputContext::new(out.path())).unwrap_err();
        match err {
            OutputError::DeriveOverwritesTarget { kind, path } => {
                assert_eq!(kind, ArtifactKind::Grammar);
                assert_eq!(path, out.path().join("Base.tmLanguage.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn same_name_in_another_dir_is_allowed() {
        let schemes = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_targets(schemes.path());

        let scheme = deriving_scheme(schemes.path(), "").named("Base", schemes.path());
        let directive = scheme.deriving.clone().unwrap();
        assert!(derive(&scheme, &directive, &[], &OutputContext::new(out.path())).is_ok());
    }

    #[test]
    fn missing_scope_aborts() {
        let schemes = tempfile::tempdir().unwrap();
        write_targets(schemes.path());

        let scheme = deriving_scheme(schemes.path(), "repository.absent");
        let directive = scheme.deriving.clone().unwrap();
        let err = derive(&scheme, &directive, &[], &OutputContext::new(schemes.path())).unwrap_err();
        match err {
            OutputError::MissingInsertionScope(path) => assert_eq!(path.segment, "absent"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
