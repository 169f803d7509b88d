//! Generate mode — build fresh documents from compiled rules.
//!
//! The grammar maps each rule's regex to the rule's identifier as scope
//! name; the theme maps that scope to the rule's colours. Each document
//! gets a fresh v4 UUID.

#![allow(clippy::unreadable_literal)] // Hex values are colours, not numbers.

use serde_json::{Map, Value, json};
use syn_scheme::{CompiledRule, SchemeDefinition};
use uuid::Uuid;

use crate::OutputContext;
use crate::artifacts::{ArtifactKind, Artifacts};

/// Global theme colours used when the caller supplies none.
#[must_use]
pub fn default_base_colours() -> Map<String, Value> {
    let block = json!({
        "background": "#272822",
        "caret": "#f8f8f0",
        "foreground": "#f8f8f2",
        "invisibles": "#3b3a32",
        "lineHighlight": "#3e3d32",
        "selection": "#49483e",
    });
    match block {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// The global (unscoped) settings block of a theme document.
///
/// This is the first entry of the theme's `settings` array that has no
/// `scope`. Returns `None` if the document has no such entry.
#[must_use]
pub fn base_colours_from_theme(theme: &Value) -> Option<Map<String, Value>> {
    theme
        .get("settings")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("scope").is_none())?
        .get("settings")?
        .as_object()
        .cloned()
}

/// The root scope of a generated grammar.
///
/// Schemes with autocompletion are classified as `source`, which editors
/// offer completions in; the rest as `text`.
#[must_use]
pub fn root_scope(scheme: &SchemeDefinition) -> String {
    let class = if scheme.autocompletion { "source" } else { "text" };
    format!("{class}.{}", scheme.name)
}

/// The `settings` object of one theme entry.
pub(crate) fn rule_style(rule: &CompiledRule) -> Value {
    let mut style = Map::new();
    if let Some(fg) = rule.foreground {
        style.insert("foreground".into(), fg.to_string().into());
    }
    if let Some(bg) = rule.background {
        style.insert("background".into(), bg.to_string().into());
    }
    if let Some(token) = rule.font_style.token() {
        style.insert("fontStyle".into(), token.into());
    }
    Value::Object(style)
}

/// Path string of the theme document written for scheme `name`.
pub(crate) fn theme_reference(ctx: &OutputContext, name: &str) -> String {
    ctx.output_dir
        .join(ArtifactKind::Theme.file_name(name))
        .display()
        .to_string()
}

fn grammar(scheme: &SchemeDefinition, rules: &[CompiledRule]) -> Value {
    let patterns: Vec<Value> = rules
        .iter()
        .map(|rule| json!({ "match": rule.pattern, "name": rule.identifier }))
        .collect();

    json!({
        "name": scheme.name,
        "scopeName": root_scope(scheme),
        "fileTypes": scheme.extensions,
        "patterns": patterns,
        "uuid": Uuid::new_v4().to_string(),
    })
}

fn theme(scheme: &SchemeDefinition, rules: &[CompiledRule], ctx: &OutputContext) -> Value {
    let base = ctx
        .base_colours
        .clone()
        .unwrap_or_else(default_base_colours);

    let mut settings = Vec::with_capacity(rules.len() + 1);
    settings.push(json!({ "settings": base }));
    settings.extend(rules.iter().map(|rule| {
        json!({
            "name": rule.identifier,
            "scope": rule.identifier,
            "settings": rule_style(rule),
        })
    }));

    json!({
        "name": scheme.name,
        "settings": settings,
        "uuid": Uuid::new_v4().to_string(),
    })
}

fn settings(scheme: &SchemeDefinition, ctx: &OutputContext) -> Value {
    let mut doc = Map::new();
    doc.insert("extensions".into(), json!(scheme.extensions));
    doc.insert("color_scheme".into(), theme_reference(ctx, &scheme.name).into());
    for (key, value) in &scheme.settings {
        doc.insert(key.clone(), value.clone());
    }
    Value::Object(doc)
}

/// Build all three documents from scratch.
#[must_use]
pub fn generate(scheme: &SchemeDefinition, rules: &[CompiledRule], ctx: &OutputContext) -> Artifacts {
    Artifacts {
        grammar: grammar(scheme, rules),
        theme: theme(scheme, rules, ctx),
        settings: settings(scheme, ctx),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
