// SPDX-License-Identifier: MIT
//
// The compilation pipeline, end to end:
//
//   scheme.json ─load─▶ SchemeDefinition
//               ─resolve_scheme─▶ merged keywords (includes folded in)
//               ─compile_keywords─▶ Vec<CompiledRule>
//               ─synthesize─▶ Artifacts (generate or derive)
//               ─write_to─▶ <output>/<name>.{tmLanguage.json,tmTheme.json,sublime-settings}
//
// Every failure is caught here and turned into a status line. Nothing is
// written unless all three documents were produced.

use std::path::{Path, PathBuf};

use syn_output::generate::base_colours_from_theme;
use syn_output::{OutputContext, OutputError, synthesize};
use syn_scheme::{RuleCounter, SchemeDefinition, SchemeError, compile_keywords, resolve_scheme};
use thiserror::Error;

use crate::config::Config;

/// Which output mode a compilation used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Generated,
    Derived,
}

/// A finished compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub name: String,
    pub mode: Mode,
    pub rules: usize,
    pub written: Vec<PathBuf>,
}

impl Compiled {
    /// The user-facing status line.
    #[must_use]
    pub fn status_message(&self) -> String {
        let verb = match self.mode {
            Mode::Generated => "generated",
            Mode::Derived => "derived",
        };
        format!("{} syntax files {verb} ({} rules).", self.name, self.rules)
    }
}

/// Why a compilation produced nothing.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The scheme document could not be read or parsed.
    #[error(transparent)]
    MalformedInput(#[from] SchemeError),

    /// Synthesis or writing failed.
    #[error("{scheme}: {source}")]
    Output {
        scheme: String,
        #[source]
        source: OutputError,
    },
}

impl CompileError {
    /// The user-facing status line.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::MalformedInput(SchemeError::Malformed { path, .. }) => {
                let file = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |f| f.to_string_lossy().into_owned(),
                );
                format!("{file} is not a valid JSON file.")
            }
            other => other.to_string(),
        }
    }
}

/// Global theme colours from the configured base theme, if any.
///
/// A base theme that cannot be read is logged and ignored.
fn base_colours(config: &Config) -> Option<serde_json::Map<String, serde_json::Value>> {
    let path = config.base_theme.as_deref()?;
    match syn_output::doc::read_document(path) {
        Ok(theme) => {
            let colours = base_colours_from_theme(&theme);
            if colours.is_none() {
                tracing::warn!(path = %path.display(), "base theme has no global settings block");
            }
            colours
        }
        Err(e) => {
            tracing::warn!("ignoring base theme: {e}");
            None
        }
    }
}

/// Output settings for `scheme`. The base theme only matters when
/// generating, so derive mode never reads it.
fn output_context(scheme: &SchemeDefinition, config: &Config) -> OutputContext {
    let ctx = OutputContext::new(&config.output_dir);
    if scheme.deriving.is_some() {
        return ctx;
    }
    ctx.with_base_colours(base_colours(config))
}

/// Compile an already loaded scheme and write its artifacts.
///
/// # Errors
///
/// [`CompileError::Output`] if synthesis or writing fails.
pub fn compile_scheme(scheme: &SchemeDefinition, config: &Config) -> Result<Compiled, CompileError> {
    let output_err = |source| CompileError::Output {
        scheme: scheme.name.clone(),
        source,
    };

    let keywords = resolve_scheme(scheme, Some(&config.include_dir));
    let (rules, _) = compile_keywords(&keywords, &scheme.sugar, RuleCounter::new());
    tracing::debug!(scheme = %scheme.name, rules = rules.len(), "keywords compiled");

    let ctx = output_context(scheme, config);
    let artifacts = synthesize(scheme, &rules, &ctx).map_err(output_err)?;
    let written = artifacts
        .write_to(&config.output_dir, &scheme.name)
        .map_err(output_err)?;

    Ok(Compiled {
        name: scheme.name.clone(),
        mode: if scheme.deriving.is_some() {
            Mode::Derived
        } else {
            Mode::Generated
        },
        rules: rules.len(),
        written,
    })
}

/// Load, compile and write one scheme file.
///
/// # Errors
///
/// [`CompileError::MalformedInput`] if the file is unreadable or invalid,
/// otherwise as [`compile_scheme`].
pub fn compile_file(path: &Path, config: &Config) -> Result<Compiled, CompileError> {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let scheme = SchemeDefinition::load(&path)?;
    tracing::info!(scheme = %scheme.name, path = %path.display(), "compiling");
    compile_scheme(&scheme, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
