//! # syn-output — output synthesis for synesthesia
//!
//! Turns compiled rules into the three documents a highlighting engine
//! consumes, in one of two modes:
//!
//! - **generate** (default): fresh grammar, theme and settings documents.
//! - **derive**: patched copies of existing documents named by the scheme's
//!   `deriving` directive.
//!
//! Documents are `serde_json::Value` trees throughout, so both modes build
//! and edit structure rather than text.

use std::path::PathBuf;

use serde_json::{Map, Value};
use syn_scheme::{CompiledRule, SchemeDefinition};

pub mod artifacts;
pub mod derive;
pub mod doc;
pub mod error;
pub mod generate;

pub use artifacts::{ArtifactKind, Artifacts};
pub use doc::PathError;
pub use error::OutputError;

/// Where output goes and what it starts from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputContext {
    /// Directory the artifacts are written to. Also the fallback search
    /// location for derive targets.
    pub output_dir: PathBuf,
    /// Global colours for generated themes. `None` uses the built-in
    /// defaults.
    pub base_colours: Option<Map<String, Value>>,
}

impl OutputContext {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_colours: None,
        }
    }

    #[must_use]
    pub fn with_base_colours(mut self, colours: Option<Map<String, Value>>) -> Self {
        self.base_colours = colours;
        self
    }
}

/// Build the scheme's artifacts, deriving when the scheme asks for it.
///
/// # Errors
///
/// Only derive mode can fail; see [`derive::derive`].
pub fn synthesize(
    scheme: &SchemeDefinition,
    rules: &[CompiledRule],
    ctx: &OutputContext,
) -> Result<Artifacts, OutputError> {
    match &scheme.deriving {
        Some(directive) => derive::derive(scheme, directive, rules, ctx),
        None => Ok(generate::generate(scheme, rules, ctx)),
    }
}
