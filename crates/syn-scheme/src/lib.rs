//! # syn-scheme — scheme model and keyword compiler for synesthesia
//!
//! ```text
//! scheme.json
//!     │
//!     ▼
//! scheme.rs:   parse into SchemeDefinition (keywords, includes, sugar, deriving)
//!     │
//!     ▼
//! resolve.rs:  merge keyword maps reachable through `include`
//!     │
//!     ▼
//! compile.rs:  desugar, resolve colours, wrap regexes, assign identifiers
//!     │
//!     ▼
//! Vec<CompiledRule>  →  syn-output
//! ```

pub mod compile;
pub mod error;
pub mod resolve;
pub mod scheme;
pub mod style;

pub use compile::{CompiledRule, RuleCounter, compile_keywords};
pub use error::SchemeError;
pub use resolve::{DirectoryLoader, IncludeLoader, resolve_includes, resolve_scheme};
pub use scheme::{DeriveDirective, KeywordMap, SchemeDefinition, Sugar};
pub use style::{ColourSpec, FontStyle, StyleDescriptor};
