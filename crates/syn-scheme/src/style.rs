//! Style descriptors — what a keyword should look like.
//!
//! A keyword's value in the input document is either a bare colour
//! specifier (`"red"`, `"#ff8000"`, `"auto"`, `"random"`) or an object with
//! individual style fields. Both shapes land in [`StyleDescriptor`].
//!
//! Field parsing is lenient by contract: a field with the wrong JSON type is
//! treated as absent, and a value that is neither a string nor an object
//! becomes an empty detailed style. A keyword is never rejected because of
//! its style.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// ColourSpec
// ---------------------------------------------------------------------------

/// An unresolved colour, as written in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColourSpec {
    /// `"auto"` — derived from a hash of the keyword's pattern.
    Auto,
    /// `"random"` — a fresh random colour per compilation.
    Random,
    /// A hex literal or colour name, resolved during compilation.
    Literal(String),
}

impl ColourSpec {
    /// Parse a colour specifier. `auto` and `random` are case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else if trimmed.eq_ignore_ascii_case("random") {
            Self::Random
        } else {
            Self::Literal(trimmed.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// FontStyle
// ---------------------------------------------------------------------------

bitflags::bitflags! {
    /// Font style flags for a compiled rule.
    ///
    /// ```
    /// use syn_scheme::style::FontStyle;
    ///
    /// let style = FontStyle::BOLD | FontStyle::ITALIC;
    /// assert_eq!(style.token().as_deref(), Some("bold italic"));
    /// assert_eq!(FontStyle::empty().token(), None);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct FontStyle: u8 {
        const BOLD   = 1 << 0;
        const ITALIC = 1 << 1;
    }
}

impl FontStyle {
    /// The theme `fontStyle` token, or `None` when no flag is set.
    #[must_use]
    pub fn token(self) -> Option<String> {
        let mut parts = Vec::with_capacity(2);
        if self.contains(Self::BOLD) {
            parts.push("bold");
        }
        if self.contains(Self::ITALIC) {
            parts.push("italic");
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

// ---------------------------------------------------------------------------
// StyleDescriptor
// ---------------------------------------------------------------------------

/// The style of one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleDescriptor {
    /// A bare colour: foreground only, no flags.
    Simple(ColourSpec),
    /// Individually specified style fields.
    Detailed(DetailedStyle),
}

/// The structured form of a [`StyleDescriptor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DetailedStyle {
    pub foreground: Option<ColourSpec>,
    pub background: Option<ColourSpec>,
    pub bold: bool,
    pub italic: bool,
    pub whole_word: bool,
    pub case_insensitive: bool,
}

/// Keys accepted for the foreground colour, in priority order.
const FOREGROUND_KEYS: &[&str] = &["colour", "color", "foreground"];

impl StyleDescriptor {
    /// Build a descriptor from any JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Simple(ColourSpec::parse(s)),
            Value::Object(fields) => Self::Detailed(DetailedStyle::from_fields(fields)),
            other => {
                tracing::debug!(value = %other, "style is neither a colour nor an object");
                Self::Detailed(DetailedStyle::default())
            }
        }
    }

    /// The style in detailed form. A simple colour becomes a foreground.
    #[must_use]
    pub fn detailed(&self) -> DetailedStyle {
        match self {
            Self::Simple(spec) => DetailedStyle {
                foreground: Some(spec.clone()),
                ..DetailedStyle::default()
            },
            Self::Detailed(style) => style.clone(),
        }
    }
}

impl DetailedStyle {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let colour = |key: &str| fields.get(key).and_then(Value::as_str).map(ColourSpec::parse);
        let flag = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_bool))
                .unwrap_or(false)
        };

        Self {
            foreground: FOREGROUND_KEYS.iter().find_map(|key| colour(key)),
            background: colour("background"),
            bold: flag(&["bold"]),
            italic: flag(&["italic"]),
            whole_word: flag(&["whole-word", "whole_word"]),
            case_insensitive: flag(&["case-insensitive", "case_insensitive"]),
        }
    }

    /// The font style flags set on this style.
    #[must_use]
    pub fn font_style(&self) -> FontStyle {
        let mut style = FontStyle::empty();
        style.set(FontStyle::BOLD, self.bold);
        style.set(FontStyle::ITALIC, self.italic);
        style
    }
}

impl<'de> Deserialize<'de> for StyleDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
