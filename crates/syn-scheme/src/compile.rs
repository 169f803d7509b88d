//! Keyword compilation — from keyword map to ordered highlighting rules.
//!
//! ```text
//! merged keywords + sugar lists
//!     │
//!     ▼
//! desugar:        auto / random / cyclic names → explicit entries
//!     │
//!     ▼
//! compile_rule:   colours resolved, flags read, identifier assigned,
//!                 regex wrapped in \b…\b and (?i:…) as needed
//!     │
//!     ▼
//! Vec<CompiledRule> in keyword order
//! ```
//!
//! Identifiers come from a [`RuleCounter`] that the caller passes in and
//! gets back, so two compilations never share numbering state.

use rand::Rng;
use syn_colour::cyclic::cyclic_colours_with;
use syn_colour::engine::random_colour_with;
use syn_colour::{Rgb, named, string_to_colour, string_to_dark_colour};

use crate::scheme::{KeywordMap, Sugar};
use crate::style::{ColourSpec, FontStyle, StyleDescriptor};

// ---------------------------------------------------------------------------
// RuleCounter
// ---------------------------------------------------------------------------

/// Monotonic identifier source for one compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleCounter(usize);

impl RuleCounter {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// The next value that will be handed out.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }

    const fn take(&mut self) -> usize {
        let n = self.0;
        self.0 += 1;
        n
    }
}

// ---------------------------------------------------------------------------
// CompiledRule
// ---------------------------------------------------------------------------

/// One highlighting rule, ready for output synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    /// The keyword as written in the scheme.
    pub keyword: String,
    /// The regex after word-boundary and case-insensitivity wrapping.
    pub pattern: String,
    /// Unique within one compilation: alphabetic core + counter.
    pub identifier: String,
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
    pub font_style: FontStyle,
}

// ---------------------------------------------------------------------------
// Colour resolution
// ---------------------------------------------------------------------------

/// Which side of a rule a colour is for.
///
/// `auto` resolves differently per role: foregrounds get the vivid hash
/// colour, backgrounds the muted one. Keep the two apart; text drawn in a
/// keyword's vivid colour must stay legible on its muted background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourRole {
    Foreground,
    Background,
}

/// Resolve a colour specifier for `keyword`.
///
/// Literals are tried as `#hex`, then as a colour name (case-insensitive),
/// then as bare hex. Unknown literals resolve to `None`.
pub fn resolve_colour<R: Rng>(
    spec: &ColourSpec,
    keyword: &str,
    role: ColourRole,
    rng: &mut R,
) -> Option<Rgb> {
    match spec {
        ColourSpec::Auto => Some(match role {
            ColourRole::Foreground => string_to_colour(keyword),
            ColourRole::Background => string_to_dark_colour(keyword),
        }),
        ColourSpec::Random => Some(random_colour_with(rng)),
        ColourSpec::Literal(text) => {
            let resolved = if text.starts_with('#') {
                Rgb::from_hex(text)
            } else {
                named::lookup(&text.to_lowercase()).or_else(|| Rgb::from_hex(text))
            };
            if resolved.is_none() {
                tracing::debug!(keyword, colour = %text, ?role, "unknown colour, ignoring");
            }
            resolved
        }
    }
}

// ---------------------------------------------------------------------------
// Desugaring
// ---------------------------------------------------------------------------

/// Expand the sugar lists into explicit keyword entries.
///
/// Explicit entries always win; between lists, auto beats random beats
/// cyclic. The cyclic sequence is sized to the whole cyclic list and
/// assigned by list position, so a name keeps its colour even when an
/// earlier name in the list is skipped.
pub fn desugar<R: Rng>(keywords: &KeywordMap, sugar: &Sugar, rng: &mut R) -> KeywordMap {
    let mut expanded = keywords.clone();

    for name in &sugar.auto_keywords {
        expanded
            .entry(name.clone())
            .or_insert(StyleDescriptor::Simple(ColourSpec::Auto));
    }
    for name in &sugar.random_keywords {
        expanded
            .entry(name.clone())
            .or_insert(StyleDescriptor::Simple(ColourSpec::Random));
    }

    if !sugar.cyclic_keywords.is_empty() {
        let colours = cyclic_colours_with(
            sugar.cyclic_keywords.len(),
            sugar.cyclic_seed.as_deref(),
            rng,
        );
        for (name, colour) in sugar.cyclic_keywords.iter().zip(colours) {
            expanded
                .entry(name.clone())
                .or_insert_with(|| StyleDescriptor::Simple(ColourSpec::Literal(colour.to_string())));
        }
    }

    expanded
}

// ---------------------------------------------------------------------------
// Rule compilation
// ---------------------------------------------------------------------------

/// The ASCII letters of `s`, in order.
#[must_use]
pub fn strip_non_alpha(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphabetic).collect()
}

/// Wrap `pattern` in word boundaries and/or an inline case-insensitive group.
#[must_use]
pub fn transform_pattern(pattern: &str, whole_word: bool, case_insensitive: bool) -> String {
    let alphabetic = strip_non_alpha(pattern) == pattern;
    let mut regex = if alphabetic || whole_word {
        format!(r"\b{pattern}\b")
    } else {
        pattern.to_string()
    };
    if case_insensitive {
        regex = format!("(?i:{regex})");
    }
    regex
}

fn compile_rule<R: Rng>(
    keyword: &str,
    style: &StyleDescriptor,
    counter: &mut RuleCounter,
    rng: &mut R,
) -> CompiledRule {
    let style = style.detailed();

    let foreground = style
        .foreground
        .as_ref()
        .and_then(|spec| resolve_colour(spec, keyword, ColourRole::Foreground, rng));
    let background = style
        .background
        .as_ref()
        .and_then(|spec| resolve_colour(spec, keyword, ColourRole::Background, rng));

    let identifier = format!("{}{}", strip_non_alpha(keyword), counter.take());
    let pattern = transform_pattern(keyword, style.whole_word, style.case_insensitive);

    // The rendering engine speaks Oniguruma, which accepts more than the
    // regex crate does, so a parse failure here is only a hint.
    if let Err(e) = regex::Regex::new(&pattern) {
        tracing::warn!(keyword, %pattern, "pattern may not be a valid regex: {e}");
    }

    tracing::debug!(
        keyword,
        %identifier,
        foreground = ?foreground.map(|c| c.to_string()),
        "compiled rule"
    );

    CompiledRule {
        keyword: keyword.to_string(),
        pattern,
        identifier,
        foreground,
        background,
        font_style: style.font_style(),
    }
}

/// Compile keywords and sugar into rules, using the thread RNG.
#[must_use]
pub fn compile_keywords(
    keywords: &KeywordMap,
    sugar: &Sugar,
    counter: RuleCounter,
) -> (Vec<CompiledRule>, RuleCounter) {
    compile_keywords_with(keywords, sugar, counter, &mut rand::rng())
}

/// Compile keywords and sugar into rules.
///
/// Rules come out in keyword order, followed by any entries the sugar lists
/// added. No entry is ever dropped. Returns the advanced counter.
#[must_use]
pub fn compile_keywords_with<R: Rng>(
    keywords: &KeywordMap,
    sugar: &Sugar,
    mut counter: RuleCounter,
    rng: &mut R,
) -> (Vec<CompiledRule>, RuleCounter) {
    let expanded = desugar(keywords, sugar, rng);
    let rules = expanded
        .iter()
        .map(|(keyword, style)| compile_rule(keyword, style, &mut counter, rng))
        .collect();
    (rules, counter)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
