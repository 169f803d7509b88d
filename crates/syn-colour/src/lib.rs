//! # syn-colour — colour engine for synesthesia
//!
//! Turns seeds and randomness into colours that read well as syntax
//! highlighting: vivid foregrounds, muted backgrounds, and perceptually
//! spread sequences.
//!
//! # Architecture
//!
//! ```text
//! seed string ──sha1──▶ hashed_rgb ──▶ prettify ──▶ string_to_colour
//!                                  └─▶ uglify   ──▶ string_to_dark_colour
//! rng ──────────────▶ random bytes ──▶ prettify ──▶ random_colour
//! seed / rng ───────▶ start hue ──+φ⁻¹──▶ cyclic_colours
//! ```
//!
//! All outputs are [`Rgb`] values, which display as normalized lowercase
//! `#rrggbb` strings.

// Single-char math variables are standard in color science.
#![allow(clippy::many_single_char_names)]
// Hue/saturation/value variable names are inherently similar.
#![allow(clippy::similar_names)]
// Byte math is range-checked before every narrowing cast.
#![allow(clippy::cast_possible_truncation)]

pub mod cyclic;
pub mod engine;
pub mod named;
pub mod rgb;

pub use cyclic::{cyclic_colours, cyclic_hues};
pub use engine::{
    prettify, random_colour, random_pastel, rescale, string_to_colour, string_to_dark_colour,
    uglify,
};
pub use rgb::{Hsv, Rgb};
