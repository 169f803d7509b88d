//! Golden-ratio colour sequences.
//!
//! Successive hues are spaced by the golden-ratio conjugate, which keeps any
//! prefix of the sequence spread around the wheel: no two neighbours end up
//! close together, no matter how many colours are drawn.

use rand::Rng;

use crate::engine::{hashed_rgb, random_colour_with};
use crate::rgb::{Hsv, Rgb};

/// `1 / phi`, the hue step between consecutive colours.
pub const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

/// Saturation shared by every colour in a sequence.
pub const CYCLIC_SATURATION: f64 = 0.5;

/// Value shared by every colour in a sequence.
pub const CYCLIC_VALUE: f64 = 0.95;

/// The hue of the first colour in a sequence.
fn start_hue<R: Rng>(seed: Option<&str>, rng: &mut R) -> f64 {
    match seed {
        Some(seed) => hashed_rgb(seed).to_hsv().h,
        None => random_colour_with(rng).to_hsv().h,
    }
}

/// `n` hues in `[0, 1)`, each one golden-ratio step after the previous.
#[must_use]
pub fn cyclic_hues(n: usize, seed: Option<&str>) -> Vec<f64> {
    cyclic_hues_with(n, seed, &mut rand::rng())
}

/// Like [`cyclic_hues`], drawing the unseeded start hue from `rng`.
#[must_use]
pub fn cyclic_hues_with<R: Rng>(n: usize, seed: Option<&str>, rng: &mut R) -> Vec<f64> {
    let mut hue = start_hue(seed, rng);
    let mut hues = Vec::with_capacity(n);
    for _ in 0..n {
        hues.push(hue);
        hue = (hue + GOLDEN_RATIO_CONJUGATE).rem_euclid(1.0);
    }
    hues
}

/// `n` perceptually spread colours.
///
/// With a seed the sequence is fully deterministic; without one it starts
/// from a random hue.
#[must_use]
pub fn cyclic_colours(n: usize, seed: Option<&str>) -> Vec<Rgb> {
    cyclic_colours_with(n, seed, &mut rand::rng())
}

/// Like [`cyclic_colours`], drawing the unseeded start hue from `rng`.
#[must_use]
pub fn cyclic_colours_with<R: Rng>(n: usize, seed: Option<&str>, rng: &mut R) -> Vec<Rgb> {
    cyclic_hues_with(n, seed, rng)
        .into_iter()
        .map(|h| Rgb::from_hsv(Hsv::new(h, CYCLIC_SATURATION, CYCLIC_VALUE)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
