//! Colour derivation — hashed, random, muted and pastel colours.
//!
//! Every derivation funnels through one of two range clamps:
//!
//! - [`prettify`] remaps saturation into `[0.2, 1.0]` and value into
//!   `[0.67, 1.0]`, so the result is never washed out or dark. Foreground
//!   colours go through here.
//! - [`uglify`] remaps saturation into `[0.0, 0.2]` and value into
//!   `[0.0, 0.67]`, so the result is always muted. Background colours
//!   derived from a seed go through here.
//!
//! Hashing uses SHA-1 so that a seed maps to the same colour in every
//! process, on every platform.

use rand::Rng;
use sha1::{Digest, Sha1};

use crate::rgb::{Hsv, Rgb};

/// Saturation range for vivid colours.
pub const PRETTY_SATURATION: (f64, f64) = (0.2, 1.0);
/// Value (brightness) range for vivid colours.
pub const PRETTY_VALUE: (f64, f64) = (0.67, 1.0);
/// Saturation range for muted colours.
pub const UGLY_SATURATION: (f64, f64) = (0.0, 0.2);
/// Value (brightness) range for muted colours.
pub const UGLY_VALUE: (f64, f64) = (0.0, 0.67);

/// Linearly remap `value` from `[0, 1]` into `[lower, upper]`.
#[inline]
#[must_use]
pub fn rescale(value: f64, lower: f64, upper: f64) -> f64 {
    (upper - lower).mul_add(value, lower)
}

/// Remap saturation and value of an RGB triple, keeping its hue.
///
/// Returns float channels in the 0–255 range.
fn remap(r: u8, g: u8, b: u8, saturation: (f64, f64), value: (f64, f64)) -> (f64, f64, f64) {
    let hsv = Rgb::new(r, g, b).to_hsv();
    let remapped = Hsv::new(
        hsv.h,
        rescale(hsv.s, saturation.0, saturation.1),
        rescale(hsv.v, value.0, value.1),
    );
    let (r, g, b) = remapped.to_rgb_f64();
    (r * 255.0, g * 255.0, b * 255.0)
}

/// Push an RGB triple into the vivid range.
///
/// The result has HSV saturation in `[0.2, 1.0]` and value in `[0.67, 1.0]`.
#[must_use]
pub fn prettify(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    remap(r, g, b, PRETTY_SATURATION, PRETTY_VALUE)
}

/// Push an RGB triple into the muted range.
///
/// The result has HSV saturation in `[0.0, 0.2]` and value in `[0.0, 0.67]`.
#[must_use]
pub fn uglify(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    remap(r, g, b, UGLY_SATURATION, UGLY_VALUE)
}

/// Round float channels to bytes without leaving the saturation and value
/// bands they were remapped into.
///
/// Plain rounding moves the max and min channels independently, which can
/// nudge saturation or value a step past a band edge. Instead the max
/// channel is clamped to the value band in bytes, and the other channels
/// to the range that keeps `(max - min) / max` inside the saturation band.
#[allow(clippy::cast_sign_loss)]
fn quantize_in_band(channels: (f64, f64, f64), saturation: (f64, f64), value: (f64, f64)) -> Rgb {
    let c = [channels.0, channels.1, channels.2];
    let byte = |v: f64| v.round().clamp(0.0, 255.0) as u8;

    let hi = (0..3).fold(0, |best, i| if c[i] > c[best] { i } else { best });
    let lo = (0..3)
        .filter(|&i| i != hi)
        .fold(usize::from(hi == 0), |best, i| if c[i] < c[best] { i } else { best });

    let max_floor = byte((value.0 * 255.0).ceil());
    let max_ceil = byte((value.1 * 255.0).floor());
    let max = byte(c[hi]).clamp(max_floor, max_ceil.max(max_floor));

    let m = f64::from(max);
    let min_floor = byte(((1.0 - saturation.1) * m).ceil());
    let min_ceil = byte(((1.0 - saturation.0) * m).floor()).max(min_floor);

    let mut out = [0u8; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = if i == hi {
            max
        } else {
            let v = byte(c[i]).clamp(min_floor, max);
            if i == lo { v.min(min_ceil) } else { v }
        };
    }
    Rgb::new(out[0], out[1], out[2])
}

fn pretty_rgb(rgb: Rgb) -> Rgb {
    quantize_in_band(prettify(rgb.r, rgb.g, rgb.b), PRETTY_SATURATION, PRETTY_VALUE)
}

fn ugly_rgb(rgb: Rgb) -> Rgb {
    quantize_in_band(uglify(rgb.r, rgb.g, rgb.b), UGLY_SATURATION, UGLY_VALUE)
}

/// The low 24 bits of the SHA-1 digest of `seed`, as an RGB triple.
///
/// The digest is read as a big-endian integer `h`; red is `h & 0xff`,
/// green `(h >> 8) & 0xff`, blue `(h >> 16) & 0xff`.
#[must_use]
pub fn hashed_rgb(seed: &str) -> Rgb {
    let digest = Sha1::digest(seed.as_bytes());
    let n = digest.len();
    Rgb::new(digest[n - 1], digest[n - 2], digest[n - 3])
}

/// Deterministic vivid colour for a seed string.
#[must_use]
pub fn string_to_colour(seed: &str) -> Rgb {
    pretty_rgb(hashed_rgb(seed))
}

/// Deterministic muted colour for a seed string.
#[must_use]
pub fn string_to_dark_colour(seed: &str) -> Rgb {
    ugly_rgb(hashed_rgb(seed))
}

/// Uniform random vivid colour from the thread RNG.
#[must_use]
pub fn random_colour() -> Rgb {
    random_colour_with(&mut rand::rng())
}

/// Uniform random vivid colour from `rng`.
#[must_use]
pub fn random_colour_with<R: Rng>(rng: &mut R) -> Rgb {
    pretty_rgb(Rgb::new(rng.random(), rng.random(), rng.random()))
}

/// Random colour pulled halfway towards `tint`, from the thread RNG.
#[must_use]
pub fn random_pastel(tint: Rgb) -> Rgb {
    random_pastel_with(tint, &mut rand::rng())
}

/// Random colour pulled halfway towards `tint`.
///
/// Each channel is the floor average of a uniform random byte and the
/// tint's channel. Independent of [`prettify`]/[`uglify`].
#[must_use]
pub fn random_pastel_with<R: Rng>(tint: Rgb, rng: &mut R) -> Rgb {
    let mix = |t: u8, n: u8| ((u16::from(n) + u16::from(t)) / 2) as u8;
    Rgb::new(
        mix(tint.r, rng.random()),
        mix(tint.g, rng.random()),
        mix(tint.b, rng.random()),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
