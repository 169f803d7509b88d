// SPDX-License-Identifier: MIT
//
// syn-colour normalized colour values.
//
// Every colour that leaves the engine is an `Rgb`: three bytes, always
// rendered as a lowercase `#rrggbb` string. HSV is the working space for
// the prettify/uglify/cyclic derivations, with all three components in the
// unit interval (hue included, 0.0 = 1.0 = red).

use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An 8-bit sRGB colour.
///
/// # Examples
///
/// ```
/// use syn_colour::Rgb;
///
/// let red = Rgb::from_hex("#F00").unwrap();
/// assert_eq!(red.to_string(), "#ff0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from float channels in the 0–255 range.
    ///
    /// Channels are rounded to the nearest byte and clamped.
    #[must_use]
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: channel_to_u8(r),
            g: channel_to_u8(g),
            b: channel_to_u8(b),
        }
    }

    /// Parse a hex colour.
    ///
    /// Supports `#RGB` and `#RRGGBB`, with or without `#`, in any case.
    /// Returns `None` for anything else.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let bytes = s.as_bytes();

        match bytes.len() {
            3 => {
                let r = parse_hex_digit(bytes[0])?;
                let g = parse_hex_digit(bytes[1])?;
                let b = parse_hex_digit(bytes[2])?;
                Some(Self::new(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let r = parse_hex_byte(&bytes[0..2])?;
                let g = parse_hex_byte(&bytes[2..4])?;
                let b = parse_hex_byte(&bytes[4..6])?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Build a colour from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Convert to HSV.
    #[must_use]
    pub fn to_hsv(self) -> Hsv {
        Hsv::from_rgb_f64(
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    /// Convert from HSV.
    #[must_use]
    pub fn from_hsv(hsv: Hsv) -> Self {
        let (r, g, b) = hsv.to_rgb_f64();
        Self::from_channels(r * 255.0, g * 255.0, b * 255.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ─── Hsv ─────────────────────────────────────────────────────────────────────

/// Hue, saturation and value, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    #[inline]
    #[must_use]
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Convert unit-interval RGB channels to HSV.
    #[must_use]
    pub fn from_rgb_f64(r: f64, g: f64, b: f64) -> Self {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let v = max;
        if (max - min).abs() < f64::EPSILON {
            return Self::new(0.0, 0.0, v);
        }
        let delta = max - min;
        let s = delta / max;
        let rc = (max - r) / delta;
        let gc = (max - g) / delta;
        let bc = (max - b) / delta;
        let h = if (r - max).abs() < f64::EPSILON {
            bc - gc
        } else if (g - max).abs() < f64::EPSILON {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        Self::new((h / 6.0).rem_euclid(1.0), s, v)
    }

    /// Convert to unit-interval RGB channels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_rgb_f64(self) -> (f64, f64, f64) {
        let Self { h, s, v } = self;
        if s <= 0.0 {
            return (v, v, v);
        }
        let sector = (h * 6.0).floor();
        let f = h.mul_add(6.0, -sector);
        let p = v * (1.0 - s);
        let q = v * s.mul_add(-f, 1.0);
        let t = v * s.mul_add(-(1.0 - f), 1.0);
        match (sector as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

/// Round a 0–255 float channel to a byte.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(v: f64) -> u8 {
    // Clamped to 0.0..=255.0 before truncation.
    (v + 0.5).clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
