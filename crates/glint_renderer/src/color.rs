//! Linear RGB color helpers.
//!
//! Colors are plain `DVec3` values with channels nominally in [0, 1].
//! Accumulation clamps, while interpolation and sample blending happen in
//! gamma-decoded space so mixed colors keep their perceived brightness.

use glint_math::{DVec3, Interval};

use crate::image::Rgb8;

/// Color type alias (RGB values typically 0-1)
pub type Color = DVec3;

/// Named colors.
pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const GREY: Color = Color::new(0.5, 0.5, 0.5);
    pub const DARK_GREY: Color = Color::new(0.25, 0.25, 0.25);
    pub const LIGHT_GREY: Color = Color::new(0.75, 0.75, 0.75);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0);
    pub const ORANGE: Color = Color::new(1.0, 0.5, 0.0);
    pub const DARK_RED: Color = Color::new(0.5, 0.0, 0.0);
    pub const DARK_GREEN: Color = Color::new(0.0, 0.5, 0.0);
    pub const DARK_BLUE: Color = Color::new(0.0, 0.0, 0.5);
}

/// Remove sRGB gamma from a channel.
#[inline]
pub fn remove_correction(value: f64) -> f64 {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Apply sRGB gamma to a channel.
#[inline]
pub fn apply_correction(value: f64) -> f64 {
    if value <= 0.0031308 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Clamp every channel to [0, 1].
#[inline]
pub fn clamp(color: Color) -> Color {
    color.clamp(Color::ZERO, Color::ONE)
}

/// Add two colors, clamping the result.
#[inline]
pub fn accumulate(a: Color, b: Color) -> Color {
    clamp(a + b)
}

/// Sum a set of colors with clamping (used for combining light sources).
pub fn accumulate_samples(samples: &[Color]) -> Color {
    samples
        .iter()
        .fold(Color::ZERO, |sum, sample| accumulate(sum, *sample))
}

/// Average a set of subsamples in gamma-decoded space.
pub fn blend_samples(samples: &[Color]) -> Color {
    if samples.is_empty() {
        return Color::ZERO;
    }
    let weight = 1.0 / samples.len() as f64;
    let sum = samples.iter().fold(Color::ZERO, |sum, sample| {
        let decoded = clamp(*sample).to_array().map(remove_correction);
        clamp(sum + Color::from_array(decoded) * weight)
    });
    clamp(Color::from_array(sum.to_array().map(apply_correction)))
}

/// Weighted mix: `s` of `x` and `1 - s` of `y`, computed per channel in
/// gamma-decoded space.
pub fn interpolate(x: Color, y: Color, s: f64) -> Color {
    let s = Interval::UNIT.clamp(s);
    // the gamma round trip is not exact, so the endpoints skip it
    if s == 1.0 {
        return clamp(x);
    }
    if s == 0.0 {
        return clamp(y);
    }
    let mix = |a: f64, b: f64| {
        let a = remove_correction(a.clamp(0.0, 1.0));
        let b = remove_correction(b.clamp(0.0, 1.0));
        apply_correction(a * s + b * (1.0 - s)).clamp(0.0, 1.0)
    };
    Color::new(mix(x.x, y.x), mix(x.y, y.y), mix(x.z, y.z))
}

/// Even mix of two colors.
pub fn blend(x: Color, y: Color) -> Color {
    interpolate(x, y, 0.5)
}

/// Convert a color to 8-bit channels, rounding to nearest.
pub fn to_rgb8(color: Color) -> Rgb8 {
    let channel = |c: f64| (Interval::UNIT.clamp(c) * 255.0).round() as u8;
    Rgb8 {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    }
}

/// Convert 8-bit channels back to a color.
pub fn from_rgb8(pixel: Rgb8) -> Color {
    Color::new(
        f64::from(pixel.r) / 255.0,
        f64::from(pixel.g) / 255.0,
        f64::from(pixel.b) / 255.0,
    )
}

/// Perceived brightness of a color in [0, 1].
pub fn luminance(color: Color) -> f64 {
    0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z
}
