use glint_math::DVec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin as Gradient};

use crate::color::{interpolate, Color};

use super::{Medium, MediumBase};

/// Opaque medium shaded by blending two colors with gradient noise.
#[derive(Debug, Clone)]
pub struct Perlin {
    base: MediumBase,
    noise: Gradient,
    low: Color,
    high: Color,
    scale: f64,
}

impl Perlin {
    /// `scale` is the noise frequency per unit of object space.
    pub fn new(low: Color, high: Color, scale: f64, seed: u32) -> Self {
        Self {
            base: MediumBase::new().with_diffuse(low),
            noise: Gradient::new(seed),
            low,
            high,
            scale,
        }
    }

    pub fn with_base(mut self, base: MediumBase) -> Self {
        self.base = base;
        self
    }

    /// Blend factor in `[0, 1]`.
    fn mix(&self, point: DVec3) -> f64 {
        let value = self.noise.get((point * self.scale).to_array());
        (0.5 * (value + 1.0)).clamp(0.0, 1.0)
    }
}

impl Medium for Perlin {
    fn base(&self) -> &MediumBase {
        &self.base
    }

    fn ambient(&self, point: DVec3) -> Color {
        self.diffuse(point) * self.base.ambient_scale
    }

    fn diffuse(&self, point: DVec3) -> Color {
        interpolate(self.high, self.low, self.mix(point))
    }
}

/// Opaque medium with marble-like veins from fractal noise.
#[derive(Debug, Clone)]
pub struct Turbulence {
    base: MediumBase,
    noise: Fbm<Gradient>,
    low: Color,
    high: Color,
    scale: f64,
}

impl Turbulence {
    pub fn new(low: Color, high: Color, scale: f64, octaves: usize, seed: u32) -> Self {
        Self {
            base: MediumBase::new().with_diffuse(low),
            noise: Fbm::<Gradient>::new(seed).set_octaves(octaves.max(1)),
            low,
            high,
            scale,
        }
    }

    pub fn with_base(mut self, base: MediumBase) -> Self {
        self.base = base;
        self
    }

    /// Sum of octaves with the sign folded away.
    fn turbulence(&self, p: DVec3) -> f64 {
        self.noise.get(p.to_array()).abs()
    }

    fn mix(&self, point: DVec3) -> f64 {
        let p = point * self.scale;
        // veins follow z, displaced by the turbulence
        let phase = p.z + 10.0 * self.turbulence(p);
        0.5 * (1.0 + phase.sin())
    }
}

impl Medium for Turbulence {
    fn base(&self) -> &MediumBase {
        &self.base
    }

    fn ambient(&self, point: DVec3) -> Color {
        self.diffuse(point) * self.base.ambient_scale
    }

    fn diffuse(&self, point: DVec3) -> Color {
        interpolate(self.high, self.low, self.mix(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;

    #[test]
    fn test_perlin_on_lattice_is_midway() {
        let medium = Perlin::new(colors::BLACK, colors::WHITE, 1.0, 42);
        // gradient noise vanishes on the lattice, so the colors mix evenly
        let expected = interpolate(colors::WHITE, colors::BLACK, 0.5);
        for p in [DVec3::new(2.0, 3.0, 4.0), DVec3::ZERO, DVec3::splat(-11.0)] {
            assert!((medium.diffuse(p) - expected).length() < 1e-9);
        }
    }

    #[test]
    fn test_perlin_same_seed_same_shading() {
        let a = Perlin::new(colors::BLACK, colors::WHITE, 2.0, 7);
        let b = Perlin::new(colors::BLACK, colors::WHITE, 2.0, 7);
        let p = DVec3::new(0.3, 1.7, -4.2);
        assert_eq!(a.diffuse(p), b.diffuse(p));
    }

    #[test]
    fn test_perlin_within_palette() {
        let medium = Perlin::new(colors::DARK_BLUE, colors::BLUE, 3.0, 42);
        let mut lowest = f64::INFINITY;
        let mut highest = f64::NEG_INFINITY;
        for i in 0..50 {
            let c = medium.diffuse(DVec3::new(i as f64 * 0.173, 0.3, -0.9));
            assert_eq!(c.x, 0.0);
            assert!(c.z >= 0.5 - 1e-9 && c.z <= 1.0 + 1e-9);
            lowest = lowest.min(c.z);
            highest = highest.max(c.z);
        }
        assert!(highest - lowest > 0.01);
    }

    #[test]
    fn test_turbulence_non_negative() {
        let medium = Turbulence::new(colors::BLACK, colors::WHITE, 1.0, 4, 42);
        for i in 0..100 {
            let p = DVec3::new(i as f64 * 0.31, 0.5, -0.7);
            assert!(medium.turbulence(p) >= 0.0);
        }
    }

    #[test]
    fn test_turbulence_within_palette() {
        let medium = Turbulence::new(colors::BLACK, colors::WHITE, 2.0, 4, 42);
        let mut seen_dark = false;
        let mut seen_light = false;
        for i in 0..200 {
            let c = medium.diffuse(DVec3::new(0.2, i as f64 * 0.05, i as f64 * 0.11));
            assert!(c.x >= 0.0 && c.x <= 1.0);
            seen_dark |= c.x < 0.4;
            seen_light |= c.x > 0.6;
        }
        assert!(seen_dark && seen_light);
    }
}
