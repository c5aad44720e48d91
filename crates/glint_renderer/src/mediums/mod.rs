//! Materials.
//!
//! A [`Medium`] answers shading questions about a point inside or on an
//! object: its colors, how smooth it is, how light splits between
//! reflection and transmission, and how it attenuates light passing
//! through it. Shared state lives in [`MediumBase`], which every medium
//! embeds and exposes through [`Medium::base`]; the trait's provided
//! methods read from it, and concrete media override only what differs.

mod emissive;
mod metal;
mod patterned;
mod plain;
mod procedural;
mod transparent;

pub use emissive::Emissive;
pub use metal::{metals, Metal};
pub use patterned::{Pattern, Patterned};
pub use plain::{plains, Plain};
pub use procedural::{Perlin, Turbulence};
pub use transparent::{earth_atmosphere, refractive_index, vacuum, Transparent};

use glint_math::DVec3;
use rand::RngCore;

use crate::color::{colors, Color};
use crate::mapping::Reducer;

/// How light leaving a surface point splits up, as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radiosity {
    pub emitted: f64,
    pub reflected: f64,
    pub transmitted: f64,
}

/// Parameters common to every medium.
#[derive(Clone)]
pub struct MediumBase {
    pub ambient: Color,
    pub ambient_scale: f64,
    pub diffuse: Color,
    pub tightness: f64,
    pub smoothness: f64,
    pub reflectivity: f64,
    pub refractive_index: f64,
    pub mapper: Option<Reducer>,
}

impl MediumBase {
    pub fn new() -> Self {
        Self {
            ambient: colors::BLACK,
            ambient_scale: ambient::NONE,
            diffuse: colors::GREY,
            tightness: 0.0,
            smoothness: smoothness::NONE,
            reflectivity: 0.5,
            refractive_index: 0.0,
            mapper: None,
        }
    }

    pub fn with_ambient(mut self, color: Color, scale: f64) -> Self {
        self.ambient = color;
        self.ambient_scale = scale;
        self
    }

    pub fn with_diffuse(mut self, color: Color) -> Self {
        self.diffuse = color;
        self
    }

    pub fn with_tightness(mut self, tightness: f64) -> Self {
        self.tightness = tightness;
        self
    }

    /// Smoothness is clamped to `[0, 1]`.
    pub fn with_smoothness(mut self, smoothness: f64) -> Self {
        self.smoothness = smoothness.clamp(0.0, 1.0);
        self
    }

    /// Reflectivity is clamped to `[0, 1]`.
    pub fn with_reflectivity(mut self, reflectivity: f64) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    pub fn with_refractive_index(mut self, index: f64) -> Self {
        self.refractive_index = index;
        self
    }

    pub fn with_mapper(mut self, mapper: Reducer) -> Self {
        self.mapper = Some(mapper);
        self
    }
}

impl Default for MediumBase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MediumBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediumBase")
            .field("ambient", &self.ambient)
            .field("ambient_scale", &self.ambient_scale)
            .field("diffuse", &self.diffuse)
            .field("tightness", &self.tightness)
            .field("smoothness", &self.smoothness)
            .field("reflectivity", &self.reflectivity)
            .field("refractive_index", &self.refractive_index)
            .field("mapper", &self.mapper.is_some())
            .finish()
    }
}

/// Shading interface for surfaces and volumes.
///
/// Points handed to these methods are in the owning object's space.
pub trait Medium: Send + Sync {
    fn base(&self) -> &MediumBase;

    /// Light the medium gives off with no light source present.
    fn ambient(&self, _point: DVec3) -> Color {
        let base = self.base();
        base.ambient * base.ambient_scale
    }

    fn diffuse(&self, _point: DVec3) -> Color {
        self.base().diffuse
    }

    /// Highlight for a light of `light_color` where `scaling` is the cosine
    /// between the light and the mirror direction.
    fn specular(&self, point: DVec3, scaling: f64, light_color: Color) -> Color {
        if scaling > 0.0 {
            scaling.powf(self.specular_tightness(point)) * light_color
        } else {
            colors::BLACK
        }
    }

    fn specular_tightness(&self, _point: DVec3) -> f64 {
        self.base().tightness
    }

    fn emissive(&self, _point: DVec3) -> Color {
        colors::BLACK
    }

    /// Tint applied to light arriving from a reflected ray.
    fn bounced(&self, _point: DVec3, incoming: Color) -> Color {
        incoming
    }

    /// 0 is fully diffuse, 1 is a perfect mirror.
    fn smoothness(&self, _point: DVec3) -> f64 {
        self.base().smoothness
    }

    /// Split of light at the surface given the index of the medium the ray
    /// came from and the incident and transmitted angles (radians).
    fn radiosity(
        &self,
        _point: DVec3,
        _refractive_index: f64,
        _incident_angle: f64,
        _transmitted_angle: f64,
    ) -> Radiosity {
        let reflectivity = self.base().reflectivity;
        Radiosity {
            emitted: 0.0,
            reflected: reflectivity,
            transmitted: 1.0 - reflectivity,
        }
    }

    /// Zero for opaque media.
    fn refractive_index(&self, _point: DVec3) -> f64 {
        self.base().refractive_index
    }

    /// Color remaining after traveling `distance` through the medium.
    fn absorbance(&self, _distance: f64, color: Color) -> Color {
        color
    }

    fn mapper(&self) -> Option<&Reducer> {
        self.base().mapper.as_ref()
    }

    /// Offset added to reflected directions. Null unless the surface is
    /// rough.
    fn perturbation(&self, _point: DVec3, _rng: &mut dyn RngCore) -> DVec3 {
        DVec3::ZERO
    }
}

/// How mirror-like a surface is.
pub mod smoothness {
    pub const NONE: f64 = 0.0;
    pub const BARELY: f64 = 0.0625;
    pub const SMALL: f64 = 0.2;
    pub const POLISHED: f64 = 0.7;
    pub const MIRROR: f64 = 0.95;
    pub const PERFECT: f64 = 1.0;
}

/// Ambient light scales.
pub mod ambient {
    pub const NONE: f64 = 0.0;
    pub const DIM: f64 = 0.1;
    pub const GLOWY: f64 = 0.4;
}

/// Specular tightness exponents.
pub mod roughness {
    pub const TIGHT: f64 = 100.0;
    pub const MEDIUM: f64 = 50.0;
    pub const LOOSE: f64 = 20.0;
}
