//! Light sources.
//!
//! Every light shares a [`LightBase`] (placement, color, intensity, sample
//! count and falloff). Shadow rays from [`Light::incident`] end at the light
//! when `t == 1`, except for directional lights which have no position.

mod beam;
mod bulb;
mod speck;
mod spot;

pub use beam::Beam;
pub use bulb::Bulb;
pub use speck::Speck;
pub use spot::Spot;

use glint_math::{nearly_zero, DVec3, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::entity::Entity;
use crate::laws;
use crate::mapping;
use crate::{RaytraceError, RaytraceResult};

/// Size of the golden-ratio point set random emission directions come from.
const EMISSION_POINTS: usize = 997;

/// Named intensities.
pub mod intensities {
    pub const DARK: f64 = 0.1;
    pub const DIM: f64 = 0.25;
    pub const MODERATE: f64 = 0.5;
    pub const FULL: f64 = 1.0;
    pub const BRIGHT: f64 = 10.0;
    pub const INTENSE: f64 = 100.0;
    pub const RADIANT: f64 = 1e3;
    pub const BLINDING: f64 = 1e11;
}

/// How intensity drops with distance from the light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Falloff {
    /// Constant at any distance.
    None,
    /// `I / (d + 1)`
    Linear,
    /// `I / d^2`, with full intensity at the light itself.
    #[default]
    InverseSquare,
}

impl Falloff {
    pub fn apply(self, intensity: f64, distance: f64) -> f64 {
        match self {
            Falloff::None => intensity,
            Falloff::Linear => intensity / (distance + 1.0),
            Falloff::InverseSquare if nearly_zero(distance) => intensity,
            Falloff::InverseSquare => intensity * laws::inverse_square(distance),
        }
    }
}

/// A ray given off by a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    Ray(Ray),
    /// No acceptable ray was found within the attempt limit.
    Exhausted,
}

/// State every light carries.
#[derive(Debug, Clone)]
pub struct LightBase {
    pub entity: Entity,
    pub color: Color,
    /// Unscaled intensity, before falloff.
    pub intensity: f64,
    pub samples: usize,
    pub falloff: Falloff,
}

impl LightBase {
    /// A light needs at least one sample.
    pub fn new(position: DVec3, color: Color, intensity: f64, samples: usize) -> RaytraceResult<Self> {
        if samples == 0 {
            return Err(RaytraceError::ZeroSamples);
        }
        Ok(Self {
            entity: Entity::new(position),
            color,
            intensity,
            samples,
            falloff: Falloff::default(),
        })
    }

    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }
}

/// A source of light for shading and shadow tests.
pub trait Light: Send + Sync {
    fn base(&self) -> &LightBase;

    fn base_mut(&mut self) -> &mut LightBase;

    /// The ray from `world_point` back toward the light for sample
    /// `sample_index` in `[0, number_of_samples)`.
    fn incident(&self, world_point: DVec3, sample_index: usize) -> Ray;

    /// A ray leaving the light in a random direction it shines in.
    fn emit(&self, rng: &mut dyn RngCore) -> Emission;

    fn position(&self) -> DVec3 {
        self.base().entity.position()
    }

    fn set_position(&mut self, position: DVec3) {
        self.base_mut().entity.set_position(position);
    }

    fn number_of_samples(&self) -> usize {
        self.base().samples
    }

    fn falloff(&self) -> Falloff {
        self.base().falloff
    }

    fn set_falloff(&mut self, falloff: Falloff) {
        self.base_mut().falloff = falloff;
    }

    /// Lights without a position shadow along the whole incident ray.
    fn is_directional(&self) -> bool {
        false
    }

    /// Intensity reaching `world_point` after falloff.
    fn intensity_at(&self, world_point: DVec3) -> f64 {
        let base = self.base();
        let distance = (self.position() - world_point).length();
        base.falloff.apply(base.intensity, distance)
    }

    fn color_at(&self, world_point: DVec3) -> Color {
        self.base().color * self.intensity_at(world_point)
    }
}

/// A random unit direction from a fixed, evenly spread point set.
pub(crate) fn random_direction(rng: &mut dyn RngCore) -> DVec3 {
    let index = rng.next_u32() as usize % EMISSION_POINTS;
    mapping::golden_ratio_mapper(index, EMISSION_POINTS)
}
