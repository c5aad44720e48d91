use glint_math::{DVec3, Ray};
use rand::RngCore;

use crate::color::Color;
use crate::mapping;
use crate::{RaytraceError, RaytraceResult};

use super::{random_direction, Emission, Light, LightBase};

/// A spherical area light. Sampling sweeps golden-ratio points over its
/// surface, which softens shadow edges.
#[derive(Debug, Clone)]
pub struct Bulb {
    base: LightBase,
    radius: f64,
}

impl Bulb {
    pub fn new(
        position: DVec3,
        radius: f64,
        color: Color,
        intensity: f64,
        samples: usize,
    ) -> RaytraceResult<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(RaytraceError::NonPositiveRadius(radius));
        }
        Ok(Self {
            base: LightBase::new(position, color, intensity, samples)?,
            radius,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Light for Bulb {
    fn base(&self) -> &LightBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LightBase {
        &mut self.base
    }

    fn incident(&self, world_point: DVec3, sample_index: usize) -> Ray {
        let perturb = mapping::golden_ratio_mapper(sample_index, self.base.samples) * self.radius;
        Ray::new(world_point, self.position() - world_point + perturb)
    }

    fn emit(&self, rng: &mut dyn RngCore) -> Emission {
        let direction = random_direction(rng);
        Emission::Ray(Ray::new(self.position() + direction * self.radius, direction))
    }
}
