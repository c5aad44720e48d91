use glint_math::{DVec3, Ray};
use rand::RngCore;

use crate::color::Color;
use crate::RaytraceResult;

use super::{Emission, Falloff, Light, LightBase};

/// Parallel light from an infinitely distant source, like sunlight.
#[derive(Debug, Clone)]
pub struct Beam {
    base: LightBase,
    direction: DVec3,
}

impl Beam {
    /// Light traveling along `direction`.
    pub fn new(direction: DVec3, color: Color, intensity: f64) -> RaytraceResult<Self> {
        let base = LightBase::new(DVec3::ZERO, color, intensity, 1)?.with_falloff(Falloff::None);
        Ok(Self {
            base,
            direction: direction.normalize_or_zero(),
        })
    }

    pub fn direction(&self) -> DVec3 {
        self.direction
    }
}

impl Light for Beam {
    fn base(&self) -> &LightBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LightBase {
        &mut self.base
    }

    fn incident(&self, world_point: DVec3, _sample_index: usize) -> Ray {
        Ray::new(world_point, -self.direction)
    }

    fn emit(&self, _rng: &mut dyn RngCore) -> Emission {
        Emission::Ray(Ray::new(self.position(), self.direction))
    }

    fn is_directional(&self) -> bool {
        true
    }
}
