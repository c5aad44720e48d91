use glint_math::{DVec3, Ray};
use rand::RngCore;

use crate::color::Color;
use crate::RaytraceResult;

use super::{random_direction, Emission, Light, LightBase};

/// An infinitely small point light. Casts hard shadows.
#[derive(Debug, Clone)]
pub struct Speck {
    base: LightBase,
}

impl Speck {
    pub fn new(position: DVec3, color: Color, intensity: f64) -> RaytraceResult<Self> {
        Ok(Self {
            base: LightBase::new(position, color, intensity, 1)?,
        })
    }
}

impl Light for Speck {
    fn base(&self) -> &LightBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LightBase {
        &mut self.base
    }

    fn incident(&self, world_point: DVec3, _sample_index: usize) -> Ray {
        Ray::new(world_point, self.position() - world_point)
    }

    fn emit(&self, rng: &mut dyn RngCore) -> Emission {
        Emission::Ray(Ray::new(self.position(), random_direction(rng)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;

    #[test]
    fn test_speck_incident_reaches_light_at_one() {
        let speck = Speck::new(DVec3::new(1.0, 2.0, 3.0), colors::WHITE, 1.0).unwrap();
        assert_eq!(speck.number_of_samples(), 1);
        let ray = speck.incident(DVec3::new(-1.0, 0.0, 0.0), 0);
        assert!((ray.at(1.0) - speck.position()).length() < 1e-12);
    }
}
