use glint_math::{DVec3, Ray};
use rand::RngCore;

use crate::color::Color;
use crate::{RaytraceError, RaytraceResult};

use super::{random_direction, Emission, Light, LightBase};

/// Emission draws this many candidate directions before giving up.
const EMIT_ATTEMPTS: usize = 256;

/// A point light shining into a cone around its facing direction.
#[derive(Debug, Clone)]
pub struct Spot {
    base: LightBase,
    direction: DVec3,
    /// Half-angle of the cone in radians.
    angle: f64,
}

impl Spot {
    /// A spot at `beam.origin` facing `beam.direction`, lighting points
    /// within `angle_degrees` of that direction.
    pub fn new(beam: Ray, color: Color, intensity: f64, angle_degrees: f64) -> RaytraceResult<Self> {
        if angle_degrees <= 0.0 || angle_degrees.is_nan() {
            return Err(RaytraceError::NonPositiveSpotAngle(angle_degrees));
        }
        let direction = beam.direction.normalize_or_zero();
        if direction == DVec3::ZERO {
            return Err(RaytraceError::ZeroDirection(beam.direction.to_array()));
        }
        Ok(Self {
            base: LightBase::new(beam.origin, color, intensity, 1)?,
            direction,
            angle: angle_degrees.to_radians(),
        })
    }

    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// True when `direction` leaves the light inside the cone.
    fn within_cone(&self, direction: DVec3) -> bool {
        let cosine = self.direction.dot(direction.normalize_or_zero());
        cosine.clamp(-1.0, 1.0).acos() <= self.angle
    }
}

impl Light for Spot {
    fn base(&self) -> &LightBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LightBase {
        &mut self.base
    }

    fn incident(&self, world_point: DVec3, _sample_index: usize) -> Ray {
        Ray::new(world_point, self.position() - world_point)
    }

    /// Rejection-samples directions until one falls inside the cone.
    fn emit(&self, rng: &mut dyn RngCore) -> Emission {
        for _ in 0..EMIT_ATTEMPTS {
            let direction = random_direction(rng);
            if self.within_cone(direction) {
                return Emission::Ray(Ray::new(self.position(), direction));
            }
        }
        log::warn!(
            "Spot light at {:?} found no direction within {:.3} degrees after {} attempts",
            self.position(),
            self.angle.to_degrees(),
            EMIT_ATTEMPTS
        );
        Emission::Exhausted
    }

    /// Zero outside the cone.
    fn intensity_at(&self, world_point: DVec3) -> f64 {
        let offset = world_point - self.position();
        if offset.length_squared() > 0.0 && !self.within_cone(offset) {
            return 0.0;
        }
        let base = self.base();
        base.falloff.apply(base.intensity, offset.length())
    }
}
