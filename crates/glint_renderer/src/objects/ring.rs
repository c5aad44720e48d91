use glint_math::{nearly_zero, DVec2, DVec3, Ray};

use crate::mapping;
use crate::{RaytraceError, RaytraceResult};

use super::{plane_crossing, Object, ObjectBase};

/// A flat annulus in the object-space XY plane, facing +Z.
#[derive(Debug, Clone)]
pub struct Ring {
    base: ObjectBase,
    inner: f64,
    outer: f64,
}

impl Ring {
    /// Requires `0 <= inner < outer`.
    pub fn new(position: DVec3, inner: f64, outer: f64) -> RaytraceResult<Self> {
        if inner < 0.0 || inner >= outer || !outer.is_finite() {
            return Err(RaytraceError::InvalidRingRadii { inner, outer });
        }
        Ok(Self {
            base: ObjectBase::new(position, 1, false),
            inner,
            outer,
        })
    }

    fn contains(&self, object_point: DVec3) -> bool {
        let distance2 = object_point.truncate().length_squared();
        self.inner * self.inner <= distance2 && distance2 <= self.outer * self.outer
    }
}

impl Object for Ring {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        plane_crossing(object_ray)
            .filter(|t| self.contains(object_ray.at(*t)))
            .into_iter()
            .collect()
    }

    fn normal_(&self, _object_point: DVec3) -> DVec3 {
        DVec3::Z
    }

    /// Radial position across the band, then the angle as a fraction of a
    /// turn.
    fn map(&self, object_point: DVec3) -> DVec2 {
        let polar = mapping::planar_polar(DVec3::Z, DVec3::X, DVec3::ZERO, object_point);
        let u = (polar.x - self.inner) / (self.outer - self.inner);
        DVec2::new(u, polar.y) / self.base.surface_scale
    }

    fn object_extent(&self) -> f64 {
        self.outer
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        nearly_zero(object_point.z) && self.contains(object_point)
    }
}
