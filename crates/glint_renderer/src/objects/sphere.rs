use glint_math::{nearly_equal_within, quadratic_roots, DVec2, DVec3, Ray};

use crate::mapping;
use crate::{RaytraceError, RaytraceResult};

use super::{Object, ObjectBase};

/// A sphere centered on its position.
#[derive(Debug, Clone)]
pub struct Sphere {
    base: ObjectBase,
    radius: f64,
}

impl Sphere {
    pub fn new(center: DVec3, radius: f64) -> RaytraceResult<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(RaytraceError::NonPositiveRadius(radius));
        }
        Ok(Self {
            base: ObjectBase::new(center, 2, true),
            radius,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Object for Sphere {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let p = object_ray.origin;
        let d = object_ray.direction;
        let a = d.length_squared();
        let b = 2.0 * d.dot(p);
        let c = p.length_squared() - self.radius * self.radius;
        match quadratic_roots(a, b, c) {
            Some((t0, t1)) => vec![t0, t1],
            None => Vec::new(),
        }
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        object_point.normalize_or_zero()
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        mapping::spherical(object_point)
    }

    fn object_extent(&self) -> f64 {
        self.radius
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        nearly_equal_within(object_point.length(), self.radius, 1e-6)
    }
}
