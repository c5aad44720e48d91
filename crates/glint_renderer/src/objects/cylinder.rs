use glint_math::{nearly_equal_within, quadratic_roots, DMat3, DQuat, DVec2, DVec3, Ray};

use crate::mapping;
use crate::{RaytraceError, RaytraceResult};

use super::{Object, ObjectBase};

/// An open tube of `radius` along Z, spanning `half_height` either side of
/// its center. There are no end caps.
#[derive(Debug, Clone)]
pub struct Cylinder {
    base: ObjectBase,
    half_height: f64,
    radius: f64,
}

impl Cylinder {
    pub fn new(center: DVec3, half_height: f64, radius: f64) -> RaytraceResult<Self> {
        if half_height <= 0.0 || !half_height.is_finite() {
            return Err(RaytraceError::NonPositiveDimension(half_height));
        }
        if radius <= 0.0 || !radius.is_finite() {
            return Err(RaytraceError::NonPositiveRadius(radius));
        }
        Ok(Self {
            base: ObjectBase::new(center, 2, false),
            half_height,
            radius,
        })
    }

    /// A tube whose axis runs from `base` to `apex`.
    pub fn between(base: DVec3, apex: DVec3, radius: f64) -> RaytraceResult<Self> {
        let axis = apex - base;
        let mut cylinder = Self::new((base + apex) * 0.5, axis.length() * 0.5, radius)?;
        let rotation = DQuat::from_rotation_arc(DVec3::Z, axis.normalize());
        cylinder.set_rotation(DMat3::from_quat(rotation));
        Ok(cylinder)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn half_height(&self) -> f64 {
        self.half_height
    }
}

impl Object for Cylinder {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let p = object_ray.origin.truncate();
        let d = object_ray.direction.truncate();
        let a = d.length_squared();
        let b = 2.0 * p.dot(d);
        let c = p.length_squared() - self.radius * self.radius;
        match quadratic_roots(a, b, c) {
            Some((t0, t1)) => [t0, t1]
                .into_iter()
                .filter(|t| object_ray.at(*t).z.abs() < self.half_height)
                .collect(),
            None => Vec::new(),
        }
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        DVec3::new(object_point.x, object_point.y, 0.0).normalize_or_zero()
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        mapping::cylindrical(self.half_height, object_point)
    }

    fn object_extent(&self) -> f64 {
        self.half_height.hypot(self.radius)
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        object_point.z.abs() <= self.half_height
            && nearly_equal_within(object_point.truncate().length(), self.radius, 1e-6)
    }
}
