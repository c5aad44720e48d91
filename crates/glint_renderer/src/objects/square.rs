use glint_math::{nearly_zero, DVec2, DVec3, Ray};

use crate::{RaytraceError, RaytraceResult};

use super::{plane_crossing, Object, ObjectBase};

/// A flat rectangle in the object-space XY plane, facing +Z.
#[derive(Debug, Clone)]
pub struct Square {
    base: ObjectBase,
    half_width: f64,
    half_height: f64,
}

impl Square {
    /// `half_width` spans X and `half_height` spans Y.
    pub fn new(position: DVec3, half_width: f64, half_height: f64) -> RaytraceResult<Self> {
        for dimension in [half_width, half_height] {
            if dimension <= 0.0 || !dimension.is_finite() {
                return Err(RaytraceError::NonPositiveDimension(dimension));
            }
        }
        Ok(Self {
            base: ObjectBase::new(position, 1, false),
            half_width,
            half_height,
        })
    }

    fn contains(&self, object_point: DVec3) -> bool {
        object_point.x.abs() <= self.half_width && object_point.y.abs() <= self.half_height
    }
}

impl Object for Square {
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

    fn map(&self, object_point: DVec3) -> DVec2 {
        object_point.truncate() / self.base.surface_scale
    }

    fn object_extent(&self) -> f64 {
        self.half_width.hypot(self.half_height)
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        nearly_zero(object_point.z) && self.contains(object_point)
    }
}
