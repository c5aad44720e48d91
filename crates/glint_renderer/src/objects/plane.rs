use glint_math::{nearly_zero, DVec2, DVec3, Ray};

use crate::mapping;

use super::{plane_crossing, Object, ObjectBase};

/// An infinite plane through its position with a +Z object-space normal.
#[derive(Debug, Clone)]
pub struct Plane {
    base: ObjectBase,
}

impl Plane {
    pub fn new(position: DVec3) -> Self {
        Self {
            base: ObjectBase::new(position, 1, false),
        }
    }
}

impl Object for Plane {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        plane_crossing(object_ray).into_iter().collect()
    }

    fn normal_(&self, _object_point: DVec3) -> DVec3 {
        DVec3::Z
    }

    /// Polar coordinates: distance from the center, then the angle as a
    /// fraction of a turn.
    fn map(&self, object_point: DVec3) -> DVec2 {
        mapping::planar_polar(DVec3::Z, DVec3::X, DVec3::ZERO, object_point) / self.base.surface_scale
    }

    fn object_extent(&self) -> f64 {
        f64::INFINITY
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        nearly_zero(object_point.z)
    }
}
