use glint_math::{nearly_zero, DMat3, DQuat, DVec2, DVec3, Ray};

use crate::{RaytraceError, RaytraceResult};

use super::{Object, ObjectBase};

/// An infinite slab between two parallel planes.
///
/// In object space the faces sit at `z = +-thickness / 2`, so the slab is
/// closed and every crossing line enters and leaves it once.
#[derive(Debug, Clone)]
pub struct Wall {
    base: ObjectBase,
    half_thickness: f64,
}

impl Wall {
    /// A wall centered on `center` whose faces look along `normal` and its
    /// opposite.
    pub fn new(center: DVec3, normal: DVec3, thickness: f64) -> RaytraceResult<Self> {
        if !(thickness > 0.0 && thickness.is_finite()) {
            return Err(RaytraceError::NonPositiveDimension(thickness));
        }
        let facing = normal.normalize_or_zero();
        if facing == DVec3::ZERO {
            return Err(RaytraceError::ZeroDirection(normal.to_array()));
        }
        let mut base = ObjectBase::new(center, 2, true);
        base.entity
            .set_rotation(DMat3::from_quat(DQuat::from_rotation_arc(DVec3::Z, facing)));
        Ok(Self {
            base,
            half_thickness: thickness * 0.5,
        })
    }

    pub fn thickness(&self) -> f64 {
        self.half_thickness * 2.0
    }
}

impl Object for Wall {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let pz = object_ray.origin.z;
        let dz = object_ray.direction.z;
        if nearly_zero(dz) {
            return Vec::new();
        }
        let near = (-self.half_thickness - pz) / dz;
        let far = (self.half_thickness - pz) / dz;
        vec![near.min(far), near.max(far)]
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        DVec3::Z * object_point.z.signum()
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        object_point.truncate() / self.base.surface_scale
    }

    fn object_extent(&self) -> f64 {
        f64::INFINITY
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        nearly_zero(object_point.z.abs() - self.half_thickness)
    }
}
