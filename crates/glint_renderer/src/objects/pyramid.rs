use glint_math::{nearly_equal_within, nearly_zero, DVec2, DVec3, Ray};

use crate::{RaytraceError, RaytraceResult};

use super::{Object, ObjectBase};

/// The four-sided surface `z = h - |x| - |y|` with its peak `height` above
/// the position. The sides extend without limit.
#[derive(Debug, Clone)]
pub struct Pyramid {
    base: ObjectBase,
    height: f64,
}

impl Pyramid {
    pub fn new(base: DVec3, height: f64) -> RaytraceResult<Self> {
        if height <= 0.0 || !height.is_finite() {
            return Err(RaytraceError::NonPositiveDimension(height));
        }
        Ok(Self {
            base: ObjectBase::new(base, 2, false),
            height,
        })
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Object for Pyramid {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    /// Solves `h - a(px + dx t) - b(py + dy t) - (pz + dz t) = 0` for each
    /// choice of the signs `a` and `b`, keeping a root only where the ray
    /// agrees with the signs it assumed.
    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let p = object_ray.origin;
        let d = object_ray.direction;
        let mut ts = Vec::with_capacity(2);
        for (a, b) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            let denominator = a * d.x + b * d.y + d.z;
            if nearly_zero(denominator) {
                continue;
            }
            let t = (self.height - a * p.x - b * p.y - p.z) / denominator;
            let x_positive = p.x + d.x * t > 0.0;
            let y_positive = p.y + d.y * t > 0.0;
            if x_positive == (a > 0.0) && y_positive == (b > 0.0) && t >= 0.0 {
                ts.push(t);
            }
        }
        ts
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        let x = if object_point.x >= 0.0 { 1.0 } else { -1.0 };
        let y = if object_point.y >= 0.0 { 1.0 } else { -1.0 };
        DVec3::new(x, y, 1.0).normalize()
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        object_point.truncate() / self.base.surface_scale
    }

    fn object_extent(&self) -> f64 {
        f64::INFINITY
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        let expected = self.height - object_point.x.abs() - object_point.y.abs();
        nearly_equal_within(object_point.z, expected, 1e-9)
    }
}
