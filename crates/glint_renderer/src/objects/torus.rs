use glint_math::{quartic_roots, DVec2, DVec3, Ray};

use crate::mapping;
use crate::{RaytraceError, RaytraceResult};

use super::{Object, ObjectBase};

/// A ring torus lying in the object-space XY plane.
#[derive(Debug, Clone)]
pub struct Torus {
    base: ObjectBase,
    ring_radius: f64,
    tube_radius: f64,
}

impl Torus {
    /// The tube may not be wider than the ring, which would self-intersect.
    pub fn new(center: DVec3, ring_radius: f64, tube_radius: f64) -> RaytraceResult<Self> {
        if !(ring_radius > 0.0 && ring_radius.is_finite()) {
            return Err(RaytraceError::NonPositiveRadius(ring_radius));
        }
        if !(tube_radius > 0.0) {
            return Err(RaytraceError::NonPositiveRadius(tube_radius));
        }
        if tube_radius > ring_radius {
            return Err(RaytraceError::InvalidTorusRadii {
                ring: ring_radius,
                tube: tube_radius,
            });
        }
        Ok(Self {
            base: ObjectBase::new(center, 4, true),
            ring_radius,
            tube_radius,
        })
    }
}

impl Object for Torus {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let p = object_ray.origin;
        let d = object_ray.direction;
        let s = d.length_squared();

        // closest approach to the center
        let closest = p - d * (p.dot(d) / s);
        let reach = self.ring_radius + self.tube_radius;
        if closest.length_squared() > reach * reach {
            return Vec::new();
        }

        // (|p + td|^2 + R^2 - r^2)^2 = 4R^2((px + t dx)^2 + (py + t dy)^2)
        let rr = self.ring_radius * self.ring_radius;
        let u = p.dot(d);
        let w = p.length_squared() + rr - self.tube_radius * self.tube_radius;
        let planar_a = d.x * d.x + d.y * d.y;
        let planar_b = 2.0 * (p.x * d.x + p.y * d.y);
        let planar_c = p.x * p.x + p.y * p.y;

        let a = s * s;
        let b = 4.0 * s * u;
        let c = 4.0 * u * u + 2.0 * s * w - 4.0 * rr * planar_a;
        let d = 4.0 * u * w - 4.0 * rr * planar_b;
        let e = w * w - 4.0 * rr * planar_c;
        quartic_roots(a, b, c, d, e)
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        let ring_direction = DVec3::new(object_point.x, object_point.y, 0.0).normalize_or_zero();
        (object_point - ring_direction * self.ring_radius).normalize_or_zero()
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        mapping::toroidal(self.ring_radius, object_point)
    }

    fn object_extent(&self) -> f64 {
        self.ring_radius + self.tube_radius
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        let planar = object_point.truncate().length() - self.ring_radius;
        let distance = (planar * planar + object_point.z * object_point.z).sqrt();
        (distance - self.tube_radius).abs() < 1e-6
    }
}
