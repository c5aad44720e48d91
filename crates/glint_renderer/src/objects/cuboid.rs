use glint_math::{nearly_zero, DVec2, DVec3, Ray};

use crate::{RaytraceError, RaytraceResult};

use super::{Object, ObjectBase};

/// Slack when deciding whether a face crossing lies within the face.
const FACE_TOLERANCE: f64 = 1e-9;

/// An axis-aligned box in object space, given by its half-widths.
#[derive(Debug, Clone)]
pub struct Cuboid {
    base: ObjectBase,
    half_widths: DVec3,
}

impl Cuboid {
    pub fn new(center: DVec3, x: f64, y: f64, z: f64) -> RaytraceResult<Self> {
        let half_widths = DVec3::new(x, y, z).abs();
        if half_widths.cmpeq(DVec3::ZERO).any() || !half_widths.is_finite() {
            return Err(RaytraceError::ZeroHalfWidth([x, y, z]));
        }
        Ok(Self {
            base: ObjectBase::new(center, 2, true),
            half_widths,
        })
    }

    pub fn half_widths(&self) -> DVec3 {
        self.half_widths
    }

    fn within_face(&self, point: DVec3, axis: usize) -> bool {
        (0..3)
            .filter(|other| *other != axis)
            .all(|other| point[other].abs() <= self.half_widths[other] + FACE_TOLERANCE)
    }

    /// The axis whose face the point is nearest, relative to the size.
    fn dominant_axis(&self, object_point: DVec3) -> usize {
        let relative = object_point.abs() / self.half_widths;
        if relative.x >= relative.y && relative.x >= relative.z {
            0
        } else if relative.y >= relative.z {
            1
        } else {
            2
        }
    }
}

impl Object for Cuboid {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let p = object_ray.origin;
        let d = object_ray.direction;
        let mut near = f64::INFINITY;
        let mut far = f64::NEG_INFINITY;
        for axis in 0..3 {
            if nearly_zero(d[axis]) {
                continue;
            }
            for side in [self.half_widths[axis], -self.half_widths[axis]] {
                let t = (side - p[axis]) / d[axis];
                if self.within_face(object_ray.at(t), axis) {
                    near = near.min(t);
                    far = far.max(t);
                }
            }
        }
        // edges and corners lie on several faces; keep only entry and exit
        if near > far {
            Vec::new()
        } else {
            vec![near, far]
        }
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        let axis = self.dominant_axis(object_point);
        let mut normal = DVec3::ZERO;
        normal[axis] = object_point[axis].signum();
        normal
    }

    /// Each face spans the whole texture, across its two other axes.
    fn map(&self, object_point: DVec3) -> DVec2 {
        let unit = (object_point / self.half_widths + 1.0) * 0.5;
        let uv = match self.dominant_axis(object_point) {
            0 => DVec2::new(unit.y, unit.z),
            1 => DVec2::new(unit.x, unit.z),
            _ => DVec2::new(unit.x, unit.y),
        };
        uv / self.base.surface_scale
    }

    fn object_extent(&self) -> f64 {
        self.half_widths.length()
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        let axis = self.dominant_axis(object_point);
        nearly_zero(object_point[axis].abs() - self.half_widths[axis])
            && self.within_face(object_point, axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_normals() {
        let cuboid = Cuboid::new(DVec3::ZERO, 1.0, 1.0, 1.0).unwrap();
        for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
            assert!((cuboid.normal(axis) - axis).length() < 1e-12);
            assert!((cuboid.normal(-axis) + axis).length() < 1e-12);
        }
    }

    #[test]
    fn test_cuboid_hits_and_misses() {
        let cuboid = Cuboid::new(DVec3::ZERO, 1.0, 1.0, 1.0).unwrap();
        let miss = Ray::new(DVec3::splat(2.0), DVec3::new(1.0, 1.0, 0.0));
        assert!(cuboid.intersect(&miss).is_none());

        let ray = Ray::new(DVec3::new(2.0, 0.75, 0.25), DVec3::NEG_X);
        let hit = cuboid.intersect(&ray).unwrap();
        assert!((hit.point - DVec3::new(1.0, 0.75, 0.25)).length() < 1e-9);
    }

    #[test]
    fn test_cuboid_sweep_top_face() {
        let center = DVec3::new(7.0, 22.0, -19.0);
        let w = 0.5;
        let cuboid = Cuboid::new(center, w, w, w).unwrap();
        let step = 1.0 / 32.0;
        let mut y = -w + step;
        while y < w {
            let mut x = -w + step;
            while x < w {
                let origin = center + DVec3::new(x, y, 2.0 * w);
                let hit = cuboid.intersect(&Ray::new(origin, DVec3::NEG_Z)).unwrap();
                let expected = center + DVec3::new(x, y, w);
                assert!((hit.point - expected).length() < 1e-9, "{} {}", x, y);
                x += step;
            }
            y += step;
        }
    }

    #[test]
    fn test_cuboid_from_its_own_faces() {
        let w = 2.0;
        let cuboid = Cuboid::new(DVec3::ZERO, w, w, w).unwrap();
        for face in [DVec3::X, DVec3::NEG_X, DVec3::Y, DVec3::NEG_Y, DVec3::Z, DVec3::NEG_Z] {
            let point = face * w;
            // leaving the surface finds nothing
            assert!(cuboid.intersect(&Ray::new(point, face)).is_none());
            // heading in hits the starting point
            let hit = cuboid.intersect(&Ray::new(point, -face)).unwrap();
            assert!((hit.point - point).length() < 1e-9);
        }
    }

    #[test]
    fn test_cuboid_corner_to_corner_entry_and_exit() {
        let cuboid = Cuboid::new(DVec3::ZERO, 1.0, 1.0, 1.0).unwrap();
        let ray = Ray::new(DVec3::splat(2.0), DVec3::splat(-1.0));
        let ts = cuboid.collisions_along(&ray);
        assert!(ts.len() <= cuboid.max_collisions());
        assert_eq!(ts.len(), 2);
        assert!((ts[0] - 1.0).abs() < 1e-12);
        assert!((ts[1] - 3.0).abs() < 1e-12);

        // along an edge
        let ray = Ray::new(DVec3::new(3.0, 1.0, 0.0), DVec3::NEG_X);
        let ts = cuboid.collisions_along(&ray);
        assert_eq!(ts.len(), 2);
        assert!((ts[0] - 2.0).abs() < 1e-12 && (ts[1] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_cuboid_rejects_zero_width() {
        assert_eq!(
            Cuboid::new(DVec3::ZERO, 1.0, 0.0, 1.0).unwrap_err(),
            RaytraceError::ZeroHalfWidth([1.0, 0.0, 1.0])
        );
    }

    #[test]
    fn test_cuboid_extent() {
        let cuboid = Cuboid::new(DVec3::ZERO, 1.0, 2.0, 2.0).unwrap();
        assert!((cuboid.object_extent() - 3.0).abs() < 1e-12);
    }
}
