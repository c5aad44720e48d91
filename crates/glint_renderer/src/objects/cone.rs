use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glint_math::{quadratic_roots, DVec2, DVec3, Ray};

use crate::{RaytraceError, RaytraceResult};

use super::{Object, ObjectBase};

/// A right circular cone along Z.
///
/// An infinite cone has its apex at the position and extends both ways. A
/// finite cone has its base circle at the position and its apex `height`
/// above it, with no cap.
#[derive(Debug, Clone)]
pub struct Cone {
    base: ObjectBase,
    height: f64,
    radius: f64,
    /// Squared ratio of height to radius.
    steepness: f64,
    finite: bool,
}

impl Cone {
    /// Infinite double cone with `angle` between the axis and the wall.
    pub fn infinite(apex: DVec3, angle: f64) -> RaytraceResult<Self> {
        if angle <= 0.0 || angle >= FRAC_PI_2 || !angle.is_finite() {
            return Err(RaytraceError::InvalidConeAngle(angle));
        }
        let tan = angle.tan();
        Ok(Self {
            base: ObjectBase::new(apex, 2, true),
            height: 0.0,
            radius: f64::INFINITY,
            steepness: (tan * tan).recip(),
            finite: false,
        })
    }

    pub fn finite(base: DVec3, radius: f64, height: f64) -> RaytraceResult<Self> {
        for dimension in [radius, height] {
            if dimension <= 0.0 || !dimension.is_finite() {
                return Err(RaytraceError::NonPositiveDimension(dimension));
            }
        }
        Ok(Self {
            base: ObjectBase::new(base, 2, false),
            height,
            radius,
            steepness: (height * height) / (radius * radius),
            finite: true,
        })
    }

    pub fn is_finite(&self) -> bool {
        self.finite
    }

    fn within_height(&self, z: f64) -> bool {
        !self.finite || (0.0..=self.height).contains(&z)
    }
}

impl Object for Cone {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let s = self.steepness;
        let h = self.height;
        let DVec3 { x, y, z } = object_ray.origin;
        let DVec3 { x: i, y: j, z: k } = object_ray.direction;
        let a = s * (i * i + j * j) - k * k;
        let b = 2.0 * (s * (i * x + j * y) - k * (z - h));
        let c = s * (x * x + y * y) - (z - h) * (z - h);
        match quadratic_roots(a, b, c) {
            Some((t0, t1)) => [t0, t1]
                .into_iter()
                .filter(|t| self.within_height(object_ray.at(*t).z))
                .collect(),
            None => Vec::new(),
        }
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        let s = self.steepness;
        let DVec3 { x, y, z } = object_point;
        DVec3::new(s * x, s * y, self.height - z).normalize_or_zero()
    }

    /// Angle around the axis, then height.
    fn map(&self, object_point: DVec3) -> DVec2 {
        let theta = object_point.y.atan2(object_point.x);
        let u = (theta + PI) / TAU;
        let v = if self.finite {
            object_point.z / self.height
        } else {
            object_point.z
        };
        DVec2::new(u, v) / self.base.surface_scale
    }

    fn object_extent(&self) -> f64 {
        if self.finite {
            self.height.hypot(self.radius)
        } else {
            f64::INFINITY
        }
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        let DVec3 { x, y, z } = object_point;
        let h = self.height;
        let value = self.steepness * (x * x + y * y) - (z - h) * (z - h);
        self.within_height(z) && value.abs() < 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_rejects_bad_shapes() {
        assert!(Cone::infinite(DVec3::ZERO, FRAC_PI_2).is_err());
        assert!(Cone::infinite(DVec3::ZERO, 0.0).is_err());
        assert_eq!(
            Cone::finite(DVec3::ZERO, 1.0, -2.0).unwrap_err(),
            RaytraceError::NonPositiveDimension(-2.0)
        );
    }

    #[test]
    fn test_finite_cone_hits() {
        let cone = Cone::finite(DVec3::ZERO, 1.0, 2.0).unwrap();
        // halfway up the radius is halved
        let hit = cone
            .intersect(&Ray::new(DVec3::new(5.0, 0.0, 1.0), DVec3::NEG_X))
            .unwrap();
        assert!((hit.point - DVec3::new(0.5, 0.0, 1.0)).length() < 1e-9);
        assert!(cone.is_surface_point(hit.point));
        assert!(hit.normal.x > 0.0 && hit.normal.z > 0.0);

        // the mirrored nappe above the apex is cut away
        assert!(cone
            .intersect(&Ray::new(DVec3::new(5.0, 0.0, 3.0), DVec3::NEG_X))
            .is_none());
        assert!((cone.object_extent() - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_infinite_cone_hits() {
        let cone = Cone::infinite(DVec3::ZERO, PI / 4.0).unwrap();
        for z in [-3.0, 2.0] {
            let hit = cone
                .intersect(&Ray::new(DVec3::new(10.0, 0.0, z), DVec3::NEG_X))
                .unwrap();
            assert!((hit.point - DVec3::new(z.abs(), 0.0, z)).length() < 1e-9);
            assert!(cone.is_surface_point(hit.point));
        }
        assert!(cone.world_bounds().is_infinite());
    }
}
