use std::f64::consts::TAU;

use glint_math::{nearly_zero, DMat3, DQuat, DVec2, DVec3, Ray, EPSILON};

use crate::{RaytraceError, RaytraceResult};

use super::{plane_crossing, Object, ObjectBase};

/// `a . (b x c)`
#[inline]
fn triple(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    DMat3::from_cols(a, b, c).determinant()
}

/// `sides` corners of a regular polygon around `center` in the XY plane,
/// ordered so the face looks along +Z.
pub fn regular_polygon_points(sides: usize, radius: f64, center: DVec3) -> Vec<DVec3> {
    (0..sides)
        .map(|i| {
            let angle = -TAU * i as f64 / sides as f64;
            center + DVec3::new(angle.cos(), angle.sin(), 0.0) * radius
        })
        .collect()
}

/// A single-sided flat convex polygon.
///
/// Object space is centered on the corners' centroid with the face normal
/// `(P0 - P1) x (P2 - P1)` along +Z, as for a triangle.
#[derive(Debug, Clone)]
pub struct Polygon {
    base: ObjectBase,
    points: Vec<DVec3>,
    radius2: f64,
}

impl Polygon {
    pub fn new(points: &[DVec3]) -> RaytraceResult<Self> {
        if points.len() < 3 {
            return Err(RaytraceError::TooFewPoints(points.len()));
        }
        let normal = (points[0] - points[1]).cross(points[2] - points[1]);
        if nearly_zero(normal.length_squared()) || !normal.is_finite() {
            return Err(RaytraceError::DegeneratePolygon);
        }
        let center = points.iter().copied().sum::<DVec3>() / points.len() as f64;
        let rotation = DMat3::from_quat(DQuat::from_rotation_arc(DVec3::Z, normal.normalize()));

        let mut base = ObjectBase::new(center, 1, false);
        base.entity.set_rotation(rotation);

        let local: Vec<DVec3> = points.iter().map(|p| base.entity.reverse_transform(*p)).collect();
        let radius2 = local.iter().map(|p| p.length_squared()).fold(0.0, f64::max);
        let flatness = EPSILON * (1.0 + radius2.sqrt());
        if local.iter().any(|p| p.z.abs() > flatness) {
            return Err(RaytraceError::DegeneratePolygon);
        }
        let points: Vec<DVec3> = local.iter().map(|p| p.truncate().extend(0.0)).collect();
        // convex when every corner turns clockwise about +Z
        let turns_clockwise = (0..points.len()).all(|i| {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            let c = points[(i + 2) % points.len()];
            triple(DVec3::Z, b - a, c - b) <= EPSILON
        });
        if !turns_clockwise {
            return Err(RaytraceError::DegeneratePolygon);
        }
        Ok(Self {
            base,
            points,
            radius2,
        })
    }

    /// A regular polygon in the world XY plane facing +Z.
    pub fn regular(sides: usize, radius: f64, center: DVec3) -> RaytraceResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(RaytraceError::NonPositiveRadius(radius));
        }
        Self::new(&regular_polygon_points(sides, radius, center))
    }

    /// The corners in object space.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Inside-or-on-edge test for a point in the object-space plane.
    pub fn is_contained(&self, object_point: DVec3) -> bool {
        if object_point.length_squared() > self.radius2 + EPSILON {
            return false;
        }
        let n = self.points.len();
        (0..n).all(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            triple(DVec3::Z, object_point - a, b - a) >= -EPSILON
        })
    }
}

impl Object for Polygon {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        if object_ray.direction.z >= 0.0 {
            return Vec::new();
        }
        plane_crossing(object_ray)
            .filter(|t| self.is_contained(object_ray.at(*t)))
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
        self.radius2.sqrt()
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        nearly_zero(object_point.z) && self.is_contained(object_point)
    }
}
