use glint_math::{nearly_zero, DMat3, DQuat, DVec2, DVec3, Ray, EPSILON};

use crate::{RaytraceError, RaytraceResult};

use super::{plane_crossing, Object, ObjectBase};

/// `a . (b x c)`
#[inline]
fn triple(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    DMat3::from_cols(a, b, c).determinant()
}

/// A single-sided flat triangle.
///
/// The object space is centered on the centroid with the face normal
/// `(A - B) x (C - B)` along +Z. Only rays arriving against that normal
/// collide.
#[derive(Debug, Clone)]
pub struct Triangle {
    base: ObjectBase,
    points: [DVec3; 3],
    radius2: f64,
}

impl Triangle {
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> RaytraceResult<Self> {
        let normal = (a - b).cross(c - b);
        if nearly_zero(normal.length_squared()) || !normal.is_finite() {
            return Err(RaytraceError::DegenerateTriangle);
        }
        let normal = normal.normalize();
        let center = (a + b + c) / 3.0;
        let rotation = DMat3::from_quat(DQuat::from_rotation_arc(DVec3::Z, normal));

        let mut base = ObjectBase::new(center, 1, false);
        base.entity.set_rotation(rotation);

        let points = [a, b, c].map(|p| base.entity.reverse_transform(p));
        let radius2 = points
            .iter()
            .map(|p| p.length_squared())
            .fold(0.0, f64::max);
        Ok(Self {
            base,
            points,
            radius2,
        })
    }

    /// The corners in object space.
    pub fn points(&self) -> &[DVec3; 3] {
        &self.points
    }

    /// Inside-or-on-edge test for a point in the object-space plane using
    /// scalar triple products against the normal.
    pub fn is_contained(&self, object_point: DVec3) -> bool {
        if object_point.length_squared() > self.radius2 + EPSILON {
            return false;
        }
        let [a, b, c] = self.points;
        let n = DVec3::Z;
        triple(n, object_point - a, b - a) >= -EPSILON
            && triple(n, object_point - b, c - b) >= -EPSILON
            && triple(n, object_point - c, a - c) >= -EPSILON
    }

    /// The same test written with explicit cross products.
    #[cfg(test)]
    fn is_contained_by_cross(&self, object_point: DVec3) -> bool {
        if object_point.length_squared() > self.radius2 + EPSILON {
            return false;
        }
        let [a, b, c] = self.points;
        let n = DVec3::Z;
        n.dot((object_point - a).cross(b - a)) >= -EPSILON
            && n.dot((object_point - b).cross(c - b)) >= -EPSILON
            && n.dot((object_point - c).cross(a - c)) >= -EPSILON
    }

    /// Barycentric weights of an object-space point for corners A, B, C.
    fn barycentric(&self, object_point: DVec3) -> DVec3 {
        let [a, b, c] = self.points;
        let area = triple(DVec3::Z, b - a, c - a);
        if nearly_zero(area) {
            return DVec3::splat(1.0 / 3.0);
        }
        let wa = triple(DVec3::Z, b - object_point, c - object_point) / area;
        let wb = triple(DVec3::Z, c - object_point, a - object_point) / area;
        DVec3::new(wa, wb, 1.0 - wa - wb)
    }
}

impl Object for Triangle {
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

    /// Barycentric weights of B and C.
    fn map(&self, object_point: DVec3) -> DVec2 {
        let w = self.barycentric(object_point);
        DVec2::new(w.y, w.z)
    }

    fn object_extent(&self) -> f64 {
        self.radius2.sqrt()
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        nearly_zero(object_point.z) && self.is_contained(object_point)
    }
}

/// A triangle carrying per-vertex normals and texture coordinates, as read
/// from a mesh.
#[derive(Debug, Clone)]
pub struct Face {
    triangle: Triangle,
    texture_coords: [DVec2; 3],
    normal: DVec3,
}

impl Face {
    /// Texture coordinates default to `(1, 0)`, `(0, 0)` and `(0, 1)` and the
    /// vertex normals to the face normal.
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> RaytraceResult<Self> {
        let triangle = Triangle::new(a, b, c)?;
        Ok(Self {
            triangle,
            texture_coords: [DVec2::new(1.0, 0.0), DVec2::ZERO, DVec2::new(0.0, 1.0)],
            normal: DVec3::Z,
        })
    }

    pub fn with_texture_coords(mut self, coords: [DVec2; 3]) -> Self {
        self.texture_coords = coords;
        self
    }

    /// World-space vertex normals. The face shades with their normalized
    /// sum.
    pub fn with_normals(mut self, normals: [DVec3; 3]) -> Self {
        let sum: DVec3 = normals.iter().copied().sum();
        let object_sum = self.triangle.entity().reverse_vector(sum);
        let normal = object_sum.normalize_or_zero();
        if normal != DVec3::ZERO {
            self.normal = normal;
        }
        self
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }
}

impl Object for Face {
    fn base(&self) -> &ObjectBase {
        &self.triangle.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.triangle.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        self.triangle.collisions_along(object_ray)
    }

    fn normal_(&self, _object_point: DVec3) -> DVec3 {
        self.normal
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        let w = self.triangle.barycentric(object_point);
        let [a, b, c] = self.texture_coords;
        a * w.x + b * w.y + c * w.z
    }

    fn object_extent(&self) -> f64 {
        self.triangle.object_extent()
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        self.triangle.is_surface_point_(object_point)
    }
}
