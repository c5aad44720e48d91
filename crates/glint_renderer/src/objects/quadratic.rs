use glint_math::{quadratic_roots, DMat4, DVec2, DVec3, DVec4, Ray};

use crate::mapping;

use super::{Object, ObjectBase};

/// A general quadric surface `p^T Q p = 0` in homogeneous object
/// coordinates.
#[derive(Debug, Clone)]
pub struct Quadratic {
    base: ObjectBase,
    coefficients: DMat4,
    extent: f64,
}

impl Quadratic {
    /// Any 4x4 coefficient matrix. It is symmetrized, which leaves the
    /// surface unchanged. The extent is treated as unbounded.
    pub fn new(center: DVec3, coefficients: DMat4) -> Self {
        Self::with_extent(center, coefficients, f64::INFINITY, false)
    }

    fn with_extent(center: DVec3, coefficients: DMat4, extent: f64, closed: bool) -> Self {
        let symmetric = (coefficients + coefficients.transpose()) * 0.5;
        Self {
            base: ObjectBase::new(center, 2, closed),
            coefficients: symmetric,
            extent,
        }
    }

    /// `x^2/a^2 + y^2/b^2 + z^2/c^2 = 1`
    pub fn ellipsoid(center: DVec3, a: f64, b: f64, c: f64) -> Self {
        let q = DMat4::from_diagonal(DVec4::new(
            (a * a).recip(),
            (b * b).recip(),
            (c * c).recip(),
            -1.0,
        ));
        let extent = a.abs().max(b.abs()).max(c.abs());
        Self::with_extent(center, q, extent, true)
    }

    /// One sheet: `x^2/a^2 + y^2/b^2 - z^2/c^2 = 1`
    pub fn hyperboloid(center: DVec3, a: f64, b: f64, c: f64) -> Self {
        let q = DMat4::from_diagonal(DVec4::new(
            (a * a).recip(),
            (b * b).recip(),
            -(c * c).recip(),
            -1.0,
        ));
        Self::new(center, q)
    }

    /// `x^2/a^2 + y^2/b^2 = z`
    pub fn paraboloid(center: DVec3, a: f64, b: f64) -> Self {
        let mut q = DMat4::from_diagonal(DVec4::new((a * a).recip(), (b * b).recip(), 0.0, 0.0));
        q.z_axis.w = -0.5;
        q.w_axis.z = -0.5;
        Self::new(center, q)
    }

    /// `x^2/a^2 + y^2/b^2 = z^2`
    pub fn elliptical_cone(center: DVec3, a: f64, b: f64) -> Self {
        let q = DMat4::from_diagonal(DVec4::new((a * a).recip(), (b * b).recip(), -1.0, 0.0));
        Self::new(center, q)
    }

    /// `x^2/a^2 + y^2/b^2 = 1`
    pub fn elliptical_cylinder(center: DVec3, a: f64, b: f64) -> Self {
        let q = DMat4::from_diagonal(DVec4::new((a * a).recip(), (b * b).recip(), 0.0, -1.0));
        Self::new(center, q)
    }

    pub fn coefficients(&self) -> &DMat4 {
        &self.coefficients
    }

    fn evaluate(&self, object_point: DVec3) -> f64 {
        let p = object_point.extend(1.0);
        p.dot(self.coefficients * p)
    }
}

impl Object for Quadratic {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let q = &self.coefficients;
        let p = object_ray.origin.extend(1.0);
        let d = object_ray.direction.extend(0.0);
        let a = d.dot(*q * d);
        let b = 2.0 * d.dot(*q * p);
        let c = p.dot(*q * p);
        match quadratic_roots(a, b, c) {
            Some((t0, t1)) => vec![t0, t1],
            None => Vec::new(),
        }
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        let gradient = self.coefficients * object_point.extend(1.0);
        (gradient.truncate() * 2.0).normalize_or_zero()
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        mapping::spherical(object_point)
    }

    fn object_extent(&self) -> f64 {
        self.extent
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        self.evaluate(object_point).abs() < 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_hits_on_surface(surface: &Quadratic, ray: Ray) {
        let hit = surface.intersect(&ray).expect("ray should hit");
        assert!(surface.is_surface_point(hit.point), "{:?}", hit.point);
        assert!((hit.normal.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ellipsoid_hits() {
        let ellipsoid = Quadratic::ellipsoid(DVec3::ZERO, 3.0, 2.0, 1.0);
        let hit = ellipsoid
            .intersect(&Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::NEG_X))
            .unwrap();
        assert!((hit.point - DVec3::new(3.0, 0.0, 0.0)).length() < 1e-9);
        assert!((hit.normal - DVec3::X).length() < 1e-9);

        let hit = ellipsoid
            .intersect(&Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::NEG_Z))
            .unwrap();
        assert!((hit.point - DVec3::Z).length() < 1e-9);

        assert_hits_on_surface(
            &ellipsoid,
            Ray::new(DVec3::new(5.0, 4.0, 3.0), DVec3::new(-5.0, -4.2, -2.9)),
        );
        assert!((ellipsoid.object_extent() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unbounded_family_hits() {
        let down = DVec3::new(0.1, 0.2, -1.0);
        let across = DVec3::new(-1.0, 0.1, 0.05);
        assert_hits_on_surface(
            &Quadratic::hyperboloid(DVec3::ZERO, 1.0, 1.0, 1.0),
            Ray::new(DVec3::new(5.0, 0.0, 0.5), across),
        );
        assert_hits_on_surface(
            &Quadratic::paraboloid(DVec3::ZERO, 1.0, 2.0),
            Ray::new(DVec3::new(0.0, 0.0, 5.0), down),
        );
        assert_hits_on_surface(
            &Quadratic::elliptical_cone(DVec3::ZERO, 1.0, 1.0),
            Ray::new(DVec3::new(5.0, 0.0, 2.0), across),
        );
        assert_hits_on_surface(
            &Quadratic::elliptical_cylinder(DVec3::ZERO, 2.0, 1.0),
            Ray::new(DVec3::new(5.0, 0.0, 7.0), across),
        );
        assert!(Quadratic::paraboloid(DVec3::ZERO, 1.0, 1.0)
            .world_bounds()
            .is_infinite());
    }

    #[test]
    fn test_paraboloid_vertex_normal() {
        let paraboloid = Quadratic::paraboloid(DVec3::new(0.0, 0.0, 1.0), 1.0, 1.0);
        let hit = paraboloid
            .intersect(&Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::NEG_Z))
            .unwrap();
        assert!((hit.point - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-9);
        assert!((hit.normal - DVec3::NEG_Z).length() < 1e-9);
    }

    #[test]
    fn test_symmetrized_matrix() {
        let mut q = DMat4::from_diagonal(DVec4::new(1.0, 1.0, 0.0, 0.0));
        q.w_axis.z = -1.0;
        let surface = Quadratic::new(DVec3::ZERO, q);
        let c = surface.coefficients();
        assert_eq!(c.w_axis.z, c.z_axis.w);
        assert!((c.w_axis.z + 0.5).abs() < 1e-12);
    }
}
