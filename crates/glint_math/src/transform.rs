// Transform utilities for DMat4
//
// glam already provides transform_point3(), transform_vector3() and inverse();
// this adds the pieces the tracer needs for normals and bounding corners.

use glam::{DMat3, DMat4, DVec3};

/// Builds the rotation `Rz * Ry * Rx` from angles in radians.
pub fn rotation_xyz(x: f64, y: f64, z: f64) -> DMat3 {
    DMat3::from_rotation_z(z) * DMat3::from_rotation_y(y) * DMat3::from_rotation_x(x)
}

/// Extension trait for DMat4 to provide additional transform utilities
pub trait DMat4Ext {
    /// The inverse-transpose of the upper 3x3, which carries surface normals
    /// through non-uniform scales.
    fn normal_matrix(&self) -> DMat3;

    /// Transform a surface normal and renormalize it.
    /// Degenerate inputs come back as the zero vector.
    fn transform_normal(&self, normal: DVec3) -> DVec3;

    /// Transform the 8 corners of the box `[min, max]` and return the
    /// component-wise min/max of the results.
    fn transform_corners(&self, min: DVec3, max: DVec3) -> (DVec3, DVec3);
}

impl DMat4Ext for DMat4 {
    fn normal_matrix(&self) -> DMat3 {
        DMat3::from_mat4(*self).inverse().transpose()
    }

    fn transform_normal(&self, normal: DVec3) -> DVec3 {
        (self.normal_matrix() * normal).normalize_or_zero()
    }

    fn transform_corners(&self, min: DVec3, max: DVec3) -> (DVec3, DVec3) {
        let corners = [
            DVec3::new(min.x, min.y, min.z),
            DVec3::new(max.x, min.y, min.z),
            DVec3::new(min.x, max.y, min.z),
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(min.x, min.y, max.z),
            DVec3::new(max.x, min.y, max.z),
            DVec3::new(min.x, max.y, max.z),
            DVec3::new(max.x, max.y, max.z),
        ];

        let mut result_min = DVec3::splat(f64::INFINITY);
        let mut result_max = DVec3::splat(f64::NEG_INFINITY);
        for corner in corners {
            let transformed = self.transform_point3(corner);
            result_min = result_min.min(transformed);
            result_max = result_max.max(transformed);
        }
        (result_min, result_max)
    }
}
