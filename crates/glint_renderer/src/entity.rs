//! Placement of things in the world.
//!
//! An [`Entity`] owns a position, a rotation and a per-axis scale and keeps
//! the composite `T * R * S` matrix and its inverse up to date, so objects,
//! lights and cameras can move between world space and their own space.

use glint_math::{rotation_xyz, DMat3, DMat4, DMat4Ext, DVec3, Ray};

use crate::{RaytraceError, RaytraceResult};

/// Position, rotation and scale with cached forward and reverse transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    position: DVec3,
    rotation: DMat3,
    scale: DVec3,
    transform: DMat4,
    inverse: DMat4,
}

impl Entity {
    /// An unrotated, unscaled entity at `position`.
    pub fn new(position: DVec3) -> Self {
        let mut entity = Self {
            position,
            rotation: DMat3::IDENTITY,
            scale: DVec3::ONE,
            transform: DMat4::IDENTITY,
            inverse: DMat4::IDENTITY,
        };
        entity.update();
        entity
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
        self.update();
    }

    /// Translate by `offset`.
    pub fn move_by(&mut self, offset: DVec3) {
        self.set_position(self.position + offset);
    }

    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: DMat3) {
        self.rotation = rotation;
        self.update();
    }

    /// Set the rotation from angles about X, Y then Z (radians).
    pub fn rotate_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.set_rotation(rotation_xyz(x, y, z));
    }

    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    /// Set the per-axis scale. Zero factors would collapse the space and are
    /// rejected.
    pub fn set_scale(&mut self, scale: DVec3) -> RaytraceResult<()> {
        if scale.x == 0.0 || scale.y == 0.0 || scale.z == 0.0 || !scale.is_finite() {
            return Err(RaytraceError::ZeroScale(scale.to_array()));
        }
        self.scale = scale;
        self.update();
        Ok(())
    }

    /// The object-to-world matrix.
    pub fn transform(&self) -> &DMat4 {
        &self.transform
    }

    /// The world-to-object matrix.
    pub fn inverse(&self) -> &DMat4 {
        &self.inverse
    }

    /// Object-space point to world space.
    #[inline]
    pub fn forward_transform(&self, object_point: DVec3) -> DVec3 {
        self.transform.transform_point3(object_point)
    }

    /// World-space point to object space.
    #[inline]
    pub fn reverse_transform(&self, world_point: DVec3) -> DVec3 {
        self.inverse.transform_point3(world_point)
    }

    /// Object-space direction to world space (rotation and scale only).
    #[inline]
    pub fn forward_vector(&self, object_vector: DVec3) -> DVec3 {
        self.transform.transform_vector3(object_vector)
    }

    /// World-space direction to object space.
    #[inline]
    pub fn reverse_vector(&self, world_vector: DVec3) -> DVec3 {
        self.inverse.transform_vector3(world_vector)
    }

    /// Object-space surface normal to a unit world-space normal.
    #[inline]
    pub fn forward_normal(&self, object_normal: DVec3) -> DVec3 {
        self.transform.transform_normal(object_normal)
    }

    /// Object-space ray to world space. The parameter `t` is preserved.
    pub fn forward_ray(&self, object_ray: &Ray) -> Ray {
        Ray::new(
            self.forward_transform(object_ray.origin),
            self.forward_vector(object_ray.direction),
        )
    }

    /// World-space ray to object space. The parameter `t` is preserved.
    pub fn reverse_ray(&self, world_ray: &Ray) -> Ray {
        Ray::new(
            self.reverse_transform(world_ray.origin),
            self.reverse_vector(world_ray.direction),
        )
    }

    fn update(&mut self) {
        self.transform = DMat4::from_translation(self.position)
            * DMat4::from_mat3(self.rotation)
            * DMat4::from_scale(self.scale);
        self.inverse = self.transform.inverse();
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(DVec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

    #[test]
    fn test_entity_translation() {
        let mut entity = Entity::new(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            entity.forward_transform(DVec3::ZERO),
            DVec3::new(1.0, 2.0, 3.0)
        );

        entity.move_by(DVec3::new(1.0, 1.0, 1.0));
        assert_eq!(entity.position(), DVec3::new(2.0, 3.0, 4.0));
        assert_eq!(entity.reverse_transform(DVec3::new(2.0, 3.0, 4.0)), DVec3::ZERO);

        // translation never touches vectors
        assert_eq!(entity.forward_vector(DVec3::X), DVec3::X);
    }

    #[test]
    fn test_entity_rotation() {
        let mut entity = Entity::default();
        entity.rotate_xyz(0.0, 0.0, FRAC_PI_2);

        let v = entity.forward_vector(DVec3::X);
        assert!((v - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_entity_round_trip() {
        let mut entity = Entity::new(DVec3::new(-3.0, 7.5, 2.0));
        entity.rotate_xyz(FRAC_PI_4, FRAC_PI_3, -FRAC_PI_2);
        entity.set_scale(DVec3::new(2.0, 0.5, 3.0)).unwrap();

        for point in [
            DVec3::ZERO,
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-40.0, 0.01, 17.0),
        ] {
            let back = entity.reverse_transform(entity.forward_transform(point));
            assert!((back - point).length() < 1e-9);

            let back = entity.forward_transform(entity.reverse_transform(point));
            assert!((back - point).length() < 1e-9);
        }
    }

    #[test]
    fn test_entity_ray_parameter_preserved() {
        let mut entity = Entity::new(DVec3::new(0.0, 0.0, 5.0));
        entity.set_scale(DVec3::splat(2.0)).unwrap();

        let world = Ray::new(DVec3::new(1.0, 1.0, 1.0), DVec3::new(0.0, 1.0, 2.0));
        let object = entity.reverse_ray(&world);
        for t in [0.0, 0.5, 3.0] {
            let back = entity.forward_transform(object.at(t));
            assert!((back - world.at(t)).length() < 1e-12);
        }
    }

    #[test]
    fn test_entity_normal_unit_length() {
        let mut entity = Entity::default();
        entity.set_scale(DVec3::new(4.0, 1.0, 0.25)).unwrap();
        let n = entity.forward_normal(DVec3::new(1.0, 1.0, 1.0));
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_entity_zero_scale_rejected() {
        let mut entity = Entity::default();
        assert!(entity.set_scale(DVec3::new(1.0, 0.0, 1.0)).is_err());
        assert_eq!(entity.scale(), DVec3::ONE);
    }
}
