use std::fmt;

use glint_math::{DMat3, DVec2, DVec3, Ray};

use crate::bounds::Bounds;
use crate::{RaytraceError, RaytraceResult};

use super::{Hit, Object, ObjectBase};

/// A set of objects moved, rotated and scaled as one.
///
/// Members keep their own world placement. The group's position is the
/// pivot for its rotation and scale, and moving the group carries every
/// member along.
pub struct Group {
    base: ObjectBase,
    scale: DVec3,
    members: Vec<Box<dyn Object>>,
}

impl Group {
    pub fn new(position: DVec3) -> Self {
        Self {
            base: ObjectBase::new(position, 0, false),
            scale: DVec3::ONE,
            members: Vec::new(),
        }
    }

    /// Adds a member at its current world placement.
    pub fn add(&mut self, object: Box<dyn Object>) {
        self.base.max_collisions += object.max_collisions();
        self.members.push(object);
    }

    pub fn members(&self) -> &[Box<dyn Object>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn member_at(&self, world_point: DVec3) -> Option<&dyn Object> {
        self.members
            .iter()
            .find(|member| member.is_surface_point(world_point))
            .map(|member| member.as_ref())
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("base", &self.base)
            .field("scale", &self.scale)
            .field("members", &self.members.len())
            .finish()
    }
}

impl Object for Group {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let world_ray = self.entity().forward_ray(object_ray);
        self.members
            .iter()
            .flat_map(|member| member.collisions_along(&member.entity().reverse_ray(&world_ray)))
            .collect()
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        let entity = self.entity();
        let world_normal = self.normal(entity.forward_transform(object_point));
        entity.reverse_vector(world_normal)
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        let world_point = self.entity().forward_transform(object_point);
        match self.member_at(world_point) {
            Some(member) => member.map(member.entity().reverse_transform(world_point)),
            None => DVec2::ZERO,
        }
    }

    fn object_extent(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let bounds = self.world_bounds();
        if bounds.is_infinite() {
            return f64::INFINITY;
        }
        let offset = (bounds.center() - self.position()).length();
        offset + (bounds.max - bounds.min).length() * 0.5
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        let world_point = self.entity().forward_transform(object_point);
        self.member_at(world_point).is_some()
    }

    fn normal(&self, world_point: DVec3) -> DVec3 {
        match self.member_at(world_point) {
            Some(member) => member.normal(world_point),
            None => DVec3::ZERO,
        }
    }

    fn intersect(&self, world_ray: &Ray) -> Option<Hit<'_>> {
        self.members
            .iter()
            .filter_map(|member| member.intersect(world_ray))
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    fn world_bounds(&self) -> Bounds {
        let mut bounds = Bounds::UNSET;
        for member in &self.members {
            bounds.grow(&member.world_bounds());
        }
        bounds
    }

    fn set_position(&mut self, position: DVec3) {
        let offset = position - self.position();
        self.move_by(offset);
    }

    fn move_by(&mut self, offset: DVec3) {
        self.base.entity.move_by(offset);
        for member in &mut self.members {
            member.move_by(offset);
        }
    }

    /// Replaces the group rotation. Members turn about the group position
    /// by the change from the previous rotation.
    fn set_rotation(&mut self, rotation: DMat3) {
        let pivot = self.position();
        let delta = rotation * self.entity().rotation().transpose();
        for member in &mut self.members {
            let offset = member.position() - pivot;
            member.set_position(pivot + delta * offset);
            let turned = delta * member.entity().rotation();
            member.set_rotation(turned);
        }
        self.base.entity.set_rotation(rotation);
    }

    /// Replaces the group scale. Member offsets from the group position and
    /// member sizes change by the ratio to the previous scale, along the
    /// group's own axes.
    fn set_scale(&mut self, scale: DVec3) -> RaytraceResult<()> {
        let usable = |s: DVec3| s.is_finite() && !s.cmpeq(DVec3::ZERO).any();
        if !usable(scale) {
            return Err(RaytraceError::ZeroScale(scale.to_array()));
        }
        let ratio = scale / self.scale;
        // every member must accept its new scale before any of them moves
        if let Some(resized) = self
            .members
            .iter()
            .map(|member| member.entity().scale() * ratio)
            .find(|resized| !usable(*resized))
        {
            return Err(RaytraceError::ZeroScale(resized.to_array()));
        }
        let pivot = self.position();
        let rotation = self.entity().rotation();
        for member in &mut self.members {
            let local = rotation.transpose() * (member.position() - pivot);
            member.set_position(pivot + rotation * (local * ratio));
            let resized = member.entity().scale() * ratio;
            member.set_scale(resized)?;
        }
        self.scale = scale;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Plane, Sphere};
    use std::f64::consts::FRAC_PI_2;

    fn pair() -> Group {
        let mut group = Group::new(DVec3::ZERO);
        group.add(Box::new(Sphere::new(DVec3::new(2.0, 0.0, 0.0), 1.0).unwrap()));
        group.add(Box::new(Sphere::new(DVec3::new(-2.0, 0.0, 0.0), 0.5).unwrap()));
        group
    }

    #[test]
    fn test_group_nearest_member_hit() {
        let group = pair();
        assert_eq!(group.max_collisions(), 4);

        let ray = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::NEG_X);
        let hit = group.intersect(&ray).unwrap();
        assert!((hit.point - DVec3::new(3.0, 0.0, 0.0)).length() < 1e-9);
        assert!((hit.normal - DVec3::X).length() < 1e-9);
        assert!((hit.object.position() - DVec3::new(2.0, 0.0, 0.0)).length() < 1e-12);

        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::X);
        let hit = group.intersect(&ray).unwrap();
        assert!((hit.point - DVec3::new(-2.5, 0.0, 0.0)).length() < 1e-9);
        assert_eq!(group.collisions_along(&ray).len(), 4);
    }

    #[test]
    fn test_group_move_carries_members() {
        let mut group = pair();
        group.set_position(DVec3::new(0.0, 0.0, 5.0));
        assert!((group.members()[0].position() - DVec3::new(2.0, 0.0, 5.0)).length() < 1e-12);
        group.move_by(DVec3::new(1.0, 0.0, 0.0));
        assert!((group.members()[1].position() - DVec3::new(-1.0, 0.0, 5.0)).length() < 1e-12);
        assert!((group.position() - DVec3::new(1.0, 0.0, 5.0)).length() < 1e-12);
    }

    #[test]
    fn test_group_rotation_is_about_position() {
        let mut group = pair();
        group.rotate_xyz(0.0, 0.0, FRAC_PI_2);
        assert!((group.members()[0].position() - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-9);
        assert!((group.members()[1].position() - DVec3::new(0.0, -2.0, 0.0)).length() < 1e-9);

        // setting the same rotation again changes nothing
        group.rotate_xyz(0.0, 0.0, FRAC_PI_2);
        assert!((group.members()[0].position() - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-9);

        let ray = Ray::new(DVec3::new(0.0, 10.0, 0.0), DVec3::NEG_Y);
        let hit = group.intersect(&ray).unwrap();
        assert!((hit.point - DVec3::new(0.0, 3.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_group_scale_spreads_members() {
        let mut group = pair();
        group.set_scale(DVec3::splat(2.0)).unwrap();
        assert!((group.members()[0].position() - DVec3::new(4.0, 0.0, 0.0)).length() < 1e-9);

        let ray = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::NEG_X);
        let hit = group.intersect(&ray).unwrap();
        assert!((hit.point - DVec3::new(6.0, 0.0, 0.0)).length() < 1e-9);

        assert!(group.set_scale(DVec3::new(1.0, 0.0, 1.0)).is_err());
    }

    #[test]
    fn test_group_failed_scale_leaves_members_alone() {
        let mut group = pair();
        group.members[1].set_scale(DVec3::splat(1e-200)).unwrap();
        let positions: Vec<DVec3> = group.members().iter().map(|m| m.position()).collect();

        // the second member's scale underflows to zero
        assert_eq!(
            group.set_scale(DVec3::splat(1e-200)).unwrap_err(),
            RaytraceError::ZeroScale([0.0; 3])
        );
        assert!(group.set_scale(DVec3::splat(f64::INFINITY)).is_err());
        assert!(group.set_scale(DVec3::new(1.0, f64::NAN, 1.0)).is_err());

        for (member, before) in group.members().iter().zip(&positions) {
            assert_eq!(member.position(), *before);
        }
        assert_eq!(group.members()[0].entity().scale(), DVec3::ONE);
        assert_eq!(group.members()[1].entity().scale(), DVec3::splat(1e-200));
        assert_eq!(group.scale, DVec3::ONE);
    }

    #[test]
    fn test_group_bounds() {
        let group = pair();
        let bounds = group.world_bounds();
        assert!((bounds.min - DVec3::new(-2.5, -1.0, -1.0)).length() < 1e-9);
        assert!((bounds.max - DVec3::new(3.0, 1.0, 1.0)).length() < 1e-9);

        let mut group = pair();
        group.add(Box::new(Plane::new(DVec3::new(0.0, 0.0, -1.0))));
        assert!(group.world_bounds().is_infinite());
        assert!(group.object_extent().is_infinite());
    }
}
