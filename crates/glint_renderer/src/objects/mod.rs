//! Renderable surfaces.
//!
//! Every surface is defined in its own object space and placed in the world
//! by the [`Entity`] inside its [`ObjectBase`]. The [`Object`] trait's
//! provided methods handle the world/object conversions, so a surface only
//! has to solve for collisions along an object-space ray and describe its
//! normal, texture mapping and size there.

mod cone;
mod cuboid;
mod cylinder;
mod group;
mod overlap;
mod plane;
mod polygon;
mod pyramid;
mod quadratic;
mod ring;
mod sphere;
mod square;
mod torus;
mod triangle;
mod wall;

pub use cone::Cone;
pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use group::Group;
pub use overlap::{Overlap, OverlapKind};
pub use plane::Plane;
pub use polygon::{regular_polygon_points, Polygon};
pub use pyramid::Pyramid;
pub use quadratic::Quadratic;
pub use ring::Ring;
pub use sphere::Sphere;
pub use square::Square;
pub use torus::Torus;
pub use triangle::{Face, Triangle};
pub use wall::Wall;

use std::fmt;
use std::sync::Arc;

use glint_math::{nearly_zero, DMat3, DMat4Ext, DVec2, DVec3, Ray, EPSILON};
use rand::RngCore;

use crate::bounds::Bounds;
use crate::entity::Entity;
use crate::laws;
use crate::mediums::{plains, Medium};
use crate::RaytraceResult;

/// A collision of a world ray with an object.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Parametric distance along the ray.
    pub t: f64,
    /// World-space collision point.
    pub point: DVec3,
    /// Unit world-space surface normal at `point`.
    pub normal: DVec3,
    /// The surface that was hit. For groups this is the member.
    pub object: &'a dyn Object,
}

impl fmt::Debug for Hit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hit")
            .field("t", &self.t)
            .field("point", &self.point)
            .field("normal", &self.normal)
            .finish_non_exhaustive()
    }
}

/// State every object carries.
#[derive(Clone)]
pub struct ObjectBase {
    pub entity: Entity,
    pub medium: Arc<dyn Medium>,
    /// Upper bound on the hits `collisions_along` returns.
    pub max_collisions: usize,
    /// Closed surfaces can never show their inside.
    pub closed: bool,
    /// Divides texture coordinates to tile a texture.
    pub surface_scale: DVec2,
}

impl ObjectBase {
    /// An object at `position` using the dull default medium.
    pub fn new(position: DVec3, max_collisions: usize, closed: bool) -> Self {
        Self {
            entity: Entity::new(position),
            medium: Arc::new(plains::dull()),
            max_collisions,
            // single-collision surfaces can't enclose anything
            closed: max_collisions > 1 && closed,
            surface_scale: DVec2::ONE,
        }
    }
}

impl fmt::Debug for ObjectBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBase")
            .field("entity", &self.entity)
            .field("max_collisions", &self.max_collisions)
            .field("closed", &self.closed)
            .field("surface_scale", &self.surface_scale)
            .finish_non_exhaustive()
    }
}

/// Upcast to a trait object, implemented for every sized [`Object`].
pub trait AsObject {
    fn as_object(&self) -> &dyn Object;
}

impl<T: Object> AsObject for T {
    fn as_object(&self) -> &dyn Object {
        self
    }
}

/// A surface that rays can collide with.
pub trait Object: AsObject + Send + Sync {
    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Every parametric distance at which the infinite line of
    /// `object_ray` meets the surface, in any order. May contain NaN or
    /// negative values; [`Object::intersect`] filters them.
    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64>;

    /// The outward object-space normal at a surface point. May be
    /// unnormalized.
    fn normal_(&self, object_point: DVec3) -> DVec3;

    /// Texture coordinates of an object-space surface point.
    fn map(&self, object_point: DVec3) -> DVec2;

    /// Bounding radius around the object-space origin. Infinite for
    /// unbounded surfaces.
    fn object_extent(&self) -> f64;

    /// True when the object-space point lies on the surface.
    fn is_surface_point_(&self, object_point: DVec3) -> bool;

    fn entity(&self) -> &Entity {
        &self.base().entity
    }

    fn medium(&self) -> &dyn Medium {
        self.base().medium.as_ref()
    }

    fn set_medium(&mut self, medium: Arc<dyn Medium>) {
        self.base_mut().medium = medium;
    }

    fn max_collisions(&self) -> usize {
        self.base().max_collisions
    }

    fn is_closed_surface(&self) -> bool {
        self.base().closed
    }

    fn position(&self) -> DVec3 {
        self.entity().position()
    }

    fn set_position(&mut self, position: DVec3) {
        self.base_mut().entity.set_position(position);
    }

    fn move_by(&mut self, offset: DVec3) {
        self.base_mut().entity.move_by(offset);
    }

    fn set_rotation(&mut self, rotation: DMat3) {
        self.base_mut().entity.set_rotation(rotation);
    }

    fn set_scale(&mut self, scale: DVec3) -> RaytraceResult<()> {
        self.base_mut().entity.set_scale(scale)
    }

    /// Set the rotation from angles about X, Y then Z (radians).
    fn rotate_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.set_rotation(glint_math::rotation_xyz(x, y, z));
    }

    fn is_surface_point(&self, world_point: DVec3) -> bool {
        self.is_surface_point_(self.entity().reverse_transform(world_point))
    }

    /// Unit world-space normal at a world surface point.
    fn normal(&self, world_point: DVec3) -> DVec3 {
        let entity = self.entity();
        entity.forward_normal(self.normal_(entity.reverse_transform(world_point)))
    }

    /// The nearest collision in front of the ray's origin.
    ///
    /// A collision at the origin itself only counts when the ray heads into
    /// an opaque surface.
    fn intersect(&self, world_ray: &Ray) -> Option<Hit<'_>> {
        let entity = self.entity();
        let object_ray = entity.reverse_ray(world_ray);
        let mut closest = f64::INFINITY;
        for t in self.collisions_along(&object_ray) {
            if t.is_nan() {
                continue;
            }
            if nearly_zero(t) {
                let n = self.normal(world_ray.origin);
                if n.dot(world_ray.direction) < 0.0 {
                    let local = entity.reverse_transform(world_ray.origin);
                    if self.medium().refractive_index(local) > 0.0 {
                        continue;
                    }
                    closest = t;
                    break;
                }
            }
            if EPSILON < t && t < closest {
                closest = t;
            }
        }
        if closest.is_infinite() {
            return None;
        }
        let point = entity.forward_transform(object_ray.at(closest));
        Some(Hit {
            t: closest,
            point,
            normal: self.normal(point),
            object: self.as_object(),
        })
    }

    /// World-space box around the object.
    fn world_bounds(&self) -> Bounds {
        let extent = self.object_extent();
        if !extent.is_finite() {
            return Bounds::INFINITE;
        }
        let (min, max) = self
            .entity()
            .transform()
            .transform_corners(DVec3::splat(-extent), DVec3::splat(extent));
        Bounds { min, max }
    }

    /// The mirrored ray leaving `world_point`, jittered by the medium.
    fn reflection(&self, world_ray: &Ray, world_point: DVec3, rng: &mut dyn RngCore) -> Ray {
        let n = self.normal(world_point);
        let mut direction = laws::reflection(n, world_ray.direction.normalize_or_zero());
        let local = self.entity().reverse_transform(world_point);
        direction += self.medium().perturbation(local, rng);
        Ray::new(world_point, direction)
    }

    /// The refracted ray leaving `world_point` when passing from index `n1`
    /// into `n2`. Null on total internal reflection or into an opaque
    /// medium.
    fn refraction(&self, world_ray: &Ray, world_point: DVec3, n1: f64, n2: f64) -> Ray {
        if n1 <= 0.0 || n2 <= 0.0 {
            return Ray::new(world_point, DVec3::ZERO);
        }
        let mut n = self.normal(world_point);
        let incident = world_ray.direction.normalize_or_zero();
        if n.dot(incident) > 0.0 {
            n = -n;
        }
        Ray::new(world_point, laws::snell(n, incident, n1, n2))
    }
}

/// Common half of the flat surfaces: where the object-space ray crosses
/// the `z = 0` plane.
pub(crate) fn plane_crossing(object_ray: &Ray) -> Option<f64> {
    let projection = object_ray.direction.dot(DVec3::Z);
    if nearly_zero(projection) {
        return None;
    }
    Some(-object_ray.origin.dot(DVec3::Z) / projection)
}
