use std::fmt;

use glint_math::{nearly_equal, DVec2, DVec3, Ray, EPSILON};

use crate::{RaytraceError, RaytraceResult};

use super::{Object, ObjectBase};

/// How the solids of two closed surfaces combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// Everything inside either.
    Additive,
    /// Inside the first but not the second.
    Subtractive,
    /// Inside both.
    Inclusive,
    /// Inside exactly one.
    Exclusive,
}

impl OverlapKind {
    fn keeps(self, in_a: bool, in_b: bool) -> bool {
        match self {
            OverlapKind::Additive => in_a || in_b,
            OverlapKind::Subtractive => in_a && !in_b,
            OverlapKind::Inclusive => in_a && in_b,
            OverlapKind::Exclusive => in_a != in_b,
        }
    }
}

/// Skewed so the parity ray rarely runs along an edge or a seam.
const PARITY_DIRECTION: DVec3 = DVec3::new(0.5773, 0.3141, 0.7539);

/// Constructive solid made of two closed surfaces.
///
/// Both members live in the overlap's object space: their own placement is
/// relative to the overlap, and moving the overlap carries them along.
pub struct Overlap {
    base: ObjectBase,
    a: Box<dyn Object>,
    b: Box<dyn Object>,
    kind: OverlapKind,
}

impl Overlap {
    pub fn new(
        position: DVec3,
        a: Box<dyn Object>,
        b: Box<dyn Object>,
        kind: OverlapKind,
    ) -> RaytraceResult<Self> {
        if !a.is_closed_surface() || !b.is_closed_surface() {
            return Err(RaytraceError::OpenOverlapMember);
        }
        let max_collisions = a.max_collisions() + b.max_collisions();
        Ok(Self {
            base: ObjectBase::new(position, max_collisions, true),
            a,
            b,
            kind,
        })
    }

    pub fn kind(&self) -> OverlapKind {
        self.kind
    }

    pub fn members(&self) -> (&dyn Object, &dyn Object) {
        (self.a.as_ref(), self.b.as_ref())
    }

    /// Collisions of a member along an overlap-space ray, sorted.
    fn crossings(member: &dyn Object, object_ray: &Ray) -> Vec<f64> {
        let mut ts: Vec<f64> = member
            .collisions_along(&member.entity().reverse_ray(object_ray))
            .into_iter()
            .filter(|t| !t.is_nan())
            .collect();
        ts.sort_by(|a, b| a.total_cmp(b));
        ts
    }

    /// True when an overlap-space point is inside the member's solid,
    /// counting crossings of a ray leaving the point.
    fn encloses(member: &dyn Object, object_point: DVec3) -> bool {
        let ray = Ray::new(object_point, PARITY_DIRECTION);
        let ahead = Self::crossings(member, &ray)
            .into_iter()
            .filter(|t| *t > EPSILON)
            .count();
        ahead % 2 == 1
    }

    /// The member whose surface holds the point, preferring the first.
    fn surface_at(&self, object_point: DVec3) -> Option<(&dyn Object, &dyn Object, bool)> {
        if self.a.is_surface_point(object_point) {
            Some((self.a.as_ref(), self.b.as_ref(), false))
        } else if self.b.is_surface_point(object_point) {
            Some((self.b.as_ref(), self.a.as_ref(), true))
        } else {
            None
        }
    }
}

/// Pairs sorted crossings into inside spans. A trailing unpaired crossing
/// is a tangent and is dropped.
fn spans(ts: &[f64]) -> Vec<(f64, f64)> {
    ts.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

fn within(spans: &[(f64, f64)], t: f64) -> bool {
    spans.iter().any(|(enter, leave)| *enter <= t && t <= *leave)
}

impl fmt::Debug for Overlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlap")
            .field("base", &self.base)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Object for Overlap {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    /// The crossings where the ray moves between kept and discarded solid.
    fn collisions_along(&self, object_ray: &Ray) -> Vec<f64> {
        let a_ts = Self::crossings(self.a.as_ref(), object_ray);
        let b_ts = Self::crossings(self.b.as_ref(), object_ray);
        let (a_spans, b_spans) = (spans(&a_ts), spans(&b_ts));

        let mut candidates: Vec<f64> = a_ts.iter().chain(b_ts.iter()).copied().collect();
        candidates.sort_by(|a, b| a.total_cmp(b));
        candidates.dedup_by(|later, earlier| nearly_equal(*later, *earlier));

        let kept = |t: f64| self.kind.keeps(within(&a_spans, t), within(&b_spans, t));
        let mut boundaries = Vec::new();
        // both solids are bounded, so the line starts outside
        let mut before = false;
        for (i, t) in candidates.iter().enumerate() {
            let after = match candidates.get(i + 1) {
                Some(next) => kept(0.5 * (t + next)),
                None => false,
            };
            if after != before {
                boundaries.push(*t);
            }
            before = after;
        }
        boundaries
    }

    fn normal_(&self, object_point: DVec3) -> DVec3 {
        let Some((surface, other, is_b)) = self.surface_at(object_point) else {
            return DVec3::ZERO;
        };
        let normal = surface.normal(object_point);
        let flip = match self.kind {
            OverlapKind::Additive | OverlapKind::Inclusive => false,
            OverlapKind::Subtractive => is_b,
            OverlapKind::Exclusive => Self::encloses(other, object_point),
        };
        if flip {
            -normal
        } else {
            normal
        }
    }

    fn map(&self, object_point: DVec3) -> DVec2 {
        match self.surface_at(object_point) {
            Some((surface, _, _)) => {
                let local = surface.entity().reverse_transform(object_point);
                surface.map(local) / self.base.surface_scale
            }
            None => DVec2::ZERO,
        }
    }

    fn object_extent(&self) -> f64 {
        [&self.a, &self.b]
            .iter()
            .map(|member| {
                let bounds = member.world_bounds();
                if bounds.is_infinite() {
                    return f64::INFINITY;
                }
                bounds.min.abs().max(bounds.max.abs()).length()
            })
            .fold(0.0, f64::max)
    }

    fn is_surface_point_(&self, object_point: DVec3) -> bool {
        let on_a = self.a.is_surface_point(object_point);
        let on_b = self.b.is_surface_point(object_point);
        if !on_a && !on_b {
            return false;
        }
        let in_a = on_a || Self::encloses(self.a.as_ref(), object_point);
        let in_b = on_b || Self::encloses(self.b.as_ref(), object_point);
        match self.kind {
            OverlapKind::Additive => (on_a && !in_b) || (on_b && !in_a) || (on_a && on_b),
            OverlapKind::Subtractive => (on_a && !in_b) || (on_b && in_a),
            OverlapKind::Inclusive => in_a && in_b,
            OverlapKind::Exclusive => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Cuboid, Plane, Sphere};

    fn spheres(kind: OverlapKind) -> Overlap {
        let a = Sphere::new(DVec3::new(-0.5, 0.0, 0.0), 1.0).unwrap();
        let b = Sphere::new(DVec3::new(0.5, 0.0, 0.0), 1.0).unwrap();
        Overlap::new(DVec3::ZERO, Box::new(a), Box::new(b), kind).unwrap()
    }

    fn along_x(overlap: &Overlap) -> Vec<f64> {
        // starts at x = -5
        overlap.collisions_along(&Ray::new(DVec3::new(-5.0, 0.0, 0.0), DVec3::X))
    }

    fn assert_ts(ts: &[f64], expected: &[f64]) {
        assert_eq!(ts.len(), expected.len(), "{:?}", ts);
        for (t, want) in ts.iter().zip(expected) {
            assert!((t - want).abs() < 1e-9, "{:?} != {:?}", ts, expected);
        }
    }

    #[test]
    fn test_overlap_kinds_along_axis() {
        // a spans x in [-1.5, 0.5], b spans [-0.5, 1.5]
        assert_ts(&along_x(&spheres(OverlapKind::Additive)), &[3.5, 6.5]);
        assert_ts(&along_x(&spheres(OverlapKind::Subtractive)), &[3.5, 4.5]);
        assert_ts(&along_x(&spheres(OverlapKind::Inclusive)), &[4.5, 5.5]);
        assert_ts(&along_x(&spheres(OverlapKind::Exclusive)), &[3.5, 4.5, 5.5, 6.5]);
    }

    #[test]
    fn test_overlap_collisions_within_max() {
        for kind in [
            OverlapKind::Additive,
            OverlapKind::Subtractive,
            OverlapKind::Inclusive,
            OverlapKind::Exclusive,
        ] {
            let overlap = spheres(kind);
            assert!(along_x(&overlap).len() <= overlap.max_collisions());
        }
    }

    #[test]
    fn test_overlap_disjoint_members() {
        let a = Sphere::new(DVec3::new(-3.0, 0.0, 0.0), 1.0).unwrap();
        let b = Cuboid::new(DVec3::new(3.0, 0.0, 0.0), 1.0, 1.0, 1.0).unwrap();
        let union = Overlap::new(
            DVec3::ZERO,
            Box::new(a.clone()),
            Box::new(b.clone()),
            OverlapKind::Additive,
        )
        .unwrap();
        assert_ts(&along_x(&union), &[1.0, 3.0, 7.0, 9.0]);

        let both =
            Overlap::new(DVec3::ZERO, Box::new(a), Box::new(b), OverlapKind::Inclusive).unwrap();
        assert!(along_x(&both).is_empty());
        assert!(both.intersect(&Ray::new(DVec3::new(-5.0, 0.0, 0.0), DVec3::X)).is_none());
    }

    #[test]
    fn test_overlap_subtractive_hollow_normal() {
        let overlap = spheres(OverlapKind::Subtractive);
        // from +x the first kept surface is b's wall, facing back toward +x
        let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), DVec3::NEG_X);
        let hit = overlap.intersect(&ray).unwrap();
        assert!((hit.point - DVec3::new(-0.5, 0.0, 0.0)).length() < 1e-9);
        assert!((hit.normal - DVec3::X).length() < 1e-9);
        assert!(overlap.is_surface_point(hit.point));
        // a's wall inside b is gone
        assert!(!overlap.is_surface_point(DVec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_overlap_exclusive_normals_face_out_of_solid() {
        let overlap = spheres(OverlapKind::Exclusive);
        // b's wall at x = -0.5 lies inside a; the solid is on the -x side
        let n = overlap.normal(DVec3::new(-0.5, 0.0, 0.0));
        assert!((n - DVec3::X).length() < 1e-9);
        // a's outer wall
        let n = overlap.normal(DVec3::new(-1.5, 0.0, 0.0));
        assert!((n - DVec3::NEG_X).length() < 1e-9);
    }

    #[test]
    fn test_overlap_moves_members_along() {
        let mut overlap = spheres(OverlapKind::Inclusive);
        overlap.set_position(DVec3::new(0.0, 0.0, 10.0));
        let ray = Ray::new(DVec3::new(0.0, 0.0, 20.0), DVec3::NEG_Z);
        let hit = overlap.intersect(&ray).unwrap();
        // the lens of the two spheres peaks at sqrt(0.75)
        assert!((hit.point.z - (10.0 + 0.75f64.sqrt())).abs() < 1e-9);
        let extent = overlap.object_extent();
        assert!((extent - (2.25f64 + 1.0 + 1.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_rejects_open_members() {
        let a = Box::new(Sphere::new(DVec3::ZERO, 1.0).unwrap());
        let b = Box::new(Plane::new(DVec3::ZERO));
        let result = Overlap::new(DVec3::ZERO, a, b, OverlapKind::Additive);
        assert_eq!(result.unwrap_err(), RaytraceError::OpenOverlapMember);
    }
}
