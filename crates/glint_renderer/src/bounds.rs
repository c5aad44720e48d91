use glint_math::{nearly_zero, DVec3, Interval, Ray};

use crate::{RaytraceError, RaytraceResult};

/// Axis-aligned bounding box used for coarse culling.
///
/// A box with any infinite component is "infinite". A box with NaN
/// components is unset; growing it by a finite box yields that box, because
/// `f64::min`/`f64::max` ignore NaN operands.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    /// A box from two corners. Every axis must satisfy `min < max`.
    pub fn new(min: DVec3, max: DVec3) -> RaytraceResult<Self> {
        let ordered = (0..3).all(|axis| {
            let (lo, hi) = (min[axis], max[axis]);
            lo.is_nan() || hi.is_nan() || lo < hi
        });
        if !ordered {
            return Err(RaytraceError::InvalidBounds {
                min: min.to_array(),
                max: max.to_array(),
            });
        }
        Ok(Self { min, max })
    }

    /// The box that contains everything.
    pub const INFINITE: Bounds = Bounds {
        min: DVec3::splat(f64::NEG_INFINITY),
        max: DVec3::splat(f64::INFINITY),
    };

    /// A box with no extent yet, used as the seed when growing.
    pub const UNSET: Bounds = Bounds {
        min: DVec3::splat(f64::NAN),
        max: DVec3::splat(f64::NAN),
    };

    /// A box of half-size `extent` around `center`.
    pub fn around(center: DVec3, extent: f64) -> Self {
        if extent.is_infinite() {
            return Self::INFINITE;
        }
        let half = DVec3::splat(extent.abs());
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// The interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, axis: usize) -> Interval {
        Interval::new(self.min[axis], self.max[axis])
    }

    /// True for a box with any infinite or unset component.
    pub fn is_infinite(&self) -> bool {
        !self.min.is_finite() || !self.max.is_finite()
    }

    /// The midpoint. A box infinite on every side is centered at the
    /// origin; one that is only partly infinite has no center (NaN).
    pub fn center(&self) -> DVec3 {
        if !self.is_infinite() {
            return (self.min + self.max) * 0.5;
        }
        let all_infinite = self.min.to_array().iter().all(|c| c.is_infinite())
            && self.max.to_array().iter().all(|c| c.is_infinite());
        if all_infinite {
            DVec3::ZERO
        } else {
            DVec3::splat(f64::NAN)
        }
    }

    /// True when `min <= p < max` on every axis.
    pub fn contained(&self, p: DVec3) -> bool {
        (0..3).all(|axis| self.min[axis] <= p[axis] && p[axis] < self.max[axis])
    }

    /// Test if a ray intersects this box somewhere at `t >= 0`.
    ///
    /// Uses the slab method. Axes with a near-zero direction component only
    /// require the origin to lie within that slab.
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        if self.min.is_nan() || self.max.is_nan() {
            return false;
        }
        let mut ray_t = Interval::new(0.0, f64::INFINITY);
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            if nearly_zero(direction) {
                if !slab.contains(origin) {
                    return false;
                }
                continue;
            }
            let inverse = 1.0 / direction;
            let mut t0 = (slab.min - origin) * inverse;
            let mut t1 = (slab.max - origin) * inverse;
            if inverse < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t = ray_t.overlap(&Interval::new(t0, t1));
            if ray_t.is_empty() {
                return false;
            }
        }
        true
    }

    /// True when the interiors overlap. Touching faces do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        (0..3).all(|axis| self.min[axis] < other.max[axis] && other.min[axis] < self.max[axis])
    }

    /// Grow to enclose `other`.
    pub fn grow(&mut self, other: &Bounds) {
        self.min = DVec3::new(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.min.z.min(other.min.z),
        );
        self.max = DVec3::new(
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
            self.max.z.max(other.max.z),
        );
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::INFINITE
    }
}
