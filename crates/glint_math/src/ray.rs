use crate::DVec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length. Object-space rays keep
/// whatever scale the inverse transform gives them so that the parametric
/// distance `t` is identical in both spaces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// The same ray with a unit-length direction (zero directions stay zero).
    pub fn normalized(&self) -> Self {
        Self {
            origin: self.origin,
            direction: self.direction.normalize_or_zero(),
        }
    }

    /// True when the direction is the null vector.
    pub fn is_null(&self) -> bool {
        self.direction == DVec3::ZERO
    }
}
