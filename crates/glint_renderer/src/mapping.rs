//! Surface parametrizations and sphere sampling.
//!
//! Each reducer turns a 3D point into a 2D texture coordinate, nominally in
//! `[0, 1) x [0, 1)`. Degenerate inputs (the origin) map to a fixed
//! coordinate rather than failing.

use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use glint_math::{DVec2, DVec3};

/// A shared 3D to 2D reducing map, as attached to a medium.
pub type Reducer = Arc<dyn Fn(DVec3) -> DVec2 + Send + Sync>;

/// `pi * (1 + sqrt(5))`, the angular step between consecutive golden-ratio
/// samples.
pub fn golden_angle() -> f64 {
    PI * (1.0 + 5f64.sqrt())
}

/// Spherical coordinates of the direction from the origin to `point`:
/// `u` follows the azimuth, `v` the polar angle from +Z.
pub fn spherical(point: DVec3) -> DVec2 {
    let p = point.normalize_or_zero();
    let mut u = (p.y.atan2(p.x) + PI) / TAU;
    if u < 0.0 {
        u += 1.0;
    }
    let v = p.z.clamp(-1.0, 1.0).acos() / PI;
    DVec2::new(u.min(next_below_one()), v.min(next_below_one()))
}

/// Cylindrical coordinates around Z: `u` maps `z` in `[-scale, scale]` to
/// `[1, 0]`, `v` is the angle around the axis.
pub fn cylindrical(scale: f64, point: DVec3) -> DVec2 {
    let u = point.z / (-2.0 * scale) + 0.5;
    // theta runs from +pi to -pi, which maps onto 0 to 1
    let theta = point.y.atan2(point.x);
    DVec2::new(u, 0.5 - theta / TAU)
}

/// Toroidal coordinates for a ring of radius `ring_radius` about Z: `u` is
/// the angle around Z, `v` the angle around the tube.
pub fn toroidal(ring_radius: f64, point: DVec3) -> DVec2 {
    let theta = point.y.atan2(point.x);
    let radial = (point.x * point.x + point.y * point.y).sqrt() - ring_radius;
    let phi = point.z.atan2(radial);
    DVec2::new((theta + PI) / TAU, (phi + PI) / TAU)
}

/// Polar coordinates within the plane through `center` with normal `normal`
/// and in-plane reference axis `x_axis`: returns `(radius, turns)` where
/// turns is the counter-clockwise angle from `x_axis` in `[0, 1)`.
pub fn planar_polar(normal: DVec3, x_axis: DVec3, center: DVec3, point: DVec3) -> DVec2 {
    let n = normal.normalize_or_zero();
    let offset = point - center;
    let in_plane = offset - n * offset.dot(n);
    let radius = in_plane.length();
    let x = x_axis.normalize_or_zero();
    let y = n.cross(x);
    let mut theta = in_plane.dot(y).atan2(in_plane.dot(x));
    if theta < 0.0 {
        theta += TAU;
    }
    DVec2::new(radius, (theta / TAU) % 1.0)
}

/// Deterministic, evenly spread point on the unit sphere for sample
/// `numerator` of `denominator`.
///
/// Consecutive numerators step by the golden angle around Z while the polar
/// angle sweeps from +Z to -Z, so `0..denominator` never repeats a point.
pub fn golden_ratio_mapper(numerator: usize, denominator: usize) -> DVec3 {
    let denominator = denominator.max(1);
    let value = (numerator as f64 + 0.5) / denominator as f64;
    let phi = (1.0 - 2.0 * value).clamp(-1.0, 1.0).acos();
    let theta = golden_angle() * numerator as f64;
    DVec3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos())
}

fn next_below_one() -> f64 {
    1.0 - f64::EPSILON / 2.0
}
