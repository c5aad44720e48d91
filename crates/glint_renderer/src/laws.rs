//! Optics primitives.
//!
//! All functions are pure. Degenerate cases (total internal reflection)
//! return the null vector instead of failing.

use glint_math::DVec3;

/// Refracted direction of `incident` through a surface with normal `normal`
/// going from index `n1` into index `n2` (Snell's law).
///
/// `normal` is expected to oppose `incident`. Returns `DVec3::ZERO` on total
/// internal reflection.
pub fn snell(normal: DVec3, incident: DVec3, n1: f64, n2: f64) -> DVec3 {
    let eta = n1 / n2;
    let cos_theta = normal.dot(incident);
    let sin2_phi = eta * eta * (1.0 - cos_theta * cos_theta);
    if sin2_phi <= 1.0 {
        eta * incident - (eta * cos_theta + (1.0 - sin2_phi).sqrt()) * normal
    } else {
        DVec3::ZERO
    }
}

/// Mirror `incident` about `normal`: `I - 2 (N.I) N`.
///
/// Works regardless of whether `normal` faces with or against `incident`.
#[inline]
pub fn reflection(normal: DVec3, incident: DVec3) -> DVec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Unpolarized Fresnel reflectance for the incident and transmitted angles
/// (radians), averaging the s and p polarizations.
pub fn fresnel(n1: f64, n2: f64, incident_angle: f64, transmitted_angle: f64) -> f64 {
    let cos_i = incident_angle.cos();
    let cos_t = transmitted_angle.cos();
    let rs = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t);
    let rp = (n2 * cos_i - n1 * cos_t) / (n2 * cos_i + n1 * cos_t);
    let reflectance = 0.5 * (rs * rs + rp * rp);
    if reflectance.is_finite() {
        reflectance.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Beer-Lambert attenuation along the path `distance` for an absorption
/// coefficient. Exactly 1.0 at zero distance and 0.0 at infinity.
#[inline]
pub fn beers(distance: DVec3, coefficient: f64) -> f64 {
    (-distance.length() * coefficient).exp()
}

/// Intensity scale at `distance` from a point source.
#[inline]
pub fn inverse_square(distance: f64) -> f64 {
    1.0 / (distance * distance)
}
