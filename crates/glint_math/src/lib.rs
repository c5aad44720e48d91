//! Numeric toolkit for the glint ray tracer.
//!
//! Everything here works in double precision. glam's `D*` types carry the
//! vector and matrix math; this crate adds rays, intervals, tolerance
//! comparisons and the polynomial root solvers the surfaces rely on.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;
mod roots;
mod tolerance;
mod transform;

pub use interval::Interval;
pub use ray::Ray;
pub use roots::{cubic_roots, quadratic_roots, quartic_roots};
pub use tolerance::{nearly_equal, nearly_equal_within, nearly_zero, EPSILON};
pub use transform::{rotation_xyz, DMat4Ext};
