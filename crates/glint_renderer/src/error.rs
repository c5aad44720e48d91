//! Construction errors.
//!
//! Only malformed construction parameters surface as errors. Geometric
//! degeneracies (parallel rays, complex roots, total internal reflection)
//! resolve locally into "no hit" or null-vector results.

use thiserror::Error;

/// Errors raised when a scene element is built with invalid parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RaytraceError {
    #[error("Radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("Inner radius {inner} must be smaller than outer radius {outer}")]
    InvalidRingRadii { inner: f64, outer: f64 },

    #[error("Tube radius {tube} must not exceed ring radius {ring}")]
    InvalidTorusRadii { ring: f64, tube: f64 },

    #[error("Half-widths must be non-zero, got {0:?}")]
    ZeroHalfWidth([f64; 3]),

    #[error("Scale components must be non-zero, got {0:?}")]
    ZeroScale([f64; 3]),

    #[error("Dimension must be positive, got {0}")]
    NonPositiveDimension(f64),

    #[error("Cone angle must be within (0, pi/2) radians, got {0}")]
    InvalidConeAngle(f64),

    #[error("Triangle vertices are colinear")]
    DegenerateTriangle,

    #[error("Polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("Polygon points must be distinct, coplanar and convex")]
    DegeneratePolygon,

    #[error("Direction must be finite and non-zero, got {0:?}")]
    ZeroDirection([f64; 3]),

    #[error("Overlap members must both be closed surfaces")]
    OpenOverlapMember,

    #[error("Stereo separation must be non-negative, got {0}")]
    NegativeSeparation(f64),

    #[error("Bounds minimum {min:?} must be below maximum {max:?} on every axis")]
    InvalidBounds { min: [f64; 3], max: [f64; 3] },

    #[error("Image height {height} and width {width} must be even")]
    OddImageDimensions { height: usize, width: usize },

    #[error("Spot light angle must be positive, got {0} degrees")]
    NonPositiveSpotAngle(f64),

    #[error("Light sample count must be at least 1")]
    ZeroSamples,

    #[error("Frame rate must be positive, got {0}")]
    InvalidFrameRate(f64),

    #[error("Animation anchor duration must be positive, got {0}")]
    InvalidDuration(f64),

    #[error("Camera look-from and look-at are the same point")]
    CoincidentLook,

    #[error("Camera can't look straight up or down the Z axis")]
    VerticalLook,

    #[error("Pattern needs {expected} colors, got {actual}")]
    PaletteSize { expected: usize, actual: usize },
}

/// Result type for construction operations.
pub type RaytraceResult<T> = Result<T, RaytraceError>;
