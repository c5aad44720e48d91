//! Near-zero and near-equal comparisons.

/// Tolerance used across the tracer for "close enough" comparisons (2^-20).
pub const EPSILON: f64 = 1.0 / 1_048_576.0;

/// True when `value` is within [`EPSILON`] of zero.
#[inline]
pub fn nearly_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// True when `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn nearly_equal(a: f64, b: f64) -> bool {
    nearly_equal_within(a, b, EPSILON)
}

/// True when `a` and `b` differ by less than `tolerance`.
#[inline]
pub fn nearly_equal_within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}
