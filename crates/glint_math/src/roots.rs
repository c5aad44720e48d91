//! Real roots of low order polynomials.
//!
//! The cubic and quartic solvers follow the closed forms (Cardano, Ferrari)
//! and then polish each root with a few Newton steps, which keeps torus hits
//! on the surface even when the closed form loses digits.

use std::f64::consts::PI;

/// Coefficients below this magnitude are treated as zero inside the solvers.
const ZERO: f64 = 1e-12;

/// Newton iterations applied to cubic and quartic roots.
const POLISH_STEPS: usize = 3;

/// Solves `a*t^2 + b*t + c = 0`.
///
/// Returns `None` for a negative discriminant (complex roots) or a degenerate
/// equation. When `a` is zero the single linear root is returned twice. The
/// pair is ordered so that the first root is the smaller.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() < ZERO {
        if b.abs() < ZERO {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    // avoids cancellation between -b and the root of the discriminant
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        // only when b and c are both zero
        return Some((0.0, 0.0));
    }
    let t0 = q / a;
    let t1 = c / q;
    Some(if t0 <= t1 { (t0, t1) } else { (t1, t0) })
}

/// Real roots of `a*x^3 + b*x^2 + c*x + d = 0`, sorted ascending.
pub fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if a.abs() < ZERO {
        return match quadratic_roots(b, c, d) {
            Some((t0, t1)) if t0 == t1 => vec![t0],
            Some((t0, t1)) => vec![t0, t1],
            None => Vec::new(),
        };
    }
    let mut roots = normalized_cubic(b / a, c / a, d / a);
    for root in roots.iter_mut() {
        *root = polish(*root, &[a, b, c, d]);
    }
    roots.sort_by(f64::total_cmp);
    roots
}

/// Real roots of `a*x^4 + b*x^3 + c*x^2 + d*x + e = 0`, sorted ascending.
pub fn quartic_roots(a: f64, b: f64, c: f64, d: f64, e: f64) -> Vec<f64> {
    if a.abs() < ZERO {
        return cubic_roots(b, c, d, e);
    }
    let (a3, a2, a1, a0) = (b / a, c / a, d / a, e / a);

    // depressed quartic y^4 + p*y^2 + q*y + r with x = y - a3/4
    let sq = a3 * a3;
    let p = -3.0 / 8.0 * sq + a2;
    let q = sq * a3 / 8.0 - a3 * a2 / 2.0 + a1;
    let r = -3.0 / 256.0 * sq * sq + sq * a2 / 16.0 - a3 * a1 / 4.0 + a0;

    let mut roots = Vec::with_capacity(4);
    if r.abs() < ZERO {
        // y * (y^3 + p*y + q) = 0
        roots.push(0.0);
        roots.extend(normalized_cubic(0.0, p, q));
    } else {
        // the largest resolvent root keeps both square roots below real
        let z = normalized_cubic(-p / 2.0, -r, r * p / 2.0 - q * q / 8.0)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        if !z.is_finite() {
            return Vec::new();
        }

        let Some(u) = non_negative_sqrt(z * z - r) else {
            return Vec::new();
        };
        let Some(v) = non_negative_sqrt(2.0 * z - p) else {
            return Vec::new();
        };

        let (v0, v1) = if q < 0.0 { (-v, v) } else { (v, -v) };
        if let Some((t0, t1)) = quadratic_roots(1.0, v0, z - u) {
            roots.push(t0);
            roots.push(t1);
        }
        if let Some((t0, t1)) = quadratic_roots(1.0, v1, z + u) {
            roots.push(t0);
            roots.push(t1);
        }
    }

    let shift = a3 / 4.0;
    for root in roots.iter_mut() {
        *root = polish(*root - shift, &[a, b, c, d, e]);
    }
    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|x, y| (*x - *y).abs() < ZERO);
    roots
}

/// Roots of `x^3 + a*x^2 + b*x + c = 0` without polishing or ordering.
fn normalized_cubic(a: f64, b: f64, c: f64) -> Vec<f64> {
    // depressed cubic y^3 + 3p*y + 2q with x = y - a/3
    let sq = a * a;
    let p = (-sq / 3.0 + b) / 3.0;
    let q = (2.0 / 27.0 * a * sq - a * b / 3.0 + c) / 2.0;
    let cube_p = p * p * p;
    let discriminant = q * q + cube_p;

    let mut roots = if discriminant.abs() < ZERO {
        if q.abs() < ZERO {
            vec![0.0]
        } else {
            let u = (-q).cbrt();
            vec![2.0 * u, -u]
        }
    } else if discriminant < 0.0 {
        // three real roots
        let phi = (-q / (-cube_p).sqrt()).clamp(-1.0, 1.0).acos() / 3.0;
        let t = 2.0 * (-p).sqrt();
        vec![
            t * phi.cos(),
            -t * (phi + PI / 3.0).cos(),
            -t * (phi - PI / 3.0).cos(),
        ]
    } else {
        let root = discriminant.sqrt();
        vec![(root - q).cbrt() - (root + q).cbrt()]
    };

    let shift = a / 3.0;
    for root in roots.iter_mut() {
        *root -= shift;
    }
    roots
}

fn non_negative_sqrt(value: f64) -> Option<f64> {
    if value.abs() < ZERO {
        Some(0.0)
    } else if value > 0.0 {
        Some(value.sqrt())
    } else {
        None
    }
}

/// Newton refinement of `x` against the polynomial with the given
/// coefficients (highest power first).
fn polish(mut x: f64, coefficients: &[f64]) -> f64 {
    for _ in 0..POLISH_STEPS {
        let (mut value, mut slope) = (0.0, 0.0);
        for &k in coefficients {
            slope = slope * x + value;
            value = value * x + k;
        }
        if slope.abs() < ZERO {
            break;
        }
        let next = x - value / slope;
        if !next.is_finite() {
            break;
        }
        x = next;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_quadratic_two_roots() {
        // (t - 1)(t - 3)
        let (t0, t1) = quadratic_roots(1.0, -4.0, 3.0).unwrap();
        assert!(close(t0, 1.0));
        assert!(close(t1, 3.0));
    }

    #[test]
    fn test_quadratic_complex() {
        assert!(quadratic_roots(1.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_quadratic_linear_and_degenerate() {
        let (t0, t1) = quadratic_roots(0.0, 2.0, -4.0).unwrap();
        assert!(close(t0, 2.0) && close(t1, 2.0));
        assert!(quadratic_roots(0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_quadratic_double_root() {
        let (t0, t1) = quadratic_roots(1.0, -2.0, 1.0).unwrap();
        assert!(close(t0, 1.0) && close(t1, 1.0));
    }

    #[test]
    fn test_cubic_three_roots() {
        // (x + 1)(x - 2)(x - 5)
        let roots = cubic_roots(1.0, -6.0, 3.0, 10.0);
        assert_eq!(roots.len(), 3);
        assert!(close(roots[0], -1.0));
        assert!(close(roots[1], 2.0));
        assert!(close(roots[2], 5.0));
    }

    #[test]
    fn test_cubic_one_root() {
        // (x - 1)(x^2 + 1)
        let roots = cubic_roots(1.0, -1.0, 1.0, -1.0);
        assert_eq!(roots.len(), 1);
        assert!(close(roots[0], 1.0));
    }

    #[test]
    fn test_quartic_four_roots() {
        // (x - 1)(x - 2)(x - 3)(x - 4)
        let roots = quartic_roots(1.0, -10.0, 35.0, -50.0, 24.0);
        assert_eq!(roots.len(), 4);
        for (root, expected) in roots.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert!(close(*root, expected), "{} != {}", root, expected);
        }
    }

    #[test]
    fn test_quartic_two_roots() {
        // (x^2 - 4)(x^2 + 1)
        let roots = quartic_roots(1.0, 0.0, -3.0, 0.0, -4.0);
        assert_eq!(roots.len(), 2);
        assert!(close(roots[0], -2.0));
        assert!(close(roots[1], 2.0));
    }

    #[test]
    fn test_quartic_no_roots() {
        // x^4 + 1
        assert!(quartic_roots(1.0, 0.0, 0.0, 0.0, 1.0).is_empty());
    }
}
