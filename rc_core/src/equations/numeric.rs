//! # Numeric Helpers
//!
//! Small numerical building blocks shared by the design equations: a
//! cancellation-free quadratic solver, linear interpolation, and guarded
//! division.

/// Smallest non-negative real root of `a·x² + b·x + c = 0`.
///
/// Returns `None` when the discriminant is negative or when both roots are
/// negative. The roots are formed as `q/a` and `c/q` with
/// `q = -(b + sign(b)·√disc)/2`, which avoids the catastrophic cancellation
/// of the textbook formula when `4ac` is small compared to `b²`.
///
/// A zero leading coefficient degrades to the linear equation `b·x + c = 0`.
///
/// # Example
///
/// ```rust
/// use rc_core::equations::numeric::smallest_nonnegative_root;
///
/// // (x - 2)(x - 5) = x² - 7x + 10
/// let root = smallest_nonnegative_root(1.0, -7.0, 10.0).unwrap();
/// assert!((root - 2.0).abs() < 1e-12);
///
/// // x² + 1 = 0 has no real root
/// assert!(smallest_nonnegative_root(1.0, 0.0, 1.0).is_none());
/// ```
pub fn smallest_nonnegative_root(a: f64, b: f64, c: f64) -> Option<f64> {
    if a == 0.0 {
        if b == 0.0 {
            return None;
        }
        let x = -c / b;
        return (x >= 0.0).then_some(x);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 || !disc.is_finite() {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_disc);
    if q == 0.0 {
        // b = 0 and c = 0: double root at the origin
        return Some(0.0);
    }

    let r1 = q / a;
    let r2 = c / q;
    let (lo, hi) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };

    if lo >= 0.0 {
        Some(lo)
    } else if hi >= 0.0 {
        Some(hi)
    } else {
        None
    }
}

/// Linear interpolation of `y` at `x` between `(x0, y0)` and `(x1, y1)`.
///
/// Returns `y0` for a degenerate interval.
#[inline]
pub fn interpolate(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// `num / den`, or `fallback` when the denominator is not positive.
#[inline]
pub fn div_or(num: f64, den: f64, fallback: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        fallback
    }
}
