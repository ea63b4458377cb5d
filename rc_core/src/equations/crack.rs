//! # Crack Control Formulas
//!
//! Service-load stress in tension steel from a cracked transformed section,
//! and the maximum bar spacing that keeps crack widths acceptable.
//!
//! ```text
//!     ┌────────┐ ─┬─
//!     │▓▓▓▓▓▓▓▓│  χ        concrete in compression (triangular)
//!     │────────│ ─┴─ N.A.
//!     │        │
//!     │  ● ● ● │ ← d       n·As (transformed steel)
//!     └────────┘
//! ```

use super::numeric::div_or;

/// Neutral-axis depth χ of a cracked, singly reinforced rectangle.
///
/// Root of `(b/2)·χ² + n·As·χ − n·As·d = 0`:
///
/// ```text
/// χ = −n·As/b + (n·As/b)·√(1 + 2·b·d/(n·As))
/// ```
///
/// Returns 0 when `n·As` or `b` is not positive.
///
/// # Example
/// ```rust
/// use rc_core::equations::crack::cracked_neutral_axis;
///
/// let chi = cracked_neutral_axis(8.0, 3000.0, 400.0, 540.0);
/// assert!(chi > 0.0 && chi < 540.0);
/// ```
pub fn cracked_neutral_axis(n: f64, as_mm2: f64, b: f64, d: f64) -> f64 {
    let n_as = n * as_mm2;
    if n_as <= 0.0 || b <= 0.0 {
        return 0.0;
    }
    let term = n_as / b;
    -term + term * (1.0 + 2.0 * b * d / n_as).sqrt()
}

/// Tension steel stress under service moment `fs = Ms / [As·(d − χ/3)]`.
pub fn service_steel_stress(ms_nmm: f64, as_mm2: f64, d: f64, chi: f64) -> f64 {
    div_or(ms_nmm, as_mm2 * (d - chi / 3.0), 0.0)
}

/// Clear cover to the bar surface `Cc = dc − db/2`.
#[inline]
pub fn clear_cover(dc: f64, bar_diameter: f64) -> f64 {
    dc - bar_diameter / 2.0
}

/// Spacing limits `(375·Kcr/fs − 2.5·Cc, 300·Kcr/fs)`.
///
/// Returns `None` when `fs ≤ 0`: an unstressed bar imposes no limit.
pub fn spacing_limits(kcr: f64, fs: f64, cc: f64) -> Option<(f64, f64)> {
    if fs <= 0.0 {
        return None;
    }
    Some((375.0 * (kcr / fs) - 2.5 * cc, 300.0 * (kcr / fs)))
}

/// Center-to-center spacing of `count` bars across width `b`.
///
/// `(b − 2·side_cover − db)/(count − 1)`, 0 for fewer than two bars.
pub fn bar_spacing(b: f64, side_cover: f64, bar_diameter: f64, count: f64) -> f64 {
    if count > 1.0 {
        (b - 2.0 * side_cover - bar_diameter) / (count - 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_axis_satisfies_quadratic() {
        let (n, as_mm2, b, d) = (8.0, 3000.0, 400.0, 540.0);
        let chi = cracked_neutral_axis(n, as_mm2, b, d);
        let residual = b / 2.0 * chi * chi + n * as_mm2 * chi - n * as_mm2 * d;
        assert!(residual.abs() < 1e-6 * n * as_mm2 * d);
        // 60·(√19 − 1)
        assert!((chi - 60.0 * (19.0f64.sqrt() - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_neutral_axis_guards() {
        assert_eq!(cracked_neutral_axis(8.0, 0.0, 400.0, 540.0), 0.0);
        assert_eq!(cracked_neutral_axis(8.0, 3000.0, 0.0, 540.0), 0.0);
    }

    #[test]
    fn test_steel_stress() {
        let fs = service_steel_stress(150.0e6, 3000.0, 540.0, 180.0);
        assert!((fs - 150.0e6 / (3000.0 * 480.0)).abs() < 1e-9);
    }

    #[test]
    fn test_spacing_limits() {
        let (s1, s2) = spacing_limits(210.0, 200.0, 47.5).unwrap();
        assert!((s1 - (393.75 - 118.75)).abs() < 1e-9);
        assert!((s2 - 315.0).abs() < 1e-9);
        assert!(spacing_limits(210.0, 0.0, 47.5).is_none());
    }

    #[test]
    fn test_bar_spacing() {
        // 400 wide, 40 side cover, D25, 6 bars
        assert!((bar_spacing(400.0, 40.0, 25.0, 6.0) - 59.0).abs() < 1e-12);
        assert_eq!(bar_spacing(400.0, 40.0, 25.0, 1.0), 0.0);
    }
}
