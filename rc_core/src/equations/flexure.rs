//! # Flexural Design Formulas
//!
//! Strength-design formulas for a singly reinforced rectangular section with
//! an equivalent rectangular stress block.
//!
//! ## Notation
//!
//! - `fck` = characteristic concrete strength (MPa)
//! - `fy`  = reinforcement yield strength (MPa)
//! - `b`   = section width (mm)
//! - `d`   = effective depth (mm)
//! - `As`  = tension steel area (mm²)
//! - `a`   = depth of the equivalent stress block (mm)
//! - `c`   = neutral-axis depth (mm), `a = β1·c`
//!
//! ```text
//!      0.85 fck
//!     ┌────────┐ ─┬─  compression face
//!     │▓▓▓▓▓▓▓▓│  a        C = 0.85·fck·a·b
//!     │        │ ─┴─
//!     │        │
//!     │  ● ● ● │ ← d       T = As·fy
//!     └────────┘
//!          b
//! ```

use super::numeric::{div_or, interpolate, smallest_nonnegative_root};

/// Ultimate compressive strain of concrete for strength design
pub const CONCRETE_ULTIMATE_STRAIN: f64 = 0.003;

/// Net tensile strain at and above which a section is tension-controlled
pub const TENSION_CONTROLLED_STRAIN: f64 = 0.005;

/// Strength reduction factor for compression-controlled sections
pub const PHI_COMPRESSION_CONTROLLED: f64 = 0.65;

/// Stress block depth factor β1 for strength design.
///
/// ```text
/// fck ≤ 28 MPa : β1 = 0.85
/// fck > 28 MPa : β1 = max(0.65, 0.85 − 0.007·(fck − 28))
/// ```
///
/// # Example
/// ```rust
/// use rc_core::equations::flexure::beta1;
///
/// assert_eq!(beta1(24.0), 0.85);
/// assert!((beta1(35.0) - 0.801).abs() < 1e-12);
/// assert_eq!(beta1(80.0), 0.65);
/// ```
pub fn beta1(fck: f64) -> f64 {
    if fck <= 28.0 {
        0.85
    } else {
        (0.85 - 0.007 * (fck - 28.0)).max(0.65)
    }
}

/// Depth of the equivalent stress block from `T = C`.
///
/// `a = As·fs / (block·b)` where `block` is the stress block intensity
/// (0.85·fck for strength design) and `fs` the steel design stress.
/// Returns 0 when `block·b` is not positive.
#[inline]
pub fn stress_block_depth(as_mm2: f64, fs: f64, block: f64, b: f64) -> f64 {
    div_or(as_mm2 * fs, block * b, 0.0)
}

/// Net tensile strain in the extreme tension layer.
///
/// `εt = εcu·(dt − c)/c`, or 0 when `c` is not positive (no steel, so the
/// section is treated as compression-controlled).
#[inline]
pub fn tension_strain(ecu: f64, dt: f64, c: f64) -> f64 {
    if c > 0.0 {
        ecu * (dt - c) / c
    } else {
        0.0
    }
}

/// Strain-dependent strength reduction factor.
///
/// ```text
///  φ
///  base ┤              ┌────────
///       │            ╱
///  0.65 ┼──────────┘
///       └──────────┬───┬──────── εt
///                  εy  0.005
/// ```
///
/// The result is clamped to `[0.65, base]`, so it is continuous at both
/// region boundaries.
///
/// # Example
/// ```rust
/// use rc_core::equations::flexure::phi_interpolated;
///
/// assert_eq!(phi_interpolated(0.006, 0.002, 0.85), 0.85);
/// assert_eq!(phi_interpolated(0.001, 0.002, 0.85), 0.65);
/// assert!((phi_interpolated(0.0035, 0.002, 0.85) - 0.75).abs() < 1e-12);
/// ```
pub fn phi_interpolated(eps_t: f64, eps_y: f64, base: f64) -> f64 {
    let upper = base.max(PHI_COMPRESSION_CONTROLLED);
    if eps_t >= TENSION_CONTROLLED_STRAIN {
        upper
    } else if eps_t <= eps_y {
        PHI_COMPRESSION_CONTROLLED
    } else {
        interpolate(eps_t, eps_y, TENSION_CONTROLLED_STRAIN, PHI_COMPRESSION_CONTROLLED, upper)
            .clamp(PHI_COMPRESSION_CONTROLLED, upper)
    }
}

/// Required tension steel for a design moment.
///
/// Substituting `a = As·fs/(block·b)` into `Mu/φ = As·fs·(d − a/2)` gives
///
/// ```text
/// K·As² − d·As + Mu/(φ·fs) = 0,    K = fs / (2·block·b)
/// ```
///
/// whose smaller root is the required area. Returns `None` when the
/// discriminant is negative: no amount of steel can develop `Mu`.
///
/// A non-positive `K` (no width or no strength) gives `Some(0.0)`.
///
/// # Example
/// ```rust
/// use rc_core::equations::flexure::required_steel_area;
///
/// // fck 35, fy 400, b 400, d 540, Mu 450 kN·m, φ 0.85
/// let as_req = required_steel_area(450.0e6, 0.85, 400.0, 0.85 * 35.0, 400.0, 540.0).unwrap();
/// assert!(as_req > 2600.0 && as_req < 2750.0);
///
/// // An absurd moment on a tiny section cannot be resisted
/// assert!(required_steel_area(5.0e9, 0.85, 400.0, 0.85 * 24.0, 200.0, 200.0).is_none());
/// ```
pub fn required_steel_area(mu_nmm: f64, phi: f64, fs: f64, block: f64, b: f64, d: f64) -> Option<f64> {
    let k = div_or(fs, 2.0 * block * b, 0.0);
    if k <= 0.0 {
        return Some(0.0);
    }
    let c = div_or(mu_nmm, phi * fs, 0.0);
    smallest_nonnegative_root(k, -d, c)
}

/// Design moment of a given steel area: `φ·As·fs·(d − a/2)`.
#[inline]
pub fn resisting_moment(phi: f64, as_mm2: f64, fs: f64, d: f64, a: f64) -> f64 {
    phi * as_mm2 * fs * (d - a / 2.0)
}

/// Minimum reinforcement ratio `max(1.4/fy, 0.25·√fck/fy)`.
pub fn rho_min(fck: f64, fy: f64) -> (f64, f64) {
    let by_yield = div_or(1.4, fy, 0.0);
    let by_strength = div_or(0.25 * fck.max(0.0).sqrt(), fy, 0.0);
    (by_yield, by_strength)
}

/// Balanced reinforcement ratio `0.85·β1·fck/fy · 6000/(6000 + fy)`.
pub fn rho_balanced(beta1: f64, fck: f64, fy: f64) -> f64 {
    div_or(0.85 * beta1 * fck, fy, 0.0) * (6000.0 / (6000.0 + fy))
}

/// Maximum reinforcement ratio, 75% of balanced.
#[inline]
pub fn rho_max(rho_b: f64) -> f64 {
    0.75 * rho_b
}
