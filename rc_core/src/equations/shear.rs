//! # Shear Design Formulas
//!
//! Two formulations are provided:
//!
//! - **Simplified** (strength design): concrete carries `√fck/6·b·d`, vertical
//!   stirrups carry `Av·fy·d/s`.
//! - **Partial-factor** (bridge limit-state design): concrete capacity from a
//!   size factor, longitudinal steel ratio and axial stress; stirrups use a
//!   variable strut angle θ and lever arm `z = 0.9·d`.
//!
//! Forces are in N, lengths in mm, stresses in MPa.

use super::numeric::div_or;

/// Maximum stirrup spacing regardless of depth (mm)
pub const MAX_STIRRUP_SPACING: f64 = 600.0;

// =============================================================================
// SIMPLIFIED FORMULATION
// =============================================================================

/// Nominal concrete shear strength `Vc = (√fck/6)·b·d`.
///
/// # Example
/// ```rust
/// use rc_core::equations::shear::concrete_shear_simplified;
///
/// let vc = concrete_shear_simplified(27.0, 400.0, 540.0);
/// assert!((vc - 187_061.0).abs() < 1.0);
/// ```
pub fn concrete_shear_simplified(fck: f64, b: f64, d: f64) -> f64 {
    fck.max(0.0).sqrt() / 6.0 * b * d
}

/// Nominal shear strength of vertical stirrups `Vs = Av·fy·d/s` (0 if `s ≤ 0`).
pub fn stirrup_shear_simplified(av: f64, fy: f64, d: f64, s: f64) -> f64 {
    div_or(av * fy * d, s, 0.0)
}

/// Upper limit on stirrup contribution `Vs,max = (2/3)·√fck·b·d`.
pub fn stirrup_shear_limit(fck: f64, b: f64, d: f64) -> f64 {
    2.0 / 3.0 * fck.max(0.0).sqrt() * b * d
}

/// Stirrup area required at spacing `s` to carry the shear not taken by concrete.
///
/// `Av,req = (Vu − φ·Vc)·s / (fy·d·φ)`, never negative.
pub fn required_stirrup_area_simplified(vu: f64, phi_vc: f64, s: f64, fy: f64, d: f64, phi: f64) -> f64 {
    div_or((vu - phi_vc) * s, fy * d * phi, 0.0).max(0.0)
}

/// Maximum stirrup spacing for the simplified formulation, `min(600, d/2)`.
pub fn max_spacing_simplified(d: f64) -> f64 {
    MAX_STIRRUP_SPACING.min(0.5 * d)
}

// =============================================================================
// PARTIAL-FACTOR FORMULATION
// =============================================================================

/// Size effect factor `k = min(2.0, 1 + √(200/d))`.
pub fn size_factor(d: f64) -> f64 {
    if d <= 0.0 {
        return 2.0;
    }
    (1.0 + (200.0 / d).sqrt()).min(2.0)
}

/// Characteristic tensile strength `fctk = 0.23·fck^(2/3)`.
pub fn tensile_strength_characteristic(fck: f64) -> f64 {
    0.23 * fck.max(0.0).powf(2.0 / 3.0)
}

/// Design concrete shear strength.
///
/// ```text
/// Vcd     = (0.85·φc·k·(ρ·fck)^(1/3) + 0.15·fn)·b·d
/// Vcd,min = (0.4·φc·fctk + 0.15·fn)·b·d
/// ```
///
/// Returns `(Vcd, Vcd,min)`; the caller applies the floor. `rho` is the
/// longitudinal ratio already capped at 0.02.
pub fn concrete_shear_partial_factor(phi_c: f64, k: f64, rho: f64, fck: f64, fn_mpa: f64, b: f64, d: f64) -> (f64, f64) {
    let vcd = (0.85 * phi_c * k * (rho.max(0.0) * fck).cbrt() + 0.15 * fn_mpa) * b * d;
    let vcd_min = (0.4 * phi_c * tensile_strength_characteristic(fck) + 0.15 * fn_mpa) * b * d;
    (vcd, vcd_min)
}

/// Design shear strength of vertical stirrups with a strut angle θ.
///
/// `Vsd = φs·fy·Av·z·cot θ / s` (0 if `s ≤ 0`).
pub fn stirrup_shear_partial_factor(phi_s: f64, fy: f64, av: f64, z: f64, theta_rad: f64, s: f64) -> f64 {
    div_or(phi_s * fy * av * z, s * theta_rad.tan(), 0.0)
}

/// Concrete efficiency factor for strut crushing `ν = 0.6·(1 − fck/250)`.
pub fn strut_efficiency(fck: f64) -> f64 {
    0.6 * (1.0 - fck / 250.0)
}

/// Strut crushing limit `Vd,max = ν·φc·fck·b·z / (cot θ + tan θ)`.
pub fn crushing_limit(phi_c: f64, fck: f64, b: f64, z: f64, theta_rad: f64) -> f64 {
    let cot = 1.0 / theta_rad.tan();
    strut_efficiency(fck) * phi_c * fck * b * z / (cot + theta_rad.tan())
}

/// Stirrup area required at spacing `s` under the strut model.
///
/// `Av,req = (Vu − Vcd)·s / (φs·fy·z·cot θ)`, never negative.
pub fn required_stirrup_area_partial_factor(vu: f64, vcd: f64, s: f64, phi_s: f64, fy: f64, z: f64, theta_rad: f64) -> f64 {
    div_or((vu - vcd) * s * theta_rad.tan(), phi_s * fy * z, 0.0).max(0.0)
}

/// Maximum stirrup spacing for the partial-factor formulation, `min(600, 0.75·d)`.
pub fn max_spacing_partial_factor(d: f64) -> f64 {
    MAX_STIRRUP_SPACING.min(0.75 * d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_concrete_shear() {
        // fck 27, b 400, d 540, φv 0.75
        let vc = concrete_shear_simplified(27.0, 400.0, 540.0);
        let phi_vc = 0.75 * vc;
        assert!(phi_vc < 150_000.0);
        assert!(phi_vc > 140_000.0);
    }

    #[test]
    fn test_zero_spacing_gives_no_stirrup_capacity() {
        assert_eq!(stirrup_shear_simplified(397.2, 400.0, 540.0, 0.0), 0.0);
        assert_eq!(stirrup_shear_partial_factor(0.9, 400.0, 397.2, 486.0, 30f64.to_radians(), 0.0), 0.0);
    }

    #[test]
    fn test_required_stirrups_never_negative() {
        assert_eq!(required_stirrup_area_simplified(100_000.0, 140_000.0, 200.0, 400.0, 540.0, 0.75), 0.0);
        let av = required_stirrup_area_simplified(200_000.0, 140_000.0, 200.0, 400.0, 540.0, 0.75);
        assert!((av - 60_000.0 * 200.0 / (400.0 * 540.0 * 0.75)).abs() < 1e-9);
    }

    #[test]
    fn test_spacing_limits() {
        assert_eq!(max_spacing_simplified(540.0), 270.0);
        assert_eq!(max_spacing_simplified(1500.0), 600.0);
        assert_eq!(max_spacing_partial_factor(540.0), 405.0);
    }

    #[test]
    fn test_size_factor_cap() {
        assert_eq!(size_factor(150.0), 2.0);
        assert!((size_factor(800.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_partial_factor_floor() {
        // Lightly reinforced: floor governs
        let (vcd, vcd_min) = concrete_shear_partial_factor(0.65, 1.6, 0.0005, 30.0, 0.0, 400.0, 540.0);
        assert!(vcd_min > vcd);
    }

    #[test]
    fn test_partial_factor_stirrups_roundtrip() {
        let theta = 30f64.to_radians();
        let (phi_s, fy, z, s) = (0.9, 400.0, 486.0, 150.0);
        let av = required_stirrup_area_partial_factor(300_000.0, 120_000.0, s, phi_s, fy, z, theta);
        let vsd = stirrup_shear_partial_factor(phi_s, fy, av, z, theta, s);
        assert!((vsd - 180_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_crushing_limit() {
        let theta = 45f64.to_radians();
        let v = crushing_limit(0.65, 30.0, 400.0, 486.0, theta);
        let expected = 0.6 * (1.0 - 30.0 / 250.0) * 0.65 * 30.0 * 400.0 * 486.0 / 2.0;
        assert!((v - expected).abs() < 1e-6);
    }
}
