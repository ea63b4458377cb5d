//! # Design Code Rules
//!
//! The check engines never hard-code a design code. Every code-dependent
//! constant or rule (β1, ultimate strain, φ, design strengths, shear model,
//! modular ratio) is read through the [`CodeRule`] trait, and the active
//! implementation is chosen by [`DesignCode`] from the request settings.
//!
//! | code | φ (flexure) | design strengths | shear | n |
//! |------|-------------|------------------|-------|---|
//! | `kci-basic` | constant base | fy, 0.85·fck | simplified | rounded |
//! | `kci-2012` | strain-interpolated | fy, 0.85·fck | simplified | Es/Ec |
//! | `kds-24` | 1.0 (factors in strengths) | φs·fy, 0.85·φc·fck | partial-factor | rounded |
//!
//! ## Example
//!
//! ```rust
//! use rc_core::codes::DesignCode;
//!
//! let rule = DesignCode::Kci2012.rule();
//! assert_eq!(rule.ultimate_strain(35.0), 0.003);
//! assert!((rule.flexure_phi(0.0035, 0.002, 0.85) - 0.75).abs() < 1e-12);
//!
//! let bridge = DesignCode::Kds24.rule();
//! assert_eq!(bridge.flexure_phi(0.0035, 0.002, 0.85), 1.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equations::flexure::{self, CONCRETE_ULTIMATE_STRAIN};
use crate::errors::CalcError;

/// Material factor for concrete in partial-factor design
pub const CONCRETE_MATERIAL_FACTOR: f64 = 0.65;

/// Material factor for reinforcement in partial-factor design
pub const STEEL_MATERIAL_FACTOR: f64 = 0.90;

/// Ultimate concrete strain for partial-factor design up to 40 MPa
pub const PARTIAL_FACTOR_ULTIMATE_STRAIN: f64 = 0.0033;

/// Moment redistribution ratio used for the ductility limit (no redistribution)
pub const REDISTRIBUTION_RATIO: f64 = 1.0;

// =============================================================================
// CODE SELECTION
// =============================================================================

/// Design code variant selected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignCode {
    /// Strength design with a constant flexural φ
    KciBasic,
    /// Strength design with strain-interpolated φ
    #[default]
    #[serde(rename = "kci-2012")]
    Kci2012,
    /// Limit-state bridge design with material partial factors
    #[serde(rename = "kds-24")]
    Kds24,
}

static KCI_BASIC: KciBasic = KciBasic;
static KCI_2012: Kci2012 = Kci2012;
static KDS_24: Kds24 = Kds24;

impl DesignCode {
    pub const ALL: [DesignCode; 3] = [DesignCode::KciBasic, DesignCode::Kci2012, DesignCode::Kds24];

    /// The rule set for this code
    pub fn rule(self) -> &'static dyn CodeRule {
        match self {
            DesignCode::KciBasic => &KCI_BASIC,
            DesignCode::Kci2012 => &KCI_2012,
            DesignCode::Kds24 => &KDS_24,
        }
    }

    /// Identifier used in requests and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            DesignCode::KciBasic => "kci-basic",
            DesignCode::Kci2012 => "kci-2012",
            DesignCode::Kds24 => "kds-24",
        }
    }
}

impl fmt::Display for DesignCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesignCode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        DesignCode::ALL
            .into_iter()
            .find(|code| code.as_str() == key)
            .ok_or_else(|| {
                CalcError::invalid_input("code", s, "Expected one of kci-basic, kci-2012, kds-24")
            })
    }
}

/// Exposure condition for crack control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exposure {
    Dry,
    #[default]
    Normal,
    Severe,
}

impl Exposure {
    /// Exposure coefficient Kcr used in the spacing limits
    pub fn kcr(self) -> f64 {
        match self {
            Exposure::Dry => 280.0,
            Exposure::Normal => 210.0,
            Exposure::Severe => 170.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Exposure::Dry => "dry",
            Exposure::Normal => "normal",
            Exposure::Severe => "severe",
        }
    }
}

impl FromStr for Exposure {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dry" => Ok(Exposure::Dry),
            "normal" => Ok(Exposure::Normal),
            "severe" => Ok(Exposure::Severe),
            _ => Err(CalcError::invalid_input("exposure", s, "Expected dry, normal or severe")),
        }
    }
}

/// Shear formulation used by a code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ShearModel {
    /// `Vc = √fck/6·b·d`, `Vs = Av·fy·d/s`
    Simplified,
    /// Size-factor concrete capacity with a variable-angle strut model
    PartialFactor { phi_c: f64, phi_s: f64 },
}

// =============================================================================
// RULE TRAIT
// =============================================================================

/// Code-dependent rules consumed by the check engines.
pub trait CodeRule: Send + Sync {
    fn code(&self) -> DesignCode;

    /// Human-readable name for reports
    fn title(&self) -> &'static str;

    /// Stress block depth factor β1
    fn beta1(&self, fck: f64) -> f64;

    /// Ultimate compressive strain εcu
    fn ultimate_strain(&self, fck: f64) -> f64;

    /// Steel stress used for equilibrium and capacity (fy or φs·fy)
    fn design_steel_stress(&self, fy: f64) -> f64;

    /// Uniform stress of the equivalent block (0.85·fck or 0.85·φc·fck)
    fn stress_block_intensity(&self, fck: f64) -> f64;

    /// Member flexural factor for a net tensile strain
    fn flexure_phi(&self, eps_t: f64, eps_y: f64, base: f64) -> f64;

    /// Member shear factor applied to nominal capacity
    fn shear_phi(&self, base: f64) -> f64;

    fn shear_model(&self) -> ShearModel;

    /// Modular ratio n from the two moduli
    fn modular_ratio(&self, es: f64, ec: f64) -> f64;

    /// Maximum neutral-axis depth for ductility, if the code limits it
    fn ductility_limit(&self, _fck: f64, _d_eff: f64) -> Option<f64> {
        None
    }

    /// Whether φ follows the strain-dependent interpolation
    fn uses_strain_dependent_phi(&self) -> bool {
        false
    }
}

fn exact_ratio(es: f64, ec: f64) -> f64 {
    if ec > 0.0 {
        es / ec
    } else {
        0.0
    }
}

/// Strength design, constant φ
#[derive(Debug, Clone, Copy)]
pub struct KciBasic;

impl CodeRule for KciBasic {
    fn code(&self) -> DesignCode {
        DesignCode::KciBasic
    }

    fn title(&self) -> &'static str {
        "KCI strength design (constant φ)"
    }

    fn beta1(&self, fck: f64) -> f64 {
        flexure::beta1(fck)
    }

    fn ultimate_strain(&self, _fck: f64) -> f64 {
        CONCRETE_ULTIMATE_STRAIN
    }

    fn design_steel_stress(&self, fy: f64) -> f64 {
        fy
    }

    fn stress_block_intensity(&self, fck: f64) -> f64 {
        0.85 * fck
    }

    fn flexure_phi(&self, _eps_t: f64, _eps_y: f64, base: f64) -> f64 {
        base
    }

    fn shear_phi(&self, base: f64) -> f64 {
        base
    }

    fn shear_model(&self) -> ShearModel {
        ShearModel::Simplified
    }

    fn modular_ratio(&self, es: f64, ec: f64) -> f64 {
        exact_ratio(es, ec).round()
    }
}

/// Strength design, strain-interpolated φ
#[derive(Debug, Clone, Copy)]
pub struct Kci2012;

impl CodeRule for Kci2012 {
    fn code(&self) -> DesignCode {
        DesignCode::Kci2012
    }

    fn title(&self) -> &'static str {
        "KCI 2012 strength design (USD)"
    }

    fn beta1(&self, fck: f64) -> f64 {
        flexure::beta1(fck)
    }

    fn ultimate_strain(&self, _fck: f64) -> f64 {
        CONCRETE_ULTIMATE_STRAIN
    }

    fn design_steel_stress(&self, fy: f64) -> f64 {
        fy
    }

    fn stress_block_intensity(&self, fck: f64) -> f64 {
        0.85 * fck
    }

    fn flexure_phi(&self, eps_t: f64, eps_y: f64, base: f64) -> f64 {
        flexure::phi_interpolated(eps_t, eps_y, base)
    }

    fn shear_phi(&self, base: f64) -> f64 {
        base
    }

    fn shear_model(&self) -> ShearModel {
        ShearModel::Simplified
    }

    fn modular_ratio(&self, es: f64, ec: f64) -> f64 {
        exact_ratio(es, ec)
    }

    fn uses_strain_dependent_phi(&self) -> bool {
        true
    }
}

/// Limit-state bridge design with material partial factors
#[derive(Debug, Clone, Copy)]
pub struct Kds24;

impl CodeRule for Kds24 {
    fn code(&self) -> DesignCode {
        DesignCode::Kds24
    }

    fn title(&self) -> &'static str {
        "KDS 24 limit state design (partial factors)"
    }

    /// `0.80` up to 40 MPa, then `0.80 − 0.004·(fck − 40)` with a 0.68 floor.
    fn beta1(&self, fck: f64) -> f64 {
        if fck <= 40.0 {
            0.80
        } else {
            (0.80 - 0.004 * (fck - 40.0)).max(0.68)
        }
    }

    fn ultimate_strain(&self, fck: f64) -> f64 {
        if fck <= 40.0 {
            PARTIAL_FACTOR_ULTIMATE_STRAIN
        } else {
            PARTIAL_FACTOR_ULTIMATE_STRAIN - (fck - 40.0) / 100_000.0
        }
    }

    fn design_steel_stress(&self, fy: f64) -> f64 {
        STEEL_MATERIAL_FACTOR * fy
    }

    fn stress_block_intensity(&self, fck: f64) -> f64 {
        0.85 * CONCRETE_MATERIAL_FACTOR * fck
    }

    fn flexure_phi(&self, _eps_t: f64, _eps_y: f64, _base: f64) -> f64 {
        1.0
    }

    fn shear_phi(&self, _base: f64) -> f64 {
        1.0
    }

    fn shear_model(&self) -> ShearModel {
        ShearModel::PartialFactor {
            phi_c: CONCRETE_MATERIAL_FACTOR,
            phi_s: STEEL_MATERIAL_FACTOR,
        }
    }

    fn modular_ratio(&self, es: f64, ec: f64) -> f64 {
        exact_ratio(es, ec).round()
    }

    /// `c_max = (δ·εcu/0.0033 − 0.6)·d`
    fn ductility_limit(&self, fck: f64, d_eff: f64) -> Option<f64> {
        let ecu = self.ultimate_strain(fck);
        Some((REDISTRIBUTION_RATIO * ecu / PARTIAL_FACTOR_ULTIMATE_STRAIN - 0.6) * d_eff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_code() {
        assert_eq!(DesignCode::default(), DesignCode::Kci2012);
        assert_eq!(DesignCode::default().rule().code(), DesignCode::Kci2012);
    }

    #[test]
    fn test_code_parsing() {
        assert_eq!("kds-24".parse::<DesignCode>().unwrap(), DesignCode::Kds24);
        assert_eq!("KCI_BASIC".parse::<DesignCode>().unwrap(), DesignCode::KciBasic);
        assert!("aci-318".parse::<DesignCode>().is_err());
    }

    #[test]
    fn test_code_serialization() {
        let json = serde_json::to_string(&DesignCode::Kci2012).unwrap();
        assert_eq!(json, "\"kci-2012\"");
        let code: DesignCode = serde_json::from_str("\"kds-24\"").unwrap();
        assert_eq!(code, DesignCode::Kds24);
    }

    #[test]
    fn test_exposure_kcr() {
        assert_eq!(Exposure::Dry.kcr(), 280.0);
        assert_eq!(Exposure::default().kcr(), 210.0);
        assert_eq!("Severe".parse::<Exposure>().unwrap().kcr(), 170.0);
    }

    #[test]
    fn test_constant_phi() {
        let rule = DesignCode::KciBasic.rule();
        assert_eq!(rule.flexure_phi(0.0, 0.002, 0.85), 0.85);
        assert_eq!(rule.flexure_phi(0.01, 0.002, 0.80), 0.80);
    }

    #[test]
    fn test_modular_ratio_rounding() {
        assert_eq!(DesignCode::KciBasic.rule().modular_ratio(200_000.0, 26_000.0), 8.0);
        let exact = DesignCode::Kci2012.rule().modular_ratio(200_000.0, 26_000.0);
        assert!((exact - 7.6923).abs() < 1e-4);
        assert_eq!(DesignCode::Kds24.rule().modular_ratio(200_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_partial_factor_strengths() {
        let rule = DesignCode::Kds24.rule();
        assert!((rule.design_steel_stress(400.0) - 360.0).abs() < 1e-12);
        assert!((rule.stress_block_intensity(30.0) - 16.575).abs() < 1e-12);
        assert_eq!(rule.beta1(30.0), 0.80);
        assert!((rule.beta1(50.0) - 0.76).abs() < 1e-12);
        assert_eq!(rule.beta1(90.0), 0.68);
    }

    #[test]
    fn test_partial_factor_ultimate_strain() {
        let rule = DesignCode::Kds24.rule();
        assert_eq!(rule.ultimate_strain(30.0), 0.0033);
        assert!((rule.ultimate_strain(60.0) - 0.0031).abs() < 1e-12);
    }

    #[test]
    fn test_ductility_limit() {
        let limit = DesignCode::Kds24.rule().ductility_limit(30.0, 540.0).unwrap();
        assert!((limit - 0.4 * 540.0).abs() < 1e-9);
        assert!(DesignCode::Kci2012.rule().ductility_limit(30.0, 540.0).is_none());
    }
}
