//! # Flexure Check
//!
//! Strength of a singly reinforced rectangular section in bending.
//!
//! ## Procedure
//!
//! 1. Stress block from the provided steel: `a = As·fs/(block·B)`, `c = a/β1`
//! 2. Net tensile strain of the outermost layer `εt = εcu·(dt − c)/c`
//! 3. Resistance factor φ from the code rule (constant or strain-dependent)
//! 4. Required steel for `Mu` from the quadratic in `As`
//! 5. Reinforcement ratio bounds `ρmin`, `ρmax = 0.75·ρb`
//! 6. Design moment `Mr = φ·As·fs·(d − a/2)`
//!
//! Under the partial-factor code `fs = φs·fy` and `block = 0.85·φc·fck`,
//! and the member factor is 1.0.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::calculations::flexure::{self, DuctilityRegime};
//! use rc_core::codes::DesignCode;
//! use rc_core::project::MaterialInput;
//! use rc_core::section::{RowInput, Section};
//!
//! let row: RowInput = serde_json::from_str(
//!     r#"{"Mu": 450, "H": 600, "B": 400, "Dc": 60, "as_dia": 25, "as_num": 6}"#,
//! ).unwrap();
//! let section = Section::from_row(&row, &MaterialInput::default()).unwrap();
//! let result = flexure::calculate(&section, DesignCode::Kci2012.rule());
//!
//! assert_eq!(result.phi, 0.85);
//! assert_eq!(result.regime, DuctilityRegime::TensionControlled);
//! assert!(result.passes());
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Verdict;
use crate::codes::CodeRule;
use crate::equations::flexure::{
    required_steel_area, resisting_moment, rho_balanced, rho_max, rho_min, stress_block_depth,
    tension_strain, TENSION_CONTROLLED_STRAIN,
};
use crate::equations::numeric::div_or;
use crate::section::Section;

/// Required tension steel for the factored moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "area_mm2", rename_all = "snake_case")]
pub enum RequiredSteel {
    /// Area in mm²
    Required(f64),
    /// The moment exceeds what any amount of tension steel can develop
    Infeasible,
}

impl RequiredSteel {
    pub fn area(self) -> Option<f64> {
        match self {
            RequiredSteel::Required(area) => Some(area),
            RequiredSteel::Infeasible => None,
        }
    }

    pub fn is_feasible(self) -> bool {
        matches!(self, RequiredSteel::Required(_))
    }
}

/// Strain regime of the section at nominal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuctilityRegime {
    /// `εt ≥ 0.005`
    TensionControlled,
    /// `εy < εt < 0.005`
    Transition,
    /// `εt ≤ εy`
    CompressionControlled,
}

impl DuctilityRegime {
    pub fn classify(eps_t: f64, eps_y: f64) -> Self {
        if eps_t >= TENSION_CONTROLLED_STRAIN {
            DuctilityRegime::TensionControlled
        } else if eps_t <= eps_y {
            DuctilityRegime::CompressionControlled
        } else {
            DuctilityRegime::Transition
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DuctilityRegime::TensionControlled => "tension-controlled",
            DuctilityRegime::Transition => "transition",
            DuctilityRegime::CompressionControlled => "compression-controlled",
        }
    }
}

/// Which reinforcement ratio bounds the provided steel satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioCondition {
    Both,
    MinOnly,
    MaxOnly,
    Neither,
}

/// Classify `ρuse` against the bounds.
///
/// The minimum is also met when `ρuse ≥ (4/3)·ρreq`; the second return
/// value tells whether that fallback was needed.
pub fn classify_ratio(rho_use: f64, rho_min: f64, rho_max: f64, rho_req_four_thirds: Option<f64>) -> (RatioCondition, bool) {
    let direct = rho_use >= rho_min;
    let via_fallback = !direct && rho_req_four_thirds.is_some_and(|limit| rho_use >= limit);
    let min_ok = direct || via_fallback;
    let max_ok = rho_use <= rho_max;

    let condition = match (min_ok, max_ok) {
        (true, true) => RatioCondition::Both,
        (true, false) => RatioCondition::MinOnly,
        (false, true) => RatioCondition::MaxOnly,
        (false, false) => RatioCondition::Neither,
    };
    (condition, via_fallback)
}

/// Reinforcement ratio bounds and their evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioCheck {
    /// `1.4/fy`
    pub rho_min_yield: f64,
    /// `0.25·√fck/fy`
    pub rho_min_strength: f64,
    pub rho_min: f64,
    pub rho_balanced: f64,
    pub rho_max: f64,
    pub rho_use: f64,
    /// `(4/3)·As_req/(B·d)`, absent when the required steel is infeasible
    pub rho_req_four_thirds: Option<f64>,
    pub condition: RatioCondition,
    /// The minimum was met only through the 4/3 fallback
    pub min_via_fallback: bool,
    pub verdict: Verdict,
}

impl RatioCheck {
    fn zero() -> Self {
        RatioCheck {
            rho_min_yield: 0.0,
            rho_min_strength: 0.0,
            rho_min: 0.0,
            rho_balanced: 0.0,
            rho_max: 0.0,
            rho_use: 0.0,
            rho_req_four_thirds: None,
            condition: RatioCondition::Neither,
            min_via_fallback: false,
            verdict: Verdict::NotChecked,
        }
    }
}

/// Neutral-axis depth limit for ductility (partial-factor code only).
///
/// The limit formula has not been verified against a worked example, so it
/// is reported alongside the strength verdict rather than folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuctilityLimit {
    pub c_max: f64,
    pub satisfied: bool,
    pub verified: bool,
}

/// Results of the flexure check.
///
/// Lengths in mm, forces in N, moments in N·mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexureResult {
    pub beta1: f64,
    /// Ultimate concrete strain εcu
    pub ecu: f64,
    /// Steel stress used in equilibrium (fy or φs·fy)
    pub fs_design: f64,
    /// Stress block intensity (0.85·fck or 0.85·φc·fck)
    pub block: f64,
    /// Tension force `T = As·fs`
    pub tension_force: f64,
    /// Compression per mm of block depth `block·B`
    pub compression_per_mm: f64,
    /// Stress block depth
    pub a: f64,
    /// Neutral-axis depth
    pub c: f64,
    pub eps_y: f64,
    pub eps_t: f64,
    pub regime: DuctilityRegime,
    pub phi: f64,
    pub required: RequiredSteel,
    pub as_use: f64,
    pub d_eff: f64,
    pub d_t: f64,
    pub mu_nmm: f64,
    /// Design moment strength φMn
    pub mr_nmm: f64,
    /// `Mr/Mu`, absent when there is no moment demand
    pub safety_factor: Option<f64>,
    pub ratio: RatioCheck,
    pub ductility: Option<DuctilityLimit>,
    pub verdict: Verdict,
}

impl FlexureResult {
    /// All-zero result for a section that cannot be checked
    pub fn degenerate(section: &Section) -> Self {
        FlexureResult {
            beta1: 0.0,
            ecu: 0.0,
            fs_design: 0.0,
            block: 0.0,
            tension_force: 0.0,
            compression_per_mm: 0.0,
            a: 0.0,
            c: 0.0,
            eps_y: 0.0,
            eps_t: 0.0,
            regime: DuctilityRegime::CompressionControlled,
            phi: 0.0,
            required: RequiredSteel::Required(0.0),
            as_use: 0.0,
            d_eff: 0.0,
            d_t: 0.0,
            mu_nmm: section.mu_nmm,
            mr_nmm: 0.0,
            safety_factor: None,
            ratio: RatioCheck::zero(),
            ductility: None,
            verdict: Verdict::NotChecked,
        }
    }

    /// Design strength meets the demand
    pub fn passes(&self) -> bool {
        self.verdict == Verdict::Ok
    }

    /// `As_use / As_req`, 0 when nothing is required or the demand is infeasible
    pub fn usage_ratio(&self) -> f64 {
        match self.required {
            RequiredSteel::Required(req) if req > 0.0 => self.as_use / req,
            _ => 0.0,
        }
    }
}

/// Run the flexure check.
pub fn calculate(section: &Section, rule: &dyn CodeRule) -> FlexureResult {
    if section.is_degenerate() {
        return FlexureResult::degenerate(section);
    }

    let fck = section.fck();
    let fy = section.fy();
    let b = section.b;
    let d_eff = section.d_eff;
    let as_use = section.as_use;
    let mu = section.mu_nmm.max(0.0);

    let beta1 = rule.beta1(fck);
    let ecu = rule.ultimate_strain(fck);
    let fs = rule.design_steel_stress(fy);
    let block = rule.stress_block_intensity(fck);

    let a = stress_block_depth(as_use, fs, block, b);
    let c = div_or(a, beta1, 0.0);
    let eps_y = section.steel.yield_strain();
    let eps_t = tension_strain(ecu, section.d_t, c);
    let regime = DuctilityRegime::classify(eps_t, eps_y);
    let phi = rule.flexure_phi(eps_t, eps_y, section.phi_f_base);

    let required = match required_steel_area(mu, phi, fs, block, b, d_eff) {
        Some(area) => RequiredSteel::Required(area),
        None => RequiredSteel::Infeasible,
    };

    let bd = b * d_eff;
    let (rho_min_yield, rho_min_strength) = rho_min(fck, fy);
    let rho_min = rho_min_yield.max(rho_min_strength);
    let rho_b = rho_balanced(beta1, fck, fy);
    let rho_max = rho_max(rho_b);
    let rho_use = section.rho_use();
    let rho_req_four_thirds = required.area().map(|req| 4.0 / 3.0 * div_or(req, bd, 0.0));
    let (condition, min_via_fallback) = classify_ratio(rho_use, rho_min, rho_max, rho_req_four_thirds);

    let mr = resisting_moment(phi, as_use, fs, d_eff, a);
    let safety_factor = (mu > 0.0).then(|| mr / mu);

    let ductility = rule.ductility_limit(fck, d_eff).map(|c_max| DuctilityLimit {
        c_max,
        satisfied: c <= c_max,
        verified: false,
    });

    let verdict = Verdict::from_pass(required.is_feasible() && mr >= mu);

    debug!(
        code = %rule.code(),
        a, c, eps_t, phi, mr, ?required,
        "flexure check"
    );

    FlexureResult {
        beta1,
        ecu,
        fs_design: fs,
        block,
        tension_force: as_use * fs,
        compression_per_mm: block * b,
        a,
        c,
        eps_y,
        eps_t,
        regime,
        phi,
        required,
        as_use,
        d_eff,
        d_t: section.d_t,
        mu_nmm: mu,
        mr_nmm: mr,
        safety_factor,
        ratio: RatioCheck {
            rho_min_yield,
            rho_min_strength,
            rho_min,
            rho_balanced: rho_b,
            rho_max,
            rho_use,
            rho_req_four_thirds,
            condition,
            min_via_fallback,
            verdict: Verdict::from_pass(condition == RatioCondition::Both),
        },
        ductility,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::DesignCode;
    use crate::materials::BarSize;
    use crate::project::MaterialInput;
    use crate::section::RowInput;

    fn reference_section() -> Section {
        let row = RowInput {
            mu: 450.0,
            h: 600.0,
            b: 400.0,
            dc: 60.0,
            as_dia: BarSize(25),
            as_num: 6.0,
            ..Default::default()
        };
        Section::from_row(&row, &MaterialInput::default()).unwrap()
    }

    #[test]
    fn test_reference_fixture() {
        let result = calculate(&reference_section(), DesignCode::Kci2012.rule());

        // a = 3040.2·400 / (0.85·35·400)
        assert!((result.a - 102.19).abs() < 0.01);
        assert!((result.beta1 - 0.801).abs() < 1e-12);
        assert!(result.eps_t > 0.005);
        assert_eq!(result.phi, 0.85);

        let as_req = result.required.area().unwrap();
        assert!(as_req > 0.0 && as_req < result.as_use);
        assert!(result.safety_factor.unwrap() >= 1.0);
        assert_eq!(result.verdict, Verdict::Ok);
        assert_eq!(result.ratio.condition, RatioCondition::Both);
        assert!(result.ductility.is_none());
    }

    #[test]
    fn test_no_steel_is_compression_controlled() {
        let mut section = reference_section();
        section.as_use = 0.0;
        let result = calculate(&section, DesignCode::Kci2012.rule());
        assert_eq!(result.a, 0.0);
        assert_eq!(result.c, 0.0);
        assert_eq!(result.eps_t, 0.0);
        assert_eq!(result.phi, 0.65);
        assert_eq!(result.regime, DuctilityRegime::CompressionControlled);
        assert_eq!(result.mr_nmm, 0.0);
        assert_eq!(result.verdict, Verdict::Ng);
    }

    #[test]
    fn test_infeasible_moment() {
        let mut section = reference_section();
        section.mu_nmm = 1.0e10;
        let result = calculate(&section, DesignCode::Kci2012.rule());
        assert_eq!(result.required, RequiredSteel::Infeasible);
        assert!(result.ratio.rho_req_four_thirds.is_none());
        assert_eq!(result.usage_ratio(), 0.0);
        assert_eq!(result.verdict, Verdict::Ng);
    }

    #[test]
    fn test_zero_moment() {
        let mut section = reference_section();
        section.mu_nmm = 0.0;
        let result = calculate(&section, DesignCode::Kci2012.rule());
        assert_eq!(result.required, RequiredSteel::Required(0.0));
        assert!(result.safety_factor.is_none());
        assert_eq!(result.verdict, Verdict::Ok);
    }

    #[test]
    fn test_degenerate_section() {
        let mut section = reference_section();
        section.h = 0.0;
        let result = calculate(&section, DesignCode::Kci2012.rule());
        assert_eq!(result.mr_nmm, 0.0);
        assert_eq!(result.phi, 0.0);
        assert_eq!(result.verdict, Verdict::NotChecked);
    }

    #[test]
    fn test_constant_phi_rule() {
        let mut section = reference_section();
        section.as_use = 12_000.0;
        let interpolated = calculate(&section, DesignCode::Kci2012.rule());
        let constant = calculate(&section, DesignCode::KciBasic.rule());
        assert!(interpolated.phi < 0.85);
        assert_eq!(constant.phi, 0.85);
    }

    #[test]
    fn test_partial_factor_code() {
        let result = calculate(&reference_section(), DesignCode::Kds24.rule());
        assert_eq!(result.phi, 1.0);
        assert!((result.fs_design - 360.0).abs() < 1e-9);
        assert!((result.block - 0.85 * 0.65 * 35.0).abs() < 1e-9);
        assert_eq!(result.ecu, 0.0033);
        let ductility = result.ductility.unwrap();
        assert!((ductility.c_max - 0.4 * 540.0).abs() < 1e-9);
        assert!(!ductility.verified);
    }

    #[test]
    fn test_ratio_classification() {
        let (rho_min, rho_max) = (0.004, 0.03);
        assert_eq!(classify_ratio(0.01, rho_min, rho_max, Some(0.005)), (RatioCondition::Both, false));
        assert_eq!(classify_ratio(0.04, rho_min, rho_max, Some(0.05)), (RatioCondition::MinOnly, false));
        assert_eq!(classify_ratio(0.002, rho_min, rho_max, Some(0.003)), (RatioCondition::MaxOnly, false));
        assert_eq!(classify_ratio(0.002, rho_min, rho_max, Some(0.001)), (RatioCondition::Both, true));
        assert_eq!(classify_ratio(0.002, rho_min, 0.001, None), (RatioCondition::Neither, false));
    }

    #[test]
    fn test_regime_boundaries() {
        assert_eq!(DuctilityRegime::classify(0.005, 0.002), DuctilityRegime::TensionControlled);
        assert_eq!(DuctilityRegime::classify(0.002, 0.002), DuctilityRegime::CompressionControlled);
        assert_eq!(DuctilityRegime::classify(0.003, 0.002), DuctilityRegime::Transition);
    }
}
