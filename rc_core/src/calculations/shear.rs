//! # Shear Check
//!
//! Shear capacity of the section with vertical stirrups. The formulation
//! comes from the code rule's [`ShearModel`]:
//!
//! - **Simplified**: `φVn = φv·(Vc + Vs)` with `Vs` capped at `(2/3)·√fck·b·d`,
//!   spacing limit `min(600, d/2)`
//! - **Partial-factor**: `Vd = min(Vcd + Vsd, Vd,max)` with a variable strut
//!   angle, spacing limit `min(600, 0.75·d)`
//!
//! Stirrups are required when the concrete alone cannot carry `Vu`. When
//! they are required the provided spacing and the stirrup contribution limit
//! are part of the verdict.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Verdict;
use crate::codes::{CodeRule, ShearModel};
use crate::equations::numeric::div_or;
use crate::equations::shear::{
    concrete_shear_partial_factor, concrete_shear_simplified, crushing_limit, max_spacing_partial_factor,
    max_spacing_simplified, required_stirrup_area_partial_factor, required_stirrup_area_simplified,
    size_factor, stirrup_shear_limit, stirrup_shear_partial_factor, stirrup_shear_simplified,
    strut_efficiency,
};
use crate::project::DesignSettings;
use crate::section::Section;

/// Cap on the longitudinal ratio in the concrete shear formula
const MAX_SHEAR_STEEL_RATIO: f64 = 0.02;

/// Lever arm as a fraction of effective depth
const LEVER_ARM_FACTOR: f64 = 0.9;

/// Intermediate values of the partial-factor formulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialFactorShearDetail {
    pub phi_c: f64,
    pub phi_s: f64,
    /// Size factor k
    pub k: f64,
    /// Longitudinal ratio, capped at 0.02
    pub rho_s: f64,
    /// Axial stress Nu/(B·H), compression positive (MPa)
    pub fn_mpa: f64,
    /// Concrete capacity before the floor
    pub vcd_formula: f64,
    pub vcd_min: f64,
    /// Lever arm z = 0.9·d
    pub z: f64,
    pub theta_deg: f64,
    /// Strut efficiency ν
    pub nu: f64,
}

/// Results of the shear check. Forces in N, areas in mm², lengths in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearResult {
    pub model: ShearModel,
    /// Member shear factor (1.0 under partial factors)
    pub phi_v: f64,
    pub d_eff: f64,
    pub vu_n: f64,
    /// Concrete contribution (nominal Vc, or design Vcd after the floor)
    pub vc: f64,
    /// Design concrete capacity φ·Vc
    pub phi_vc: f64,
    pub stirrups_required: bool,
    pub av_req: f64,
    pub av_use: f64,
    pub spacing: f64,
    pub spacing_max: f64,
    /// Stirrup contribution (nominal Vs, or design Vsd)
    pub vs: f64,
    /// Upper limit: Vs,max for simplified, crushing Vd,max for partial-factor
    pub vs_max: f64,
    /// Design shear capacity
    pub phi_vn: f64,
    pub spacing_ok: bool,
    pub within_limit: bool,
    pub partial_factor: Option<PartialFactorShearDetail>,
    pub verdict: Verdict,
}

impl ShearResult {
    /// All-zero result for a section that cannot be checked
    pub fn degenerate(section: &Section, rule: &dyn CodeRule) -> Self {
        ShearResult {
            model: rule.shear_model(),
            phi_v: 0.0,
            d_eff: 0.0,
            vu_n: section.vu_n,
            vc: 0.0,
            phi_vc: 0.0,
            stirrups_required: false,
            av_req: 0.0,
            av_use: 0.0,
            spacing: 0.0,
            spacing_max: 0.0,
            vs: 0.0,
            vs_max: 0.0,
            phi_vn: 0.0,
            spacing_ok: false,
            within_limit: false,
            partial_factor: None,
            verdict: Verdict::NotChecked,
        }
    }

    pub fn passes(&self) -> bool {
        self.verdict == Verdict::Ok
    }

    /// `Vu / φVn`
    pub fn utilization(&self) -> f64 {
        div_or(self.vu_n, self.phi_vn, 0.0)
    }
}

/// Run the shear check.
pub fn calculate(section: &Section, rule: &dyn CodeRule, settings: &DesignSettings) -> ShearResult {
    if section.b <= 0.0 || section.is_degenerate() {
        return ShearResult::degenerate(section, rule);
    }

    let result = match rule.shear_model() {
        ShearModel::Simplified => simplified(section, rule),
        ShearModel::PartialFactor { phi_c, phi_s } => partial_factor(section, phi_c, phi_s, settings),
    };

    debug!(
        code = %rule.code(),
        vu = result.vu_n,
        phi_vn = result.phi_vn,
        stirrups_required = result.stirrups_required,
        "shear check"
    );
    result
}

fn simplified(section: &Section, rule: &dyn CodeRule) -> ShearResult {
    let fck = section.fck();
    let fy = section.fy();
    let (b, d) = (section.b, section.d_eff);
    let vu = section.vu_n;
    let s = section.stirrups.spacing;
    let phi_v = rule.shear_phi(section.phi_v_base);

    let vc = concrete_shear_simplified(fck, b, d);
    let phi_vc = phi_v * vc;
    let stirrups_required = vu > phi_vc;

    let av_use = section.stirrups.area();
    let av_req = required_stirrup_area_simplified(vu, phi_vc, s, fy, d, phi_v);
    let spacing_max = max_spacing_simplified(d);
    let vs = stirrup_shear_simplified(av_use, fy, d, s);
    let vs_max = stirrup_shear_limit(fck, b, d);
    let phi_vn = phi_v * (vc + vs.min(vs_max));

    let spacing_ok = s > 0.0 && s <= spacing_max;
    let within_limit = vs <= vs_max;
    let pass = phi_vn >= vu && (!stirrups_required || (spacing_ok && within_limit));

    ShearResult {
        model: ShearModel::Simplified,
        phi_v,
        d_eff: d,
        vu_n: vu,
        vc,
        phi_vc,
        stirrups_required,
        av_req,
        av_use,
        spacing: s,
        spacing_max,
        vs,
        vs_max,
        phi_vn,
        spacing_ok,
        within_limit,
        partial_factor: None,
        verdict: Verdict::from_pass(pass),
    }
}

fn partial_factor(section: &Section, phi_c: f64, phi_s: f64, settings: &DesignSettings) -> ShearResult {
    let fck = section.fck();
    let fy = section.fy();
    let (b, d, h) = (section.b, section.d_eff, section.h);
    let vu = section.vu_n;
    let s = section.stirrups.spacing;
    let theta = settings.strut_angle_rad();

    let k = size_factor(d);
    let rho_s = div_or(section.as_use, b * d, 0.0).min(MAX_SHEAR_STEEL_RATIO);
    let fn_mpa = div_or(section.nu_n, b * h, 0.0);
    let (vcd_formula, vcd_min) = concrete_shear_partial_factor(phi_c, k, rho_s, fck, fn_mpa, b, d);
    let vcd = vcd_formula.max(vcd_min);
    let stirrups_required = vu > vcd;

    let z = LEVER_ARM_FACTOR * d;
    let av_use = section.stirrups.area();
    let av_req = required_stirrup_area_partial_factor(vu, vcd, s, phi_s, fy, z, theta);
    let spacing_max = max_spacing_partial_factor(d);
    let vsd = stirrup_shear_partial_factor(phi_s, fy, av_use, z, theta, s);
    let vd_max = crushing_limit(phi_c, fck, b, z, theta);
    let vd = (vcd + vsd).min(vd_max);

    let spacing_ok = s > 0.0 && s <= spacing_max;
    let within_limit = vcd + vsd <= vd_max;
    let pass = vd >= vu && (!stirrups_required || spacing_ok);

    ShearResult {
        model: ShearModel::PartialFactor { phi_c, phi_s },
        phi_v: 1.0,
        d_eff: d,
        vu_n: vu,
        vc: vcd,
        phi_vc: vcd,
        stirrups_required,
        av_req,
        av_use,
        spacing: s,
        spacing_max,
        vs: vsd,
        vs_max: vd_max,
        phi_vn: vd,
        spacing_ok,
        within_limit,
        partial_factor: Some(PartialFactorShearDetail {
            phi_c,
            phi_s,
            k,
            rho_s,
            fn_mpa,
            vcd_formula,
            vcd_min,
            z,
            theta_deg: settings.strut_angle_deg,
            nu: strut_efficiency(fck),
        }),
        verdict: Verdict::from_pass(pass),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::DesignCode;
    use crate::materials::BarSize;
    use crate::project::MaterialInput;
    use crate::section::RowInput;

    fn section_with(vu_kn: f64, legs: f64, spacing: f64) -> Section {
        let row = RowInput {
            vu: vu_kn,
            h: 600.0,
            b: 400.0,
            dc: 60.0,
            as_dia: BarSize(25),
            as_num: 6.0,
            av_dia: BarSize(13),
            av_leg: legs,
            av_space: spacing,
            ..Default::default()
        };
        let material = MaterialInput { fck: 27.0, ..Default::default() };
        Section::from_row(&row, &material).unwrap()
    }

    fn check(section: &Section, code: DesignCode) -> ShearResult {
        calculate(section, code.rule(), &DesignSettings { code, ..Default::default() })
    }

    #[test]
    fn test_concrete_alone_insufficient() {
        let result = check(&section_with(150.0, 0.0, 200.0), DesignCode::Kci2012);
        assert!(result.phi_vc < result.vu_n);
        assert!(result.stirrups_required);
        assert!(result.av_req > 0.0);
        assert_eq!(result.vs, 0.0);
        assert_eq!(result.verdict, Verdict::Ng);
    }

    #[test]
    fn test_stirrups_restore_capacity() {
        let result = check(&section_with(150.0, 2.0, 200.0), DesignCode::Kci2012);
        // Vs = 253.4·400·540/200
        assert!((result.vs - 253.4 * 400.0 * 540.0 / 200.0).abs() < 1e-6);
        assert!(result.phi_vn > result.vu_n);
        assert!(result.av_use >= result.av_req);
        assert_eq!(result.spacing_max, 270.0);
        assert_eq!(result.verdict, Verdict::Ok);
    }

    #[test]
    fn test_wide_spacing_fails() {
        let result = check(&section_with(150.0, 4.0, 300.0), DesignCode::Kci2012);
        assert!(result.phi_vn > result.vu_n);
        assert!(!result.spacing_ok);
        assert_eq!(result.verdict, Verdict::Ng);
    }

    #[test]
    fn test_low_shear_needs_no_stirrups() {
        let result = check(&section_with(50.0, 0.0, 0.0), DesignCode::Kci2012);
        assert!(!result.stirrups_required);
        assert_eq!(result.av_req, 0.0);
        assert_eq!(result.vs, 0.0);
        assert_eq!(result.verdict, Verdict::Ok);
    }

    #[test]
    fn test_degenerate_width() {
        let mut section = section_with(150.0, 2.0, 200.0);
        section.b = 0.0;
        let result = check(&section, DesignCode::Kci2012);
        assert_eq!(result.phi_vn, 0.0);
        assert_eq!(result.phi_v, 0.0);
        assert_eq!(result.spacing, 0.0);
        assert_eq!(result.verdict, Verdict::NotChecked);
    }

    #[test]
    fn test_partial_factor_formulation() {
        let result = check(&section_with(150.0, 2.0, 200.0), DesignCode::Kds24);
        let detail = result.partial_factor.unwrap();
        assert!((detail.z - 486.0).abs() < 1e-9);
        assert!((detail.k - (1.0 + (200.0f64 / 540.0).sqrt())).abs() < 1e-12);
        assert!(detail.rho_s <= 0.02);
        assert!(result.vc >= detail.vcd_min);
        assert_eq!(result.phi_v, 1.0);
        assert_eq!(result.spacing_max, 405.0);
        assert!(result.phi_vn <= result.vs_max);
        assert_eq!(result.verdict, Verdict::Ok);
    }

    #[test]
    fn test_axial_compression_raises_concrete_capacity() {
        let plain = section_with(150.0, 0.0, 200.0);
        let mut compressed = plain.clone();
        compressed.nu_n = 500_000.0;
        let a = check(&plain, DesignCode::Kds24);
        let b = check(&compressed, DesignCode::Kds24);
        assert!(b.vc > a.vc);
    }
}
