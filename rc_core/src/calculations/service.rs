//! # Crack Control Check
//!
//! Service-load stress in the tension steel from a cracked transformed
//! section, and the bar spacing limit that follows from it:
//!
//! ```text
//! χ    = −n·As/B + (n·As/B)·√(1 + 2·B·d/(n·As))
//! fs   = Ms / [As·(d − χ/3)]
//! Sa   = min(375·Kcr/fs − 2.5·Cc, 300·Kcr/fs)
//! ```
//!
//! The check passes when the center-to-center spacing of the outermost
//! layer does not exceed `Sa`. Without steel or without a concrete modulus
//! the check is reported as not checked rather than passed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Verdict;
use crate::codes::{CodeRule, Exposure};
use crate::equations::crack::{bar_spacing, clear_cover, cracked_neutral_axis, service_steel_stress, spacing_limits};
use crate::project::DesignSettings;
use crate::section::Section;

/// Results of the crack control check. Lengths in mm, stresses in MPa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResult {
    /// Modular ratio n = Es/Ec (rounded by some codes)
    pub modular_ratio: f64,
    pub ec_mpa: f64,
    /// Cracked neutral-axis depth χ
    pub chi: f64,
    /// Steel stress under service moment
    pub fs: f64,
    pub exposure: Exposure,
    pub kcr: f64,
    /// Clear cover of the outermost layer Cc
    pub cc: f64,
    /// `375·Kcr/fs − 2.5·Cc`, absent when the steel is unstressed
    pub s_limit_1: Option<f64>,
    /// `300·Kcr/fs`
    pub s_limit_2: Option<f64>,
    /// Governing limit Sa
    pub s_allow: Option<f64>,
    /// Actual bar spacing of the outermost layer
    pub s_use: f64,
    pub ms_nmm: f64,
    pub verdict: Verdict,
}

impl ServiceResult {
    fn not_checked(section: &Section, settings: &DesignSettings) -> Self {
        ServiceResult {
            modular_ratio: 0.0,
            ec_mpa: section.concrete.ec_mpa,
            chi: 0.0,
            fs: 0.0,
            exposure: settings.exposure,
            kcr: settings.exposure.kcr(),
            cc: 0.0,
            s_limit_1: None,
            s_limit_2: None,
            s_allow: None,
            s_use: 0.0,
            ms_nmm: section.ms_nmm,
            verdict: Verdict::NotChecked,
        }
    }

    pub fn passes(&self) -> bool {
        self.verdict == Verdict::Ok
    }
}

/// Run the crack control check.
pub fn calculate(section: &Section, rule: &dyn CodeRule, settings: &DesignSettings) -> ServiceResult {
    let ec = section.concrete.ec_mpa;
    if section.is_degenerate() || section.as_use <= 0.0 || ec <= 0.0 {
        return ServiceResult::not_checked(section, settings);
    }

    let n = rule.modular_ratio(section.steel.es_mpa, ec);
    let chi = cracked_neutral_axis(n, section.as_use, section.b, section.d_eff);
    let fs = service_steel_stress(section.ms_nmm, section.as_use, section.d_eff, chi);

    let outer = section.outer_layer();
    let dia = outer.size.diameter_mm();
    let kcr = settings.exposure.kcr();
    let cc = clear_cover(outer.dc, dia);
    let limits = spacing_limits(kcr, fs, cc);
    let s_allow = limits.map(|(s1, s2)| s1.min(s2));
    let s_use = bar_spacing(section.b, settings.side_cover, dia, outer.count);

    let pass = s_allow.map_or(true, |sa| s_use <= sa);

    debug!(n, chi, fs, ?s_allow, s_use, "crack control check");

    ServiceResult {
        modular_ratio: n,
        ec_mpa: ec,
        chi,
        fs,
        exposure: settings.exposure,
        kcr,
        cc,
        s_limit_1: limits.map(|(s1, _)| s1),
        s_limit_2: limits.map(|(_, s2)| s2),
        s_allow,
        s_use,
        ms_nmm: section.ms_nmm,
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

    fn section(ms_kn_m: f64, bars: f64) -> Section {
        let row = RowInput {
            ms: ms_kn_m,
            h: 600.0,
            b: 400.0,
            dc: 60.0,
            as_dia: BarSize(25),
            as_num: bars,
            ..Default::default()
        };
        Section::from_row(&row, &MaterialInput::default()).unwrap()
    }

    fn check(section: &Section, settings: DesignSettings) -> ServiceResult {
        calculate(section, settings.code.rule(), &settings)
    }

    #[test]
    fn test_stress_and_spacing() {
        let result = check(&section(150.0, 6.0), DesignSettings::default());
        assert!(result.chi > 0.0 && result.chi < 540.0);
        assert!(result.fs > 0.0);
        // Cc = 60 − 25/2
        assert!((result.cc - 47.5).abs() < 1e-12);
        // (400 − 80 − 25)/5
        assert!((result.s_use - 59.0).abs() < 1e-12);
        let sa = result.s_allow.unwrap();
        assert_eq!(sa, result.s_limit_1.unwrap().min(result.s_limit_2.unwrap()));
        assert_eq!(result.verdict, Verdict::Ok);
    }

    #[test]
    fn test_no_service_moment_has_no_limit() {
        let result = check(&section(0.0, 6.0), DesignSettings::default());
        assert_eq!(result.fs, 0.0);
        assert!(result.s_allow.is_none());
        assert_eq!(result.verdict, Verdict::Ok);
    }

    #[test]
    fn test_no_steel_not_checked() {
        let result = check(&section(150.0, 0.0), DesignSettings::default());
        assert_eq!(result.fs, 0.0);
        assert_eq!(result.s_use, 0.0);
        assert_eq!(result.verdict, Verdict::NotChecked);
    }

    #[test]
    fn test_severe_exposure_tightens_limit() {
        let normal = check(&section(300.0, 6.0), DesignSettings::default());
        let severe = check(
            &section(300.0, 6.0),
            DesignSettings { exposure: Exposure::Severe, ..Default::default() },
        );
        assert!(severe.s_allow.unwrap() < normal.s_allow.unwrap());
    }

    #[test]
    fn test_rounded_modular_ratio() {
        let exact = check(&section(150.0, 6.0), DesignSettings::default());
        let rounded = check(
            &section(150.0, 6.0),
            DesignSettings { code: DesignCode::KciBasic, ..Default::default() },
        );
        assert_eq!(rounded.modular_ratio, exact.modular_ratio.round());
    }

    #[test]
    fn test_sparse_bars_fail() {
        // Two bars far apart under a high service moment
        let result = check(&section(200.0, 2.0), DesignSettings::default());
        assert!((result.s_use - 295.0).abs() < 1e-12);
        assert_eq!(result.verdict, Verdict::Ng);
    }
}
