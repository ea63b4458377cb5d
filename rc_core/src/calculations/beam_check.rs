//! # Beam Section Check
//!
//! Runs the flexure, shear and crack control checks on one section and
//! merges them into a single decision record. The engines are independent
//! and each reads only the section, so the order here only matters for how
//! reports read.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::calculations::{check, SectionStatus};
//! use rc_core::project::{DesignSettings, MaterialInput};
//! use rc_core::section::{RowInput, Section};
//!
//! let row: RowInput = serde_json::from_str(
//!     r#"{"Mu": 450, "Vu": 150, "Ms": 300, "H": 600, "B": 400, "Dc": 60,
//!         "as_dia": 25, "as_num": 6, "av_dia": 13, "av_leg": 2, "av_space": 200}"#,
//! ).unwrap();
//! let section = Section::from_row(&row, &MaterialInput::default()).unwrap();
//! let result = check(&section, &DesignSettings::default());
//!
//! assert_eq!(result.status, SectionStatus::Checked);
//! assert!(result.flexure.passes());
//! assert!(result.shear.passes());
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::flexure::{self, FlexureResult};
use super::service::{self, ServiceResult};
use super::shear::{self, ShearResult};
use super::Verdict;
use crate::codes::DesignCode;
use crate::project::DesignSettings;
use crate::section::Section;

/// Whether the section could be checked at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    Checked,
    /// Non-positive geometry or effective depth; every result is zero
    Degenerate,
}

/// Decision record for one beam section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamCheck {
    pub code: DesignCode,
    pub status: SectionStatus,
    pub section: Section,
    pub flexure: FlexureResult,
    pub shear: ShearResult,
    pub service: ServiceResult,
}

impl BeamCheck {
    /// No check reported N.G
    pub fn passes(&self) -> bool {
        self.failed_checks().is_empty()
    }

    /// Verdicts in report order: flexure, ratio, shear, crack
    pub fn verdicts(&self) -> [(&'static str, Verdict); 4] {
        [
            ("flexure", self.flexure.verdict),
            ("ratio", self.flexure.ratio.verdict),
            ("shear", self.shear.verdict),
            ("crack", self.service.verdict),
        ]
    }

    /// Names of the checks that failed
    pub fn failed_checks(&self) -> Vec<&'static str> {
        self.verdicts()
            .into_iter()
            .filter(|(_, verdict)| verdict.is_failure())
            .map(|(name, _)| name)
            .collect()
    }

    /// Highest demand/capacity ratio among strength checks, if any demand exists
    pub fn governing_utilization(&self) -> Option<f64> {
        let flexure = self.flexure.safety_factor.filter(|sf| *sf > 0.0).map(|sf| 1.0 / sf);
        let shear = (self.shear.vu_n > 0.0 && self.shear.phi_vn > 0.0).then(|| self.shear.utilization());
        match (flexure, shear) {
            (Some(f), Some(s)) => Some(f.max(s)),
            (f, s) => f.or(s),
        }
    }
}

/// Check one section under the given settings.
pub fn check(section: &Section, settings: &DesignSettings) -> BeamCheck {
    let rule = settings.code.rule();
    let status = if section.is_degenerate() {
        warn!(h = section.h, b = section.b, dc = section.dc, d_eff = section.d_eff, "degenerate section geometry");
        SectionStatus::Degenerate
    } else {
        SectionStatus::Checked
    };

    let flexure = flexure::calculate(section, rule);
    if !flexure.required.is_feasible() {
        warn!(mu = section.mu_nmm, "moment demand cannot be developed by tension steel alone");
    }

    BeamCheck {
        code: settings.code,
        status,
        section: section.clone(),
        flexure,
        shear: shear::calculate(section, rule, settings),
        service: service::calculate(section, rule, settings),
    }
}
