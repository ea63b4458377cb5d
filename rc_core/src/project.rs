//! # Project Data Structures
//!
//! Request-level data shared by every row of a batch: project header,
//! material strengths and the design settings.
//!
//! ## Structure
//!
//! ```text
//! BatchRequest
//! ├── version: schema version (optional)
//! ├── project: ProjectInfo (engineer, job id, client)
//! ├── material: MaterialInput (fck, fy, φ factors, unit weight)
//! ├── settings: DesignSettings (code, exposure, side cover, strut angle)
//! └── rows: one entry per beam section
//! ```
//!
//! Every field has a default so a bare `{"rows": [...]}` is a valid request.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::project::{DesignSettings, MaterialInput};
//! use rc_core::codes::DesignCode;
//!
//! let material: MaterialInput = serde_json::from_str(r#"{"fck": 27}"#).unwrap();
//! assert_eq!(material.fck, 27.0);
//! assert_eq!(material.fy, 400.0);
//!
//! let settings = DesignSettings::default();
//! assert_eq!(settings.code, DesignCode::Kci2012);
//! ```

use serde::{Deserialize, Serialize};

use crate::codes::{DesignCode, Exposure};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{ConcreteMaterial, RebarMaterial, DEFAULT_CONCRETE_UNIT_WEIGHT};

/// Current schema version of batch requests
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Project header printed on reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,
}

impl ProjectInfo {
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        ProjectInfo {
            engineer: engineer.into(),
            job_id: job_id.into(),
            client: client.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.engineer.is_empty() && self.job_id.is_empty() && self.client.is_empty()
    }
}

/// Material strengths and base resistance factors for a batch.
///
/// ## JSON Example
///
/// ```json
/// { "fck": 35, "fy": 400, "phi_s": 0.85, "phi_v": 0.75 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialInput {
    /// Concrete characteristic strength (MPa)
    pub fck: f64,

    /// Reinforcement yield strength (MPa)
    pub fy: f64,

    /// Base flexural resistance factor
    pub phi_s: f64,

    /// Shear resistance factor
    pub phi_v: f64,

    /// Concrete unit mass (kg/m³)
    pub unit_weight: f64,
}

impl Default for MaterialInput {
    fn default() -> Self {
        MaterialInput {
            fck: 35.0,
            fy: 400.0,
            phi_s: 0.85,
            phi_v: 0.75,
            unit_weight: DEFAULT_CONCRETE_UNIT_WEIGHT,
        }
    }
}

impl MaterialInput {
    /// Reject values no section check can use.
    ///
    /// Zero strengths are allowed and mark every section degenerate (see
    /// [`crate::section::Section::is_degenerate`]); negative or non-finite
    /// values point at a broken request.
    pub fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("material.fck", self.fck),
            ("material.fy", self.fy),
            ("material.phi_s", self.phi_s),
            ("material.phi_v", self.phi_v),
            ("material.unit_weight", self.unit_weight),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a non-negative number",
                ));
            }
        }
        if self.phi_s > 1.0 || self.phi_v > 1.0 {
            return Err(CalcError::invalid_input(
                "material.phi_s/phi_v",
                format!("{}/{}", self.phi_s, self.phi_v),
                "Resistance factors cannot exceed 1.0",
            ));
        }
        Ok(())
    }

    pub fn concrete(&self) -> ConcreteMaterial {
        ConcreteMaterial::with_unit_weight(self.fck, self.unit_weight)
    }

    pub fn rebar(&self) -> RebarMaterial {
        RebarMaterial::new(self.fy)
    }
}

/// Design settings for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Design code variant
    pub code: DesignCode,

    /// Exposure condition for crack control
    pub exposure: Exposure,

    /// Side cover to the outer bar face, used for bar spacing (mm)
    pub side_cover: f64,

    /// Concrete strut angle for partial-factor shear (degrees)
    pub strut_angle_deg: f64,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            code: DesignCode::default(),
            exposure: Exposure::default(),
            side_cover: 40.0,
            strut_angle_deg: 30.0,
        }
    }
}

impl DesignSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if !self.side_cover.is_finite() || self.side_cover < 0.0 {
            return Err(CalcError::invalid_input(
                "settings.side_cover",
                self.side_cover.to_string(),
                "Side cover must be a non-negative length",
            ));
        }
        // cot θ between 1.0 and 2.5
        if !(21.8..=45.0).contains(&self.strut_angle_deg) {
            return Err(CalcError::invalid_input(
                "settings.strut_angle_deg",
                self.strut_angle_deg.to_string(),
                "Strut angle must be between 21.8 and 45 degrees",
            ));
        }
        Ok(())
    }

    pub fn strut_angle_rad(&self) -> f64 {
        self.strut_angle_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let material: MaterialInput = serde_json::from_str("{}").unwrap();
        assert_eq!(material, MaterialInput::default());
        assert_eq!(material.phi_s, 0.85);
        assert_eq!(material.phi_v, 0.75);
        assert_eq!(material.unit_weight, 2300.0);
    }

    #[test]
    fn test_material_validation() {
        assert!(MaterialInput::default().validate().is_ok());

        let negative = MaterialInput { fck: -1.0, ..Default::default() };
        assert!(negative.validate().is_err());

        let factor = MaterialInput { phi_v: 1.2, ..Default::default() };
        assert!(factor.validate().is_err());
    }

    #[test]
    fn test_settings_parsing() {
        let settings: DesignSettings =
            serde_json::from_str(r#"{"code": "kds-24", "exposure": "severe"}"#).unwrap();
        assert_eq!(settings.code, DesignCode::Kds24);
        assert_eq!(settings.exposure, Exposure::Severe);
        assert_eq!(settings.side_cover, 40.0);
        assert_eq!(settings.strut_angle_deg, 30.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_strut_angle_bounds() {
        let steep = DesignSettings { strut_angle_deg: 60.0, ..Default::default() };
        assert!(steep.validate().is_err());
    }

    #[test]
    fn test_project_info_serialization() {
        let info = ProjectInfo::new("Jane Engineer", "25-042", "ACME Corp");
        let json = serde_json::to_string(&info).unwrap();
        let roundtrip: ProjectInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, roundtrip);
        assert!(ProjectInfo::default().is_empty());
    }
}
