//! # Batch Evaluation
//!
//! A batch request carries shared material data and settings plus any number
//! of section rows. Rows are checked independently: a malformed row yields an
//! `{"error": ...}` record in its own position and never aborts the batch.
//!
//! With the `parallel` feature (default) rows are evaluated on the rayon
//! thread pool; results always come back in input order.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::batch::{evaluate_batch, BatchRequest, RowOutcome};
//!
//! let request = BatchRequest::from_json(r#"{
//!     "material": {"fck": 35, "fy": 400},
//!     "rows": [
//!         {"Mu": 450, "H": 600, "B": 400, "Dc": 60, "as_dia": 25, "as_num": 6},
//!         {"Mu": "lots"}
//!     ]
//! }"#).unwrap();
//!
//! let results = evaluate_batch(&request);
//! assert_eq!(results.len(), 2);
//! assert!(matches!(results[0], RowOutcome::Ok(_)));
//! assert!(matches!(results[1], RowOutcome::Err { .. }));
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculations::{check, BeamCheck, RequiredSteel, SectionStatus, Verdict};
use crate::codes::DesignCode;
use crate::errors::{CalcError, CalcResult};
use crate::project::{DesignSettings, MaterialInput, ProjectInfo, SCHEMA_VERSION};
use crate::section::{RowInput, Section};
use crate::units::{KiloNewtonMeters, KiloNewtons, NewtonMillimeters, Newtons};

// =============================================================================
// REQUEST
// =============================================================================

/// A batch of beam sections sharing material and settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Schema version of the request, checked when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub project: ProjectInfo,

    #[serde(default)]
    pub material: MaterialInput,

    #[serde(default)]
    pub settings: DesignSettings,

    /// Raw rows, parsed one at a time so a bad row stays isolated
    #[serde(default)]
    pub rows: Vec<serde_json::Value>,
}

impl BatchRequest {
    /// Parse and validate a request document.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let request: BatchRequest = serde_json::from_str(json)
            .map_err(|e| CalcError::serialization(format!("Invalid request: {}", e)))?;
        request.validate()?;
        Ok(request)
    }

    /// Batch-level validation: schema version, materials, settings.
    pub fn validate(&self) -> CalcResult<()> {
        if let Some(version) = &self.version {
            validate_version(version)?;
        }
        self.material.validate()?;
        self.settings.validate()
    }

    /// Replace the design code from the request
    pub fn with_code(mut self, code: DesignCode) -> Self {
        self.settings.code = code;
        self
    }

    /// Parse row `index` into a typed row.
    pub fn row(&self, index: usize) -> CalcResult<RowInput> {
        let raw = self
            .rows
            .get(index)
            .ok_or_else(|| CalcError::missing_field(format!("rows[{}]", index)))?;
        RowInput::deserialize(raw).map_err(|e| {
            CalcError::invalid_input(format!("rows[{}]", index), raw.to_string(), e.to_string())
        })
    }

    /// Check row `index`.
    pub fn check_row(&self, index: usize) -> CalcResult<RowCheck> {
        let input = self.row(index)?;
        let section = Section::from_row(&input, &self.material)?;
        let check = check(&section, &self.settings);
        Ok(RowCheck { input, check })
    }

    /// Check every row, in input order.
    pub fn check_all(&self) -> Vec<CalcResult<RowCheck>> {
        info!(rows = self.rows.len(), code = %self.settings.code, "checking batch");
        map_indices(self.rows.len(), |index| {
            debug!(row = index, "checking row");
            let outcome = self.check_row(index);
            if let Err(e) = &outcome {
                warn!(row = index, error = %e, "row rejected");
            }
            outcome
        })
    }
}

/// Validate a request's schema version against [`SCHEMA_VERSION`].
///
/// Major versions must match; in the 0.x series a newer minor is rejected.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn map_indices<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_indices<T, F>(count: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..count).map(f).collect()
}

/// A parsed row together with its decision record.
#[derive(Debug, Clone)]
pub struct RowCheck {
    pub input: RowInput,
    pub check: BeamCheck,
}

// =============================================================================
// RESULT RECORDS
// =============================================================================

/// Per-check verdicts of one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckVerdicts {
    pub flexure: Verdict,
    pub ratio: Verdict,
    pub shear: Verdict,
    pub crack: Verdict,
}

/// Compact result record for one row.
///
/// Areas in mm², moments in kN·m, forces in kN, stresses in MPa. Areas,
/// moments, forces and stresses are rounded to 0.1; factors and ratios
/// to 0.001.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,

    /// Required tension steel, `null` when the moment cannot be developed
    pub as_req: Option<f64>,
    pub as_used: f64,
    /// `as_used / as_req`, 0 when nothing is required
    pub as_ratio: f64,
    #[serde(rename = "Mr")]
    pub mr: f64,
    #[serde(rename = "Vn")]
    pub vn: f64,
    pub fs: f64,
    pub phi_f: f64,
    pub phi_v: f64,
    pub flexure_feasible: bool,
    pub status: SectionStatus,
    pub checks: CheckVerdicts,
}

impl RowSummary {
    pub fn from_check(row: &RowCheck) -> Self {
        let check = &row.check;
        let flexure = &check.flexure;
        let as_req = match flexure.required {
            RequiredSteel::Required(area) => Some(round_to(area, 1)),
            RequiredSteel::Infeasible => None,
        };
        RowSummary {
            name: row.input.name.clone(),
            id: row.input.id.clone(),
            as_req,
            as_used: round_to(flexure.as_use, 1),
            as_ratio: round_to(flexure.usage_ratio(), 3),
            mr: round_to(KiloNewtonMeters::from(NewtonMillimeters(flexure.mr_nmm)).0, 1),
            vn: round_to(KiloNewtons::from(Newtons(check.shear.phi_vn)).0, 1),
            fs: round_to(check.service.fs, 1),
            phi_f: round_to(flexure.phi, 3),
            phi_v: round_to(check.shear.phi_v, 3),
            flexure_feasible: flexure.required.is_feasible(),
            status: check.status,
            checks: CheckVerdicts {
                flexure: flexure.verdict,
                ratio: flexure.ratio.verdict,
                shear: check.shear.verdict,
                crack: check.service.verdict,
            },
        }
    }
}

/// One entry of the batch response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowOutcome {
    Ok(RowSummary),
    Err { error: String },
}

impl From<CalcResult<RowCheck>> for RowOutcome {
    fn from(result: CalcResult<RowCheck>) -> Self {
        match result {
            Ok(row) => RowOutcome::Ok(RowSummary::from_check(&row)),
            Err(e) => RowOutcome::Err { error: e.to_string() },
        }
    }
}

/// Evaluate every row of a request into result records.
pub fn evaluate_batch(request: &BatchRequest) -> Vec<RowOutcome> {
    request.check_all().into_iter().map(RowOutcome::from).collect()
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
