//! Structural Steel Strengths (KDS 14 31 05)
//!
//! Yield and tensile strengths of rolled structural steel (Table 3.4-1) and
//! steel pipe (Table 3.4-2). Yield strength drops with plate thickness, so
//! every grade carries a list of thickness bands.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::materials::steel::steel_yield;
//!
//! let sm355 = steel_yield("SM355", 25.0).unwrap();
//! assert_eq!(sm355.fy_mpa, 345.0);
//! assert_eq!(sm355.fu_mpa, 490.0);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Yield and tensile strength of a steel grade at a given thickness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelStrength {
    /// Yield strength Fy (MPa)
    pub fy_mpa: f64,
    /// Tensile strength Fu (MPa)
    pub fu_mpa: f64,
}

/// One grade row: yield strength per thickness band plus tensile strength.
///
/// `bands` holds `(upper thickness bound in mm, Fy)` in ascending order. A
/// `None` yield means the grade is not produced in that thickness.
#[derive(Debug)]
struct GradeRow {
    bands: Vec<(f64, Option<f64>)>,
    fu: f64,
}

impl GradeRow {
    fn strength(&self, grade: &str, thickness_mm: f64) -> CalcResult<SteelStrength> {
        let band = self
            .bands
            .iter()
            .find(|(upper, _)| thickness_mm <= *upper)
            .ok_or_else(|| {
                CalcError::invalid_input(
                    "thickness",
                    thickness_mm.to_string(),
                    format!("{grade} is not tabulated at this thickness"),
                )
            })?;
        let fy = band.1.ok_or_else(|| {
            CalcError::invalid_input(
                "thickness",
                thickness_mm.to_string(),
                format!("{grade} is not produced at this thickness"),
            )
        })?;
        Ok(SteelStrength { fy_mpa: fy, fu_mpa: self.fu })
    }
}

/// Thickness bands of Table 3.4-1, first group: 16 / 40 / 75 / 100 / over
const ROLLED_BANDS: [f64; 5] = [16.0, 40.0, 75.0, 100.0, f64::INFINITY];

fn rolled(fy: [Option<f64>; 5], fu: f64) -> GradeRow {
    GradeRow {
        bands: ROLLED_BANDS.iter().copied().zip(fy).collect(),
        fu,
    }
}

fn up_to(limit: f64, fy: f64, fu: f64) -> GradeRow {
    GradeRow {
        bands: vec![(limit, Some(fy))],
        fu,
    }
}

fn two_band(limits: [f64; 2], fy: [Option<f64>; 2], fu: f64) -> GradeRow {
    GradeRow {
        bands: limits.iter().copied().zip(fy).collect(),
        fu,
    }
}

static STRUCTURAL_STEEL: Lazy<HashMap<&'static str, GradeRow>> = Lazy::new(|| {
    let mut table = HashMap::new();

    // General structural / weldable grades (yield drops with thickness)
    table.insert("SS235", rolled([Some(235.0), Some(225.0), Some(205.0), Some(205.0), Some(195.0)], 330.0));
    table.insert("SS275", rolled([Some(275.0), Some(265.0), Some(245.0), Some(245.0), Some(235.0)], 410.0));
    table.insert("SM275", rolled([Some(275.0), Some(265.0), Some(255.0), Some(245.0), Some(235.0)], 410.0));
    table.insert("SMA275", rolled([Some(275.0), Some(265.0), Some(255.0), Some(245.0), Some(235.0)], 410.0));
    table.insert("SS315", rolled([Some(315.0), Some(305.0), Some(295.0), Some(295.0), Some(275.0)], 490.0));
    table.insert("SM355", rolled([Some(355.0), Some(345.0), Some(335.0), Some(325.0), Some(305.0)], 490.0));
    table.insert("SMA355", rolled([Some(355.0), Some(345.0), Some(335.0), Some(325.0), Some(305.0)], 490.0));
    table.insert("SS410", rolled([Some(410.0), Some(400.0), None, None, None], 540.0));
    table.insert("SM420", rolled([Some(420.0), Some(410.0), Some(400.0), Some(390.0), Some(380.0)], 520.0));
    table.insert("SS450", rolled([Some(450.0), Some(440.0), None, None, None], 590.0));
    table.insert("SM460", rolled([Some(460.0), Some(450.0), Some(430.0), Some(420.0), None], 570.0));
    table.insert("SMA460", rolled([Some(460.0), Some(450.0), Some(430.0), Some(420.0), None], 570.0));
    table.insert("SS550", rolled([Some(550.0), Some(540.0), None, None, None], 690.0));

    // Bridge high-performance and TMC grades (single value up to 100 mm)
    table.insert("HSB380", up_to(100.0, 380.0, 500.0));
    table.insert("HSM500", up_to(100.0, 380.0, 500.0));
    table.insert("HSB460", up_to(100.0, 460.0, 600.0));
    table.insert("HSB690", up_to(100.0, 690.0, 800.0));
    table.insert("HSA650", up_to(100.0, 650.0, 800.0));
    table.insert("SM275-TMC", up_to(100.0, 275.0, 410.0));
    table.insert("SM355-TMC", up_to(100.0, 355.0, 490.0));
    table.insert("SM420-TMC", up_to(100.0, 420.0, 520.0));
    table.insert("SM460-TMC", up_to(100.0, 460.0, 570.0));

    // Building structural grades (40 / 100 mm bands)
    table.insert("SN275", two_band([40.0, 100.0], [Some(275.0), Some(255.0)], 410.0));
    table.insert("SN355", two_band([40.0, 100.0], [Some(355.0), Some(335.0)], 490.0));
    table.insert("SN460", two_band([40.0, 100.0], [Some(460.0), Some(440.0)], 570.0));
    table.insert("SHN275", two_band([40.0, 100.0], [Some(275.0), Some(275.0)], 410.0));
    table.insert("SHN355", two_band([40.0, 100.0], [Some(355.0), Some(355.0)], 490.0));
    table.insert("SHN420", two_band([40.0, 100.0], [Some(420.0), Some(420.0)], 520.0));
    table.insert("SHN460", two_band([40.0, 100.0], [Some(460.0), Some(460.0)], 570.0));

    table
});

static STEEL_PIPE: Lazy<HashMap<&'static str, GradeRow>> = Lazy::new(|| {
    let mut table = HashMap::new();

    for (grade, fy, fu) in [
        ("SGT275", 275.0, 410.0),
        ("SRT275", 275.0, 410.0),
        ("STP275", 275.0, 410.0),
        ("SGT355", 355.0, 500.0),
        ("SRT355", 355.0, 500.0),
        ("STP355", 355.0, 500.0),
        ("SGT410", 410.0, 540.0),
        ("SRT410", 410.0, 540.0),
        ("STP380", 380.0, 500.0),
        ("STKM500", 380.0, 500.0),
        ("SGT450", 450.0, 590.0),
        ("SRT450", 450.0, 590.0),
        ("STP450", 450.0, 590.0),
        ("SGT550", 550.0, 690.0),
        ("SRT550", 550.0, 690.0),
        ("STP550", 550.0, 690.0),
        ("SHT410", 410.0, 550.0),
        ("SHT460", 460.0, 590.0),
        ("SKY400", 235.0, 400.0),
        ("SKY490", 315.0, 490.0),
    ] {
        table.insert(grade, up_to(f64::INFINITY, fy, fu));
    }

    for (grade, fy40, fy100, fu) in [
        ("SNT275E", Some(275.0), Some(255.0), 410.0),
        ("SNT275A", Some(275.0), Some(255.0), 410.0),
        ("SNT355E", Some(355.0), Some(335.0), 490.0),
        ("SNT355A", Some(355.0), Some(335.0), 490.0),
        ("SNT460E", Some(460.0), Some(440.0), 570.0),
        ("SNT460A", Some(460.0), Some(440.0), 570.0),
        ("SNRT295E", Some(295.0), None, 410.0),
        ("SNRT360E", Some(360.0), None, 490.0),
        ("SNRT275A", Some(275.0), None, 410.0),
        ("SNRT355A", Some(355.0), None, 490.0),
    ] {
        table.insert(grade, two_band([40.0, 100.0], [fy40, fy100], fu));
    }

    table
});

/// Normalize a grade string for lookup (`"sm 355"` → `"SM355"`)
fn normalize_grade(grade: &str) -> String {
    grade.trim().to_uppercase().replace([' ', '_'], "")
}

/// Look up Fy and Fu for a rolled structural steel grade.
///
/// # Errors
///
/// * `MaterialNotFound` - grade is not in Table 3.4-1
/// * `InvalidInput` - grade is not produced/tabulated at `thickness_mm`
pub fn steel_yield(grade: &str, thickness_mm: f64) -> CalcResult<SteelStrength> {
    let key = normalize_grade(grade);
    STRUCTURAL_STEEL
        .get(key.as_str())
        .ok_or_else(|| CalcError::material_not_found(grade))?
        .strength(&key, thickness_mm)
}

/// Look up Fy and Fu for a steel pipe grade (Table 3.4-2).
pub fn pipe_yield(grade: &str, thickness_mm: f64) -> CalcResult<SteelStrength> {
    let key = normalize_grade(grade);
    STEEL_PIPE
        .get(key.as_str())
        .ok_or_else(|| CalcError::material_not_found(grade))?
        .strength(&key, thickness_mm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thickness_bands() {
        assert_eq!(steel_yield("SM355", 16.0).unwrap().fy_mpa, 355.0);
        assert_eq!(steel_yield("SM355", 16.5).unwrap().fy_mpa, 345.0);
        assert_eq!(steel_yield("SM355", 40.0).unwrap().fy_mpa, 345.0);
        assert_eq!(steel_yield("SM355", 60.0).unwrap().fy_mpa, 335.0);
        assert_eq!(steel_yield("SM355", 90.0).unwrap().fy_mpa, 325.0);
        assert_eq!(steel_yield("SM355", 120.0).unwrap().fy_mpa, 305.0);
    }

    #[test]
    fn test_grade_not_produced_at_thickness() {
        let err = steel_yield("SS410", 50.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_bridge_grade_beyond_table() {
        assert_eq!(steel_yield("HSB460", 80.0).unwrap().fu_mpa, 600.0);
        assert!(steel_yield("HSB460", 120.0).is_err());
    }

    #[test]
    fn test_unknown_grade() {
        let err = steel_yield("SS999", 10.0).unwrap_err();
        assert_eq!(err, CalcError::material_not_found("SS999"));
    }

    #[test]
    fn test_grade_normalization() {
        assert_eq!(steel_yield("sm 420", 10.0).unwrap().fy_mpa, 420.0);
        assert_eq!(steel_yield("SM355-TMC", 30.0).unwrap().fy_mpa, 355.0);
    }

    #[test]
    fn test_pipe_grades() {
        assert_eq!(pipe_yield("STP355", 12.0).unwrap().fy_mpa, 355.0);
        assert_eq!(pipe_yield("SNT355E", 50.0).unwrap().fy_mpa, 335.0);
        assert!(pipe_yield("SNRT295E", 50.0).is_err());
    }
}
