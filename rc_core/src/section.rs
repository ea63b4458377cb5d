//! # Section Model
//!
//! One rectangular beam section: geometry, materials, demand and
//! reinforcement. A [`Section`] is built once from a request row and never
//! changes afterwards; the check engines only read it.
//!
//! ```text
//!     ┌──────────────┐ ─┬─  compression face
//!     │              │  │
//!     │              │  │ d_eff = H − dc_group
//!     │              │  H
//!     │  ○   ○   ○   │  │  layer 3 (dc3)
//!     │  ○   ○   ○   │  │  layer 2 (dc2)
//!     │  ●   ●   ●   │ ─┼─ layer 1 (Dc)
//!     └──────────────┘ ─┴─ tension face
//!           B
//! ```
//!
//! Demand arrives in kN and kN·m and is stored in N and N·mm.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::project::MaterialInput;
//! use rc_core::section::{RowInput, Section};
//!
//! let row: RowInput = serde_json::from_str(
//!     r#"{"Mu": 450, "H": 600, "B": 400, "Dc": 60, "as_dia": "D25", "as_num": 6}"#,
//! ).unwrap();
//! let section = Section::from_row(&row, &MaterialInput::default()).unwrap();
//!
//! assert!((section.as_use - 6.0 * 506.7).abs() < 1e-9);
//! assert_eq!(section.d_eff, 540.0);
//! assert_eq!(section.mu_nmm, 450.0e6);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{BarSize, ConcreteMaterial, RebarMaterial};
use crate::project::MaterialInput;
use crate::units::{KiloNewtonMeters, KiloNewtons, NewtonMillimeters, Newtons};

// =============================================================================
// REQUEST ROW
// =============================================================================

/// One beam section as it appears in a batch request.
///
/// Numeric fields accept JSON numbers or numeric strings.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "G1 midspan",
///   "Mu": 450, "Vu": 150, "Nu": 0, "Ms": 300,
///   "H": 600, "B": 400, "Dc": 60,
///   "as_dia": "D25", "as_num": 6,
///   "av_dia": 13, "av_leg": 2, "av_space": 200
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowInput {
    /// Label used for report headings and sheet names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Caller's identifier, number or string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,

    /// Factored moment (kN·m)
    #[serde(rename = "Mu", default, deserialize_with = "number")]
    pub mu: f64,

    /// Factored shear (kN)
    #[serde(rename = "Vu", default, deserialize_with = "number")]
    pub vu: f64,

    /// Factored axial force, compression positive (kN)
    #[serde(rename = "Nu", default, deserialize_with = "number")]
    pub nu: f64,

    /// Service moment (kN·m)
    #[serde(rename = "Ms", default, deserialize_with = "number")]
    pub ms: f64,

    /// Overall height (mm)
    #[serde(rename = "H", default, deserialize_with = "number")]
    pub h: f64,

    /// Width (mm)
    #[serde(rename = "B", default, deserialize_with = "number")]
    pub b: f64,

    /// Tension face to first layer centroid (mm)
    #[serde(rename = "Dc", default, deserialize_with = "number")]
    pub dc: f64,

    #[serde(default = "default_main_bar")]
    pub as_dia: BarSize,

    #[serde(default, deserialize_with = "number")]
    pub as_num: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_dia2: Option<BarSize>,

    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub as_num2: Option<f64>,

    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub dc2: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_dia3: Option<BarSize>,

    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub as_num3: Option<f64>,

    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub dc3: Option<f64>,

    #[serde(default = "default_stirrup_bar")]
    pub av_dia: BarSize,

    /// Stirrup legs
    #[serde(default, deserialize_with = "number")]
    pub av_leg: f64,

    /// Stirrup spacing (mm)
    #[serde(default = "default_stirrup_spacing", deserialize_with = "number")]
    pub av_space: f64,
}

fn default_main_bar() -> BarSize {
    BarSize(25)
}

fn default_stirrup_bar() -> BarSize {
    BarSize(16)
}

fn default_stirrup_spacing() -> f64 {
    200.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            RawNumber::Number(v) => Ok(v),
            RawNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, found \"{}\"", s))),
        }
    }
}

fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    RawNumber::deserialize(deserializer)?.into_f64()
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawNumber>::deserialize(deserializer)?
        .map(RawNumber::into_f64)
        .transpose()
}

impl Default for RowInput {
    fn default() -> Self {
        RowInput {
            name: None,
            id: None,
            mu: 0.0,
            vu: 0.0,
            nu: 0.0,
            ms: 0.0,
            h: 0.0,
            b: 0.0,
            dc: 0.0,
            as_dia: default_main_bar(),
            as_num: 0.0,
            as_dia2: None,
            as_num2: None,
            dc2: None,
            as_dia3: None,
            as_num3: None,
            dc3: None,
            av_dia: default_stirrup_bar(),
            av_leg: 0.0,
            av_space: default_stirrup_spacing(),
        }
    }
}

impl RowInput {
    /// Caller's id rendered as text, if present
    pub fn id_label(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Extra layer `k` (2 or 3), `None` if it carries no bars.
    fn extra_layer(&self, k: u8) -> CalcResult<Option<RebarLayer>> {
        let (size, count, dc) = match k {
            2 => (self.as_dia2, self.as_num2, self.dc2),
            _ => (self.as_dia3, self.as_num3, self.dc3),
        };
        let count = count.unwrap_or(0.0);
        if count <= 0.0 {
            return Ok(None);
        }
        let size = size.unwrap_or(self.as_dia);
        let dc = dc.ok_or_else(|| CalcError::missing_field(format!("dc{}", k)))?;
        Ok(Some(RebarLayer { size, count, dc }))
    }
}

// =============================================================================
// REINFORCEMENT
// =============================================================================

/// One layer of tension bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarLayer {
    pub size: BarSize,
    pub count: f64,
    /// Tension face to layer centroid (mm)
    pub dc: f64,
}

impl RebarLayer {
    /// Steel area of the layer (mm²)
    pub fn area(&self) -> f64 {
        self.size.area_mm2() * self.count.max(0.0)
    }
}

/// Vertical stirrups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StirrupLayout {
    pub size: BarSize,
    pub legs: f64,
    /// Spacing along the member (mm)
    pub spacing: f64,
}

impl StirrupLayout {
    /// Provided area within one spacing `Av = area·legs`
    pub fn area(&self) -> f64 {
        self.size.area_mm2() * self.legs.max(0.0)
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// Immutable section description consumed by the check engines.
///
/// All quantities are in N, mm and MPa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Overall height H
    pub h: f64,
    /// Width B
    pub b: f64,
    /// Cover to the first layer centroid Dc
    pub dc: f64,

    pub concrete: ConcreteMaterial,
    pub steel: RebarMaterial,
    /// Base flexural resistance factor
    pub phi_f_base: f64,
    /// Base shear resistance factor
    pub phi_v_base: f64,

    pub mu_nmm: f64,
    pub vu_n: f64,
    pub nu_n: f64,
    pub ms_nmm: f64,

    /// Tension layers in input order, layer 1 always present
    pub layers: Vec<RebarLayer>,
    pub stirrups: StirrupLayout,

    /// Provided tension steel Σ area·count
    pub as_use: f64,
    /// Area-weighted centroid of the tension steel from the tension face
    pub dc_group: f64,
    /// Effective depth H − dc_group
    pub d_eff: f64,
    /// Depth of the outermost tension layer H − dc_outer
    pub d_t: f64,
    /// Index into `layers` of the outermost layer with bars
    pub outer: usize,
}

impl Section {
    /// Build the section for one request row.
    ///
    /// Fails when an extra layer has bars but no `dc`, when a bar or leg
    /// count is negative, or when stirrups are given without a positive
    /// spacing. Non-positive geometry is accepted here and reported through
    /// [`Section::is_degenerate`].
    pub fn from_row(row: &RowInput, material: &MaterialInput) -> CalcResult<Self> {
        for (field, value) in [("as_num", row.as_num), ("av_leg", row.av_leg), ("av_space", row.av_space)] {
            if value < 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must not be negative"));
            }
        }
        if row.av_leg > 0.0 && row.av_space <= 0.0 {
            return Err(CalcError::invalid_input(
                "av_space",
                row.av_space.to_string(),
                "Stirrup spacing must be positive when legs are given",
            ));
        }

        let mut layers = vec![RebarLayer {
            size: row.as_dia,
            count: row.as_num,
            dc: row.dc,
        }];
        for k in [2, 3] {
            if let Some(layer) = row.extra_layer(k)? {
                layers.push(layer);
            }
        }

        let as_use: f64 = layers.iter().map(RebarLayer::area).sum();
        let dc_group = if as_use > 0.0 {
            layers.iter().map(|l| l.area() * l.dc).sum::<f64>() / as_use
        } else {
            row.dc
        };

        let outer = layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.area() > 0.0)
            .min_by(|(_, a), (_, b)| a.dc.total_cmp(&b.dc))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let mu: NewtonMillimeters = KiloNewtonMeters(row.mu).into();
        let ms: NewtonMillimeters = KiloNewtonMeters(row.ms).into();
        let vu: Newtons = KiloNewtons(row.vu).into();
        let nu: Newtons = KiloNewtons(row.nu).into();

        Ok(Section {
            h: row.h,
            b: row.b,
            dc: row.dc,
            concrete: material.concrete(),
            steel: material.rebar(),
            phi_f_base: material.phi_s,
            phi_v_base: material.phi_v,
            mu_nmm: mu.0,
            vu_n: vu.0,
            nu_n: nu.0,
            ms_nmm: ms.0,
            as_use,
            dc_group,
            d_eff: row.h - dc_group,
            d_t: row.h - layers[outer].dc,
            outer,
            layers,
            stirrups: StirrupLayout {
                size: row.av_dia,
                legs: row.av_leg,
                spacing: row.av_space,
            },
        })
    }

    /// Non-positive H, B, Dc, effective depth or material strength: no
    /// check is meaningful.
    pub fn is_degenerate(&self) -> bool {
        self.h <= 0.0
            || self.b <= 0.0
            || self.dc <= 0.0
            || self.d_eff <= 0.0
            || self.fck() <= 0.0
            || self.fy() <= 0.0
    }

    pub fn fck(&self) -> f64 {
        self.concrete.fck_mpa
    }

    pub fn fy(&self) -> f64 {
        self.steel.fy_mpa
    }

    /// Outermost tension layer, governing strain and crack control
    pub fn outer_layer(&self) -> &RebarLayer {
        &self.layers[self.outer]
    }

    /// Provided reinforcement ratio As/(B·d)
    pub fn rho_use(&self) -> f64 {
        let bd = self.b * self.d_eff;
        if bd > 0.0 {
            self.as_use / bd
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_row() -> RowInput {
        RowInput {
            mu: 450.0,
            h: 600.0,
            b: 400.0,
            dc: 60.0,
            as_dia: BarSize(25),
            as_num: 6.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_row_defaults() {
        let row: RowInput = serde_json::from_str("{}").unwrap();
        assert_eq!(row.as_dia, BarSize(25));
        assert_eq!(row.av_dia, BarSize(16));
        assert_eq!(row.av_space, 200.0);
        assert_eq!(row.as_num, 0.0);
        assert!(row.as_num2.is_none());
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let row: RowInput = serde_json::from_str(r#"{"Mu": "450.5", "H": "600", "as_num2": "2"}"#).unwrap();
        assert_eq!(row.mu, 450.5);
        assert_eq!(row.h, 600.0);
        assert_eq!(row.as_num2, Some(2.0));
    }

    #[test]
    fn test_garbage_number_rejected() {
        let result: Result<RowInput, _> = serde_json::from_str(r#"{"H": "tall"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_single_layer_geometry() {
        let section = Section::from_row(&reference_row(), &MaterialInput::default()).unwrap();
        assert_eq!(section.layers.len(), 1);
        assert!((section.dc_group - 60.0).abs() < 1e-9);
        assert!((section.d_eff - 540.0).abs() < 1e-9);
        assert!((section.d_t - 540.0).abs() < 1e-9);
        assert!(!section.is_degenerate());
    }

    #[test]
    fn test_multi_layer_centroid() {
        let row = RowInput {
            as_dia2: Some(BarSize(25)),
            as_num2: Some(6.0),
            dc2: Some(110.0),
            ..reference_row()
        };
        let section = Section::from_row(&row, &MaterialInput::default()).unwrap();
        assert_eq!(section.layers.len(), 2);
        assert!((section.dc_group - 85.0).abs() < 1e-9);
        assert!((section.d_eff - 515.0).abs() < 1e-9);
        // strain governed by the layer nearest the tension face
        assert_eq!(section.d_t, 540.0);
        assert_eq!(section.outer, 0);
    }

    #[test]
    fn test_extra_layer_requires_dc() {
        let row = RowInput {
            as_num2: Some(3.0),
            ..reference_row()
        };
        let err = Section::from_row(&row, &MaterialInput::default()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_degenerate_geometry() {
        let row = RowInput { h: 0.0, ..reference_row() };
        let section = Section::from_row(&row, &MaterialInput::default()).unwrap();
        assert!(section.is_degenerate());

        let deep_cover = RowInput { dc: 700.0, ..reference_row() };
        assert!(Section::from_row(&deep_cover, &MaterialInput::default()).unwrap().is_degenerate());
    }

    #[test]
    fn test_zero_strength_is_degenerate() {
        let no_concrete = MaterialInput { fck: 0.0, ..Default::default() };
        assert!(Section::from_row(&reference_row(), &no_concrete).unwrap().is_degenerate());
        let no_steel = MaterialInput { fy: 0.0, ..Default::default() };
        assert!(Section::from_row(&reference_row(), &no_steel).unwrap().is_degenerate());
    }

    #[test]
    fn test_stirrup_spacing_must_be_positive() {
        let negative = RowInput { av_leg: 2.0, av_space: -200.0, ..reference_row() };
        let err = Section::from_row(&negative, &MaterialInput::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let zero = RowInput { av_leg: 2.0, av_space: 0.0, ..reference_row() };
        assert!(Section::from_row(&zero, &MaterialInput::default()).is_err());

        let no_legs = RowInput { av_leg: 0.0, av_space: 0.0, ..reference_row() };
        assert!(Section::from_row(&no_legs, &MaterialInput::default()).is_ok());

        let negative_bars = RowInput { as_num: -2.0, ..reference_row() };
        assert!(Section::from_row(&negative_bars, &MaterialInput::default()).is_err());
    }

    #[test]
    fn test_no_steel_uses_first_cover() {
        let row = RowInput { as_num: 0.0, ..reference_row() };
        let section = Section::from_row(&row, &MaterialInput::default()).unwrap();
        assert_eq!(section.as_use, 0.0);
        assert_eq!(section.dc_group, 60.0);
        assert_eq!(section.rho_use(), 0.0);
    }

    #[test]
    fn test_id_label() {
        let row: RowInput = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(row.id_label().as_deref(), Some("7"));
        let row: RowInput = serde_json::from_str(r#"{"id": "B-2"}"#).unwrap();
        assert_eq!(row.id_label().as_deref(), Some("B-2"));
    }
}
