//! Deformed Reinforcing Bars (KS D 3504)
//!
//! Nominal cross-sectional areas for the standard Korean bar sizes. Bar sizes
//! are written either as the nominal diameter (`25`) or as a prefixed token
//! (`"D25"`, `"H13"`). Sizes missing from the table fall back to the area of
//! a plain circle, `π·d²/4`.

use std::collections::HashMap;
use std::f64::consts::PI;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// KS D 3504 nominal areas (mm²) keyed by nominal diameter (mm)
static KS_REBAR_AREAS: Lazy<HashMap<u32, f64>> = Lazy::new(|| {
    HashMap::from([
        (10, 71.33),
        (13, 126.7),
        (16, 198.6),
        (19, 286.5),
        (22, 387.1),
        (25, 506.7),
        (29, 642.4),
        (32, 794.2),
        (35, 956.6),
        (38, 1140.0),
        (41, 1340.0),
        (51, 2026.0),
    ])
});

/// Nominal bar diameter in millimeters.
///
/// Deserializes from either a number or a string token:
///
/// ```rust
/// use rc_core::materials::BarSize;
///
/// let a: BarSize = serde_json::from_str("25").unwrap();
/// let b: BarSize = serde_json::from_str("\"D25\"").unwrap();
/// assert_eq!(a, b);
/// assert!((a.area_mm2() - 506.7).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "BarSizeRepr", into = "u32")]
pub struct BarSize(pub u32);

/// Raw JSON forms accepted for a bar size
#[derive(Deserialize)]
#[serde(untagged)]
enum BarSizeRepr {
    Number(f64),
    Token(String),
}

impl TryFrom<BarSizeRepr> for BarSize {
    type Error = CalcError;

    fn try_from(repr: BarSizeRepr) -> CalcResult<Self> {
        match repr {
            BarSizeRepr::Number(d) => BarSize::from_diameter(d),
            BarSizeRepr::Token(s) => BarSize::parse(&s),
        }
    }
}

impl From<BarSize> for u32 {
    fn from(size: BarSize) -> Self {
        size.0
    }
}

impl BarSize {
    /// Create from a numeric diameter (fractions are truncated)
    pub fn from_diameter(d: f64) -> CalcResult<Self> {
        if !d.is_finite() || d < 0.0 {
            return Err(CalcError::invalid_input(
                "bar_size",
                d.to_string(),
                "Bar diameter must be a non-negative number",
            ));
        }
        Ok(BarSize(d as u32))
    }

    /// Parse a bar token such as `"D25"`, `"H13"` or `"19"`.
    ///
    /// Only the digits are significant; a token without digits is rejected.
    pub fn parse(s: &str) -> CalcResult<Self> {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        digits
            .parse::<u32>()
            .map(BarSize)
            .map_err(|_| CalcError::invalid_input("bar_size", s, "Bar size must contain a diameter"))
    }

    /// Nominal diameter (mm)
    pub fn diameter_mm(&self) -> f64 {
        f64::from(self.0)
    }

    /// Nominal area (mm²), from KS D 3504 or `π·d²/4` for non-standard sizes
    pub fn area_mm2(&self) -> f64 {
        rebar_area(*self)
    }

    /// Whether this size appears in the KS D 3504 table
    pub fn is_standard(&self) -> bool {
        KS_REBAR_AREAS.contains_key(&self.0)
    }

    /// Designation used in reports (e.g., "D25")
    pub fn designation(&self) -> String {
        format!("D{}", self.0)
    }
}

impl std::fmt::Display for BarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.designation())
    }
}

/// Look up the nominal area of one bar (mm²).
pub fn rebar_area(size: BarSize) -> f64 {
    KS_REBAR_AREAS
        .get(&size.0)
        .copied()
        .unwrap_or_else(|| PI * size.diameter_mm().powi(2) / 4.0)
}
