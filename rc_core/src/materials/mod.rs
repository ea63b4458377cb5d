//! # Materials Database
//!
//! Material properties consumed by the check engines:
//!
//! - **Concrete**: elastic modulus from characteristic strength and unit weight
//! - **Reinforcement**: yield strength and the fixed steel modulus
//! - **Rebar sizes**: KS D 3504 nominal areas ([`rebar`])
//! - **Structural steel**: yield/tensile strength by grade and thickness ([`steel`])
//!
//! All lookups are pure functions over tables built once per process.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::materials::{ConcreteMaterial, RebarMaterial};
//!
//! let concrete = ConcreteMaterial::new(27.0);
//! let steel = RebarMaterial::new(400.0);
//! let n = steel.es_mpa / concrete.ec_mpa;
//! assert!(n > 7.0 && n < 9.0);
//! ```

pub mod rebar;
pub mod steel;

pub use rebar::{rebar_area, BarSize};
pub use steel::{pipe_yield, steel_yield, SteelStrength};

use serde::{Deserialize, Serialize};

/// Elastic modulus of reinforcing steel (MPa)
pub const STEEL_MODULUS_MPA: f64 = 200_000.0;

/// Default unit mass of normal-weight concrete (kg/m³)
pub const DEFAULT_CONCRETE_UNIT_WEIGHT: f64 = 2300.0;

/// Concrete elastic modulus `Ec` (MPa).
///
/// ```text
/// fck ≤ 30 MPa : Ec = 0.043 · mc^1.5 · √fck
/// fck > 30 MPa : Ec = 0.030 · mc^1.5 · √fck + 7700
/// ```
///
/// `unit_weight` is the unit mass `mc` in kg/m³. Non-positive inputs give 0,
/// which the serviceability engine treats as "not checkable".
pub fn concrete_modulus(fck: f64, unit_weight: f64) -> f64 {
    if fck <= 0.0 || unit_weight <= 0.0 {
        return 0.0;
    }
    let mc15 = unit_weight.powf(1.5);
    if fck <= 30.0 {
        0.043 * mc15 * fck.sqrt()
    } else {
        0.030 * mc15 * fck.sqrt() + 7700.0
    }
}

/// Concrete material with its derived elastic modulus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMaterial {
    /// Characteristic compressive strength fck (MPa)
    pub fck_mpa: f64,
    /// Unit mass mc (kg/m³)
    pub unit_weight: f64,
    /// Elastic modulus Ec (MPa)
    pub ec_mpa: f64,
}

impl ConcreteMaterial {
    /// Normal-weight concrete (mc = 2300 kg/m³)
    pub fn new(fck_mpa: f64) -> Self {
        Self::with_unit_weight(fck_mpa, DEFAULT_CONCRETE_UNIT_WEIGHT)
    }

    pub fn with_unit_weight(fck_mpa: f64, unit_weight: f64) -> Self {
        ConcreteMaterial {
            fck_mpa,
            unit_weight,
            ec_mpa: concrete_modulus(fck_mpa, unit_weight),
        }
    }
}

/// Reinforcing steel material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarMaterial {
    /// Yield strength fy (MPa)
    pub fy_mpa: f64,
    /// Elastic modulus Es (MPa), fixed at 200 000
    pub es_mpa: f64,
}

impl RebarMaterial {
    pub fn new(fy_mpa: f64) -> Self {
        RebarMaterial {
            fy_mpa,
            es_mpa: STEEL_MODULUS_MPA,
        }
    }

    /// Yield strain εy = fy / Es
    pub fn yield_strain(&self) -> f64 {
        if self.es_mpa > 0.0 {
            self.fy_mpa / self.es_mpa
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_modulus_low_strength() {
        // 0.043 * 2300^1.5 * sqrt(27)
        let ec = concrete_modulus(27.0, 2300.0);
        let expected = 0.043 * 2300.0_f64.powf(1.5) * 27.0_f64.sqrt();
        assert!((ec - expected).abs() < 1e-6);
        assert!(ec > 24_000.0 && ec < 25_000.0);
    }

    #[test]
    fn test_concrete_modulus_high_strength() {
        let ec = concrete_modulus(35.0, 2300.0);
        let expected = 0.030 * 2300.0_f64.powf(1.5) * 35.0_f64.sqrt() + 7700.0;
        assert!((ec - expected).abs() < 1e-6);
    }

    #[test]
    fn test_concrete_modulus_guards() {
        assert_eq!(concrete_modulus(0.0, 2300.0), 0.0);
        assert_eq!(concrete_modulus(27.0, -1.0), 0.0);
    }

    #[test]
    fn test_yield_strain() {
        let steel = RebarMaterial::new(400.0);
        assert!((steel.yield_strain() - 0.002).abs() < 1e-12);
    }
}
