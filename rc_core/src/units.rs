//! # Unit Types
//!
//! Type-safe wrappers for SI engineering units. They stay lightweight (plain
//! f64 newtypes) and serialize as bare numbers.
//!
//! ## Conventions
//!
//! Requests and result records use the units an engineer reads off an
//! analysis model: kilonewton-meters (kN·m) and kilonewtons (kN). Lengths
//! stay in millimeters and stresses in MPa as plain `f64`.
//!
//! The check engines work in N and N·mm so that stresses in MPa combine with
//! millimeter geometry without further factors.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::units::{KiloNewtonMeters, NewtonMillimeters};
//!
//! let mu = KiloNewtonMeters(450.0);
//! let mu_nmm: NewtonMillimeters = mu.into();
//! assert_eq!(mu_nmm.0, 450.0e6);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Force
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons (1 kN = 1000 N)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1.0e3)
    }
}

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1.0e3)
    }
}

// ============================================================================
// Moment
// ============================================================================

/// Moment in newton-millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMillimeters(pub f64);

/// Moment in kilonewton-meters (1 kN·m = 1e6 N·mm)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

impl From<KiloNewtonMeters> for NewtonMillimeters {
    fn from(knm: KiloNewtonMeters) -> Self {
        NewtonMillimeters(knm.0 * 1.0e6)
    }
}

impl From<NewtonMillimeters> for KiloNewtonMeters {
    fn from(nmm: NewtonMillimeters) -> Self {
        KiloNewtonMeters(nmm.0 / 1.0e6)
    }
}
