//! # Design Equations
//!
//! The closed-form formulas behind the check engines, kept free of section
//! bookkeeping so each can be verified against a hand calculation.
//!
//! ## Modules
//!
//! - [`numeric`] - Quadratic root selection, interpolation, guarded division
//! - [`flexure`] - Stress block, strain-dependent φ, required steel, ratio bounds
//! - [`shear`] - Simplified and partial-factor shear capacity
//! - [`crack`] - Cracked-section steel stress and crack-control bar spacing
//!
//! ## Units and Sign Conventions
//!
//! - Lengths in mm, areas in mm², stresses in MPa
//! - Forces in N, moments in N·mm
//! - **Moment**: positive causes tension at the reinforced face
//! - **Axial force**: compression positive
//!
//! ## References
//!
//! - KCI 2012 Concrete Structural Design Code
//! - KDS 24 14 21 Concrete Bridge Design (limit state)

pub mod crack;
pub mod flexure;
pub mod numeric;
pub mod shear;

pub use crack::{bar_spacing, cracked_neutral_axis, service_steel_stress, spacing_limits};
pub use flexure::{
    beta1, phi_interpolated, required_steel_area, resisting_moment, rho_balanced, rho_max, rho_min,
    stress_block_depth, tension_strain,
};
pub use numeric::smallest_nonnegative_root;
pub use shear::{concrete_shear_simplified, stirrup_shear_simplified, stirrup_shear_limit};
