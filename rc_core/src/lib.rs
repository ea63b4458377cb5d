//! # rc_core - Reinforced Concrete Beam Section Check Engine
//!
//! `rc_core` checks rectangular reinforced-concrete beam sections against the
//! Korean concrete design codes: flexural strength with a strain-dependent
//! strength reduction factor, shear (simplified or partial-factor), and crack
//! control at service load. All inputs and outputs are JSON-serializable so
//! the engine can sit behind a spreadsheet add-in or a command line.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from a section to a decision record
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Row Isolation**: One bad row never aborts a batch
//!
//! ## Quick Start
//!
//! ```rust
//! use rc_core::batch::{evaluate_batch, BatchRequest, RowOutcome};
//!
//! let request = BatchRequest::from_json(r#"{
//!     "material": {"fck": 35, "fy": 400},
//!     "rows": [{"Mu": 450, "Vu": 150, "Ms": 300, "H": 600, "B": 400, "Dc": 60,
//!               "as_dia": 25, "as_num": 6, "av_dia": 13, "av_leg": 2}]
//! }"#).unwrap();
//!
//! let results = evaluate_batch(&request);
//! let RowOutcome::Ok(summary) = &results[0] else { panic!() };
//! assert!(summary.mr >= 450.0);
//! ```
//!
//! ## Modules
//!
//! - [`batch`] - Batch requests and per-row result records
//! - [`calculations`] - Flexure, shear and serviceability checks
//! - [`codes`] - Design code editions and their rules
//! - [`equations`] - Closed-form code equations
//! - [`materials`] - Concrete, reinforcement and bar tables
//! - [`section`] - Row input and the derived section geometry
//! - [`report`] - Text reports and workbook export
//! - [`project`] - Project metadata, materials and settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod batch;
pub mod calculations;
pub mod codes;
pub mod equations;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod materials;
pub mod project;
pub mod report;
pub mod section;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use batch::{evaluate_batch, BatchRequest, RowOutcome, RowSummary};
pub use calculations::{check, BeamCheck, Verdict};
pub use codes::{CodeRule, DesignCode, Exposure};
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_request, save_json, FileLock};
pub use project::{DesignSettings, MaterialInput, ProjectInfo};
pub use section::{RowInput, Section};
