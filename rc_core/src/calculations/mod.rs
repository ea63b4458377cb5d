//! # Section Checks
//!
//! The three check engines and the decision record that merges them. Each
//! engine follows the same pattern:
//!
//! - reads an immutable [`Section`](crate::section::Section) and the active
//!   [`CodeRule`](crate::codes::CodeRule)
//! - returns a `*Result` with every intermediate value a report needs
//! - never fails: bad geometry and unsolvable cases become explicit values
//!
//! ## Available Checks
//!
//! - [`flexure`] - Required steel, variable φ, resisting moment, ratio bounds
//! - [`shear`] - Concrete and stirrup shear capacity
//! - [`service`] - Crack control by bar spacing under service moment
//! - [`beam_check`] - Runs all three and collects the verdicts

pub mod beam_check;
pub mod flexure;
pub mod service;
pub mod shear;

use serde::{Deserialize, Serialize};

pub use beam_check::{check, BeamCheck, SectionStatus};
pub use flexure::{DuctilityRegime, FlexureResult, RatioCheck, RatioCondition, RequiredSteel};
pub use service::ServiceResult;
pub use shear::{PartialFactorShearDetail, ShearResult};

/// Outcome of one check.
///
/// Serialized as `"OK"`, `"NG"` or `"NOT_CHECKED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Ok,
    Ng,
    /// The check could not run (no steel, degenerate geometry, missing modulus)
    NotChecked,
}

impl Verdict {
    pub fn from_pass(pass: bool) -> Self {
        if pass {
            Verdict::Ok
        } else {
            Verdict::Ng
        }
    }

    /// Only `Ng` counts as a failure
    pub fn is_failure(self) -> bool {
        self == Verdict::Ng
    }

    /// Mark used in text reports
    pub fn mark(self) -> &'static str {
        match self {
            Verdict::Ok => "O.K",
            Verdict::Ng => "N.G",
            Verdict::NotChecked => "N/A",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(serde_json::to_string(&Verdict::Ok).unwrap(), "\"OK\"");
        assert_eq!(serde_json::to_string(&Verdict::Ng).unwrap(), "\"NG\"");
        assert_eq!(serde_json::to_string(&Verdict::NotChecked).unwrap(), "\"NOT_CHECKED\"");
    }

    #[test]
    fn test_verdict_failure() {
        assert!(Verdict::from_pass(false).is_failure());
        assert!(!Verdict::NotChecked.is_failure());
        assert_eq!(Verdict::from_pass(true).mark(), "O.K");
    }
}
