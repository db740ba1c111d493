//! Error kinds shared by every stage of the engine.
//!
//! Configuration problems and data-quality problems are distinct so callers
//! can tell a bad parameter set from a bad candidate row. Degenerate
//! aggregation is not an error at all: it is reported alongside results as a
//! [`DegenerateAggregationWarning`].

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Criterion;

/// Invalid or degenerate engine parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A criterion weight was negative or not finite.
    #[error("weight for {criterion} must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Criterion carrying the weight.
        criterion: Criterion,
        /// Offending weight.
        value: f64,
    },
    /// Every criterion weight was zero.
    #[error("criterion weights must sum to a positive value")]
    ZeroWeightSum,
    /// Thresholds violated `0 <= Q <= P <= V` for a criterion.
    #[error(
        "thresholds for {criterion} must satisfy 0 <= Q <= P <= V (Q={indifference}, P={preference}, V={veto})"
    )]
    InvalidThresholds {
        /// Criterion with inconsistent thresholds.
        criterion: Criterion,
        /// Indifference threshold `Q`.
        indifference: f64,
        /// Strict preference threshold `P`.
        preference: f64,
        /// Veto threshold `V`.
        veto: f64,
    },
    /// A scalar parameter fell outside its allowed interval.
    #[error("{parameter} must lie in {expected}, got {value}")]
    OutOfRange {
        /// Parameter name.
        parameter: &'static str,
        /// Human-readable description of the allowed interval.
        expected: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The kernel must hold at least one candidate.
    #[error("kernel size must be at least 1")]
    EmptyKernel,
    /// A traveller preference weight was negative or not finite.
    #[error("preference weight '{preference}' must lie in [0, 1], got {value}")]
    InvalidPreferenceWeight {
        /// Name of the preference.
        preference: &'static str,
        /// Offending weight.
        value: f64,
    },
    /// A traveller gave zero weight to every preference.
    #[error("preference fit is undefined when every preference weight is zero")]
    ZeroPreferenceWeights,
    /// A group recommendation was requested without any travellers.
    #[error("at least one traveller profile is required")]
    EmptyGroup,
    /// Per-traveller fit series did not share a length.
    #[error("fit series length mismatch: expected {expected}, found {found}")]
    FitSeriesLength {
        /// Length of the first series.
        expected: usize,
        /// Length of the mismatching series.
        found: usize,
    },
}

/// A candidate row that cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataQualityError {
    /// The candidate has no usable name.
    #[error("candidate is missing a name")]
    MissingName,
    /// Latitude or longitude is absent.
    #[error("candidate '{name}' is missing coordinates")]
    MissingCoordinates {
        /// Name of the affected candidate.
        name: String,
    },
    /// Latitude or longitude is outside the WGS84 range.
    #[error("candidate '{name}' has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates {
        /// Name of the affected candidate.
        name: String,
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
    /// A criterion value was not finite or outside `0.0..=1.0`.
    #[error("{criterion} value {value} is outside [0, 1]")]
    CriterionOutOfRange {
        /// Offending criterion.
        criterion: Criterion,
        /// Offending value.
        value: f64,
    },
}

/// Failure of a full ranking invocation.
///
/// The engine never returns a partial ranking: any error aborts the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    /// Engine parameters were invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A candidate row was unusable.
    #[error("candidate {index}: {source}")]
    DataQuality {
        /// Position of the row in the supplied table.
        index: usize,
        /// Underlying problem.
        #[source]
        source: DataQualityError,
    },
    /// Internal matrices disagreed in shape or arity.
    #[error("malformed outranking input: {0}")]
    Malformed(String),
}

/// Non-fatal notice that a kernel member's compromise utility degenerated.
///
/// Raised when a positively weighted criterion is exactly zero, which drives
/// the power mean towards (or, under the collapse policy, onto) zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DegenerateAggregationWarning {
    /// Name of the affected kernel member.
    pub candidate: String,
    /// Criteria found at zero.
    pub criteria: Vec<Criterion>,
    /// Utility that was assigned.
    pub utility: f64,
}

impl std::fmt::Display for DegenerateAggregationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.criteria.iter().map(|c| c.key()).collect();
        write!(
            f,
            "'{}' has zero-valued weighted criteria [{}]; utility {:.3}",
            self.candidate,
            keys.join(", "),
            self.utility
        )
    }
}
