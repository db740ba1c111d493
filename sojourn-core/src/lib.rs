//! Core domain types for the Sojourn recommendation engine.
//!
//! This crate holds everything the ranking stages share: the seven-criterion
//! model, candidates and traveller profiles, the explicit [`EngineConfig`],
//! the error kinds, and the traits at the engine's seams
//! ([`PreferenceFit`], [`Recommender`], [`EnrichmentService`] and
//! [`PlaceMetadataService`]). Constructors validate eagerly so later stages
//! can assume well-formed input.

pub mod candidate;
pub mod config;
pub mod criterion;
pub mod error;
pub mod fit;
pub mod profile;
pub mod recommend;
pub mod services;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use candidate::{Candidate, CandidateRecord};
pub use config::{
    CriterionWeights, DEFAULT_COMPROMISE_EXPONENT, DEFAULT_GROUP_BLEND, DEFAULT_KERNEL_SIZE,
    DEFAULT_TIE_TOLERANCE, DEFAULT_WEIGHTS, Discrimination, DistillationMode, EngineConfig,
    GroupFilterPolicy, Thresholds, ZeroValuePolicy,
};
pub use criterion::{CRITERION_COUNT, Criterion, CriterionVector, NEUTRAL_PRIOR, Orientation};
pub use error::{ConfigurationError, DataQualityError, DegenerateAggregationWarning, RankingError};
pub use fit::PreferenceFit;
pub use profile::{Preference, PreferenceWeights, TravelerGroup, TravelerProfile};
pub use recommend::{Diagnostics, RankedCandidate, RecommendRequest, Recommendation, Recommender};
pub use services::{
    CriterionScores, EnrichmentError, EnrichmentQuery, EnrichmentService, PlaceMetadata,
    PlaceMetadataError, PlaceMetadataService, PlaceQuery,
};
#[cfg(any(test, feature = "test-support"))]
pub use test_support::{FixedFit, StubEnrichment, StubPlaces, sample_candidate};
