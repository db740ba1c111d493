//! Facade crate for the Sojourn recommendation engine.
//!
//! This crate re-exports the domain types, the preference scorer and the
//! outranking pipeline, and exposes the data adapters behind the `data`
//! feature.
//!
//! ```
//! use sojourn_engine::{
//!     EngineConfig, OutrankingRecommender, PreferenceScorer, RecommendRequest, Recommender,
//!     TravelerGroup, TravelerProfile,
//! };
//!
//! let request = RecommendRequest::new(
//!     Vec::new(),
//!     TravelerGroup::solo(TravelerProfile::new()),
//!     EngineConfig::default(),
//! );
//! let recommendation =
//!     OutrankingRecommender::new(PreferenceScorer::default()).recommend(&request)?;
//! assert!(recommendation.is_empty());
//! # Ok::<(), sojourn_engine::RankingError>(())
//! ```

#![forbid(unsafe_code)]

pub use sojourn_core::{
    Candidate, CandidateRecord, ConfigurationError, Criterion, CriterionVector, CriterionWeights,
    DataQualityError, DegenerateAggregationWarning, Diagnostics, DistillationMode, EngineConfig,
    EnrichmentError, EnrichmentService, GroupFilterPolicy, PlaceMetadata, PlaceMetadataError,
    PlaceMetadataService, PlaceQuery, Preference, PreferenceFit, PreferenceWeights,
    RankedCandidate, RankingError, RecommendRequest, Recommendation, Recommender, Thresholds,
    TravelerGroup, TravelerProfile, ZeroValuePolicy,
};

pub use sojourn_scorer::{ClassificationTable, MatchStrategy, PreferenceScorer};

pub use sojourn_outrank::{
    Attribution, DecidingFactor, Explainer, OutrankingRecommender, PairwiseExplanation,
};

#[cfg(feature = "data")]
pub use sojourn_data::{
    EnrichmentReport, HttpPlaceMetadataConfig, HttpPlaceMetadataService, enrich_records,
    load_candidate_table, write_locality_snapshots,
};

#[cfg(feature = "test-support")]
pub use sojourn_core::{FixedFit, StubEnrichment, StubPlaces};
