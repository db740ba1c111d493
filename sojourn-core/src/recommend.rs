//! Ranking requests and results.
//!
//! The [`Recommender`] trait is the engine's single entry point: it takes a
//! candidate table, a traveller group and an [`EngineConfig`] and returns an
//! immutable [`Recommendation`].

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Candidate, CandidateRecord, DegenerateAggregationWarning, EngineConfig, RankingError,
    TravelerGroup,
};

/// Inputs for one ranking call.
///
/// # Examples
/// ```
/// use sojourn_core::{EngineConfig, RecommendRequest, TravelerGroup, TravelerProfile};
///
/// let request = RecommendRequest::new(
///     Vec::new(),
///     TravelerGroup::solo(TravelerProfile::new()),
///     EngineConfig::default(),
/// );
/// assert!(request.candidates.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecommendRequest {
    /// Candidate table; `z7` is recomputed for the travellers.
    pub candidates: Vec<Candidate>,
    /// Travellers to recommend for.
    pub travelers: TravelerGroup,
    /// Engine parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: EngineConfig,
}

impl RecommendRequest {
    /// Assemble a request from validated candidates.
    #[must_use]
    pub const fn new(
        candidates: Vec<Candidate>,
        travelers: TravelerGroup,
        config: EngineConfig,
    ) -> Self {
        Self {
            candidates,
            travelers,
            config,
        }
    }

    /// Validate raw records and assemble a request.
    ///
    /// # Errors
    /// Returns [`RankingError::DataQuality`] naming the first unusable row.
    pub fn from_records(
        records: Vec<CandidateRecord>,
        travelers: TravelerGroup,
        config: EngineConfig,
    ) -> Result<Self, RankingError> {
        let candidates = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Candidate::try_from(record)
                    .map_err(|source| RankingError::DataQuality { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(candidates, travelers, config))
    }
}

/// One admissible candidate with its position in the preorder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedCandidate {
    /// The candidate, with `z7` set for the travellers.
    pub candidate: Candidate,
    /// Tie-group rank, `1` for the best group.
    pub rank: usize,
    /// Compromise utility; only kernel members carry one.
    pub utility: Option<f64>,
}

impl RankedCandidate {
    /// Candidate name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.candidate.identity()
    }

    /// Whether the candidate made it into the kernel.
    #[must_use]
    pub const fn in_kernel(&self) -> bool {
        self.utility.is_some()
    }
}

/// Run statistics reported with every recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    /// Candidates supplied by the caller.
    pub supplied: usize,
    /// Candidates surviving the pre-filter.
    pub admitted: usize,
    /// Number of distinct tie groups.
    pub tie_groups: usize,
    /// Kernel members returned.
    pub kernel_size: usize,
    /// Wall-clock time spent ranking.
    pub elapsed: Duration,
}

/// Immutable outcome of a ranking call.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recommendation {
    /// Every admissible candidate ordered by `(rank, name)`.
    pub ranking: Vec<RankedCandidate>,
    /// Kernel members ordered by utility (descending) then rank.
    pub kernel: Vec<RankedCandidate>,
    /// Kernel members whose utility degenerated.
    pub warnings: Vec<DegenerateAggregationWarning>,
    /// Run statistics.
    pub diagnostics: Diagnostics,
}

impl Recommendation {
    /// Whether no candidate was admissible.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// Look a kernel member up by name.
    #[must_use]
    pub fn kernel_member(&self, name: &str) -> Option<&RankedCandidate> {
        self.kernel.iter().find(|entry| entry.name() == name)
    }

    /// Look any ranked candidate up by name (first occurrence).
    #[must_use]
    pub fn ranked(&self, name: &str) -> Option<&RankedCandidate> {
        self.ranking.iter().find(|entry| entry.name() == name)
    }
}

/// Rank candidates for a traveller group.
///
/// Implementations must be deterministic: identical requests produce
/// identical rankings, kernels and utilities. A call either ranks every
/// admissible candidate or fails; partial rankings are never returned.
/// Recommenders must be `Send + Sync` so they can serve concurrent callers.
pub trait Recommender: Send + Sync {
    /// Produce a recommendation or the first error encountered.
    ///
    /// # Errors
    /// Returns [`RankingError`] for invalid configuration, unusable
    /// candidates or malformed intermediate matrices.
    fn recommend(&self, request: &RecommendRequest) -> Result<Recommendation, RankingError>;
}
