//! Deterministic collaborators and fixtures shared by unit and behaviour
//! tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;

use crate::{
    Candidate, ConfigurationError, Criterion, CriterionScores, CriterionVector, DataQualityError,
    EnrichmentError, EnrichmentQuery, EnrichmentService, PlaceMetadata, PlaceMetadataError,
    PlaceMetadataService, PlaceQuery, PreferenceFit, TravelerProfile,
};

/// Build a candidate at the origin from the six enriched values `z1`..`z6`.
///
/// `z7` starts at the neutral prior.
///
/// # Errors
/// Returns [`DataQualityError::CriterionOutOfRange`] for unusable values.
pub fn sample_candidate(
    name: &str,
    category: &str,
    enriched: [f64; 6],
) -> Result<Candidate, DataQualityError> {
    let criteria = CriterionVector::from_partial(
        Criterion::ALL
            .into_iter()
            .zip(enriched)
            .map(|(criterion, value)| (criterion, Some(value))),
    )?;
    Ok(Candidate::new(
        name,
        "Testville",
        category,
        Coord { x: 0.0, y: 0.0 },
        criteria,
    ))
}

/// `PreferenceFit` returning the same score for every candidate.
#[derive(Debug, Copy, Clone)]
pub struct FixedFit(pub f64);

impl PreferenceFit for FixedFit {
    fn fit(
        &self,
        _candidate: &Candidate,
        _profile: &TravelerProfile,
    ) -> Result<f64, ConfigurationError> {
        Ok(Self::sanitise(self.0))
    }
}

/// In-memory `EnrichmentService` answering from a lookup table.
///
/// Unknown names yield an empty mapping; names registered with
/// [`StubEnrichment::failing_for`] yield [`EnrichmentError::Unavailable`].
#[derive(Debug, Default)]
pub struct StubEnrichment {
    scores: HashMap<String, CriterionScores>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl StubEnrichment {
    /// Answer `name` with `scores`.
    #[must_use]
    pub fn with_scores(mut self, name: impl Into<String>, scores: CriterionScores) -> Self {
        self.scores.insert(name.into(), scores);
        self
    }

    /// Fail every request for `name`.
    #[must_use]
    pub fn failing_for(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl EnrichmentService for StubEnrichment {
    fn enrich(&self, query: &EnrichmentQuery) -> Result<CriterionScores, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(&query.name) {
            return Err(EnrichmentError::Unavailable {
                message: format!("stub refuses '{}'", query.name),
            });
        }
        Ok(self.scores.get(&query.name).cloned().unwrap_or_default())
    }
}

/// In-memory `PlaceMetadataService` keyed by `name|locality`.
#[derive(Debug, Default, Clone)]
pub struct StubPlaces {
    places: HashMap<String, PlaceMetadata>,
}

impl StubPlaces {
    /// Register metadata for `query`.
    #[must_use]
    pub fn with_place(mut self, query: &PlaceQuery, metadata: PlaceMetadata) -> Self {
        self.places.insert(query.cache_key(), metadata);
        self
    }
}

impl PlaceMetadataService for StubPlaces {
    fn lookup(&self, query: &PlaceQuery) -> Result<PlaceMetadata, PlaceMetadataError> {
        self.places
            .get(&query.cache_key())
            .cloned()
            .ok_or_else(|| PlaceMetadataError::Status {
                name: query.name.clone(),
                status: 404,
            })
    }
}
