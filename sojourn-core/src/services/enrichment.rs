use std::collections::BTreeMap;

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::EnrichmentError;
use crate::{CandidateRecord, Criterion};

/// Criterion values keyed by criterion, as returned by enrichment.
pub type CriterionScores = BTreeMap<Criterion, f64>;

/// What an enrichment service is told about one row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnrichmentQuery {
    /// Place name.
    pub name: String,
    /// Free-form category.
    pub category: String,
    /// Position when known (`x = longitude`, `y = latitude`).
    pub location: Option<Coord<f64>>,
    /// Criterion values the row already carries.
    pub known: CriterionScores,
}

impl EnrichmentQuery {
    /// Describe a raw record, or `None` when it has no name to look up.
    #[must_use]
    pub fn from_record(record: &CandidateRecord) -> Option<Self> {
        let name = record.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        let location = record.lat.zip(record.lon).map(|(y, x)| Coord { x, y });
        let known = Criterion::ALL
            .into_iter()
            .filter_map(|criterion| record.criterion(criterion).map(|value| (criterion, value)))
            .collect();
        Some(Self {
            name: name.to_owned(),
            category: record.category.clone().unwrap_or_default(),
            location,
            known,
        })
    }
}

/// Supply criterion values `z1`..`z6` for a candidate.
///
/// Responses may omit criteria; callers keep existing values and fall back
/// to the neutral prior for anything still missing. Values outside
/// `0.0..=1.0` are discarded by callers. Services must be `Send + Sync` so a
/// batch can be enriched from several threads.
///
/// # Examples
///
/// ```rust
/// use sojourn_core::{
///     CandidateRecord, Criterion, CriterionScores, EnrichmentError, EnrichmentQuery,
///     EnrichmentService,
/// };
///
/// struct LowCarbon;
///
/// impl EnrichmentService for LowCarbon {
///     fn enrich(&self, _query: &EnrichmentQuery) -> Result<CriterionScores, EnrichmentError> {
///         Ok(CriterionScores::from([(Criterion::Co2, 0.1)]))
///     }
/// }
///
/// let record = CandidateRecord {
///     name: Some("Bosc de les Fades".into()),
///     ..CandidateRecord::default()
/// };
/// let query = EnrichmentQuery::from_record(&record).expect("named record");
/// let scores = LowCarbon.enrich(&query).expect("stub never fails");
/// assert_eq!(scores.get(&Criterion::Co2), Some(&0.1));
/// ```
pub trait EnrichmentService: Send + Sync {
    /// Return scores for `query`.
    ///
    /// # Errors
    /// Returns [`EnrichmentError`] when the service fails for this row.
    fn enrich(&self, query: &EnrichmentQuery) -> Result<CriterionScores, EnrichmentError>;
}
