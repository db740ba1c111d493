//! Candidate locations and the raw records they are built from.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Criterion, CriterionVector, DataQualityError};

/// A point of interest eligible for ranking.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The
/// preference-fit criterion (`z7`) held in `criteria` is recomputed on every
/// ranking call and should not be relied upon between calls.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sojourn_core::{Candidate, CriterionVector};
///
/// let museum = Candidate::new(
///     "Museu Picasso",
///     "Barcelona",
///     "museum",
///     Coord { x: 2.1810, y: 41.3852 },
///     CriterionVector::neutral(),
/// );
/// assert_eq!(museum.name, "Museu Picasso");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    /// Display name; also the identity used for deduplication.
    pub name: String,
    /// Municipality or locality the candidate belongs to.
    pub municipality: String,
    /// Free-form category, matched against preference classes.
    pub category: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Criterion values `z1`..`z7`.
    pub criteria: CriterionVector,
}

impl Candidate {
    /// Construct a candidate from already validated parts.
    pub fn new(
        name: impl Into<String>,
        municipality: impl Into<String>,
        category: impl Into<String>,
        location: Coord<f64>,
        criteria: CriterionVector,
    ) -> Self {
        Self {
            name: name.into(),
            municipality: municipality.into(),
            category: category.into(),
            location,
            criteria,
        }
    }

    /// Identity key used for deduplication and deterministic ordering.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.name
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }
}

/// A candidate row as stored or delivered by enrichment.
///
/// Every field is optional so incomplete rows can be loaded, enriched and
/// validated. There is deliberately no `z7` field: preference fit is never
/// read from storage.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateRecord {
    /// Display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Municipality or locality.
    #[cfg_attr(feature = "serde", serde(default))]
    pub municipality: Option<String>,
    /// Free-form category.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<String>,
    /// Latitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lat: Option<f64>,
    /// Longitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lon: Option<f64>,
    /// CO₂ per visit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub z1: Option<f64>,
    /// Crowding ratio.
    #[cfg_attr(feature = "serde", serde(default))]
    pub z2: Option<f64>,
    /// Seasonality balance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub z3: Option<f64>,
    /// Local economic retention.
    #[cfg_attr(feature = "serde", serde(default))]
    pub z4: Option<f64>,
    /// Heritage fragility.
    #[cfg_attr(feature = "serde", serde(default))]
    pub z5: Option<f64>,
    /// Accessibility.
    #[cfg_attr(feature = "serde", serde(default))]
    pub z6: Option<f64>,
}

impl CandidateRecord {
    /// Value stored for an enriched criterion; `None` for `z7` or when
    /// absent.
    #[must_use]
    pub const fn criterion(&self, criterion: Criterion) -> Option<f64> {
        match criterion {
            Criterion::Co2 => self.z1,
            Criterion::Crowding => self.z2,
            Criterion::Seasonality => self.z3,
            Criterion::LocalEconomy => self.z4,
            Criterion::HeritageFragility => self.z5,
            Criterion::Accessibility => self.z6,
            Criterion::PreferenceFit => None,
        }
    }

    /// Store a value for an enriched criterion. Writes to `z7` are ignored.
    pub fn set_criterion(&mut self, criterion: Criterion, value: f64) {
        let slot = match criterion {
            Criterion::Co2 => &mut self.z1,
            Criterion::Crowding => &mut self.z2,
            Criterion::Seasonality => &mut self.z3,
            Criterion::LocalEconomy => &mut self.z4,
            Criterion::HeritageFragility => &mut self.z5,
            Criterion::Accessibility => &mut self.z6,
            Criterion::PreferenceFit => return,
        };
        *slot = Some(value);
    }

    /// Enriched criteria that have no value yet.
    #[must_use]
    pub fn missing_criteria(&self) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|criterion| criterion.is_enriched() && self.criterion(*criterion).is_none())
            .collect()
    }
}

impl TryFrom<CandidateRecord> for Candidate {
    type Error = DataQualityError;

    fn try_from(record: CandidateRecord) -> Result<Self, Self::Error> {
        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(DataQualityError::MissingName)?
            .to_owned();
        let (Some(lat), Some(lon)) = (record.lat, record.lon) else {
            return Err(DataQualityError::MissingCoordinates { name });
        };
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
            return Err(DataQualityError::InvalidCoordinates { name, lat, lon });
        }
        let criteria = CriterionVector::from_partial(
            Criterion::ALL
                .into_iter()
                .map(|criterion| (criterion, record.criterion(criterion))),
        )?;
        Ok(Self {
            name,
            municipality: record.municipality.unwrap_or_default(),
            category: record.category.unwrap_or_default(),
            location: Coord { x: lon, y: lat },
            criteria,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NEUTRAL_PRIOR;
    use rstest::{fixture, rstest};

    #[fixture]
    fn record() -> CandidateRecord {
        CandidateRecord {
            name: Some("Parc Güell".into()),
            municipality: Some("Barcelona".into()),
            category: Some("park".into()),
            lat: Some(41.4145),
            lon: Some(2.1527),
            z1: Some(0.2),
            z6: Some(0.9),
            ..CandidateRecord::default()
        }
    }

    #[rstest]
    fn converts_complete_record(record: CandidateRecord) {
        let candidate = Candidate::try_from(record).expect("valid record");
        assert_eq!(candidate.identity(), "Parc Güell");
        assert_eq!(candidate.lat(), 41.4145);
        assert_eq!(candidate.lon(), 2.1527);
        assert_eq!(candidate.criteria.get(Criterion::Co2), 0.2);
        assert_eq!(candidate.criteria.get(Criterion::Crowding), NEUTRAL_PRIOR);
        assert_eq!(candidate.criteria.get(Criterion::PreferenceFit), NEUTRAL_PRIOR);
    }

    #[rstest]
    fn blank_name_is_rejected(mut record: CandidateRecord) {
        record.name = Some("   ".into());
        let err = Candidate::try_from(record).expect_err("blank name");
        assert_eq!(err, DataQualityError::MissingName);
    }

    #[rstest]
    fn missing_longitude_is_rejected(mut record: CandidateRecord) {
        record.lon = None;
        let err = Candidate::try_from(record).expect_err("missing longitude");
        assert!(matches!(err, DataQualityError::MissingCoordinates { .. }));
    }

    #[rstest]
    fn out_of_range_latitude_is_rejected(mut record: CandidateRecord) {
        record.lat = Some(91.0);
        let err = Candidate::try_from(record).expect_err("invalid latitude");
        assert!(matches!(err, DataQualityError::InvalidCoordinates { .. }));
    }

    #[rstest]
    fn reports_missing_enriched_criteria(record: CandidateRecord) {
        let missing = record.missing_criteria();
        assert_eq!(
            missing,
            vec![
                Criterion::Crowding,
                Criterion::Seasonality,
                Criterion::LocalEconomy,
                Criterion::HeritageFragility,
            ]
        );
    }

    #[rstest]
    fn preference_fit_cannot_be_stored(mut record: CandidateRecord) {
        record.set_criterion(Criterion::PreferenceFit, 1.0);
        assert_eq!(record.criterion(Criterion::PreferenceFit), None);
    }
}
