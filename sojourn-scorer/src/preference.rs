//! Traveller preference fit (`z7`) for individuals and groups.

use sojourn_core::{
    Candidate, ConfigurationError, Criterion, Preference, PreferenceFit, TravelerGroup,
    TravelerProfile,
};

use crate::{CategoryClass, ClassificationTable};

/// Per-preference sub-scores of one candidate, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    /// `1` when the category is cultural.
    pub culture: f64,
    /// `1` when the category is natural.
    pub nature: f64,
    /// `1` when the category is nightlife.
    pub nightlife: f64,
    /// Mean of local retention and the complement of heritage fragility.
    pub local_impact: f64,
    /// Complement of CO₂ cost.
    pub co2: f64,
}

impl SubScores {
    /// Sub-score matching `preference`.
    #[must_use]
    pub const fn get(&self, preference: Preference) -> f64 {
        match preference {
            Preference::Culture => self.culture,
            Preference::Nature => self.nature,
            Preference::Nightlife => self.nightlife,
            Preference::LocalImpact => self.local_impact,
            Preference::Co2 => self.co2,
        }
    }
}

/// Scores candidates against the five traveller preferences.
///
/// Category preferences score `1` on a keyword match and `0` otherwise; the
/// local-impact and CO₂ preferences read `z4`, `z5` and `z1`. The fit is the
/// weight-normalised sum of sub-scores.
///
/// # Examples
/// ```
/// use sojourn_core::{Preference, PreferenceFit, PreferenceWeights, TravelerProfile, sample_candidate};
/// use sojourn_scorer::PreferenceScorer;
///
/// let museum = sample_candidate("MNAC", "art museum", [0.2, 0.5, 0.5, 0.5, 0.5, 0.5])?;
/// let profile = TravelerProfile::new()
///     .with_preferences(PreferenceWeights::uniform(0.0).with_weight(Preference::Culture, 1.0));
/// let fit = PreferenceScorer::default().fit(&museum, &profile)?;
/// assert_eq!(fit, 1.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PreferenceScorer {
    table: ClassificationTable,
}

impl PreferenceScorer {
    /// Score with a custom classification table.
    #[must_use]
    pub const fn new(table: ClassificationTable) -> Self {
        Self { table }
    }

    /// Classification table in use.
    #[must_use]
    pub const fn table(&self) -> &ClassificationTable {
        &self.table
    }

    /// Sub-scores of `candidate`, independent of any profile.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "sub-scores average and complement unit-interval criteria"
    )]
    pub fn sub_scores(&self, candidate: &Candidate) -> SubScores {
        let class_score = |class: CategoryClass| {
            if self.table.is_member(&candidate.category, class) {
                1.0
            } else {
                0.0
            }
        };
        let criteria = &candidate.criteria;
        SubScores {
            culture: class_score(CategoryClass::Culture),
            nature: class_score(CategoryClass::Nature),
            nightlife: class_score(CategoryClass::Nightlife),
            local_impact: 0.5
                * (criteria.get(Criterion::LocalEconomy)
                    + (1.0 - criteria.get(Criterion::HeritageFragility))),
            co2: 1.0 - criteria.get(Criterion::Co2),
        }
    }
}

impl PreferenceFit for PreferenceScorer {
    #[expect(
        clippy::float_arithmetic,
        reason = "fit is a weighted mean of sub-scores"
    )]
    fn fit(
        &self,
        candidate: &Candidate,
        profile: &TravelerProfile,
    ) -> Result<f64, ConfigurationError> {
        profile.preferences.validate()?;
        let total: f64 = profile.preferences.iter().map(|(_, weight)| weight).sum();
        if total <= 0.0 {
            return Err(ConfigurationError::ZeroPreferenceWeights);
        }
        let scores = self.sub_scores(candidate);
        let weighted: f64 = profile
            .preferences
            .iter()
            .map(|(preference, weight)| weight * scores.get(preference))
            .sum();
        Ok(Self::sanitise(weighted / total))
    }
}

/// Fit of every candidate for one traveller, in input order.
///
/// # Errors
/// Propagates the first [`ConfigurationError`] raised by `fit`.
pub fn score_all<F>(
    fit: &F,
    candidates: &[Candidate],
    profile: &TravelerProfile,
) -> Result<Vec<f64>, ConfigurationError>
where
    F: PreferenceFit + ?Sized,
{
    candidates
        .iter()
        .map(|candidate| fit.fit(candidate, profile))
        .collect()
}

/// Blend per-traveller fit series element-wise as
/// `η·min + (1 − η)·mean`.
///
/// `η = 0` yields the arithmetic mean and `η = 1` the minimum.
///
/// # Errors
/// Returns [`ConfigurationError::EmptyGroup`] for no series,
/// [`ConfigurationError::FitSeriesLength`] when lengths differ and
/// [`ConfigurationError::OutOfRange`] when `blend` is outside `0.0..=1.0`.
///
/// # Examples
/// ```
/// use sojourn_scorer::aggregate_group;
///
/// let blended = aggregate_group(&[vec![1.0, 0.2], vec![0.0, 0.2]], 0.3)?;
/// assert!((blended[0] - 0.35).abs() < 1e-12);
/// assert!((blended[1] - 0.2).abs() < 1e-12);
/// # Ok::<(), sojourn_core::ConfigurationError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "group fit blends the minimum with the mean"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "traveller counts are tiny and exactly representable"
)]
pub fn aggregate_group(series: &[Vec<f64>], blend: f64) -> Result<Vec<f64>, ConfigurationError> {
    if !blend.is_finite() || !(0.0..=1.0).contains(&blend) {
        return Err(ConfigurationError::OutOfRange {
            parameter: "group blend factor",
            expected: "[0, 1]",
            value: blend,
        });
    }
    let (first, rest) = series.split_first().ok_or(ConfigurationError::EmptyGroup)?;
    let expected = first.len();
    if let Some(found) = rest.iter().map(Vec::len).find(|len| *len != expected) {
        return Err(ConfigurationError::FitSeriesLength { expected, found });
    }
    let travellers = series.len() as f64;
    let blended = (0..expected)
        .map(|position| {
            let values = series.iter().filter_map(|row| row.get(position).copied());
            let (min, sum) = values.fold((f64::INFINITY, 0.0), |(min, sum), value| {
                (min.min(value), sum + value)
            });
            blend * min + (1.0 - blend) * (sum / travellers)
        })
        .collect();
    Ok(blended)
}

/// Group fit of every candidate: score each member, then blend.
///
/// # Errors
/// Propagates scoring and aggregation errors.
pub fn group_fit<F>(
    fit: &F,
    candidates: &[Candidate],
    group: &TravelerGroup,
    blend: f64,
) -> Result<Vec<f64>, ConfigurationError>
where
    F: PreferenceFit + ?Sized,
{
    let series = group
        .members()
        .map(|profile| score_all(fit, candidates, profile))
        .collect::<Result<Vec<_>, _>>()?;
    aggregate_group(&series, blend)
}
