//! The seven normalised criteria describing a candidate.
//!
//! Criteria `z1`..`z6` are supplied by enrichment; `z7` (preference fit) is
//! always computed by the engine for the travellers at hand.
//!
//! # Examples
//! ```
//! use sojourn_core::{Criterion, Orientation};
//!
//! assert_eq!(Criterion::Co2.key(), "z1");
//! assert_eq!(Criterion::Co2.orientation(), Orientation::Cost);
//! assert_eq!(Criterion::PreferenceFit.to_string(), "z7");
//! ```

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DataQualityError;

/// Number of criteria in every criterion vector.
pub const CRITERION_COUNT: usize = 7;

/// Value substituted for any criterion that is missing.
pub const NEUTRAL_PRIOR: f64 = 0.5;

/// Whether larger raw values are worse (cost) or better (benefit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    /// Lower raw values are preferable.
    Cost,
    /// Higher raw values are preferable.
    Benefit,
}

/// One evaluation dimension of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Criterion {
    /// `z1`: CO₂ emitted per visit.
    Co2,
    /// `z2`: current visitors relative to carrying capacity.
    Crowding,
    /// `z3`: how evenly visits spread across the year.
    Seasonality,
    /// `z4`: share of revenue retained in the local economy.
    LocalEconomy,
    /// `z5`: crowd-adjusted heritage fragility.
    HeritageFragility,
    /// `z6`: physical and sensory accessibility.
    Accessibility,
    /// `z7`: fit with the travellers' stated preferences.
    PreferenceFit,
}

impl Criterion {
    /// Every criterion in column order.
    pub const ALL: [Self; CRITERION_COUNT] = [
        Self::Co2,
        Self::Crowding,
        Self::Seasonality,
        Self::LocalEconomy,
        Self::HeritageFragility,
        Self::Accessibility,
        Self::PreferenceFit,
    ];

    /// Column position of the criterion, `0` for `z1`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Co2 => 0,
            Self::Crowding => 1,
            Self::Seasonality => 2,
            Self::LocalEconomy => 3,
            Self::HeritageFragility => 4,
            Self::Accessibility => 5,
            Self::PreferenceFit => 6,
        }
    }

    /// Look a criterion up by column position.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Short storage key, `z1` through `z7`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Co2 => "z1",
            Self::Crowding => "z2",
            Self::Seasonality => "z3",
            Self::LocalEconomy => "z4",
            Self::HeritageFragility => "z5",
            Self::Accessibility => "z6",
            Self::PreferenceFit => "z7",
        }
    }

    /// Human-readable label used in explanations.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Co2 => "CO₂",
            Self::Crowding => "Overtourism",
            Self::Seasonality => "Seasonality",
            Self::LocalEconomy => "Local-eco",
            Self::HeritageFragility => "Cultural fragility",
            Self::Accessibility => "Accessibility",
            Self::PreferenceFit => "Pref-fit",
        }
    }

    /// Direction in which raw values improve.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Co2 | Self::Crowding | Self::HeritageFragility => Orientation::Cost,
            Self::Seasonality | Self::LocalEconomy | Self::Accessibility | Self::PreferenceFit => {
                Orientation::Benefit
            }
        }
    }

    /// Whether the value comes from enrichment rather than the engine.
    #[must_use]
    pub const fn is_enriched(self) -> bool {
        !matches!(self, Self::PreferenceFit)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Criterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "z1" | "co2" => Ok(Self::Co2),
            "z2" | "crowding" => Ok(Self::Crowding),
            "z3" | "seasonality" => Ok(Self::Seasonality),
            "z4" | "local_economy" => Ok(Self::LocalEconomy),
            "z5" | "heritage_fragility" => Ok(Self::HeritageFragility),
            "z6" | "accessibility" => Ok(Self::Accessibility),
            "z7" | "preference_fit" => Ok(Self::PreferenceFit),
            _ => Err(format!("unknown criterion '{s}'")),
        }
    }
}

/// Raw criterion values of one candidate, each in `0.0..=1.0`.
///
/// Values are stored as supplied (cost criteria are not inverted); use
/// [`CriterionVector::oriented`] to obtain the benefit-oriented view the
/// outranking step works on.
///
/// # Examples
/// ```
/// use sojourn_core::{Criterion, CriterionVector};
///
/// let values = CriterionVector::neutral().with(Criterion::Co2, 0.2)?;
/// assert_eq!(values.get(Criterion::Co2), 0.2);
/// assert!((values.oriented()[0] - 0.8).abs() < 1e-12);
/// # Ok::<(), sojourn_core::DataQualityError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[f64; 7]", into = "[f64; 7]"))]
pub struct CriterionVector([f64; CRITERION_COUNT]);

impl CriterionVector {
    /// Validate and wrap a full set of values.
    ///
    /// # Errors
    /// Returns [`DataQualityError::CriterionOutOfRange`] for the first value
    /// that is not finite or lies outside `0.0..=1.0`.
    pub fn new(values: [f64; CRITERION_COUNT]) -> Result<Self, DataQualityError> {
        for (criterion, value) in Criterion::ALL.into_iter().zip(values) {
            check_unit_interval(criterion, value)?;
        }
        Ok(Self(values))
    }

    /// A vector holding the neutral prior for every criterion.
    #[must_use]
    pub const fn neutral() -> Self {
        Self([NEUTRAL_PRIOR; CRITERION_COUNT])
    }

    /// Build a vector from optional values, substituting the neutral prior
    /// for anything missing.
    ///
    /// # Errors
    /// Returns [`DataQualityError::CriterionOutOfRange`] when a supplied
    /// value is unusable.
    pub fn from_partial<I>(values: I) -> Result<Self, DataQualityError>
    where
        I: IntoIterator<Item = (Criterion, Option<f64>)>,
    {
        values
            .into_iter()
            .try_fold(Self::neutral(), |vector, (criterion, value)| match value {
                Some(raw) => vector.with(criterion, raw),
                None => Ok(vector),
            })
    }

    /// Raw value of `criterion`.
    #[must_use]
    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0
            .get(criterion.index())
            .copied()
            .unwrap_or(NEUTRAL_PRIOR)
    }

    /// Return a copy with `criterion` replaced.
    ///
    /// # Errors
    /// Returns [`DataQualityError::CriterionOutOfRange`] when `value` is not a
    /// finite number in `0.0..=1.0`.
    pub fn with(mut self, criterion: Criterion, value: f64) -> Result<Self, DataQualityError> {
        check_unit_interval(criterion, value)?;
        if let Some(slot) = self.0.get_mut(criterion.index()) {
            *slot = value;
        }
        Ok(self)
    }

    /// Raw values in column order.
    #[must_use]
    pub const fn as_array(&self) -> &[f64; CRITERION_COUNT] {
        &self.0
    }

    /// Values turned so that higher is always better.
    ///
    /// Cost criteria (`z1`, `z2`, `z5`) are mapped through `1 - x`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "cost criteria are inverted onto the benefit scale"
    )]
    pub fn oriented(&self) -> [f64; CRITERION_COUNT] {
        let mut oriented = self.0;
        for (criterion, value) in Criterion::ALL.into_iter().zip(oriented.iter_mut()) {
            if criterion.orientation() == Orientation::Cost {
                *value = 1.0 - *value;
            }
        }
        oriented
    }
}

impl Default for CriterionVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl TryFrom<[f64; CRITERION_COUNT]> for CriterionVector {
    type Error = DataQualityError;

    fn try_from(values: [f64; CRITERION_COUNT]) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<CriterionVector> for [f64; CRITERION_COUNT] {
    fn from(vector: CriterionVector) -> Self {
        vector.0
    }
}

fn check_unit_interval(criterion: Criterion, value: f64) -> Result<(), DataQualityError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DataQualityError::CriterionOutOfRange { criterion, value })
    }
}
