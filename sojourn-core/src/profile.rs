//! Traveller profiles: constraints plus five preference weights in
//! `[0.0, 1.0]`.
//!
//! The weights need not sum to one; scorers normalise them at point of use.

use std::collections::BTreeSet;

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// The five things a traveller can care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preference {
    /// Museums, heritage, art and history.
    Culture,
    /// Parks, beaches, forests and trails.
    Nature,
    /// Bars, clubs and live music.
    Nightlife,
    /// Keeping money local and sparing fragile heritage.
    LocalImpact,
    /// Low-carbon visits.
    Co2,
}

impl Preference {
    /// Every preference in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Culture,
        Self::Nature,
        Self::Nightlife,
        Self::LocalImpact,
        Self::Co2,
    ];

    /// Return the preference as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Culture => "culture",
            Self::Nature => "nature",
            Self::Nightlife => "nightlife",
            Self::LocalImpact => "local_impact",
            Self::Co2 => "co2",
        }
    }
}

impl std::fmt::Display for Preference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five preference weights, each clamped into `0.0..=1.0`.
///
/// # Examples
/// ```
/// use sojourn_core::{Preference, PreferenceWeights};
///
/// let weights = PreferenceWeights::uniform(0.0).with_weight(Preference::Nature, 0.9);
/// assert_eq!(weights.weight(Preference::Nature), 0.9);
/// assert_eq!(weights.weight(Preference::Culture), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PreferenceWeights {
    /// Interest in cultural sites.
    pub culture: f64,
    /// Interest in nature.
    pub nature: f64,
    /// Interest in nightlife.
    pub nightlife: f64,
    /// Wish to minimise negative local impact.
    pub local_impact: f64,
    /// Wish to minimise CO₂.
    pub co2: f64,
}

impl PreferenceWeights {
    /// Every weight set to `weight`, clamped into range.
    #[must_use]
    pub fn uniform(weight: f64) -> Self {
        let clamped = weight.clamp(0.0, 1.0);
        Self {
            culture: clamped,
            nature: clamped,
            nightlife: clamped,
            local_impact: clamped,
            co2: clamped,
        }
    }

    /// Return the weight for `preference`.
    #[must_use]
    pub const fn weight(&self, preference: Preference) -> f64 {
        match preference {
            Preference::Culture => self.culture,
            Preference::Nature => self.nature,
            Preference::Nightlife => self.nightlife,
            Preference::LocalImpact => self.local_impact,
            Preference::Co2 => self.co2,
        }
    }

    /// Insert or update a weight. Values are clamped into `0.0..=1.0`.
    pub fn set_weight(&mut self, preference: Preference, weight: f64) {
        let clamped = weight.clamp(0.0, 1.0);
        match preference {
            Preference::Culture => self.culture = clamped,
            Preference::Nature => self.nature = clamped,
            Preference::Nightlife => self.nightlife = clamped,
            Preference::LocalImpact => self.local_impact = clamped,
            Preference::Co2 => self.co2 = clamped,
        }
    }

    /// Set a weight while returning `self` for chaining.
    #[must_use]
    pub fn with_weight(mut self, preference: Preference, weight: f64) -> Self {
        self.set_weight(preference, weight);
        self
    }

    /// Set a weight, rejecting values outside `0.0..=1.0` instead of
    /// clamping.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidPreferenceWeight`] when `weight`
    /// is not finite or out of range.
    pub fn try_set_weight(
        &mut self,
        preference: Preference,
        weight: f64,
    ) -> Result<(), ConfigurationError> {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(ConfigurationError::InvalidPreferenceWeight {
                preference: preference.as_str(),
                value: weight,
            });
        }
        self.set_weight(preference, weight);
        Ok(())
    }

    /// Check that every weight is a finite value in `0.0..=1.0`.
    ///
    /// Deserialised weights bypass clamping, so scorers validate before use.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidPreferenceWeight`] for the first
    /// offending weight.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for preference in Preference::ALL {
            let value = self.weight(preference);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::InvalidPreferenceWeight {
                    preference: preference.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Iterate over `(preference, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Preference, f64)> + '_ {
        Preference::ALL
            .into_iter()
            .map(|preference| (preference, self.weight(preference)))
    }
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

/// One traveller's constraints and preferences.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sojourn_core::{Preference, TravelerProfile};
///
/// let profile = TravelerProfile::new()
///     .named("Ada")
///     .with_home(Coord { x: 2.17, y: 41.40 }, 25.0)
///     .avoiding("nightclub")
///     .with_preference(Preference::Culture, 0.9);
/// assert!(profile.avoids("nightclub"));
/// assert_eq!(profile.preferences.culture, 0.9);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TravelerProfile {
    /// Optional display name.
    pub name: Option<String>,
    /// Whether the traveller needs accessible sites.
    pub mobility_constrained: bool,
    /// Home location (`x = longitude`, `y = latitude`).
    pub home: Option<Coord<f64>>,
    /// Maximum displacement from home in kilometres.
    pub max_displacement_km: Option<f64>,
    /// Categories the traveller will not visit.
    pub avoided_categories: BTreeSet<String>,
    /// Preference weights.
    pub preferences: PreferenceWeights,
}

impl TravelerProfile {
    /// Construct a profile with no constraints and neutral weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require accessible candidates.
    #[must_use]
    pub fn with_mobility_constraint(mut self) -> Self {
        self.mobility_constrained = true;
        self
    }

    /// Set the home location and maximum displacement radius.
    #[must_use]
    pub fn with_home(mut self, home: Coord<f64>, max_displacement_km: f64) -> Self {
        self.home = Some(home);
        self.max_displacement_km = Some(max_displacement_km);
        self
    }

    /// Add a category to the avoid-set.
    #[must_use]
    pub fn avoiding(mut self, category: impl Into<String>) -> Self {
        self.avoided_categories.insert(category.into());
        self
    }

    /// Set a preference weight, clamped into range.
    #[must_use]
    pub fn with_preference(mut self, preference: Preference, weight: f64) -> Self {
        self.preferences.set_weight(preference, weight);
        self
    }

    /// Replace all preference weights.
    #[must_use]
    pub fn with_preferences(mut self, preferences: PreferenceWeights) -> Self {
        self.preferences = preferences;
        self
    }

    /// Whether `category` is in the avoid-set (exact match).
    #[must_use]
    pub fn avoids(&self, category: &str) -> bool {
        self.avoided_categories.contains(category)
    }

    /// Home location and radius when both are configured.
    #[must_use]
    pub fn displacement_limit(&self) -> Option<(Coord<f64>, f64)> {
        self.home.zip(self.max_displacement_km)
    }
}

/// An ordered, non-empty set of travellers.
///
/// The first profile in insertion order is the *primary* profile, whose
/// location, radius and mobility constraint drive group pre-filtering under
/// the default policy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<TravelerProfile>", into = "Vec<TravelerProfile>")
)]
pub struct TravelerGroup {
    primary: TravelerProfile,
    companions: Vec<TravelerProfile>,
}

impl TravelerGroup {
    /// Build a group from profiles in insertion order.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::EmptyGroup`] when `members` is empty.
    pub fn new(members: Vec<TravelerProfile>) -> Result<Self, ConfigurationError> {
        let mut iter = members.into_iter();
        let primary = iter.next().ok_or(ConfigurationError::EmptyGroup)?;
        Ok(Self {
            primary,
            companions: iter.collect(),
        })
    }

    /// A group of one.
    #[must_use]
    pub fn solo(profile: TravelerProfile) -> Self {
        Self {
            primary: profile,
            companions: Vec::new(),
        }
    }

    /// The profile that drives group pre-filtering.
    #[must_use]
    pub const fn primary(&self) -> &TravelerProfile {
        &self.primary
    }

    /// All members in insertion order, primary first.
    pub fn members(&self) -> impl Iterator<Item = &TravelerProfile> + '_ {
        std::iter::once(&self.primary).chain(self.companions.iter())
    }

    /// Number of travellers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.companions.len() + 1
    }

    /// Always `false`; groups are never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<Vec<TravelerProfile>> for TravelerGroup {
    type Error = ConfigurationError;

    fn try_from(members: Vec<TravelerProfile>) -> Result<Self, Self::Error> {
        Self::new(members)
    }
}

impl From<TravelerGroup> for Vec<TravelerProfile> {
    fn from(group: TravelerGroup) -> Self {
        std::iter::once(group.primary)
            .chain(group.companions)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn set_weight_clamps_out_of_range() {
        let mut weights = PreferenceWeights::default();
        weights.set_weight(Preference::Culture, 1.4);
        weights.set_weight(Preference::Co2, -0.3);
        assert_eq!(weights.culture, 1.0);
        assert_eq!(weights.co2, 0.0);
    }

    #[rstest]
    #[case(1.5)]
    #[case(-0.2)]
    #[case(f64::INFINITY)]
    fn try_set_weight_rejects_out_of_range(#[case] weight: f64) {
        let mut weights = PreferenceWeights::default();
        let err = weights
            .try_set_weight(Preference::Nature, weight)
            .expect_err("weight should be rejected");
        assert!(matches!(
            err,
            ConfigurationError::InvalidPreferenceWeight {
                preference: "nature",
                ..
            }
        ));
        assert_eq!(weights.nature, 0.5);
    }

    #[rstest]
    fn validate_catches_unclamped_weights() {
        let weights = PreferenceWeights {
            nightlife: 2.0,
            ..PreferenceWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[rstest]
    fn displacement_requires_home_and_radius() {
        let mut profile = TravelerProfile::new();
        profile.home = Some(Coord { x: 0.0, y: 0.0 });
        assert!(profile.displacement_limit().is_none());
        profile.max_displacement_km = Some(5.0);
        assert!(profile.displacement_limit().is_some());
    }

    #[rstest]
    fn group_rejects_empty_member_list() {
        let err = TravelerGroup::new(Vec::new()).expect_err("empty group");
        assert_eq!(err, ConfigurationError::EmptyGroup);
    }

    #[rstest]
    fn primary_is_first_inserted() {
        let group = TravelerGroup::new(vec![
            TravelerProfile::new().named("first"),
            TravelerProfile::new().named("second"),
        ])
        .expect("valid group");
        assert_eq!(group.primary().name.as_deref(), Some("first"));
        assert_eq!(group.len(), 2);
    }
}
