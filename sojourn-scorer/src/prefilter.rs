//! Remove candidates a traveller cannot or will not visit.
//!
//! Rules run in a fixed order: avoided categories, then displacement from
//! home, then accessibility. The first rule that rejects a candidate is
//! reported in debug logs.

use std::fmt;

use geo::{Distance, Haversine, Point};
use sojourn_core::{Candidate, Criterion, GroupFilterPolicy, TravelerGroup, TravelerProfile};

/// Accessibility below this excludes a candidate for mobility-constrained
/// travellers.
pub const MIN_ACCESSIBILITY: f64 = 0.5;

/// Why a candidate was excluded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exclusion {
    /// The category is in the traveller's avoid-set.
    AvoidedCategory,
    /// The candidate lies beyond the displacement radius.
    BeyondRadius {
        /// Great-circle distance from home in kilometres.
        distance_km: f64,
        /// Configured radius in kilometres.
        limit_km: f64,
    },
    /// Accessibility (`z6`) is below [`MIN_ACCESSIBILITY`].
    Inaccessible {
        /// Candidate accessibility.
        accessibility: f64,
    },
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AvoidedCategory => f.write_str("category is avoided"),
            Self::BeyondRadius {
                distance_km,
                limit_km,
            } => write!(f, "{distance_km:.1} km from home exceeds {limit_km:.1} km"),
            Self::Inaccessible { accessibility } => {
                write!(f, "accessibility {accessibility:.2} below {MIN_ACCESSIBILITY}")
            }
        }
    }
}

/// Great-circle distance between two WGS84 coordinates, in kilometres.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "metres are converted to kilometres"
)]
pub fn great_circle_km(from: geo::Coord<f64>, to: geo::Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to)) / 1_000.0
}

/// Check `candidate` against every rule for `profile`.
///
/// # Errors
/// Returns the first [`Exclusion`] that applies.
pub fn admits(profile: &TravelerProfile, candidate: &Candidate) -> Result<(), Exclusion> {
    if profile.avoids(&candidate.category) {
        return Err(Exclusion::AvoidedCategory);
    }
    if let Some((home, limit_km)) = profile.displacement_limit() {
        let distance_km = great_circle_km(home, candidate.location);
        if distance_km > limit_km {
            return Err(Exclusion::BeyondRadius {
                distance_km,
                limit_km,
            });
        }
    }
    let accessibility = candidate.criteria.get(Criterion::Accessibility);
    if profile.mobility_constrained && accessibility < MIN_ACCESSIBILITY {
        return Err(Exclusion::Inaccessible { accessibility });
    }
    Ok(())
}

/// Admissible candidates for one traveller, in input order.
pub fn prefilter<'a>(candidates: &'a [Candidate], profile: &TravelerProfile) -> Vec<&'a Candidate> {
    candidates
        .iter()
        .filter(|candidate| match admits(profile, candidate) {
            Ok(()) => true,
            Err(reason) => {
                log::debug!("excluding '{}': {reason}", candidate.name);
                false
            }
        })
        .collect()
}

/// Admissible candidates for a group under `policy`, in input order.
///
/// With [`GroupFilterPolicy::PrimaryProfile`] only the first profile's
/// constraints apply; with [`GroupFilterPolicy::AllMembers`] a candidate must
/// pass every member's rules.
pub fn prefilter_group<'a>(
    candidates: &'a [Candidate],
    group: &TravelerGroup,
    policy: GroupFilterPolicy,
) -> Vec<&'a Candidate> {
    match policy {
        GroupFilterPolicy::PrimaryProfile => prefilter(candidates, group.primary()),
        GroupFilterPolicy::AllMembers => candidates
            .iter()
            .filter(|candidate| {
                group.members().all(|profile| match admits(profile, candidate) {
                    Ok(()) => true,
                    Err(reason) => {
                        log::debug!(
                            "excluding '{}' for {}: {reason}",
                            candidate.name,
                            profile.name.as_deref().unwrap_or("unnamed traveller")
                        );
                        false
                    }
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use sojourn_core::sample_candidate;

    const BARCELONA: Coord<f64> = Coord { x: 2.1734, y: 41.3851 };
    const GIRONA: Coord<f64> = Coord { x: 2.8214, y: 41.9794 };

    fn located(name: &str, category: &str, at: Coord<f64>, accessibility: f64) -> Candidate {
        let mut candidate = sample_candidate(name, category, [0.5, 0.5, 0.5, 0.5, 0.5, accessibility])
            .expect("valid candidate");
        candidate.location = at;
        candidate
    }

    #[fixture]
    fn candidates() -> Vec<Candidate> {
        vec![
            located("Picasso", "museum", BARCELONA, 0.9),
            located("Catedral de Girona", "heritage", GIRONA, 0.9),
            located("Apolo", "club", BARCELONA, 0.9),
            located("Carmel", "viewpoint", BARCELONA, 0.2),
        ]
    }

    fn names(admitted: &[&Candidate]) -> Vec<String> {
        admitted.iter().map(|c| c.name.clone()).collect()
    }

    #[rstest]
    fn barcelona_to_girona_is_about_85_km() {
        let km = great_circle_km(BARCELONA, GIRONA);
        assert!((80.0..90.0).contains(&km), "unexpected distance {km}");
    }

    #[rstest]
    fn unconstrained_profile_admits_everything(candidates: Vec<Candidate>) {
        assert_eq!(prefilter(&candidates, &TravelerProfile::new()).len(), 4);
    }

    #[rstest]
    fn rules_apply_together(candidates: Vec<Candidate>) {
        let profile = TravelerProfile::new()
            .avoiding("club")
            .with_home(BARCELONA, 20.0)
            .with_mobility_constraint();
        assert_eq!(names(&prefilter(&candidates, &profile)), ["Picasso"]);
    }

    #[rstest]
    fn radius_needs_home() {
        let mut profile = TravelerProfile::new();
        profile.max_displacement_km = Some(1.0);
        let far = located("Catedral de Girona", "heritage", GIRONA, 0.9);
        assert_eq!(admits(&profile, &far), Ok(()));
    }

    #[rstest]
    fn avoided_category_is_reported_first() {
        let profile = TravelerProfile::new()
            .avoiding("club")
            .with_mobility_constraint();
        let club = located("Apolo", "club", BARCELONA, 0.1);
        assert_eq!(admits(&profile, &club), Err(Exclusion::AvoidedCategory));
    }

    #[rstest]
    fn accessibility_threshold_is_inclusive() {
        let profile = TravelerProfile::new().with_mobility_constraint();
        let borderline = located("Sant Pau", "heritage", BARCELONA, 0.5);
        assert_eq!(admits(&profile, &borderline), Ok(()));
    }

    #[rstest]
    fn primary_profile_policy_ignores_companions(candidates: Vec<Candidate>) {
        let group = TravelerGroup::new(vec![
            TravelerProfile::new(),
            TravelerProfile::new().with_mobility_constraint(),
        ])
        .expect("non-empty group");
        let admitted = prefilter_group(&candidates, &group, GroupFilterPolicy::PrimaryProfile);
        assert_eq!(admitted.len(), 4);
    }

    #[rstest]
    fn all_members_policy_intersects(candidates: Vec<Candidate>) {
        let group = TravelerGroup::new(vec![
            TravelerProfile::new().avoiding("club"),
            TravelerProfile::new().with_mobility_constraint(),
        ])
        .expect("non-empty group");
        let admitted = prefilter_group(&candidates, &group, GroupFilterPolicy::AllMembers);
        assert_eq!(names(&admitted), ["Picasso", "Catedral de Girona"]);
    }
}
