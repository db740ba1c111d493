//! Traveller-facing scoring for Sojourn candidates.
//!
//! The crate provides the two stages that run before outranking:
//! - **Pre-filtering** drops candidates a traveller cannot or will not visit
//!   (avoided categories, displacement radius, accessibility), for one
//!   profile or a whole [`TravelerGroup`](sojourn_core::TravelerGroup).
//! - **Preference scoring** computes the `z7` criterion from a configurable
//!   [`ClassificationTable`] and the profile's five weights, and blends
//!   per-traveller scores into a group fit.
//!
//! # Examples
//!
//! ```
//! use sojourn_core::{TravelerProfile, sample_candidate};
//! use sojourn_scorer::{PreferenceScorer, prefilter, score_all};
//!
//! let candidates = vec![sample_candidate("Parc Güell", "park", [0.2, 0.8, 0.4, 0.6, 0.3, 0.7])?];
//! let profile = TravelerProfile::new();
//! let admitted: Vec<_> = prefilter(&candidates, &profile).into_iter().cloned().collect();
//! let fits = score_all(&PreferenceScorer::default(), &admitted, &profile)?;
//! assert_eq!(fits.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod classify;
mod prefilter;
mod preference;

pub use classify::{CategoryClass, ClassificationTable, MatchStrategy};
pub use prefilter::{
    Exclusion, MIN_ACCESSIBILITY, admits, great_circle_km, prefilter, prefilter_group,
};
pub use preference::{PreferenceScorer, SubScores, aggregate_group, group_fit, score_all};
