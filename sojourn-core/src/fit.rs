//! Score how well a candidate suits one traveller.
//!
//! The `PreferenceFit` trait produces the `z7` criterion for a
//! [`Candidate`] given a [`TravelerProfile`]. Group aggregation is layered on
//! top by the engine.

use crate::{Candidate, ConfigurationError, TravelerProfile};

/// Compute a traveller-fit score in `0.0..=1.0`.
///
/// Unlike a plain relevance score, fit can be undefined: a profile that
/// weights nothing has no preferences to match, so implementations return
/// [`ConfigurationError`] rather than an arbitrary number.
///
/// Implementations must produce finite scores in `0.0..=1.0`; use
/// [`PreferenceFit::sanitise`] to apply these guards. They must be `Send` and
/// `Sync` so a scorer can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use sojourn_core::{
///     Candidate, ConfigurationError, CriterionVector, PreferenceFit, TravelerProfile,
/// };
///
/// struct HalfFit;
///
/// impl PreferenceFit for HalfFit {
///     fn fit(
///         &self,
///         _candidate: &Candidate,
///         _profile: &TravelerProfile,
///     ) -> Result<f64, ConfigurationError> {
///         Ok(0.5)
///     }
/// }
///
/// let candidate = Candidate::new(
///     "Sagrada Família",
///     "Barcelona",
///     "heritage",
///     Coord { x: 2.1744, y: 41.4036 },
///     CriterionVector::neutral(),
/// );
/// assert_eq!(HalfFit.fit(&candidate, &TravelerProfile::new()), Ok(0.5));
/// ```
pub trait PreferenceFit: Send + Sync {
    /// Return the fit of `candidate` for `profile`.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] when the profile cannot define a fit,
    /// for example when every preference weight is zero.
    fn fit(&self, candidate: &Candidate, profile: &TravelerProfile)
    -> Result<f64, ConfigurationError>;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}
