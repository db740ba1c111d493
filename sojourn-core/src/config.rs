//! Engine parameters passed explicitly into every ranking call.
//!
//! Nothing here is global: callers build an [`EngineConfig`], validate it and
//! hand it to the engine. Changing any weight or threshold means building a
//! new configuration; derived results are never cached across them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CRITERION_COUNT, ConfigurationError, Criterion};

/// Default criterion weights `W` in column order `z1`..`z7`.
pub const DEFAULT_WEIGHTS: [f64; CRITERION_COUNT] = [0.08, 0.12, 0.05, 0.10, 0.10, 0.05, 0.50];

/// Default group blend factor `η`.
pub const DEFAULT_GROUP_BLEND: f64 = 0.3;

/// Default compromise exponent `ρ`.
pub const DEFAULT_COMPROMISE_EXPONENT: f64 = 0.5;

/// Default kernel size `K`.
pub const DEFAULT_KERNEL_SIZE: usize = 9;

/// Default tie tolerance `ε` for pairwise explanations, in percentage
/// points.
pub const DEFAULT_TIE_TOLERANCE: f64 = 0.5;

/// Non-negative importance weights, one per criterion.
///
/// Weights need not sum to one; [`CriterionWeights::normalised`] rescales
/// them at point of use.
///
/// # Examples
/// ```
/// use sojourn_core::{Criterion, CriterionWeights};
///
/// let weights = CriterionWeights::uniform().with(Criterion::PreferenceFit, 0.0);
/// let normalised = weights.normalised().expect("positive sum");
/// assert!((normalised[0] - 1.0 / 6.0).abs() < 1e-12);
/// assert_eq!(normalised[6], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CriterionWeights([f64; CRITERION_COUNT]);

impl CriterionWeights {
    /// Wrap raw weights without validation; see [`CriterionWeights::validate`].
    #[must_use]
    pub const fn new(weights: [f64; CRITERION_COUNT]) -> Self {
        Self(weights)
    }

    /// Equal weight on every criterion.
    #[must_use]
    pub const fn uniform() -> Self {
        Self([1.0; CRITERION_COUNT])
    }

    /// Weight of `criterion`.
    #[must_use]
    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0.get(criterion.index()).copied().unwrap_or(0.0)
    }

    /// Return a copy with the weight of `criterion` replaced.
    #[must_use]
    pub fn with(mut self, criterion: Criterion, weight: f64) -> Self {
        if let Some(slot) = self.0.get_mut(criterion.index()) {
            *slot = weight;
        }
        self
    }

    /// Raw weights in column order.
    #[must_use]
    pub const fn as_array(&self) -> &[f64; CRITERION_COUNT] {
        &self.0
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Check that every weight is finite and non-negative with a positive
    /// sum.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidWeight`] or
    /// [`ConfigurationError::ZeroWeightSum`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (criterion, value) in Criterion::ALL.into_iter().zip(self.0) {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidWeight { criterion, value });
            }
        }
        if self.sum() > 0.0 {
            Ok(())
        } else {
            Err(ConfigurationError::ZeroWeightSum)
        }
    }

    /// Weights rescaled to sum to one.
    ///
    /// # Errors
    /// Propagates [`CriterionWeights::validate`] failures.
    #[expect(
        clippy::float_arithmetic,
        reason = "weights are divided by their sum"
    )]
    pub fn normalised(&self) -> Result<[f64; CRITERION_COUNT], ConfigurationError> {
        self.validate()?;
        let total = self.sum();
        Ok(self.0.map(|weight| weight / total))
    }
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self(DEFAULT_WEIGHTS)
    }
}

/// Indifference, preference and veto thresholds of one criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Thresholds {
    /// Differences up to `Q` are ignored.
    pub indifference: f64,
    /// Differences beyond `P` count as strict preference.
    pub preference: f64,
    /// Differences beyond `V` veto the outranking claim.
    pub veto: f64,
}

impl Thresholds {
    /// Construct a threshold triple.
    #[must_use]
    pub const fn new(indifference: f64, preference: f64, veto: f64) -> Self {
        Self {
            indifference,
            preference,
            veto,
        }
    }

    /// Check `0 <= Q <= P <= V` with finite values.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidThresholds`] naming `criterion`.
    pub fn validate(&self, criterion: Criterion) -> Result<(), ConfigurationError> {
        let Self {
            indifference,
            preference,
            veto,
        } = *self;
        let finite = indifference.is_finite() && preference.is_finite() && veto.is_finite();
        if finite && 0.0 <= indifference && indifference <= preference && preference <= veto {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidThresholds {
                criterion,
                indifference,
                preference,
                veto,
            })
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(0.05, 0.20, 0.50)
    }
}

/// Coefficients of the distillation discrimination margin
/// `s(λ) = α + β·λ`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Discrimination {
    /// Intercept `α`.
    pub alpha: f64,
    /// Slope `β`.
    pub beta: f64,
}

impl Discrimination {
    /// Margin applied at credibility level `lambda`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the margin is an affine function of the credibility level"
    )]
    pub fn margin(&self, lambda: f64) -> f64 {
        self.alpha + self.beta * lambda
    }

    /// The margin must be finite and non-negative across `0.0..=1.0`.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::OutOfRange`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for lambda in [0.0, 1.0] {
            let value = self.margin(lambda);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::OutOfRange {
                    parameter: "discrimination margin",
                    expected: "[0, inf) for every credibility level",
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for Discrimination {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: -0.15,
        }
    }
}

/// How the credibility relation is turned into a preorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistillationMode {
    /// Descending distillation only.
    #[default]
    Descending,
    /// Descending and ascending distillation, ranked by the sum of both
    /// positions.
    Combined,
}

/// Treatment of a positively weighted criterion that is exactly zero when
/// computing the compromise utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZeroValuePolicy {
    /// Force the utility to zero.
    #[default]
    Collapse,
    /// Evaluate the power mean with `0^ρ = 0` and keep the remainder.
    Compensate,
}

/// Whose constraints filter candidates for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GroupFilterPolicy {
    /// Only the primary (first) profile filters.
    #[default]
    PrimaryProfile,
    /// A candidate must be admissible for every member.
    AllMembers,
}

/// Every tunable parameter of a ranking call.
///
/// # Examples
/// ```
/// use sojourn_core::{DistillationMode, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_kernel_size(5)
///     .with_distillation(DistillationMode::Combined);
/// config.validate().expect("valid configuration");
/// assert_eq!(config.kernel_size, 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Criterion weights `W`.
    pub weights: CriterionWeights,
    /// Per-criterion thresholds `Q`, `P` and `V`.
    pub thresholds: [Thresholds; CRITERION_COUNT],
    /// Group blend factor `η` in `(0, 1]`.
    pub group_blend: f64,
    /// Compromise exponent `ρ` in `(0, 1]`.
    pub compromise_exponent: f64,
    /// Kernel size `K`.
    pub kernel_size: usize,
    /// Tie tolerance `ε` for pairwise explanations, in percentage points.
    pub tie_tolerance: f64,
    /// Distillation discrimination margin.
    pub discrimination: Discrimination,
    /// Distillation procedure.
    pub distillation: DistillationMode,
    /// Zero-value handling in the compromise utility.
    pub zero_values: ZeroValuePolicy,
    /// Group pre-filter policy.
    pub group_filter: GroupFilterPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: CriterionWeights::default(),
            thresholds: [Thresholds::default(); CRITERION_COUNT],
            group_blend: DEFAULT_GROUP_BLEND,
            compromise_exponent: DEFAULT_COMPROMISE_EXPONENT,
            kernel_size: DEFAULT_KERNEL_SIZE,
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
            discrimination: Discrimination::default(),
            distillation: DistillationMode::default(),
            zero_values: ZeroValuePolicy::default(),
            group_filter: GroupFilterPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Thresholds of `criterion`.
    #[must_use]
    pub fn thresholds(&self, criterion: Criterion) -> Thresholds {
        self.thresholds
            .get(criterion.index())
            .copied()
            .unwrap_or_default()
    }

    /// Replace the criterion weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: CriterionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the thresholds of one criterion.
    #[must_use]
    pub fn with_thresholds(mut self, criterion: Criterion, thresholds: Thresholds) -> Self {
        if let Some(slot) = self.thresholds.get_mut(criterion.index()) {
            *slot = thresholds;
        }
        self
    }

    /// Use the same thresholds for every criterion.
    #[must_use]
    pub const fn with_uniform_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = [thresholds; CRITERION_COUNT];
        self
    }

    /// Set the group blend factor `η`.
    #[must_use]
    pub const fn with_group_blend(mut self, group_blend: f64) -> Self {
        self.group_blend = group_blend;
        self
    }

    /// Set the compromise exponent `ρ`.
    #[must_use]
    pub const fn with_compromise_exponent(mut self, exponent: f64) -> Self {
        self.compromise_exponent = exponent;
        self
    }

    /// Set the kernel size `K`.
    #[must_use]
    pub const fn with_kernel_size(mut self, kernel_size: usize) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    /// Set the pairwise explanation tie tolerance.
    #[must_use]
    pub const fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = tolerance;
        self
    }

    /// Set the discrimination margin coefficients.
    #[must_use]
    pub const fn with_discrimination(mut self, discrimination: Discrimination) -> Self {
        self.discrimination = discrimination;
        self
    }

    /// Select the distillation procedure.
    #[must_use]
    pub const fn with_distillation(mut self, mode: DistillationMode) -> Self {
        self.distillation = mode;
        self
    }

    /// Select the zero-value policy.
    #[must_use]
    pub const fn with_zero_value_policy(mut self, policy: ZeroValuePolicy) -> Self {
        self.zero_values = policy;
        self
    }

    /// Select the group pre-filter policy.
    #[must_use]
    pub const fn with_group_filter(mut self, policy: GroupFilterPolicy) -> Self {
        self.group_filter = policy;
        self
    }

    /// Check every parameter.
    ///
    /// # Errors
    /// Returns the first [`ConfigurationError`] found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.weights.validate()?;
        for criterion in Criterion::ALL {
            self.thresholds(criterion).validate(criterion)?;
        }
        check_unit_exclusive("group blend factor", self.group_blend)?;
        check_unit_exclusive("compromise exponent", self.compromise_exponent)?;
        if self.kernel_size == 0 {
            return Err(ConfigurationError::EmptyKernel);
        }
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(ConfigurationError::OutOfRange {
                parameter: "tie tolerance",
                expected: "[0, inf)",
                value: self.tie_tolerance,
            });
        }
        self.discrimination.validate()
    }
}

fn check_unit_exclusive(parameter: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange {
            parameter,
            expected: "(0, 1]",
            value,
        })
    }
}
