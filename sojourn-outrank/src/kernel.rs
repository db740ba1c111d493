//! Kernel selection and the compromise utility.
//!
//! The kernel is the best-ranked slice of the preorder, deduplicated by
//! name. Each member receives a weighted power mean of its stored criterion
//! values, `U = (Σ w_j · x_j^ρ)^(1/ρ)`, with normalised weights. Cost
//! orientation only applies to the credibility matrix.

use sojourn_core::{
    CRITERION_COUNT, ConfigurationError, Criterion, DegenerateAggregationWarning, EngineConfig,
    ZeroValuePolicy,
};

use crate::OutrankError;

/// Pick up to `size` candidates in `(rank, name, input position)` order,
/// keeping only the first occurrence of each name.
///
/// # Errors
/// Returns [`OutrankError::LengthMismatch`] when `names` and `ranks` differ
/// in length.
///
/// # Examples
/// ```
/// use sojourn_outrank::select_kernel;
///
/// let kernel = select_kernel(&["b", "a", "b", "c"], &[1, 2, 1, 3], 2)?;
/// assert_eq!(kernel, vec![0, 1]);
/// # Ok::<(), sojourn_outrank::OutrankError>(())
/// ```
pub fn select_kernel(
    names: &[&str],
    ranks: &[usize],
    size: usize,
) -> Result<Vec<usize>, OutrankError> {
    if names.len() != ranks.len() {
        return Err(OutrankError::LengthMismatch {
            what: "rank list",
            expected: names.len(),
            found: ranks.len(),
        });
    }
    let mut order: Vec<(usize, &str, usize)> = names
        .iter()
        .zip(ranks)
        .enumerate()
        .map(|(index, (name, rank))| (*rank, *name, index))
        .collect();
    order.sort_unstable();
    let mut seen = std::collections::HashSet::new();
    Ok(order
        .into_iter()
        .filter(|(_, name, _)| seen.insert(*name))
        .map(|(_, _, index)| index)
        .take(size)
        .collect())
}

/// Compromise utility of one kernel member.
#[derive(Debug, Clone, PartialEq)]
pub struct Utility {
    /// Utility in `0.0..=1.0`.
    pub value: f64,
    /// Positively weighted criteria found at exactly zero.
    pub zero_criteria: Vec<Criterion>,
}

impl Utility {
    /// Whether the power mean degenerated.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !self.zero_criteria.is_empty()
    }
}

/// Weighted power-mean aggregator.
///
/// # Examples
/// ```
/// use sojourn_core::EngineConfig;
/// use sojourn_outrank::CompromiseAggregator;
///
/// let aggregator = CompromiseAggregator::new(&EngineConfig::default())?;
/// let utility = aggregator.utility(&[0.64; 7]);
/// assert!((utility.value - 0.64).abs() < 1e-12);
/// # Ok::<(), sojourn_core::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompromiseAggregator {
    weights: [f64; CRITERION_COUNT],
    exponent: f64,
    zero_values: ZeroValuePolicy,
}

impl CompromiseAggregator {
    /// Validate `config` and prepare normalised weights.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] for invalid weights or an exponent
    /// outside `(0, 1]`.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigurationError> {
        let weights = config.weights.normalised()?;
        let exponent = config.compromise_exponent;
        if !exponent.is_finite() || exponent <= 0.0 || exponent > 1.0 {
            return Err(ConfigurationError::OutOfRange {
                parameter: "compromise exponent",
                expected: "(0, 1]",
                value: exponent,
            });
        }
        Ok(Self {
            weights,
            exponent,
            zero_values: config.zero_values,
        })
    }

    /// Normalised weights.
    #[must_use]
    pub const fn weights(&self) -> &[f64; CRITERION_COUNT] {
        &self.weights
    }

    /// Per-criterion contributions `p_j = w_j · x_j^ρ`, with `0^ρ = 0`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "contributions scale powered values by weight"
    )]
    pub fn contributions(&self, row: &[f64; CRITERION_COUNT]) -> [f64; CRITERION_COUNT] {
        let mut parts = [0.0; CRITERION_COUNT];
        for ((part, weight), value) in parts.iter_mut().zip(self.weights).zip(row) {
            *part = weight * self.power(*value);
        }
        parts
    }

    /// Compromise utility of `row` under the configured zero-value policy.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the power mean inverts the exponent"
    )]
    pub fn utility(&self, row: &[f64; CRITERION_COUNT]) -> Utility {
        let zero_criteria: Vec<Criterion> = Criterion::ALL
            .into_iter()
            .zip(self.weights.iter().zip(row))
            .filter(|(_, (weight, value))| **weight > 0.0 && **value <= 0.0)
            .map(|(criterion, _)| criterion)
            .collect();
        let value = if !zero_criteria.is_empty() && self.zero_values == ZeroValuePolicy::Collapse {
            0.0
        } else {
            let total: f64 = self.contributions(row).iter().sum();
            total.max(0.0).powf(1.0 / self.exponent).clamp(0.0, 1.0)
        };
        Utility {
            value,
            zero_criteria,
        }
    }

    /// Utility of a named kernel member plus a warning when it degenerated.
    #[must_use]
    pub fn evaluate(
        &self,
        name: &str,
        row: &[f64; CRITERION_COUNT],
    ) -> (f64, Option<DegenerateAggregationWarning>) {
        let utility = self.utility(row);
        let warning = utility.is_degenerate().then(|| {
            let notice = DegenerateAggregationWarning {
                candidate: name.to_owned(),
                criteria: utility.zero_criteria.clone(),
                utility: utility.value,
            };
            log::warn!("degenerate aggregation: {notice}");
            notice
        });
        (utility.value, warning)
    }

    fn power(&self, value: f64) -> f64 {
        if value <= 0.0 {
            0.0
        } else {
            value.powf(self.exponent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn aggregator() -> CompromiseAggregator {
        CompromiseAggregator::new(&EngineConfig::default()).expect("valid config")
    }

    #[rstest]
    fn kernel_deduplicates_and_truncates() {
        let names = ["Park", "Museum", "Park", "Beach", "Bar"];
        let ranks = [2, 1, 1, 3, 3];
        let kernel = select_kernel(&names, &ranks, 3).expect("lengths match");
        assert_eq!(kernel, vec![1, 2, 3]);
    }

    #[rstest]
    fn kernel_may_be_smaller_than_requested() {
        let kernel = select_kernel(&["only"], &[1], 9).expect("lengths match");
        assert_eq!(kernel, vec![0]);
    }

    #[rstest]
    fn kernel_rejects_mismatched_lengths() {
        assert!(select_kernel(&["a", "b"], &[1], 9).is_err());
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.25)]
    #[case(1.0)]
    fn equal_inputs_are_a_fixed_point(aggregator: CompromiseAggregator, #[case] x: f64) {
        let utility = aggregator.utility(&[x; CRITERION_COUNT]);
        assert!((utility.value - x).abs() < 1e-12);
    }

    #[rstest]
    fn power_mean_sits_below_arithmetic_mean(aggregator: CompromiseAggregator) {
        let row = [0.9, 0.1, 0.9, 0.1, 0.9, 0.1, 0.5];
        let arithmetic: f64 = aggregator
            .weights()
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum();
        let utility = aggregator.utility(&row).value;
        assert!(utility < arithmetic);
        assert!(utility > 0.1);
    }

    #[rstest]
    fn zero_value_collapses_by_default(aggregator: CompromiseAggregator) {
        let row = [0.9, 0.9, 0.0, 0.9, 0.9, 0.9, 0.9];
        let (value, raised) = aggregator.evaluate("Sagrada", &row);
        assert_eq!(value, 0.0);
        let warning = raised.expect("warning raised");
        assert_eq!(warning.criteria, vec![Criterion::Seasonality]);
        assert_eq!(warning.candidate, "Sagrada");
    }

    #[rstest]
    fn compensate_keeps_remaining_mass() {
        let config = EngineConfig::default().with_zero_value_policy(ZeroValuePolicy::Compensate);
        let aggregator = CompromiseAggregator::new(&config).expect("valid config");
        let row = [0.9, 0.9, 0.0, 0.9, 0.9, 0.9, 0.9];
        let (value, warning) = aggregator.evaluate("Sagrada", &row);
        // 0.95 of the weight mass at 0.9^0.5, squared.
        let expected = (0.95 * 0.9_f64.sqrt()).powi(2);
        assert!((value - expected).abs() < 1e-12);
        assert!(warning.is_some());
    }

    #[rstest]
    fn zero_weight_criteria_never_warn() {
        let config = EngineConfig::default().with_weights(sojourn_core::CriterionWeights::new([
            1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
        ]));
        let aggregator = CompromiseAggregator::new(&config).expect("valid config");
        let utility = aggregator.utility(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.0]);
        assert!(!utility.is_degenerate());
        assert!((utility.value - 0.5).abs() < 1e-12);
    }

    #[rstest]
    fn contributions_follow_weights(aggregator: CompromiseAggregator) {
        let parts = aggregator.contributions(&[0.25; CRITERION_COUNT]);
        for (part, weight) in parts.iter().zip(DEFAULT_WEIGHTS_FOR_TEST) {
            assert!((part - weight * 0.5).abs() < 1e-12);
        }
    }

    const DEFAULT_WEIGHTS_FOR_TEST: [f64; CRITERION_COUNT] = sojourn_core::DEFAULT_WEIGHTS;
}
