//! Pairwise concordance, discordance and credibility.
//!
//! Inputs are benefit-oriented criterion rows: for every criterion a larger
//! value is better. The builder compares every ordered pair and records how
//! credible the claim "a is at least as good as b" is.

use sojourn_core::{CRITERION_COUNT, ConfigurationError, Criterion, EngineConfig, Thresholds};

use crate::OutrankError;

/// One candidate's oriented criterion values.
pub type OrientedRow = [f64; CRITERION_COUNT];

/// Partial concordance `c_j(a, b)` of one criterion.
///
/// `1` while `b` leads by at most `Q`, `0` once it leads by `P` or more, and
/// linear in between.
///
/// # Examples
/// ```
/// use sojourn_core::Thresholds;
/// use sojourn_outrank::concordance;
///
/// let t = Thresholds::new(0.05, 0.20, 0.50);
/// assert_eq!(concordance(0.50, 0.52, t), 1.0);
/// assert_eq!(concordance(0.50, 0.75, t), 0.0);
/// assert!((concordance(0.50, 0.625, t) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "partial concordance interpolates between thresholds"
)]
pub fn concordance(a: f64, b: f64, thresholds: Thresholds) -> f64 {
    let lead = b - a;
    if lead <= thresholds.indifference {
        1.0
    } else if lead >= thresholds.preference {
        0.0
    } else {
        (thresholds.preference - lead) / (thresholds.preference - thresholds.indifference)
    }
}

/// Partial discordance `d_j(a, b)` of one criterion.
///
/// `0` while `b` leads by at most `P`, `1` once it leads by `V` or more, and
/// linear in between.
///
/// # Examples
/// ```
/// use sojourn_core::Thresholds;
/// use sojourn_outrank::discordance;
///
/// let t = Thresholds::new(0.05, 0.20, 0.50);
/// assert_eq!(discordance(0.5, 0.6, t), 0.0);
/// assert_eq!(discordance(0.2, 0.8, t), 1.0);
/// assert!((discordance(0.2, 0.55, t) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "partial discordance interpolates between thresholds"
)]
pub fn discordance(a: f64, b: f64, thresholds: Thresholds) -> f64 {
    let lead = b - a;
    if lead <= thresholds.preference {
        0.0
    } else if lead >= thresholds.veto {
        1.0
    } else {
        (lead - thresholds.preference) / (thresholds.veto - thresholds.preference)
    }
}

/// Weights and thresholds prepared for repeated pair comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct OutrankingModel {
    weights: [f64; CRITERION_COUNT],
    thresholds: [Thresholds; CRITERION_COUNT],
}

impl OutrankingModel {
    /// Validate `config` and normalise its weights.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] when weights or thresholds are invalid.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigurationError> {
        let weights = config.weights.normalised()?;
        for criterion in Criterion::ALL {
            config.thresholds(criterion).validate(criterion)?;
        }
        Ok(Self {
            weights,
            thresholds: config.thresholds,
        })
    }

    /// Overall concordance `C(a, b) = Σ W_j·c_j(a, b)` with normalised
    /// weights.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "concordance is a weighted sum"
    )]
    pub fn concordance(&self, a: &OrientedRow, b: &OrientedRow) -> f64 {
        self.criteria(a, b)
            .map(|(weight, thresholds, xa, xb)| weight * concordance(xa, xb, thresholds))
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }

    /// Credibility `S(a, b)`: concordance discounted by every criterion
    /// whose discordance exceeds it.
    ///
    /// When `C(a, b) = 1` no discount applies.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "credibility discounts concordance multiplicatively"
    )]
    pub fn credibility(&self, a: &OrientedRow, b: &OrientedRow) -> f64 {
        let overall = self.concordance(a, b);
        let slack = 1.0 - overall;
        if slack <= 0.0 {
            return overall;
        }
        let discount: f64 = self
            .criteria(a, b)
            .map(|(_, thresholds, xa, xb)| discordance(xa, xb, thresholds))
            .filter(|partial| *partial > overall)
            .map(|partial| (1.0 - partial) / slack)
            .product();
        (overall * discount).clamp(0.0, 1.0)
    }

    fn criteria<'a>(
        &'a self,
        a: &'a OrientedRow,
        b: &'a OrientedRow,
    ) -> impl Iterator<Item = (f64, Thresholds, f64, f64)> + 'a {
        self.weights
            .iter()
            .zip(&self.thresholds)
            .zip(a.iter().zip(b))
            .map(|((weight, thresholds), (xa, xb))| (*weight, *thresholds, *xa, *xb))
    }
}

/// Square matrix of credibility values `S(a, b)`.
///
/// Diagonal entries are `1` by convention and never take part in
/// distillation.
#[derive(Debug, Clone, PartialEq)]
pub struct CredibilityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl CredibilityMatrix {
    /// Compare every ordered pair of `rows`.
    ///
    /// Cost is quadratic in the number of rows.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] when `config` is invalid.
    pub fn build(rows: &[OrientedRow], config: &EngineConfig) -> Result<Self, ConfigurationError> {
        let model = OutrankingModel::new(config)?;
        Ok(Self::from_model(rows, &model))
    }

    /// Compare every ordered pair of `rows` with a prepared model.
    #[must_use]
    pub fn from_model(rows: &[OrientedRow], model: &OutrankingModel) -> Self {
        let size = rows.len();
        let values = rows
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                rows.iter().enumerate().map(move |(j, b)| {
                    if i == j {
                        1.0
                    } else {
                        model.credibility(a, b)
                    }
                })
            })
            .collect();
        Self { size, values }
    }

    /// Wrap an externally computed matrix.
    ///
    /// # Errors
    /// Returns [`OutrankError::NotSquare`] for ragged input and
    /// [`OutrankError::InvalidCredibility`] for values outside `0.0..=1.0`.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, OutrankError> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size.saturating_mul(size));
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != size {
                return Err(OutrankError::NotSquare {
                    row,
                    expected: size,
                    found: entries.len(),
                });
            }
            for (column, value) in entries.into_iter().enumerate() {
                if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                    return Err(OutrankError::InvalidCredibility { row, column, value });
                }
                values.push(if row == column { 1.0 } else { value });
            }
        }
        Ok(Self { size, values })
    }

    /// Number of candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Whether the matrix is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Credibility of "`a` outranks `b`"; `0` for out-of-range indices.
    #[must_use]
    pub fn get(&self, a: usize, b: usize) -> f64 {
        if a >= self.size || b >= self.size {
            return 0.0;
        }
        a.checked_mul(self.size)
            .and_then(|offset| offset.checked_add(b))
            .and_then(|index| self.values.get(index))
            .copied()
            .unwrap_or(0.0)
    }
}
