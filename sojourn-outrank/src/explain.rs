//! Human-readable attribution of compromise utilities.
//!
//! Each criterion contributes `p_j = w_j · x_j^ρ` to the power mean; shares
//! are those contributions as percentages of their sum. Single-candidate
//! attributions name the strongest and weakest driver, pairwise explanations
//! list the criteria whose shares differ by more than a tolerance, and the
//! kernel summary links consecutive members by their largest share gap.

use std::fmt;

use serde::Serialize;
use sojourn_core::{
    CRITERION_COUNT, Candidate, ConfigurationError, Criterion, EngineConfig, RankedCandidate,
    Recommendation,
};

use crate::CompromiseAggregator;

/// Maximum number of advantages or trade-offs listed per explanation.
pub const MAX_LISTED_GAPS: usize = 3;

/// One criterion's part in a candidate's utility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contribution {
    /// Criterion the contribution belongs to.
    pub criterion: Criterion,
    /// Raw contribution `w_j · x_j^ρ`.
    pub value: f64,
    /// Contribution as a percentage of the total, or `0` when the total is
    /// zero.
    pub share: f64,
}

/// Utility breakdown for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    /// Candidate name.
    pub name: String,
    /// Compromise utility.
    pub utility: f64,
    /// Contributions in criterion order.
    pub contributions: [Contribution; CRITERION_COUNT],
}

impl Attribution {
    /// Criterion with the largest share; the first wins ties.
    #[must_use]
    pub fn top(&self) -> Contribution {
        self.pick(|candidate, best| candidate > best)
    }

    /// Criterion with the smallest share; the first wins ties.
    #[must_use]
    pub fn weakest(&self) -> Contribution {
        self.pick(|candidate, best| candidate < best)
    }

    /// Share of one criterion.
    #[must_use]
    pub fn share(&self, criterion: Criterion) -> f64 {
        self.contributions
            .get(criterion.index())
            .map_or(0.0, |contribution| contribution.share)
    }

    fn pick(&self, better: impl Fn(f64, f64) -> bool) -> Contribution {
        let [first, rest @ ..] = &self.contributions;
        rest.iter().fold(*first, |best, contribution| {
            if better(contribution.share, best.share) {
                *contribution
            } else {
                best
            }
        })
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top = self.top();
        let weakest = self.weakest();
        write!(
            f,
            "{} scores **{:.3}**. Top driver: *{}* ({:.1} %). Least: *{}* ({:.1} %).",
            self.name,
            self.utility,
            top.criterion.label(),
            top.share,
            weakest.criterion.label(),
            weakest.share
        )
    }
}

/// Share difference on one criterion between two candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriterionGap {
    /// Criterion compared.
    pub criterion: Criterion,
    /// Share of the first candidate.
    pub winner_share: f64,
    /// Share of the second candidate.
    pub loser_share: f64,
}

impl CriterionGap {
    /// Signed gap in percentage points, positive when the winner leads.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "gap is a share difference")]
    pub fn gap(&self) -> f64 {
        self.winner_share - self.loser_share
    }
}

/// Why one candidate outranks another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseExplanation {
    /// Name of the better-ranked candidate.
    pub winner: String,
    /// Name of the other candidate.
    pub loser: String,
    /// Criteria where the winner's share leads by more than the tolerance,
    /// largest gap first.
    pub advantages: Vec<CriterionGap>,
    /// Criteria where the winner's share trails by more than the tolerance,
    /// largest deficit first.
    pub trade_offs: Vec<CriterionGap>,
    /// Tolerance in percentage points.
    pub tolerance: f64,
}

impl PairwiseExplanation {
    /// Whether no criterion differs by more than the tolerance.
    #[must_use]
    pub fn is_practically_tied(&self) -> bool {
        self.advantages.is_empty() && self.trade_offs.is_empty()
    }
}

impl fmt::Display for PairwiseExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#### Why **{}** outranks **{}**:", self.winner, self.loser)?;
        for gap in &self.advantages {
            write!(
                f,
                "\n• higher *{}* ({:.1}% vs {:.1}%).",
                gap.criterion.label(),
                gap.winner_share,
                gap.loser_share
            )?;
        }
        for gap in &self.trade_offs {
            write!(
                f,
                "\n• trades off lower *{}* ({:.1}% vs {:.1}%).",
                gap.criterion.label(),
                gap.winner_share,
                gap.loser_share
            )?;
        }
        if self.is_practically_tied() {
            write!(
                f,
                "\n• practically tied on every criterion (gaps ≤ {} pp).",
                self.tolerance
            )?;
        }
        Ok(())
    }
}

/// The largest share gap between consecutive kernel members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecidingFactor {
    /// One-based position of the better member in rank order.
    pub position: usize,
    /// Better-ranked member.
    pub winner: String,
    /// Next member in rank order.
    pub loser: String,
    /// Criterion with the largest absolute gap.
    pub gap: CriterionGap,
}

impl fmt::Display for DecidingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.gap.gap() > 0.0 { "higher" } else { "lower" };
        write!(
            f,
            "{}>{}: {} beats {} via {} *{}* ({:.1}% vs {:.1}%).",
            self.position,
            self.position.saturating_add(1),
            self.winner,
            self.loser,
            direction,
            self.gap.criterion.label(),
            self.gap.winner_share,
            self.gap.loser_share
        )
    }
}

/// Builds attributions with the same weights and exponent as the engine.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sojourn_core::{Candidate, CriterionVector, EngineConfig};
/// use sojourn_outrank::Explainer;
///
/// let explainer = Explainer::new(&EngineConfig::default())?;
/// let candidate = Candidate::new(
///     "Parc Güell",
///     "Barcelona",
///     "park",
///     Coord { x: 2.1527, y: 41.4145 },
///     CriterionVector::neutral(),
/// );
/// let line = explainer.attribute(&candidate).to_string();
/// assert!(line.starts_with("Parc Güell scores **0.500**."));
/// # Ok::<(), sojourn_core::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Explainer {
    aggregator: CompromiseAggregator,
    tolerance: f64,
}

impl Explainer {
    /// Prepare an explainer from the engine configuration.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] when the weights or exponent are
    /// invalid, or the tie tolerance is negative.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigurationError> {
        let tolerance = config.tie_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigurationError::OutOfRange {
                parameter: "tie tolerance",
                expected: "[0, inf)",
                value: tolerance,
            });
        }
        Ok(Self {
            aggregator: CompromiseAggregator::new(config)?,
            tolerance,
        })
    }

    /// Tie tolerance in percentage points.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Break a candidate's utility down by criterion.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "shares are percentages")]
    pub fn attribute(&self, candidate: &Candidate) -> Attribution {
        let row = candidate.criteria.as_array();
        let parts = self.aggregator.contributions(row);
        let total: f64 = parts.iter().sum();
        let contributions = std::array::from_fn(|index| {
            let value = parts.get(index).copied().unwrap_or_default();
            Contribution {
                criterion: Criterion::ALL
                    .get(index)
                    .copied()
                    .unwrap_or(Criterion::PreferenceFit),
                value,
                share: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            }
        });
        Attribution {
            name: candidate.name.clone(),
            utility: self.aggregator.utility(row).value,
            contributions,
        }
    }

    /// Explain why `winner` outranks `loser`.
    #[must_use]
    pub fn compare(&self, winner: &Candidate, loser: &Candidate) -> PairwiseExplanation {
        let gaps = self.gaps(winner, loser);
        let mut advantages: Vec<CriterionGap> = gaps
            .iter()
            .copied()
            .filter(|gap| gap.gap() > self.tolerance)
            .collect();
        advantages.sort_by(|a, b| b.gap().total_cmp(&a.gap()));
        advantages.truncate(MAX_LISTED_GAPS);
        let mut trade_offs: Vec<CriterionGap> = gaps
            .iter()
            .copied()
            .filter(|gap| gap.gap() < -self.tolerance)
            .collect();
        trade_offs.sort_by(|a, b| a.gap().total_cmp(&b.gap()));
        trade_offs.truncate(MAX_LISTED_GAPS);
        PairwiseExplanation {
            winner: winner.name.clone(),
            loser: loser.name.clone(),
            advantages,
            trade_offs,
            tolerance: self.tolerance,
        }
    }

    /// Link consecutive kernel members, in rank order, by their largest
    /// share gap.
    #[must_use]
    pub fn summary(&self, recommendation: &Recommendation) -> Vec<DecidingFactor> {
        let mut members: Vec<&RankedCandidate> = recommendation.kernel.iter().collect();
        members.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.name().cmp(b.name())));
        members
            .windows(2)
            .enumerate()
            .filter_map(|(index, pair)| {
                let [winner, loser] = pair else { return None };
                let gap = self
                    .gaps(&winner.candidate, &loser.candidate)
                    .into_iter()
                    .reduce(|best, gap| {
                        if gap.gap().abs() > best.gap().abs() {
                            gap
                        } else {
                            best
                        }
                    })?;
                Some(DecidingFactor {
                    position: index.saturating_add(1),
                    winner: winner.name().to_owned(),
                    loser: loser.name().to_owned(),
                    gap,
                })
            })
            .collect()
    }

    fn gaps(&self, winner: &Candidate, loser: &Candidate) -> Vec<CriterionGap> {
        let a = self.attribute(winner);
        let b = self.attribute(loser);
        Criterion::ALL
            .into_iter()
            .map(|criterion| CriterionGap {
                criterion,
                winner_share: a.share(criterion),
                loser_share: b.share(criterion),
            })
            .collect()
    }
}
