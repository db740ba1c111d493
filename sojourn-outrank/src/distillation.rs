//! Turn a credibility matrix into a total preorder.
//!
//! Descending distillation repeatedly extracts the best remaining tie group:
//! at each step the cutoff `λ = λ_max − s(λ_max)` is derived from the highest
//! credibility left, and the candidates that nothing outranks at that cutoff
//! form the next group. Ascending distillation mirrors this from the bottom.

use serde::{Deserialize, Serialize};
use sojourn_core::{Discrimination, DistillationMode, EngineConfig};

use crate::{CredibilityMatrix, OutrankError};

/// Ranks with tie groups; rank `1` is best.
///
/// Members of a group are stored by name (then input position) so the
/// serialised order is deterministic; it implies no preference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preorder {
    ranks: Vec<usize>,
    groups: Vec<Vec<usize>>,
}

impl Preorder {
    fn from_groups(size: usize, groups: Vec<Vec<usize>>) -> Self {
        let mut ranks = vec![0; size];
        for (position, group) in groups.iter().enumerate() {
            for member in group {
                if let Some(rank) = ranks.get_mut(*member) {
                    *rank = position.saturating_add(1);
                }
            }
        }
        Self { ranks, groups }
    }

    /// Rank of every candidate in input order.
    #[must_use]
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Rank of candidate `index`.
    #[must_use]
    pub fn rank(&self, index: usize) -> Option<usize> {
        self.ranks.get(index).copied()
    }

    /// Tie groups, best first.
    #[must_use]
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Number of tie groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of ranked candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether no candidate was ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Which end of the preorder a distillation step extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Best,
    Worst,
}

/// The thresholded outranking relation among the remaining candidates.
struct Cut<'a> {
    matrix: &'a CredibilityMatrix,
    cutoff: f64,
    margin: f64,
}

impl Cut<'_> {
    #[expect(
        clippy::float_arithmetic,
        reason = "the relation compares credibility against a margin"
    )]
    fn outranks(&self, a: usize, b: usize) -> bool {
        let forward = self.matrix.get(a, b);
        a != b && forward > self.cutoff && forward > self.matrix.get(b, a) + self.margin
    }

    fn qualification(&self, a: usize, remaining: &[usize]) -> i64 {
        remaining.iter().fold(0_i64, |score, &b| {
            if self.outranks(a, b) {
                score.saturating_add(1)
            } else if self.outranks(b, a) {
                score.saturating_sub(1)
            } else {
                score
            }
        })
    }
}

/// Run descending distillation.
///
/// # Errors
/// Returns [`OutrankError::LengthMismatch`] when `names` does not have one
/// entry per matrix row.
pub fn descending(
    matrix: &CredibilityMatrix,
    names: &[&str],
    discrimination: Discrimination,
) -> Result<Preorder, OutrankError> {
    check_names(matrix, names)?;
    let groups = extract_groups(matrix, names, discrimination, Direction::Best);
    Ok(Preorder::from_groups(matrix.len(), groups))
}

/// Run ascending distillation: the worst group is extracted first, but the
/// result is still reported best first.
///
/// # Errors
/// Returns [`OutrankError::LengthMismatch`] when `names` does not have one
/// entry per matrix row.
pub fn ascending(
    matrix: &CredibilityMatrix,
    names: &[&str],
    discrimination: Discrimination,
) -> Result<Preorder, OutrankError> {
    check_names(matrix, names)?;
    let mut groups = extract_groups(matrix, names, discrimination, Direction::Worst);
    groups.reverse();
    Ok(Preorder::from_groups(matrix.len(), groups))
}

/// Rank by the sum of descending and ascending positions, densely.
///
/// # Errors
/// Returns [`OutrankError::LengthMismatch`] when `names` does not have one
/// entry per matrix row.
pub fn combined(
    matrix: &CredibilityMatrix,
    names: &[&str],
    discrimination: Discrimination,
) -> Result<Preorder, OutrankError> {
    let down = descending(matrix, names, discrimination)?;
    let up = ascending(matrix, names, discrimination)?;
    let totals: Vec<usize> = down
        .ranks()
        .iter()
        .zip(up.ranks())
        .map(|(d, u)| d.saturating_add(*u))
        .collect();
    let mut distinct = totals.clone();
    distinct.sort_unstable();
    distinct.dedup();
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); distinct.len()];
    for (index, total) in totals.iter().enumerate() {
        if let Ok(position) = distinct.binary_search(total)
            && let Some(group) = groups.get_mut(position)
        {
            group.push(index);
        }
    }
    for group in &mut groups {
        sort_group(group, names);
    }
    Ok(Preorder::from_groups(matrix.len(), groups))
}

/// Distil with the procedure selected in `config`.
///
/// # Errors
/// Returns [`OutrankError::LengthMismatch`] when `names` does not have one
/// entry per matrix row.
pub fn distill(
    matrix: &CredibilityMatrix,
    names: &[&str],
    config: &EngineConfig,
) -> Result<Preorder, OutrankError> {
    match config.distillation {
        DistillationMode::Descending => descending(matrix, names, config.discrimination),
        DistillationMode::Combined => combined(matrix, names, config.discrimination),
    }
}

fn check_names(matrix: &CredibilityMatrix, names: &[&str]) -> Result<(), OutrankError> {
    if names.len() == matrix.len() {
        Ok(())
    } else {
        Err(OutrankError::LengthMismatch {
            what: "name list",
            expected: matrix.len(),
            found: names.len(),
        })
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "the cutoff subtracts the discrimination margin"
)]
fn extract_groups(
    matrix: &CredibilityMatrix,
    names: &[&str],
    discrimination: Discrimination,
    direction: Direction,
) -> Vec<Vec<usize>> {
    let mut remaining: Vec<usize> = (0..matrix.len()).collect();
    let mut groups = Vec::new();
    while !remaining.is_empty() {
        let lambda_max = max_credibility(matrix, &remaining);
        let margin = discrimination.margin(lambda_max);
        let cut = Cut {
            matrix,
            cutoff: lambda_max - margin,
            margin,
        };
        let mut group: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&a| match direction {
                Direction::Best => !remaining.iter().any(|&b| cut.outranks(b, a)),
                Direction::Worst => !remaining.iter().any(|&b| cut.outranks(a, b)),
            })
            .collect();
        if group.is_empty() {
            log::debug!(
                "no candidate is unbeaten at cutoff {:.3}; falling back to qualification",
                cut.cutoff
            );
            group = by_qualification(&cut, &remaining, direction);
        }
        sort_group(&mut group, names);
        remaining.retain(|index| !group.contains(index));
        groups.push(group);
    }
    groups
}

fn by_qualification(cut: &Cut<'_>, remaining: &[usize], direction: Direction) -> Vec<usize> {
    let scored: Vec<(usize, i64)> = remaining
        .iter()
        .map(|&a| (a, cut.qualification(a, remaining)))
        .collect();
    let target = match direction {
        Direction::Best => scored.iter().map(|(_, q)| *q).max(),
        Direction::Worst => scored.iter().map(|(_, q)| *q).min(),
    };
    scored
        .into_iter()
        .filter(|(_, q)| Some(*q) == target)
        .map(|(a, _)| a)
        .collect()
}

fn max_credibility(matrix: &CredibilityMatrix, remaining: &[usize]) -> f64 {
    remaining
        .iter()
        .flat_map(|&a| {
            remaining
                .iter()
                .filter(move |&&b| b != a)
                .map(move |&b| matrix.get(a, b))
        })
        .fold(0.0, f64::max)
}

fn sort_group(group: &mut [usize], names: &[&str]) {
    group.sort_by(|a, b| {
        let name_a = names.get(*a).copied().unwrap_or_default();
        let name_b = names.get(*b).copied().unwrap_or_default();
        name_a.cmp(name_b).then_with(|| a.cmp(b))
    });
}
