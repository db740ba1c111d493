//! `Recommender` implementation backed by outranking.

use std::time::Instant;

use sojourn_core::{
    Candidate, Criterion, DegenerateAggregationWarning, Diagnostics, PreferenceFit,
    RankedCandidate, RankingError, RecommendRequest, Recommendation, Recommender,
};
use sojourn_scorer::{PreferenceScorer, group_fit, prefilter_group, score_all};

use crate::{
    CompromiseAggregator, CredibilityMatrix, OrientedRow, Preorder, distill, select_kernel,
};

/// Recommender running the full pipeline: pre-filter, preference fit,
/// credibility, distillation and the compromise kernel.
///
/// The recommender is generic over the [`PreferenceFit`] producing `z7`.
///
/// # Examples
/// ```
/// use sojourn_core::{
///     EngineConfig, RecommendRequest, Recommender, TravelerGroup, TravelerProfile,
///     sample_candidate,
/// };
/// use sojourn_outrank::OutrankingRecommender;
/// use sojourn_scorer::PreferenceScorer;
///
/// let candidates = vec![
///     sample_candidate("Museu d'Art", "museum", [0.1, 0.1, 0.9, 0.9, 0.1, 0.9])?,
///     sample_candidate("Platja Gran", "beach", [0.9, 0.9, 0.1, 0.1, 0.9, 0.6])?,
/// ];
/// let request = RecommendRequest::new(
///     candidates,
///     TravelerGroup::solo(TravelerProfile::new()),
///     EngineConfig::default(),
/// );
/// let recommendation =
///     OutrankingRecommender::new(PreferenceScorer::default()).recommend(&request)?;
/// assert_eq!(recommendation.ranking[0].name(), "Museu d'Art");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutrankingRecommender<F = PreferenceScorer> {
    fit: F,
}

impl<F> OutrankingRecommender<F>
where
    F: PreferenceFit,
{
    /// Construct a recommender around a preference scorer.
    pub const fn new(fit: F) -> Self {
        Self { fit }
    }

    /// The preference scorer in use.
    pub const fn fit(&self) -> &F {
        &self.fit
    }

    fn with_fit(
        &self,
        request: &RecommendRequest,
        admitted: &[&Candidate],
    ) -> Result<Vec<Candidate>, RankingError> {
        let owned: Vec<Candidate> = admitted.iter().map(|candidate| (*candidate).clone()).collect();
        let fits = if request.travelers.len() == 1 {
            score_all(&self.fit, &owned, request.travelers.primary())?
        } else {
            group_fit(
                &self.fit,
                &owned,
                &request.travelers,
                request.config.group_blend,
            )?
        };
        owned
            .into_iter()
            .zip(fits)
            .zip(admitted)
            .map(|((mut candidate, fit), original)| {
                candidate.criteria = candidate
                    .criteria
                    .with(Criterion::PreferenceFit, fit)
                    .map_err(|source| RankingError::DataQuality {
                        index: supplied_index(&request.candidates, original),
                        source,
                    })?;
                Ok(candidate)
            })
            .collect()
    }
}

impl<F> Recommender for OutrankingRecommender<F>
where
    F: PreferenceFit,
{
    fn recommend(&self, request: &RecommendRequest) -> Result<Recommendation, RankingError> {
        let started_at = Instant::now();
        let config = &request.config;
        config.validate()?;

        let supplied = request.candidates.len();
        let admitted = prefilter_group(&request.candidates, &request.travelers, config.group_filter);
        if admitted.is_empty() {
            log::debug!("no candidate of {supplied} passed the pre-filter");
            return Ok(Recommendation {
                diagnostics: Diagnostics {
                    supplied,
                    elapsed: started_at.elapsed(),
                    ..Diagnostics::default()
                },
                ..Recommendation::default()
            });
        }

        let scored = self.with_fit(request, &admitted)?;
        let rows: Vec<OrientedRow> = scored
            .iter()
            .map(|candidate| candidate.criteria.oriented())
            .collect();
        let names: Vec<&str> = scored.iter().map(|candidate| candidate.name.as_str()).collect();
        let matrix = CredibilityMatrix::build(&rows, config)?;
        let preorder = distill(&matrix, &names, config)?;
        let members = select_kernel(&names, preorder.ranks(), config.kernel_size)?;
        let aggregator = CompromiseAggregator::new(config)?;

        let mut utilities: Vec<Option<f64>> = vec![None; scored.len()];
        let mut warnings: Vec<DegenerateAggregationWarning> = Vec::new();
        for index in &members {
            let (Some(candidate), Some(name)) = (scored.get(*index), names.get(*index)) else {
                continue;
            };
            let (utility, warning) = aggregator.evaluate(name, candidate.criteria.as_array());
            if let Some(slot) = utilities.get_mut(*index) {
                *slot = Some(utility);
            }
            warnings.extend(warning);
        }

        let tie_groups = preorder.group_count();
        let ranking = assemble_ranking(scored, &preorder, utilities);
        let kernel = assemble_kernel(&ranking);
        log::debug!(
            "ranked {} of {supplied} candidates into {tie_groups} tie groups; kernel holds {}",
            ranking.len(),
            kernel.len()
        );

        let diagnostics = Diagnostics {
            supplied,
            admitted: ranking.len(),
            tie_groups,
            kernel_size: kernel.len(),
            elapsed: started_at.elapsed(),
        };
        Ok(Recommendation {
            ranking,
            kernel,
            warnings,
            diagnostics,
        })
    }
}

fn supplied_index(candidates: &[Candidate], admitted: &Candidate) -> usize {
    candidates
        .iter()
        .position(|candidate| std::ptr::eq(candidate, admitted))
        .unwrap_or_default()
}

fn assemble_ranking(
    scored: Vec<Candidate>,
    preorder: &Preorder,
    utilities: Vec<Option<f64>>,
) -> Vec<RankedCandidate> {
    let mut ranking: Vec<RankedCandidate> = scored
        .into_iter()
        .zip(preorder.ranks())
        .zip(utilities)
        .map(|((candidate, rank), utility)| RankedCandidate {
            candidate,
            rank: *rank,
            utility,
        })
        .collect();
    ranking.sort_by(|lhs, rhs| {
        lhs.rank
            .cmp(&rhs.rank)
            .then_with(|| lhs.name().cmp(rhs.name()))
    });
    ranking
}

fn assemble_kernel(ranking: &[RankedCandidate]) -> Vec<RankedCandidate> {
    let mut kernel: Vec<RankedCandidate> = ranking
        .iter()
        .filter(|entry| entry.in_kernel())
        .cloned()
        .collect();
    kernel.sort_by(|lhs, rhs| {
        let lhs_utility = lhs.utility.unwrap_or_default();
        let rhs_utility = rhs.utility.unwrap_or_default();
        rhs_utility
            .total_cmp(&lhs_utility)
            .then_with(|| lhs.rank.cmp(&rhs.rank))
            .then_with(|| lhs.name().cmp(rhs.name()))
    });
    kernel
}

#[cfg(test)]
mod tests;
