//! Tests for the `OutrankingRecommender`.

use super::*;
use rstest::{fixture, rstest};
use sojourn_core::{
    ConfigurationError, DataQualityError, EngineConfig, FixedFit, TravelerGroup, TravelerProfile,
    sample_candidate,
};

struct RawFit(f64);

impl PreferenceFit for RawFit {
    fn fit(
        &self,
        _candidate: &Candidate,
        _profile: &sojourn_core::TravelerProfile,
    ) -> Result<f64, ConfigurationError> {
        Ok(self.0)
    }
}

fn candidate(name: &str, category: &str, enriched: [f64; 6]) -> Candidate {
    sample_candidate(name, category, enriched).expect("valid candidate")
}

fn request(candidates: Vec<Candidate>, config: EngineConfig) -> RecommendRequest {
    RecommendRequest::new(
        candidates,
        TravelerGroup::solo(TravelerProfile::new()),
        config,
    )
}

#[fixture]
fn recommender() -> OutrankingRecommender<FixedFit> {
    OutrankingRecommender::new(FixedFit(0.6))
}

#[rstest]
fn dominant_candidate_ranks_first(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![
        candidate("Weak", "park", [0.9, 0.9, 0.1, 0.1, 0.9, 0.6]),
        candidate("Strong", "museum", [0.1, 0.1, 0.9, 0.9, 0.1, 0.9]),
    ];
    let recommendation = recommender
        .recommend(&request(table, EngineConfig::default()))
        .expect("ranking succeeds");
    let names: Vec<&str> = recommendation.ranking.iter().map(RankedCandidate::name).collect();
    assert_eq!(names, vec!["Strong", "Weak"]);
    let ranks: Vec<usize> = recommendation.ranking.iter().map(|entry| entry.rank).collect();
    assert_eq!(ranks, vec![1, 2]);
    assert_eq!(recommendation.diagnostics.supplied, 2);
    assert_eq!(recommendation.diagnostics.admitted, 2);
    assert_eq!(recommendation.diagnostics.tie_groups, 2);
    assert_eq!(recommendation.diagnostics.kernel_size, 2);
}

#[rstest]
fn default_recommender_uses_the_preference_scorer() {
    let recommender = OutrankingRecommender::<PreferenceScorer>::default();
    let table = vec![
        candidate("Museu d'Art", "art museum", [0.2, 0.2, 0.8, 0.8, 0.2, 0.8]),
        candidate("Platja", "beach", [0.8, 0.8, 0.2, 0.2, 0.8, 0.2]),
    ];
    let recommendation = recommender
        .recommend(&request(table, EngineConfig::default()))
        .expect("ranking succeeds");
    assert_eq!(recommendation.ranking.len(), 2);
    let fit = recommendation
        .ranked("Museu d'Art")
        .expect("ranked")
        .candidate
        .criteria
        .get(Criterion::PreferenceFit);
    assert!(fit > 0.0 && fit <= 1.0);
}

#[rstest]
fn utility_uses_stored_cost_values(recommender: OutrankingRecommender<FixedFit>) {
    let low = candidate("Low", "museum", [0.2, 0.5, 0.5, 0.5, 0.5, 0.5]);
    let high = candidate("High", "museum", [0.8, 0.5, 0.5, 0.5, 0.5, 0.5]);
    let utility = |table: Vec<Candidate>, name: &str| {
        recommender
            .recommend(&request(table, EngineConfig::default()))
            .expect("ranking succeeds")
            .kernel_member(name)
            .and_then(|entry| entry.utility)
            .expect("kernel utility")
    };
    assert!(utility(vec![high], "High") > utility(vec![low], "Low"));
}

#[rstest]
fn preference_fit_is_written_into_z7(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![candidate("Only", "museum", [0.5; 6])];
    let recommendation = recommender
        .recommend(&request(table, EngineConfig::default()))
        .expect("ranking succeeds");
    let only = recommendation.ranked("Only").expect("ranked");
    assert_eq!(only.candidate.criteria.get(Criterion::PreferenceFit), 0.6);
    assert_eq!(only.rank, 1);
}

#[rstest]
fn empty_prefilter_returns_empty_recommendation(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![candidate("Bar Marsella", "bar", [0.5; 6])];
    let request = RecommendRequest::new(
        table,
        TravelerGroup::solo(TravelerProfile::new().avoiding("bar")),
        EngineConfig::default(),
    );
    let recommendation = recommender.recommend(&request).expect("ranking succeeds");
    assert!(recommendation.is_empty());
    assert!(recommendation.kernel.is_empty());
    assert_eq!(recommendation.diagnostics.supplied, 1);
    assert_eq!(recommendation.diagnostics.admitted, 0);
}

#[rstest]
fn invalid_configuration_is_rejected(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![candidate("Any", "museum", [0.5; 6])];
    let err = recommender
        .recommend(&request(table, EngineConfig::default().with_group_blend(0.0)))
        .expect_err("blend must be positive");
    assert!(matches!(err, RankingError::Configuration(_)));
}

#[rstest]
fn ties_are_listed_by_name(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![
        candidate("Beta", "museum", [0.5; 6]),
        candidate("Alpha", "museum", [0.5; 6]),
    ];
    let recommendation = recommender
        .recommend(&request(table, EngineConfig::default()))
        .expect("ranking succeeds");
    let names: Vec<&str> = recommendation.ranking.iter().map(RankedCandidate::name).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
    assert!(recommendation.ranking.iter().all(|entry| entry.rank == 1));
    assert_eq!(recommendation.diagnostics.tie_groups, 1);
}

#[rstest]
fn kernel_keeps_one_entry_per_name(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![
        candidate("Twin", "museum", [0.2, 0.2, 0.8, 0.8, 0.2, 0.8]),
        candidate("Twin", "museum", [0.2, 0.2, 0.8, 0.8, 0.2, 0.8]),
        candidate("Other", "park", [0.6, 0.6, 0.4, 0.4, 0.6, 0.6]),
    ];
    let recommendation = recommender
        .recommend(&request(table, EngineConfig::default()))
        .expect("ranking succeeds");
    assert_eq!(recommendation.ranking.len(), 3);
    let twins_in_kernel = recommendation
        .kernel
        .iter()
        .filter(|entry| entry.name() == "Twin")
        .count();
    assert_eq!(twins_in_kernel, 1);
    let twins_with_utility = recommendation
        .ranking
        .iter()
        .filter(|entry| entry.name() == "Twin" && entry.in_kernel())
        .count();
    assert_eq!(twins_with_utility, 1);
}

#[rstest]
fn kernel_is_truncated_and_sorted_by_utility(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![
        candidate("A", "museum", [0.1, 0.2, 0.9, 0.8, 0.2, 0.9]),
        candidate("B", "museum", [0.4, 0.4, 0.6, 0.6, 0.4, 0.7]),
        candidate("C", "museum", [0.7, 0.7, 0.3, 0.3, 0.7, 0.6]),
        candidate("D", "museum", [0.5, 0.3, 0.5, 0.7, 0.5, 0.8]),
    ];
    let config = EngineConfig::default().with_kernel_size(2);
    let recommendation = recommender
        .recommend(&request(table, config))
        .expect("ranking succeeds");
    assert_eq!(recommendation.kernel.len(), 2);
    assert_eq!(recommendation.diagnostics.kernel_size, 2);
    let utilities: Vec<f64> = recommendation
        .kernel
        .iter()
        .filter_map(|entry| entry.utility)
        .collect();
    assert_eq!(utilities.len(), 2);
    assert!(utilities.windows(2).all(|pair| matches!(pair, [a, b] if a >= b)));
    let in_kernel = recommendation
        .ranking
        .iter()
        .filter(|entry| entry.in_kernel())
        .count();
    assert_eq!(in_kernel, 2);
}

#[rstest]
fn zero_valued_criterion_warns(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![candidate("Off-season", "museum", [0.2, 0.2, 0.0, 0.8, 0.2, 0.8])];
    let recommendation = recommender
        .recommend(&request(table, EngineConfig::default()))
        .expect("ranking succeeds");
    let warning = recommendation.warnings.first().expect("one warning");
    assert_eq!(warning.candidate, "Off-season");
    assert_eq!(warning.criteria, vec![Criterion::Seasonality]);
    let entry = recommendation.kernel_member("Off-season").expect("in kernel");
    assert_eq!(entry.utility, Some(0.0));
}

#[rstest]
fn group_requests_blend_fits(recommender: OutrankingRecommender<FixedFit>) {
    let group = TravelerGroup::new(vec![TravelerProfile::new(), TravelerProfile::new()])
        .expect("non-empty group");
    let request = RecommendRequest::new(
        vec![candidate("Shared", "museum", [0.5; 6])],
        group,
        EngineConfig::default(),
    );
    let recommendation = recommender.recommend(&request).expect("ranking succeeds");
    let shared = recommendation.ranked("Shared").expect("ranked");
    let fit = shared.candidate.criteria.get(Criterion::PreferenceFit);
    assert!((fit - 0.6).abs() < 1e-12);
}

#[rstest]
fn out_of_range_fit_names_the_supplied_row() {
    let recommender = OutrankingRecommender::new(RawFit(1.5));
    let table = vec![
        candidate("Skipped", "bar", [0.5; 6]),
        candidate("Kept", "museum", [0.5; 6]),
    ];
    let request = RecommendRequest::new(
        table,
        TravelerGroup::solo(TravelerProfile::new().avoiding("bar")),
        EngineConfig::default(),
    );
    let err = recommender.recommend(&request).expect_err("fit out of range");
    assert!(matches!(
        err,
        RankingError::DataQuality {
            index: 1,
            source: DataQualityError::CriterionOutOfRange { .. },
        }
    ));
}

#[rstest]
fn identical_requests_give_identical_results(recommender: OutrankingRecommender<FixedFit>) {
    let table = vec![
        candidate("A", "museum", [0.3, 0.6, 0.4, 0.7, 0.2, 0.9]),
        candidate("B", "park", [0.6, 0.3, 0.7, 0.4, 0.5, 0.6]),
        candidate("C", "bar", [0.2, 0.8, 0.5, 0.5, 0.3, 0.7]),
    ];
    let request = request(table, EngineConfig::default());
    let first = recommender.recommend(&request).expect("first run");
    let second = recommender.recommend(&request).expect("second run");
    assert_eq!(first.ranking, second.ranking);
    assert_eq!(first.kernel, second.kernel);
    assert_eq!(first.warnings, second.warnings);
}
