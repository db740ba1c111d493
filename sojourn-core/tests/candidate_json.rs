#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when fixtures are malformed"
)]

//! Candidate tables and requests decode from the JSON shapes written by the
//! data layer.

use rstest::rstest;
use sojourn_core::{
    Candidate, CandidateRecord, Criterion, DataQualityError, NEUTRAL_PRIOR, Preference,
    RecommendRequest, TravelerGroup,
};

#[rstest]
fn record_with_partial_criteria_decodes() {
    let json = r#"{"name":"Castell de Montjuïc","municipality":"Barcelona","category":"heritage","lat":41.3636,"lon":2.1661,"z1":0.3,"z5":0.6}"#;
    let record: CandidateRecord = serde_json::from_str(json).expect("decode record");
    let candidate = Candidate::try_from(record).expect("valid record");
    assert_eq!(candidate.criteria.get(Criterion::HeritageFragility), 0.6);
    assert_eq!(candidate.criteria.get(Criterion::Accessibility), NEUTRAL_PRIOR);
}

#[rstest]
fn stored_preference_fit_is_ignored() {
    let json = r#"{"name":"Platja de la Barceloneta","lat":41.378,"lon":2.192,"z7":0.99}"#;
    let record: CandidateRecord = serde_json::from_str(json).expect("unknown fields are ignored");
    let candidate = Candidate::try_from(record).expect("valid record");
    assert_eq!(candidate.criteria.get(Criterion::PreferenceFit), NEUTRAL_PRIOR);
}

#[rstest]
fn out_of_range_value_is_a_data_quality_error() {
    let json = r#"{"name":"Tibidabo","lat":41.4218,"lon":2.1188,"z2":1.4}"#;
    let record: CandidateRecord = serde_json::from_str(json).expect("decode record");
    let err = Candidate::try_from(record).expect_err("z2 out of range");
    assert!(matches!(
        err,
        DataQualityError::CriterionOutOfRange {
            criterion: Criterion::Crowding,
            ..
        }
    ));
}

#[rstest]
fn request_decodes_with_default_config() {
    let json = r#"{
        "candidates": [],
        "travelers": [
            {"name": "Ada", "preferences": {"culture": 0.9, "nature": 0.1}},
            {"name": "Grace", "mobility_constrained": true}
        ]
    }"#;
    let request: RecommendRequest = serde_json::from_str(json).expect("decode request");
    assert_eq!(request.travelers.len(), 2);
    assert_eq!(request.config.kernel_size, 9);
    let primary = request.travelers.primary();
    assert_eq!(primary.preferences.weight(Preference::Culture), 0.9);
    assert_eq!(primary.preferences.weight(Preference::Nightlife), 0.5);
}

#[rstest]
fn empty_traveller_list_is_rejected() {
    let json = r#"{"candidates": [], "travelers": []}"#;
    let result: Result<RecommendRequest, _> = serde_json::from_str(json);
    assert!(result.is_err());
    let group: Result<TravelerGroup, _> = serde_json::from_str("[]");
    assert!(group.is_err());
}
