//! Behavioural coverage for engine configuration validation.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sojourn_core::{
    CRITERION_COUNT, ConfigurationError, Criterion, CriterionWeights, EngineConfig, Thresholds,
};

/// Configuration under test and the outcome of validating it.
pub struct ConfigContext {
    config: RefCell<EngineConfig>,
    outcome: RefCell<Option<Result<(), ConfigurationError>>>,
}

#[fixture]
/// Build a fresh context for each scenario.
pub fn context() -> ConfigContext {
    ConfigContext {
        config: RefCell::new(EngineConfig::default()),
        outcome: RefCell::new(None),
    }
}

#[given("the default engine configuration")]
fn default_configuration(context: &ConfigContext) {
    *context.config.borrow_mut() = EngineConfig::default();
}

#[given("crowding thresholds with indifference above preference")]
fn inverted_crowding_thresholds(context: &ConfigContext) {
    let config = context.config.borrow().clone();
    *context.config.borrow_mut() =
        config.with_thresholds(Criterion::Crowding, Thresholds::new(0.3, 0.2, 0.5));
}

#[given("every criterion weight set to zero")]
fn zero_weights(context: &ConfigContext) {
    let config = context.config.borrow().clone();
    *context.config.borrow_mut() =
        config.with_weights(CriterionWeights::new([0.0; CRITERION_COUNT]));
}

#[given("a group blend factor of zero")]
fn zero_blend(context: &ConfigContext) {
    let config = context.config.borrow().clone();
    *context.config.borrow_mut() = config.with_group_blend(0.0);
}

#[when("I validate the configuration")]
fn validate(context: &ConfigContext) {
    let outcome = context.config.borrow().validate();
    *context.outcome.borrow_mut() = Some(outcome);
}

#[then("the configuration is accepted")]
fn accepted(context: &ConfigContext) {
    assert!(matches!(*context.outcome.borrow(), Some(Ok(()))));
}

#[then("a threshold error names the crowding criterion")]
fn threshold_error(context: &ConfigContext) {
    assert!(matches!(
        *context.outcome.borrow(),
        Some(Err(ConfigurationError::InvalidThresholds {
            criterion: Criterion::Crowding,
            ..
        }))
    ));
}

#[then("a zero weight sum error is returned")]
fn zero_sum_error(context: &ConfigContext) {
    assert!(matches!(
        *context.outcome.borrow(),
        Some(Err(ConfigurationError::ZeroWeightSum))
    ));
}

#[then("an out of range error names the group blend factor")]
fn blend_error(context: &ConfigContext) {
    assert!(matches!(
        *context.outcome.borrow(),
        Some(Err(ConfigurationError::OutOfRange {
            parameter: "group blend factor",
            ..
        }))
    ));
}

#[scenario(path = "tests/features/engine_config.feature", index = 0)]
fn default_configuration_is_accepted(context: ConfigContext) {
    let _ = context;
}

#[scenario(path = "tests/features/engine_config.feature", index = 1)]
fn inverted_thresholds_are_rejected(context: ConfigContext) {
    let _ = context;
}

#[scenario(path = "tests/features/engine_config.feature", index = 2)]
fn zero_weight_sum_is_rejected(context: ConfigContext) {
    let _ = context;
}

#[scenario(path = "tests/features/engine_config.feature", index = 3)]
fn zero_blend_is_rejected(context: ConfigContext) {
    let _ = context;
}
