//! Behaviour-driven step definitions driving the compare CLI scenarios.

use super::helpers::{Workspace, ladder, solo_request};
use super::*;
use crate::compare::run_compare_with;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;

#[derive(Debug)]
struct CompareWorld {
    workspace: Workspace,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

#[fixture]
fn world() -> CompareWorld {
    CompareWorld {
        workspace: Workspace::new(),
        cli_args: RefCell::new(Vec::new()),
        stdout: RefCell::new(Vec::new()),
        result: RefCell::new(None),
    }
}

#[given("a request and a candidate ladder for comparison")]
fn inputs_exist(#[from(world)] world: &CompareWorld) {
    world.workspace.write_request(&solo_request());
    world.workspace.write_table(&ladder());
}

#[given("the kernel size is limited to 1")]
fn single_member_kernel(#[from(world)] world: &CompareWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_KERNEL_SIZE}"), "1".to_owned()]);
}

#[when("I compare Beta with Alpha")]
fn compare_beta_alpha(#[from(world)] world: &CompareWorld) {
    let mut argv = vec![
        "sojourn".to_owned(),
        "compare".to_owned(),
        world.workspace.request_path().into_string(),
        format!("--{ARG_CANDIDATES}"),
        world.workspace.table_path().into_string(),
        format!("--{ARG_FIRST}"),
        "Beta".to_owned(),
        format!("--{ARG_SECOND}"),
        "Alpha".to_owned(),
    ];
    argv.extend(world.cli_args.borrow().iter().cloned());
    let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Compare(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_compare_with(args, &mut *buffer)
        }
        Command::Rank(_) => panic!("expected compare command"),
    });
    world.result.replace(Some(outcome));
}

#[then("the explanation names Alpha as the winner over Beta")]
fn alpha_wins(#[from(world)] world: &CompareWorld) {
    let borrowed = world.result.borrow();
    borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");
    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let report: Value = serde_json::from_str(&stdout).expect("output should be JSON");
    assert_eq!(
        report.pointer("/explanation/winner").and_then(Value::as_str),
        Some("Alpha")
    );
    assert_eq!(
        report.pointer("/explanation/loser").and_then(Value::as_str),
        Some("Beta")
    );
    let text = report.get("text").and_then(Value::as_str).expect("text");
    assert!(text.starts_with("#### Why **Alpha** outranks **Beta**:"), "{text}");
}

#[then("the command fails because Beta is not in the kernel")]
fn beta_outside_kernel(#[from(world)] world: &CompareWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    assert!(
        matches!(error, CliError::NotInKernel { name } if name == "Beta"),
        "expected NotInKernel, found {error:?}"
    );
}

macro_rules! register_compare_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/compare_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CompareWorld) {
            let _ = world;
        }
    };
}

register_compare_scenario!(compare_happy_path, "explaining two kernel members");
register_compare_scenario!(compare_outside_kernel, "rejecting a candidate outside the kernel");
