//! Behaviour-driven step definitions driving the CLI scenarios.

use super::helpers::{Workspace, destination_ids, invoke, parse_output};
use super::*;
use crate::catalog::SNAPSHOT_FILE;
use crate::nearby::ARG_NEARBY_PLACE_ID;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Aggregates scenario state so each step only needs a single world
/// argument.
#[derive(Debug)]
struct CliWorld {
    workspace: RefCell<Option<Workspace>>,
    outcome: RefCell<Option<Result<String, CliError>>>,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            workspace: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn run(&self, args: &[&str]) {
        let data_dir = self
            .workspace
            .borrow()
            .as_ref()
            .expect("workspace prepared")
            .root()
            .to_string();
        let invocation = args
            .iter()
            .map(|arg| (*arg).to_owned())
            .chain(["--data-dir".to_owned(), data_dir]);
        self.outcome.replace(Some(invoke(invocation)));
    }

    fn output(&self) -> serde_json::Value {
        let borrowed = self.outcome.borrow();
        let output = borrowed
            .as_ref()
            .expect("command ran")
            .as_ref()
            .expect("expected success");
        parse_output(output)
    }
}

#[fixture]
fn world() -> CliWorld {
    CliWorld::new()
}

#[given("a data directory with raw tables")]
fn raw_tables(#[from(world)] world: &CliWorld) {
    world.workspace.replace(Some(Workspace::with_tables()));
}

#[given("the catalog has been prepared")]
fn catalog_prepared(#[from(world)] world: &CliWorld) {
    world.run(&["prepare"]);
    world.output();
}

#[when("I run the prepare command")]
fn run_prepare_command(#[from(world)] world: &CliWorld) {
    world.run(&["prepare"]);
}

#[when("I explore destinations in the Netherlands")]
fn explore_netherlands(#[from(world)] world: &CliWorld) {
    world.run(&["explore", "--country", "netherlands", "--seed", "5"]);
}

#[when("I ask for destinations near place 404")]
fn nearby_unknown(#[from(world)] world: &CliWorld) {
    world.run(&["nearby", "404"]);
}

#[when("I ask for nearby destinations without a place")]
fn nearby_without_place(#[from(world)] world: &CliWorld) {
    world.run(&["nearby"]);
}

#[when("I ask for destination 404")]
fn destination_unknown(#[from(world)] world: &CliWorld) {
    world.run(&["destination", "404"]);
}

#[then("the command reports seven kept destinations")]
fn reports_kept(#[from(world)] world: &CliWorld) {
    let summary = world.output();
    assert_eq!(
        summary.get("kept").and_then(serde_json::Value::as_u64),
        Some(7)
    );
}

#[then("a catalog snapshot exists in the data directory")]
fn snapshot_exists(#[from(world)] world: &CliWorld) {
    let borrowed = world.workspace.borrow();
    let root = borrowed.as_ref().expect("workspace prepared").root();
    assert!(stairway_data::fs::is_file(&root.join(SNAPSHOT_FILE)).expect("stat snapshot"));
}

#[then("the response lists the three Dutch destinations")]
fn lists_dutch(#[from(world)] world: &CliWorld) {
    let mut ids = destination_ids(&world.output());
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 6]);
}

#[then("the response lists no destinations")]
fn lists_nothing(#[from(world)] world: &CliWorld) {
    assert!(destination_ids(&world.output()).is_empty());
}

#[then("the response is null")]
fn response_is_null(#[from(world)] world: &CliWorld) {
    assert!(world.output().is_null());
}

#[then("the CLI reports that the \"place-id\" argument is missing")]
fn reports_missing_place(#[from(world)] world: &CliWorld) {
    let borrowed = world.outcome.borrow();
    let error = borrowed
        .as_ref()
        .expect("command ran")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_NEARBY_PLACE_ID),
        other => panic!("unexpected error {other:?}"),
    }
}

macro_rules! register_cli_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/cli.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CliWorld) {
            let _ = world;
        }
    };
}

register_cli_scenario!(preparing_snapshot, "preparing a snapshot from raw tables");
register_cli_scenario!(
    exploring_by_country,
    "exploring a prepared catalog by country"
);
register_cli_scenario!(
    unknown_nearby_place,
    "asking for neighbours of an unknown place"
);
register_cli_scenario!(unknown_destination, "asking for an unknown destination");
register_cli_scenario!(missing_nearby_place, "rejecting a missing reference place");
