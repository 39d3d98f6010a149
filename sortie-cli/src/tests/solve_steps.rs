//! Behaviour-driven step definitions driving the solve CLI scenarios.

use std::cell::{Cell, RefCell};

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sortie_core::test_support::{FixedRoutesEngine, scenario_a_data};
use sortie_core::{NodeIndex, ProblemError, Report, RoutingEngine};

use super::helpers::{Workspace, write_problem, write_utf8};
use super::*;
use crate::solve::{DefaultSolveEngineBuilder, SolveConfig, SolveEngineBuilder, run_solve_with};

#[derive(Debug)]
struct SolveWorld {
    workspace: Workspace,
    problem_path: Utf8PathBuf,
    include_problem: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    engine_built: Cell<bool>,
    use_vrp_engine: Cell<bool>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SolveWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let problem_path = workspace.path("problem.json");
        Self {
            workspace,
            problem_path,
            include_problem: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            engine_built: Cell::new(false),
            use_vrp_engine: Cell::new(false),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["sortie".to_owned(), "solve".to_owned()];
        if *self.include_problem.borrow() {
            argv.push(self.problem_path.as_str().to_owned());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn stdout(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn expect_success(&self) {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
    }
}

#[fixture]
fn world() -> SolveWorld {
    SolveWorld::new()
}

/// Builder handing out a fixed-route engine and remembering that it ran.
struct StubEngineBuilder<'a> {
    routes: Vec<Vec<NodeIndex>>,
    built: &'a Cell<bool>,
}

impl SolveEngineBuilder for StubEngineBuilder<'_> {
    fn build(&self, _config: &SolveConfig) -> Result<Box<dyn RoutingEngine>, CliError> {
        self.built.set(true);
        Ok(Box::new(FixedRoutesEngine::new(self.routes.clone())))
    }
}

#[given("a valid problem record exists on disk")]
fn valid_problem_exists(#[from(world)] world: &SolveWorld) {
    write_problem(&world.problem_path, &scenario_a_data());
}

#[given("I request JSON output")]
fn request_json_output(#[from(world)] world: &SolveWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_SOLVE_FORMAT}"), "json".to_owned()]);
}

#[given("the vrp engine searches briefly")]
fn vrp_engine_searches_briefly(#[from(world)] world: &SolveWorld) {
    world.use_vrp_engine.set(true);
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_SOLVE_TIME_LIMIT}"),
        "5".to_owned(),
        format!("--{ARG_SOLVE_MAX_GENERATIONS}"),
        "5".to_owned(),
    ]);
}

#[given("initial routes exist on disk")]
fn initial_routes_exist(#[from(world)] world: &SolveWorld) {
    let path = world.workspace.path("routes.json");
    write_utf8(&path, b"[[1, 2]]");
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_SOLVE_INITIAL_ROUTES}"),
        path.as_str().to_owned(),
    ]);
}

#[given("the problem record contains invalid JSON")]
fn problem_contains_invalid_json(#[from(world)] world: &SolveWorld) {
    write_utf8(&world.problem_path, b"{ not valid json");
}

#[given("the problem record has mismatched matrices")]
fn problem_has_mismatched_matrices(#[from(world)] world: &SolveWorld) {
    let mut data = scenario_a_data();
    data.distance_matrix.pop();
    write_problem(&world.problem_path, &data);
}

#[given("I omit the problem path")]
fn omit_problem_path(#[from(world)] world: &SolveWorld) {
    *world.include_problem.borrow_mut() = false;
}

#[when("I run the solve command")]
fn run_solve_command(#[from(world)] world: &SolveWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Solve(args) => {
            let stub = StubEngineBuilder {
                routes: vec![vec![1, 2]],
                built: &world.engine_built,
            };
            let builder: &dyn SolveEngineBuilder = if world.use_vrp_engine.get() {
                &DefaultSolveEngineBuilder
            } else {
                &stub
            };
            let mut buffer = world.stdout.borrow_mut();
            run_solve_with(args, builder, &mut *buffer)
        }
    });

    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints a route table with makespan 45")]
fn command_prints_route_table(#[from(world)] world: &SolveWorld) {
    world.expect_success();
    let stdout = world.stdout();
    assert!(stdout.contains("Route for vehicle 0:"));
    assert!(stdout.contains("Makespan of the route: 45m"));
    assert!(stdout.contains("Total makespan of all routes: 45m"));
    assert!(world.engine_built.get());
}

#[then("the command succeeds and prints a JSON report")]
fn command_prints_json(#[from(world)] world: &SolveWorld) {
    world.expect_success();
    let report: Report =
        serde_json::from_str(&world.stdout()).expect("output should be a JSON report");
    assert_eq!(report.total_makespan, 45);
    assert_eq!(report.itineraries.len(), 1);
    assert!(report.unvisited.is_empty());
}

#[then("the command succeeds and prints a JSON report serving the demand pair")]
fn command_prints_json_from_search(#[from(world)] world: &SolveWorld) {
    world.expect_success();
    let report: Report =
        serde_json::from_str(&world.stdout()).expect("output should be a JSON report");
    assert_eq!(report.total_makespan, 45);
    assert!(report.unvisited.is_empty());
}

#[then("the command succeeds without building an engine")]
fn command_skips_engine(#[from(world)] world: &SolveWorld) {
    world.expect_success();
    assert!(!world.engine_built.get());
    assert!(world.stdout().contains("Makespan of the route: 45m"));
}

#[then("the command fails because the problem JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &SolveWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::ParseInput { field, .. } => assert_eq!(*field, ARG_SOLVE_PROBLEM),
        other => panic!("expected ParseInput, found {other:?}"),
    }
}

#[then("the command fails because the problem is invalid")]
fn command_fails_invalid_problem(#[from(world)] world: &SolveWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::InvalidProblem { source, .. } => {
            assert!(matches!(source, ProblemError::MatrixShape { .. }));
        }
        other => panic!("expected InvalidProblem, found {other:?}"),
    }
}

#[then("the command fails because the problem path is missing")]
fn command_fails_missing_problem_path(#[from(world)] world: &SolveWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_SOLVE_PROBLEM),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_solve_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/solve_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SolveWorld) {
            let _ = world;
        }
    };
}

register_solve_scenario!(solve_prints_tables, "printing route tables for a problem record");
register_solve_scenario!(solve_prints_json, "printing the report as JSON");
register_solve_scenario!(
    solve_evaluates_initial_routes,
    "evaluating initial routes instead of searching"
);
register_solve_scenario!(solve_invalid_json, "rejecting invalid JSON input");
register_solve_scenario!(solve_invalid_problem, "rejecting inconsistent problem records");
register_solve_scenario!(solve_missing_problem, "rejecting missing problem paths");
#[cfg(feature = "solver-vrp")]
register_solve_scenario!(
    solve_prints_json_from_search,
    "printing a JSON report from the vrp engine"
);
