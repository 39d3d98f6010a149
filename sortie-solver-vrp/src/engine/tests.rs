//! Tests for the `VrpEngine`.

use std::time::Duration;

use rstest::{fixture, rstest};
use sortie_core::test_support::{checkpoint_data, scenario_a_data, scenario_a_model, standard_model};
use sortie_core::{AircraftProfile, ProblemData};

use super::*;

#[fixture]
fn search() -> SearchConfig {
    SearchConfig {
        time_limit: Duration::from_secs(5),
        max_generations: Some(20),
        ..SearchConfig::default()
    }
}

#[rstest]
fn default_config_caps_generations() {
    let engine = VrpEngine::new();
    assert_eq!(engine.config().max_generations, 50);
}

#[rstest]
fn scenario_a_flies_pickup_then_delivery(search: SearchConfig) {
    let model = scenario_a_model();
    let assignment = VrpEngine::new()
        .solve(&model, &search)
        .expect("solve should succeed");
    assert_eq!(assignment.node_sequences(), vec![vec![1, 2]]);
    assert_eq!(assignment.total_makespan(), 45);
    assert_eq!(assignment.objective, 45 + 1_350 + 20 + 8_000_000);
}

#[rstest]
fn problem_without_jobs_keeps_fleet_at_depot(search: SearchConfig) {
    let model = standard_model(ProblemData {
        node_balance: vec![0, 0, 0],
        demands: Vec::new(),
        ..scenario_a_data()
    });
    let assignment = VrpEngine::new()
        .solve(&model, &search)
        .expect("nothing to route");
    assert!(assignment.routes.iter().all(|route| !route.is_used()));
    assert_eq!(assignment.total_makespan(), 0);
}

#[rstest]
fn tight_landing_budget_is_repaired(search: SearchConfig) {
    let data = checkpoint_data();
    let model = standard_model(ProblemData {
        num_vehicles: 1,
        aircraft: AircraftProfile {
            max_landings_per_route: 2,
            ..data.aircraft
        },
        ..data
    });
    let assignment = VrpEngine::new()
        .solve(&model, &search)
        .expect("a reload checkpoint makes the tour feasible");
    let visited = assignment.visited();
    for node in [1, 2, 3, 4] {
        assert!(visited.contains(&node), "node {node} should be served");
    }
    assert!(visited.contains(&6) || visited.contains(&7));
    assert_eq!(model.validate_assignment(&assignment), Ok(()));
}
