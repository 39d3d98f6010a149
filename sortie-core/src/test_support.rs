//! Fixed-route engine and small problem fixtures used by unit and behaviour
//! tests.

use crate::assignment::Assignment;
use crate::engine::{RoutingEngine, SearchConfig, SolveError};
use crate::model::{ModelConfig, RoutingModel};
use crate::problem::{AircraftProfile, LocationKey, NodeIndex, ProblemData, ProblemGraph};

/// Engine answering with the evaluation of caller-supplied routes.
///
/// Stands in for a search engine when the routes are known in advance, such
/// as initial routes loaded from a file or hand-written test cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedRoutesEngine {
    routes: Vec<Vec<NodeIndex>>,
}

impl FixedRoutesEngine {
    /// Engine returning `routes`, one node sequence per vehicle without the
    /// depot.
    #[must_use]
    pub const fn new(routes: Vec<Vec<NodeIndex>>) -> Self {
        Self { routes }
    }

    /// Routes this engine answers with.
    #[must_use]
    pub fn routes(&self) -> &[Vec<NodeIndex>] {
        &self.routes
    }
}

impl RoutingEngine for FixedRoutesEngine {
    fn solve(
        &self,
        model: &RoutingModel,
        _config: &SearchConfig,
    ) -> Result<Assignment, SolveError> {
        model.evaluate_routes(&self.routes)
    }
}

/// Aircraft with room for nine passengers and four landings per flight.
#[must_use]
pub const fn test_aircraft() -> AircraftProfile {
    AircraftProfile {
        max_time_without_supply: 100,
        consumption: 2,
        max_takeoff_weight: 5_000,
        basic_operational_weight: 3_000,
        passenger_weight: 80,
        max_passengers: 9,
        max_landings_per_route: 4,
    }
}

/// Depot, one pickup and its delivery, one vehicle, no reload trigger.
///
/// Service times are zero, so the route `0 -> 1 -> 2 -> 0` costs
/// `10 + 15 + 20`.
#[must_use]
pub fn scenario_a_data() -> ProblemData {
    ProblemData {
        time_matrix: vec![vec![0, 10, 20], vec![10, 0, 15], vec![20, 15, 0]],
        distance_matrix: vec![vec![0, 30, 60], vec![30, 0, 45], vec![60, 45, 0]],
        node_balance: vec![0, 1, -1],
        service_time: vec![0, 0, 0],
        locations: vec![
            LocationKey::new("HUB", "HUB"),
            LocationKey::new("A", "A-1"),
            LocationKey::new("B", "B-1"),
        ],
        demands: vec![(1, 2)],
        num_vehicles: 1,
        depot: 0,
        first_checkpoint: 2,
        aircraft: test_aircraft(),
    }
}

/// [`scenario_a_data`] with three passengers and an aircraft too heavy to
/// carry them, all nodes before the first checkpoint.
#[must_use]
pub fn scenario_b_data() -> ProblemData {
    ProblemData {
        node_balance: vec![0, 3, -3],
        first_checkpoint: 3,
        aircraft: AircraftProfile {
            max_takeoff_weight: 3_100,
            ..test_aircraft()
        },
        ..scenario_a_data()
    }
}

/// Two demand pairs, a boundary checkpoint and two reload triggers.
///
/// Nodes: depot `0`, pickups `1` and `3`, deliveries `2` and `4`, first
/// checkpoint `5`, triggers `6` and `7`. Every hop takes 10 time units and
/// service times are zero.
#[must_use]
pub fn checkpoint_data() -> ProblemData {
    let n = 8;
    let matrix: Vec<Vec<i64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 0 } else { 10 }).collect())
        .collect();
    let groups = ["HUB", "A", "B", "C", "D", "FUEL-0", "FUEL-1", "FUEL-2"];
    ProblemData {
        time_matrix: matrix.clone(),
        distance_matrix: matrix,
        node_balance: vec![0, 1, -1, 2, -2, 0, 0, 0],
        service_time: vec![0; n],
        locations: groups
            .iter()
            .map(|group| LocationKey::new(*group, format!("{group}-1")))
            .collect(),
        demands: vec![(1, 2), (3, 4), (1, 2)],
        num_vehicles: 2,
        depot: 0,
        first_checkpoint: 5,
        aircraft: test_aircraft(),
    }
}

/// Standard model over `data` with default settings.
///
/// # Panics
/// Panics when `data` is not a valid problem; fixtures only.
#[must_use]
#[expect(clippy::expect_used, reason = "fixtures are known to be valid")]
pub fn standard_model(data: ProblemData) -> RoutingModel {
    let graph = ProblemGraph::new(data).expect("fixture problem is valid");
    RoutingModel::standard(graph, ModelConfig::default()).expect("fixture model assembles")
}

/// Standard model of [`scenario_a_data`].
#[must_use]
pub fn scenario_a_model() -> RoutingModel {
    standard_model(scenario_a_data())
}

/// Standard model of [`scenario_b_data`].
#[must_use]
pub fn scenario_b_model() -> RoutingModel {
    standard_model(scenario_b_data())
}

/// Standard model of [`checkpoint_data`].
#[must_use]
pub fn checkpoint_model() -> RoutingModel {
    standard_model(checkpoint_data())
}
