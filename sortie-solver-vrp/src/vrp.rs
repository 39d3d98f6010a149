//! `vrp-core` modelling helpers for `VrpEngine`.
//!
//! This module converts a routing model into a `vrp-core` problem, runs the
//! search and reads the resulting tours back as per-vehicle node sequences.

use std::fmt::Display;
use std::sync::Arc;

use log::debug;
use sortie_core::{
    DEPOT, DemandPair, NodeIndex, ProblemGraph, RoutingModel, SearchConfig, SolveError,
};
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

use crate::engine::VrpEngineConfig;

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-flight-time")
        .set_transport_cost(transport)
        .set_time_constrained(true)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[minimize_unassigned, transport_feature])?.build()
}

fn pair_job(pair: &DemandPair) -> GenericResult<Job> {
    let pickup = SingleBuilder::default()
        .id(format!("pickup-{}", pair.pickup).as_str())
        .location(pair.pickup)?
        .build()?;
    let delivery = SingleBuilder::default()
        .id(format!("delivery-{}", pair.delivery).as_str())
        .location(pair.delivery)?
        .build()?;
    // Sub-jobs are served in the order they are added.
    MultiBuilder::default()
        .id(format!("pair-{}-{}", pair.pickup, pair.delivery).as_str())
        .add_job(pickup)
        .add_job(delivery)
        .build_as_job()
}

/// Jobs for every demand pair and every mandatory node outside a pair.
fn define_jobs(model: &RoutingModel) -> GenericResult<Vec<Job>> {
    let graph = model.graph();
    let pairs = model.demand_pairs().iter().map(pair_job);
    let singles = graph
        .node_indices()
        .filter(|&node| node != DEPOT && graph.is_mandatory(node) && model.pair_of(node).is_none())
        .map(|node| {
            SingleBuilder::default()
                .id(format!("node-{node}").as_str())
                .location(node)?
                .build_as_job()
        });
    pairs.chain(singles).collect()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "the horizon is a small route-duration bound, far below 2^52"
)]
fn define_problem(
    model: &RoutingModel,
    jobs: Vec<Job>,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let horizon = model.config().horizon as f64;
    let vehicles = (0..model.vehicle_count())
        .map(|idx| {
            VehicleBuilder::default()
                .id(format!("aircraft-{idx}").as_str())
                .add_detail(
                    VehicleDetailBuilder::default()
                        .set_start_location(DEPOT)
                        .set_start_time(0.0)
                        .set_end_location(DEPOT)
                        .set_end_time(horizon)
                        .build()?,
                )
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(vehicles.into_iter())
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "arc costs are bounded by the horizon, far below 2^52"
)]
fn table(graph: &ProblemGraph, value: impl Fn(NodeIndex, NodeIndex) -> i64) -> Vec<Vec<f64>> {
    graph
        .node_indices()
        .map(|from| {
            graph
                .node_indices()
                .map(|to| value(from, to) as f64)
                .collect()
        })
        .collect()
}

/// Arc costs of the routing model as the backend's distance.
///
/// Durations take the larger of arc cost and flown distance, so a tour that
/// fits the vehicle shift keeps both the time and the distance tracks inside
/// the horizon.
struct ArcCostTransport {
    costs: Vec<Vec<f64>>,
    durations: Vec<Vec<f64>>,
}

impl ArcCostTransport {
    fn new(model: &RoutingModel) -> Self {
        let graph = model.graph();
        let cost = |from, to| model.arc_cost(from, to).unwrap_or_default();
        let costs = table(graph, cost);
        let durations = table(graph, |from, to| {
            cost(from, to).max(graph.distance(from, to).unwrap_or_default())
        });
        Self { costs, durations }
    }

    fn lookup(matrix: &[Vec<f64>], from: Location, to: Location) -> f64 {
        let result = matrix.get(from).and_then(|row| row.get(to)).copied();
        debug_assert!(result.is_some(), "arc lookup failed: from={from}, to={to}");
        result.unwrap_or(0.0)
    }

    fn cost(&self, from: Location, to: Location) -> f64 {
        Self::lookup(&self.costs, from, to)
    }

    fn span(&self, from: Location, to: Location) -> f64 {
        Self::lookup(&self.durations, from, to)
    }
}

impl TransportCost for ArcCostTransport {
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.cost(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.span(from, to)
    }

    fn distance_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.span(from, to)
    }
}

/// Default environment whose progress messages go to the `log` facade
/// instead of stdout.
fn quiet_environment() -> Arc<Environment> {
    let logger: InfoLogger = Arc::new(|message: &str| debug!("vrp-core: {message}"));
    Arc::new(Environment {
        logger,
        ..Environment::default()
    })
}

fn backend(err: impl Display) -> SolveError {
    SolveError::Backend {
        message: err.to_string(),
    }
}

/// Context for running a `vrp-core` search over one routing model.
pub(super) struct VrpSolveContext<'a> {
    config: &'a VrpEngineConfig,
}

impl<'a> VrpSolveContext<'a> {
    /// Create a new solve context.
    pub(super) const fn new(config: &'a VrpEngineConfig) -> Self {
        Self { config }
    }

    /// Search for tours and return one node sequence per vehicle, depot
    /// excluded.
    pub(super) fn solve(
        &self,
        model: &RoutingModel,
        search: &SearchConfig,
    ) -> Result<Vec<Vec<NodeIndex>>, SolveError> {
        let mut routes = vec![Vec::new(); model.vehicle_count()];
        let jobs = define_jobs(model).map_err(backend)?;
        if jobs.is_empty() {
            debug!("no jobs to route, every aircraft stays at the depot");
            return Ok(routes);
        }

        let transport = Arc::new(ArcCostTransport::new(model));
        let goal = define_goal(transport.clone()).map_err(backend)?;
        let problem = Arc::new(define_problem(model, jobs, transport, goal).map_err(backend)?);

        let max_generations = search.max_generations.unwrap_or(self.config.max_generations);
        let max_time = usize::try_from(search.time_limit.as_secs())
            .unwrap_or(usize::MAX)
            .max(1);
        debug!(
            "searching with up to {max_generations} generations for {max_time}s \
             (first solution {:?}, metaheuristic {:?})",
            search.first_solution, search.metaheuristic
        );
        let vrp_config = VrpConfigBuilder::new(problem.clone())
            .set_environment(quiet_environment())
            .prebuild()
            .map_err(backend)?
            .with_max_time(Some(max_time))
            .with_max_generations(Some(max_generations))
            .build()
            .map_err(backend)?;

        let solution = vrp_core::solver::Solver::new(problem, vrp_config)
            .solve()
            .map_err(backend)?;

        // Aircraft are identical, so tours fill vehicles in order.
        for (slot, tour) in routes.iter_mut().zip(solution.routes.iter()) {
            slot.extend(
                tour.tour
                    .all_activities()
                    .map(|activity| activity.place.location)
                    .filter(|&location| location != DEPOT),
            );
        }
        debug!(
            "vrp-core produced {} tours, {} jobs unassigned",
            solution.routes.len(),
            solution.unassigned.len()
        );

        Ok(routes)
    }
}
