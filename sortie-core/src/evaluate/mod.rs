//! Route evaluation against an assembled model.
//!
//! [`RoutingModel::evaluate_routes`] resolves plain node sequences into a full
//! [`Assignment`]: cumulative values, slack, hop costs and the objective.
//! Slack is always resolved to zero; every transit in the standard model is
//! non-negative past the load track, whose slack is pinned, so zero slack is
//! feasible whenever any slack is. [`RoutingModel::validate_assignment`]
//! checks an assignment produced elsewhere.

mod checks;
mod objective;
mod violation;


use std::iter;

use log::debug;

pub use violation::RouteViolation;

use crate::assignment::{Assignment, DimensionValues, VehicleRoute, Visit};
use crate::engine::SolveError;
use crate::model::RoutingModel;
use crate::problem::{DEPOT, NodeIndex};

impl RoutingModel {
    /// Resolve per-vehicle node sequences into an assignment.
    ///
    /// `routes[v]` lists the nodes vehicle `v` visits, depot excluded; missing
    /// trailing routes are empty. Malformed routes yield
    /// [`SolveError::InvalidRoutes`], broken hard constraints
    /// [`SolveError::Infeasible`].
    pub fn evaluate_routes(&self, routes: &[Vec<NodeIndex>]) -> Result<Assignment, SolveError> {
        checks::check_structure(self.graph(), routes)?;
        let resolved = (0..self.vehicle_count())
            .map(|vehicle| {
                let stops = routes.get(vehicle).map_or(&[][..], Vec::as_slice);
                self.resolve_route(vehicle, stops)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut assignment = Assignment {
            routes: resolved,
            objective: 0,
        };
        checks::check_feasibility(self, &assignment)?;
        assignment.objective = objective::objective(self, &assignment);
        debug!(
            "evaluated {} routes: makespan {}, objective {}",
            assignment.routes.len(),
            assignment.total_makespan(),
            assignment.objective
        );
        Ok(assignment)
    }

    /// Check an externally produced assignment: route shape, slack ceilings,
    /// cumulative consistency, hop costs, hard constraints and objective.
    pub fn validate_assignment(&self, assignment: &Assignment) -> Result<(), SolveError> {
        let vehicles = self.vehicle_count();
        if assignment.routes.len() != vehicles {
            return Err(RouteViolation::RouteCount {
                routes: assignment.routes.len(),
                vehicles,
            }
            .into());
        }
        for (position, route) in assignment.routes.iter().enumerate() {
            if route.vehicle != position {
                return Err(RouteViolation::MisplacedRoute {
                    position,
                    vehicle: route.vehicle,
                }
                .into());
            }
            checks::check_route_shape(route)?;
        }
        checks::check_structure(self.graph(), &assignment.node_sequences())?;
        for route in &assignment.routes {
            checks::check_consistency(self, route)?;
        }
        checks::check_feasibility(self, assignment)?;
        let expected = objective::objective(self, assignment);
        if expected != assignment.objective {
            return Err(RouteViolation::ObjectiveMismatch {
                expected,
                found: assignment.objective,
            }
            .into());
        }
        Ok(())
    }

    /// Objective of an assignment under this model.
    #[must_use]
    pub fn objective_of(&self, assignment: &Assignment) -> i64 {
        objective::objective(self, assignment)
    }

    fn resolve_route(
        &self,
        vehicle: usize,
        stops: &[NodeIndex],
    ) -> Result<VehicleRoute, RouteViolation> {
        let nodes: Vec<NodeIndex> = iter::once(DEPOT)
            .chain(stops.iter().copied())
            .chain(iter::once(DEPOT))
            .collect();
        let last = nodes.len().saturating_sub(1);
        // An idle aircraft never leaves the depot: every track keeps its start
        // value, matching the zero arc cost below.
        let idle = stops.is_empty();
        let mut visits: Vec<Visit> = nodes
            .iter()
            .map(|node| Visit {
                node: *node,
                cumuls: DimensionValues::default(),
                slacks: DimensionValues::default(),
            })
            .collect();

        for dimension in self.dimensions().iter() {
            let id = dimension.id();
            let mut cumul = dimension.start_cumul();
            let mut previous: Option<NodeIndex> = None;
            for (position, visit) in visits.iter_mut().enumerate() {
                if let Some(from) = previous.filter(|_| !idle) {
                    cumul = dimension
                        .advance(self.graph(), from, visit.node, cumul, 0)
                        .ok_or(RouteViolation::UnknownNode {
                            vehicle,
                            node: visit.node,
                        })?;
                }
                visit.cumuls.set(id, cumul);
                if position < last {
                    visit.slacks.set(id, 0);
                }
                previous = Some(visit.node);
            }
        }

        let arc_costs = if idle {
            vec![0]
        } else {
            nodes
                .windows(2)
                .map(|hop| match *hop {
                    [from, to] => self
                        .arc_cost(from, to)
                        .ok_or(RouteViolation::UnknownNode { vehicle, node: to }),
                    _ => Ok(0),
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(VehicleRoute {
            vehicle,
            visits,
            arc_costs,
        })
    }
}
