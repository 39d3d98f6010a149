//! Structural and constraint checks over routes.

use std::collections::HashSet;

use crate::assignment::{Assignment, VehicleRoute, Visit};
use crate::model::{DimensionId, RoutingModel};
use crate::problem::{DEPOT, NodeIndex, ProblemGraph};

use super::RouteViolation;

/// Reject unknown nodes, depot stops, repeated nodes and surplus routes.
pub(super) fn check_structure(
    graph: &ProblemGraph,
    routes: &[Vec<NodeIndex>],
) -> Result<(), RouteViolation> {
    let vehicles = graph.vehicle_count();
    if routes.len() > vehicles {
        return Err(RouteViolation::RouteCount {
            routes: routes.len(),
            vehicles,
        });
    }
    let mut seen = HashSet::new();
    for (vehicle, stops) in routes.iter().enumerate() {
        for &node in stops {
            if node >= graph.node_count() {
                return Err(RouteViolation::UnknownNode { vehicle, node });
            }
            if node == DEPOT {
                return Err(RouteViolation::DepotMidRoute { vehicle });
            }
            if !seen.insert(node) {
                return Err(RouteViolation::DuplicateVisit { node });
            }
        }
    }
    Ok(())
}

/// A route must open and close at the depot and price every hop.
pub(super) fn check_route_shape(route: &VehicleRoute) -> Result<(), RouteViolation> {
    let vehicle = route.vehicle;
    let closed = route.visits.len() >= 2
        && route.visits.first().is_some_and(|v| v.node == DEPOT)
        && route.visits.last().is_some_and(|v| v.node == DEPOT);
    if !closed {
        return Err(RouteViolation::OpenRoute { vehicle });
    }
    let hops = route.visits.len().saturating_sub(1);
    if route.arc_costs.len() != hops {
        return Err(RouteViolation::HopCount {
            vehicle,
            hops,
            costs: route.arc_costs.len(),
        });
    }
    Ok(())
}

/// Recompute every transition of a route from its recorded slack.
pub(super) fn check_consistency(
    model: &RoutingModel,
    route: &VehicleRoute,
) -> Result<(), RouteViolation> {
    let vehicle = route.vehicle;
    let graph = model.graph();
    let used = route.is_used();

    for dimension in model.dimensions().iter() {
        let id = dimension.id();
        let start = value_at(route, 0, id, |visit| visit.cumuls.get(id))?;
        if dimension.start_at_zero && start != 0 {
            return Err(RouteViolation::CumulMismatch {
                dimension: id,
                vehicle,
                position: 0,
                expected: 0,
                found: start,
            });
        }
        for (position, hop) in route.visits.windows(2).enumerate() {
            let [from, to] = hop else { continue };
            let cumul = value_at(route, position, id, |visit| visit.cumuls.get(id))?;
            let slack = value_at(route, position, id, |visit| visit.slacks.get(id))?;
            let slack_max = dimension.slack_max_at(from.node);
            if slack < 0 || slack > slack_max {
                return Err(RouteViolation::SlackOutOfRange {
                    dimension: id,
                    node: from.node,
                    slack,
                    slack_max,
                });
            }
            let expected = if used {
                dimension
                    .advance(graph, from.node, to.node, cumul, slack)
                    .ok_or(RouteViolation::UnknownNode {
                        vehicle,
                        node: to.node,
                    })?
            } else {
                cumul.saturating_add(slack)
            };
            let next = position.saturating_add(1);
            let found = value_at(route, next, id, |visit| visit.cumuls.get(id))?;
            if expected != found {
                return Err(RouteViolation::CumulMismatch {
                    dimension: id,
                    vehicle,
                    position: next,
                    expected,
                    found,
                });
            }
        }
    }

    for (position, (hop, found)) in route
        .visits
        .windows(2)
        .zip(route.arc_costs.iter().copied())
        .enumerate()
    {
        let [from, to] = hop else { continue };
        let expected = if used {
            model
                .arc_cost(from.node, to.node)
                .ok_or(RouteViolation::UnknownNode {
                    vehicle,
                    node: to.node,
                })?
        } else {
            0
        };
        if expected != found {
            return Err(RouteViolation::ArcCostMismatch {
                vehicle,
                position,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Hard constraints: coverage of required nodes, pickup-delivery pairing and
/// cumulative domains.
pub(super) fn check_feasibility(
    model: &RoutingModel,
    assignment: &Assignment,
) -> Result<(), RouteViolation> {
    let visited = assignment.visited();
    if let Some(node) = model
        .graph()
        .node_indices()
        .filter(|node| *node != DEPOT && !visited.contains(node))
        .find(|node| model.disjunction(*node).is_none())
    {
        return Err(RouteViolation::RequiredNodeSkipped { node });
    }

    for pair in model.demand_pairs() {
        let (pickup, delivery) = (pair.pickup, pair.delivery);
        match (locate(assignment, pickup), locate(assignment, delivery)) {
            (None, None) => {}
            (Some(p), Some(d)) if p.vehicle == d.vehicle => {
                let time = |visit: &Visit| visit.cumuls.get(DimensionId::GlobalTime);
                let late = match (time(p.visit), time(d.visit)) {
                    (Some(at_pickup), Some(at_delivery)) => at_pickup > at_delivery,
                    _ => false,
                };
                if d.position < p.position || late {
                    return Err(RouteViolation::DeliveryBeforePickup { pickup, delivery });
                }
            }
            _ => return Err(RouteViolation::SplitPair { pickup, delivery }),
        }
    }

    for route in &assignment.routes {
        check_domains(model, route)?;
    }
    Ok(())
}

fn check_domains(model: &RoutingModel, route: &VehicleRoute) -> Result<(), RouteViolation> {
    let vehicle = route.vehicle;
    for dimension in model.dimensions().iter() {
        let id = dimension.id();
        let lower = dimension.lower();
        let upper = dimension.capacity(vehicle);
        for (position, visit) in route.visits.iter().enumerate() {
            let value = visit.cumuls.get(id).ok_or(RouteViolation::MissingValue {
                dimension: id,
                vehicle,
                position,
            })?;
            if value < lower || value > upper {
                return Err(RouteViolation::CumulOutOfDomain {
                    dimension: id,
                    vehicle,
                    node: visit.node,
                    value,
                    lower,
                    upper,
                });
            }
        }
    }
    Ok(())
}

struct Located<'a> {
    vehicle: usize,
    position: usize,
    visit: &'a Visit,
}

fn locate(assignment: &Assignment, node: NodeIndex) -> Option<Located<'_>> {
    assignment.routes.iter().find_map(|route| {
        route
            .visits
            .iter()
            .enumerate()
            .find(|(_, visit)| visit.node == node)
            .map(|(position, visit)| Located {
                vehicle: route.vehicle,
                position,
                visit,
            })
    })
}

fn value_at(
    route: &VehicleRoute,
    position: usize,
    dimension: DimensionId,
    read: impl Fn(&Visit) -> Option<i64>,
) -> Result<i64, RouteViolation> {
    route
        .visits
        .get(position)
        .and_then(read)
        .ok_or(RouteViolation::MissingValue {
            dimension,
            vehicle: route.vehicle,
            position,
        })
}
