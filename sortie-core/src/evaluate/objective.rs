//! Objective: arc costs, span costs, soft-bound excess and drop penalties.

use crate::assignment::{Assignment, Visit};
use crate::model::{BoundLimit, Dimension, DimensionId, RoutingModel, VisitRef};

pub(super) fn objective(model: &RoutingModel, assignment: &Assignment) -> i64 {
    assignment
        .total_makespan()
        .saturating_add(span_costs(model, assignment))
        .saturating_add(soft_bound_penalties(model, assignment))
        .saturating_add(drop_penalties(model, assignment))
}

/// `coefficient * (latest end - earliest start)` per dimension with a span
/// cost.
fn span_costs(model: &RoutingModel, assignment: &Assignment) -> i64 {
    model
        .dimensions()
        .iter()
        .filter(|dimension| dimension.span_cost() != 0)
        .map(|dimension| {
            let id = dimension.id();
            let starts = assignment
                .routes
                .iter()
                .filter_map(|route| route.visits.first()?.cumuls.get(id));
            let ends = assignment
                .routes
                .iter()
                .filter_map(|route| route.end()?.cumuls.get(id));
            match (starts.min(), ends.max()) {
                (Some(start), Some(end)) => dimension
                    .span_cost()
                    .saturating_mul(end.saturating_sub(start).max(0)),
                _ => 0,
            }
        })
        .fold(0_i64, i64::saturating_add)
}

fn soft_bound_penalties(model: &RoutingModel, assignment: &Assignment) -> i64 {
    let mut total = 0_i64;
    for route in &assignment.routes {
        let last = route.visits.len().saturating_sub(1);
        for (position, visit) in route.visits.iter().enumerate() {
            let at = if position == last {
                VisitRef::VehicleEnd(route.vehicle)
            } else if position == 0 {
                continue;
            } else {
                VisitRef::Node(visit.node)
            };
            for dimension in model.dimensions().iter() {
                total = total.saturating_add(excess_cost(dimension, at, visit));
            }
        }
    }
    total
}

fn excess_cost(dimension: &Dimension, at: VisitRef, visit: &Visit) -> i64 {
    let Some(bound) = dimension.soft_upper_bound(at) else {
        return 0;
    };
    let Some(cumul) = visit.cumuls.get(dimension.id()) else {
        return 0;
    };
    let limit = match bound.limit {
        BoundLimit::Fixed(limit) => limit,
        BoundLimit::Payload(payload) => payload.resolve(
            visit.cumuls.get(DimensionId::Load).unwrap_or_default(),
            visit.cumuls.get(DimensionId::ReloadTime).unwrap_or_default(),
        ),
    };
    bound
        .penalty
        .saturating_mul(cumul.saturating_sub(limit).max(0))
}

fn drop_penalties(model: &RoutingModel, assignment: &Assignment) -> i64 {
    let visited = assignment.visited();
    model
        .disjunctions()
        .iter()
        .filter(|disjunction| !visited.contains(&disjunction.node))
        .map(|disjunction| disjunction.penalty)
        .fold(0_i64, i64::saturating_add)
}
