//! Best-effort repair of tours the backend could not fully constrain.
//!
//! The search sees the horizon but not every hard domain of the model, and a
//! reload detour can push a tour past it. Tours that still break a cumulative
//! domain shed their latest job, pair partner included, until the model
//! accepts them. Shed nodes fall back on their drop penalties.

use log::warn;
use sortie_core::{Assignment, DEPOT, NodeIndex, RouteViolation, RoutingModel, SolveError};

/// Evaluate `routes`, dropping jobs from tours that leave a cumulative domain.
///
/// Each round removes at least one stop, and idle aircraft always fit their
/// domains, so the loop ends.
pub(crate) fn evaluate_best_effort(
    model: &RoutingModel,
    routes: &mut [Vec<NodeIndex>],
) -> Result<Assignment, SolveError> {
    loop {
        let reason = match model.evaluate_routes(routes) {
            Err(SolveError::Infeasible { reason }) => reason,
            outcome => return outcome,
        };
        let RouteViolation::CumulOutOfDomain {
            dimension,
            vehicle,
            node,
            value,
            upper,
            ..
        } = reason
        else {
            return Err(reason.into());
        };
        let Some(stops) = routes.get_mut(vehicle) else {
            return Err(reason.into());
        };
        let Some(culprit) = latest_job(model, stops, node) else {
            return Err(reason.into());
        };
        let shed = job_nodes(model, culprit);
        warn!(
            "vehicle {vehicle}: {dimension} reaches {value} over {upper}, dropping nodes {shed:?}"
        );
        for stops in routes.iter_mut() {
            stops.retain(|stop| !shed.contains(stop));
        }
    }
}

/// Latest stop at or before `reached` that serves demand, falling back on
/// the latest stop of any kind.
fn latest_job(model: &RoutingModel, stops: &[NodeIndex], reached: NodeIndex) -> Option<NodeIndex> {
    let graph = model.graph();
    let end = if reached == DEPOT {
        stops.len()
    } else {
        stops
            .iter()
            .position(|&stop| stop == reached)
            .map_or(stops.len(), |position| position.saturating_add(1))
    };
    let mut prefix = stops.iter().take(end).rev().copied();
    prefix
        .clone()
        .find(|&stop| !graph.is_checkpoint(stop))
        .or_else(|| prefix.next())
}

/// `node` together with its demand-pair partner, if any.
fn job_nodes(model: &RoutingModel, node: NodeIndex) -> Vec<NodeIndex> {
    model
        .pair_of(node)
        .map_or_else(|| vec![node], |pair| vec![pair.pickup, pair.delivery])
}
