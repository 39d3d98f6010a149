//! Reload checkpoint insertion.
//!
//! The search backend only sees travel cost, so a tour may land more often
//! than the aircraft allows between reloads. Each overflowing tour gets the
//! cheapest unused reload trigger spliced in at the latest position that
//! keeps the landing count within budget, until the tour fits or no trigger
//! is left.

use std::collections::BTreeSet;
use std::iter;

use log::{debug, warn};
use sortie_core::{DEPOT, Dimension, DimensionId, NodeIndex, RoutingModel};

/// Splice reload triggers into `routes` wherever the landing budget would be
/// exceeded. Routes the model cannot repair are left as they are.
pub(crate) fn insert_checkpoints(model: &RoutingModel, routes: &mut [Vec<NodeIndex>]) {
    let Some(landing) = model.dimension(DimensionId::Landing) else {
        return;
    };
    let mut available = unused_triggers(model, routes);

    for (vehicle, stops) in routes.iter_mut().enumerate() {
        while let Some(overflow) = first_overflow(model, landing, vehicle, stops) {
            let Some((position, trigger)) =
                cheapest_insertion(model, landing, vehicle, stops, overflow, &available)
            else {
                warn!(
                    "vehicle {vehicle} exceeds its landing budget and no reload checkpoint can be \
                     inserted"
                );
                break;
            };
            debug!("vehicle {vehicle}: inserting reload checkpoint {trigger} at stop {position}");
            stops.insert(position, trigger);
            available.remove(&trigger);
        }
    }
}

/// Reload triggers no route visits and no demand pair claims.
fn unused_triggers(model: &RoutingModel, routes: &[Vec<NodeIndex>]) -> BTreeSet<NodeIndex> {
    let graph = model.graph();
    let visited: BTreeSet<NodeIndex> = routes.iter().flatten().copied().collect();
    graph
        .node_indices()
        .filter(|&node| graph.triggers_reload(node))
        .filter(|node| !visited.contains(node) && model.pair_of(*node).is_none())
        .collect()
}

/// Landing counts along `DEPOT, stops.., DEPOT`.
fn landing_profile(model: &RoutingModel, landing: &Dimension, stops: &[NodeIndex]) -> Vec<i64> {
    let nodes = iter::once(DEPOT)
        .chain(stops.iter().copied())
        .chain(iter::once(DEPOT));
    let mut previous: Option<NodeIndex> = None;
    let mut cumul = landing.start_cumul();
    let mut profile = Vec::with_capacity(stops.len().saturating_add(2));
    for node in nodes {
        if let Some(from) = previous {
            cumul = landing
                .advance(model.graph(), from, node, cumul, 0)
                .unwrap_or(cumul);
        }
        profile.push(cumul);
        previous = Some(node);
    }
    profile
}

/// Position (in `DEPOT, stops.., DEPOT`) of the first visit over budget.
fn first_overflow(
    model: &RoutingModel,
    landing: &Dimension,
    vehicle: usize,
    stops: &[NodeIndex],
) -> Option<usize> {
    let capacity = landing.capacity(vehicle);
    landing_profile(model, landing, stops)
        .into_iter()
        .position(|cumul| cumul > capacity)
}

/// Node at `position` in `DEPOT, stops.., DEPOT`.
fn node_at(stops: &[NodeIndex], position: usize) -> NodeIndex {
    position
        .checked_sub(1)
        .and_then(|stop| stops.get(stop).copied())
        .unwrap_or(DEPOT)
}

fn detour(model: &RoutingModel, from: NodeIndex, via: NodeIndex, to: NodeIndex) -> Option<i64> {
    let direct = model.arc_cost(from, to)?;
    let out = model.arc_cost(from, via)?;
    let back = model.arc_cost(via, to)?;
    Some(out.saturating_add(back).saturating_sub(direct))
}

/// Latest insertion point at or before `overflow` that some trigger can
/// reach within budget, with the cheapest such trigger.
///
/// The returned position indexes `stops`.
fn cheapest_insertion(
    model: &RoutingModel,
    landing: &Dimension,
    vehicle: usize,
    stops: &[NodeIndex],
    overflow: usize,
    available: &BTreeSet<NodeIndex>,
) -> Option<(usize, NodeIndex)> {
    let capacity = landing.capacity(vehicle);
    let profile = landing_profile(model, landing, stops);
    (1..=overflow).rev().find_map(|position| {
        let from = node_at(stops, position - 1);
        let to = node_at(stops, position);
        let arrived = *profile.get(position - 1)?;
        available
            .iter()
            .copied()
            .filter(|&trigger| {
                landing
                    .advance(model.graph(), from, trigger, arrived, 0)
                    .is_some_and(|cumul| cumul <= capacity)
            })
            .filter_map(|trigger| Some((detour(model, from, trigger, to)?, trigger)))
            .min_by_key(|(cost, _)| *cost)
            .map(|(_, trigger)| (position - 1, trigger))
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for reload checkpoint insertion.

    use rstest::rstest;
    use sortie_core::test_support::{checkpoint_data, standard_model};
    use sortie_core::{AircraftProfile, ProblemData};

    use super::*;

    fn two_landing_model() -> RoutingModel {
        let data = checkpoint_data();
        standard_model(ProblemData {
            aircraft: AircraftProfile {
                max_landings_per_route: 2,
                ..data.aircraft
            },
            ..data
        })
    }

    #[rstest]
    fn routes_within_budget_are_untouched() {
        let model = two_landing_model();
        let mut routes = vec![vec![1, 2], vec![3, 4]];
        insert_checkpoints(&model, &mut routes);
        assert_eq!(routes, vec![vec![1, 2], vec![3, 4]]);
    }

    #[rstest]
    fn overflowing_route_gets_a_trigger() {
        let model = two_landing_model();
        let mut routes = vec![vec![1, 2, 3, 4], Vec::new()];
        insert_checkpoints(&model, &mut routes);
        assert_eq!(routes, vec![vec![1, 2, 6, 3, 4], Vec::new()]);
        assert!(model.evaluate_routes(&routes).is_ok());
    }

    #[rstest]
    fn visited_triggers_are_not_reused() {
        let model = two_landing_model();
        let mut routes = vec![vec![1, 2, 3, 4], vec![6, 7]];
        insert_checkpoints(&model, &mut routes);
        assert_eq!(routes, vec![vec![1, 2, 3, 4], vec![6, 7]]);
    }

    #[rstest]
    fn boundary_checkpoint_is_not_a_trigger() {
        let model = two_landing_model();
        let routes = vec![vec![1, 2, 3, 4]];
        let available = unused_triggers(&model, &routes);
        assert_eq!(available.into_iter().collect::<Vec<_>>(), vec![6, 7]);
    }

    #[rstest]
    fn profile_resets_after_trigger() {
        let model = two_landing_model();
        let landing = model
            .dimension(DimensionId::Landing)
            .expect("landing dimension");
        assert_eq!(
            landing_profile(&model, landing, &[1, 2, 6, 3, 4]),
            vec![0, 0, 1, 2, 0, 1, 2]
        );
    }
}
