//! Transit rules of the standard dimensions.
//!
//! Each rule is a pure function of the read-only graph and the arc's end
//! points, so it can be registered as a [`TransitRule`](super::TransitRule)
//! without capturing state.

use crate::problem::{DEPOT, NodeIndex, ProblemGraph};

use super::dimension::Transit;

/// Flight time plus ground time at the origin.
///
/// Ground time is waived when both nodes share a location group or the
/// origin is the depot.
#[must_use]
pub fn travel_time(graph: &ProblemGraph, from: NodeIndex, to: NodeIndex) -> Option<Transit> {
    travel_time_cost(graph, from, to).map(Transit::Step)
}

/// [`travel_time`], reset when departing a reload checkpoint.
#[must_use]
pub fn reload_time(graph: &ProblemGraph, from: NodeIndex, to: NodeIndex) -> Option<Transit> {
    reload_scoped(graph, from, to, travel_time)
}

/// Flown distance.
#[must_use]
pub fn travel_distance(graph: &ProblemGraph, from: NodeIndex, to: NodeIndex) -> Option<Transit> {
    graph.distance(from, to).map(Transit::Step)
}

/// [`travel_distance`], reset when departing a reload checkpoint.
#[must_use]
pub fn reload_distance(graph: &ProblemGraph, from: NodeIndex, to: NodeIndex) -> Option<Transit> {
    reload_scoped(graph, from, to, travel_distance)
}

/// Weight boarding (positive) or leaving (negative) at `from`.
#[must_use]
pub fn passenger_load(graph: &ProblemGraph, from: NodeIndex) -> Option<Transit> {
    let balance = graph.balance(from)?;
    Some(Transit::Step(
        balance.saturating_mul(graph.aircraft().passenger_weight),
    ))
}

/// One landing per change of location group; reset when departing a reload
/// checkpoint or the depot.
#[must_use]
pub fn landing(graph: &ProblemGraph, from: NodeIndex, to: NodeIndex) -> Option<Transit> {
    let same_group = graph.same_group(from, to)?;
    if from == DEPOT || graph.triggers_reload(from) {
        return Some(Transit::Reset);
    }
    Some(Transit::Step(if same_group { 0 } else { 1 }))
}

/// Arc cost shared by every vehicle: the value of [`travel_time`].
#[must_use]
pub fn travel_time_cost(graph: &ProblemGraph, from: NodeIndex, to: NodeIndex) -> Option<i64> {
    let time = graph.time(from, to)?;
    let waived = from == DEPOT || graph.same_group(from, to)?;
    let service = if waived { 0 } else { graph.service_time(from)? };
    Some(time.saturating_add(service))
}

fn reload_scoped(
    graph: &ProblemGraph,
    from: NodeIndex,
    to: NodeIndex,
    base: fn(&ProblemGraph, NodeIndex, NodeIndex) -> Option<Transit>,
) -> Option<Transit> {
    let transit = base(graph, from, to)?;
    if graph.triggers_reload(from) {
        Some(Transit::Reset)
    } else {
        Some(transit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{AircraftProfile, LocationKey, ProblemData};
    use rstest::{fixture, rstest};

    /// Depot, two nodes sharing group `A`, then checkpoints 3 (boundary) and 4.
    #[fixture]
    fn graph() -> ProblemGraph {
        let n = 5;
        let time = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 0 } else { 10 + i64::try_from(j).unwrap_or(0) })
                    .collect()
            })
            .collect();
        let distance = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0 } else { 100 }).collect())
            .collect();
        ProblemGraph::new(ProblemData {
            time_matrix: time,
            distance_matrix: distance,
            node_balance: vec![0, 2, -2, 0, 0],
            service_time: vec![7, 5, 5, 9, 9],
            locations: vec![
                LocationKey::new("HUB", "HUB"),
                LocationKey::new("A", "A-1"),
                LocationKey::new("A", "A-2"),
                LocationKey::new("FUEL", "F-1"),
                LocationKey::new("FUEL2", "F-2"),
            ],
            demands: vec![(1, 2)],
            num_vehicles: 1,
            depot: 0,
            first_checkpoint: 3,
            aircraft: AircraftProfile {
                passenger_weight: 90,
                ..AircraftProfile::default()
            },
        })
        .expect("valid graph")
    }

    #[rstest]
    #[case::depot_waives_service(0, 1, 11)]
    #[case::same_group_waives_service(1, 2, 12)]
    #[case::service_charged(2, 3, 18)]
    fn travel_time_applies_service_rules(
        graph: ProblemGraph,
        #[case] from: NodeIndex,
        #[case] to: NodeIndex,
        #[case] expected: i64,
    ) {
        assert_eq!(travel_time(&graph, from, to), Some(Transit::Step(expected)));
    }

    #[rstest]
    fn reload_tracks_reset_only_past_the_boundary(graph: ProblemGraph) {
        assert_eq!(reload_time(&graph, 3, 4), Some(Transit::Step(23)));
        assert_eq!(reload_time(&graph, 4, 1), Some(Transit::Reset));
        assert_eq!(reload_distance(&graph, 3, 1), Some(Transit::Step(100)));
        assert_eq!(reload_distance(&graph, 4, 0), Some(Transit::Reset));
    }

    #[rstest]
    fn landing_counts_group_changes(graph: ProblemGraph) {
        assert_eq!(landing(&graph, 0, 1), Some(Transit::Reset));
        assert_eq!(landing(&graph, 1, 2), Some(Transit::Step(0)));
        assert_eq!(landing(&graph, 2, 3), Some(Transit::Step(1)));
        assert_eq!(landing(&graph, 4, 1), Some(Transit::Reset));
    }

    #[rstest]
    fn load_weighs_balance(graph: ProblemGraph) {
        assert_eq!(passenger_load(&graph, 1), Some(Transit::Step(180)));
        assert_eq!(passenger_load(&graph, 2), Some(Transit::Step(-180)));
    }

    #[rstest]
    fn rules_are_undefined_off_the_graph(graph: ProblemGraph) {
        assert_eq!(travel_time(&graph, 0, 9), None);
        assert_eq!(landing(&graph, 9, 0), None);
        assert_eq!(passenger_load(&graph, 9), None);
    }
}
