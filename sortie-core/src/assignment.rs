//! Engine output: routes with resolved cumulative values.

use std::collections::BTreeSet;

use crate::model::DimensionId;
use crate::problem::{DEPOT, NodeIndex};

/// One value per registered dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionValues {
    values: [Option<i64>; DimensionId::COUNT],
}

impl DimensionValues {
    /// Value recorded for `id`.
    #[must_use]
    pub fn get(&self, id: DimensionId) -> Option<i64> {
        self.values.get(id.slot()).copied().flatten()
    }

    /// Record the value of `id`.
    pub fn set(&mut self, id: DimensionId, value: i64) {
        if let Some(slot) = self.values.get_mut(id.slot()) {
            *slot = Some(value);
        }
    }

    /// Recorded values in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (DimensionId, i64)> + '_ {
        DimensionId::ALL
            .into_iter()
            .filter_map(|id| self.get(id).map(|value| (id, value)))
    }
}

/// A node visit on a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Node visited.
    pub node: NodeIndex,
    /// Cumulative value of every dimension on arrival.
    pub cumuls: DimensionValues,
    /// Slack taken before departing; empty at the route end.
    pub slacks: DimensionValues,
}

/// Route flown by one vehicle, from its start depot to its end depot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRoute {
    /// Vehicle index.
    pub vehicle: usize,
    /// Visits including both depot ends.
    pub visits: Vec<Visit>,
    /// Arc cost of each hop; one fewer than the visits.
    pub arc_costs: Vec<i64>,
}

impl VehicleRoute {
    /// Nodes visited between the depot ends.
    pub fn stops(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.visits
            .iter()
            .map(|visit| visit.node)
            .filter(|node| *node != DEPOT)
    }

    /// Whether the vehicle leaves the depot at all.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.stops().next().is_some()
    }

    /// Sum of the hop costs.
    #[must_use]
    pub fn makespan(&self) -> i64 {
        self.arc_costs
            .iter()
            .fold(0_i64, |total, cost| total.saturating_add(*cost))
    }

    /// Visit at the route end.
    #[must_use]
    pub fn end(&self) -> Option<&Visit> {
        self.visits.last()
    }
}

/// Solution returned by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// One route per vehicle, indexed by vehicle.
    pub routes: Vec<VehicleRoute>,
    /// Arc costs plus span costs plus every penalty charged.
    pub objective: i64,
}

impl Assignment {
    /// Route of `vehicle`.
    #[must_use]
    pub fn route(&self, vehicle: usize) -> Option<&VehicleRoute> {
        self.routes.get(vehicle)
    }

    /// Per-vehicle node sequences without the depot ends.
    #[must_use]
    pub fn node_sequences(&self) -> Vec<Vec<NodeIndex>> {
        self.routes
            .iter()
            .map(|route| route.stops().collect())
            .collect()
    }

    /// Every node some vehicle visits, depot excluded.
    #[must_use]
    pub fn visited(&self) -> BTreeSet<NodeIndex> {
        self.routes.iter().flat_map(VehicleRoute::stops).collect()
    }

    /// Visit of `node`, with the vehicle making it.
    #[must_use]
    pub fn find_visit(&self, node: NodeIndex) -> Option<(usize, &Visit)> {
        self.routes.iter().find_map(|route| {
            route
                .visits
                .iter()
                .find(|visit| visit.node == node)
                .map(|visit| (route.vehicle, visit))
        })
    }

    /// Sum of every route's makespan.
    #[must_use]
    pub fn total_makespan(&self) -> i64 {
        self.routes
            .iter()
            .fold(0_i64, |total, route| total.saturating_add(route.makespan()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn visit(node: NodeIndex) -> Visit {
        Visit {
            node,
            cumuls: DimensionValues::default(),
            slacks: DimensionValues::default(),
        }
    }

    #[rstest]
    fn values_are_keyed_by_dimension() {
        let mut values = DimensionValues::default();
        values.set(DimensionId::Load, 180);
        values.set(DimensionId::GlobalTime, 12);
        assert_eq!(values.get(DimensionId::Load), Some(180));
        assert_eq!(values.get(DimensionId::Landing), None);
        assert_eq!(
            values.iter().collect::<Vec<_>>(),
            vec![(DimensionId::GlobalTime, 12), (DimensionId::Load, 180)]
        );
    }

    #[rstest]
    fn empty_route_is_unused() {
        let route = VehicleRoute {
            vehicle: 0,
            visits: vec![visit(DEPOT), visit(DEPOT)],
            arc_costs: vec![0],
        };
        assert!(!route.is_used());
        assert_eq!(route.makespan(), 0);
    }

    #[rstest]
    fn totals_span_routes() {
        let assignment = Assignment {
            routes: vec![
                VehicleRoute {
                    vehicle: 0,
                    visits: vec![visit(DEPOT), visit(2), visit(1), visit(DEPOT)],
                    arc_costs: vec![4, 5, 6],
                },
                VehicleRoute {
                    vehicle: 1,
                    visits: vec![visit(DEPOT), visit(3), visit(DEPOT)],
                    arc_costs: vec![7, 8],
                },
            ],
            objective: 0,
        };
        assert_eq!(assignment.total_makespan(), 30);
        assert_eq!(assignment.node_sequences(), vec![vec![2, 1], vec![3]]);
        assert_eq!(assignment.visited().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(assignment.find_visit(3).map(|(vehicle, _)| vehicle), Some(1));
    }
}
