//! Itinerary decoding.
//!
//! [`decode`] walks each vehicle's route in an [`Assignment`], splits it into
//! flights at reload checkpoints and emits one [`RouteRecord`] per visit with
//! the cumulative values of the selected [`ReportColumns`].

mod columns;
mod error;

#[cfg(test)]
mod tests;

use log::warn;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use columns::ReportColumns;
pub use error::ReportingError;

use crate::assignment::{Assignment, VehicleRoute};
use crate::model::{DimensionId, RoutingModel};
use crate::problem::{DEPOT, NodeIndex};

/// One visited node of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteRecord {
    /// Flight number, starting at 1 and bumped at each reload trigger.
    pub flight: usize,
    /// Vehicle flying the route.
    pub vehicle: usize,
    /// External location identifier.
    pub node: String,
    /// Node index.
    pub node_id: NodeIndex,
    /// Cumulative values, in report column order.
    pub values: Vec<i64>,
}

/// Decoded route of one vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Itinerary {
    /// Vehicle index.
    pub vehicle: usize,
    /// Records from the start depot to the depot return.
    pub records: Vec<RouteRecord>,
    /// Summed arc cost of the route.
    pub makespan: i64,
}

impl Itinerary {
    /// Number of flights flown.
    #[must_use]
    pub fn flights(&self) -> usize {
        self.records.last().map_or(0, |record| record.flight)
    }
}

/// Decoded assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Report {
    /// Dimensions reported, in record value order.
    pub columns: Vec<DimensionId>,
    /// One itinerary per vehicle.
    pub itineraries: Vec<Itinerary>,
    /// Sum of every itinerary's makespan.
    pub total_makespan: i64,
    /// Objective of the assignment.
    pub objective: i64,
    /// Nodes no vehicle visits, depot excluded.
    pub unvisited: Vec<NodeIndex>,
}

/// Decode `assignment` into per-vehicle itineraries.
///
/// # Examples
/// ```
/// use sortie_core::{AircraftProfile, LocationKey, ModelConfig, ProblemData, ProblemGraph};
/// use sortie_core::{ReportColumns, RoutingModel, decode};
///
/// let data = ProblemData {
///     time_matrix: vec![vec![0, 10, 20], vec![10, 0, 15], vec![20, 15, 0]],
///     distance_matrix: vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]],
///     node_balance: vec![0, 1, -1],
///     service_time: vec![0, 0, 0],
///     locations: vec![
///         LocationKey::new("HUB", "HUB"),
///         LocationKey::new("A", "A-1"),
///         LocationKey::new("B", "B-1"),
///     ],
///     demands: vec![(1, 2)],
///     num_vehicles: 1,
///     first_checkpoint: 3,
///     aircraft: AircraftProfile { max_landings_per_route: 4, ..AircraftProfile::default() },
///     ..ProblemData::default()
/// };
/// let model = RoutingModel::standard(ProblemGraph::new(data)?, ModelConfig::default())?;
/// let assignment = model.evaluate_routes(&[vec![1, 2]])?;
/// let report = decode(&model, &assignment, &ReportColumns::default())?;
/// assert_eq!(report.total_makespan, 45);
/// assert_eq!(report.itineraries[0].records.len(), 4);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode(
    model: &RoutingModel,
    assignment: &Assignment,
    columns: &ReportColumns,
) -> Result<Report, ReportingError> {
    if let Some(missing) = columns
        .iter()
        .find(|id| model.dimension(*id).is_none())
    {
        return Err(ReportingError::UnknownDimension(missing));
    }

    let itineraries = assignment
        .routes
        .iter()
        .map(|route| decode_route(model, route, columns))
        .collect::<Result<Vec<_>, _>>()?;
    let total_makespan = itineraries
        .iter()
        .fold(0_i64, |total, itinerary| total.saturating_add(itinerary.makespan));

    let visited = assignment.visited();
    let graph = model.graph();
    let unvisited: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|node| *node != DEPOT && !visited.contains(node))
        .collect();
    for node in unvisited.iter().filter(|node| graph.is_mandatory(**node)) {
        warn!("mandatory node {node} is not served by any vehicle");
    }

    Ok(Report {
        columns: columns.as_slice().to_vec(),
        itineraries,
        total_makespan,
        objective: assignment.objective,
        unvisited,
    })
}

fn decode_route(
    model: &RoutingModel,
    route: &VehicleRoute,
    columns: &ReportColumns,
) -> Result<Itinerary, ReportingError> {
    let graph = model.graph();
    let vehicle = route.vehicle;
    let mut flight = 1_usize;
    let mut records = Vec::with_capacity(route.visits.len());
    for visit in &route.visits {
        if graph.triggers_reload(visit.node) {
            flight = flight.saturating_add(1);
        }
        let values = columns
            .iter()
            .map(|dimension| {
                visit
                    .cumuls
                    .get(dimension)
                    .ok_or(ReportingError::MissingCumul {
                        dimension,
                        vehicle,
                        node: visit.node,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        records.push(RouteRecord {
            flight,
            vehicle,
            node: graph
                .location(visit.node)
                .map(|location| location.id.clone())
                .unwrap_or_default(),
            node_id: visit.node,
            values,
        });
    }
    let makespan = route
        .arc_costs
        .iter()
        .fold(0_i64, |total, cost| total.saturating_add(*cost));
    Ok(Itinerary {
        vehicle,
        records,
        makespan,
    })
}
