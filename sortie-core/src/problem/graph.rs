//! Validated problem graph shared read-only by every later stage.

use std::collections::HashSet;

use super::data::{AircraftProfile, LocationKey, ProblemData};
use super::error::ProblemError;

/// Position of a node in the matrices.
pub type NodeIndex = usize;

/// The node every vehicle starts from and returns to.
pub const DEPOT: NodeIndex = 0;

/// A pickup node paired with the node its demand is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DemandPair {
    /// Node where the demand boards.
    pub pickup: NodeIndex,
    /// Node where the demand leaves.
    pub delivery: NodeIndex,
}

/// Borrowed view of one node and its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a> {
    /// Matrix index.
    pub index: NodeIndex,
    /// Group key and external id.
    pub location: &'a LocationKey,
    /// Whether the node lies at or past the first checkpoint.
    pub is_checkpoint: bool,
    /// Ground time spent before departing.
    pub service_time: i64,
    /// Net passenger delta.
    pub balance: i64,
}

/// Validated nodes, matrices and fleet settings.
///
/// Construct with [`ProblemGraph::new`]; the graph is immutable afterwards.
///
/// # Examples
/// ```
/// use sortie_core::{LocationKey, ProblemData, ProblemGraph};
///
/// let data = ProblemData {
///     time_matrix: vec![vec![0, 5], vec![5, 0]],
///     distance_matrix: vec![vec![0, 7], vec![7, 0]],
///     node_balance: vec![0, 0],
///     service_time: vec![0, 2],
///     locations: vec![LocationKey::new("HUB", "HUB"), LocationKey::new("A", "A-1")],
///     num_vehicles: 1,
///     first_checkpoint: 2,
///     ..ProblemData::default()
/// };
/// let graph = ProblemGraph::new(data)?;
/// assert_eq!(graph.node_count(), 2);
/// assert!(!graph.is_mandatory(1));
/// # Ok::<(), sortie_core::ProblemError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemGraph {
    time: Vec<Vec<i64>>,
    distance: Vec<Vec<i64>>,
    balance: Vec<i64>,
    service_time: Vec<i64>,
    locations: Vec<LocationKey>,
    demands: Vec<DemandPair>,
    num_vehicles: usize,
    first_checkpoint: NodeIndex,
    aircraft: AircraftProfile,
}

impl ProblemGraph {
    /// Validate a raw record and build the graph.
    ///
    /// Repeated demand pairs are collapsed, keeping first-occurrence order.
    pub fn new(data: ProblemData) -> Result<Self, ProblemError> {
        let nodes = data.time_matrix.len();
        if nodes == 0 {
            return Err(ProblemError::Empty);
        }
        validate_matrix("time", &data.time_matrix, nodes)?;
        validate_matrix("distance", &data.distance_matrix, nodes)?;
        validate_length("NodeBalance", data.node_balance.len(), nodes)?;
        validate_length("service_time", data.service_time.len(), nodes)?;
        validate_length("AllIndexes", data.locations.len(), nodes)?;
        if let Some((node, value)) = data
            .service_time
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| *value < 0)
        {
            return Err(ProblemError::NegativeServiceTime { node, value });
        }
        if data.depot != DEPOT {
            return Err(ProblemError::DepotNotFirst { depot: data.depot });
        }
        if data.num_vehicles == 0 {
            return Err(ProblemError::NoVehicles);
        }
        if data.first_checkpoint > nodes {
            return Err(ProblemError::CheckpointOutOfRange {
                first_checkpoint: data.first_checkpoint,
                nodes,
            });
        }
        validate_aircraft(&data.aircraft)?;
        let demands = unique_demands(&data.demands, nodes)?;

        Ok(Self {
            time: data.time_matrix,
            distance: data.distance_matrix,
            balance: data.node_balance,
            service_time: data.service_time,
            locations: data.locations,
            demands,
            num_vehicles: data.num_vehicles,
            first_checkpoint: data.first_checkpoint,
            aircraft: data.aircraft,
        })
    }

    /// Number of nodes, depot included.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.time.len()
    }

    /// Number of vehicles in the fleet.
    #[must_use]
    pub const fn vehicle_count(&self) -> usize {
        self.num_vehicles
    }

    /// Index of the first checkpoint node.
    #[must_use]
    pub const fn first_checkpoint(&self) -> NodeIndex {
        self.first_checkpoint
    }

    /// Aircraft figures used by the payload bound.
    #[must_use]
    pub const fn aircraft(&self) -> &AircraftProfile {
        &self.aircraft
    }

    /// De-duplicated demand pairs in input order.
    #[must_use]
    pub fn demands(&self) -> &[DemandPair] {
        &self.demands
    }

    /// All node indices in ascending order.
    #[must_use]
    pub const fn node_indices(&self) -> std::ops::Range<NodeIndex> {
        0..self.node_count()
    }

    /// Borrow a node's attributes, or `None` when out of range.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<Node<'_>> {
        Some(Node {
            index,
            location: self.locations.get(index)?,
            is_checkpoint: self.is_checkpoint(index),
            service_time: self.service_time.get(index).copied()?,
            balance: self.balance.get(index).copied()?,
        })
    }

    /// Travel time from `from` to `to`.
    #[must_use]
    pub fn time(&self, from: NodeIndex, to: NodeIndex) -> Option<i64> {
        self.time.get(from)?.get(to).copied()
    }

    /// Travel distance from `from` to `to`.
    #[must_use]
    pub fn distance(&self, from: NodeIndex, to: NodeIndex) -> Option<i64> {
        self.distance.get(from)?.get(to).copied()
    }

    /// Ground time at `node`.
    #[must_use]
    pub fn service_time(&self, node: NodeIndex) -> Option<i64> {
        self.service_time.get(node).copied()
    }

    /// Net passenger delta at `node`.
    #[must_use]
    pub fn balance(&self, node: NodeIndex) -> Option<i64> {
        self.balance.get(node).copied()
    }

    /// Location key of `node`.
    #[must_use]
    pub fn location(&self, node: NodeIndex) -> Option<&LocationKey> {
        self.locations.get(node)
    }

    /// Whether both nodes sit in the same location group.
    #[must_use]
    pub fn same_group(&self, a: NodeIndex, b: NodeIndex) -> Option<bool> {
        Some(self.locations.get(a)?.group == self.locations.get(b)?.group)
    }

    /// Whether `node` is a checkpoint (`>= first checkpoint`).
    #[must_use]
    pub const fn is_checkpoint(&self, node: NodeIndex) -> bool {
        node >= self.first_checkpoint
    }

    /// Whether departing `node` reloads the aircraft (`> first checkpoint`).
    #[must_use]
    pub const fn triggers_reload(&self, node: NodeIndex) -> bool {
        node > self.first_checkpoint
    }

    /// Whether `node` must be visited: it moves passengers.
    #[must_use]
    pub fn is_mandatory(&self, node: NodeIndex) -> bool {
        self.balance(node).is_some_and(|balance| balance != 0)
    }
}

fn validate_matrix(
    matrix: &'static str,
    rows: &[Vec<i64>],
    nodes: usize,
) -> Result<(), ProblemError> {
    if rows.len() != nodes {
        return Err(ProblemError::MatrixShape {
            matrix,
            nodes,
            row: nodes,
            len: rows.len(),
        });
    }
    for (from, row) in rows.iter().enumerate() {
        if row.len() != nodes {
            return Err(ProblemError::MatrixShape {
                matrix,
                nodes,
                row: from,
                len: row.len(),
            });
        }
        if let Some((to, value)) = row.iter().copied().enumerate().find(|(_, v)| *v < 0) {
            return Err(ProblemError::NegativeEntry {
                matrix,
                from,
                to,
                value,
            });
        }
    }
    Ok(())
}

const fn validate_length(
    field: &'static str,
    len: usize,
    nodes: usize,
) -> Result<(), ProblemError> {
    if len == nodes {
        Ok(())
    } else {
        Err(ProblemError::NodeAttributeLength { field, nodes, len })
    }
}

fn validate_aircraft(aircraft: &AircraftProfile) -> Result<(), ProblemError> {
    let figures = [
        ("MaxTimeWithoutSupply", aircraft.max_time_without_supply),
        ("Consumption", aircraft.consumption),
        ("MaxTakeoffWeight", aircraft.max_takeoff_weight),
        ("BasicOperationalWeight", aircraft.basic_operational_weight),
        ("PassengerWeight", aircraft.passenger_weight),
        ("MaxPassengersCardinality", aircraft.max_passengers),
        ("MaxLandingPerRoute", aircraft.max_landings_per_route),
    ];
    match figures.into_iter().find(|(_, value)| *value < 0) {
        Some((field, value)) => Err(ProblemError::NegativeAircraftFigure { field, value }),
        None => Ok(()),
    }
}

fn unique_demands(
    demands: &[(usize, usize)],
    nodes: usize,
) -> Result<Vec<DemandPair>, ProblemError> {
    let mut unique: Vec<DemandPair> = Vec::with_capacity(demands.len());
    let mut claimed = HashSet::new();
    for &(pickup, delivery) in demands {
        let in_range = |node: usize| node != DEPOT && node < nodes;
        if !in_range(pickup) || !in_range(delivery) || pickup == delivery {
            return Err(ProblemError::InvalidDemand { pickup, delivery });
        }
        let pair = DemandPair { pickup, delivery };
        if unique.contains(&pair) {
            continue;
        }
        for node in [pickup, delivery] {
            if !claimed.insert(node) {
                return Err(ProblemError::SharedDemandNode { node });
            }
        }
        unique.push(pair);
    }
    Ok(unique)
}
