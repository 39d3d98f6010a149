//! Raw problem record as handed over by an external loader.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Location reference for a node: the group key shared by co-located nodes
/// and the opaque external identifier reported back to planners.
///
/// Serialised as a `[group, id]` pair to match the planning input format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "(String, String)", into = "(String, String)")
)]
pub struct LocationKey {
    /// Group key; nodes sharing it are at the same physical site.
    pub group: String,
    /// External location identifier.
    pub id: String,
}

impl LocationKey {
    /// Build a key from its group and identifier.
    ///
    /// # Examples
    /// ```
    /// use sortie_core::LocationKey;
    ///
    /// let key = LocationKey::new("HUB", "HUB-1");
    /// assert_eq!(key.group, "HUB");
    /// ```
    #[must_use]
    pub fn new(group: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            id: id.into(),
        }
    }
}

impl From<(String, String)> for LocationKey {
    fn from((group, id): (String, String)) -> Self {
        Self { group, id }
    }
}

impl From<LocationKey> for (String, String) {
    fn from(key: LocationKey) -> Self {
        (key.group, key.id)
    }
}

/// Performance and weight figures of the aircraft type flying every route.
///
/// All figures are integers in the units of the matrices (time units,
/// kilograms) so cumulative arithmetic stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AircraftProfile {
    /// Longest flight time between two supply stops.
    #[cfg_attr(feature = "serde", serde(rename = "MaxTimeWithoutSupply"))]
    pub max_time_without_supply: i64,
    /// Fuel burned per time unit.
    #[cfg_attr(feature = "serde", serde(rename = "Consumption"))]
    pub consumption: i64,
    /// Maximum takeoff weight.
    #[cfg_attr(feature = "serde", serde(rename = "MaxTakeoffWeight"))]
    pub max_takeoff_weight: i64,
    /// Basic operational (empty, crewed) weight.
    #[cfg_attr(feature = "serde", serde(rename = "BasicOperationalWeight"))]
    pub basic_operational_weight: i64,
    /// Weight of one unit of balance (one passenger).
    #[cfg_attr(feature = "serde", serde(rename = "PassengerWeight"))]
    pub passenger_weight: i64,
    /// Seats available on board.
    #[cfg_attr(feature = "serde", serde(rename = "MaxPassengersCardinality"))]
    pub max_passengers: i64,
    /// Landings allowed between two reload stops.
    #[cfg_attr(feature = "serde", serde(rename = "MaxLandingPerRoute"))]
    pub max_landings_per_route: i64,
}

impl AircraftProfile {
    /// Fuel carried with full tanks: enough for the longest unsupplied leg.
    #[must_use]
    pub const fn full_tank(&self) -> i64 {
        self.max_time_without_supply.saturating_mul(self.consumption)
    }

    /// Payload ceiling imposed by the cabin rather than by weight.
    #[must_use]
    pub const fn passenger_ceiling(&self) -> i64 {
        self.max_passengers.saturating_mul(self.passenger_weight)
    }
}

/// Unvalidated planning input.
///
/// Field names follow the planning JSON format; see
/// [`ProblemGraph::new`](crate::ProblemGraph::new) for the validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProblemData {
    /// Travel time between every ordered pair of nodes.
    #[cfg_attr(feature = "serde", serde(rename = "TimeMatrix"))]
    pub time_matrix: Vec<Vec<i64>>,
    /// Travel distance between every ordered pair of nodes.
    #[cfg_attr(feature = "serde", serde(rename = "DistanceMatrix"))]
    pub distance_matrix: Vec<Vec<i64>>,
    /// Net passenger delta at each node; nonzero marks a mandatory visit.
    #[cfg_attr(feature = "serde", serde(rename = "NodeBalance"))]
    pub node_balance: Vec<i64>,
    /// Ground time spent at each node before departing.
    pub service_time: Vec<i64>,
    /// Location group and external id of each node.
    #[cfg_attr(feature = "serde", serde(rename = "AllIndexes"))]
    pub locations: Vec<LocationKey>,
    /// Pickup and delivery node indices, possibly repeated.
    #[cfg_attr(feature = "serde", serde(rename = "Demands"))]
    pub demands: Vec<(usize, usize)>,
    /// Number of identical vehicles.
    pub num_vehicles: usize,
    /// Start and end node of every vehicle.
    pub depot: usize,
    /// First checkpoint (reload) node index.
    #[cfg_attr(feature = "serde", serde(rename = "FirstCheckPoint"))]
    pub first_checkpoint: usize,
    /// Aircraft figures, flattened into the record.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub aircraft: AircraftProfile,
}
