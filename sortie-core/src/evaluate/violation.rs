use thiserror::Error;

use crate::engine::SolveError;
use crate::model::DimensionId;
use crate::problem::NodeIndex;

/// First problem found while checking routes against a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteViolation {
    /// The route count does not fit the fleet.
    #[error("{routes} routes supplied for {vehicles} vehicles")]
    RouteCount {
        /// Routes supplied.
        routes: usize,
        /// Fleet size.
        vehicles: usize,
    },
    /// A route names a node outside the graph.
    #[error("vehicle {vehicle} visits unknown node {node}")]
    UnknownNode {
        /// Vehicle index.
        vehicle: usize,
        /// Offending node.
        node: NodeIndex,
    },
    /// The depot appears between the route ends.
    #[error("vehicle {vehicle} passes through the depot mid-route")]
    DepotMidRoute {
        /// Vehicle index.
        vehicle: usize,
    },
    /// A route does not start and end at the depot.
    #[error("route of vehicle {vehicle} does not start and end at the depot")]
    OpenRoute {
        /// Vehicle index.
        vehicle: usize,
    },
    /// A route records a different number of hop costs than it has hops.
    #[error("vehicle {vehicle} records {costs} hop costs for {hops} hops")]
    HopCount {
        /// Vehicle index.
        vehicle: usize,
        /// Hops on the route.
        hops: usize,
        /// Costs recorded.
        costs: usize,
    },
    /// A route is stored under another vehicle's index.
    #[error("route at position {position} belongs to vehicle {vehicle}")]
    MisplacedRoute {
        /// Position in the assignment.
        position: usize,
        /// Vehicle recorded on the route.
        vehicle: usize,
    },
    /// A node is visited more than once.
    #[error("node {node} is visited more than once")]
    DuplicateVisit {
        /// Offending node.
        node: NodeIndex,
    },
    /// A node without a disjunction is left out.
    #[error("node {node} is not optional but is never visited")]
    RequiredNodeSkipped {
        /// Offending node.
        node: NodeIndex,
    },
    /// A cumulative value leaves its domain.
    #[error(
        "{dimension} is {value} at node {node} on vehicle {vehicle}, outside [{lower}, {upper}]"
    )]
    CumulOutOfDomain {
        /// Offending dimension.
        dimension: DimensionId,
        /// Vehicle index.
        vehicle: usize,
        /// Node reached.
        node: NodeIndex,
        /// Resolved cumulative value.
        value: i64,
        /// Lower bound.
        lower: i64,
        /// Vehicle capacity.
        upper: i64,
    },
    /// Only one end of a demand pair is visited, or by different vehicles.
    #[error("pickup {pickup} and delivery {delivery} are not served by one vehicle")]
    SplitPair {
        /// Pickup node.
        pickup: NodeIndex,
        /// Delivery node.
        delivery: NodeIndex,
    },
    /// A delivery happens before its pickup.
    #[error("delivery {delivery} precedes pickup {pickup}")]
    DeliveryBeforePickup {
        /// Pickup node.
        pickup: NodeIndex,
        /// Delivery node.
        delivery: NodeIndex,
    },
    /// A cumulative value is absent from a visit.
    #[error("{dimension} has no value at position {position} of vehicle {vehicle}")]
    MissingValue {
        /// Dimension lacking a value.
        dimension: DimensionId,
        /// Vehicle index.
        vehicle: usize,
        /// Visit position.
        position: usize,
    },
    /// Slack exceeds the ceiling of the visit, zero where pinned.
    #[error("{dimension} slack {slack} at node {node} exceeds {slack_max}")]
    SlackOutOfRange {
        /// Offending dimension.
        dimension: DimensionId,
        /// Node departed.
        node: NodeIndex,
        /// Recorded slack.
        slack: i64,
        /// Admissible ceiling.
        slack_max: i64,
    },
    /// A cumulative value does not follow from its predecessor.
    #[error(
        "{dimension} at position {position} of vehicle {vehicle} is {found}, expected {expected}"
    )]
    CumulMismatch {
        /// Offending dimension.
        dimension: DimensionId,
        /// Vehicle index.
        vehicle: usize,
        /// Visit position.
        position: usize,
        /// Value implied by the transit.
        expected: i64,
        /// Recorded value.
        found: i64,
    },
    /// A hop cost differs from the model's arc cost.
    #[error("hop {position} of vehicle {vehicle} costs {found}, expected {expected}")]
    ArcCostMismatch {
        /// Vehicle index.
        vehicle: usize,
        /// Hop position.
        position: usize,
        /// Model arc cost.
        expected: i64,
        /// Recorded cost.
        found: i64,
    },
    /// The recorded objective differs from the recomputed one.
    #[error("objective is {found}, expected {expected}")]
    ObjectiveMismatch {
        /// Recomputed objective.
        expected: i64,
        /// Recorded objective.
        found: i64,
    },
}

impl RouteViolation {
    /// Whether the violation breaks a model constraint rather than the shape
    /// of the routes.
    #[must_use]
    pub const fn breaks_constraint(&self) -> bool {
        matches!(
            self,
            Self::RequiredNodeSkipped { .. }
                | Self::CumulOutOfDomain { .. }
                | Self::SplitPair { .. }
                | Self::DeliveryBeforePickup { .. }
                | Self::SlackOutOfRange { .. }
        )
    }
}

impl From<RouteViolation> for SolveError {
    fn from(reason: RouteViolation) -> Self {
        if reason.breaks_constraint() {
            Self::Infeasible { reason }
        } else {
            Self::InvalidRoutes { reason }
        }
    }
}
