use thiserror::Error;

use crate::problem::NodeIndex;

use super::dimension::DimensionId;

/// Errors raised while defining dimensions and assembling constraints.
///
/// Any of these aborts model construction; no partial model is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelDefinitionError {
    /// The cumulative domain is empty.
    #[error("dimension {dimension} has inverted bounds [{lower}, {upper}]")]
    InvalidBounds {
        /// Offending dimension.
        dimension: DimensionId,
        /// Requested lower bound.
        lower: i64,
        /// Requested upper bound.
        upper: i64,
    },
    /// A slack ceiling is negative.
    #[error("dimension {dimension} has negative slack ceiling {slack_max}")]
    NegativeSlack {
        /// Offending dimension.
        dimension: DimensionId,
        /// Requested ceiling.
        slack_max: i64,
    },
    /// The identifier is already registered.
    #[error("dimension {0} is already defined")]
    DuplicateDimension(DimensionId),
    /// The transit rule yields nothing for a node pair.
    #[error("dimension {dimension} has no transit for arc {from} -> {to}")]
    MissingTransit {
        /// Offending dimension.
        dimension: DimensionId,
        /// Arc origin.
        from: NodeIndex,
        /// Arc destination.
        to: NodeIndex,
    },
    /// The per-vehicle capacity list does not match the fleet.
    #[error("dimension {dimension} needs {expected} vehicle capacities, found {found}")]
    CapacityMismatch {
        /// Offending dimension.
        dimension: DimensionId,
        /// Fleet size.
        expected: usize,
        /// Capacities supplied.
        found: usize,
    },
    /// A vehicle capacity leaves no admissible value.
    #[error(
        "dimension {dimension} capacity {capacity} of vehicle {vehicle} is below its lower bound"
    )]
    CapacityBelowLower {
        /// Offending dimension.
        dimension: DimensionId,
        /// Offending vehicle.
        vehicle: usize,
        /// Supplied capacity.
        capacity: i64,
    },
    /// A constraint needs a dimension that was never registered.
    #[error("{required_by} requires dimension {dimension}")]
    MissingDimension {
        /// Dimension needed.
        dimension: DimensionId,
        /// Constraint family asking for it.
        required_by: &'static str,
    },
    /// Dropping a mandatory node would not dominate every other penalty.
    #[error("drop penalty {drop} must exceed {other} penalty {value}")]
    PenaltyOrdering {
        /// Configured drop penalty.
        drop: i64,
        /// Name of the penalty it fails to dominate.
        other: &'static str,
        /// That penalty's weight.
        value: i64,
    },
}

/// A dimension key that names no dimension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dimension `{0}`")]
pub struct UnknownDimensionName(pub String);
