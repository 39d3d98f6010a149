use thiserror::Error;

use crate::model::DimensionId;
use crate::problem::NodeIndex;

/// Errors raised while decoding an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReportingError {
    /// A report column names a dimension the model never registered.
    #[error("dimension {0} is not part of the model")]
    UnknownDimension(DimensionId),
    /// The assignment carries no value for a reported dimension.
    #[error("no {dimension} value at node {node} on vehicle {vehicle}")]
    MissingCumul {
        /// Dimension lacking a value.
        dimension: DimensionId,
        /// Vehicle index.
        vehicle: usize,
        /// Node visited.
        node: NodeIndex,
    },
}
