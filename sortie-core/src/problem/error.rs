use thiserror::Error;

/// Errors from [`crate::ProblemGraph::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// The record describes no nodes at all.
    #[error("problem must contain at least the depot node")]
    Empty,
    /// A matrix is not square over the node set.
    #[error("{matrix} matrix must be {nodes}x{nodes}; row {row} has {len} entries")]
    MatrixShape {
        /// Which matrix is malformed.
        matrix: &'static str,
        /// Expected side length.
        nodes: usize,
        /// Offending row, or `nodes` when the row count is wrong.
        row: usize,
        /// Observed length.
        len: usize,
    },
    /// A matrix holds a negative travel value.
    #[error("{matrix} matrix entry ({from}, {to}) is negative: {value}")]
    NegativeEntry {
        /// Which matrix holds the entry.
        matrix: &'static str,
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
        /// Offending value.
        value: i64,
    },
    /// A per-node attribute list does not cover every node.
    #[error("{field} must have one entry per node ({nodes}), found {len}")]
    NodeAttributeLength {
        /// Which attribute list is malformed.
        field: &'static str,
        /// Number of nodes.
        nodes: usize,
        /// Observed length.
        len: usize,
    },
    /// A service time is negative.
    #[error("service time at node {node} is negative: {value}")]
    NegativeServiceTime {
        /// Offending node.
        node: usize,
        /// Offending value.
        value: i64,
    },
    /// The depot must be node 0.
    #[error("depot must be node 0, found {depot}")]
    DepotNotFirst {
        /// Configured depot index.
        depot: usize,
    },
    /// No vehicle is available.
    #[error("at least one vehicle is required")]
    NoVehicles,
    /// The checkpoint boundary lies past the node range.
    #[error("first checkpoint {first_checkpoint} exceeds node count {nodes}")]
    CheckpointOutOfRange {
        /// Configured boundary.
        first_checkpoint: usize,
        /// Number of nodes.
        nodes: usize,
    },
    /// A demand references a node outside the graph or the depot.
    #[error("demand ({pickup}, {delivery}) references an invalid node")]
    InvalidDemand {
        /// Pickup index.
        pickup: usize,
        /// Delivery index.
        delivery: usize,
    },
    /// A node is shared between two distinct demand pairs.
    #[error("node {node} belongs to more than one demand pair")]
    SharedDemandNode {
        /// Node claimed twice.
        node: usize,
    },
    /// An aircraft figure is negative.
    #[error("aircraft figure {field} must not be negative, found {value}")]
    NegativeAircraftFigure {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: i64,
    },
}
