//! Routing model construction.
//!
//! A model is built in two stages. [`DimensionBuilder`] registers the
//! cumulative tracks; finishing it yields the [`ConstraintAssembler`], which
//! attaches pairing, dropping and soft-bound constraints and assembles the
//! immutable [`RoutingModel`] handed to an engine.

mod config;
mod constraints;
mod dimension;
mod dimensions;
mod error;
pub mod transit;

pub use config::{DEFAULT_HORIZON, ModelConfig, Penalties};
pub use constraints::{ConstraintAssembler, Disjunction};
pub use dimension::{
    BinaryTransit, BoundLimit, Dimension, DimensionId, Dimensions, PayloadLimit, SoftUpperBound,
    Transit, TransitRule, UnaryTransit, VisitRef,
};
pub use dimensions::DimensionBuilder;
pub use error::{ModelDefinitionError, UnknownDimensionName};

use crate::problem::{DemandPair, NodeIndex, ProblemGraph};

/// Fully assembled routing model.
///
/// Read-only once built: engines and the evaluator borrow it.
#[derive(Debug, Clone)]
pub struct RoutingModel {
    pub(crate) graph: ProblemGraph,
    pub(crate) config: ModelConfig,
    pub(crate) dimensions: Dimensions,
    pub(crate) pairs: Vec<DemandPair>,
    pub(crate) disjunctions: Vec<Disjunction>,
}

impl RoutingModel {
    /// Build the standard model: all seven dimensions and every constraint
    /// family.
    ///
    /// # Examples
    /// ```
    /// use sortie_core::{DimensionId, ModelConfig, ProblemGraph, RoutingModel};
    /// # use sortie_core::{LocationKey, ProblemData};
    /// # let data = ProblemData {
    /// #     time_matrix: vec![vec![0, 5], vec![5, 0]],
    /// #     distance_matrix: vec![vec![0, 7], vec![7, 0]],
    /// #     node_balance: vec![0, 0],
    /// #     service_time: vec![0, 0],
    /// #     locations: vec![LocationKey::new("HUB", "HUB"), LocationKey::new("A", "A")],
    /// #     num_vehicles: 1,
    /// #     first_checkpoint: 2,
    /// #     ..ProblemData::default()
    /// # };
    /// let model = RoutingModel::standard(ProblemGraph::new(data)?, ModelConfig::default())?;
    /// assert!(model.dimension(DimensionId::GlobalTime).is_some());
    /// assert_eq!(model.disjunctions().len(), 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn standard(
        graph: ProblemGraph,
        config: ModelConfig,
    ) -> Result<Self, ModelDefinitionError> {
        let mut builder = DimensionBuilder::new(graph, config);
        builder.with_standard_dimensions()?;
        builder.finish().with_standard_constraints()
    }

    /// Problem graph.
    #[must_use]
    pub const fn graph(&self) -> &ProblemGraph {
        &self.graph
    }

    /// Settings the model was built with.
    #[must_use]
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Registered dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// A registered dimension.
    #[must_use]
    pub fn dimension(&self, id: DimensionId) -> Option<&Dimension> {
        self.dimensions.get(id)
    }

    /// Pickup and delivery pairs the engine must honour.
    #[must_use]
    pub fn demand_pairs(&self) -> &[DemandPair] {
        &self.pairs
    }

    /// Optional visits, by node.
    #[must_use]
    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    /// Disjunction covering `node`, if it may be dropped.
    #[must_use]
    pub fn disjunction(&self, node: NodeIndex) -> Option<&Disjunction> {
        self.disjunctions.iter().find(|d| d.node == node)
    }

    /// Pair `node` belongs to, if any.
    #[must_use]
    pub fn pair_of(&self, node: NodeIndex) -> Option<&DemandPair> {
        self.pairs
            .iter()
            .find(|pair| pair.pickup == node || pair.delivery == node)
    }

    /// Number of vehicles.
    #[must_use]
    pub const fn vehicle_count(&self) -> usize {
        self.graph.vehicle_count()
    }

    /// Cost of travelling `from -> to`, identical for every vehicle.
    #[must_use]
    pub fn arc_cost(&self, from: NodeIndex, to: NodeIndex) -> Option<i64> {
        transit::travel_time_cost(&self.graph, from, to)
    }
}
