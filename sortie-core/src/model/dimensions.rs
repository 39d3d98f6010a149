//! Dimension builder: the first stage of model construction.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::problem::ProblemGraph;

use super::config::ModelConfig;
use super::constraints::ConstraintAssembler;
use super::dimension::{Dimension, DimensionId, Dimensions, TransitRule, UnaryTransit};
use super::error::ModelDefinitionError;
use super::transit;

/// Requested shape of a dimension before validation.
struct DimensionSpec {
    id: DimensionId,
    rule: TransitRule,
    lower: i64,
    upper: i64,
    slack_max: i64,
    start_at_zero: bool,
    vehicle_capacities: Option<Vec<i64>>,
    span_cost: i64,
}

/// Registers the cumulative tracks of a model.
///
/// Finishing the builder with [`DimensionBuilder::finish`] yields the
/// [`ConstraintAssembler`], so constraints can only be attached once every
/// dimension exists.
///
/// # Examples
/// ```
/// use sortie_core::{DimensionBuilder, DimensionId, ModelConfig, ProblemGraph};
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
/// let graph = ProblemGraph::new(data)?;
/// let mut builder = DimensionBuilder::new(graph, ModelConfig::default());
/// builder.with_standard_dimensions()?;
/// assert!(builder.dimensions().contains(DimensionId::Landing));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct DimensionBuilder {
    graph: ProblemGraph,
    config: ModelConfig,
    dimensions: Dimensions,
}

impl DimensionBuilder {
    /// Start a model over `graph`.
    #[must_use]
    pub fn new(graph: ProblemGraph, config: ModelConfig) -> Self {
        Self {
            graph,
            config,
            dimensions: Dimensions::default(),
        }
    }

    /// Graph the model is built over.
    #[must_use]
    pub const fn graph(&self) -> &ProblemGraph {
        &self.graph
    }

    /// Dimensions registered so far.
    #[must_use]
    pub const fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Register a track that never resets: cumulative domain `[0, upper]`, no
    /// slack.
    pub fn create_global_dimension(
        &mut self,
        id: DimensionId,
        rule: TransitRule,
        upper: i64,
        start_at_zero: bool,
    ) -> Result<&mut Self, ModelDefinitionError> {
        self.register(DimensionSpec {
            id,
            rule,
            lower: 0,
            upper,
            slack_max: 0,
            start_at_zero,
            vehicle_capacities: None,
            span_cost: 0,
        })
    }

    /// Register a reload-scoped track: domain `[0, upper]` and `slack_max`
    /// of slack, emptied by `Reset` transits.
    pub fn create_reset_dimension(
        &mut self,
        id: DimensionId,
        rule: TransitRule,
        slack_max: i64,
        upper: i64,
        start_at_zero: bool,
    ) -> Result<&mut Self, ModelDefinitionError> {
        self.register(DimensionSpec {
            id,
            rule,
            lower: 0,
            upper,
            slack_max,
            start_at_zero,
            vehicle_capacities: None,
            span_cost: 0,
        })
    }

    /// Register a track driven by the node being left, with one capacity per
    /// vehicle.
    pub fn create_unary_dimension(
        &mut self,
        id: DimensionId,
        rule: UnaryTransit,
        vehicle_capacities: Vec<i64>,
        start_at_zero: bool,
    ) -> Result<&mut Self, ModelDefinitionError> {
        let upper = vehicle_capacities.iter().copied().max().unwrap_or(0);
        self.register(DimensionSpec {
            id,
            rule: TransitRule::Unary(rule),
            lower: 0,
            upper,
            slack_max: 0,
            start_at_zero,
            vehicle_capacities: Some(vehicle_capacities),
            span_cost: 0,
        })
    }

    /// Register the landing counter, capped at `max_landings` per flight and
    /// carrying `span_cost` to favour fewer landings.
    pub fn create_landing_dimension(
        &mut self,
        max_landings: i64,
        span_cost: i64,
    ) -> Result<&mut Self, ModelDefinitionError> {
        self.register(DimensionSpec {
            id: DimensionId::Landing,
            rule: TransitRule::Binary(transit::landing),
            lower: 0,
            upper: max_landings,
            slack_max: self.config.horizon,
            start_at_zero: true,
            vehicle_capacities: None,
            span_cost,
        })
    }

    /// Register a counter advancing by `step` on every arc.
    pub fn create_constant_dimension(
        &mut self,
        id: DimensionId,
        step: i64,
        upper: i64,
        start_at_zero: bool,
    ) -> Result<&mut Self, ModelDefinitionError> {
        self.register(DimensionSpec {
            id,
            rule: TransitRule::Constant(step),
            lower: 0,
            upper,
            slack_max: 0,
            start_at_zero,
            vehicle_capacities: None,
            span_cost: 0,
        })
    }

    /// Attach a global span cost to a registered dimension.
    pub fn set_global_span_cost(
        &mut self,
        id: DimensionId,
        coefficient: i64,
    ) -> Result<&mut Self, ModelDefinitionError> {
        let dimension =
            self.dimensions
                .get_mut(id)
                .ok_or(ModelDefinitionError::MissingDimension {
                    dimension: id,
                    required_by: "global span cost",
                })?;
        dimension.span_cost = coefficient;
        Ok(self)
    }

    /// Register the seven standard tracks.
    ///
    /// Time and distance are tracked globally and since the last reload; the
    /// load, landing and visit tracks follow. The global distance track
    /// carries the configured span cost.
    pub fn with_standard_dimensions(&mut self) -> Result<&mut Self, ModelDefinitionError> {
        let horizon = self.config.horizon;
        let capacities = vec![horizon; self.graph.vehicle_count()];
        let max_landings = self.graph.aircraft().max_landings_per_route;
        let distance_span_cost = self.config.distance_span_cost;
        let landing_span_cost = self.config.landing_span_cost;
        let visit_limit = self.config.visit_limit;

        self.create_global_dimension(
            DimensionId::GlobalDistance,
            TransitRule::Binary(transit::travel_distance),
            horizon,
            true,
        )?
        .create_reset_dimension(
            DimensionId::ReloadDistance,
            TransitRule::Binary(transit::reload_distance),
            horizon,
            horizon,
            true,
        )?
        .set_global_span_cost(DimensionId::GlobalDistance, distance_span_cost)?
        .create_reset_dimension(
            DimensionId::ReloadTime,
            TransitRule::Binary(transit::reload_time),
            horizon,
            horizon,
            true,
        )?
        .create_global_dimension(
            DimensionId::GlobalTime,
            TransitRule::Binary(transit::travel_time),
            horizon,
            true,
        )?
        .create_unary_dimension(DimensionId::Load, transit::passenger_load, capacities, true)?
        .create_landing_dimension(max_landings, landing_span_cost)?
        .create_constant_dimension(DimensionId::Visits, 1, visit_limit, true)
    }

    /// Close dimension registration and move on to constraints.
    #[must_use]
    pub fn finish(self) -> ConstraintAssembler {
        ConstraintAssembler::new(self.graph, self.config, self.dimensions)
    }

    fn register(&mut self, spec: DimensionSpec) -> Result<&mut Self, ModelDefinitionError> {
        let DimensionSpec {
            id,
            rule,
            lower,
            upper,
            slack_max,
            start_at_zero,
            vehicle_capacities,
            span_cost,
        } = spec;

        if self.dimensions.contains(id) {
            return Err(ModelDefinitionError::DuplicateDimension(id));
        }
        if lower > upper {
            return Err(ModelDefinitionError::InvalidBounds {
                dimension: id,
                lower,
                upper,
            });
        }
        if slack_max < 0 {
            return Err(ModelDefinitionError::NegativeSlack {
                dimension: id,
                slack_max,
            });
        }
        let vehicles = self.graph.vehicle_count();
        let capacities = vehicle_capacities.unwrap_or_else(|| vec![upper; vehicles]);
        if capacities.len() != vehicles {
            return Err(ModelDefinitionError::CapacityMismatch {
                dimension: id,
                expected: vehicles,
                found: capacities.len(),
            });
        }
        if let Some((vehicle, capacity)) = capacities
            .iter()
            .copied()
            .enumerate()
            .find(|(_, capacity)| *capacity < lower)
        {
            return Err(ModelDefinitionError::CapacityBelowLower {
                dimension: id,
                vehicle,
                capacity,
            });
        }
        self.check_transit_coverage(id, rule)?;

        let dimension = Dimension {
            id,
            rule,
            lower,
            upper,
            slack_max,
            start_at_zero,
            vehicle_capacities: capacities,
            span_cost,
            soft_upper_bounds: BTreeMap::new(),
            pinned_slack: BTreeSet::new(),
        };
        self.dimensions
            .insert(dimension)
            .map_err(|rejected| ModelDefinitionError::DuplicateDimension(rejected.id))?;
        debug!("registered dimension {id} with domain [{lower}, {upper}], slack {slack_max}");
        Ok(self)
    }

    fn check_transit_coverage(
        &self,
        id: DimensionId,
        rule: TransitRule,
    ) -> Result<(), ModelDefinitionError> {
        for from in self.graph.node_indices() {
            for to in self.graph.node_indices() {
                if rule.evaluate(&self.graph, from, to).is_none() {
                    return Err(ModelDefinitionError::MissingTransit {
                        dimension: id,
                        from,
                        to,
                    });
                }
            }
        }
        Ok(())
    }
}
