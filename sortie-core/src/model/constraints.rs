//! Constraint assembler: the second stage of model construction.

use log::debug;

use crate::problem::{DEPOT, DemandPair, NodeIndex, ProblemGraph};

use super::RoutingModel;
use super::config::ModelConfig;
use super::dimension::{
    BoundLimit, Dimension, DimensionId, Dimensions, PayloadLimit, SoftUpperBound, VisitRef,
};
use super::error::ModelDefinitionError;

/// Optional visit of a node, dropped at the cost of `penalty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disjunction {
    /// Node that may be left out.
    pub node: NodeIndex,
    /// Cost charged when it is.
    pub penalty: i64,
}

/// Attaches pairing, dropping and soft-bound constraints to the registered
/// dimensions.
///
/// Obtained from [`DimensionBuilder::finish`](super::DimensionBuilder::finish);
/// [`ConstraintAssembler::assemble`] hands back the immutable
/// [`RoutingModel`].
#[derive(Debug)]
pub struct ConstraintAssembler {
    graph: ProblemGraph,
    config: ModelConfig,
    dimensions: Dimensions,
    pairs: Vec<DemandPair>,
    disjunctions: Vec<Disjunction>,
}

impl ConstraintAssembler {
    pub(crate) const fn new(
        graph: ProblemGraph,
        config: ModelConfig,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            graph,
            config,
            dimensions,
            pairs: Vec::new(),
            disjunctions: Vec::new(),
        }
    }

    /// Dimensions and the bounds attached so far.
    #[must_use]
    pub const fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Require every demand pair to ride one vehicle, pickup first in global
    /// time.
    pub fn add_pickup_deliveries(&mut self) -> Result<&mut Self, ModelDefinitionError> {
        self.require(DimensionId::GlobalTime, "pickup and delivery pairing")?;
        self.pairs = self.graph.demands().to_vec();
        debug!("paired {} demands", self.pairs.len());
        Ok(self)
    }

    /// Make every node but the depot optional: free to drop when it moves no
    /// passengers, charged the drop penalty otherwise.
    pub fn add_disjunctions(&mut self) -> &mut Self {
        let drop = self.config.penalties.drop;
        self.disjunctions = self
            .graph
            .node_indices()
            .filter(|node| *node != DEPOT)
            .map(|node| Disjunction {
                node,
                penalty: if self.graph.is_mandatory(node) { drop } else { 0 },
            })
            .collect();
        debug!("added {} disjunctions", self.disjunctions.len());
        self
    }

    /// Bound the load at every visit by the payload still available.
    pub fn add_payload_bounds(&mut self) -> Result<&mut Self, ModelDefinitionError> {
        self.require(DimensionId::ReloadTime, "payload bound")?;
        let aircraft = *self.graph.aircraft();
        let penalty = self.config.penalties.payload;
        let bounds: Vec<(NodeIndex, SoftUpperBound)> = self
            .graph
            .node_indices()
            .filter(|node| *node != DEPOT)
            .map(|node| {
                let balance = self.graph.balance(node).unwrap_or_default();
                let limit = PayloadLimit {
                    max_takeoff_weight: aircraft.max_takeoff_weight,
                    basic_operational_weight: aircraft.basic_operational_weight,
                    full_tank: aircraft.full_tank(),
                    consumption: aircraft.consumption,
                    allowance: balance.saturating_mul(aircraft.passenger_weight).min(0),
                    passenger_ceiling: aircraft.passenger_ceiling(),
                };
                (
                    node,
                    SoftUpperBound {
                        limit: BoundLimit::Payload(limit),
                        penalty,
                    },
                )
            })
            .collect();
        let load = self.require_mut(DimensionId::Load, "payload bound")?;
        for (node, bound) in bounds {
            load.set_soft_upper_bound(VisitRef::Node(node), bound);
        }
        debug!("attached payload bounds to {} nodes", self.graph.node_count().saturating_sub(1));
        Ok(self)
    }

    /// Pin slack before the first checkpoint and empty the cabin at
    /// checkpoints and on return.
    ///
    /// Checkpoint load bounds replace any payload bound on the same node.
    pub fn pin_checkpoint_slack(&mut self) -> Result<&mut Self, ModelDefinitionError> {
        const PINNED: [DimensionId; 4] = [
            DimensionId::ReloadTime,
            DimensionId::ReloadDistance,
            DimensionId::Load,
            DimensionId::Landing,
        ];
        for id in PINNED {
            self.require(id, "checkpoint slack pinning")?;
        }
        let first_checkpoint = self.graph.first_checkpoint();
        let nodes = self.graph.node_indices();
        let vehicles = self.graph.vehicle_count();
        let penalties = self.config.penalties;

        for id in PINNED {
            let dimension = self.require_mut(id, "checkpoint slack pinning")?;
            for node in nodes.clone().take_while(|node| *node < first_checkpoint) {
                dimension.pin_slack(node);
            }
        }

        let load = self.require_mut(DimensionId::Load, "checkpoint load bound")?;
        let checkpoint_bound = SoftUpperBound {
            limit: BoundLimit::Fixed(0),
            penalty: penalties.checkpoint_load,
        };
        for node in nodes.filter(|node| *node >= first_checkpoint && *node != DEPOT) {
            load.set_soft_upper_bound(VisitRef::Node(node), checkpoint_bound);
        }
        let return_bound = SoftUpperBound {
            limit: BoundLimit::Fixed(0),
            penalty: penalties.return_load,
        };
        for vehicle in 0..vehicles {
            load.set_soft_upper_bound(VisitRef::VehicleEnd(vehicle), return_bound);
        }
        debug!("pinned slack below checkpoint {first_checkpoint}");
        Ok(self)
    }

    /// Apply pairing, disjunctions, payload bounds and checkpoint pinning in
    /// that order, then assemble.
    pub fn with_standard_constraints(mut self) -> Result<RoutingModel, ModelDefinitionError> {
        self.add_pickup_deliveries()?
            .add_disjunctions()
            .add_payload_bounds()?
            .pin_checkpoint_slack()?;
        self.assemble()
    }

    /// Freeze the model.
    pub fn assemble(self) -> Result<RoutingModel, ModelDefinitionError> {
        self.config.penalties.validate()?;
        debug!(
            "assembled model with {} dimensions, {} pairs, {} disjunctions",
            self.dimensions.iter().count(),
            self.pairs.len(),
            self.disjunctions.len()
        );
        Ok(RoutingModel {
            graph: self.graph,
            config: self.config,
            dimensions: self.dimensions,
            pairs: self.pairs,
            disjunctions: self.disjunctions,
        })
    }

    fn require(
        &self,
        id: DimensionId,
        required_by: &'static str,
    ) -> Result<&Dimension, ModelDefinitionError> {
        self.dimensions
            .get(id)
            .ok_or(ModelDefinitionError::MissingDimension {
                dimension: id,
                required_by,
            })
    }

    fn require_mut(
        &mut self,
        id: DimensionId,
        required_by: &'static str,
    ) -> Result<&mut Dimension, ModelDefinitionError> {
        self.dimensions
            .get_mut(id)
            .ok_or(ModelDefinitionError::MissingDimension {
                dimension: id,
                required_by,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DimensionBuilder, Penalties};
    use crate::problem::{AircraftProfile, LocationKey, ProblemData};
    use rstest::{fixture, rstest};

    /// Depot, a paired pickup and delivery, a free node and checkpoints 4-5.
    #[fixture]
    fn graph() -> ProblemGraph {
        let n = 6;
        let matrix: Vec<Vec<i64>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0 } else { 10 }).collect())
            .collect();
        ProblemGraph::new(ProblemData {
            time_matrix: matrix.clone(),
            distance_matrix: matrix,
            node_balance: vec![0, 2, -2, 0, 0, 0],
            service_time: vec![0; n],
            locations: (0..n)
                .map(|i| LocationKey::new(format!("G{i}"), format!("L{i}")))
                .collect(),
            demands: vec![(1, 2)],
            num_vehicles: 2,
            depot: 0,
            first_checkpoint: 4,
            aircraft: AircraftProfile {
                max_time_without_supply: 100,
                consumption: 2,
                max_takeoff_weight: 4_000,
                basic_operational_weight: 2_500,
                passenger_weight: 80,
                max_passengers: 9,
                max_landings_per_route: 4,
            },
        })
        .expect("valid graph")
    }

    fn standard_assembler(graph: ProblemGraph, config: ModelConfig) -> ConstraintAssembler {
        let mut builder = DimensionBuilder::new(graph, config);
        builder.with_standard_dimensions().expect("standard dimensions");
        builder.finish()
    }

    #[rstest]
    fn disjunction_penalty_follows_balance(graph: ProblemGraph) {
        let model = standard_assembler(graph, ModelConfig::default())
            .with_standard_constraints()
            .expect("model");
        let penalties: Vec<(NodeIndex, i64)> = model
            .disjunctions()
            .iter()
            .map(|d| (d.node, d.penalty))
            .collect();
        assert_eq!(
            penalties,
            vec![(1, 50_000_000), (2, 50_000_000), (3, 0), (4, 0), (5, 0)]
        );
    }

    #[rstest]
    fn checkpoints_replace_payload_bound(graph: ProblemGraph) {
        let model = standard_assembler(graph, ModelConfig::default())
            .with_standard_constraints()
            .expect("model");
        let load = model.dimension(DimensionId::Load).expect("load dimension");
        assert!(matches!(
            load.soft_upper_bound(VisitRef::Node(3)),
            Some(SoftUpperBound {
                limit: BoundLimit::Payload(_),
                penalty: 20_000
            })
        ));
        assert_eq!(
            load.soft_upper_bound(VisitRef::Node(4)),
            Some(&SoftUpperBound {
                limit: BoundLimit::Fixed(0),
                penalty: 100_000
            })
        );
        assert!(load.soft_upper_bound(VisitRef::Node(DEPOT)).is_none());
        for vehicle in 0..2 {
            assert_eq!(
                load.soft_upper_bound(VisitRef::VehicleEnd(vehicle)),
                Some(&SoftUpperBound {
                    limit: BoundLimit::Fixed(0),
                    penalty: 10_000
                })
            );
        }
    }

    #[rstest]
    fn payload_allowance_credits_disembarking_passengers(graph: ProblemGraph) {
        let model = standard_assembler(graph, ModelConfig::default())
            .with_standard_constraints()
            .expect("model");
        let load = model.dimension(DimensionId::Load).expect("load dimension");
        let Some(SoftUpperBound {
            limit: BoundLimit::Payload(limit),
            ..
        }) = load.soft_upper_bound(VisitRef::Node(2))
        else {
            panic!("delivery should carry a payload bound");
        };
        assert_eq!(limit.allowance, -160);
        assert_eq!(limit.full_tank, 200);
        assert_eq!(limit.passenger_ceiling, 720);
    }

    #[rstest]
    fn slack_is_pinned_only_before_first_checkpoint(graph: ProblemGraph) {
        let model = standard_assembler(graph, ModelConfig::default())
            .with_standard_constraints()
            .expect("model");
        let reload_time = model
            .dimension(DimensionId::ReloadTime)
            .expect("reload time dimension");
        assert!((0..4).all(|node| reload_time.is_slack_pinned(node)));
        assert!(!reload_time.is_slack_pinned(4));
        assert_eq!(reload_time.slack_max_at(5), ModelConfig::default().horizon);
        let global_time = model
            .dimension(DimensionId::GlobalTime)
            .expect("global time dimension");
        assert!(!global_time.is_slack_pinned(1));
    }

    #[rstest]
    fn pairing_requires_global_time(graph: ProblemGraph) {
        let mut assembler = DimensionBuilder::new(graph, ModelConfig::default()).finish();
        let err = assembler
            .add_pickup_deliveries()
            .expect_err("no global time");
        assert_eq!(
            err,
            ModelDefinitionError::MissingDimension {
                dimension: DimensionId::GlobalTime,
                required_by: "pickup and delivery pairing"
            }
        );
    }

    #[rstest]
    fn drop_penalty_must_dominate(graph: ProblemGraph) {
        let config = ModelConfig {
            penalties: Penalties {
                drop: 1_000,
                ..Penalties::default()
            },
            ..ModelConfig::default()
        };
        let err = standard_assembler(graph, config)
            .with_standard_constraints()
            .expect_err("inverted penalties");
        assert!(matches!(err, ModelDefinitionError::PenaltyOrdering { drop: 1_000, .. }));
    }
}
