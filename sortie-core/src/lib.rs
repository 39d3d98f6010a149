//! Core model of the Sortie routing engine.
//!
//! Sortie plans pickup-and-delivery flights for a fleet of identical aircraft
//! that must stop at reload checkpoints. The crate builds the routing model
//! (resource dimensions, pairing and dropping constraints, soft payload
//! bounds), defines the [`RoutingEngine`] seam a search backend implements,
//! evaluates routes against the model and decodes assignments into
//! itineraries.
//!
//! Construction is staged: a [`ProblemGraph`] feeds a [`DimensionBuilder`],
//! whose [`finish`](DimensionBuilder::finish) yields the
//! [`ConstraintAssembler`] producing the final [`RoutingModel`].

#![forbid(unsafe_code)]

mod assignment;
mod engine;
mod evaluate;
pub mod model;
mod problem;
mod report;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use assignment::{Assignment, DimensionValues, VehicleRoute, Visit};
pub use engine::{
    FirstSolutionStrategy, LocalSearchMetaheuristic, RoutingEngine, SearchConfig, SolveError,
};
pub use evaluate::RouteViolation;
pub use model::{
    BoundLimit, ConstraintAssembler, DEFAULT_HORIZON, Dimension, DimensionBuilder, DimensionId,
    Dimensions, Disjunction, ModelConfig, ModelDefinitionError, PayloadLimit, Penalties,
    RoutingModel, SoftUpperBound, Transit, TransitRule, UnknownDimensionName, VisitRef,
};
pub use problem::{
    AircraftProfile, DEPOT, DemandPair, LocationKey, Node, NodeIndex, ProblemData, ProblemError,
    ProblemGraph,
};
pub use report::{Itinerary, Report, ReportColumns, ReportingError, RouteRecord, decode};
