//! Facade crate for the Sortie flight-routing engine.
//!
//! This crate re-exports the core model types and exposes the search engine
//! behind the `solver-vrp` feature flag.

#![forbid(unsafe_code)]

pub use sortie_core::{
    Assignment, AircraftProfile, DEPOT, DemandPair, DimensionId, Itinerary, LocationKey,
    ModelConfig, ModelDefinitionError, NodeIndex, Penalties, ProblemData, ProblemError,
    ProblemGraph, Report, ReportColumns, ReportingError, RouteRecord, RouteViolation,
    RoutingEngine, RoutingModel, SearchConfig, SolveError, decode,
};

#[cfg(feature = "test-support")]
pub use sortie_core::test_support;

#[cfg(feature = "solver-vrp")]
pub use sortie_solver_vrp::{VrpEngine, VrpEngineConfig};
