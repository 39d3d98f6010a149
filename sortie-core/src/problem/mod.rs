//! Problem graph and resource catalogue.
//!
//! [`ProblemData`] is the raw planning record; [`ProblemGraph`] is its
//! validated, immutable form that every dimension and constraint reads from.

mod data;
mod error;
mod graph;

pub use data::{AircraftProfile, LocationKey, ProblemData};
pub use error::ProblemError;
pub use graph::{DEPOT, DemandPair, Node, NodeIndex, ProblemGraph};
