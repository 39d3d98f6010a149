//! Narrow request/response seam to the routing engine.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assignment::Assignment;
use crate::evaluate::RouteViolation;
use crate::model::RoutingModel;

/// Heuristic building the first solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FirstSolutionStrategy {
    /// Extend each route with the cheapest arc from its last node.
    #[default]
    PathCheapestArc,
    /// Insert nodes where they add the least cost.
    CheapestInsertion,
    /// Let the engine pick.
    Automatic,
}

/// Improvement strategy run after the first solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LocalSearchMetaheuristic {
    /// Penalise features of local optima to escape them.
    #[default]
    GuidedLocalSearch,
    /// Accept worse moves with decreasing probability.
    SimulatedAnnealing,
    /// Forbid recently reverted moves.
    TabuSearch,
    /// Stop at the first local optimum.
    GreedyDescent,
}

/// Search parameters handed to [`RoutingEngine::solve`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use sortie_core::{FirstSolutionStrategy, SearchConfig};
///
/// let config = SearchConfig::default();
/// assert_eq!(config.first_solution, FirstSolutionStrategy::PathCheapestArc);
/// assert_eq!(config.time_limit, Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// First-solution heuristic.
    pub first_solution: FirstSolutionStrategy,
    /// Local-search strategy.
    pub metaheuristic: LocalSearchMetaheuristic,
    /// Wall-clock budget.
    pub time_limit: Duration,
    /// Optional cap on search iterations.
    pub max_generations: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            first_solution: FirstSolutionStrategy::default(),
            metaheuristic: LocalSearchMetaheuristic::default(),
            time_limit: Duration::from_secs(600),
            max_generations: None,
        }
    }
}

/// Errors returned by [`RoutingEngine::solve`] and the route evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// No assignment satisfies the hard constraints.
    #[error("no feasible assignment: {reason}")]
    Infeasible {
        /// First hard constraint found violated.
        reason: RouteViolation,
    },
    /// The routes do not describe a solution of the model.
    #[error("invalid routes: {reason}")]
    InvalidRoutes {
        /// What is malformed.
        reason: RouteViolation,
    },
    /// The engine itself failed.
    #[error("routing engine failed: {message}")]
    Backend {
        /// Engine-provided description.
        message: String,
    },
}

/// Find an assignment for an assembled model.
///
/// Implementations build their response through
/// [`RoutingModel::evaluate_routes`] so cumulative values, slack and arc costs
/// agree with the model. Engines must be `Send + Sync` to operate safely across
/// threads.
pub trait RoutingEngine: Send + Sync {
    /// Search for an assignment within the configured budget.
    fn solve(&self, model: &RoutingModel, config: &SearchConfig) -> Result<Assignment, SolveError>;
}
