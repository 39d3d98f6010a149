//! `VrpEngine` implementation backed by `vrp-core`.

use std::time::Instant;

use log::info;
use sortie_core::{Assignment, RoutingEngine, RoutingModel, SearchConfig, SolveError};

use crate::reload::insert_checkpoints;
use crate::repair::evaluate_best_effort;
use crate::vrp::VrpSolveContext;

/// Configuration for [`VrpEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrpEngineConfig {
    /// Upper bound on `vrp-core` generations when the search configuration
    /// sets none.
    pub max_generations: usize,
}

impl Default for VrpEngineConfig {
    fn default() -> Self {
        Self {
            max_generations: 50,
        }
    }
}

/// Native engine using `vrp-core` to search for low-cost flight plans.
///
/// # Examples
///
/// ```no_run
/// use sortie_core::{RoutingEngine, RoutingModel, SearchConfig, SolveError};
/// use sortie_solver_vrp::VrpEngine;
///
/// fn plan(model: &RoutingModel) -> Result<i64, SolveError> {
///     let assignment = VrpEngine::new().solve(model, &SearchConfig::default())?;
///     Ok(assignment.objective)
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpEngine {
    config: VrpEngineConfig,
}

impl VrpEngine {
    /// Construct an engine using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VrpEngineConfig::default())
    }

    /// Construct an engine with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpEngineConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpEngineConfig {
        &self.config
    }
}

impl RoutingEngine for VrpEngine {
    fn solve(&self, model: &RoutingModel, config: &SearchConfig) -> Result<Assignment, SolveError> {
        let started_at = Instant::now();
        let mut routes = VrpSolveContext::new(&self.config).solve(model, config)?;
        insert_checkpoints(model, &mut routes);

        let assignment = evaluate_best_effort(model, &mut routes)?;
        info!(
            "vrp engine finished in {:?}: {} of {} aircraft used, makespan {}, objective {}",
            started_at.elapsed(),
            assignment.routes.iter().filter(|route| route.is_used()).count(),
            assignment.routes.len(),
            assignment.total_makespan(),
            assignment.objective
        );
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests;
