//! Model-wide constants: horizon, span costs and penalty weights.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ModelDefinitionError;

/// Cumulative ceiling used for tracks without a physical limit.
pub const DEFAULT_HORIZON: i64 = 10_007;

/// Penalty weights of the soft constraints.
///
/// Only their ordering matters: dropping a mandatory node must cost more than
/// any single unit of soft-bound excess, so the engine never trades a
/// passenger for payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Penalties {
    /// Cost of leaving a mandatory node unvisited.
    pub drop: i64,
    /// Cost per kilogram over the available payload.
    pub payload: i64,
    /// Cost per kilogram carried into a checkpoint.
    pub checkpoint_load: i64,
    /// Cost per kilogram still on board at the depot return.
    pub return_load: i64,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            drop: 50_000_000,
            payload: 20_000,
            checkpoint_load: 100_000,
            return_load: 10_000,
        }
    }
}

impl Penalties {
    /// Check that the drop penalty dominates every other weight.
    ///
    /// # Examples
    /// ```
    /// use sortie_core::Penalties;
    ///
    /// assert!(Penalties::default().validate().is_ok());
    /// let inverted = Penalties { drop: 10, ..Penalties::default() };
    /// assert!(inverted.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ModelDefinitionError> {
        let others = [
            ("payload", self.payload),
            ("checkpoint load", self.checkpoint_load),
            ("return load", self.return_load),
        ];
        match others.into_iter().find(|(_, value)| *value >= self.drop) {
            Some((other, value)) => Err(ModelDefinitionError::PenaltyOrdering {
                drop: self.drop,
                other,
                value,
            }),
            None => Ok(()),
        }
    }
}

/// Settings shared by the dimension builder and the constraint assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelConfig {
    /// Ceiling and slack ceiling of time and distance tracks.
    pub horizon: i64,
    /// Global span cost on the distance track.
    pub distance_span_cost: i64,
    /// Global span cost on the landing track.
    pub landing_span_cost: i64,
    /// Ceiling of the visit counter.
    pub visit_limit: i64,
    /// Soft-constraint weights.
    pub penalties: Penalties,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            distance_span_cost: 10,
            landing_span_cost: 10,
            visit_limit: 10_000_000,
            penalties: Penalties::default(),
        }
    }
}
