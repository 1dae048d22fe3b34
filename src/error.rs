// src/error.rs

use thiserror::Error;

/// Faults the allocation engine reports to its caller.
///
/// A capacity shortfall is not an error: it comes back as a normal
/// result with `feasible == false`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The scenario cannot be evaluated: bad quantity or horizon, or no
    /// supplier left after filtering.
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    /// A disruption overlay or allocation names a supplier the registry does not know.
    #[error("unknown supplier '{0}'")]
    UnknownSupplier(String),

    /// The LP backend failed for a reason other than modelled capacity infeasibility.
    #[error("solver failure ({backend}): {reason}")]
    SolverFailure { backend: String, reason: String },

    /// A supplier record failed validation while building the registry.
    #[error("invalid supplier '{name}': {reason}")]
    InvalidSupplier { name: String, reason: String },

    /// An allocation handed to the simulator breaks a capacity or sign constraint.
    #[error("invalid allocation for '{supplier}': {reason}")]
    InvalidAllocation { supplier: String, reason: String },
}
