//! Error types for the beam solver

use thiserror::Error;

use crate::model::NodeId;

/// Main error type for solver operations.
///
/// Every failure is returned as a value of one of these kinds; numeric
/// results are never allowed to carry NaN or infinity into a success value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Referential integrity or input validation failure, detected before
    /// any numeric work. Always recoverable by correcting the edit.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Under-constrained or disconnected-from-support structure. Carries the
    /// node ids of the offending sub-structure so a UI can highlight it.
    #[error("unstable structure: {detail}")]
    Kinematic { detail: String, nodes: Vec<NodeId> },

    /// The assembled system is singular (or fails an internal consistency
    /// check) despite passing the determinacy classification.
    #[error("singular system matrix - structure may be unstable despite passing the determinacy check")]
    Singular,

    /// A modeled feature falls outside the supported scope and is rejected
    /// rather than silently mis-solved.
    #[error("unsupported feature: {0}")]
    Unsupported(String),
}

impl SolverError {
    /// Shorthand for an `InvalidModel` error.
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SolverError::InvalidModel(msg.into())
    }
}

/// Result type for solver operations
pub type SolverResult<T> = Result<T, SolverError>;
