//! Nodes - points along the structural axis

use serde::{Deserialize, Serialize};

use super::Support;

/// Stable arena index of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index, useful for UI-side bookkeeping.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A node on the structural axis.
///
/// Only the longitudinal coordinate is configuration; the transverse
/// position is a solve result (deflection), not model data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Position along the structural axis
    pub x: f64,
    /// Support condition at this node
    pub support: Support,
}

impl Node {
    /// Create an unsupported node at the given position.
    pub fn new(x: f64) -> Self {
        Self {
            x,
            support: Support::Free,
        }
    }

    /// Create a node with a support condition.
    pub fn with_support(x: f64, support: Support) -> Self {
        Self { x, support }
    }
}
