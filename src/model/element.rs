//! Beam elements connecting two nodes

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Stable arena index of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Raw arena index, useful for UI-side bookkeeping.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Material and section properties carried by an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementProperties {
    /// Modulus of elasticity
    pub e: f64,
    /// Second moment of area about the bending axis
    pub i: f64,
    /// Cross-sectional area
    pub a: f64,
}

impl ElementProperties {
    /// Create properties from raw values.
    pub fn new(e: f64, i: f64, a: f64) -> Self {
        Self { e, i, a }
    }

    /// Properties of a solid rectangular section of width `b` and depth `d`.
    pub fn rectangular(e: f64, b: f64, d: f64) -> Self {
        Self {
            e,
            i: b * d.powi(3) / 12.0,
            a: b * d,
        }
    }

    /// Combined bending stiffness E*I.
    pub fn ei(&self) -> f64 {
        self.e * self.i
    }
}

impl Default for ElementProperties {
    fn default() -> Self {
        // 200mm x 300mm steel rectangle
        Self::rectangular(200e9, 0.2, 0.3)
    }
}

/// A 2-node beam element.
///
/// Endpoint nodes must exist in the same model and must not coincide;
/// the length is derived from the node positions, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Start node
    pub start: NodeId,
    /// End node
    pub end: NodeId,
    /// Material/section properties
    pub props: ElementProperties,
}

impl Element {
    /// Create a new element.
    pub fn new(start: NodeId, end: NodeId, props: ElementProperties) -> Self {
        Self { start, end, props }
    }
}
