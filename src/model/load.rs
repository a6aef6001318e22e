//! Load types
//!
//! Sign convention, fixed once and applied through every evaluator:
//! transverse loads are positive downward, concentrated moments positive
//! counter-clockwise, axial loads positive in +x (tensile when pulling on
//! a free right end).

use serde::{Deserialize, Serialize};

use super::{ElementId, NodeId};

/// Stable arena index of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(pub(crate) usize);

impl LoadId {
    /// Raw arena index, useful for UI-side bookkeeping.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A load applied to a node or an element.
///
/// Modeled as a sum type so every evaluator matches exhaustively; adding a
/// load kind is a compile error until each evaluator handles it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Load {
    /// Transverse point force at a node, positive downward.
    PointForce { node: NodeId, p: f64 },
    /// Axial point force at a node, positive in +x.
    AxialForce { node: NodeId, n: f64 },
    /// Concentrated moment at a node, positive counter-clockwise.
    PointMoment { node: NodeId, m: f64 },
    /// Transverse point force on an element at distance `a` from the
    /// element's start node, positive downward.
    ElementPointForce { element: ElementId, p: f64, a: f64 },
    /// Uniformly distributed transverse load over the whole element,
    /// intensity `w` positive downward.
    UniformLoad { element: ElementId, w: f64 },
}

impl Load {
    /// The node this load references, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Load::PointForce { node, .. }
            | Load::AxialForce { node, .. }
            | Load::PointMoment { node, .. } => Some(*node),
            Load::ElementPointForce { .. } | Load::UniformLoad { .. } => None,
        }
    }

    /// The element this load references, if any.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Load::ElementPointForce { element, .. } | Load::UniformLoad { element, .. } => {
                Some(*element)
            }
            Load::PointForce { .. } | Load::AxialForce { .. } | Load::PointMoment { .. } => None,
        }
    }

    /// The load magnitude, used for finiteness validation.
    pub(crate) fn magnitude(&self) -> f64 {
        match self {
            Load::PointForce { p, .. } => *p,
            Load::AxialForce { n, .. } => *n,
            Load::PointMoment { m, .. } => *m,
            Load::ElementPointForce { p, .. } => *p,
            Load::UniformLoad { w, .. } => *w,
        }
    }
}
