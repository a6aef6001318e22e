//! Support conditions

use serde::{Deserialize, Serialize};

/// Support condition at a node.
///
/// Each kind contributes a fixed number of reaction unknowns to the
/// determinacy count: pin 2, roller 1, fixed 3, free 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Support {
    /// No restraint
    #[default]
    Free,
    /// Restrains both translations, allows rotation
    Pin,
    /// Restrains transverse translation only
    Roller,
    /// Restrains both translations and rotation
    Fixed,
}

impl Support {
    /// Number of reaction unknowns this support contributes.
    pub fn reaction_count(&self) -> usize {
        match self {
            Support::Free => 0,
            Support::Pin => 2,
            Support::Roller => 1,
            Support::Fixed => 3,
        }
    }

    /// Whether axial (longitudinal) translation is restrained.
    pub fn restrains_axial(&self) -> bool {
        matches!(self, Support::Pin | Support::Fixed)
    }

    /// Whether transverse translation is restrained.
    pub fn restrains_transverse(&self) -> bool {
        matches!(self, Support::Pin | Support::Roller | Support::Fixed)
    }

    /// Whether rotation is restrained.
    pub fn restrains_rotation(&self) -> bool {
        matches!(self, Support::Fixed)
    }

    /// Whether any degree of freedom is restrained.
    pub fn is_support(&self) -> bool {
        !matches!(self, Support::Free)
    }
}
