//! Determinacy classification
//!
//! Counts reaction unknowns against the three planar equilibrium equations
//! available per connected component. The count decides the solution path
//! only; a structure that passes here can still turn out to be a mechanism
//! (for example three parallel rollers), which the numeric stage reports as
//! `Singular`.

use serde::{Deserialize, Serialize};

use super::Structure;
use crate::error::{SolverError, SolverResult};
use crate::model::Model;

/// Static determinacy of a solvable structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Reactions follow from equilibrium alone
    Determinate,
    /// Redundant supports; solved by the stiffness method
    Indeterminate {
        /// Degree of static indeterminacy, summed over components
        degree: usize,
    },
}

/// Classify a model without solving it.
pub fn classify(model: &Model) -> SolverResult<Classification> {
    model.validate()?;
    let structure = Structure::build(model)?;
    classify_structure(&structure)
}

pub(crate) fn classify_structure(structure: &Structure) -> SolverResult<Classification> {
    // An empty model has no component to count; it carries no support either
    if structure.components.is_empty() {
        return Err(SolverError::Kinematic {
            detail: "the model is empty".to_string(),
            nodes: Vec::new(),
        });
    }

    let mut degree = 0;
    for component in &structure.components {
        let unknowns = component.reaction_unknowns;
        if unknowns < 3 {
            let detail = if unknowns == 0 {
                "a connected part of the structure has no support".to_string()
            } else {
                format!(
                    "a connected part of the structure provides only {unknowns} reaction \
                     unknown(s) against 3 equilibrium equations"
                )
            };
            return Err(SolverError::Kinematic {
                detail,
                nodes: component.nodes.clone(),
            });
        }
        degree += unknowns - 3;
    }

    Ok(if degree == 0 {
        Classification::Determinate
    } else {
        Classification::Indeterminate { degree }
    })
}
