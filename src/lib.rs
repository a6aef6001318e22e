//! Beam Solver - a native Rust 2D structural analysis library
//!
//! Static linear-elastic analysis of beams and simple frames along a single
//! structural axis, supporting:
//! - Pin, roller and fixed supports
//! - Nodal forces and moments, member point and uniform loads
//! - Determinacy classification with a direct equilibrium path for
//!   determinate structures and a stiffness-method path otherwise
//! - Closed-form piecewise N(x), V(x), M(x) and double-integrated
//!   deflections w(x), theta(x)
//!
//! ## Example
//! ```rust
//! use beam_solver::prelude::*;
//!
//! let mut model = Model::new();
//!
//! // A 6 m simply supported beam
//! let a = model.add_node_with_support(0.0, Support::Pin);
//! let b = model.add_node_with_support(6.0, Support::Roller);
//! let beam = model.add_element(a, b, ElementProperties::default())?;
//!
//! // 10 kN down at midspan
//! model.add_load(Load::ElementPointForce {
//!     element: beam,
//!     p: 10.0e3,
//!     a: 3.0,
//! })?;
//!
//! let solution = model.solve()?;
//!
//! // Max moment is P*L/4 at midspan
//! let forces = &solution.element_result(beam).unwrap().forces;
//! assert!((forces.m_at(3.0) - 15.0e3).abs() < 1e-6);
//! # Ok::<(), SolverError>(())
//! ```

pub mod analysis;
pub mod error;
pub mod math;
pub mod model;
pub mod results;
pub mod templates;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{classify, solve, Classification};
    pub use crate::error::{SolverError, SolverResult};
    pub use crate::model::{
        Element, ElementId, ElementProperties, Load, LoadId, Model, Node, NodeId, Support,
    };
    pub use crate::results::{
        DeflectionDiagram, ElementResult, Extreme, ForceDiagram, Polynomial, Reaction, Solution,
        SolutionSummary,
    };
    pub use crate::templates::Template;
}
