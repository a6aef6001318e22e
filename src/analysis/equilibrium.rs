//! Direct equilibrium solution for determinate structures
//!
//! Each connected component of a determinate structure carries exactly
//! three reaction unknowns, solved from sum of forces in x, sum of forces
//! in y, and sum of moments. Distributed loads enter the global equations
//! through their resultants only; their distribution matters to the
//! internal force walk, not to the reactions.

use std::collections::BTreeMap;

use crate::error::{SolverError, SolverResult};
use crate::math::{Mat3, Vec3};
use crate::model::NodeId;
use crate::results::Reaction;

use super::{nodal_resultant, Component, Structure};

#[derive(Debug, Clone, Copy)]
enum Direction {
    Fx,
    Fy,
    Mz,
}

pub(crate) fn solve_reactions(structure: &Structure) -> SolverResult<Vec<Reaction>> {
    let mut reactions = Vec::new();
    for component in &structure.components {
        reactions.extend(solve_component(structure, component)?);
    }
    reactions.sort_by_key(|r| r.node);
    Ok(reactions)
}

fn solve_component(structure: &Structure, component: &Component) -> SolverResult<Vec<Reaction>> {
    // Unknown layout: nodes by position, then Fx, Fy, Mz per support
    let mut unknowns: Vec<(NodeId, Direction)> = Vec::with_capacity(3);
    for &node in &component.nodes {
        let support = structure.support(node);
        if support.restrains_axial() {
            unknowns.push((node, Direction::Fx));
        }
        if support.restrains_transverse() {
            unknowns.push((node, Direction::Fy));
        }
        if support.restrains_rotation() {
            unknowns.push((node, Direction::Mz));
        }
    }
    if unknowns.len() != 3 {
        return Err(SolverError::Singular);
    }

    // Moments are taken about the leftmost node
    let x0 = component
        .nodes
        .first()
        .map(|&n| structure.node_x(n))
        .unwrap_or(0.0);

    let mut a = Mat3::zeros();
    for (col, &(node, direction)) in unknowns.iter().enumerate() {
        let x = structure.node_x(node) - x0;
        match direction {
            Direction::Fx => a[(0, col)] = 1.0,
            Direction::Fy => {
                a[(1, col)] = 1.0;
                a[(2, col)] = x;
            }
            Direction::Mz => a[(2, col)] = 1.0,
        }
    }

    let mut fx = 0.0;
    let mut fy = 0.0;
    let mut m = 0.0;
    for &node in &component.nodes {
        let x = structure.node_x(node) - x0;
        let (nfx, nfy, nm) = nodal_resultant(structure.model, node);
        fx += nfx;
        fy += nfy;
        m += nm + x * nfy;
    }
    for span in &component.spans {
        let left = span.x_left - x0;
        let resultant = -span.w_sum * span.length;
        fy += resultant;
        m += resultant * (left + span.length / 2.0);
        for &(offset, p) in &span.point_forces {
            fy -= p;
            m -= p * (left + offset);
        }
    }

    // A counted-determinate component can still be a mechanism (for
    // example rollers only restrain transversely); that surfaces here as
    // a singular matrix
    let b = Vec3::new(-fx, -fy, -m);
    let solved = a.lu().solve(&b).ok_or(SolverError::Singular)?;
    if !solved.iter().all(|v| v.is_finite()) {
        return Err(SolverError::Singular);
    }

    let mut out: BTreeMap<NodeId, Reaction> = BTreeMap::new();
    for (k, &(node, direction)) in unknowns.iter().enumerate() {
        let r = out.entry(node).or_insert(Reaction {
            node,
            fx: 0.0,
            fy: 0.0,
            mz: 0.0,
        });
        match direction {
            Direction::Fx => r.fx = solved[k],
            Direction::Fy => r.fy = solved[k],
            Direction::Mz => r.mz = solved[k],
        }
    }
    Ok(out.into_values().collect())
}
