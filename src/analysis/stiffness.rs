//! Stiffness-method solution for indeterminate structures
//!
//! Three degrees of freedom per node (axial u, transverse w positive
//! upward, rotation theta positive counter-clockwise). Spans are already
//! left-normalized, so local and global axes coincide and no rotation
//! transformation is needed. Member loads enter through fixed end
//! reactions; support reactions are recovered as R = K d - F at the
//! restrained degrees of freedom.

use std::collections::BTreeMap;

use crate::error::{SolverError, SolverResult};
use crate::math::{self, DVec, Mat};
use crate::model::NodeId;
use crate::results::Reaction;

use super::{nodal_resultant, Structure};

pub(crate) fn solve_reactions(structure: &Structure) -> SolverResult<Vec<Reaction>> {
    let model = structure.model;

    let mut base: BTreeMap<NodeId, usize> = BTreeMap::new();
    for (id, _) in model.nodes() {
        let next = base.len() * 3;
        base.insert(id, next);
    }
    let n_dofs = base.len() * 3;

    let mut k = Mat::zeros(n_dofs, n_dofs);
    let mut f = DVec::zeros(n_dofs);

    for (id, _) in model.nodes() {
        let b = base[&id];
        let (fx, fy, m) = nodal_resultant(model, id);
        f[b] += fx;
        f[b + 1] += fy;
        f[b + 2] += m;
    }

    for component in &structure.components {
        for span in &component.spans {
            let bi = base[&span.left];
            let bj = base[&span.right];
            let dofs = [bi, bi + 1, bi + 2, bj, bj + 1, bj + 2];

            let ke = math::beam_local_stiffness(
                span.props.e,
                span.props.i,
                span.props.a,
                span.length,
            );
            for (r, &dr) in dofs.iter().enumerate() {
                for (c, &dc) in dofs.iter().enumerate() {
                    k[(dr, dc)] += ke[(r, c)];
                }
            }

            // Member loads are downward in the model, upward-positive here
            let mut fer = math::fer_uniform_load(-span.w_sum, span.length);
            for &(offset, p) in &span.point_forces {
                fer += math::fer_point_load(-p, offset, span.length);
            }
            for (r, &dr) in dofs.iter().enumerate() {
                f[dr] -= fer[r];
            }
        }
    }

    let mut restrained = vec![false; n_dofs];
    for (id, node) in model.nodes() {
        let b = base[&id];
        if node.support.restrains_axial() {
            restrained[b] = true;
        }
        if node.support.restrains_transverse() {
            restrained[b + 1] = true;
        }
        if node.support.restrains_rotation() {
            restrained[b + 2] = true;
        }
    }
    let free: Vec<usize> = (0..n_dofs).filter(|&d| !restrained[d]).collect();

    let mut d_full = DVec::zeros(n_dofs);
    if !free.is_empty() {
        let mut k11 = Mat::zeros(free.len(), free.len());
        let mut f1 = DVec::zeros(free.len());
        for (r, &dr) in free.iter().enumerate() {
            f1[r] = f[dr];
            for (c, &dc) in free.iter().enumerate() {
                k11[(r, c)] = k[(dr, dc)];
            }
        }

        let d1 = math::solve_linear_system(&k11, &f1).ok_or(SolverError::Singular)?;
        if !d1.iter().all(|v| v.is_finite()) {
            return Err(SolverError::Singular);
        }
        // A near-singular partition can slip through LU with a tiny pivot;
        // an inconsistent load in a mechanism direction shows up here
        let residual = (&k11 * &d1 - &f1).norm();
        if residual > 1e-6 * f1.norm().max(1.0) {
            return Err(SolverError::Singular);
        }

        for (r, &dr) in free.iter().enumerate() {
            d_full[dr] = d1[r];
        }
    }

    let mut reactions = Vec::new();
    for (id, node) in model.nodes() {
        if !node.support.is_support() {
            continue;
        }
        let b = base[&id];
        let reaction_at = |dof: usize| (k.row(dof) * &d_full)[(0, 0)] - f[dof];

        let mut r = Reaction {
            node: id,
            fx: 0.0,
            fy: 0.0,
            mz: 0.0,
        };
        if node.support.restrains_axial() {
            r.fx = reaction_at(b);
        }
        if node.support.restrains_transverse() {
            r.fy = reaction_at(b + 1);
        }
        if node.support.restrains_rotation() {
            r.mz = reaction_at(b + 2);
        }
        reactions.push(r);
    }
    Ok(reactions)
}
