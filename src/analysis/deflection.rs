//! Deflection by double integration of curvature
//!
//! Within one connected run the bending moment is already known piecewise,
//! so curvature integrates segment by segment in closed form. That leaves
//! two constants per span, the deflection and rotation at its left end,
//! fixed by continuity at interior junctions and by the support conditions
//! (w = 0 at pins and rollers, w = 0 and theta = 0 at fixed ends).
//!
//! With deflection positive downward and moment sagging positive the
//! governing relation is w'' = -M / EI.

use std::collections::BTreeMap;

use crate::error::{SolverError, SolverResult};
use crate::math::{self, DVec, Mat};
use crate::model::ElementId;
use crate::results::{DeflectionDiagram, DeflectionSegment, ForceDiagram, Polynomial};

use super::{Component, Span, Structure};

/// Particular integrals over one span, zero-valued at the span's left end.
struct SpanIntegration {
    /// Per segment: (start offset, length, theta particular, w particular)
    segments: Vec<(f64, f64, Polynomial, Polynomial)>,
    theta_end: f64,
    w_end: f64,
}

fn integrate_span(span: &Span, diagram: &ForceDiagram) -> SpanIntegration {
    let ei = span.props.ei();
    let mut segments = Vec::with_capacity(diagram.segments.len());
    let mut theta0 = 0.0;
    let mut w0 = 0.0;
    for seg in &diagram.segments {
        let len = seg.x1 - seg.x0;
        let theta = seg.m.scaled(-1.0 / ei).integral(theta0);
        let w = theta.integral(w0);
        theta0 = theta.eval(len);
        w0 = w.eval(len);
        segments.push((seg.x0, len, theta, w));
    }
    SpanIntegration {
        segments,
        theta_end: theta0,
        w_end: w0,
    }
}

pub(crate) fn build(
    structure: &Structure,
    forces: &BTreeMap<ElementId, ForceDiagram>,
) -> SolverResult<BTreeMap<ElementId, DeflectionDiagram>> {
    let mut out = BTreeMap::new();
    for component in &structure.components {
        if component.spans.is_empty() {
            continue;
        }
        solve_component(structure, component, forces, &mut out)?;
    }
    Ok(out)
}

fn solve_component(
    structure: &Structure,
    component: &Component,
    forces: &BTreeMap<ElementId, ForceDiagram>,
    out: &mut BTreeMap<ElementId, DeflectionDiagram>,
) -> SolverResult<()> {
    let spans = &component.spans;
    let count = spans.len();

    let mut integrations = Vec::with_capacity(count);
    for span in spans {
        let diagram = forces.get(&span.element).ok_or(SolverError::Singular)?;
        integrations.push(integrate_span(span, diagram));
    }

    // Unknown layout: (w, theta) at the left end of each span. Sparse rows
    // as (column, coefficient) pairs with their right-hand side.
    let mut rows: Vec<(Vec<(usize, f64)>, f64)> = Vec::new();

    for k in 0..count.saturating_sub(1) {
        let len = spans[k].length;
        rows.push((
            vec![(2 * k, 1.0), (2 * k + 1, len), (2 * (k + 1), -1.0)],
            -integrations[k].w_end,
        ));
        rows.push((
            vec![(2 * k + 1, 1.0), (2 * (k + 1) + 1, -1.0)],
            -integrations[k].theta_end,
        ));
    }

    for &node in &component.nodes {
        let support = structure.support(node);
        if !support.is_support() {
            continue;
        }
        if let Some(k) = spans.iter().position(|sp| sp.left == node) {
            if support.restrains_transverse() {
                rows.push((vec![(2 * k, 1.0)], 0.0));
            }
            if support.restrains_rotation() {
                rows.push((vec![(2 * k + 1, 1.0)], 0.0));
            }
        } else if let Some(k) = spans.iter().position(|sp| sp.right == node) {
            let len = spans[k].length;
            if support.restrains_transverse() {
                rows.push((
                    vec![(2 * k, 1.0), (2 * k + 1, len)],
                    -integrations[k].w_end,
                ));
            }
            if support.restrains_rotation() {
                rows.push((vec![(2 * k + 1, 1.0)], -integrations[k].theta_end));
            }
        }
    }

    let unknowns = 2 * count;
    if rows.len() < unknowns {
        return Err(SolverError::Singular);
    }

    let mut a = Mat::zeros(rows.len(), unknowns);
    let mut b = DVec::zeros(rows.len());
    for (r, (entries, rhs)) in rows.iter().enumerate() {
        for &(c, coeff) in entries {
            a[(r, c)] += coeff;
        }
        b[r] = *rhs;
    }

    let constants = if rows.len() == unknowns {
        math::solve_linear_system(&a, &b).ok_or(SolverError::Singular)?
    } else {
        // Redundant supports overdetermine the constants; the system is
        // consistent exactly when the moment field honored compatibility
        let u = math::solve_least_squares(&a, &b).ok_or(SolverError::Singular)?;
        let residual = (&a * &u - &b).norm();
        if residual > 1e-6 * (1.0 + b.norm()) {
            log::warn!("deflection constants inconsistent (residual {residual:.3e})");
            return Err(SolverError::Singular);
        }
        u
    };
    if !constants.iter().all(|v| v.is_finite()) {
        return Err(SolverError::Singular);
    }

    for (k, span) in spans.iter().enumerate() {
        let w0 = constants[2 * k];
        let theta0 = constants[2 * k + 1];
        let mut segments = Vec::with_capacity(integrations[k].segments.len());
        for (s0, len, theta_p, w_p) in &integrations[k].segments {
            let theta = theta_p.plus(&Polynomial::constant(theta0));
            let w = w_p.plus(&Polynomial::new(vec![w0 + theta0 * s0, theta0]));
            segments.push(DeflectionSegment {
                x0: *s0,
                x1: *s0 + *len,
                theta,
                w,
            });
        }
        out.insert(
            span.element,
            DeflectionDiagram {
                element: span.element,
                length: span.length,
                segments,
            },
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::{diagrams, equilibrium, stiffness};
    use super::*;
    use crate::model::{ElementProperties, Load, Model, Support};
    use approx::assert_relative_eq;

    fn props() -> ElementProperties {
        // EI = 9.0e7
        ElementProperties::new(200e9, 4.5e-4, 0.06)
    }

    fn deflection_for(model: &Model, el: ElementId, determinate: bool) -> DeflectionDiagram {
        let structure = Structure::build(model).unwrap();
        let reactions = if determinate {
            equilibrium::solve_reactions(&structure).unwrap()
        } else {
            stiffness::solve_reactions(&structure).unwrap()
        };
        let forces = diagrams::build(&structure, &reactions).unwrap();
        build(&structure, &forces).unwrap().remove(&el).unwrap()
    }

    #[test]
    fn test_simple_beam_midspan_sag() {
        let mut model = Model::new();
        let a = model.add_node_with_support(0.0, Support::Pin);
        let b = model.add_node_with_support(6.0, Support::Roller);
        let el = model.add_element(a, b, props()).unwrap();
        model
            .add_load(Load::ElementPointForce {
                element: el,
                p: 10.0e3,
                a: 3.0,
            })
            .unwrap();

        let diagram = deflection_for(&model, el, true);
        let expected = 10.0e3 * 6.0_f64.powi(3) / (48.0 * 9.0e7);
        assert_relative_eq!(diagram.w_at(3.0), expected, max_relative = 1e-9);
        // Support conditions hold exactly
        assert_relative_eq!(diagram.w_at(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(diagram.w_at(6.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cantilever_tip_sag() {
        let mut model = Model::new();
        let a = model.add_node_with_support(0.0, Support::Fixed);
        let b = model.add_node(4.0);
        let el = model.add_element(a, b, props()).unwrap();
        model.add_load(Load::PointForce { node: b, p: 2.0e3 }).unwrap();

        let diagram = deflection_for(&model, el, true);
        let expected = 2.0e3 * 4.0_f64.powi(3) / (3.0 * 9.0e7);
        assert_relative_eq!(diagram.w_at(4.0), expected, max_relative = 1e-9);
        assert_relative_eq!(diagram.w_at(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(diagram.theta_at(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_simple_beam_uniform_load_sag() {
        let mut model = Model::new();
        let a = model.add_node_with_support(0.0, Support::Pin);
        let b = model.add_node_with_support(6.0, Support::Roller);
        let el = model.add_element(a, b, props()).unwrap();
        model
            .add_load(Load::UniformLoad {
                element: el,
                w: 5.0e3,
            })
            .unwrap();

        let diagram = deflection_for(&model, el, true);
        // 5 w L^4 / (384 EI)
        let expected = 5.0 * 5.0e3 * 6.0_f64.powi(4) / (384.0 * 9.0e7);
        assert_relative_eq!(diagram.w_at(3.0), expected, max_relative = 1e-9);
    }

    #[test]
    fn test_propped_cantilever_boundaries() {
        let mut model = Model::new();
        let a = model.add_node_with_support(0.0, Support::Fixed);
        let b = model.add_node_with_support(4.0, Support::Roller);
        let el = model.add_element(a, b, props()).unwrap();
        model
            .add_load(Load::UniformLoad {
                element: el,
                w: 1.0e3,
            })
            .unwrap();

        // Overdetermined constant system, consistent because the moment
        // field came from the compatible stiffness solution
        let diagram = deflection_for(&model, el, false);
        assert_relative_eq!(diagram.w_at(0.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(diagram.theta_at(0.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(diagram.w_at(4.0), 0.0, epsilon = 1e-9);
        // Sags between the supports
        assert!(diagram.w_at(2.0) > 0.0);
    }
}
