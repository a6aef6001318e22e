//! Internal force diagrams via a left-to-right sectioning walk
//!
//! With reactions known, every connected run of spans is walked from its
//! left end. Concentrated forces and moments (applied loads and reactions
//! alike) are step events; distributed load accumulates linearly into the
//! shear and quadratically into the moment between events. The walk must
//! return to zero at the right end of the run, which re-checks global
//! equilibrium of the reactions it was given.
//!
//! Sign conventions: N tension positive, V the sum of upward forces left
//! of the section, M sagging positive. A counter-clockwise concentrated
//! moment m steps the bending moment by -m.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{SolverError, SolverResult};
use crate::math::POSITION_TOL;
use crate::model::ElementId;
use crate::results::{ForceDiagram, ForceSegment, Polynomial, Reaction};

use super::{nodal_resultant, Component, Structure};

#[derive(Debug, Clone, Copy)]
struct Event {
    x: f64,
    /// Upward force step
    dv: f64,
    /// Axial (+x) force step
    dn: f64,
    /// Counter-clockwise moment step
    dm: f64,
}

/// Section state carried along the walk.
struct Walk {
    n: f64,
    v: f64,
    m: f64,
    next: usize,
}

impl Walk {
    fn apply_through(&mut self, events: &[Event], x: f64) {
        while self.next < events.len() && events[self.next].x <= x + POSITION_TOL {
            let e = events[self.next];
            self.v += e.dv;
            self.n -= e.dn;
            self.m -= e.dm;
            self.next += 1;
        }
    }
}

pub(crate) fn build(
    structure: &Structure,
    reactions: &[Reaction],
) -> SolverResult<BTreeMap<ElementId, ForceDiagram>> {
    let mut diagrams = BTreeMap::new();
    for component in &structure.components {
        if component.spans.is_empty() {
            continue;
        }
        walk_component(structure, component, reactions, &mut diagrams)?;
    }
    Ok(diagrams)
}

fn walk_component(
    structure: &Structure,
    component: &Component,
    reactions: &[Reaction],
    out: &mut BTreeMap<ElementId, ForceDiagram>,
) -> SolverResult<()> {
    let mut events: Vec<Event> = Vec::new();
    for &node in &component.nodes {
        let (fx, fy, m) = nodal_resultant(structure.model, node);
        let mut event = Event {
            x: structure.node_x(node),
            dv: fy,
            dn: fx,
            dm: m,
        };
        if let Some(r) = reactions.iter().find(|r| r.node == node) {
            event.dv += r.fy;
            event.dn += r.fx;
            event.dm += r.mz;
        }
        if event.dv != 0.0 || event.dn != 0.0 || event.dm != 0.0 {
            events.push(event);
        }
    }
    for span in &component.spans {
        for &(offset, p) in &span.point_forces {
            events.push(Event {
                x: span.x_left + offset,
                dv: -p,
                dn: 0.0,
                dm: 0.0,
            });
        }
    }
    events.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

    let first_x = component.spans[0].x_left;
    let mut walk = Walk {
        n: 0.0,
        v: 0.0,
        m: 0.0,
        next: 0,
    };
    walk.apply_through(&events, first_x);

    for span in &component.spans {
        let w = span.w_sum;
        let mut segments = Vec::new();
        let mut cursor = span.x_left;

        while cursor < span.x_right - POSITION_TOL {
            let mut boundary = span.x_right;
            if let Some(event) = events.get(walk.next) {
                if event.x < span.x_right - POSITION_TOL {
                    boundary = event.x.max(cursor);
                }
            }

            let dx = boundary - cursor;
            if dx > POSITION_TOL {
                segments.push(ForceSegment {
                    x0: cursor - span.x_left,
                    x1: boundary - span.x_left,
                    n: Polynomial::constant(walk.n),
                    v: Polynomial::new(vec![walk.v, -w]),
                    m: Polynomial::new(vec![walk.m, walk.v, -w / 2.0]),
                });
                // Moment first: it integrates the pre-step shear
                walk.m += walk.v * dx - w * dx * dx / 2.0;
                walk.v -= w * dx;
            }
            cursor = boundary;
            if cursor < span.x_right - POSITION_TOL {
                walk.apply_through(&events, cursor);
            }
        }

        out.insert(
            span.element,
            ForceDiagram {
                element: span.element,
                length: span.length,
                segments,
            },
        );
        walk.apply_through(&events, span.x_right);
    }

    // The section state must close to zero past the last span
    let mut scale = 0.0;
    for e in &events {
        scale += e.dv.abs() + e.dn.abs() + e.dm.abs();
    }
    for span in &component.spans {
        scale += span.w_sum.abs() * span.length;
    }
    let total = component
        .spans
        .last()
        .map(|s| s.x_right - first_x)
        .unwrap_or(0.0);
    let tol = 1e-6 * (1.0 + scale * (1.0 + total));
    if walk.n.abs() > tol || walk.v.abs() > tol || walk.m.abs() > tol {
        log::warn!(
            "section walk failed to close (N {:.3e}, V {:.3e}, M {:.3e})",
            walk.n,
            walk.v,
            walk.m
        );
        return Err(SolverError::Singular);
    }

    Ok(())
}
