//! Analysis pipeline
//!
//! `solve` runs validation, connectivity preparation, determinacy
//! classification, reaction solution (direct equilibrium for determinate
//! structures, the stiffness method otherwise), then a left-to-right
//! sectioning walk for internal forces and double integration of curvature
//! for deflections. Every call works on fresh storage; nothing is cached
//! between solves.

mod deflection;
mod determinacy;
mod diagrams;
mod equilibrium;
mod stiffness;

pub use determinacy::{classify, Classification};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{SolverError, SolverResult};
use crate::math::POSITION_TOL;
use crate::model::{ElementId, ElementProperties, Load, Model, NodeId, Support};
use crate::results::{ElementResult, Extreme, Solution, SolutionSummary};

/// Solve a model for reactions, internal forces and deflections.
pub fn solve(model: &Model) -> SolverResult<Solution> {
    model.validate()?;
    let structure = Structure::build(model)?;
    let classification = determinacy::classify_structure(&structure)?;
    log::debug!(
        "classified structure as {:?} across {} component(s)",
        classification,
        structure.components.len()
    );

    let reactions = match classification {
        Classification::Determinate => equilibrium::solve_reactions(&structure)?,
        Classification::Indeterminate { .. } => stiffness::solve_reactions(&structure)?,
    };
    log::debug!("solved {} support reaction(s)", reactions.len());

    let force_diagrams = diagrams::build(&structure, &reactions)?;
    let mut deflection_diagrams = deflection::build(&structure, &force_diagrams)?;

    let mut elements = Vec::with_capacity(force_diagrams.len());
    for (id, forces) in force_diagrams {
        let deflection = deflection_diagrams
            .remove(&id)
            .ok_or(SolverError::Singular)?;
        elements.push(ElementResult {
            element: id,
            forces,
            deflection,
        });
    }

    let summary = summarize(model, &elements);
    let solution = Solution {
        classification,
        reactions,
        elements,
        summary,
    };
    ensure_finite(&solution)?;
    Ok(solution)
}

/// An element normalized to run left-to-right along the structural axis,
/// with its member loads attached.
#[derive(Debug, Clone)]
pub(crate) struct Span {
    pub element: ElementId,
    /// Endpoint with the smaller axis coordinate
    pub left: NodeId,
    /// Endpoint with the larger axis coordinate
    pub right: NodeId,
    pub x_left: f64,
    pub x_right: f64,
    pub length: f64,
    pub props: ElementProperties,
    /// Net downward distributed intensity over the span
    pub w_sum: f64,
    /// Downward point forces as (offset from the left end, magnitude)
    pub point_forces: Vec<(f64, f64)>,
}

/// A connected group of nodes and spans.
#[derive(Debug, Clone, Default)]
pub(crate) struct Component {
    /// Member nodes, sorted by position
    pub nodes: Vec<NodeId>,
    /// Member spans, sorted left to right
    pub spans: Vec<Span>,
    /// Total reaction unknowns contributed by the member supports
    pub reaction_unknowns: usize,
}

/// Solver-side view of a model: connected components of left-normalized
/// spans, each tiling a stretch of the axis without overlap.
pub(crate) struct Structure<'a> {
    pub model: &'a Model,
    pub components: Vec<Component>,
}

impl<'a> Structure<'a> {
    /// Group the model into connected components and normalize every element
    /// into a left-to-right span. Overlapping spans within one component
    /// (parallel, stacked or branching elements) are rejected as
    /// `Unsupported` rather than mis-solved.
    pub fn build(model: &'a Model) -> SolverResult<Self> {
        let arena_len = model
            .nodes()
            .map(|(id, _)| id.index() + 1)
            .max()
            .unwrap_or(0);
        let mut sets = DisjointSets::new(arena_len);
        for (_, element) in model.elements() {
            sets.union(element.start.index(), element.end.index());
        }

        let mut spans: BTreeMap<ElementId, Span> = BTreeMap::new();
        for (id, element) in model.elements() {
            let start = model
                .node(element.start)
                .ok_or_else(|| SolverError::invalid(format!("element {id} references a missing node")))?;
            let end = model
                .node(element.end)
                .ok_or_else(|| SolverError::invalid(format!("element {id} references a missing node")))?;
            let (left, right, x_left, x_right) = if start.x <= end.x {
                (element.start, element.end, start.x, end.x)
            } else {
                (element.end, element.start, end.x, start.x)
            };
            spans.insert(
                id,
                Span {
                    element: id,
                    left,
                    right,
                    x_left,
                    x_right,
                    length: x_right - x_left,
                    props: element.props,
                    w_sum: 0.0,
                    point_forces: Vec::new(),
                },
            );
        }

        for (_, load) in model.loads() {
            match *load {
                Load::UniformLoad { element, w } => {
                    if let Some(span) = spans.get_mut(&element) {
                        span.w_sum += w;
                    }
                }
                Load::ElementPointForce { element, p, a } => {
                    let start = model.element(element).map(|e| e.start);
                    if let (Some(span), Some(start)) = (spans.get_mut(&element), start) {
                        // Load positions are given from the element's start
                        // node, which may be its right end
                        let offset = if span.left == start {
                            a
                        } else {
                            span.length - a
                        };
                        span.point_forces.push((offset.clamp(0.0, span.length), p));
                    }
                }
                Load::PointForce { .. } | Load::AxialForce { .. } | Load::PointMoment { .. } => {}
            }
        }

        let mut groups: BTreeMap<usize, Component> = BTreeMap::new();
        for (id, _) in model.nodes() {
            let root = sets.find(id.index());
            groups.entry(root).or_default().nodes.push(id);
        }
        for (_, span) in spans {
            let root = sets.find(span.left.index());
            groups.entry(root).or_default().spans.push(span);
        }

        for component in groups.values_mut() {
            component.nodes.sort_by(|a, b| {
                let xa = model.node(*a).map(|n| n.x).unwrap_or(0.0);
                let xb = model.node(*b).map(|n| n.x).unwrap_or(0.0);
                xa.partial_cmp(&xb).unwrap_or(Ordering::Equal).then(a.cmp(b))
            });
            component.spans.sort_by(|a, b| {
                a.x_left
                    .partial_cmp(&b.x_left)
                    .unwrap_or(Ordering::Equal)
                    .then(a.element.cmp(&b.element))
            });
            component.reaction_unknowns = component
                .nodes
                .iter()
                .filter_map(|&id| model.node(id))
                .map(|n| n.support.reaction_count())
                .sum();

            for pair in component.spans.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                if b.x_left < a.x_right - POSITION_TOL {
                    return Err(SolverError::Unsupported(format!(
                        "elements {} and {} overlap along the axis; \
                         parallel or branching members are not modeled",
                        a.element, b.element
                    )));
                }
                if b.x_left > a.x_right + POSITION_TOL {
                    return Err(SolverError::Unsupported(format!(
                        "elements {} and {} are connected but do not form a \
                         contiguous run along the axis",
                        a.element, b.element
                    )));
                }
            }
        }

        Ok(Self {
            model,
            components: groups.into_values().collect(),
        })
    }

    /// Axis position of a live node.
    pub(crate) fn node_x(&self, id: NodeId) -> f64 {
        self.model.node(id).map(|n| n.x).unwrap_or(f64::NAN)
    }

    /// Support condition of a live node.
    pub(crate) fn support(&self, id: NodeId) -> Support {
        self.model
            .node(id)
            .map(|n| n.support)
            .unwrap_or(Support::Free)
    }
}

/// Net applied nodal load at a node as (fx, fy, m) with fy positive upward
/// and m positive counter-clockwise. Element loads are not included.
pub(crate) fn nodal_resultant(model: &Model, node: NodeId) -> (f64, f64, f64) {
    let mut fx = 0.0;
    let mut fy = 0.0;
    let mut m = 0.0;
    for (_, load) in model.loads() {
        match *load {
            Load::PointForce { node: at, p } if at == node => fy -= p,
            Load::AxialForce { node: at, n } if at == node => fx += n,
            Load::PointMoment { node: at, m: moment } if at == node => m += moment,
            _ => {}
        }
    }
    (fx, fy, m)
}

fn summarize(model: &Model, elements: &[ElementResult]) -> SolutionSummary {
    let mut summary = SolutionSummary {
        num_nodes: model.node_count(),
        num_elements: model.element_count(),
        ..Default::default()
    };

    for result in elements {
        for seg in &result.forces.segments {
            let len = seg.x1 - seg.x0;
            for t in [0.0, len] {
                consider(&mut summary.max_shear, result.element, seg.x0 + t, seg.v.eval(t));
                consider(&mut summary.max_moment, result.element, seg.x0 + t, seg.m.eval(t));
            }
            // Interior moment extremum sits where the shear crosses zero
            let v = seg.v.coeffs();
            if v.len() > 1 && v[1] != 0.0 {
                let t = -v[0] / v[1];
                if t > 0.0 && t < len {
                    consider(&mut summary.max_moment, result.element, seg.x0 + t, seg.m.eval(t));
                }
            }
        }
        for (x, w) in result.deflection.sample_deflection(129) {
            consider(&mut summary.max_deflection, result.element, x, w);
        }
    }

    summary
}

fn consider(slot: &mut Option<Extreme>, element: ElementId, x: f64, value: f64) {
    let better = slot.map_or(true, |e| value.abs() > e.value.abs());
    if value.is_finite() && better {
        *slot = Some(Extreme { element, x, value });
    }
}

/// A success value must never carry NaN or infinity.
fn ensure_finite(solution: &Solution) -> SolverResult<()> {
    for r in &solution.reactions {
        if !(r.fx.is_finite() && r.fy.is_finite() && r.mz.is_finite()) {
            return Err(SolverError::Singular);
        }
    }
    for result in &solution.elements {
        let forces_ok = result
            .forces
            .segments
            .iter()
            .all(|s| s.n.is_finite() && s.v.is_finite() && s.m.is_finite());
        let deflection_ok = result
            .deflection
            .segments
            .iter()
            .all(|s| s.theta.is_finite() && s.w.is_finite());
        if !(forces_ok && deflection_ok) {
            return Err(SolverError::Singular);
        }
    }
    Ok(())
}

/// Union-find over the node arena.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn props() -> ElementProperties {
        ElementProperties::new(200e9, 4.5e-4, 0.06)
    }

    #[test]
    fn test_disjoint_beams_form_two_components() {
        let mut model = Model::new();
        let a = model.add_node_with_support(0.0, Support::Pin);
        let b = model.add_node_with_support(4.0, Support::Roller);
        let c = model.add_node_with_support(10.0, Support::Pin);
        let d = model.add_node_with_support(14.0, Support::Roller);
        model.add_element(a, b, props()).unwrap();
        model.add_element(c, d, props()).unwrap();

        let structure = Structure::build(&model).unwrap();
        assert_eq!(structure.components.len(), 2);
    }

    #[test]
    fn test_overlapping_elements_rejected() {
        let mut model = Model::new();
        let a = model.add_node_with_support(0.0, Support::Pin);
        let b = model.add_node(3.0);
        let c = model.add_node_with_support(6.0, Support::Roller);
        model.add_element(a, c, props()).unwrap();
        model.add_element(a, b, props()).unwrap();

        assert!(matches!(
            Structure::build(&model),
            Err(SolverError::Unsupported(_))
        ));
    }

    #[test]
    fn test_reversed_element_is_left_normalized() {
        let mut model = Model::new();
        let right = model.add_node_with_support(6.0, Support::Roller);
        let left = model.add_node_with_support(0.0, Support::Pin);
        let el = model.add_element(right, left, props()).unwrap();
        // Position given from the start node, which is the right end
        model
            .add_load(Load::ElementPointForce {
                element: el,
                p: 1000.0,
                a: 2.0,
            })
            .unwrap();

        let structure = Structure::build(&model).unwrap();
        let span = &structure.components[0].spans[0];
        assert_eq!(span.left, left);
        assert_relative_eq!(span.point_forces[0].0, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nodal_resultant_signs() {
        let mut model = Model::new();
        let a = model.add_node_with_support(0.0, Support::Fixed);
        model.add_load(Load::PointForce { node: a, p: 100.0 }).unwrap();
        model.add_load(Load::AxialForce { node: a, n: 50.0 }).unwrap();
        model.add_load(Load::PointMoment { node: a, m: 25.0 }).unwrap();

        let (fx, fy, m) = nodal_resultant(&model, a);
        assert_relative_eq!(fx, 50.0);
        assert_relative_eq!(fy, -100.0);
        assert_relative_eq!(m, 25.0);
    }
}
