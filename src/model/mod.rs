//! Structural model - nodes, elements, supports, loads
//!
//! Arena storage with integer-index ids: nodes, elements and loads live in
//! flat `Vec` slots and reference each other by index, so deleting a node
//! cascades cleanly without shared mutable pointers. The solver treats the
//! model as a fresh input on every call; no solver state is cached here.

mod element;
mod load;
mod node;
mod support;

pub use element::{Element, ElementId, ElementProperties};
pub use load::{Load, LoadId};
pub use node::{Node, NodeId};
pub use support::Support;

use serde::{Deserialize, Serialize};

use crate::analysis;
use crate::error::{SolverError, SolverResult};
use crate::math::POSITION_TOL;
use crate::results::Solution;
use crate::templates::Template;

/// The editable structural model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    nodes: Vec<Option<Node>>,
    elements: Vec<Option<Element>>,
    loads: Vec<Option<Load>>,
    /// Template this model was built from, if any
    pub template: Option<Template>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add an unsupported node at the given position.
    pub fn add_node(&mut self, x: f64) -> NodeId {
        self.nodes.push(Some(Node::new(x)));
        NodeId(self.nodes.len() - 1)
    }

    /// Add a node with a support condition.
    pub fn add_node_with_support(&mut self, x: f64, support: Support) -> NodeId {
        self.nodes.push(Some(Node::with_support(x, support)));
        NodeId(self.nodes.len() - 1)
    }

    /// Change the support condition of an existing node.
    pub fn set_support(&mut self, node: NodeId, support: Support) -> SolverResult<()> {
        match self.nodes.get_mut(node.0).and_then(Option::as_mut) {
            Some(n) => {
                n.support = support;
                Ok(())
            }
            None => Err(SolverError::invalid(format!("node {node} does not exist"))),
        }
    }

    /// Move an existing node along the structural axis.
    pub fn set_node_position(&mut self, node: NodeId, x: f64) -> SolverResult<()> {
        match self.nodes.get_mut(node.0).and_then(Option::as_mut) {
            Some(n) => {
                n.x = x;
                Ok(())
            }
            None => Err(SolverError::invalid(format!("node {node} does not exist"))),
        }
    }

    /// Add an element between two existing, distinct nodes.
    pub fn add_element(
        &mut self,
        start: NodeId,
        end: NodeId,
        props: ElementProperties,
    ) -> SolverResult<ElementId> {
        let start_node = self
            .node(start)
            .ok_or_else(|| SolverError::invalid(format!("node {start} does not exist")))?;
        let end_node = self
            .node(end)
            .ok_or_else(|| SolverError::invalid(format!("node {end} does not exist")))?;
        if start == end {
            return Err(SolverError::invalid(format!(
                "element endpoints must be distinct nodes (both are {start})"
            )));
        }
        if (end_node.x - start_node.x).abs() < POSITION_TOL {
            return Err(SolverError::invalid(format!(
                "element between {start} and {end} has zero length"
            )));
        }

        Ok(self.insert_element(start, end, props))
    }

    /// Insert an element without endpoint checks. For callers whose
    /// geometry is static and valid by construction; `validate` still
    /// covers every solve input.
    pub(crate) fn insert_element(
        &mut self,
        start: NodeId,
        end: NodeId,
        props: ElementProperties,
    ) -> ElementId {
        self.elements.push(Some(Element::new(start, end, props)));
        ElementId(self.elements.len() - 1)
    }

    /// Add a load. The referenced node or element must exist, and element
    /// point loads must sit within the element's length.
    pub fn add_load(&mut self, load: Load) -> SolverResult<LoadId> {
        if let Some(node) = load.node() {
            if self.node(node).is_none() {
                return Err(SolverError::invalid(format!("node {node} does not exist")));
            }
        }
        if let Some(element) = load.element() {
            let length = self.element_length(element).ok_or_else(|| {
                SolverError::invalid(format!("element {element} does not exist"))
            })?;
            if let Load::ElementPointForce { a, .. } = load {
                if !(0.0..=length + POSITION_TOL).contains(&a) {
                    return Err(SolverError::invalid(format!(
                        "load position {a} lies outside element {element} (length {length})"
                    )));
                }
            }
        }

        Ok(self.insert_load(load))
    }

    /// Insert a load without reference checks; see [`Model::insert_element`].
    pub(crate) fn insert_load(&mut self, load: Load) -> LoadId {
        self.loads.push(Some(load));
        LoadId(self.loads.len() - 1)
    }

    /// Remove a load.
    pub fn remove_load(&mut self, load: LoadId) {
        if let Some(slot) = self.loads.get_mut(load.0) {
            *slot = None;
        }
    }

    /// Remove an element, cascading removal of its loads.
    pub fn remove_element(&mut self, element: ElementId) {
        if let Some(slot) = self.elements.get_mut(element.0) {
            *slot = None;
        }
        for slot in &mut self.loads {
            if slot.and_then(|l| l.element()) == Some(element) {
                *slot = None;
            }
        }
    }

    /// Remove a node, cascading removal of incident elements and of loads
    /// referencing the node or those elements.
    pub fn remove_node(&mut self, node: NodeId) {
        if let Some(slot) = self.nodes.get_mut(node.0) {
            *slot = None;
        }

        let incident: Vec<ElementId> = self
            .elements()
            .filter(|(_, e)| e.start == node || e.end == node)
            .map(|(id, _)| id)
            .collect();
        for element in incident {
            self.remove_element(element);
        }

        for slot in &mut self.loads {
            if slot.and_then(|l| l.node()) == Some(node) {
                *slot = None;
            }
        }
    }

    // ========================
    // Access Methods
    // ========================

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Look up an element.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0).and_then(Option::as_ref)
    }

    /// Derived length of an element.
    pub fn element_length(&self, id: ElementId) -> Option<f64> {
        let element = self.element(id)?;
        let start = self.node(element.start)?;
        let end = self.node(element.end)?;
        Some((end.x - start.x).abs())
    }

    /// Iterate over live nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId(i), n)))
    }

    /// Iterate over live elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (ElementId(i), e)))
    }

    /// Iterate over live loads in id order.
    pub fn loads(&self) -> impl Iterator<Item = (LoadId, &Load)> {
        self.loads
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|l| (LoadId(i), l)))
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Number of live elements.
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    // ========================
    // Validation and Solving
    // ========================

    /// Validate referential integrity and numeric sanity of the model.
    ///
    /// Runs before any numeric work; a failure here is always recoverable
    /// by correcting the offending edit.
    pub fn validate(&self) -> SolverResult<()> {
        for (id, node) in self.nodes() {
            if !node.x.is_finite() {
                return Err(SolverError::invalid(format!(
                    "node {id} has a non-finite position"
                )));
            }
        }

        for (id, element) in self.elements() {
            let start = self.node(element.start).ok_or_else(|| {
                SolverError::invalid(format!(
                    "element {id} references missing node {}",
                    element.start
                ))
            })?;
            let end = self.node(element.end).ok_or_else(|| {
                SolverError::invalid(format!(
                    "element {id} references missing node {}",
                    element.end
                ))
            })?;
            if element.start == element.end || (end.x - start.x).abs() < POSITION_TOL {
                return Err(SolverError::invalid(format!("element {id} has zero length")));
            }

            let props = element.props;
            if !(props.e.is_finite() && props.i.is_finite() && props.a.is_finite()) {
                return Err(SolverError::invalid(format!(
                    "element {id} has non-finite properties"
                )));
            }
            if props.e <= 0.0 || props.i <= 0.0 || props.a <= 0.0 {
                return Err(SolverError::invalid(format!(
                    "element {id} requires positive E, I and A"
                )));
            }
        }

        for (id, load) in self.loads() {
            if !load.magnitude().is_finite() {
                return Err(SolverError::invalid(format!(
                    "load {} has a non-finite magnitude",
                    id.0
                )));
            }
            if let Some(node) = load.node() {
                if self.node(node).is_none() {
                    return Err(SolverError::invalid(format!(
                        "load {} references missing node {node}",
                        id.0
                    )));
                }
            }
            if let Some(element) = load.element() {
                let length = self.element_length(element).ok_or_else(|| {
                    SolverError::invalid(format!(
                        "load {} references missing element {element}",
                        id.0
                    ))
                })?;
                if let Load::ElementPointForce { a, .. } = load {
                    if !(0.0..=length + POSITION_TOL).contains(a) {
                        return Err(SolverError::invalid(format!(
                            "load {} lies outside element {element} (position {a}, length {length})",
                            id.0
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Solve the model for reactions, internal forces and deflections.
    ///
    /// Pure function of the model: fresh working storage per call, identical
    /// inputs produce identical outputs.
    pub fn solve(&self) -> SolverResult<Solution> {
        analysis::solve(self)
    }
}
