//! Template library - canonical teaching structures
//!
//! Read-only catalog: each template builds a fresh, fully populated model.
//! Loading a template replaces the current model wholesale; there are no
//! merging semantics and the solver never consults templates mid-solve.

use serde::{Deserialize, Serialize};

use crate::model::{ElementProperties, Load, Model, Support};

/// Canonical span used by the templates.
const SPAN: f64 = 6.0;
/// Canonical point load magnitude (downward).
const POINT_LOAD: f64 = 10.0e3;
/// Canonical distributed load intensity (downward).
const UNIFORM_LOAD: f64 = 5.0e3;

/// Identifier of a pre-built canonical structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Template {
    /// Simply supported beam with a central point load
    SimpleBeamPointLoad,
    /// Simply supported beam with a full-span uniform load
    SimpleBeamUniformLoad,
    /// Cantilever with a tip point load
    CantileverTipLoad,
    /// Cantilever with a full-span uniform load
    CantileverUniformLoad,
    /// Overhanging beam with a point load at the overhang tip
    OverhangingBeam,
    /// Two-span continuous beam under uniform load (statically indeterminate)
    TwoSpanContinuous,
}

impl Template {
    /// All templates, in catalog order.
    pub fn all() -> [Template; 6] {
        [
            Template::SimpleBeamPointLoad,
            Template::SimpleBeamUniformLoad,
            Template::CantileverTipLoad,
            Template::CantileverUniformLoad,
            Template::OverhangingBeam,
            Template::TwoSpanContinuous,
        ]
    }

    /// Human-readable catalog label.
    pub fn label(&self) -> &'static str {
        match self {
            Template::SimpleBeamPointLoad => "Simply supported beam, central point load",
            Template::SimpleBeamUniformLoad => "Simply supported beam, uniform load",
            Template::CantileverTipLoad => "Cantilever, tip point load",
            Template::CantileverUniformLoad => "Cantilever, uniform load",
            Template::OverhangingBeam => "Overhanging beam, tip point load",
            Template::TwoSpanContinuous => "Two-span continuous beam, uniform load",
        }
    }

    /// Build the pre-populated model for this template.
    pub fn build(self) -> Model {
        let mut model = Model::new();
        let props = ElementProperties::default();

        match self {
            Template::SimpleBeamPointLoad => {
                let a = model.add_node_with_support(0.0, Support::Pin);
                let b = model.add_node_with_support(SPAN, Support::Roller);
                let el = model.insert_element(a, b, props);
                model.insert_load(Load::ElementPointForce {
                    element: el,
                    p: POINT_LOAD,
                    a: SPAN / 2.0,
                });
            }
            Template::SimpleBeamUniformLoad => {
                let a = model.add_node_with_support(0.0, Support::Pin);
                let b = model.add_node_with_support(SPAN, Support::Roller);
                let el = model.insert_element(a, b, props);
                model.insert_load(Load::UniformLoad {
                    element: el,
                    w: UNIFORM_LOAD,
                });
            }
            Template::CantileverTipLoad => {
                let a = model.add_node_with_support(0.0, Support::Fixed);
                let b = model.add_node(SPAN);
                model.insert_element(a, b, props);
                model.insert_load(Load::PointForce {
                    node: b,
                    p: POINT_LOAD,
                });
            }
            Template::CantileverUniformLoad => {
                let a = model.add_node_with_support(0.0, Support::Fixed);
                let b = model.add_node(SPAN);
                let el = model.insert_element(a, b, props);
                model.insert_load(Load::UniformLoad {
                    element: el,
                    w: UNIFORM_LOAD,
                });
            }
            Template::OverhangingBeam => {
                let a = model.add_node_with_support(0.0, Support::Pin);
                let b = model.add_node_with_support(SPAN * 2.0 / 3.0, Support::Roller);
                let c = model.add_node(SPAN);
                model.insert_element(a, b, props);
                model.insert_element(b, c, props);
                model.insert_load(Load::PointForce {
                    node: c,
                    p: POINT_LOAD,
                });
            }
            Template::TwoSpanContinuous => {
                let a = model.add_node_with_support(0.0, Support::Pin);
                let b = model.add_node_with_support(SPAN, Support::Roller);
                let c = model.add_node_with_support(SPAN * 2.0, Support::Roller);
                let left = model.insert_element(a, b, props);
                let right = model.insert_element(b, c, props);
                model.insert_load(Load::UniformLoad {
                    element: left,
                    w: UNIFORM_LOAD,
                });
                model.insert_load(Load::UniformLoad {
                    element: right,
                    w: UNIFORM_LOAD,
                });
            }
        }

        model.template = Some(self);
        model
    }
}

impl Model {
    /// Build a model from a template, replacing any current content.
    pub fn from_template(template: Template) -> Model {
        template.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_validate() {
        for template in Template::all() {
            let model = template.build();
            assert!(model.validate().is_ok(), "{:?} failed to validate", template);
            assert_eq!(model.template, Some(template));
        }
    }

    #[test]
    fn test_all_templates_solve() {
        for template in Template::all() {
            let model = Model::from_template(template);
            assert!(model.solve().is_ok(), "{:?} failed to solve", template);
        }
    }
}
