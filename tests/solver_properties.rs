//! Structural properties the solver must hold for any accepted model:
//! equilibrium closure, diagram continuity, boundary satisfaction,
//! the determinacy gate and solve idempotence.

use approx::assert_relative_eq;
use beam_solver::prelude::*;

fn props() -> ElementProperties {
    ElementProperties::new(200e9, 4.5e-4, 0.06)
}

/// Global position of an element's left end and its axis direction sign.
fn element_frame(model: &Model, element: ElementId) -> (f64, f64) {
    let el = model.element(element).unwrap();
    let start = model.node(el.start).unwrap().x;
    let end = model.node(el.end).unwrap().x;
    (start.min(end), if end >= start { 1.0 } else { -1.0 })
}

/// Reactions plus applied loads must cancel in both force directions and
/// in moment about the origin.
fn assert_equilibrium(model: &Model, solution: &Solution) {
    let mut fx = 0.0;
    let mut fy = 0.0;
    let mut m = 0.0;

    for r in &solution.reactions {
        let x = model.node(r.node).unwrap().x;
        fx += r.fx;
        fy += r.fy;
        m += r.mz + x * r.fy;
    }

    for (_, load) in model.loads() {
        match *load {
            Load::PointForce { node, p } => {
                let x = model.node(node).unwrap().x;
                fy -= p;
                m -= x * p;
            }
            Load::AxialForce { n, .. } => fx += n,
            Load::PointMoment { m: moment, .. } => m += moment,
            Load::ElementPointForce { element, p, a } => {
                let el = model.element(element).unwrap();
                let start = model.node(el.start).unwrap().x;
                let end = model.node(el.end).unwrap().x;
                let x = start + a * if end >= start { 1.0 } else { -1.0 };
                fy -= p;
                m -= x * p;
            }
            Load::UniformLoad { element, w } => {
                let (left, _) = element_frame(model, element);
                let length = model.element_length(element).unwrap();
                fy -= w * length;
                m -= w * length * (left + length / 2.0);
            }
        }
    }

    assert_relative_eq!(fx, 0.0, epsilon = 1e-6);
    assert_relative_eq!(fy, 0.0, epsilon = 1e-6);
    assert_relative_eq!(m, 0.0, epsilon = 1e-5);
}

/// Deflection honors every support: w = 0 where translation is restrained,
/// theta = 0 where rotation is.
fn assert_boundaries(model: &Model, solution: &Solution) {
    for (id, el) in model.elements() {
        let (left, _) = element_frame(model, id);
        let deflection = &solution.element_result(id).unwrap().deflection;
        for node_id in [el.start, el.end] {
            let node = model.node(node_id).unwrap();
            let local = node.x - left;
            if node.support.restrains_transverse() {
                assert_relative_eq!(deflection.w_at(local), 0.0, epsilon = 1e-9);
            }
            if node.support.restrains_rotation() {
                assert_relative_eq!(deflection.theta_at(local), 0.0, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn templates_close_equilibrium_and_satisfy_boundaries() {
    for template in Template::all() {
        let model = Model::from_template(template);
        let solution = model.solve().unwrap();
        assert_equilibrium(&model, &solution);
        assert_boundaries(&model, &solution);
    }
}

#[test]
fn mixed_loading_closes_equilibrium() {
    let mut model = Model::new();
    let a = model.add_node_with_support(0.0, Support::Pin);
    let b = model.add_node(3.0);
    let c = model.add_node_with_support(7.0, Support::Roller);
    let left = model.add_element(a, b, props()).unwrap();
    let right = model.add_element(b, c, props()).unwrap();

    model.add_load(Load::PointForce { node: b, p: 4.0e3 }).unwrap();
    model.add_load(Load::PointMoment { node: b, m: 2.0e3 }).unwrap();
    model.add_load(Load::AxialForce { node: b, n: 1.0e3 }).unwrap();
    model
        .add_load(Load::UniformLoad {
            element: left,
            w: 3.0e3,
        })
        .unwrap();
    model
        .add_load(Load::ElementPointForce {
            element: right,
            p: 5.0e3,
            a: 1.5,
        })
        .unwrap();

    let solution = model.solve().unwrap();
    assert_equilibrium(&model, &solution);
    assert_boundaries(&model, &solution);
}

#[test]
fn shear_jumps_by_the_load_and_moment_stays_continuous() {
    let p = 10.0e3;
    let mut model = Model::new();
    let a = model.add_node_with_support(0.0, Support::Pin);
    let b = model.add_node_with_support(6.0, Support::Roller);
    let beam = model.add_element(a, b, props()).unwrap();
    model
        .add_load(Load::ElementPointForce {
            element: beam,
            p,
            a: 3.0,
        })
        .unwrap();

    let solution = model.solve().unwrap();
    let forces = &solution.element_result(beam).unwrap().forces;
    assert_eq!(forces.segments.len(), 2);

    let first = &forces.segments[0];
    let second = &forces.segments[1];
    let at_break = first.x1 - first.x0;
    // V drops by exactly P across the load point
    assert_relative_eq!(
        first.v.eval(at_break) - second.v.eval(0.0),
        p,
        epsilon = 1e-6
    );
    // M is continuous there
    assert_relative_eq!(
        first.m.eval(at_break),
        second.m.eval(0.0),
        epsilon = 1e-6
    );
}

#[test]
fn concentrated_moment_jumps_the_moment_only() {
    let m0 = 3.0e3;
    let mut model = Model::new();
    let a = model.add_node_with_support(0.0, Support::Pin);
    let b = model.add_node(2.0);
    let c = model.add_node_with_support(6.0, Support::Roller);
    let left = model.add_element(a, b, props()).unwrap();
    let right = model.add_element(b, c, props()).unwrap();
    model.add_load(Load::PointMoment { node: b, m: m0 }).unwrap();

    let solution = model.solve().unwrap();
    let left_forces = &solution.element_result(left).unwrap().forces;
    let right_forces = &solution.element_result(right).unwrap().forces;

    // A counter-clockwise couple steps the bending moment down by its
    // magnitude; shear passes through unchanged
    assert_relative_eq!(
        left_forces.m_at(2.0) - right_forces.m_at(0.0),
        m0,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        left_forces.v_at(2.0),
        right_forces.v_at(0.0),
        epsilon = 1e-6
    );
}

#[test]
fn determinacy_gate_never_returns_numbers() {
    // Nothing in the model at all
    assert!(matches!(
        Model::new().solve(),
        Err(SolverError::Kinematic { .. })
    ));

    // No supports at all
    let mut unsupported = Model::new();
    let a = unsupported.add_node(0.0);
    let b = unsupported.add_node(4.0);
    unsupported.add_element(a, b, props()).unwrap();
    unsupported
        .add_load(Load::PointForce { node: b, p: 1.0e3 })
        .unwrap();
    assert!(matches!(
        unsupported.solve(),
        Err(SolverError::Kinematic { .. })
    ));

    // Rollers only
    let mut rollers = Model::new();
    let a = rollers.add_node_with_support(0.0, Support::Roller);
    let b = rollers.add_node_with_support(4.0, Support::Roller);
    rollers.add_element(a, b, props()).unwrap();
    assert!(matches!(
        rollers.solve(),
        Err(SolverError::Kinematic { .. })
    ));

    // A floating part next to a perfectly good beam
    let mut floating = Model::from_template(Template::SimpleBeamPointLoad);
    let c = floating.add_node(10.0);
    let d = floating.add_node(14.0);
    floating.add_element(c, d, props()).unwrap();
    match floating.solve() {
        Err(SolverError::Kinematic { nodes, .. }) => assert_eq!(nodes, vec![c, d]),
        other => panic!("expected Kinematic, got {other:?}"),
    }
}

#[test]
fn overlapping_elements_are_unsupported() {
    let mut model = Model::new();
    let a = model.add_node_with_support(0.0, Support::Pin);
    let b = model.add_node(3.0);
    let c = model.add_node_with_support(6.0, Support::Roller);
    model.add_element(a, c, props()).unwrap();
    model.add_element(a, b, props()).unwrap();

    assert!(matches!(model.solve(), Err(SolverError::Unsupported(_))));
}

#[test]
fn dragged_zero_length_element_is_invalid() {
    let mut model = Model::from_template(Template::SimpleBeamPointLoad);
    let (roller, _) = model.nodes().nth(1).unwrap();
    model.set_node_position(roller, 0.0).unwrap();

    assert!(matches!(model.solve(), Err(SolverError::InvalidModel(_))));
}

#[test]
fn solving_twice_is_bit_identical() {
    for template in Template::all() {
        let model = Model::from_template(template);
        let first = model.solve().unwrap();
        let second = model.solve().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn model_survives_a_serde_round_trip() {
    let model = Model::from_template(Template::TwoSpanContinuous);
    let json = serde_json::to_string(&model).unwrap();
    let restored: Model = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.template, Some(Template::TwoSpanContinuous));
    assert_eq!(model.solve().unwrap(), restored.solve().unwrap());
}
