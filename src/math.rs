//! Mathematical utilities for the solver
//!
//! Dense nalgebra matrices throughout: problem sizes are classroom scale
//! (tens of nodes), so small direct solves beat any sparse machinery.

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector, Vector3};

pub type Mat = DMatrix<f64>;
pub type DVec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 6x6 matrix for a 2-node beam element (u, w, theta at each end)
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for beam element end forces/displacements
pub type Vec6 = SVector<f64, 6>;

/// Geometric tolerance for coincident positions along the structural axis.
pub const POSITION_TOL: f64 = 1e-9;

/// Compute the local stiffness matrix for a 2D beam element.
///
/// DOF order is (u_i, w_i, theta_i, u_j, w_j, theta_j) with transverse
/// displacement w positive upward and rotation theta counter-clockwise.
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `i` - Second moment of area about the bending axis
/// * `a` - Cross-sectional area
/// * `length` - Element length
pub fn beam_local_stiffness(e: f64, i: f64, a: f64, length: f64) -> Mat6 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let ei_l3 = e * i / l3;
    let ei_l2 = e * i / l2;
    let ei_l = e * i / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,   0.0,          0.0,         -ea_l,  0.0,          0.0,
        // Row 1: shear at i
        0.0,    12.0*ei_l3,   6.0*ei_l2,   0.0,    -12.0*ei_l3,  6.0*ei_l2,
        // Row 2: moment at i
        0.0,    6.0*ei_l2,    4.0*ei_l,    0.0,    -6.0*ei_l2,   2.0*ei_l,
        // Row 3: axial at j
        -ea_l,  0.0,          0.0,         ea_l,   0.0,          0.0,
        // Row 4: shear at j
        0.0,    -12.0*ei_l3,  -6.0*ei_l2,  0.0,    12.0*ei_l3,   -6.0*ei_l2,
        // Row 5: moment at j
        0.0,    6.0*ei_l2,    2.0*ei_l,    0.0,    -6.0*ei_l2,   4.0*ei_l,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute fixed end reactions for a uniform transverse load over the
/// full element length.
///
/// `w` is the load intensity in the local transverse direction (positive
/// upward). The returned vector is subtracted from the global load vector
/// during assembly and added to elastic end forces for recovery.
pub fn fer_uniform_load(w: f64, length: f64) -> Vec6 {
    let l = length;
    let l2 = l * l;

    let mut fer = Vec6::zeros();
    fer[1] = -w * l / 2.0;
    fer[2] = -w * l2 / 12.0;
    fer[4] = -w * l / 2.0;
    fer[5] = w * l2 / 12.0;
    fer
}

/// Compute fixed end reactions for a transverse point load.
///
/// # Arguments
/// * `p` - Load magnitude in the local transverse direction (positive upward)
/// * `a` - Distance from the element start to the load
/// * `length` - Element length
pub fn fer_point_load(p: f64, a: f64, length: f64) -> Vec6 {
    let l = length;
    let b = l - a;
    let l2 = l * l;
    let l3 = l2 * l;

    let mut fer = Vec6::zeros();
    fer[1] = -p * b * b * (3.0 * a + b) / l3;
    fer[2] = -p * a * b * b / l2;
    fer[4] = -p * a * a * (a + 3.0 * b) / l3;
    fer[5] = p * a * a * b / l2;
    fer
}

/// Solve a square linear system using LU decomposition with partial pivoting.
pub fn solve_linear_system(a: &Mat, b: &DVec) -> Option<DVec> {
    a.clone().lu().solve(b)
}

/// Solve a (possibly overdetermined) linear system in the least-squares
/// sense using SVD. Returns `None` if the decomposition fails.
pub fn solve_least_squares(a: &Mat, b: &DVec) -> Option<DVec> {
    a.clone().svd(true, true).solve(b, 1e-12).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = beam_local_stiffness(200e9, 4.5e-4, 0.06, 6.0);

        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_local_stiffness_rigid_body_rows() {
        // Translating both ends equally produces no force
        let k = beam_local_stiffness(200e9, 4.5e-4, 0.06, 6.0);
        let d = Vec6::from_row_slice(&[0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
        let f = k * d;
        for i in 0..6 {
            assert_relative_eq!(f[i], 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_fer_uniform_totals() {
        // End shears carry the full load, end moments are antisymmetric
        let fer = fer_uniform_load(-5000.0, 4.0);
        assert_relative_eq!(fer[1] + fer[4], 5000.0 * 4.0, epsilon = 1e-9);
        assert_relative_eq!(fer[2], -fer[5], epsilon = 1e-9);
    }

    #[test]
    fn test_fer_point_load_midspan() {
        let fer = fer_point_load(-1000.0, 2.0, 4.0);
        assert_relative_eq!(fer[1], 500.0, epsilon = 1e-9);
        assert_relative_eq!(fer[4], 500.0, epsilon = 1e-9);
        assert_relative_eq!(fer[2], 500.0, epsilon = 1e-9); // P*L/8 with P=-1000
        assert_relative_eq!(fer[5], -500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_solve_linear_system() {
        let a = Mat::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
        let b = DVec::from_row_slice(&[2.0, 8.0]);
        let x = solve_linear_system(&a, &b).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
    }
}
