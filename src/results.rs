//! Result types for a solve
//!
//! The solution bundle is recomputed wholesale on each solve and never
//! mutated in place. Internal forces and deflections are reported as
//! piecewise polynomials: ordered breakpoints per element with coefficient
//! lists per segment, so a renderer can plot exact curves rather than
//! resampled approximations.
//!
//! Positions within an element are measured from the element's left end
//! (the endpoint with the smaller axis coordinate). At a breakpoint,
//! point-value accessors return the limit from the right.

use serde::{Deserialize, Serialize};

use crate::analysis::Classification;
use crate::model::{ElementId, NodeId};

/// A polynomial in the offset from its segment's start position,
/// coefficients in ascending powers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Create from ascending coefficients, trimming trailing zeros.
    pub fn new(mut coeffs: Vec<f64>) -> Self {
        while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(0.0);
        }
        Self { coeffs }
    }

    /// A constant polynomial.
    pub fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// Ascending coefficients.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Polynomial degree (0 for constants).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Evaluate at offset `t` from the segment start (Horner).
    pub fn eval(&self, t: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }

    /// Antiderivative with the given constant term.
    pub fn integral(&self, constant: f64) -> Polynomial {
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(constant);
        for (k, &c) in self.coeffs.iter().enumerate() {
            coeffs.push(c / (k as f64 + 1.0));
        }
        Polynomial::new(coeffs)
    }

    /// Sum of two polynomials.
    pub fn plus(&self, other: &Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut coeffs = vec![0.0; n];
        for (k, &c) in self.coeffs.iter().enumerate() {
            coeffs[k] += c;
        }
        for (k, &c) in other.coeffs.iter().enumerate() {
            coeffs[k] += c;
        }
        Polynomial::new(coeffs)
    }

    /// Multiply by a scalar.
    pub fn scaled(&self, factor: f64) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|c| c * factor).collect())
    }

    /// True when every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }
}

/// Reaction at a supported node, in global axes: `fx` positive along +x,
/// `fy` positive upward, `mz` positive counter-clockwise. Unrestrained
/// directions are zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Supported node
    pub node: NodeId,
    /// Axial reaction force
    pub fx: f64,
    /// Transverse reaction force, positive upward
    pub fy: f64,
    /// Reaction moment, positive counter-clockwise
    pub mz: f64,
}

/// One breakpoint-bounded piece of an element's internal force functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSegment {
    /// Segment start, from the element's left end
    pub x0: f64,
    /// Segment end, from the element's left end
    pub x1: f64,
    /// Axial force N (tension positive), constant per segment
    pub n: Polynomial,
    /// Shear V (up-sum of forces left of the section), degree <= 1
    pub v: Polynomial,
    /// Bending moment M (sagging positive), degree <= 2
    pub m: Polynomial,
}

/// Piecewise internal force functions N(x), V(x), M(x) for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceDiagram {
    /// Element these functions belong to
    pub element: ElementId,
    /// Element length
    pub length: f64,
    /// Ordered, contiguous segments covering `[0, length]`
    pub segments: Vec<ForceSegment>,
}

impl ForceDiagram {
    fn segment_at(&self, x: f64) -> (&ForceSegment, f64) {
        let seg = self
            .segments
            .iter()
            .rev()
            .find(|s| x >= s.x0)
            .unwrap_or(&self.segments[0]);
        (seg, (x - seg.x0).clamp(0.0, seg.x1 - seg.x0))
    }

    /// Axial force at `x` from the element's left end.
    pub fn n_at(&self, x: f64) -> f64 {
        let (seg, t) = self.segment_at(x);
        seg.n.eval(t)
    }

    /// Shear force at `x` from the element's left end.
    pub fn v_at(&self, x: f64) -> f64 {
        let (seg, t) = self.segment_at(x);
        seg.v.eval(t)
    }

    /// Bending moment at `x` from the element's left end.
    pub fn m_at(&self, x: f64) -> f64 {
        let (seg, t) = self.segment_at(x);
        seg.m.eval(t)
    }

    /// Breakpoint positions, including both element ends.
    pub fn breakpoints(&self) -> Vec<f64> {
        let mut points: Vec<f64> = self.segments.iter().map(|s| s.x0).collect();
        points.push(self.length);
        points
    }

    /// Plot-ready shear series: `n` evenly spaced positions merged with the
    /// breakpoints, so discontinuities land on sampled points.
    pub fn sample_shear(&self, n: usize) -> Vec<(f64, f64)> {
        sample_positions(self.length, &self.breakpoints(), n)
            .into_iter()
            .map(|x| (x, self.v_at(x)))
            .collect()
    }

    /// Plot-ready moment series.
    pub fn sample_moment(&self, n: usize) -> Vec<(f64, f64)> {
        sample_positions(self.length, &self.breakpoints(), n)
            .into_iter()
            .map(|x| (x, self.m_at(x)))
            .collect()
    }

    /// Plot-ready axial force series.
    pub fn sample_axial(&self, n: usize) -> Vec<(f64, f64)> {
        sample_positions(self.length, &self.breakpoints(), n)
            .into_iter()
            .map(|x| (x, self.n_at(x)))
            .collect()
    }
}

/// One breakpoint-bounded piece of an element's deflection functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeflectionSegment {
    /// Segment start, from the element's left end
    pub x0: f64,
    /// Segment end, from the element's left end
    pub x1: f64,
    /// Rotation theta = dw/dx, degree <= 3
    pub theta: Polynomial,
    /// Deflection w (positive downward), degree <= 4
    pub w: Polynomial,
}

/// Piecewise deflection w(x) and rotation theta(x) for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeflectionDiagram {
    /// Element these functions belong to
    pub element: ElementId,
    /// Element length
    pub length: f64,
    /// Ordered, contiguous segments covering `[0, length]`
    pub segments: Vec<DeflectionSegment>,
}

impl DeflectionDiagram {
    fn segment_at(&self, x: f64) -> (&DeflectionSegment, f64) {
        let seg = self
            .segments
            .iter()
            .rev()
            .find(|s| x >= s.x0)
            .unwrap_or(&self.segments[0]);
        (seg, (x - seg.x0).clamp(0.0, seg.x1 - seg.x0))
    }

    /// Deflection at `x` from the element's left end, positive downward.
    pub fn w_at(&self, x: f64) -> f64 {
        let (seg, t) = self.segment_at(x);
        seg.w.eval(t)
    }

    /// Rotation at `x` from the element's left end.
    pub fn theta_at(&self, x: f64) -> f64 {
        let (seg, t) = self.segment_at(x);
        seg.theta.eval(t)
    }

    /// Plot-ready deflection series.
    pub fn sample_deflection(&self, n: usize) -> Vec<(f64, f64)> {
        let breaks: Vec<f64> = self.segments.iter().map(|s| s.x0).collect();
        sample_positions(self.length, &breaks, n)
            .into_iter()
            .map(|x| (x, self.w_at(x)))
            .collect()
    }
}

/// Per-element slice of the solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementResult {
    /// Element id
    pub element: ElementId,
    /// Piecewise N/V/M
    pub forces: ForceDiagram,
    /// Piecewise w/theta
    pub deflection: DeflectionDiagram,
}

/// An extreme value and where it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    /// Element carrying the extreme
    pub element: ElementId,
    /// Position from the element's left end
    pub x: f64,
    /// Signed value at the extreme
    pub value: f64,
}

/// Headline numbers for a solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionSummary {
    /// Number of nodes solved
    pub num_nodes: usize,
    /// Number of elements solved
    pub num_elements: usize,
    /// Largest-magnitude shear force
    pub max_shear: Option<Extreme>,
    /// Largest-magnitude bending moment
    pub max_moment: Option<Extreme>,
    /// Largest-magnitude deflection
    pub max_deflection: Option<Extreme>,
}

/// Complete result bundle of a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Determinacy classification that selected the solution path
    pub classification: Classification,
    /// Reactions at supported nodes, in node id order
    pub reactions: Vec<Reaction>,
    /// Per-element results, in element id order
    pub elements: Vec<ElementResult>,
    /// Headline numbers
    pub summary: SolutionSummary,
}

impl Solution {
    /// Reaction at a node, if the node is supported.
    pub fn reaction_at(&self, node: NodeId) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.node == node)
    }

    /// Result slice for an element.
    pub fn element_result(&self, element: ElementId) -> Option<&ElementResult> {
        self.elements.iter().find(|e| e.element == element)
    }
}

/// Merge `n` evenly spaced positions over `[0, length]` with breakpoints,
/// sorted and deduplicated.
fn sample_positions(length: f64, breakpoints: &[f64], n: usize) -> Vec<f64> {
    let n = n.max(2);
    let mut positions: Vec<f64> = (0..n)
        .map(|k| length * k as f64 / (n - 1) as f64)
        .collect();
    positions.extend_from_slice(breakpoints);
    positions.sort_by(|a, b| a.total_cmp(b));
    positions.dedup_by(|a, b| (*a - *b).abs() < 1e-12 * (1.0 + length));
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_eval() {
        // 1 + 2t + 3t^2
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(p.eval(0.0), 1.0);
        assert_relative_eq!(p.eval(2.0), 17.0);
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn test_polynomial_integral() {
        // d/dt (5 + t + t^2) = 1 + 2t
        let p = Polynomial::new(vec![1.0, 2.0]);
        let int = p.integral(5.0);
        assert_eq!(int.coeffs(), &[5.0, 1.0, 1.0]);
    }

    #[test]
    fn test_polynomial_trims_trailing_zeros() {
        let p = Polynomial::new(vec![2.0, 0.0, 0.0]);
        assert_eq!(p.degree(), 0);
        assert_relative_eq!(p.eval(10.0), 2.0);
    }

    #[test]
    fn test_sample_positions_include_breakpoints() {
        let positions = sample_positions(10.0, &[0.0, 3.3, 10.0], 5);
        assert!(positions.iter().any(|&x| (x - 3.3).abs() < 1e-12));
        assert_relative_eq!(positions[0], 0.0);
        assert_relative_eq!(*positions.last().unwrap(), 10.0);
    }
}
