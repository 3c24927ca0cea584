//! Uniform spatial discretization of the box.

use ndarray as nd;
use crate::error::{ BoxError, BoxResult };

/// `N` uniformly spaced positions covering a closed interval, both endpoints
/// included.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    x: nd::Array1<f64>,
    dx: f64,
}

impl Grid {
    /// Create a new grid over the unit box `[0, 1]`.
    pub fn new(points: usize) -> BoxResult<Self> {
        Self::with_domain(points, 0.0, 1.0)
    }

    /// Create a new grid over `[a, b]`.
    ///
    /// Positions are `a + i * dx` with `dx = (b - a) / (points - 1)`; the last
    /// one is set to `b` exactly.
    pub fn with_domain(points: usize, a: f64, b: f64) -> BoxResult<Self> {
        if points < 2 {
            return Err(BoxError::TooFewPoints(points));
        }
        if !(a.is_finite() && b.is_finite() && b > a) {
            return Err(BoxError::BadDomain(a, b));
        }
        let dx = (b - a) / (points - 1) as f64;
        let mut x: nd::Array1<f64>
            = (0..points).map(|i| a + i as f64 * dx).collect();
        x[points - 1] = b;
        Ok(Self { x, dx })
    }

    /// Number of points.
    pub fn len(&self) -> usize { self.x.len() }

    /// Always `false`; a grid has at least two points.
    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    /// Grid spacing.
    pub fn dx(&self) -> f64 { self.dx }

    /// All positions.
    pub fn positions(&self) -> &nd::Array1<f64> { &self.x }

    /// Left wall.
    pub fn start(&self) -> f64 { self.x[0] }

    /// Right wall.
    pub fn end(&self) -> f64 { self.x[self.x.len() - 1] }

    /// Midpoint of the domain.
    pub fn center(&self) -> f64 { (self.start() + self.end()) / 2.0 }

    /// Total length of the domain.
    pub fn length(&self) -> f64 { self.end() - self.start() }
}
