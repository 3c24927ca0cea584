//! Discretized Hamiltonian for the driven box.
//!
//! In units ħ = m = 1 the Hamiltonian is
//! ```text
//! H(t) = -½ ∂²/∂x² + k (x - x₀) sin(ω t)
//! ```
//! with `x₀` the center of the box. The kinetic term uses the second-order
//! central difference, and the wavefunction is pinned to zero at both walls,
//! where the action is not evaluated.

use ndarray::{ self as nd, s };
use crate::{
    error::{ BoxError, BoxResult },
    grid::Grid,
    wavefunction::WaveFunction,
};

/// Result of applying a Hamiltonian to a [`WaveFunction`] at a fixed time.
#[derive(Clone, Debug, PartialEq)]
pub struct HAction {
    /// Action on the real part.
    pub re: nd::Array1<f64>,
    /// Action on the imaginary part.
    pub im: nd::Array1<f64>,
}

impl HAction {
    /// All-zero action over `n` points.
    pub fn zeros(n: usize) -> Self {
        Self { re: nd::Array1::zeros(n), im: nd::Array1::zeros(n) }
    }

    /// Number of grid points.
    pub fn len(&self) -> usize { self.re.len() }

    /// `true` if there are no grid points.
    pub fn is_empty(&self) -> bool { self.re.is_empty() }
}

/// Basic requirements for a real-valued Hamiltonian acting on a wavefunction
/// stored as separate real and imaginary parts.
///
/// Implementors must be pure: the result depends only on `psi` and `t`.
pub trait HApply {
    /// Grid the operator is discretized on.
    fn grid(&self) -> &Grid;

    /// Apply the Hamiltonian at time `t`.
    fn apply(&self, psi: &WaveFunction, t: f64) -> HAction;
}

/// Particle in a box driven by a spatially linear field oscillating at angular
/// frequency `frequency` with amplitude `strength`.
#[derive(Clone, Debug)]
pub struct DrivenBox {
    grid: Grid,
    pub frequency: f64,
    pub strength: f64,
    parallel: bool,
}

impl DrivenBox {
    /// Create a new `DrivenBox`.
    ///
    /// Fails if `frequency` or `strength` is not finite.
    pub fn new(grid: Grid, frequency: f64, strength: f64) -> BoxResult<Self> {
        if !frequency.is_finite() {
            return Err(BoxError::NonFinite { name: "frequency", value: frequency });
        }
        if !strength.is_finite() {
            return Err(BoxError::NonFinite { name: "strength", value: strength });
        }
        Ok(Self { grid, frequency, strength, parallel: false })
    }

    /// Evaluate grid points on the rayon thread pool. Results are identical
    /// to sequential evaluation.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.set_parallel(parallel);
        self
    }

    /// In-place version of [`Self::parallel`].
    pub fn set_parallel(&mut self, parallel: bool) { self.parallel = parallel; }

    /// Return `true` if grid points are evaluated in parallel.
    pub fn is_parallel(&self) -> bool { self.parallel }

    /// Value of the time-dependent factor `sin(ω t)`.
    pub fn drive(&self, t: f64) -> f64 { (self.frequency * t).sin() }

    // action on a single real-valued component; walls are left at zero
    fn act_on(&self, psi: &nd::Array1<f64>, drive: f64) -> nd::Array1<f64> {
        let n = psi.len();
        let mut h: nd::Array1<f64> = nd::Array1::zeros(n);
        if n < 3 { return h; }
        let x = self.grid.positions();
        let x0 = self.grid.center();
        let dx = self.grid.dx();
        let k = self.strength;
        let stencil = |i: usize| -> f64 {
            -0.5 * (psi[i + 1] + psi[i - 1] - 2.0 * psi[i]) / (dx * dx)
                + k * (x[i] - x0) * psi[i] * drive
        };
        let interior = nd::Zip::indexed(h.slice_mut(s![1..n - 1]));
        if self.parallel {
            interior.par_for_each(|j, hi| { *hi = stencil(j + 1); });
        } else {
            interior.for_each(|j, hi| { *hi = stencil(j + 1); });
        }
        h
    }
}

impl HApply for DrivenBox {
    fn grid(&self) -> &Grid { &self.grid }

    fn apply(&self, psi: &WaveFunction, t: f64) -> HAction {
        let drive = self.drive(t);
        HAction {
            re: self.act_on(psi.re(), drive),
            im: self.act_on(psi.im(), drive),
        }
    }
}
