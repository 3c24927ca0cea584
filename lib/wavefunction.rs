//! Wavefunction storage and initial states.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ BoxError, BoxResult },
    grid::Grid,
};

/// Sample the `n`-th normalized eigenfunction of the infinite square well
/// spanning `grid`,
/// ```text
/// φ_n(x) = sqrt(2 / L) sin(n π (x - a) / L)
/// ```
/// with the values at the walls set to exactly zero.
pub fn eigenfunction(grid: &Grid, n: usize) -> nd::Array1<f64> {
    let a = grid.start();
    let L = grid.length();
    let amp = (2.0 / L).sqrt();
    let mut phi
        = grid.positions()
        .mapv(|x| amp * (n as f64 * ((x - a) / L) * PI).sin());
    pin_walls(&mut phi);
    phi
}

fn pin_walls(a: &mut nd::Array1<f64>) {
    let n = a.len();
    if n > 0 {
        a[0] = 0.0;
        a[n - 1] = 0.0;
    }
}

fn walls_vanish(a: &nd::Array1<f64>) -> bool {
    a.is_empty() || (a[0] == 0.0 && a[a.len() - 1] == 0.0)
}

/// Real and imaginary parts of a wavefunction sampled on a [`Grid`].
///
/// The values at both walls are always exactly zero. Only the
/// [`Leapfrog`][crate::integrator::Leapfrog] integrator mutates a
/// `WaveFunction`, and its updates preserve this.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveFunction {
    pub(crate) re: nd::Array1<f64>,
    pub(crate) im: nd::Array1<f64>,
}

impl WaveFunction {
    /// The `n`-th box eigenstate with zero imaginary part.
    ///
    /// Fails if `n == 0`.
    pub fn eigenstate(grid: &Grid, n: usize) -> BoxResult<Self> {
        if n == 0 { return Err(BoxError::ZeroEigenstate); }
        let re = eigenfunction(grid, n);
        let im = nd::Array1::zeros(grid.len());
        Ok(Self { re, im })
    }

    /// Build from pre-constructed real and imaginary parts.
    ///
    /// Fails if the lengths differ from that of `grid` or if either part is
    /// non-zero at a wall.
    pub fn from_parts(
        grid: &Grid,
        re: nd::Array1<f64>,
        im: nd::Array1<f64>,
    ) -> BoxResult<Self>
    {
        for part in [&re, &im] {
            if part.len() != grid.len() {
                return Err(BoxError::LengthMismatch {
                    expected: grid.len(),
                    got: part.len(),
                });
            }
        }
        if !(walls_vanish(&re) && walls_vanish(&im)) {
            return Err(BoxError::NonZeroBoundary);
        }
        Ok(Self { re, im })
    }

    /// Build from a complex-valued array.
    pub fn from_complex(grid: &Grid, psi: &nd::Array1<C64>) -> BoxResult<Self> {
        Self::from_parts(grid, psi.mapv(|z| z.re), psi.mapv(|z| z.im))
    }

    /// Number of grid points.
    pub fn len(&self) -> usize { self.re.len() }

    /// Always `false` for a state built on a [`Grid`].
    pub fn is_empty(&self) -> bool { self.re.is_empty() }

    /// Real part.
    pub fn re(&self) -> &nd::Array1<f64> { &self.re }

    /// Imaginary part.
    pub fn im(&self) -> &nd::Array1<f64> { &self.im }

    /// Combine both parts into a complex-valued array.
    pub fn to_complex(&self) -> nd::Array1<C64> {
        nd::Zip::from(&self.re).and(&self.im)
            .map_collect(|&r, &i| C64::new(r, i))
    }

    /// Probability density |ψ|².
    pub fn density(&self) -> nd::Array1<f64> {
        nd::Zip::from(&self.re).and(&self.im)
            .map_collect(|&r, &i| r * r + i * i)
    }

    /// `true` if both parts vanish exactly at both walls.
    pub fn boundary_is_zero(&self) -> bool {
        walls_vanish(&self.re) && walls_vanish(&self.im)
    }
}
