//! Observables computed from the current state.
//!
//! Integrals over the box are plain Riemann sums with uniform weight `dx`,
//! accumulated sequentially in grid order so that results are reproducible
//! bit for bit. The walls need no special weight since the wavefunction
//! vanishes there.

use itertools::izip;
use num_complex::Complex64 as C64;
use crate::{
    error::{ BoxError, BoxResult },
    grid::Grid,
    hamiltonian::HAction,
    wavefunction::{ WaveFunction, eigenfunction },
};

/// Total probability ∫ |ψ|² dx.
pub fn norm(psi: &WaveFunction, grid: &Grid) -> f64 {
    let dx = grid.dx();
    izip!(psi.re(), psi.im())
        .fold(0.0, |acc, (r, i)| acc + dx * (r * r + i * i))
}

/// Expectation value of position ∫ x |ψ|² dx.
pub fn avg_position(psi: &WaveFunction, grid: &Grid) -> f64 {
    let dx = grid.dx();
    izip!(grid.positions(), psi.re(), psi.im())
        .fold(0.0, |acc, (x, r, i)| acc + dx * x * (r * r + i * i))
}

/// Expectation value of the Hamiltonian ∫ ψ* H ψ dx.
///
/// `action` must be the Hamiltonian applied to `psi` at the time `psi` is
/// taken at; pairing it with an action from another time gives meaningless
/// values.
pub fn energy(psi: &WaveFunction, action: &HAction, grid: &Grid) -> f64 {
    let dx = grid.dx();
    izip!(psi.re(), psi.im(), &action.re, &action.im)
        .fold(0.0, |acc, (r, i, hr, hi)| acc + dx * (r * hr + i * hi))
}

/// Occupation |⟨φ_m|ψ⟩|² of the `m`-th box eigenstate.
pub fn population(psi: &WaveFunction, grid: &Grid, m: usize) -> f64 {
    let dx = grid.dx();
    let phi = eigenfunction(grid, m);
    izip!(&phi, psi.re(), psi.im())
        .fold(C64::new(0.0, 0.0), |acc, (p, r, i)| {
            acc + dx * p * C64::new(*r, *i)
        })
        .norm_sqr()
}

/// A single line of output: the monitored quantities at one time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Record {
    pub time: f64,
    pub norm: f64,
    pub avg_position: f64,
    pub energy: f64,
}

impl Record {
    /// Measure `psi` at `time`, where `action` is the Hamiltonian applied to
    /// `psi` at the same time.
    pub fn measure(time: f64, psi: &WaveFunction, action: &HAction, grid: &Grid)
        -> Self
    {
        Self {
            time,
            norm: norm(psi, grid),
            avg_position: avg_position(psi, grid),
            energy: energy(psi, action, grid),
        }
    }
}

/// Whitespace-separated `time  norm  avg_position  energy`, printed at full
/// precision.
impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f,
            "{}  {}  {}  {}",
            self.time, self.norm, self.avg_position, self.energy,
        )
    }
}

/// Flags records whose norm has drifted too far from a reference value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NormMonitor {
    reference: f64,
    tolerance: f64,
}

impl NormMonitor {
    /// Create a new `NormMonitor`.
    ///
    /// Fails if `tolerance` is not positive and finite, or `reference` is not
    /// finite.
    pub fn new(reference: f64, tolerance: f64) -> BoxResult<Self> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(BoxError::BadTolerance(tolerance));
        }
        if !reference.is_finite() {
            return Err(BoxError::NonFinite {
                name: "reference norm",
                value: reference,
            });
        }
        Ok(Self { reference, tolerance })
    }

    /// Reference norm.
    pub fn reference(&self) -> f64 { self.reference }

    /// Allowed relative deviation.
    pub fn tolerance(&self) -> f64 { self.tolerance }

    /// Deviation of `norm` from the reference, relative to the reference
    /// unless the reference is zero.
    pub fn deviation(&self, norm: f64) -> f64 {
        let diff = (norm - self.reference).abs();
        if self.reference == 0.0 { diff } else { diff / self.reference.abs() }
    }

    /// Fail with [`BoxError::Diverged`] if the record's norm is non-finite or
    /// deviates by more than the tolerance.
    pub fn check(&self, record: &Record) -> BoxResult<()> {
        let dev = self.deviation(record.norm);
        if dev.is_finite() && dev <= self.tolerance {
            Ok(())
        } else {
            Err(BoxError::Diverged {
                time: record.time,
                norm: record.norm,
                reference: self.reference,
                tolerance: self.tolerance,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use ndarray as nd;
    use crate::hamiltonian::{ DrivenBox, HApply };
    use super::*;

    #[test]
    fn ground_state_values() {
        let grid = Grid::new(101).unwrap();
        let psi = WaveFunction::eigenstate(&grid, 1).unwrap();
        let hbox = DrivenBox::new(grid.clone(), 1.5 * PI * PI, 1.0).unwrap();
        let action = hbox.apply(&psi, 0.0);
        let rec = Record::measure(0.0, &psi, &action, &grid);
        assert_eq!(rec.time, 0.0);
        assert!((rec.norm - 1.0).abs() < 1e-12);
        assert!((rec.avg_position - 0.5).abs() < 1e-12);
        assert!((rec.energy - PI * PI / 2.0).abs() < 1e-3);
    }

    #[test]
    fn sums_by_hand() {
        let grid = Grid::new(5).unwrap(); // dx = 0.25
        let psi = WaveFunction::from_parts(
            &grid,
            nd::array![0.0, 1.0, 2.0, 0.0, 0.0],
            nd::array![0.0, 0.0, 1.0, 1.0, 0.0],
        ).unwrap();
        let action = HAction {
            re: nd::array![0.0, 2.0, 1.0, 3.0, 0.0],
            im: nd::array![0.0, 5.0, -1.0, 2.0, 0.0],
        };
        // |ψ|² = [0, 1, 5, 1, 0]
        assert_eq!(norm(&psi, &grid), 0.25 * 7.0);
        assert_eq!(
            avg_position(&psi, &grid),
            0.25 * (0.25 * 1.0 + 0.5 * 5.0 + 0.75 * 1.0),
        );
        // Re ψ* Hψ = [0, 2, 2 - 1, 2, 0]
        assert_eq!(energy(&psi, &action, &grid), 0.25 * 5.0);
    }

    #[test]
    fn populations() {
        let grid = Grid::new(101).unwrap();
        let psi = WaveFunction::eigenstate(&grid, 2).unwrap();
        assert!((population(&psi, &grid, 2) - 1.0).abs() < 1e-12);
        assert!(population(&psi, &grid, 1) < 1e-24);
        assert!(population(&psi, &grid, 3) < 1e-24);

        // equal superposition with a relative phase
        let phi1 = eigenfunction(&grid, 1);
        let phi2 = eigenfunction(&grid, 2);
        let s = 0.5_f64.sqrt();
        let psi = WaveFunction::from_parts(&grid, &phi1 * s, &phi2 * s)
            .unwrap();
        assert!((population(&psi, &grid, 1) - 0.5).abs() < 1e-12);
        assert!((population(&psi, &grid, 2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn record_line() {
        let rec = Record {
            time: 0.5,
            norm: 1.0,
            avg_position: 0.25,
            energy: -3.5,
        };
        assert_eq!(rec.to_string(), "0.5  1  0.25  -3.5");
        let fields: Vec<f64>
            = rec.to_string().split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(fields, vec![0.5, 1.0, 0.25, -3.5]);
    }

    #[test]
    fn monitor() {
        let mon = NormMonitor::new(1.0, 1e-3).unwrap();
        let mut rec = Record {
            time: 1.0,
            norm: 1.0005,
            avg_position: 0.5,
            energy: 5.0,
        };
        assert!(mon.check(&rec).is_ok());
        rec.norm = 0.998;
        assert!(matches!(mon.check(&rec), Err(BoxError::Diverged { .. })));
        rec.norm = f64::NAN;
        assert!(mon.check(&rec).is_err());
        rec.norm = f64::INFINITY;
        assert!(mon.check(&rec).is_err());

        assert!(NormMonitor::new(1.0, 0.0).is_err());
        assert!(NormMonitor::new(f64::NAN, 1e-3).is_err());
        let zero = NormMonitor::new(0.0, 1e-3).unwrap();
        assert_eq!(zero.deviation(5e-4), 5e-4);
    }
}
