#![allow(non_snake_case)]

//! Time-dependent Schrödinger evolution of a particle in a unit box driven by
//! an oscillating linear potential.
//!
//! The wavefunction is stored as separate real and imaginary grids and is
//! advanced with a staggered leapfrog scheme; see [`integrator::Leapfrog`].

pub mod utils;
pub mod error;
pub mod params;
pub mod config;
pub mod grid;
pub mod wavefunction;
pub mod hamiltonian;
pub mod integrator;
pub mod diagnostics;
pub mod simulation;
pub mod output;

pub use error::{ BoxError, BoxResult };
pub use params::Params;
pub use config::{ Config, RunOptions };
pub use grid::Grid;
pub use wavefunction::WaveFunction;
pub use hamiltonian::{ HAction, HApply, DrivenBox };
pub use integrator::Leapfrog;
pub use diagnostics::{ Record, NormMonitor };
pub use simulation::{ Simulation, Records };
pub use output::{ RecordWriter, Summary, run };
