//! Top-level time loop.
//!
//! A run alternates strictly between measuring the current state and taking
//! one integrator step, so every [`Record`] describes the state at the time it
//! carries, before the step that follows it. The state after the final step
//! is not recorded.

use tracing::debug;
use crate::{
    config::Config,
    diagnostics::{ self, Record },
    error::{ BoxError, BoxResult },
    grid::Grid,
    hamiltonian::{ DrivenBox, HApply },
    integrator::Leapfrog,
    params::Params,
    wavefunction::WaveFunction,
};

/// A driven particle in a box, set up from [`Params`] and advanced towards
/// the horizon.
#[derive(Clone, Debug)]
pub struct Simulation {
    params: Params,
    stepper: Leapfrog<DrivenBox>,
    num_steps: usize,
    record_every: usize,
}

impl Simulation {
    /// Create a new `Simulation` in the `params.eigenstate`-th box eigenstate
    /// at time zero.
    pub fn new(params: Params) -> BoxResult<Self> {
        params.validate()?;
        let grid = Grid::new(params.points)?;
        let psi = WaveFunction::eigenstate(&grid, params.eigenstate)?;
        let hbox = DrivenBox::new(grid, params.frequency, params.strength)?;
        let stepper = Leapfrog::new(hbox, psi, 0.0, params.dt)?;
        let num_steps = params.num_steps();
        debug!("new simulation: {}; {} steps", params, num_steps);
        Ok(Self { params, stepper, num_steps, record_every: 1 })
    }

    /// Create a new `Simulation` with run options taken from `config`.
    pub fn from_config(config: &Config) -> BoxResult<Self> {
        config.run.validate()?;
        Self::new(config.params)?
            .with_parallel(config.run.parallel)
            .with_record_every(config.run.record_every)
    }

    /// Evaluate the Hamiltonian in parallel over grid points.
    ///
    /// May be called at any point of a run; progress is kept.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.stepper.hamiltonian_mut().set_parallel(parallel);
        self
    }

    /// Only emit every `n`-th record.
    ///
    /// Fails if `n == 0`.
    pub fn with_record_every(mut self, n: usize) -> BoxResult<Self> {
        if n == 0 { return Err(BoxError::ZeroRecordInterval); }
        self.record_every = n;
        Ok(self)
    }

    /// Parameters.
    pub fn params(&self) -> &Params { &self.params }

    /// Spatial grid.
    pub fn grid(&self) -> &Grid { self.stepper.hamiltonian().grid() }

    /// Underlying integrator.
    pub fn stepper(&self) -> &Leapfrog<DrivenBox> { &self.stepper }

    /// Current state.
    pub fn state(&self) -> &WaveFunction { self.stepper.state() }

    /// Current time.
    pub fn time(&self) -> f64 { self.stepper.time() }

    /// Total number of steps in the run.
    pub fn num_steps(&self) -> usize { self.num_steps }

    /// Number of steps taken so far.
    pub fn steps_taken(&self) -> usize { self.stepper.steps() }

    /// Record interval.
    pub fn record_every(&self) -> usize { self.record_every }

    /// Return `true` once the horizon has been reached.
    pub fn is_finished(&self) -> bool { self.stepper.steps() >= self.num_steps }

    /// Measure the current state.
    pub fn measure(&self) -> Record {
        Record::measure(
            self.stepper.time(),
            self.stepper.state(),
            self.stepper.action(),
            self.grid(),
        )
    }

    /// Occupation of the `m`-th box eigenstate in the current state.
    pub fn population(&self, m: usize) -> f64 {
        diagnostics::population(self.stepper.state(), self.grid(), m)
    }

    /// Measure the current state and take one step, unless the run is
    /// finished.
    pub fn advance(&mut self) -> Option<Record> {
        if self.is_finished() { return None; }
        let record = self.measure();
        self.stepper.step();
        Some(record)
    }

    /// Iterate over the remaining records, stepping the simulation as they
    /// are consumed.
    pub fn records(&mut self) -> Records<'_> { Records { sim: self } }

    /// Consume `self`, returning the current state.
    pub fn into_state(self) -> WaveFunction { self.stepper.into_state() }
}

/// Iterator over the records of a [`Simulation`], honoring its record
/// interval.
///
/// Dropping the iterator part way leaves the simulation at the step after the
/// last record yielded.
#[derive(Debug)]
pub struct Records<'a> {
    sim: &'a mut Simulation,
}

impl<'a> Iterator for Records<'a> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let keep = self.sim.steps_taken() % self.sim.record_every == 0;
            if keep {
                return self.sim.advance();
            }
            if self.sim.is_finished() { return None; }
            self.sim.stepper.step();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let every = self.sim.record_every;
        let done = self.sim.steps_taken();
        let total = self.sim.num_steps;
        let n
            = if done >= total {
                0
            } else {
                (total - 1) / every + 1 - (done + every - 1) / every
            };
        (n, Some(n))
    }
}

impl<'a> ExactSizeIterator for Records<'a> { }
