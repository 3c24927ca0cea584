//! Staggered leapfrog integration of the Schrödinger equation.
//!
//! Writing ψ = R + iI with a real Hamiltonian, iψ̇ = Hψ splits into
//! ```text
//! Ṙ =  H I
//! İ = -H R
//! ```
//! One step of size `dt` from time `t` is
//! ```text
//! R ← R + (dt/2) H(t)        I
//! I ← I -  dt    H(t + dt/2) R
//! R ← R + (dt/2) H(t + dt)   I
//! ```
//! where each application of `H` sees the most recently updated arrays. The
//! action at `t + dt` is kept and reused for the first half-step of the next
//! step, and for measuring the state at `t + dt`. It is evaluated before the
//! last half-step, so its imaginary half is the action on the final `I` while
//! its real half is the action on `R` as it was after the `I` update.
//!
//! The scheme is explicit and fixed-step. It is only stable for `dt` small
//! compared to `dx²`, which is not checked here.

use crate::{
    error::{ BoxError, BoxResult },
    hamiltonian::{ HAction, HApply },
    wavefunction::WaveFunction,
};

/// Leapfrog integrator owning the evolving state together with the cached
/// Hamiltonian action at the current time.
#[derive(Clone, Debug)]
pub struct Leapfrog<H>
where H: HApply
{
    hamiltonian: H,
    psi: WaveFunction,
    action: HAction,
    t0: f64,
    dt: f64,
    steps: usize,
}

impl<H> Leapfrog<H>
where H: HApply
{
    /// Create a new `Leapfrog` starting from `psi` at time `t0`.
    ///
    /// Fails if `dt` is not positive and finite, if `t0` is not finite, or if
    /// `psi` does not live on the Hamiltonian's grid.
    pub fn new(hamiltonian: H, psi: WaveFunction, t0: f64, dt: f64)
        -> BoxResult<Self>
    {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(BoxError::BadTimeStep(dt));
        }
        if !t0.is_finite() {
            return Err(BoxError::NonFinite { name: "t0", value: t0 });
        }
        if psi.len() != hamiltonian.grid().len() {
            return Err(BoxError::LengthMismatch {
                expected: hamiltonian.grid().len(),
                got: psi.len(),
            });
        }
        let action = hamiltonian.apply(&psi, t0);
        Ok(Self { hamiltonian, psi, action, t0, dt, steps: 0 })
    }

    /// Current time, `t0 + steps * dt`.
    pub fn time(&self) -> f64 { self.t0 + self.steps as f64 * self.dt }

    /// Time step.
    pub fn dt(&self) -> f64 { self.dt }

    /// Number of steps taken so far.
    pub fn steps(&self) -> usize { self.steps }

    /// Current state.
    pub fn state(&self) -> &WaveFunction { &self.psi }

    /// Cached Hamiltonian action at the current time.
    ///
    /// Exact on the current state only before the first step. Afterwards
    /// `action().im` is the action on the current imaginary part, and
    /// `action().re` the action on the real part as it stood before the last
    /// half-step.
    pub fn action(&self) -> &HAction { &self.action }

    /// The Hamiltonian.
    pub fn hamiltonian(&self) -> &H { &self.hamiltonian }

    /// Mutable access to the Hamiltonian.
    ///
    /// The cached action is not recomputed, so changes must leave
    /// [`HApply::apply`] unaffected.
    pub(crate) fn hamiltonian_mut(&mut self) -> &mut H { &mut self.hamiltonian }

    /// Advance by one time step.
    pub fn step(&mut self) {
        let t = self.time();
        let dt = self.dt;
        self.psi.re.scaled_add(dt / 2.0, &self.action.im);
        self.action = self.hamiltonian.apply(&self.psi, t + dt / 2.0);
        self.psi.im.scaled_add(-dt, &self.action.re);
        self.action = self.hamiltonian.apply(&self.psi, t + dt);
        self.psi.re.scaled_add(dt / 2.0, &self.action.im);
        self.steps += 1;
    }

    /// Advance by `n` time steps.
    pub fn step_n(&mut self, n: usize) {
        (0..n).for_each(|_| self.step());
    }

    /// Consume `self`, returning the final state.
    pub fn into_state(self) -> WaveFunction { self.psi }
}
