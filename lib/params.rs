//! Physical and numerical parameters of a driven-box simulation.

use std::f64::consts::PI;
use serde::{ Deserialize, Serialize };
use crate::error::{ BoxError, BoxResult };

/// Number of grid points.
pub const DEF_POINTS: usize = 101;
/// Index of the initial box eigenstate.
pub const DEF_EIGENSTATE: usize = 1;
/// Drive frequency, resonant with the 1 → 2 transition (E₂ - E₁ = 3π²/2).
pub const DEF_FREQUENCY: f64 = 1.5 * PI * PI;
/// Drive strength.
pub const DEF_STRENGTH: f64 = 1.0;
/// Time step.
pub const DEF_DT: f64 = 1e-4;
/// Total simulated time.
pub const DEF_HORIZON: f64 = 20.0;

/// Largest admissible `horizon / dt`, beyond which step indices are no longer
/// exact as `f64`.
pub const MAX_STEPS: f64 = 9_007_199_254_740_992.0; // 2^53

/// Immutable simulation parameters.
///
/// Every field has a default, so a TOML table only needs to name the values
/// it changes. Construct through [`Params::new`] or call [`Params::validate`]
/// before use; nothing downstream re-checks these values.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    /// Number of grid points *N*, including both walls.
    pub points: usize,
    /// Index *n* ≥ 1 of the initial eigenstate.
    pub eigenstate: usize,
    /// Drive angular frequency ω.
    pub frequency: f64,
    /// Drive strength *k*.
    pub strength: f64,
    /// Fixed time step.
    pub dt: f64,
    /// Total simulated time.
    pub horizon: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            points: DEF_POINTS,
            eigenstate: DEF_EIGENSTATE,
            frequency: DEF_FREQUENCY,
            strength: DEF_STRENGTH,
            dt: DEF_DT,
            horizon: DEF_HORIZON,
        }
    }
}

impl Params {
    /// Create a new, validated `Params`.
    pub fn new(
        points: usize,
        eigenstate: usize,
        frequency: f64,
        strength: f64,
        dt: f64,
        horizon: f64,
    ) -> BoxResult<Self>
    {
        let params = Self { points, eigenstate, frequency, strength, dt, horizon };
        params.validate()?;
        Ok(params)
    }

    /// Check all preconditions.
    pub fn validate(&self) -> BoxResult<()> {
        if self.points < 2 {
            return Err(BoxError::TooFewPoints(self.points));
        }
        if self.eigenstate == 0 {
            return Err(BoxError::ZeroEigenstate);
        }
        if !self.frequency.is_finite() {
            return Err(BoxError::NonFinite {
                name: "frequency",
                value: self.frequency,
            });
        }
        if !self.strength.is_finite() {
            return Err(BoxError::NonFinite {
                name: "strength",
                value: self.strength,
            });
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(BoxError::BadTimeStep(self.dt));
        }
        if !(self.horizon.is_finite() && self.horizon >= 0.0) {
            return Err(BoxError::BadHorizon(self.horizon));
        }
        if !(self.horizon / self.dt <= MAX_STEPS) {
            return Err(BoxError::BadHorizon(self.horizon));
        }
        Ok(())
    }

    /// Grid spacing for the unit box.
    pub fn dx(&self) -> f64 { 1.0 / (self.points - 1) as f64 }

    /// Number of integrator steps in a run, i.e. the number of times
    /// `k * dt` with `k = 0, 1, ...` that fall strictly before the horizon.
    ///
    /// Assumes `self` has passed [`Self::validate`].
    pub fn num_steps(&self) -> usize {
        let mut n = (self.horizon / self.dt).ceil() as usize;
        while n > 0 && (n - 1) as f64 * self.dt >= self.horizon { n -= 1; }
        while (n as f64) * self.dt < self.horizon { n += 1; }
        n
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f,
            "N = {}, n = {}, ω = {}, k = {}, dt = {}, horizon = {}",
            self.points,
            self.eigenstate,
            self.frequency,
            self.strength,
            self.dt,
            self.horizon,
        )
    }
}
