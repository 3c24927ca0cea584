//! Error types.

use thiserror::Error;

/// Everything that can go wrong while setting up or running a simulation.
///
/// Numerical blow-up is not detected by the integrator itself; it only
/// surfaces as [`BoxError::Diverged`] when a [`NormMonitor`] is in use.
///
/// [`NormMonitor`]: crate::diagnostics::NormMonitor
#[derive(Debug, Error)]
pub enum BoxError {
    #[error("grid needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("invalid domain [{0}, {1}]")]
    BadDomain(f64, f64),

    #[error("eigenstate index must be at least 1")]
    ZeroEigenstate,

    #[error("time step must be positive and finite, got {0}")]
    BadTimeStep(f64),

    #[error("time horizon must be non-negative and finite, got {0}")]
    BadHorizon(f64),

    #[error("parameter `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("record interval must be at least 1")]
    ZeroRecordInterval,

    #[error("norm tolerance must be positive and finite, got {0}")]
    BadTolerance(f64),

    #[error("array length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("wavefunction must vanish at the box walls")]
    NonZeroBoundary,

    #[error(
        "norm diverged at t = {time}: {norm} \
        (reference {reference}, tolerance {tolerance})"
    )]
    Diverged { time: f64, norm: f64, reference: f64, tolerance: f64 },

    #[error("unable to read config {path}: {source}")]
    ConfigRead { path: String, source: std::io::Error },

    #[error("unable to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Npz(#[from] ndarray_npy::WriteNpzError),
}

pub type BoxResult<T> = Result<T, BoxError>;
