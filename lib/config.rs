//! TOML run configuration.
//!
//! ```toml
//! [params]
//! points = 101
//! strength = 0.5
//!
//! [run]
//! record_every = 10
//! norm_tolerance = 1e-3
//! ```

use std::path::{ Path, PathBuf };
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ BoxError, BoxResult },
    params::Params,
};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "driven_box.toml";

/// Options controlling how a run is driven and written, as opposed to the
/// physics in [`Params`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOptions {
    /// Emit a record every this many steps.
    pub record_every: usize,
    /// Stop once the relative norm deviation from the first record exceeds
    /// this.
    pub norm_tolerance: Option<f64>,
    /// Evaluate the Hamiltonian stencil in parallel.
    pub parallel: bool,
    /// Size of the global rayon pool; rayon's default if unset.
    pub threads: Option<usize>,
    /// Output directory.
    pub outdir: PathBuf,
    /// Also write the final state and record columns to `data.npz`.
    pub snapshot: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            record_every: 1,
            norm_tolerance: None,
            parallel: false,
            threads: None,
            outdir: PathBuf::from("output/driven_box"),
            snapshot: true,
        }
    }
}

impl RunOptions {
    /// Check all preconditions.
    pub fn validate(&self) -> BoxResult<()> {
        if self.record_every == 0 {
            return Err(BoxError::ZeroRecordInterval);
        }
        if let Some(tol) = self.norm_tolerance {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(BoxError::BadTolerance(tol));
            }
        }
        Ok(())
    }
}

/// Complete configuration for a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub params: Params,
    pub run: RunOptions,
}

impl Config {
    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> BoxResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a configuration file.
    pub fn load<P>(path: P) -> BoxResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let contents
            = std::fs::read_to_string(path)
            .map_err(|source| BoxError::ConfigRead {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P>(path: P) -> BoxResult<Self>
    where P: AsRef<Path>
    {
        if path.as_ref().is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check all preconditions.
    pub fn validate(&self) -> BoxResult<()> {
        self.params.validate()?;
        self.run.validate()
    }
}
