//! Configuration types for Rule 30 simulation runs.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Default worker count: one per available hardware thread.
fn default_n_cores() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Lattice width in cells. An odd width keeps a true center cell.
    pub width: usize,
    /// Number of generations to evolve beyond the initial row.
    ///
    /// The stored history holds `steps + 1` rows. From a centered seed the
    /// expanding pattern reaches the lattice edges at generation
    /// `(width - 1) / 2`; boundary effects can alter the pattern only
    /// beyond that point.
    pub steps: usize,
    /// Number of parallel workers for row computation.
    ///
    /// Resolved to the host's available parallelism when absent.
    #[serde(default = "default_n_cores")]
    pub n_cores: usize,
    /// Initial lattice seeding policy.
    #[serde(default)]
    pub initial_condition: InitialCondition,
    /// Position of the seeded cell. `None` selects `width / 2`.
    #[serde(default)]
    pub center_position: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 501,
            steps: 250,
            n_cores: default_n_cores(),
            initial_condition: InitialCondition::Single,
            center_position: None,
        }
    }
}

/// Initial-condition kinds for the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialCondition {
    /// Single active cell at the center position, all others inactive.
    #[default]
    Single,
}

impl SimulationConfig {
    /// Effective seed position: the configured center or `width / 2`.
    #[inline]
    pub fn center(&self) -> usize {
        self.center_position.unwrap_or(self.width / 2)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::InvalidWidth);
        }
        if self.n_cores == 0 {
            return Err(ConfigError::InvalidCores);
        }
        if let Some(center) = self.center_position {
            if center >= self.width {
                return Err(ConfigError::InvalidCenter {
                    center,
                    width: self.width,
                });
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Lattice width must be non-zero")]
    InvalidWidth,
    #[error("Worker count must be non-zero")]
    InvalidCores,
    #[error("Center position {center} lies outside the lattice (width {width})")]
    InvalidCenter { center: usize, width: usize },
}
