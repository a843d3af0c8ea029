//! Schema module - Configuration types for Rule 30 simulations.

mod config;

pub use config::*;
