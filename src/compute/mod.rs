//! Compute module - Numerical computation for Rule 30.

mod engine;
mod metrics;
mod rule;

pub use engine::*;
pub use metrics::*;
pub use rule::*;
