//! Rule 30 - Parallel elementary cellular automaton engine.
//!
//! This crate evolves a one-dimensional binary lattice under Wolfram's
//! Rule 30 with fixed inactive boundaries, records the complete state
//! history, and reduces every generation to information metrics
//! (Shannon entropy and local complexity).
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration types and validation for simulations
//! - `compute`: Numerical computation (transition kernel, evolution
//!   engine, row metrics)
//!
//! # Example
//!
//! ```rust
//! use rule30::{
//!     compute::EvolutionEngine,
//!     schema::SimulationConfig,
//! };
//!
//! // Create configuration
//! let config = SimulationConfig {
//!     width: 101,
//!     steps: 50,
//!     ..SimulationConfig::default()
//! };
//!
//! // Create engine and run the full evolution
//! let engine = EvolutionEngine::new(config).expect("valid configuration");
//! let result = engine.evolve().expect("evolution");
//!
//! println!(
//!     "Mean entropy over {} rows: {:.4}",
//!     result.grid.rows(),
//!     result.stats.mean_entropy
//! );
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{EngineError, EvolutionEngine, EvolutionResult, EvolutionStats, StateHistory};
pub use schema::{ConfigError, InitialCondition, SimulationConfig};
