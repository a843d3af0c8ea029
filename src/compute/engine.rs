//! Evolution engine - main simulation driver for Rule 30 runs.
//!
//! Owns the state history and the worker pool, and enforces the
//! generation-order barrier between parallel row computations.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, InitialCondition, SimulationConfig};

use super::{density, local_complexity, mean, shannon_entropy, std_dev, step_into};

/// Dense history of lattice rows, one per generation.
///
/// Stored as a single row-major allocation indexed `[time][position]`.
/// The engine fills it exactly once; afterwards it is a read-only artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateHistory {
    cells: Vec<u8>,
    width: usize,
    rows: usize,
}

impl StateHistory {
    /// Allocate a zeroed history of `rows` x `width` cells.
    ///
    /// The extent is checked and the buffer reserved fallibly, so an
    /// oversized run surfaces as an error instead of aborting the process.
    fn new(rows: usize, width: usize) -> Result<Self, EngineError> {
        let len = rows
            .checked_mul(width)
            .ok_or(EngineError::HistoryTooLarge { rows, width })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|source| EngineError::Allocation {
                rows,
                width,
                source,
            })?;
        cells.resize(len, 0);
        Ok(Self { cells, width, rows })
    }

    /// Number of stored rows (`steps + 1`).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Lattice width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// One generation as a read-only row.
    #[inline]
    pub fn row(&self, t: usize) -> &[u8] {
        &self.cells[t * self.width..(t + 1) * self.width]
    }

    /// Cell state at generation `t`, position `x`.
    #[inline]
    pub fn get(&self, t: usize, x: usize) -> u8 {
        self.cells[t * self.width + x]
    }

    /// Iterate rows in time order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.width)
    }

    /// The whole history as one row-major slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Split into the finished row `t - 1` and the writable row `t`.
    fn rows_pair_mut(&mut self, t: usize) -> (&[u8], &mut [u8]) {
        let (done, rest) = self.cells.split_at_mut(t * self.width);
        (&done[(t - 1) * self.width..], &mut rest[..self.width])
    }
}

/// Drives a full Rule 30 run: seeds generation 0, then computes each
/// subsequent row in parallel chunks over a fixed worker pool.
pub struct EvolutionEngine {
    config: SimulationConfig,
    pool: rayon::ThreadPool,
}

impl EvolutionEngine {
    /// Create an engine from a configuration, rejecting invalid parameters
    /// before any computation.
    ///
    /// The worker pool is built here and its size never changes for the
    /// engine's lifetime.
    pub fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.n_cores)
            .build()?;
        log::debug!("worker pool ready with {} threads", config.n_cores);
        Ok(Self { config, pool })
    }

    /// Configuration reference.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the configured number of generations and reduce every completed
    /// row to its entropy and complexity.
    ///
    /// Row `t` is split into exactly `n_cores` contiguous chunks computed
    /// concurrently from the finalized row `t - 1`; the pool joins all
    /// chunks before the next generation starts, so the outcome is
    /// bit-identical for any worker count.
    pub fn evolve(&self) -> Result<EvolutionResult, EngineError> {
        let width = self.config.width;
        let rows = self
            .config
            .steps
            .checked_add(1)
            .ok_or(EngineError::HistoryTooLarge {
                rows: usize::MAX,
                width,
            })?;

        let mut history = StateHistory::new(rows, width)?;
        match self.config.initial_condition {
            InitialCondition::Single => {
                // Row 0 starts at offset 0 of the flat buffer.
                history.cells[self.config.center()] = 1;
            }
        }

        let mut entropy = Vec::with_capacity(rows);
        let mut complexity = Vec::with_capacity(rows);
        entropy.push(shannon_entropy(history.row(0)));
        complexity.push(local_complexity(history.row(0)));

        log::debug!(
            "evolving {} generations over {} cells with {} workers",
            self.config.steps,
            width,
            self.config.n_cores
        );

        for t in 1..rows {
            let parts = self.config.n_cores;
            let (prev, next) = history.rows_pair_mut(t);
            self.pool.install(|| {
                partition_mut(next, parts)
                    .into_par_iter()
                    .for_each(|(start, chunk)| step_into(prev, start, chunk));
            });

            let row = history.row(t);
            entropy.push(shannon_entropy(row));
            complexity.push(local_complexity(row));
        }

        let stats = EvolutionStats::from_series(&entropy, &complexity, history.row(rows - 1));
        log::debug!(
            "evolution complete: mean entropy {:.4}, mean complexity {:.4}",
            stats.mean_entropy,
            stats.mean_complexity
        );

        Ok(EvolutionResult {
            grid: history,
            entropy,
            complexity,
            stats,
        })
    }
}

/// Split `row` into exactly `parts` contiguous chunks tagged with their
/// start position. Each chunk gets `len / parts` cells; the last absorbs
/// the remainder.
fn partition_mut(mut row: &mut [u8], parts: usize) -> Vec<(usize, &mut [u8])> {
    let base = row.len() / parts;
    let mut chunks = Vec::with_capacity(parts);
    let mut start = 0;
    for k in 0..parts {
        let take = if k + 1 == parts { row.len() } else { base };
        let (head, tail) = row.split_at_mut(take);
        chunks.push((start, head));
        start += take;
        row = tail;
    }
    chunks
}

/// Complete artifact set from one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Full state history, `steps + 1` rows of `width` cells.
    pub grid: StateHistory,
    /// Shannon entropy per generation, aligned with `grid` rows.
    pub entropy: Vec<f64>,
    /// Local complexity per generation, aligned with `grid` rows.
    pub complexity: Vec<f64>,
    /// Run-level statistics.
    pub stats: EvolutionStats,
}

/// Run-level statistics over the metric series and the final row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Mean of the entropy series.
    pub mean_entropy: f64,
    /// Population standard deviation of the entropy series.
    pub std_entropy: f64,
    /// Mean of the complexity series.
    pub mean_complexity: f64,
    /// Population standard deviation of the complexity series.
    pub std_complexity: f64,
    /// Fraction of active cells in the final row.
    pub final_density: f64,
}

impl EvolutionStats {
    /// Reduce the finished metric series and final row to run statistics.
    pub fn from_series(entropy: &[f64], complexity: &[f64], final_row: &[u8]) -> Self {
        Self {
            mean_entropy: mean(entropy),
            std_entropy: std_dev(entropy),
            mean_complexity: mean(complexity),
            std_complexity: std_dev(complexity),
            final_density: density(final_row),
        }
    }
}

/// Fatal engine failures.
///
/// Configuration problems are caught before any computation and resource
/// failures surface immediately. Nothing here is retryable: identical
/// input yields an identical outcome.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Rejected configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The worker pool could not be constructed.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// `rows * width` cells do not fit the address space.
    #[error("State history of {rows} x {width} cells exceeds addressable memory")]
    HistoryTooLarge { rows: usize, width: usize },
    /// The history buffer could not be allocated.
    #[error("Failed to allocate state history of {rows} x {width} cells")]
    Allocation {
        rows: usize,
        width: usize,
        #[source]
        source: std::collections::TryReserveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(width: usize, steps: usize, n_cores: usize) -> SimulationConfig {
        SimulationConfig {
            width,
            steps,
            n_cores,
            initial_condition: InitialCondition::Single,
            center_position: None,
        }
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        assert!(matches!(
            EvolutionEngine::new(test_config(0, 10, 1)),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EvolutionEngine::new(test_config(10, 10, 0)),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_oversized_history_is_rejected() {
        // Three rows of usize::MAX cells overflow the cell count.
        let engine = EvolutionEngine::new(test_config(usize::MAX, 2, 1)).unwrap();
        assert!(matches!(
            engine.evolve(),
            Err(EngineError::HistoryTooLarge { .. })
        ));
    }

    #[test]
    fn test_unallocatable_history_is_rejected() {
        // One row of usize::MAX cells fails the fallible reserve.
        let engine = EvolutionEngine::new(test_config(usize::MAX, 0, 1)).unwrap();
        assert!(matches!(engine.evolve(), Err(EngineError::Allocation { .. })));
    }

    #[test]
    fn test_history_shape_and_binary_cells() {
        let engine = EvolutionEngine::new(test_config(31, 12, 2)).unwrap();
        let result = engine.evolve().unwrap();

        assert_eq!(result.grid.rows(), 13);
        assert_eq!(result.grid.width(), 31);
        assert_eq!(result.entropy.len(), 13);
        assert_eq!(result.complexity.len(), 13);
        assert!(result.grid.as_slice().iter().all(|&c| c <= 1));

        let views: Vec<&[u8]> = result.grid.iter_rows().collect();
        assert_eq!(views.len(), result.grid.rows());
        for (t, view) in views.iter().enumerate() {
            assert_eq!(
                *view,
                result.grid.row(t),
                "row view mismatch at generation {}",
                t
            );
        }

        for (t, (h, c)) in result.entropy.iter().zip(&result.complexity).enumerate() {
            assert!(
                (0.0..=1.0).contains(h),
                "entropy {} out of range at generation {}",
                h,
                t
            );
            assert!(
                (0.0..=1.0).contains(c),
                "complexity {} out of range at generation {}",
                c,
                t
            );
        }
    }

    #[test]
    fn test_initial_row_has_single_seed() {
        let engine = EvolutionEngine::new(test_config(21, 0, 1)).unwrap();
        let result = engine.evolve().unwrap();

        let row0 = result.grid.row(0);
        assert_eq!(row0.iter().map(|&c| c as usize).sum::<usize>(), 1);
        assert_eq!(result.grid.get(0, 10), 1);
    }

    #[test]
    fn test_center_override_moves_seed() {
        let config = SimulationConfig {
            center_position: Some(3),
            ..test_config(21, 0, 1)
        };
        let result = EvolutionEngine::new(config).unwrap().evolve().unwrap();

        assert_eq!(result.grid.get(0, 3), 1);
        let active: usize = result.grid.row(0).iter().map(|&c| c as usize).sum();
        assert_eq!(active, 1);
    }

    #[test]
    fn test_first_generations_match_hand_applied_rule() {
        // Row 2 drives both edge cells active through the fixed boundary
        // reads.
        let result = EvolutionEngine::new(test_config(5, 2, 1))
            .unwrap()
            .evolve()
            .unwrap();
        assert_eq!(result.grid.row(0), [0, 0, 1, 0, 0]);
        assert_eq!(result.grid.row(1), [0, 1, 1, 1, 0]);
        assert_eq!(result.grid.row(2), [1, 1, 0, 0, 1]);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let config = test_config(101, 50, 4);
        let a = EvolutionEngine::new(config.clone()).unwrap().evolve().unwrap();
        let b = EvolutionEngine::new(config).unwrap().evolve().unwrap();

        assert_eq!(a.grid.as_slice(), b.grid.as_slice());
        assert_eq!(a.entropy, b.entropy);
        assert_eq!(a.complexity, b.complexity);
    }

    #[test]
    fn test_worker_count_does_not_change_outcome() {
        let serial = EvolutionEngine::new(test_config(101, 50, 1))
            .unwrap()
            .evolve()
            .unwrap();

        for n_cores in [2, 4, SimulationConfig::default().n_cores] {
            let parallel = EvolutionEngine::new(test_config(101, 50, n_cores))
                .unwrap()
                .evolve()
                .unwrap();
            assert_eq!(
                serial.grid.as_slice(),
                parallel.grid.as_slice(),
                "grid diverged with {} workers",
                n_cores
            );
            assert_eq!(serial.entropy, parallel.entropy);
            assert_eq!(serial.complexity, parallel.complexity);
        }
    }

    #[test]
    fn test_workers_exceeding_width_are_harmless() {
        // More chunks than cells leaves every chunk but the last empty.
        let serial = EvolutionEngine::new(test_config(3, 4, 1))
            .unwrap()
            .evolve()
            .unwrap();
        let crowded = EvolutionEngine::new(test_config(3, 4, 8))
            .unwrap()
            .evolve()
            .unwrap();
        assert_eq!(serial.grid.as_slice(), crowded.grid.as_slice());
    }

    #[test]
    fn test_edges_stay_inactive_until_front_arrives() {
        // The active region grows one cell per side per generation and the
        // outer diagonals are solid active cells, so from a centered seed
        // the front lands exactly on the lattice edges at
        // t = (width - 1) / 2.
        let result = EvolutionEngine::new(test_config(251, 125, 4))
            .unwrap()
            .evolve()
            .unwrap();

        for t in 0..125 {
            let row = result.grid.row(t);
            assert_eq!(row[0], 0, "left edge active early at generation {}", t);
            assert_eq!(row[250], 0, "right edge active early at generation {}", t);
        }

        let arrival = result.grid.row(125);
        assert_eq!(arrival[0], 1);
        assert_eq!(arrival[250], 1);
    }

    #[test]
    fn test_width_one_lattice_is_stationary() {
        let result = EvolutionEngine::new(test_config(1, 5, 1))
            .unwrap()
            .evolve()
            .unwrap();
        for t in 0..=5 {
            assert_eq!(result.grid.row(t), [1], "generation {}", t);
        }
        assert!(result.entropy.iter().all(|&h| h == 0.0));
        assert!(result.complexity.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_stats_summarize_series() {
        let result = EvolutionEngine::new(test_config(31, 10, 2))
            .unwrap()
            .evolve()
            .unwrap();

        let expected_mean =
            result.complexity.iter().sum::<f64>() / result.complexity.len() as f64;
        assert!((result.stats.mean_complexity - expected_mean).abs() < 1e-12);

        let ones: usize = result.grid.row(10).iter().map(|&c| c as usize).sum();
        assert_eq!(result.stats.final_density, ones as f64 / 31.0);
    }

    #[test]
    fn test_partition_covers_row_without_overlap() {
        let mut row = vec![0u8; 10];
        let chunks = partition_mut(&mut row, 4);

        assert_eq!(chunks.len(), 4);
        let spans: Vec<(usize, usize)> = chunks.iter().map(|(s, c)| (*s, c.len())).collect();
        assert_eq!(spans, [(0, 2), (2, 2), (4, 2), (6, 4)]);
    }

    #[test]
    fn test_partition_with_more_parts_than_cells() {
        let mut row = vec![0u8; 3];
        let chunks = partition_mut(&mut row, 8);

        assert_eq!(chunks.len(), 8);
        let total: usize = chunks.iter().map(|(_, c)| c.len()).sum();
        assert_eq!(total, 3);
        assert_eq!(chunks[7].1.len(), 3);
    }
}
