//! Error taxonomy for the analysis pipeline.

use super::simulator::SimulatorError;

/// Unrecoverable failures of one analysis batch.
///
/// Integrity and shape violations abort the batch; they are never
/// silently corrected or skipped. Insufficient-sample conditions are
/// not errors and are carried in the reports instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Population-conservation check failed: the manager-count buckets
    /// do not partition the seed population.
    #[error("population drift at step {step}: bucket counts sum to {counted}, expected {expected}")]
    PopulationDrift {
        step: u64,
        counted: usize,
        expected: usize,
    },
    /// More seeds admitted than the tensor has row capacity for.
    #[error("{admitted} seeds admitted but tensor capacity is {capacity}")]
    SeedOverflow { admitted: usize, capacity: usize },
    /// No seeds matched the part-count filter.
    #[error("no seeds admitted for {num_parts}-part analysis")]
    EmptyPopulation { num_parts: usize },
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}
