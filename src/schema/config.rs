//! Configuration types for analysis runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_groups() -> Vec<usize> {
    vec![2, 3, 4]
}

fn default_growth_steps() -> u64 {
    1000
}

fn default_census_steps() -> u64 {
    1001
}

/// Shape and sampling parameters for one growth-tensor build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorParams {
    /// Stride between sampled steps. Steps 0, step_size, 2*step_size, ...
    /// below num_steps are materialized.
    pub step_size: u64,
    /// Tensor row capacity. The realized seed count may be lower.
    pub max_seeds: usize,
    /// Simulation horizon; valid step numbers are [0, num_steps).
    pub num_steps: u64,
    /// Number of parts tracked per seed.
    pub num_parts: usize,
}

impl Default for TensorParams {
    fn default() -> Self {
        Self {
            step_size: 20,
            max_seeds: 2000,
            num_steps: 1001,
            num_parts: 3,
        }
    }
}

impl TensorParams {
    /// Validate tensor shape parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_steps == 0 {
            return Err(ConfigError::InvalidSteps);
        }
        if self.step_size == 0 {
            return Err(ConfigError::InvalidStepSize);
        }
        if self.max_seeds == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if self.num_parts == 0 {
            return Err(ConfigError::InvalidParts);
        }
        Ok(())
    }
}

/// Parameters forwarded to the engine for one-on-one part competitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionParams {
    /// Arena width relative to the combined part size.
    pub width_factor: f64,
    /// Arena height relative to the combined part size.
    pub height_factor: f64,
    /// Contest length relative to the arena size.
    pub time_factor: f64,
    /// Number of bouts aggregated into one score pair.
    pub num_trials: u32,
}

impl Default for CompetitionParams {
    fn default() -> Self {
        Self {
            width_factor: 6.0,
            height_factor: 3.0,
            time_factor: 6.0,
            num_trials: 500,
        }
    }
}

/// One analysis task, selected by the `mode` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisTask {
    /// Manager-count distribution over the population at each sampled step.
    Population {
        #[serde(default)]
        tensor: TensorParams,
    },
    /// Compare manager status against single-part Game of Life growth.
    GuessByGrowth {
        /// Part-count groups processed one at a time.
        #[serde(default = "default_groups")]
        groups: Vec<usize>,
        /// Game of Life horizon for the growth measurement.
        #[serde(default = "default_growth_steps")]
        growth_steps: u64,
        /// Management-game horizon for the classification census.
        #[serde(default = "default_census_steps")]
        census_steps: u64,
    },
    /// Compare manager status against mean pairwise-competition score.
    GuessByCompetition {
        #[serde(default = "default_groups")]
        groups: Vec<usize>,
        #[serde(default)]
        competition: CompetitionParams,
        #[serde(default = "default_census_steps")]
        census_steps: u64,
    },
}

impl AnalysisTask {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            AnalysisTask::Population { tensor } => tensor.validate(),
            AnalysisTask::GuessByGrowth {
                groups,
                growth_steps,
                census_steps,
            } => {
                validate_groups(groups)?;
                if *growth_steps == 0 {
                    return Err(ConfigError::InvalidSteps);
                }
                validate_census_steps(*census_steps)
            }
            AnalysisTask::GuessByCompetition {
                groups,
                competition,
                census_steps,
            } => {
                validate_groups(groups)?;
                if competition.num_trials == 0 {
                    return Err(ConfigError::InvalidTrials);
                }
                validate_census_steps(*census_steps)
            }
        }
    }
}

fn validate_groups(groups: &[usize]) -> Result<(), ConfigError> {
    if groups.is_empty() {
        return Err(ConfigError::NoGroups);
    }
    if groups.iter().any(|&g| g < 2) {
        return Err(ConfigError::InvalidGroup);
    }
    Ok(())
}

// The classification census is taken at the final step, reached in one
// giant stride from step 0, so the horizon must cover at least two steps.
fn validate_census_steps(census_steps: u64) -> Result<(), ConfigError> {
    if census_steps < 2 {
        return Err(ConfigError::InvalidSteps);
    }
    Ok(())
}

/// Top-level analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Seed container files, processed in order.
    pub seed_paths: Vec<PathBuf>,
    /// Recorded engine transcript to replay.
    pub transcript_path: PathBuf,
    /// Report destination.
    pub output_path: PathBuf,
    /// The task to run.
    pub task: AnalysisTask,
}

impl AnalysisConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed_paths.is_empty() {
            return Err(ConfigError::NoSeedPaths);
        }
        self.task.validate()
    }

    /// Example configuration for `--example` output.
    pub fn example() -> Self {
        Self {
            seed_paths: vec![
                PathBuf::from("run1/seeds.json"),
                PathBuf::from("run2/seeds.json"),
            ],
            transcript_path: PathBuf::from("transcript.json"),
            output_path: PathBuf::from("population.txt"),
            task: AnalysisTask::Population {
                tensor: TensorParams::default(),
            },
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("step counts must be non-zero (census horizons need at least 2 steps)")]
    InvalidSteps,
    #[error("step_size must be non-zero")]
    InvalidStepSize,
    #[error("max_seeds must be non-zero")]
    InvalidCapacity,
    #[error("num_parts must be non-zero")]
    InvalidParts,
    #[error("no seed container paths given")]
    NoSeedPaths,
    #[error("no part-count groups given")]
    NoGroups,
    #[error("part-count groups must each be at least 2")]
    InvalidGroup,
    #[error("num_trials must be non-zero")]
    InvalidTrials,
}
