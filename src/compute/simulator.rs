//! Boundary traits for the external cellular-automaton engine.
//!
//! The engine itself (the management-game rule set, the Game of Life,
//! and region segmentation geometry) lives outside this crate. These
//! traits describe exactly what the analysis consumes from it.

use serde::{Deserialize, Serialize};

use crate::schema::{CompetitionParams, Part, RegionMap, Seed};

/// Number of colour channels tracked per part.
pub const NUM_COLOURS: usize = 5;

/// Colour channels of the management game, in storage order.
///
/// Red always denotes the part currently under focus, by convention of
/// the underlying game; the classification rule reads only orange and
/// green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colour {
    White = 0,
    Red = 1,
    Blue = 2,
    Orange = 3,
    Green = 4,
}

impl Colour {
    /// All channels in storage order.
    pub const ALL: [Colour; NUM_COLOURS] = [
        Colour::White,
        Colour::Red,
        Colour::Blue,
        Colour::Orange,
        Colour::Green,
    ];

    /// Channel index within a census.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Live-cell counts by colour for one part at one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColourCounts([u32; NUM_COLOURS]);

impl ColourCounts {
    pub fn new(counts: [u32; NUM_COLOURS]) -> Self {
        Self(counts)
    }

    /// Count for one channel.
    #[inline]
    pub fn get(&self, colour: Colour) -> u32 {
        self.0[colour.index()]
    }
}

/// Synchronous interface to the external simulation engine.
///
/// All calls block until the engine has produced a complete result;
/// there is no streaming or partial-result consumption.
pub trait Simulator {
    /// Load `seed` into the management game at generation zero.
    fn reset(&mut self, seed: &Seed) -> Result<(), SimulatorError>;

    /// Advance the current management-game run by `steps` generations.
    fn advance(&mut self, steps: u64) -> Result<(), SimulatorError>;

    /// Colour census for one part (0-based) at the current generation.
    fn part_census(&mut self, part: usize) -> Result<ColourCounts, SimulatorError>;

    /// Run `part` alone under the Game of Life for `num_steps` and
    /// return its growth measure.
    fn measure_growth(&mut self, part: &Part, num_steps: u64) -> Result<i64, SimulatorError>;

    /// Run one-on-one contests between two parts and return their
    /// aggregate scores over `params.num_trials` bouts.
    fn score_competition(
        &mut self,
        first: &Part,
        second: &Part,
        params: &CompetitionParams,
    ) -> Result<(f64, f64), SimulatorError>;
}

/// Interface to the external region-segmentation collaborator.
pub trait Segmenter {
    /// Partition a seed's pattern into numbered contiguous regions.
    fn region_map(&self, seed: &Seed) -> Result<RegionMap, SimulatorError>;

    /// Materialize region `region` (1-based) as an independent pattern.
    fn extract_part(
        &self,
        seed: &Seed,
        map: &RegionMap,
        region: u32,
    ) -> Result<Part, SimulatorError>;
}

/// Failures crossing the engine boundary.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("no recorded run for seed '{0}'")]
    UnknownSeed(String),
    #[error("no census recorded for seed '{seed}' at generation {generation}")]
    MissingCensus { seed: String, generation: u64 },
    #[error(
        "census for seed '{seed}' at generation {generation} covers {recorded} parts, \
         part {part} requested"
    )]
    MissingPart {
        seed: String,
        generation: u64,
        recorded: usize,
        part: usize,
    },
    #[error("no growth measurement recorded for part '{0}'")]
    MissingGrowth(String),
    #[error("no competition recorded between '{first}' and '{second}'")]
    MissingCompetition { first: String, second: String },
    #[error("no region labeling recorded for seed '{0}'")]
    MissingRegionMap(String),
    #[error("region labeling for seed '{seed}' covers {labeled} cells, seed has {cells}")]
    RegionShape {
        seed: String,
        labeled: usize,
        cells: usize,
    },
    #[error("region {region} of seed '{seed}' has no cells")]
    EmptyRegion { seed: String, region: u32 },
    #[error("no run loaded; call reset first")]
    NoActiveRun,
    #[error("transcript I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("transcript parse: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_indices_match_storage_order() {
        assert_eq!(Colour::White.index(), 0);
        assert_eq!(Colour::Red.index(), 1);
        assert_eq!(Colour::Blue.index(), 2);
        assert_eq!(Colour::Orange.index(), 3);
        assert_eq!(Colour::Green.index(), 4);
    }

    #[test]
    fn test_colour_counts_lookup() {
        let counts = ColourCounts::new([10, 4, 0, 7, 2]);
        assert_eq!(counts.get(Colour::Red), 4);
        assert_eq!(counts.get(Colour::Orange), 7);
        assert_eq!(counts.get(Colour::Green), 2);
    }
}
