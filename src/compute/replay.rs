//! Replay of recorded engine transcripts.
//!
//! The original experiments drive a live automaton engine; recording its
//! numeric output once and replaying it here keeps the analysis
//! reproducible and engine-free. A transcript stores, per seed, the
//! region labeling, the per-generation colour censuses, and the growth
//! and competition measurements for its parts. [`ReplaySimulator`] and
//! [`ReplaySegmenter`] serve that data through the boundary traits.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::{CompetitionParams, Part, RegionMap, Seed};

use super::simulator::{ColourCounts, Segmenter, Simulator, SimulatorError};

/// Recorded engine output for a whole corpus, keyed by seed name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    pub runs: HashMap<String, RecordedRun>,
}

/// Recorded engine output for one seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedRun {
    /// Row-major region labeling of the seed's grid, 1-based labels.
    #[serde(default)]
    pub region_labels: Vec<u32>,
    /// Management-game censuses: generation -> per-part colour counts.
    #[serde(default)]
    pub census: HashMap<u64, Vec<ColourCounts>>,
    /// Game of Life growth measures, keyed by region number.
    #[serde(default)]
    pub growth: HashMap<u32, i64>,
    /// One-on-one competition outcomes between this seed's parts.
    #[serde(default)]
    pub competitions: Vec<CompetitionRecord>,
}

/// Aggregate scores of one recorded competition pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompetitionRecord {
    /// Region number of the first contestant.
    pub first: u32,
    /// Region number of the second contestant.
    pub second: u32,
    pub first_score: f64,
    pub second_score: f64,
}

impl Transcript {
    /// Load a transcript from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimulatorError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save a transcript to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SimulatorError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn run(&self, seed: &str) -> Result<&RecordedRun, SimulatorError> {
        self.runs
            .get(seed)
            .ok_or_else(|| SimulatorError::UnknownSeed(seed.to_string()))
    }
}

/// Replays recorded management-game runs and part measurements.
///
/// Holds a cursor over one run at a time; [`Simulator::reset`] selects
/// the run and rewinds the generation counter.
#[derive(Debug)]
pub struct ReplaySimulator<'a> {
    transcript: &'a Transcript,
    seed: Option<String>,
    generation: u64,
}

impl<'a> ReplaySimulator<'a> {
    pub fn new(transcript: &'a Transcript) -> Self {
        Self {
            transcript,
            seed: None,
            generation: 0,
        }
    }

    fn active_run(&self) -> Result<(&str, &'a RecordedRun), SimulatorError> {
        let seed = self.seed.as_deref().ok_or(SimulatorError::NoActiveRun)?;
        Ok((seed, self.transcript.run(seed)?))
    }
}

impl Simulator for ReplaySimulator<'_> {
    fn reset(&mut self, seed: &Seed) -> Result<(), SimulatorError> {
        // Fail at reset, not at the first census, when a seed was never recorded.
        self.transcript.run(&seed.name)?;
        self.seed = Some(seed.name.clone());
        self.generation = 0;
        Ok(())
    }

    fn advance(&mut self, steps: u64) -> Result<(), SimulatorError> {
        if self.seed.is_none() {
            return Err(SimulatorError::NoActiveRun);
        }
        self.generation += steps;
        Ok(())
    }

    fn part_census(&mut self, part: usize) -> Result<ColourCounts, SimulatorError> {
        let generation = self.generation;
        let (seed, run) = self.active_run()?;

        let counts = run
            .census
            .get(&generation)
            .ok_or_else(|| SimulatorError::MissingCensus {
                seed: seed.to_string(),
                generation,
            })?;

        counts
            .get(part)
            .copied()
            .ok_or_else(|| SimulatorError::MissingPart {
                seed: seed.to_string(),
                generation,
                recorded: counts.len(),
                part,
            })
    }

    fn measure_growth(&mut self, part: &Part, _num_steps: u64) -> Result<i64, SimulatorError> {
        self.transcript
            .run(&part.seed)?
            .growth
            .get(&part.region)
            .copied()
            .ok_or_else(|| SimulatorError::MissingGrowth(part.label()))
    }

    fn score_competition(
        &mut self,
        first: &Part,
        second: &Part,
        _params: &CompetitionParams,
    ) -> Result<(f64, f64), SimulatorError> {
        let run = self.transcript.run(&first.seed)?;

        for record in &run.competitions {
            if record.first == first.region && record.second == second.region {
                return Ok((record.first_score, record.second_score));
            }
            if record.first == second.region && record.second == first.region {
                return Ok((record.second_score, record.first_score));
            }
        }

        Err(SimulatorError::MissingCompetition {
            first: first.label(),
            second: second.label(),
        })
    }
}

/// Serves recorded region labelings through the segmentation boundary.
#[derive(Debug, Clone, Copy)]
pub struct ReplaySegmenter<'a> {
    transcript: &'a Transcript,
}

impl<'a> ReplaySegmenter<'a> {
    pub fn new(transcript: &'a Transcript) -> Self {
        Self { transcript }
    }
}

impl Segmenter for ReplaySegmenter<'_> {
    fn region_map(&self, seed: &Seed) -> Result<RegionMap, SimulatorError> {
        let run = self.transcript.run(&seed.name)?;

        if run.region_labels.is_empty() {
            return Err(SimulatorError::MissingRegionMap(seed.name.clone()));
        }
        if run.region_labels.len() != seed.cells.len() {
            return Err(SimulatorError::RegionShape {
                seed: seed.name.clone(),
                labeled: run.region_labels.len(),
                cells: seed.cells.len(),
            });
        }

        Ok(RegionMap {
            width: seed.width,
            height: seed.height,
            labels: run.region_labels.clone(),
        })
    }

    fn extract_part(
        &self,
        seed: &Seed,
        map: &RegionMap,
        region: u32,
    ) -> Result<Part, SimulatorError> {
        // Bounding box of the region within the labeling.
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0usize;
        let mut max_y = 0usize;

        for y in 0..map.height {
            for x in 0..map.width {
                if map.labels[y * map.width + x] == region {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        if min_x == usize::MAX {
            return Err(SimulatorError::EmptyRegion {
                seed: seed.name.clone(),
                region,
            });
        }

        let width = max_x - min_x + 1;
        let height = max_y - min_y + 1;
        let mut cells = vec![0u8; width * height];
        let mut num_living = 0;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let in_region = map.labels[y * map.width + x] == region;
                if in_region && seed.get(x, y) != 0 {
                    cells[(y - min_y) * width + (x - min_x)] = 1;
                    num_living += 1;
                }
            }
        }

        Ok(Part {
            seed: seed.name.clone(),
            region,
            width,
            height,
            cells,
            num_living,
        })
    }
}
