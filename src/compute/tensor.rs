//! The growth tensor: live-cell counts per (seed, step, colour, part).

use log::debug;

use crate::schema::{Seed, TensorParams};

use super::error::AnalysisError;
use super::simulator::{Colour, NUM_COLOURS, Simulator};

/// Dense 4-D count storage filled once per analysis batch.
///
/// Rows are allocated up to the configured capacity, but only the
/// realized seed count is ever readable: every accessor rejects seed
/// indices at or above [`num_seeds`](Self::num_seeds), so unfilled rows
/// cannot leak into downstream aggregation.
///
/// Steps are addressed by raw step number; only the sampled steps
/// `0, step_size, 2*step_size, ...` below `num_steps` are materialized.
pub struct GrowthTensor {
    /// Counts laid out as [seed][sampled step][colour][part].
    data: Vec<u32>,
    num_seeds: usize,
    num_steps: u64,
    step_size: u64,
    num_parts: usize,
}

impl GrowthTensor {
    /// Fill a tensor by running every seed through the simulator.
    ///
    /// Seeds are processed strictly in order, one at a time. The builder
    /// does not filter by part count; callers admit seeds beforehand.
    pub fn build(
        sim: &mut dyn Simulator,
        seeds: &[Seed],
        params: &TensorParams,
    ) -> Result<Self, AnalysisError> {
        if seeds.len() > params.max_seeds {
            return Err(AnalysisError::SeedOverflow {
                admitted: seeds.len(),
                capacity: params.max_seeds,
            });
        }

        let rows = params.num_steps.div_ceil(params.step_size) as usize;
        let mut tensor = Self {
            data: vec![0; params.max_seeds * rows * NUM_COLOURS * params.num_parts],
            num_seeds: seeds.len(),
            num_steps: params.num_steps,
            step_size: params.step_size,
            num_parts: params.num_parts,
        };

        for (seed_index, seed) in seeds.iter().enumerate() {
            sim.reset(seed)?;
            let mut generation = 0u64;

            for row in 0..rows {
                let step = row as u64 * params.step_size;
                if step > generation {
                    sim.advance(step - generation)?;
                    generation = step;
                }

                for part in 0..params.num_parts {
                    let census = sim.part_census(part)?;
                    for colour in Colour::ALL {
                        let idx = tensor.offset(seed_index, row, colour, part);
                        tensor.data[idx] = census.get(colour);
                    }
                }
            }

            debug!(
                "recorded seed '{}' ({}/{}) across {} sampled steps",
                seed.name,
                seed_index + 1,
                seeds.len(),
                rows
            );
        }

        Ok(tensor)
    }

    #[inline]
    fn rows(&self) -> usize {
        self.num_steps.div_ceil(self.step_size) as usize
    }

    #[inline]
    fn offset(&self, seed: usize, row: usize, colour: Colour, part: usize) -> usize {
        ((seed * self.rows() + row) * NUM_COLOURS + colour.index()) * self.num_parts + part
    }

    /// Live-cell count for one (seed, step, colour, part) cell.
    ///
    /// Panics on a seed index at or above the realized count, an
    /// out-of-range or unsampled step, or a part index out of range.
    pub fn count(&self, seed: usize, step: u64, colour: Colour, part: usize) -> u32 {
        assert!(
            seed < self.num_seeds,
            "seed index {seed} out of range: {} seeds realized",
            self.num_seeds
        );
        assert!(
            step < self.num_steps,
            "step {step} out of range: horizon is {}",
            self.num_steps
        );
        assert!(
            step % self.step_size == 0,
            "step {step} was not sampled: stride is {}",
            self.step_size
        );
        assert!(
            part < self.num_parts,
            "part index {part} out of range: {} parts tracked",
            self.num_parts
        );

        let row = (step / self.step_size) as usize;
        self.data[self.offset(seed, row, colour, part)]
    }

    /// Realized seed count; always at or below the build capacity.
    #[inline]
    pub fn num_seeds(&self) -> usize {
        self.num_seeds
    }

    /// Number of parts tracked per seed.
    #[inline]
    pub fn num_parts(&self) -> usize {
        self.num_parts
    }

    /// Simulation horizon; valid step numbers are `[0, num_steps)`.
    #[inline]
    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    /// Stride between sampled steps.
    #[inline]
    pub fn step_size(&self) -> u64 {
        self.step_size
    }

    /// Sampled step numbers in ascending order.
    pub fn sampled_steps(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.rows() as u64).map(|row| row * self.step_size)
    }
}
