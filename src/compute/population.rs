//! Population-level aggregation of manager counts over time.

use log::debug;

use crate::schema::Seed;

use super::classify::manager_labels;
use super::error::AnalysisError;
use super::simulator::Segmenter;
use super::tensor::GrowthTensor;

/// Manager-count distribution of the population at one sampled step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDistribution {
    /// The sampled step number.
    pub step: u64,
    /// Seat counts indexed by manager count: `counts[m]` is the number
    /// of seeds with exactly `m` managers among their parts.
    pub counts: Vec<usize>,
    /// Population size the counts partition.
    pub num_seeds: usize,
}

impl StepDistribution {
    /// Empirical probability per manager count, same indexing as
    /// [`counts`](Self::counts).
    pub fn probabilities(&self) -> Vec<f64> {
        self.counts
            .iter()
            .map(|&c| c as f64 / self.num_seeds as f64)
            .collect()
    }
}

/// Keep the seeds whose region count matches `num_parts`, in order.
pub fn admit_seeds(
    seg: &dyn Segmenter,
    corpus: &[Seed],
    num_parts: usize,
) -> Result<Vec<Seed>, AnalysisError> {
    let mut admitted = Vec::new();
    for seed in corpus {
        let map = seg.region_map(seed)?;
        if map.num_regions() as usize == num_parts {
            admitted.push(seed.clone());
        }
    }

    debug!(
        "admitted {}/{} seeds with {} parts",
        admitted.len(),
        corpus.len(),
        num_parts
    );
    Ok(admitted)
}

/// Aggregate manager counts across the population at every sampled step.
///
/// Fails with [`AnalysisError::PopulationDrift`] if the buckets at any
/// step do not partition the population; that indicates a builder or
/// classifier defect and aborts the batch.
pub fn population_distribution(tensor: &GrowthTensor) -> Result<Vec<StepDistribution>, AnalysisError> {
    if tensor.num_seeds() == 0 {
        return Err(AnalysisError::EmptyPopulation {
            num_parts: tensor.num_parts(),
        });
    }

    let mut rows = Vec::new();

    for step in tensor.sampled_steps() {
        let mut counts = vec![0usize; tensor.num_parts() + 1];

        for seed in 0..tensor.num_seeds() {
            let managers = manager_labels(tensor, seed, step)
                .iter()
                .filter(|&&m| m)
                .count();
            counts[managers] += 1;
        }

        let counted: usize = counts.iter().sum();
        if counted != tensor.num_seeds() {
            return Err(AnalysisError::PopulationDrift {
                step,
                counted,
                expected: tensor.num_seeds(),
            });
        }

        rows.push(StepDistribution {
            step,
            counts,
            num_seeds: tensor.num_seeds(),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::compute::replay::{RecordedRun, ReplaySegmenter, ReplaySimulator, Transcript};
    use crate::compute::simulator::ColourCounts;
    use crate::schema::TensorParams;

    /// One-step corpus where seed `i` has exactly `manager_counts[i]`
    /// managers among three parts.
    fn three_part_fixture(manager_counts: &[usize]) -> (Vec<Seed>, Transcript, TensorParams) {
        let mut seeds = Vec::new();
        let mut runs = HashMap::new();

        for (i, &managers) in manager_counts.iter().enumerate() {
            let name = format!("s{i}");
            seeds.push(Seed {
                name: name.clone(),
                width: 1,
                height: 1,
                cells: vec![1],
            });

            let census = (0..3)
                .map(|part| {
                    if part < managers {
                        ColourCounts::new([0, 1, 0, 6, 2])
                    } else {
                        ColourCounts::new([0, 1, 0, 2, 6])
                    }
                })
                .collect();
            runs.insert(
                name,
                RecordedRun {
                    census: HashMap::from([(0, census)]),
                    ..Default::default()
                },
            );
        }

        let params = TensorParams {
            step_size: 1,
            max_seeds: manager_counts.len(),
            num_steps: 1,
            num_parts: 3,
        };

        (seeds, Transcript { runs }, params)
    }

    #[test]
    fn test_distribution_matches_known_population() {
        let manager_counts = [3, 3, 2, 2, 2, 1, 1, 1, 0, 0];
        let (seeds, transcript, params) = three_part_fixture(&manager_counts);
        let mut sim = ReplaySimulator::new(&transcript);

        let tensor = GrowthTensor::build(&mut sim, &seeds, &params).unwrap();
        let rows = population_distribution(&tensor).unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        // Buckets (3, 2, 1, 0 managers) hold (2, 3, 3, 2) seeds.
        assert_eq!(row.counts[3], 2);
        assert_eq!(row.counts[2], 3);
        assert_eq!(row.counts[1], 3);
        assert_eq!(row.counts[0], 2);

        let probs = row.probabilities();
        assert!((probs[3] - 0.2).abs() < 1e-12);
        assert!((probs[2] - 0.3).abs() < 1e-12);
        assert!((probs[1] - 0.3).abs() < 1e-12);
        assert!((probs[0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_population_is_reported() {
        let (_, transcript, params) = three_part_fixture(&[]);
        let mut sim = ReplaySimulator::new(&transcript);

        let tensor = GrowthTensor::build(&mut sim, &[], &params).unwrap();
        assert!(matches!(
            population_distribution(&tensor),
            Err(AnalysisError::EmptyPopulation { num_parts: 3 })
        ));
    }

    #[test]
    fn test_admit_seeds_filters_by_region_count() {
        let mut runs = HashMap::new();
        let mut corpus = Vec::new();

        for (name, regions) in [("a", 2u32), ("b", 3), ("c", 3), ("d", 4)] {
            corpus.push(Seed {
                name: name.to_string(),
                width: regions as usize,
                height: 1,
                cells: vec![1; regions as usize],
            });
            runs.insert(
                name.to_string(),
                RecordedRun {
                    region_labels: (1..=regions).collect(),
                    ..Default::default()
                },
            );
        }

        let transcript = Transcript { runs };
        let seg = ReplaySegmenter::new(&transcript);

        let admitted = admit_seeds(&seg, &corpus, 3).unwrap();
        let names: Vec<&str> = admitted.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    proptest! {
        #[test]
        fn prop_probabilities_partition_the_population(
            manager_counts in proptest::collection::vec(0usize..=3, 1..60)
        ) {
            let (seeds, transcript, params) = three_part_fixture(&manager_counts);
            let mut sim = ReplaySimulator::new(&transcript);

            let tensor = GrowthTensor::build(&mut sim, &seeds, &params).unwrap();
            let rows = population_distribution(&tensor).unwrap();

            for row in &rows {
                let probs = row.probabilities();
                for &p in &probs {
                    prop_assert!((0.0..=1.0).contains(&p));
                }
                let total: f64 = probs.iter().sum();
                prop_assert!((total - 1.0).abs() < 1e-9);
            }
        }
    }
}
