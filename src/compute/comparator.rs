//! Cross-check of manager status against an independent per-part signal.
//!
//! For each seed with exactly the requested number of parts, an
//! independent scalar signal is measured per part (Game of Life growth,
//! or mean one-on-one competition score) and compared against the
//! management-game classification. Seeds with exactly one manager feed
//! a conditional probability: how often does that manager also hold the
//! unique maximum signal?

use log::debug;

use crate::schema::{CompetitionParams, Seed, TensorParams};

use super::classify::manager_labels;
use super::error::AnalysisError;
use super::simulator::{Segmenter, Simulator};
use super::tensor::GrowthTensor;

/// Which independent signal to measure per part.
#[derive(Debug, Clone)]
pub enum SignalSource {
    /// Single-part growth under the Game of Life.
    LifeGrowth { num_steps: u64 },
    /// Mean one-on-one competition score against the other parts.
    Competition(CompetitionParams),
}

impl SignalSource {
    /// Short noun used in the report text.
    pub fn noun(&self) -> &'static str {
        match self {
            SignalSource::LifeGrowth { .. } => "growth",
            SignalSource::Competition(_) => "fitness",
        }
    }
}

/// Signals and manager labels recorded for one seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedVerdict {
    /// Name of the seed.
    pub seed: String,
    /// Independent signal per part, in part order.
    pub signals: Vec<f64>,
    /// Manager label per part, in part order.
    pub managers: Vec<bool>,
}

impl SeedVerdict {
    /// Number of parts classified as manager.
    pub fn manager_count(&self) -> usize {
        self.managers.iter().filter(|&&m| m).count()
    }

    /// Whether the (single) manager holds the unique maximum signal.
    ///
    /// The comparison is exact: the manager's signal must equal the top
    /// of the descending-sorted vector and differ from the runner-up.
    /// A tie for the top spot does not count, while ties further down
    /// the vector are irrelevant.
    pub fn manager_has_unique_max_signal(&self) -> bool {
        let Some(manager) = self.managers.iter().position(|&m| m) else {
            return false;
        };
        let manager_signal = self.signals[manager];

        let mut sorted = self.signals.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));

        match sorted.get(1) {
            Some(&second) => manager_signal == sorted[0] && manager_signal != second,
            None => true,
        }
    }
}

/// Running totals for one part-count group.
///
/// An explicit accumulator value: it is threaded through the fold over
/// the group's seeds and merged with [`merge`](Self::merge) when seeds
/// are sharded, so the final division only ever sees complete totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupTally {
    /// Seeds processed in this group.
    pub sample_size: usize,
    /// Seeds with exactly one manager.
    pub one_manager: usize,
    /// Of those, seeds where the manager holds the unique maximum signal.
    pub one_manager_max_signal: usize,
}

impl GroupTally {
    /// Fold one seed's verdict into the totals.
    pub fn record(&mut self, verdict: &SeedVerdict) {
        self.sample_size += 1;
        if verdict.manager_count() == 1 {
            self.one_manager += 1;
            if verdict.manager_has_unique_max_signal() {
                self.one_manager_max_signal += 1;
            }
        }
    }

    /// Combine totals from two shards of the same group.
    pub fn merge(self, other: Self) -> Self {
        Self {
            sample_size: self.sample_size + other.sample_size,
            one_manager: self.one_manager + other.one_manager,
            one_manager_max_signal: self.one_manager_max_signal + other.one_manager_max_signal,
        }
    }

    /// p(manager has unique max signal | exactly one manager).
    ///
    /// `None` when the group produced no single-manager seeds; the
    /// ratio is undefined (0/0) and is reported as such rather than
    /// computed.
    pub fn conditional_probability(&self) -> Option<f64> {
        (self.one_manager > 0)
            .then(|| self.one_manager_max_signal as f64 / self.one_manager as f64)
    }
}

/// Result of one part-count group's comparison.
#[derive(Debug, Clone)]
pub struct GroupReport {
    /// Part count shared by every seed in the group.
    pub num_parts: usize,
    /// Accumulated totals.
    pub tally: GroupTally,
    /// Per-seed records, in corpus order.
    pub verdicts: Vec<SeedVerdict>,
}

impl GroupReport {
    /// Probability of picking the true manager uniformly at random.
    pub fn chance_probability(&self) -> f64 {
        1.0 / self.num_parts as f64
    }
}

/// Run the comparison for every corpus seed with exactly `num_parts`
/// regions.
///
/// The classification census comes from a dedicated single-seed tensor
/// build that strides straight to the final step of `census_steps`;
/// the general builder is reused unchanged so the classification is
/// identical to the population analysis.
pub fn compare_group(
    sim: &mut dyn Simulator,
    seg: &dyn Segmenter,
    corpus: &[Seed],
    num_parts: usize,
    signal: &SignalSource,
    census_steps: u64,
) -> Result<GroupReport, AnalysisError> {
    assert!(
        census_steps >= 2,
        "census horizon must cover at least two steps"
    );

    let final_step = census_steps - 1;
    let census_params = TensorParams {
        step_size: final_step,
        max_seeds: 1,
        num_steps: census_steps,
        num_parts,
    };

    let mut tally = GroupTally::default();
    let mut verdicts = Vec::new();

    for seed in corpus {
        let map = seg.region_map(seed)?;
        if map.num_regions() as usize != num_parts {
            continue;
        }

        let parts = (1..=num_parts as u32)
            .map(|region| seg.extract_part(seed, &map, region))
            .collect::<Result<Vec<_>, _>>()?;

        let signals = match signal {
            SignalSource::LifeGrowth { num_steps } => {
                let mut signals = Vec::with_capacity(parts.len());
                for part in &parts {
                    signals.push(sim.measure_growth(part, *num_steps)? as f64);
                }
                signals
            }
            SignalSource::Competition(params) => {
                let mut signals = Vec::with_capacity(parts.len());
                for (i, part) in parts.iter().enumerate() {
                    let mut scores = Vec::with_capacity(parts.len() - 1);
                    for (j, opponent) in parts.iter().enumerate() {
                        if i == j {
                            continue;
                        }
                        let (own, _) = sim.score_competition(part, opponent, params)?;
                        scores.push(own);
                    }
                    signals.push(scores.iter().sum::<f64>() / scores.len() as f64);
                }
                signals
            }
        };

        let tensor = GrowthTensor::build(sim, std::slice::from_ref(seed), &census_params)?;
        let managers = manager_labels(&tensor, 0, final_step);

        debug!(
            "seed '{}': {} {:?}, managers {:?}",
            seed.name,
            signal.noun(),
            signals,
            managers
        );

        let verdict = SeedVerdict {
            seed: seed.name.clone(),
            signals,
            managers,
        };
        tally.record(&verdict);
        verdicts.push(verdict);
    }

    Ok(GroupReport {
        num_parts,
        tally,
        verdicts,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::compute::replay::{
        CompetitionRecord, RecordedRun, ReplaySegmenter, ReplaySimulator, Transcript,
    };
    use crate::compute::simulator::ColourCounts;

    fn verdict(signals: &[f64], managers: &[bool]) -> SeedVerdict {
        SeedVerdict {
            seed: "s".to_string(),
            signals: signals.to_vec(),
            managers: managers.to_vec(),
        }
    }

    #[test]
    fn test_tie_at_top_does_not_count() {
        let v = verdict(&[5.0, 5.0, 3.0], &[true, false, false]);
        assert!(!v.manager_has_unique_max_signal());
    }

    #[test]
    fn test_unique_max_counts() {
        let v = verdict(&[7.0, 5.0, 3.0], &[true, false, false]);
        assert!(v.manager_has_unique_max_signal());
    }

    #[test]
    fn test_tie_below_top_is_irrelevant() {
        let v = verdict(&[7.0, 5.0, 5.0], &[true, false, false]);
        assert!(v.manager_has_unique_max_signal());
    }

    #[test]
    fn test_manager_not_at_max_does_not_count() {
        let v = verdict(&[3.0, 7.0, 5.0], &[true, false, false]);
        assert!(!v.manager_has_unique_max_signal());
    }

    #[test]
    fn test_conditional_probability_undefined_without_samples() {
        let mut tally = GroupTally::default();
        tally.record(&verdict(&[1.0, 2.0], &[true, true]));
        tally.record(&verdict(&[1.0, 2.0], &[false, false]));

        assert_eq!(tally.sample_size, 2);
        assert_eq!(tally.one_manager, 0);
        assert_eq!(tally.conditional_probability(), None);
    }

    #[test]
    fn test_tally_merge_sums_shards() {
        let mut left = GroupTally::default();
        left.record(&verdict(&[7.0, 5.0], &[true, false]));

        let mut right = GroupTally::default();
        right.record(&verdict(&[5.0, 5.0], &[true, false]));
        right.record(&verdict(&[1.0, 2.0], &[true, true]));

        let merged = left.merge(right);
        assert_eq!(merged.sample_size, 3);
        assert_eq!(merged.one_manager, 2);
        assert_eq!(merged.one_manager_max_signal, 1);
        assert_eq!(merged.conditional_probability(), Some(0.5));
    }

    #[test]
    fn test_chance_probability_is_exact() {
        let report = GroupReport {
            num_parts: 2,
            tally: GroupTally::default(),
            verdicts: Vec::new(),
        };
        assert_eq!(report.chance_probability(), 0.5);

        let report = GroupReport {
            num_parts: 4,
            ..report
        };
        assert_eq!(report.chance_probability(), 0.25);
    }

    /// A census where part 0 is the manager and the rest are workers.
    fn one_manager_census(num_parts: usize) -> Vec<ColourCounts> {
        (0..num_parts)
            .map(|part| {
                if part == 0 {
                    ColourCounts::new([0, 1, 0, 6, 2])
                } else {
                    ColourCounts::new([0, 1, 0, 2, 6])
                }
            })
            .collect()
    }

    /// Two 2-part seeds (clear max and tied max) plus a 3-part seed that
    /// must be skipped by the group filter.
    fn growth_fixture() -> (Vec<Seed>, Transcript) {
        let mut seeds = Vec::new();
        let mut runs = HashMap::new();

        for (name, regions, growth) in [
            ("a", 2usize, vec![(1u32, 10i64), (2, 3)]),
            ("b", 2, vec![(1, 4), (2, 4)]),
            ("c", 3, vec![(1, 9), (2, 1), (3, 1)]),
        ] {
            seeds.push(Seed {
                name: name.to_string(),
                width: regions,
                height: 1,
                cells: vec![1; regions],
            });
            runs.insert(
                name.to_string(),
                RecordedRun {
                    region_labels: (1..=regions as u32).collect(),
                    census: HashMap::from([
                        (0, one_manager_census(regions)),
                        (10, one_manager_census(regions)),
                    ]),
                    growth: growth.into_iter().collect(),
                    ..Default::default()
                },
            );
        }

        (seeds, Transcript { runs })
    }

    #[test]
    fn test_compare_group_by_growth() {
        let (seeds, transcript) = growth_fixture();
        let mut sim = ReplaySimulator::new(&transcript);
        let seg = ReplaySegmenter::new(&transcript);

        let report = compare_group(
            &mut sim,
            &seg,
            &seeds,
            2,
            &SignalSource::LifeGrowth { num_steps: 1000 },
            11,
        )
        .unwrap();

        // Seed "c" has three parts and stays out of the 2-part group.
        assert_eq!(report.tally.sample_size, 2);
        assert_eq!(report.verdicts.len(), 2);
        assert_eq!(report.verdicts[0].signals, vec![10.0, 3.0]);
        assert_eq!(report.verdicts[0].managers, vec![true, false]);

        // "a" counts (unique max), "b" does not (tie at top).
        assert_eq!(report.tally.one_manager, 2);
        assert_eq!(report.tally.one_manager_max_signal, 1);
        assert_eq!(report.tally.conditional_probability(), Some(0.5));
    }

    #[test]
    fn test_compare_group_by_competition_averages_opponents() {
        let seed = Seed {
            name: "c3".to_string(),
            width: 3,
            height: 1,
            cells: vec![1, 1, 1],
        };
        let run = RecordedRun {
            region_labels: vec![1, 2, 3],
            census: HashMap::from([(0, one_manager_census(3)), (10, one_manager_census(3))]),
            competitions: vec![
                CompetitionRecord {
                    first: 1,
                    second: 2,
                    first_score: 0.9,
                    second_score: 0.1,
                },
                CompetitionRecord {
                    first: 1,
                    second: 3,
                    first_score: 0.7,
                    second_score: 0.3,
                },
                CompetitionRecord {
                    first: 2,
                    second: 3,
                    first_score: 0.6,
                    second_score: 0.4,
                },
            ],
            ..Default::default()
        };
        let transcript = Transcript {
            runs: HashMap::from([("c3".to_string(), run)]),
        };

        let mut sim = ReplaySimulator::new(&transcript);
        let seg = ReplaySegmenter::new(&transcript);

        let report = compare_group(
            &mut sim,
            &seg,
            std::slice::from_ref(&seed),
            3,
            &SignalSource::Competition(CompetitionParams::default()),
            11,
        )
        .unwrap();

        let verdict = &report.verdicts[0];
        assert!((verdict.signals[0] - 0.8).abs() < 1e-12);
        assert!((verdict.signals[1] - 0.35).abs() < 1e-12);
        assert!((verdict.signals[2] - 0.35).abs() < 1e-12);

        // Workers tie with each other below the top; the manager still
        // holds the unique maximum.
        assert_eq!(report.tally.one_manager, 1);
        assert_eq!(report.tally.one_manager_max_signal, 1);
    }
}
