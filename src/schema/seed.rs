//! Seed, part, and region types for stored simulation runs.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One stored simulation initial condition.
///
/// A seed is an opaque 0/1 cell grid. Its spatial decomposition into
/// parts is produced by a [`Segmenter`](crate::compute::Segmenter); the
/// seed itself carries no part structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Identifier, unique within one corpus.
    pub name: String,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Row-major cell states. Nonzero means alive.
    pub cells: Vec<u8>,
}

impl Seed {
    /// Number of live cells in the pattern.
    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Cell state at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }

    /// Check that the cell buffer matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.cells.len() == self.width * self.height
    }
}

/// A labeling that partitions a seed's pattern into numbered regions.
///
/// Labels are 1-based; 0 marks cells that belong to no region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMap {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Row-major region labels.
    pub labels: Vec<u32>,
}

impl RegionMap {
    /// Number of regions, i.e. the highest label present.
    pub fn num_regions(&self) -> u32 {
        self.labels.iter().copied().max().unwrap_or(0)
    }
}

/// One contiguous region of a seed, materialized as an independent
/// pattern cropped to the region's bounding box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Name of the seed this part was extracted from.
    pub seed: String,
    /// 1-based region number within that seed.
    pub region: u32,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Row-major cell states, zeros and ones.
    pub cells: Vec<u8>,
    /// Living-cell count attribute.
    pub num_living: usize,
}

impl Part {
    /// Stable identifier used to key recorded measurements.
    pub fn label(&self) -> String {
        format!("{}:{}", self.seed, self.region)
    }
}

/// Load seeds from one or more container files, preserving order.
///
/// Each container holds an ordered list of seed records; the returned
/// list is the concatenation in path order.
pub fn load_seeds<P: AsRef<Path>>(paths: &[P]) -> io::Result<Vec<Seed>> {
    let mut seeds = Vec::new();

    for path in paths {
        let content = fs::read_to_string(path)?;
        let batch: Vec<Seed> = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        for seed in &batch {
            if !seed.is_consistent() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "seed '{}' declares {}x{} cells but stores {}",
                        seed.name,
                        seed.width,
                        seed.height,
                        seed.cells.len()
                    ),
                ));
            }
        }

        seeds.extend(batch);
    }

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_seed(name: &str) -> Seed {
        Seed {
            name: name.to_string(),
            width: 3,
            height: 2,
            cells: vec![1, 0, 1, 0, 1, 0],
        }
    }

    #[test]
    fn test_live_cells() {
        assert_eq!(test_seed("a").live_cells(), 3);
    }

    #[test]
    fn test_region_map_count() {
        let map = RegionMap {
            width: 2,
            height: 2,
            labels: vec![1, 0, 2, 2],
        };
        assert_eq!(map.num_regions(), 2);
    }

    #[test]
    fn test_part_label() {
        let part = Part {
            seed: "run1/7".to_string(),
            region: 2,
            width: 1,
            height: 1,
            cells: vec![1],
            num_living: 1,
        };
        assert_eq!(part.label(), "run1/7:2");
    }

    #[test]
    fn test_load_seeds_preserves_order() {
        let dir = tempfile::tempdir().unwrap();

        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        fs::write(
            &first,
            serde_json::to_string(&vec![test_seed("a"), test_seed("b")]).unwrap(),
        )
        .unwrap();
        fs::write(&second, serde_json::to_string(&vec![test_seed("c")]).unwrap()).unwrap();

        let seeds = load_seeds(&[first, second]).unwrap();
        let names: Vec<&str> = seeds.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_load_seeds_rejects_bad_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");

        let mut seed = test_seed("broken");
        seed.cells.pop();
        fs::write(&path, serde_json::to_string(&vec![seed]).unwrap()).unwrap();

        let err = load_seeds(&[path]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
