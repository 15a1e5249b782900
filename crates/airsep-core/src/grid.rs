//! Real-time planar spatial hash.
//!
//! Aircraft are binned into square cells by horizontal position, expanded by
//! a k-ring sized from the aircraft's uncertainty radius. Altitude is not
//! indexed here; the narrow phase filters it.

use std::collections::{BTreeSet, HashMap};

/// Cell-hash broad-phase index. Rebuilt from scratch each monitor tick.
#[derive(Debug, Clone)]
pub struct CellHash {
    resolution: f64,
    cells: HashMap<(i64, i64), Vec<String>>,
}

impl CellHash {
    pub fn new(resolution: f64) -> Self {
        Self {
            resolution,
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x / self.resolution).floor() as i64,
            (y / self.resolution).floor() as i64,
        )
    }

    /// Insert an aircraft at (x, y) with uncertainty radius `r`, occupying
    /// its center cell plus the k-ring with k = ceil(r / resolution).
    pub fn insert(&mut self, id: &str, x: f64, y: f64, r: f64) {
        let (ci, cj) = self.cell_of(x, y);
        let k = (r / self.resolution).ceil().max(0.0) as i64;
        for di in -k..=k {
            for dj in -k..=k {
                self.cells
                    .entry((ci + di, cj + dj))
                    .or_default()
                    .push(id.to_string());
            }
        }
    }

    /// Distinct id pairs co-occupying any cell, deduplicated by sorted
    /// tuple, in sorted order.
    pub fn candidate_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = BTreeSet::new();
        for ids in self.cells.values() {
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    if ids[i] == ids[j] {
                        continue;
                    }
                    let pair = if ids[i] < ids[j] {
                        (ids[i].clone(), ids[j].clone())
                    } else {
                        (ids[j].clone(), ids[i].clone())
                    };
                    pairs.insert(pair);
                }
            }
        }
        pairs.into_iter().collect()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cohabiting_aircraft_pair() {
        let mut grid = CellHash::new(66.0);
        grid.insert("A", 10.0, 10.0, 3.0);
        grid.insert("B", 20.0, 20.0, 3.0);
        assert_eq!(grid.candidate_pairs(), vec![("A".to_string(), "B".to_string())]);
    }

    #[test]
    fn test_distant_aircraft_not_paired() {
        let mut grid = CellHash::new(66.0);
        grid.insert("A", 0.0, 0.0, 3.0);
        grid.insert("B", 1000.0, 1000.0, 3.0);
        assert!(grid.candidate_pairs().is_empty());
    }

    #[test]
    fn test_large_radius_expands_reach() {
        let mut grid = CellHash::new(66.0);
        // 30 m radius -> k = 1, bridging a cell border ~100 m away.
        grid.insert("A", 60.0, 0.0, 30.0);
        grid.insert("B", 130.0, 0.0, 3.0);
        assert_eq!(grid.candidate_pairs().len(), 1);
    }

    #[test]
    fn test_pairs_deduplicated() {
        let mut grid = CellHash::new(66.0);
        // 30 m radii: the aircraft co-occupy many cells.
        grid.insert("A", 10.0, 10.0, 30.0);
        grid.insert("B", 12.0, 12.0, 30.0);
        assert_eq!(grid.candidate_pairs().len(), 1);
    }

    #[test]
    fn test_negative_coordinates() {
        let mut grid = CellHash::new(66.0);
        grid.insert("A", -10.0, -10.0, 3.0);
        grid.insert("B", -20.0, -20.0, 3.0);
        assert_eq!(grid.candidate_pairs().len(), 1);
    }
}
