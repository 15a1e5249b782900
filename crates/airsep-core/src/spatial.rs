//! 4D spatiotemporal broad-phase over compiled segments.
//!
//! Each segment is boxed as [x, y, z, t], with the spatial extents inflated
//! by the safety radius and the time axis exact. Pairs whose boxes intersect
//! are candidates for the narrow phase.

use std::collections::HashSet;

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

use crate::models::Segment;

type SegmentBox = GeomWithData<Rectangle<[f64; 4]>, usize>;

/// R-tree over the 4D bounding boxes of a segment set.
pub struct SegmentIndex {
    tree: RTree<SegmentBox>,
    segments: Vec<Segment>,
    inflation: f64,
}

impl SegmentIndex {
    /// Bulk-load an index. `inflation` is the safety radius applied to the
    /// three spatial axes.
    pub fn build(segments: &[Segment], inflation: f64) -> Self {
        let boxes = segments
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                let (lower, upper) = bounds(seg, inflation);
                GeomWithData::new(Rectangle::from_corners(lower, upper), i)
            })
            .collect();
        Self {
            tree: RTree::bulk_load(boxes),
            segments: segments.to_vec(),
            inflation,
        }
    }

    /// All candidate segment pairs: distinct segments with intersecting
    /// boxes and different drone ids, deduplicated, ordered by insertion
    /// index so a fixed input yields a fixed output.
    pub fn candidate_pairs(&self) -> Vec<(&Segment, &Segment)> {
        let mut seen = HashSet::new();
        for (i, seg) in self.segments.iter().enumerate() {
            let (lower, upper) = bounds(seg, self.inflation);
            let envelope = AABB::from_corners(lower, upper);
            for hit in self.tree.locate_in_envelope_intersecting(&envelope) {
                let j = hit.data;
                if j == i {
                    continue;
                }
                let key = if i < j { (i, j) } else { (j, i) };
                if self.segments[key.0].drone_id == self.segments[key.1].drone_id {
                    continue;
                }
                seen.insert(key);
            }
        }
        let mut keys: Vec<_> = seen.into_iter().collect();
        keys.sort_unstable();
        keys.into_iter()
            .map(|(a, b)| (&self.segments[a], &self.segments[b]))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn bounds(seg: &Segment, r: f64) -> ([f64; 4], [f64; 4]) {
    let lower = [
        seg.a0.x.min(seg.a1.x) - r,
        seg.a0.y.min(seg.a1.y) - r,
        seg.a0.z.min(seg.a1.z) - r,
        seg.t_start,
    ];
    let upper = [
        seg.a0.x.max(seg.a1.x) + r,
        seg.a0.y.max(seg.a1.y) + r,
        seg.a0.z.max(seg.a1.z) + r,
        seg.t_end,
    ];
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn seg(id: &str, x0: f64, x1: f64, t0: f64, t1: f64) -> Segment {
        Segment::new(
            id,
            Vector3::new(x0, 0.0, 50.0),
            Vector3::new(x1, 0.0, 50.0),
            t0,
            t1 - t0,
        )
    }

    #[test]
    fn test_overlapping_segments_are_candidates() {
        let segments = vec![seg("A", 0.0, 100.0, 0.0, 20.0), seg("B", 50.0, 150.0, 0.0, 20.0)];
        let index = SegmentIndex::build(&segments, 35.0);
        let pairs = index.candidate_pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.drone_id, "A");
        assert_eq!(pairs[0].1.drone_id, "B");
    }

    #[test]
    fn test_time_disjoint_segments_are_pruned() {
        let segments = vec![seg("A", 0.0, 100.0, 0.0, 10.0), seg("B", 0.0, 100.0, 100.0, 110.0)];
        let index = SegmentIndex::build(&segments, 35.0);
        assert!(index.candidate_pairs().is_empty());
    }

    #[test]
    fn test_spatially_distant_segments_are_pruned() {
        let segments = vec![seg("A", 0.0, 100.0, 0.0, 20.0), seg("B", 5000.0, 5100.0, 0.0, 20.0)];
        let index = SegmentIndex::build(&segments, 35.0);
        assert!(index.candidate_pairs().is_empty());
    }

    #[test]
    fn test_same_drone_pairs_removed() {
        let segments = vec![seg("A", 0.0, 100.0, 0.0, 20.0), seg("A", 50.0, 150.0, 10.0, 30.0)];
        let index = SegmentIndex::build(&segments, 35.0);
        assert!(index.candidate_pairs().is_empty());
    }

    #[test]
    fn test_pairs_deduplicated_and_ordered() {
        let segments = vec![
            seg("A", 0.0, 100.0, 0.0, 20.0),
            seg("B", 0.0, 100.0, 0.0, 20.0),
            seg("C", 0.0, 100.0, 0.0, 20.0),
        ];
        let index = SegmentIndex::build(&segments, 35.0);
        let pairs = index.candidate_pairs();
        let ids: Vec<_> = pairs
            .iter()
            .map(|(a, b)| (a.drone_id.as_str(), b.drone_id.as_str()))
            .collect();
        assert_eq!(ids, [("A", "B"), ("A", "C"), ("B", "C")]);
    }
}
