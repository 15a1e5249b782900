//! Offline (strategic) conflict detection over compiled segment sets.
//!
//! Dual-cylinder separation: a conflict exists only when the horizontal
//! closest approach breaches the safety radius while the vertical gap at the
//! same instant breaches the vertical safety radius.

use crate::cpa::closest_approach;
use crate::models::{ConflictReport, Segment, Severity};
use crate::rules::SeparationStandards;
use crate::spatial::SegmentIndex;

/// Batch conflict detector. Stateless between runs; each `detect` call
/// indexes the snapshot it is handed and leaves it untouched.
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    standards: SeparationStandards,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(SeparationStandards::default())
    }
}

impl ConflictDetector {
    pub fn new(standards: SeparationStandards) -> Self {
        Self { standards }
    }

    pub fn standards(&self) -> &SeparationStandards {
        &self.standards
    }

    /// Report every pairwise loss of separation in the segment set.
    ///
    /// Report order follows candidate-pair order; callers needing a
    /// canonical order sort by (drone_a, drone_b, exact_conflict_time).
    pub fn detect(&self, segments: &[Segment]) -> Vec<ConflictReport> {
        if segments.is_empty() {
            return Vec::new();
        }

        let index = SegmentIndex::build(segments, self.standards.safety_radius_m);
        let mut conflicts = Vec::new();

        for (seg_a, seg_b) in index.candidate_pairs() {
            if let Some(conflict) = self.check_pair(seg_a, seg_b) {
                conflicts.push(conflict);
            }
        }
        conflicts
    }

    fn check_pair(&self, seg_a: &Segment, seg_b: &Segment) -> Option<ConflictReport> {
        let t0 = seg_a.t_start.max(seg_b.t_start);
        let t1 = seg_a.t_end.min(seg_b.t_end);
        if t0 >= t1 {
            return None;
        }

        let pa0 = seg_a.position_at(t0);
        let pb0 = seg_b.position_at(t0);

        // Horizontal closest approach within the shared window.
        let (mut t_rel, mut min_xy) = closest_approach(
            pa0.xy(),
            seg_a.velocity.xy(),
            pb0.xy(),
            seg_b.velocity.xy(),
        );

        let mut t_cpa_abs = t0 + t_rel;
        if t_cpa_abs > t1 {
            t_cpa_abs = t1;
            t_rel = t1 - t0;
            min_xy = (seg_a.position_at(t1).xy() - seg_b.position_at(t1).xy()).norm();
        }

        // Vertical separation at the instant of minimum horizontal separation.
        let z_a = pa0.z + seg_a.velocity.z * t_rel;
        let z_b = pb0.z + seg_b.velocity.z * t_rel;
        let dist_z = (z_a - z_b).abs();

        if min_xy >= self.standards.safety_radius_m
            || dist_z >= self.standards.vertical_safety_radius_m
        {
            return None;
        }

        let severity = if min_xy < self.standards.safety_radius_m / 2.0 {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let location = seg_a.position_at(t_cpa_abs);

        Some(ConflictReport {
            drone_a: seg_a.drone_id.clone(),
            drone_b: seg_b.drone_id.clone(),
            exact_conflict_time: t_cpa_abs,
            conflict_location: [location.x, location.y, location.z],
            minimum_separation: (min_xy * min_xy + dist_z * dist_z).sqrt(),
            severity,
        })
    }
}
