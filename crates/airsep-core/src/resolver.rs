//! Strategic deconfliction: grid search over launch delays and rigid path
//! offsets, plus a time-shift-only variant.
//!
//! The resolver owns its working copy of the segment pool and hands the
//! detector immutable snapshots; committed edits replace whole per-drone
//! segment lists.

use std::collections::HashMap;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::detector::ConflictDetector;
use crate::models::Segment;
use crate::rules::ResolverLattice;

/// Committed edit for one aircraft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolutionOutcome {
    /// A lattice point cleared the aircraft.
    Shift {
        time_shift: f64,
        lateral_shift_x: f64,
        lateral_shift_y: f64,
        alt_shift_z: f64,
        cost: f64,
    },
    /// No lattice point cleared it; cumulative forced delay.
    Fallback { fallback_delay: f64 },
}

/// Result of the grid-search resolver.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub method: &'static str,
    pub status: String,
    pub details: HashMap<String, ResolutionOutcome>,
}

/// Report plus the edited segment pool it produced.
#[derive(Debug, Clone)]
pub struct SpatialResolution {
    pub report: ResolutionReport,
    pub segments: Vec<Segment>,
    pub iterations: usize,
}

/// Result of the time-shift-only resolver: cumulative delay per aircraft.
#[derive(Debug, Clone)]
pub struct TimeShiftResolution {
    pub delays: HashMap<String, f64>,
    pub segments: Vec<Segment>,
    pub iterations: usize,
}

/// Searches (delay, offset) candidates until detection over the pool comes
/// back clean or the iteration bound is hit.
#[derive(Debug, Clone)]
pub struct StrategicResolver {
    detector: ConflictDetector,
    lattice: ResolverLattice,
}

impl StrategicResolver {
    pub fn new(detector: ConflictDetector) -> Self {
        Self {
            detector,
            lattice: ResolverLattice::default(),
        }
    }

    pub fn with_lattice(detector: ConflictDetector, lattice: ResolverLattice) -> Self {
        Self { detector, lattice }
    }

    /// Grid-search resolution. Each outer iteration isolates the lower
    /// priority side of the first conflict and tries every lattice point,
    /// committing the cheapest candidate that leaves that aircraft with zero
    /// conflicts. Infeasible candidates get the fallback delay instead.
    pub fn resolve_spatial(&self, segments: &[Segment]) -> SpatialResolution {
        let mut pool = segments.to_vec();
        let mut details: HashMap<String, ResolutionOutcome> = HashMap::new();
        let mut iterations = 0;

        while iterations < self.lattice.max_iterations {
            let conflicts = self.detector.detect(&pool);
            let Some(first) = conflicts.first() else {
                break;
            };
            let target = first.drone_b.clone();

            let (legs, mut rest): (Vec<Segment>, Vec<Segment>) =
                pool.into_iter().partition(|s| s.drone_id == target);
            if legs.is_empty() {
                pool = rest;
                break;
            }

            match self.best_candidate(&target, &legs, &rest) {
                Some((cost, delay, offset, candidate)) => {
                    rest.extend(candidate);
                    details.insert(
                        target,
                        ResolutionOutcome::Shift {
                            time_shift: delay,
                            lateral_shift_x: offset.x,
                            lateral_shift_y: offset.y,
                            alt_shift_z: offset.z,
                            cost,
                        },
                    );
                }
                None => {
                    let fallback = self.lattice.fallback_delay_s;
                    rest.extend(legs.iter().map(|s| s.delayed(fallback)));
                    match details.get_mut(&target) {
                        Some(ResolutionOutcome::Fallback { fallback_delay }) => {
                            *fallback_delay += fallback;
                        }
                        _ => {
                            details.insert(
                                target,
                                ResolutionOutcome::Fallback {
                                    fallback_delay: fallback,
                                },
                            );
                        }
                    }
                }
            }
            pool = rest;
            iterations += 1;
        }

        let status = if self.detector.detect(&pool).is_empty() {
            "airspace clear".to_string()
        } else {
            format!("conflicts remain after {iterations} iterations")
        };

        SpatialResolution {
            report: ResolutionReport {
                method: "grid search over parallel paths and launch delays",
                status,
                details,
            },
            segments: pool,
            iterations,
        }
    }

    /// Cheapest lattice candidate that leaves `target` conflict-free when
    /// inserted next to `rest`, or None when the whole lattice fails.
    fn best_candidate(
        &self,
        target: &str,
        legs: &[Segment],
        rest: &[Segment],
    ) -> Option<(f64, f64, Vector3<f64>, Vec<Segment>)> {
        let mut best: Option<(f64, f64, Vector3<f64>, Vec<Segment>)> = None;

        for &delay in &self.lattice.delays_s {
            for &offset in &self.lattice.offsets_m {
                let cost = delay * self.lattice.delay_cost_weight + offset.norm();
                if best.as_ref().is_some_and(|(c, ..)| cost >= *c) {
                    continue;
                }

                let candidate: Vec<Segment> = legs
                    .iter()
                    .map(|s| s.translated(offset).delayed(delay).clamped_to_floor())
                    .collect();

                let mut trial = rest.to_vec();
                trial.extend(candidate.iter().cloned());
                let clear = self
                    .detector
                    .detect(&trial)
                    .iter()
                    .all(|c| c.drone_a != target && c.drone_b != target);
                if clear {
                    best = Some((cost, delay, offset, candidate));
                }
            }
        }
        best
    }

    /// Time-shift-only variant: delay the lower priority side of the first
    /// conflict by a fixed step per iteration until detection comes back
    /// clean.
    pub fn resolve_time_shift(&self, segments: &[Segment]) -> TimeShiftResolution {
        let mut pool = segments.to_vec();
        let mut delays: HashMap<String, f64> = HashMap::new();
        let mut iterations = 0;
        let step = self.lattice.time_shift_step_s;

        while iterations < self.lattice.time_shift_max_iterations {
            let conflicts = self.detector.detect(&pool);
            let Some(first) = conflicts.first() else {
                break;
            };
            let target = first.drone_b.clone();

            *delays.entry(target.clone()).or_insert(0.0) += step;
            pool = pool
                .into_iter()
                .map(|s| {
                    if s.drone_id == target {
                        s.delayed(step)
                    } else {
                        s
                    }
                })
                .collect();
            iterations += 1;
        }

        TimeShiftResolution {
            delays,
            segments: pool,
            iterations,
        }
    }
}
