//! Real-time (tactical) airspace monitoring.
//!
//! Each scan rebuilds the cell hash from the current fused states, runs the
//! CPA kernel over full 3D vectors for every candidate pair, and applies a
//! spherical threshold of the summed uncertainty radii. This is deliberately
//! different from the offline dual-cylinder test.

use std::collections::BTreeMap;

use crate::cpa::closest_approach;
use crate::grid::CellHash;
use crate::models::{
    AdvisoryKind, AircraftKind, ObservedState, ResolutionAdvisory, Severity, TacticalConflict,
};
use crate::rules::SeparationStandards;
use crate::telemetry::TelemetryEngine;

/// Projects current aircraft states forward and raises conflicts plus
/// advisories. Stateless between ticks.
#[derive(Debug, Clone)]
pub struct AirspaceMonitor {
    standards: SeparationStandards,
}

impl Default for AirspaceMonitor {
    fn default() -> Self {
        Self::new(SeparationStandards::default())
    }
}

impl AirspaceMonitor {
    pub fn new(standards: SeparationStandards) -> Self {
        Self { standards }
    }

    /// Snapshot the engine and scan it.
    pub fn monitor(&self, engine: &TelemetryEngine) -> Vec<TacticalConflict> {
        self.scan(&engine.latest_states())
    }

    /// One tick over a fixed set of fused states.
    pub fn scan(&self, states: &BTreeMap<String, ObservedState>) -> Vec<TacticalConflict> {
        if states.is_empty() {
            return Vec::new();
        }

        let mut grid = CellHash::new(self.standards.cell_resolution_m);
        for (id, state) in states {
            grid.insert(id, state.x, state.y, state.uncertainty_radius);
        }

        let mut conflicts = Vec::new();
        for (id_a, id_b) in grid.candidate_pairs() {
            let (Some(state_a), Some(state_b)) = (states.get(&id_a), states.get(&id_b)) else {
                continue;
            };

            let (t_cpa, min_dist) = closest_approach(
                state_a.position(),
                state_a.velocity(),
                state_b.position(),
                state_b.velocity(),
            );

            let combo_radius = state_a.uncertainty_radius + state_b.uncertainty_radius;
            if min_dist >= combo_radius || !(0.0..self.standards.tactical_horizon_s).contains(&t_cpa)
            {
                continue;
            }

            let severity = if min_dist < 0.5 * combo_radius {
                Severity::Critical
            } else {
                Severity::Warning
            };

            let ra = match (state_a.kind, state_b.kind) {
                (AircraftKind::Controlled, AircraftKind::Bogie) => {
                    Some(self.delay_advisory(state_a, state_b))
                }
                (AircraftKind::Bogie, AircraftKind::Controlled) => {
                    Some(self.delay_advisory(state_b, state_a))
                }
                _ => None,
            };

            conflicts.push(TacticalConflict {
                id_a,
                id_b,
                min_dist,
                t_cpa,
                severity,
                ra,
            });
        }
        conflicts
    }

    /// Non-binding pause suggestion for the controlled side of a
    /// controlled-vs-bogie pair.
    fn delay_advisory(
        &self,
        controlled: &ObservedState,
        bogie: &ObservedState,
    ) -> ResolutionAdvisory {
        let delay = self.standards.advisory_delay_s;
        ResolutionAdvisory {
            kind: AdvisoryKind::Delay,
            drone: controlled.id.clone(),
            suggested_delay_seconds: delay,
            message: format!("Delay {} by {delay}s to avoid {}", controlled.id, bogie.id),
        }
    }
}
