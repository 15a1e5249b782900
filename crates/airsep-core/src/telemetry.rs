//! Telemetry ingest: rolling history per aircraft plus the bogie filter map.
//!
//! This is the only mutable state in the engine. Callers serialize ingest
//! and snapshot operations; lifecycle (clear on reset) is explicit.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{AircraftKind, Observation, ObservedState};
use crate::rules::FilterParams;
use crate::tracker::BogieTracker;

/// Fixed uncertainty radius for cooperative aircraft, meters.
pub const CONTROLLED_UNCERTAINTY_M: f64 = 3.0;

/// An observation stamped at ingest time (wall-clock seconds).
#[derive(Debug, Clone, Copy)]
pub struct TimedObservation {
    pub observation: Observation,
    pub timestamp: f64,
}

/// Rolling telemetry buffers and the per-bogie Kalman filters.
#[derive(Debug, Clone)]
pub struct TelemetryEngine {
    buffers: HashMap<String, VecDeque<TimedObservation>>,
    tracker: BogieTracker,
    buffer_capacity: usize,
}

impl Default for TelemetryEngine {
    fn default() -> Self {
        Self::new(40, FilterParams::default())
    }
}

impl TelemetryEngine {
    pub fn new(buffer_capacity: usize, params: FilterParams) -> Self {
        Self {
            buffers: HashMap::new(),
            tracker: BogieTracker::new(params),
            buffer_capacity,
        }
    }

    /// Ingest one observation, stamped with the current wall clock.
    pub fn ingest(&mut self, id: &str, observation: Observation) {
        self.ingest_at(id, observation, wall_clock_seconds());
    }

    /// Ingest with an explicit timestamp. Bogie reports also feed the
    /// aircraft's Kalman filter; controlled reports only enter the buffer.
    pub fn ingest_at(&mut self, id: &str, observation: Observation, timestamp: f64) {
        let buffer = self.buffers.entry(id.to_string()).or_default();
        if buffer.len() == self.buffer_capacity {
            buffer.pop_front();
        }
        buffer.push_back(TimedObservation {
            observation,
            timestamp,
        });

        if observation.kind == AircraftKind::Bogie {
            self.tracker.observe(id, &observation, timestamp);
        }
    }

    /// Snapshot of every active aircraft: bogies from their filter estimate,
    /// controlled aircraft straight from their latest report.
    pub fn latest_states(&self) -> BTreeMap<String, ObservedState> {
        let mut states = BTreeMap::new();
        for (id, buffer) in &self.buffers {
            let Some(latest) = buffer.back() else {
                continue;
            };
            let obs = latest.observation;

            let state = match (obs.kind, self.tracker.get(id)) {
                (AircraftKind::Bogie, Some(track)) => {
                    let p = track.position();
                    let v = track.velocity();
                    ObservedState {
                        id: id.clone(),
                        x: p.x,
                        y: p.y,
                        z: p.z,
                        vx: v.x,
                        vy: v.y,
                        vz: v.z,
                        kind: AircraftKind::Bogie,
                        uncertainty_radius: track.uncertainty_radius(self.tracker.params()),
                    }
                }
                _ => ObservedState {
                    id: id.clone(),
                    x: obs.x,
                    y: obs.y,
                    z: obs.z,
                    vx: obs.vx,
                    vy: obs.vy,
                    vz: obs.vz,
                    kind: AircraftKind::Controlled,
                    uncertainty_radius: CONTROLLED_UNCERTAINTY_M,
                },
            };
            states.insert(id.clone(), state);
        }
        states
    }

    pub fn tracker(&self) -> &BogieTracker {
        &self.tracker
    }

    pub fn aircraft_count(&self) -> usize {
        self.buffers.len()
    }

    /// Drop all history and all filters.
    pub fn clear(&mut self) {
        self.buffers.clear();
        self.tracker.clear();
    }
}

fn wall_clock_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(kind: AircraftKind, x: f64) -> Observation {
        Observation {
            kind,
            x,
            y: 0.0,
            z: 50.0,
            vx: 1.0,
            vy: 0.0,
            vz: 0.0,
        }
    }

    #[test]
    fn test_controlled_bypasses_filter() {
        let mut engine = TelemetryEngine::default();
        engine.ingest_at("C1", obs(AircraftKind::Controlled, 12.5), 0.0);

        let states = engine.latest_states();
        let state = &states["C1"];
        assert_eq!(state.x, 12.5);
        assert_eq!(state.uncertainty_radius, CONTROLLED_UNCERTAINTY_M);
        assert!(engine.tracker().is_empty());
    }

    #[test]
    fn test_bogie_state_comes_from_filter() {
        let mut engine = TelemetryEngine::default();
        engine.ingest_at("R1", obs(AircraftKind::Bogie, 100.0), 0.0);

        let states = engine.latest_states();
        let state = &states["R1"];
        assert_eq!(state.kind, AircraftKind::Bogie);
        assert_eq!(state.x, 100.0);
        // P0 = I => radius = trace of the position block = 3.
        assert!((state.uncertainty_radius - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_buffer_caps_history() {
        let mut engine = TelemetryEngine::new(40, FilterParams::default());
        for i in 0..100 {
            engine.ingest_at("C1", obs(AircraftKind::Controlled, i as f64), i as f64);
        }
        assert_eq!(engine.buffers["C1"].len(), 40);
        // Latest report wins.
        assert_eq!(engine.latest_states()["C1"].x, 99.0);
    }

    #[test]
    fn test_empty_engine_snapshot() {
        let engine = TelemetryEngine::default();
        assert!(engine.latest_states().is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut engine = TelemetryEngine::default();
        engine.ingest_at("R1", obs(AircraftKind::Bogie, 0.0), 0.0);
        engine.ingest_at("C1", obs(AircraftKind::Controlled, 0.0), 0.0);
        engine.clear();
        assert_eq!(engine.aircraft_count(), 0);
        assert!(engine.tracker().is_empty());
        assert!(engine.latest_states().is_empty());
    }

    #[test]
    fn test_bogie_radius_is_capped() {
        let mut engine = TelemetryEngine::default();
        engine.ingest_at("R1", obs(AircraftKind::Bogie, 0.0), 0.0);
        // A long silent gap then one more report: prediction inflates the
        // covariance, the cap bounds the derived radius.
        engine.ingest_at("R1", obs(AircraftKind::Bogie, 5.0), 100_000.0);
        let radius = engine.latest_states()["R1"].uncertainty_radius;
        assert!(radius <= 30.0);
    }
}
