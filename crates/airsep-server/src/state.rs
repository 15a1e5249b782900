//! Shared server state.
//!
//! The telemetry engine is the only core-owned mutable state; it sits behind
//! a mutex so ingest and monitor snapshots are serialized, as the engine
//! requires. The play gate and the launch queue are explicit owned state
//! here, not process globals.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use airsep_core::models::{Observation, ObservedState, TacticalConflict};
use airsep_core::proof::ProofEngine;
use airsep_core::{
    AirspaceMonitor, ConflictDetector, FilterParams, StrategicResolver, TelemetryEngine,
};
use tokio::sync::broadcast;

use crate::atc::AtcManager;
use crate::config::Config;

pub struct AppState {
    engine: Mutex<TelemetryEngine>,
    monitor: AirspaceMonitor,
    pub atc: AtcManager,
    is_playing: AtomicBool,
    /// Serialized broadcast frames for WS subscribers.
    pub frames_tx: broadcast::Sender<String>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (frames_tx, _) = broadcast::channel(100);
        let standards = config.standards();
        Self {
            engine: Mutex::new(TelemetryEngine::new(
                standards.rolling_buffer_size,
                FilterParams::default(),
            )),
            monitor: AirspaceMonitor::new(standards),
            atc: AtcManager::default(),
            is_playing: AtomicBool::new(true),
            frames_tx,
            config,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::Relaxed)
    }

    pub fn set_playing(&self, playing: bool) {
        self.is_playing.store(playing, Ordering::Relaxed);
    }

    pub fn toggle_playing(&self) -> bool {
        !self.is_playing.fetch_xor(true, Ordering::Relaxed)
    }

    /// Ingest one observation, stamped now. Dropped while paused: the gate
    /// stops physics, not visibility of already-known aircraft.
    pub fn ingest(&self, drone_id: &str, observation: Observation) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.engine
            .lock()
            .expect("telemetry engine lock poisoned")
            .ingest(drone_id, observation);
        true
    }

    pub fn snapshot_states(&self) -> BTreeMap<String, ObservedState> {
        self.engine
            .lock()
            .expect("telemetry engine lock poisoned")
            .latest_states()
    }

    /// Run one tactical scan over the current snapshot.
    pub fn scan_airspace(&self) -> Vec<TacticalConflict> {
        let states = self.snapshot_states();
        self.monitor.scan(&states)
    }

    /// Batch detector configured from this server's standards.
    pub fn detector(&self) -> ConflictDetector {
        ConflictDetector::new(self.config.standards())
    }

    pub fn resolver(&self) -> StrategicResolver {
        StrategicResolver::new(self.detector())
    }

    pub fn proof_engine(&self) -> ProofEngine {
        ProofEngine::new(self.config.proof_safety_radius_m)
    }

    /// Full reset: pause, drop telemetry history and filters, empty the
    /// launch queue.
    pub fn clear(&self) {
        self.set_playing(false);
        self.engine
            .lock()
            .expect("telemetry engine lock poisoned")
            .clear();
        self.atc.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airsep_core::models::AircraftKind;

    fn observation(x: f64) -> Observation {
        Observation {
            kind: AircraftKind::Controlled,
            x,
            y: 0.0,
            z: 50.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
        }
    }

    fn state() -> AppState {
        AppState::new(Config {
            server_port: 0,
            broadcast_interval_ms: 500,
            safety_radius_m: 35.0,
            vertical_safety_radius_m: 15.0,
            cell_resolution_m: 66.0,
            proof_safety_radius_m: 10.0,
            allowed_origins: Vec::new(),
        })
    }

    #[test]
    fn test_pause_gates_ingest() {
        let state = state();
        assert!(state.ingest("C1", observation(0.0)));
        state.set_playing(false);
        assert!(!state.ingest("C2", observation(10.0)));
        assert_eq!(state.snapshot_states().len(), 1);
    }

    #[test]
    fn test_toggle_flips_gate() {
        let state = state();
        assert!(!state.toggle_playing());
        assert!(!state.is_playing());
        assert!(state.toggle_playing());
        assert!(state.is_playing());
    }

    #[test]
    fn test_clear_pauses_and_empties() {
        let state = state();
        state.ingest("C1", observation(0.0));
        state.clear();
        assert!(!state.is_playing());
        assert!(state.snapshot_states().is_empty());
    }
}
