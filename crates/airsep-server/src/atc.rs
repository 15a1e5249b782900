//! ATC launch queue: proposed plans wait for clearance, launched plans are
//! tracked as active controlled flights that can be paused and resumed.

use airsep_core::models::Waypoint;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// A flight plan as submitted by an operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPlan {
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub velocity: Option<f64>,
}

/// A launched plan with its clearance timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveFlight {
    pub plan: FlightPlan,
    pub launched_at: DateTime<Utc>,
    pub paused: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProposalResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtcStatus {
    pub pending_clearance: Vec<String>,
    pub launched: Vec<String>,
    pub paused: Vec<String>,
    pub is_playing: bool,
}

/// Launch queue state. All maps are concurrent; handler-level operations are
/// single-key and need no cross-map transaction.
#[derive(Debug, Default)]
pub struct AtcManager {
    pending: DashMap<String, FlightPlan>,
    active: DashMap<String, ActiveFlight>,
}

impl AtcManager {
    /// Accept a plan into the pending-clearance queue.
    pub fn propose(&self, drone_id: &str, plan: FlightPlan) -> ProposalResponse {
        self.pending.insert(drone_id.to_string(), plan);
        ProposalResponse {
            status: "APPROVED",
            message: "Flight plan accepted into pending queue.",
        }
    }

    /// Move a pending plan to active, stamping the launch time.
    pub fn launch(&self, drone_id: &str) -> Option<ActiveFlight> {
        let (_, plan) = self.pending.remove(drone_id)?;
        let flight = ActiveFlight {
            plan,
            launched_at: Utc::now(),
            paused: false,
        };
        self.active.insert(drone_id.to_string(), flight.clone());
        Some(flight)
    }

    pub fn pause(&self, drone_id: &str) -> bool {
        match self.active.get_mut(drone_id) {
            Some(mut flight) => {
                flight.paused = true;
                true
            }
            None => false,
        }
    }

    pub fn resume(&self, drone_id: &str) -> bool {
        match self.active.get_mut(drone_id) {
            Some(mut flight) => {
                flight.paused = false;
                true
            }
            None => false,
        }
    }

    pub fn status(&self, is_playing: bool) -> AtcStatus {
        let mut pending: Vec<String> = self.pending.iter().map(|e| e.key().clone()).collect();
        let mut launched: Vec<String> = self.active.iter().map(|e| e.key().clone()).collect();
        let mut paused: Vec<String> = self
            .active
            .iter()
            .filter(|e| e.value().paused)
            .map(|e| e.key().clone())
            .collect();
        pending.sort();
        launched.sort();
        paused.sort();
        AtcStatus {
            pending_clearance: pending,
            launched,
            paused,
            is_playing,
        }
    }

    pub fn clear(&self) {
        self.pending.clear();
        self.active.clear();
    }
}
