//! Cooperative drone simulator.
//!
//! Controlled drones fly their filed waypoint lists at constant speed,
//! reporting clean telemetry at 2 Hz. They can be paused and resumed, and
//! are removed when the final waypoint is reached.

use std::collections::HashMap;

use airsep_core::models::{AircraftKind, Observation, Waypoint};

const REPORT_HZ: f64 = 2.0;

#[derive(Debug, Clone)]
struct ControlledDrone {
    waypoints: Vec<Waypoint>,
    velocity: f64,
    next_wp: usize,
    x: f64,
    y: f64,
    z: f64,
    paused: bool,
    last_tick: f64,
}

/// A fleet of cooperative drones flying approved plans.
#[derive(Debug, Default)]
pub struct ControlledFleet {
    drones: HashMap<String, ControlledDrone>,
}

impl ControlledFleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a drone at the first waypoint of its plan. Plans with fewer
    /// than two waypoints are ignored.
    pub fn add(&mut self, id: &str, waypoints: Vec<Waypoint>, velocity: f64, now: f64) {
        if waypoints.len() < 2 {
            return;
        }
        let start = waypoints[0];
        self.drones.insert(
            id.to_string(),
            ControlledDrone {
                waypoints,
                velocity,
                next_wp: 1,
                x: start.x,
                y: start.y,
                z: start.z,
                paused: false,
                last_tick: now,
            },
        );
    }

    pub fn pause(&mut self, id: &str) {
        if let Some(drone) = self.drones.get_mut(id) {
            drone.paused = true;
        }
    }

    pub fn resume(&mut self, id: &str) {
        if let Some(drone) = self.drones.get_mut(id) {
            drone.paused = false;
        }
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    /// Advance every due drone along its plan and emit clean reports.
    /// Completed drones are dropped from the fleet.
    pub fn tick(&mut self, now: f64) -> Vec<(String, Observation)> {
        let mut reports = Vec::new();
        let mut completed = Vec::new();
        let mut ids: Vec<String> = self.drones.keys().cloned().collect();
        ids.sort();

        for id in ids {
            let drone = self.drones.get_mut(&id).expect("id taken from key set");
            let period = 1.0 / REPORT_HZ;
            if now - drone.last_tick < period {
                continue;
            }
            drone.last_tick = now;

            if drone.next_wp >= drone.waypoints.len() {
                completed.push(id);
                continue;
            }
            if drone.paused {
                continue;
            }

            let target = drone.waypoints[drone.next_wp];
            let dx = target.x - drone.x;
            let dy = target.y - drone.y;
            let dz = target.z - drone.z;
            let dist = (dx * dx + dy * dy + dz * dz).sqrt();
            let move_dist = drone.velocity * period;

            let (vx, vy, vz) = if dist <= move_dist {
                drone.x = target.x;
                drone.y = target.y;
                drone.z = target.z;
                drone.next_wp += 1;
                (0.0, 0.0, 0.0)
            } else {
                let ratio = move_dist / dist;
                drone.x += dx * ratio;
                drone.y += dy * ratio;
                drone.z += dz * ratio;
                (
                    dx / dist * drone.velocity,
                    dy / dist * drone.velocity,
                    dz / dist * drone.velocity,
                )
            };

            reports.push((
                id,
                Observation {
                    kind: AircraftKind::Controlled,
                    x: drone.x,
                    y: drone.y,
                    z: drone.z,
                    vx,
                    vy,
                    vz,
                },
            ));
        }

        for id in completed {
            self.drones.remove(&id);
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_plan() -> Vec<Waypoint> {
        vec![
            Waypoint { x: 0.0, y: 0.0, z: 50.0 },
            Waypoint { x: 10.0, y: 0.0, z: 50.0 },
        ]
    }

    #[test]
    fn test_drone_follows_plan_and_completes() {
        let mut fleet = ControlledFleet::new();
        fleet.add("C1", straight_plan(), 2.0, 0.0);

        // 2 m/s over 10 m: ~10 movement ticks at 2 Hz, then one completion
        // sweep.
        let mut last_x = 0.0;
        for i in 1..40 {
            for (_, obs) in fleet.tick(i as f64 * 0.5) {
                assert!(obs.x >= last_x);
                last_x = obs.x;
                assert_eq!(obs.kind, AircraftKind::Controlled);
            }
        }
        assert!((last_x - 10.0).abs() < 1e-9);
        assert!(fleet.is_empty(), "completed drone should be removed");
    }

    #[test]
    fn test_pause_freezes_position() {
        let mut fleet = ControlledFleet::new();
        fleet.add("C1", straight_plan(), 2.0, 0.0);

        let first = fleet.tick(0.5);
        let x_before = first[0].1.x;

        fleet.pause("C1");
        assert!(fleet.tick(1.0).is_empty());
        assert!(fleet.tick(1.5).is_empty());

        fleet.resume("C1");
        let resumed = fleet.tick(2.0);
        assert!((resumed[0].1.x - x_before - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_plan_rejected() {
        let mut fleet = ControlledFleet::new();
        fleet.add("C1", vec![Waypoint { x: 0.0, y: 0.0, z: 50.0 }], 2.0, 0.0);
        assert!(fleet.is_empty());
    }

    #[test]
    fn test_velocity_reported_along_track() {
        let mut fleet = ControlledFleet::new();
        fleet.add("C1", straight_plan(), 2.0, 0.0);
        let reports = fleet.tick(0.5);
        let obs = reports[0].1;
        assert!((obs.vx - 2.0).abs() < 1e-9);
        assert_eq!(obs.vy, 0.0);
        assert_eq!(obs.vz, 0.0);
    }
}
