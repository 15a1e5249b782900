//! Rogue drone simulator.
//!
//! Bogies spawn on the ground, climb to a random altitude, then wander
//! between random targets 1-3 km apart. Reports carry position noise, each
//! drone stutters at its own rate, and a report occasionally drops.

use std::collections::HashMap;

use airsep_core::models::{AircraftKind, Observation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ARRIVAL_THRESHOLD_M: f64 = 50.0;
const POSITION_NOISE_M: f64 = 0.5;
const DROPOUT_PROBABILITY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    TakingOff,
    Cruising,
}

#[derive(Debug, Clone)]
struct Bogie {
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
    target: [f64; 3],
    report_hz: f64,
    last_tick: f64,
    phase: Phase,
}

/// A fleet of uncooperative drones.
pub struct BogieFleet {
    drones: HashMap<String, Bogie>,
    rng: StdRng,
}

impl BogieFleet {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            drones: HashMap::new(),
            rng,
        }
    }

    /// Spawn a bogie on the ground; it climbs before wandering.
    pub fn spawn(&mut self, id: &str, x: f64, y: f64, now: f64) {
        let climb_alt = self.rng.random_range(50.0..200.0);
        let climb_speed = self.rng.random_range(5.0..10.0);
        let report_hz = self.rng.random_range(0.5..2.0);
        self.drones.insert(
            id.to_string(),
            Bogie {
                x,
                y,
                z: 0.0,
                vx: 0.0,
                vy: 0.0,
                vz: climb_speed,
                target: [x, y, climb_alt],
                report_hz,
                last_tick: now,
                phase: Phase::TakingOff,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    /// Advance every bogie whose report period has elapsed and collect the
    /// reports that survived the dropout roll.
    pub fn tick(&mut self, now: f64) -> Vec<(String, Observation)> {
        let mut reports = Vec::new();
        let mut ids: Vec<String> = self.drones.keys().cloned().collect();
        ids.sort();

        for id in ids {
            let drone = self.drones.get_mut(&id).expect("id taken from key set");
            let period = 1.0 / drone.report_hz;
            if now - drone.last_tick < period {
                continue;
            }

            let dx = drone.target[0] - drone.x;
            let dy = drone.target[1] - drone.y;
            let dz = drone.target[2] - drone.z;
            if (dx * dx + dy * dy + dz * dz).sqrt() < ARRIVAL_THRESHOLD_M {
                drone.phase = Phase::Cruising;
                let dx = self.rng.random_range(-3000.0..3000.0);
                let dy = self.rng.random_range(-3000.0..3000.0);
                let tz = drone.z + self.rng.random_range(-20.0..20.0);
                drone.target = [drone.x + dx, drone.y + dy, tz];

                let dz = tz - drone.z;
                let dist = (dx * dx + dy * dy + dz * dz).sqrt().max(1.0);
                let speed = self.rng.random_range(10.0..20.0);
                drone.vx = dx / dist * speed;
                drone.vy = dy / dist * speed;
                drone.vz = dz / dist * speed;
            }

            drone.last_tick = now;
            if self.rng.random_bool(DROPOUT_PROBABILITY) {
                continue;
            }

            drone.x += drone.vx * period;
            drone.y += drone.vy * period;
            drone.z += drone.vz * period;

            let noise = POSITION_NOISE_M;
            reports.push((
                id,
                Observation {
                    kind: AircraftKind::Bogie,
                    x: drone.x + self.rng.random_range(-noise..noise),
                    y: drone.y + self.rng.random_range(-noise..noise),
                    z: drone.z + self.rng.random_range(-noise..noise),
                    vx: drone.vx,
                    vy: drone.vy,
                    vz: drone.vz,
                },
            ));
        }
        reports
    }
}

impl Default for BogieFleet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_bogie_leaves_the_ground() {
        let mut fleet = BogieFleet::with_seed(7);
        fleet.spawn("R1", 100.0, 100.0, 0.0);

        let mut max_altitude: f64 = 0.0;
        let mut reports = 0;
        for i in 1..20 {
            for (_, obs) in fleet.tick(i as f64 * 2.0) {
                assert_eq!(obs.kind, AircraftKind::Bogie);
                max_altitude = max_altitude.max(obs.z);
                reports += 1;
            }
        }
        assert!(reports > 0);
        assert!(max_altitude > 1.0, "bogie never climbed, z = {max_altitude}");
    }

    #[test]
    fn test_reports_respect_rate() {
        let mut fleet = BogieFleet::with_seed(7);
        fleet.spawn("R1", 0.0, 0.0, 0.0);
        // Report rate is at most 2 Hz, so two immediate ticks cannot both
        // produce a report.
        let first = fleet.tick(10.0).len();
        let second = fleet.tick(10.01).len();
        assert!(first + second <= 1);
    }

    #[test]
    fn test_noise_stays_bounded() {
        let mut fleet = BogieFleet::with_seed(42);
        fleet.spawn("R1", 0.0, 0.0, 0.0);
        for i in 1..50 {
            for (_, obs) in fleet.tick(i as f64 * 2.0) {
                // Climb phase keeps x/y fixed at the spawn point; only
                // noise moves the report.
                if fleet.drones["R1"].phase == Phase::TakingOff {
                    assert!(obs.x.abs() <= POSITION_NOISE_M);
                    assert!(obs.y.abs() <= POSITION_NOISE_M);
                }
            }
        }
    }
}
