//! Trajectory compiler: waypoint missions to constant-velocity 4D segments.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::MissionError;
use crate::models::{Mission, Segment, DEFAULT_VELOCITY_MPS};

/// A batch of missions keyed by drone id. `BTreeMap` keeps compilation and
/// everything downstream deterministic for a given set of ids.
pub type MissionSet = BTreeMap<String, Mission>;

/// Load a mission set from a JSON file.
pub fn load_mission_file(path: impl AsRef<Path>) -> Result<MissionSet, MissionError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Compile every mission in the set, concatenating segments in drone-id
/// order. Aircraft with fewer than two waypoints are skipped rather than
/// failing the batch.
pub fn compile_missions(missions: &MissionSet) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (drone_id, mission) in missions {
        segments.extend(compile_mission(drone_id, mission));
    }
    segments
}

/// Expand one mission into its ordered legs.
///
/// Zero-length legs are discarded. The time cursor starts at
/// `mission.start_time` and advances by `leg_length / velocity` per leg.
pub fn compile_mission(drone_id: &str, mission: &Mission) -> Vec<Segment> {
    if mission.waypoints.len() < 2 {
        return Vec::new();
    }

    let legs: Vec<_> = mission
        .waypoints
        .windows(2)
        .map(|pair| (pair[0].position(), pair[1].position()))
        .collect();
    let total_dist: f64 = legs.iter().map(|(w0, w1)| (w1 - w0).norm()).sum();

    let velocity = match (mission.end_time, mission.velocity) {
        (Some(end), _) if total_dist > 0.0 && end > mission.start_time => {
            total_dist / (end - mission.start_time)
        }
        (_, Some(v)) => v,
        _ => DEFAULT_VELOCITY_MPS,
    };

    let mut cursor = mission.start_time;
    let mut segments = Vec::with_capacity(legs.len());
    for (w0, w1) in legs {
        let dist = (w1 - w0).norm();
        if dist == 0.0 {
            continue;
        }
        let duration = dist / velocity;
        segments.push(Segment::new(drone_id, w0, w1, cursor, duration));
        cursor += duration;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Waypoint;

    fn wp(x: f64, y: f64, z: f64) -> Waypoint {
        Waypoint { x, y, z }
    }

    #[test]
    fn test_compile_simple_mission() {
        let mission = Mission {
            waypoints: vec![wp(0.0, 0.0, 50.0), wp(100.0, 0.0, 50.0)],
            start_time: 0.0,
            end_time: None,
            velocity: Some(10.0),
        };
        let segs = compile_mission("D1", &mission);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].t_start, 0.0);
        assert!((segs[0].t_end - 10.0).abs() < 1e-9);
        assert!((segs[0].velocity.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_end_time_derives_velocity() {
        let mission = Mission {
            waypoints: vec![wp(0.0, 0.0, 50.0), wp(100.0, 0.0, 50.0), wp(100.0, 100.0, 50.0)],
            start_time: 10.0,
            end_time: Some(50.0),
            velocity: Some(99.0), // end_time wins
        };
        let segs = compile_mission("D1", &mission);
        assert_eq!(segs.len(), 2);
        // 200 m over 40 s => 5 m/s
        assert!((segs[0].velocity.norm() - 5.0).abs() < 1e-9);
        assert!((segs[1].t_end - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_velocity_when_unspecified() {
        let mission = Mission {
            waypoints: vec![wp(0.0, 0.0, 50.0), wp(50.0, 0.0, 50.0)],
            start_time: 0.0,
            end_time: None,
            velocity: None,
        };
        let segs = compile_mission("D1", &mission);
        assert!((segs[0].velocity.norm() - DEFAULT_VELOCITY_MPS).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_legs_discarded() {
        let mission = Mission {
            waypoints: vec![wp(0.0, 0.0, 50.0), wp(0.0, 0.0, 50.0), wp(100.0, 0.0, 50.0)],
            start_time: 0.0,
            end_time: None,
            velocity: Some(10.0),
        };
        let segs = compile_mission("D1", &mission);
        assert_eq!(segs.len(), 1);
    }

    #[test]
    fn test_single_waypoint_mission_skipped() {
        let mission = Mission {
            waypoints: vec![wp(0.0, 0.0, 50.0)],
            start_time: 0.0,
            end_time: None,
            velocity: None,
        };
        assert!(compile_mission("D1", &mission).is_empty());
    }

    #[test]
    fn test_segment_invariant_for_all_legs() {
        let mission = Mission {
            waypoints: vec![
                wp(50.0, 50.0, 0.0),
                wp(50.0, 50.0, 60.0),
                wp(200.0, 200.0, 60.0),
                wp(350.0, 350.0, 60.0),
                wp(350.0, 350.0, 0.0),
            ],
            start_time: 0.0,
            end_time: None,
            velocity: Some(12.0),
        };
        for seg in compile_mission("Lead", &mission) {
            let traveled = seg.velocity * (seg.t_end - seg.t_start);
            assert!((traveled - (seg.a1 - seg.a0)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_batch_order_is_deterministic() {
        let mut missions = MissionSet::new();
        for id in ["Zulu", "Alpha", "Mike"] {
            missions.insert(
                id.to_string(),
                Mission {
                    waypoints: vec![wp(0.0, 0.0, 50.0), wp(10.0, 0.0, 50.0)],
                    start_time: 0.0,
                    end_time: None,
                    velocity: Some(5.0),
                },
            );
        }
        let ids: Vec<_> = compile_missions(&missions)
            .iter()
            .map(|s| s.drone_id.clone())
            .collect();
        assert_eq!(ids, ["Alpha", "Mike", "Zulu"]);
    }
}
