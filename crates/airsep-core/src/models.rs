//! Core data models for the separation-assurance engine.
//!
//! Positions live in a planar local frame: meters on x/y, altitude above
//! ground on z. Time is mission-relative seconds unless noted otherwise.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Default cruise altitude for waypoints submitted without a z value.
pub const DEFAULT_ALTITUDE_M: f64 = 50.0;

/// Default scalar velocity for missions with neither velocity nor end time.
pub const DEFAULT_VELOCITY_MPS: f64 = 5.0;

fn default_altitude() -> f64 {
    DEFAULT_ALTITUDE_M
}

/// A single mission waypoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_altitude")]
    pub z: f64,
}

impl Waypoint {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// A waypoint mission for one aircraft.
///
/// Velocity resolution order: an `end_time` (with a non-degenerate path)
/// derives the scalar velocity from total path length; otherwise the
/// explicit `velocity` is used; otherwise 5 m/s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub velocity: Option<f64>,
}

/// One constant-velocity leg of a compiled trajectory, stamped with its
/// absolute time window.
///
/// Invariant (for compiler-emitted segments): `velocity * (t_end - t_start)`
/// equals `a1 - a0` within floating-point tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub drone_id: String,
    #[serde(rename = "A0")]
    pub a0: Vector3<f64>,
    #[serde(rename = "A1")]
    pub a1: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub t_start: f64,
    pub t_end: f64,
}

impl Segment {
    /// Build a leg from its endpoints and duration. The velocity vector is
    /// derived so the segment invariant holds by construction.
    pub fn new(
        drone_id: impl Into<String>,
        a0: Vector3<f64>,
        a1: Vector3<f64>,
        t_start: f64,
        duration: f64,
    ) -> Self {
        Self {
            drone_id: drone_id.into(),
            a0,
            a1,
            velocity: (a1 - a0) / duration,
            t_start,
            t_end: t_start + duration,
        }
    }

    /// Position at an absolute time, extrapolating linearly from `a0`.
    pub fn position_at(&self, t_abs: f64) -> Vector3<f64> {
        self.a0 + self.velocity * (t_abs - self.t_start)
    }

    /// Same leg shifted later in time. Geometry is untouched.
    pub fn delayed(&self, delay_s: f64) -> Self {
        Self {
            t_start: self.t_start + delay_s,
            t_end: self.t_end + delay_s,
            ..self.clone()
        }
    }

    /// Same leg rigidly translated in space. Timing is untouched.
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        Self {
            a0: self.a0 + offset,
            a1: self.a1 + offset,
            ..self.clone()
        }
    }

    /// Clamp both endpoints to z >= 0 (below-ground legs are not flyable).
    pub fn clamped_to_floor(mut self) -> Self {
        if self.a0.z < 0.0 {
            self.a0.z = 0.0;
        }
        if self.a1.z < 0.0 {
            self.a1.z = 0.0;
        }
        self
    }
}

/// Severity of a detected loss of separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Warning,
}

/// One pairwise loss-of-separation event found by the offline detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictReport {
    #[serde(rename = "Drone_A")]
    pub drone_a: String,
    #[serde(rename = "Drone_B")]
    pub drone_b: String,
    pub exact_conflict_time: f64,
    pub conflict_location: [f64; 3],
    pub minimum_separation: f64,
    pub severity: Severity,
}

/// Whether an aircraft flies a known plan or is tracked from raw reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftKind {
    Controlled,
    Bogie,
}

/// A single telemetry report as received from the outside world.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "type")]
    pub kind: AircraftKind,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    #[serde(default)]
    pub vz: f64,
}

/// Fused per-aircraft state as seen by the real-time monitor.
///
/// For bogies this is the Kalman estimate; controlled aircraft report
/// directly. The uncertainty radius replaces the aircraft point at
/// broad-phase: 3 m fixed for controlled, covariance-derived for bogies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedState {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    #[serde(rename = "type")]
    pub kind: AircraftKind,
    pub uncertainty_radius: f64,
}

impl ObservedState {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.vx, self.vy, self.vz)
    }
}

/// Advisory kind. Only pause/delay advisories are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdvisoryKind {
    Delay,
}

/// Non-binding resolution advisory attached to a tactical conflict when one
/// side is controlled and the other is a bogie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionAdvisory {
    #[serde(rename = "type")]
    pub kind: AdvisoryKind,
    pub drone: String,
    pub suggested_delay_seconds: f64,
    pub message: String,
}

/// A projected conflict emitted by the real-time monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TacticalConflict {
    #[serde(rename = "id_A")]
    pub id_a: String,
    #[serde(rename = "id_B")]
    pub id_b: String,
    pub min_dist: f64,
    pub t_cpa: f64,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ra: Option<ResolutionAdvisory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_invariant_holds_by_construction() {
        let seg = Segment::new(
            "D1",
            Vector3::new(0.0, 0.0, 50.0),
            Vector3::new(100.0, 0.0, 50.0),
            5.0,
            20.0,
        );
        let traveled = seg.velocity * (seg.t_end - seg.t_start);
        assert!((traveled - (seg.a1 - seg.a0)).norm() < 1e-9);
    }

    #[test]
    fn test_segment_position_at_endpoints() {
        let seg = Segment::new(
            "D1",
            Vector3::new(0.0, 0.0, 50.0),
            Vector3::new(100.0, 0.0, 50.0),
            0.0,
            10.0,
        );
        assert!((seg.position_at(0.0) - seg.a0).norm() < 1e-9);
        assert!((seg.position_at(10.0) - seg.a1).norm() < 1e-9);
    }

    #[test]
    fn test_floor_clamp() {
        let seg = Segment::new(
            "D1",
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(50.0, 0.0, 10.0),
            0.0,
            10.0,
        )
        .translated(Vector3::new(0.0, 0.0, -20.0))
        .clamped_to_floor();
        assert_eq!(seg.a0.z, 0.0);
        assert_eq!(seg.a1.z, 0.0);
    }

    #[test]
    fn test_waypoint_altitude_default() {
        let wp: Waypoint = serde_json::from_str(r#"{"x": 1.0, "y": 2.0}"#).unwrap();
        assert_eq!(wp.z, DEFAULT_ALTITUDE_M);
    }

    #[test]
    fn test_conflict_report_wire_names() {
        let report = ConflictReport {
            drone_a: "A".into(),
            drone_b: "B".into(),
            exact_conflict_time: 1.0,
            conflict_location: [0.0, 0.0, 50.0],
            minimum_separation: 2.0,
            severity: Severity::Critical,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["Drone_A"], "A");
        assert_eq!(json["severity"], "CRITICAL");
    }
}
