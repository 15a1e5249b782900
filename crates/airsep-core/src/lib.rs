//! Airsep Core - conflict detection and separation assurance for unmanned
//! aircraft.
//!
//! Pure domain logic with no networking dependencies: trajectory
//! compilation, 4D broad-phase pruning, exact CPA analysis, strategic
//! resolution, per-bogie Kalman tracking, and real-time monitoring.

pub mod cpa;
pub mod detector;
pub mod error;
pub mod grid;
pub mod models;
pub mod monitor;
pub mod proof;
pub mod resolver;
pub mod rules;
pub mod spatial;
pub mod telemetry;
pub mod tracker;
pub mod trajectory;

pub use detector::ConflictDetector;
pub use models::{
    AircraftKind, ConflictReport, Mission, Observation, ObservedState, ResolutionAdvisory,
    Segment, Severity, TacticalConflict, Waypoint,
};
pub use monitor::AirspaceMonitor;
pub use resolver::{ResolutionOutcome, ResolutionReport, StrategicResolver};
pub use rules::{FilterParams, ResolverLattice, SeparationStandards};
pub use telemetry::TelemetryEngine;
pub use tracker::BogieTracker;
