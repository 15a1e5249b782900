//! Separation standards and tuning knobs for the engine.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Separation minima and broad-phase sizing shared by the offline detector
/// and the real-time monitor.
///
/// A violation requires both cylinders breached at once: horizontal distance
/// under `safety_radius_m` and vertical distance under
/// `vertical_safety_radius_m`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparationStandards {
    /// Horizontal cylinder radius in meters.
    pub safety_radius_m: f64,
    /// Vertical cylinder half-height in meters.
    pub vertical_safety_radius_m: f64,
    /// Planar cell edge for the real-time spatial hash, meters.
    pub cell_resolution_m: f64,
    /// How far ahead the tactical monitor projects, seconds.
    pub tactical_horizon_s: f64,
    /// Suggested pause length in DELAY advisories, seconds.
    pub advisory_delay_s: f64,
    /// Telemetry history kept per aircraft, observations.
    pub rolling_buffer_size: usize,
}

impl Default for SeparationStandards {
    fn default() -> Self {
        Self {
            safety_radius_m: 35.0,
            vertical_safety_radius_m: 15.0,
            cell_resolution_m: 66.0,
            tactical_horizon_s: 60.0,
            advisory_delay_s: 5.0,
            rolling_buffer_size: 40,
        }
    }
}

/// Constants of the per-bogie constant-velocity Kalman filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterParams {
    /// Process noise scale (applied as I * scale * dt).
    pub process_noise: f64,
    /// GPS measurement variance, m^2.
    pub measurement_noise: f64,
    /// Initial covariance scale; small so the derived uncertainty radius is
    /// meaningful from the first report.
    pub initial_variance: f64,
    /// Upper bound on the derived uncertainty radius, meters.
    pub radius_cap_m: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            process_noise: 0.1,
            measurement_noise: 2.0,
            initial_variance: 1.0,
            radius_cap_m: 30.0,
        }
    }
}

/// Candidate lattice and bounds for the strategic resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverLattice {
    /// Launch delays tried for each reroute candidate, seconds.
    pub delays_s: Vec<f64>,
    /// Rigid path translations tried for each reroute candidate, meters.
    pub offsets_m: Vec<Vector3<f64>>,
    /// Outer-loop bound for the grid-search resolver.
    pub max_iterations: usize,
    /// Delay committed when no lattice point clears the candidate, seconds.
    pub fallback_delay_s: f64,
    /// Weight of one delay second against one meter of offset in the cost.
    pub delay_cost_weight: f64,
    /// Per-iteration delay of the time-shift-only resolver, seconds.
    pub time_shift_step_s: f64,
    /// Outer-loop bound for the time-shift-only resolver.
    pub time_shift_max_iterations: usize,
}

impl Default for ResolverLattice {
    fn default() -> Self {
        Self {
            delays_s: vec![0.0, 5.0, 10.0, 15.0, 20.0, 30.0],
            offsets_m: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(40.0, 0.0, 0.0),
                Vector3::new(-40.0, 0.0, 0.0),
                Vector3::new(0.0, 40.0, 0.0),
                Vector3::new(0.0, -40.0, 0.0),
                Vector3::new(40.0, 40.0, 0.0),
                Vector3::new(-40.0, -40.0, 0.0),
                Vector3::new(0.0, 0.0, 20.0),
                Vector3::new(0.0, 0.0, -20.0),
            ],
            max_iterations: 20,
            fallback_delay_s: 45.0,
            delay_cost_weight: 2.0,
            time_shift_step_s: 2.0,
            time_shift_max_iterations: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lattice_size() {
        let lattice = ResolverLattice::default();
        assert_eq!(lattice.delays_s.len() * lattice.offsets_m.len(), 54);
    }

    #[test]
    fn test_default_standards() {
        let std = SeparationStandards::default();
        assert_eq!(std.safety_radius_m, 35.0);
        assert_eq!(std.vertical_safety_radius_m, 15.0);
    }
}
