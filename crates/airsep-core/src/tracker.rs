//! Per-bogie state estimation: a 6-state constant-velocity Kalman filter.

use std::collections::HashMap;

use nalgebra::{Matrix3, Matrix3x6, Matrix6, Vector3, Vector6};

use crate::models::Observation;
use crate::rules::FilterParams;

/// Filter state for one uncooperative aircraft.
///
/// State vector is [px, py, pz, vx, vy, vz]; covariance stays symmetric
/// positive semi-definite through predict/update.
#[derive(Debug, Clone)]
pub struct TrackEstimate {
    pub state: Vector6<f64>,
    pub covariance: Matrix6<f64>,
    pub last_update: f64,
}

impl TrackEstimate {
    fn from_first_observation(obs: &Observation, timestamp: f64, params: &FilterParams) -> Self {
        Self {
            state: Vector6::new(obs.x, obs.y, obs.z, obs.vx, obs.vy, obs.vz),
            covariance: Matrix6::identity() * params.initial_variance,
            last_update: timestamp,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.state[0], self.state[1], self.state[2])
    }

    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.state[3], self.state[4], self.state[5])
    }

    /// Position-block covariance trace, capped. Downstream separation uses
    /// this as the aircraft's effective size.
    pub fn uncertainty_radius(&self, params: &FilterParams) -> f64 {
        let trace = self.covariance[(0, 0)] + self.covariance[(1, 1)] + self.covariance[(2, 2)];
        trace.min(params.radius_cap_m)
    }
}

/// Owns one filter per bogie id. Callers serialize access; there is no
/// internal locking.
#[derive(Debug, Clone, Default)]
pub struct BogieTracker {
    params: FilterParams,
    tracks: HashMap<String, TrackEstimate>,
}

impl BogieTracker {
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            tracks: HashMap::new(),
        }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Fold one position report into the filter for `id`. The first report
    /// seeds the state directly; later reports run a full predict/update.
    pub fn observe(&mut self, id: &str, obs: &Observation, timestamp: f64) {
        match self.tracks.get_mut(id) {
            None => {
                self.tracks.insert(
                    id.to_string(),
                    TrackEstimate::from_first_observation(obs, timestamp, &self.params),
                );
            }
            Some(track) => {
                let dt = (timestamp - track.last_update).max(1e-3);
                step(track, Vector3::new(obs.x, obs.y, obs.z), dt, &self.params);
                track.last_update = timestamp;
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&TrackEstimate> {
        self.tracks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

/// One predict/update cycle with a position-only measurement.
///
/// A singular innovation covariance skips the update and keeps the
/// predicted state; it never raises.
fn step(track: &mut TrackEstimate, z: Vector3<f64>, dt: f64, params: &FilterParams) {
    let mut f = Matrix6::<f64>::identity();
    f[(0, 3)] = dt;
    f[(1, 4)] = dt;
    f[(2, 5)] = dt;
    let q = Matrix6::<f64>::identity() * (params.process_noise * dt);

    let x_pred = f * track.state;
    let p_pred = f * track.covariance * f.transpose() + q;

    let h = Matrix3x6::<f64>::identity();
    let r = Matrix3::<f64>::identity() * params.measurement_noise;
    let s = h * p_pred * h.transpose() + r;

    match s.try_inverse() {
        Some(s_inv) => {
            let k = p_pred * h.transpose() * s_inv;
            let y = z - h * x_pred;
            track.state = x_pred + k * y;
            track.covariance = (Matrix6::identity() - k * h) * p_pred;
        }
        None => {
            track.state = x_pred;
            track.covariance = p_pred;
        }
    }
}
