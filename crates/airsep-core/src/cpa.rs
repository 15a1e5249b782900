//! Exact closest-point-of-approach kernel for linear tracks.

use nalgebra::SVector;

/// Minimum distance between two constant-velocity tracks
/// `P_A(t) = p0_a + v_a * t` and `P_B(t) = p0_b + v_b * t`.
///
/// Returns `(t_cpa, min_dist)` with `t_cpa` clamped to `[0, +inf)`. A zero
/// relative velocity yields `(0, ||p0_a - p0_b||)`.
///
/// Generic over dimension: the offline detector runs it on horizontal
/// components only, the tactical monitor on full 3D vectors.
pub fn closest_approach<const N: usize>(
    p0_a: SVector<f64, N>,
    v_a: SVector<f64, N>,
    p0_b: SVector<f64, N>,
    v_b: SVector<f64, N>,
) -> (f64, f64) {
    let w = p0_a - p0_b;
    let v = v_a - v_b;

    let a = v.dot(&v);
    if a == 0.0 {
        return (0.0, w.norm());
    }

    let t_cpa = (-w.dot(&v) / a).max(0.0);
    let min_dist = (w + v * t_cpa).norm();
    (t_cpa, min_dist)
}
