//! Analytic separation proof for a single pair of linear tracks.
//!
//! Produces a readable derivation: assumptions, parametric model,
//! relative-motion minimization, exact evaluation, verdict. Used by the
//! pre-flight surface to justify a SAFE/VIOLATION call for one track pair
//! over a bounded window.

use std::fmt::Write;

use nalgebra::Vector3;

use crate::cpa::closest_approach;

/// Generates separation proofs against a single horizontal-equivalent
/// radius (spherical, since the proof works on full 3D tracks).
#[derive(Debug, Clone)]
pub struct ProofEngine {
    safety_radius_m: f64,
}

/// Outcome of a proof run: the rendered trace plus the numbers it derived.
#[derive(Debug, Clone)]
pub struct Proof {
    pub trace: String,
    pub t_cpa: f64,
    pub min_dist: f64,
    pub violation: bool,
}

impl ProofEngine {
    pub fn new(safety_radius_m: f64) -> Self {
        Self { safety_radius_m }
    }

    /// Derive the minimum separation of two tracks over `[t_start, t_end]`
    /// and render the proof.
    pub fn generate(
        &self,
        p0_a: Vector3<f64>,
        v_a: Vector3<f64>,
        p0_b: Vector3<f64>,
        v_b: Vector3<f64>,
        t_start: f64,
        t_end: f64,
    ) -> Proof {
        let w0 = p0_a - p0_b;
        let v = v_a - v_b;

        let (mut t_cpa, mut min_dist) = closest_approach(p0_a, v_a, p0_b, v_b);
        if t_cpa < t_start {
            t_cpa = t_start;
            min_dist = (w0 + v * t_cpa).norm();
        } else if t_cpa > t_end {
            t_cpa = t_end;
            min_dist = (w0 + v * t_cpa).norm();
        }
        let violation = min_dist < self.safety_radius_m;

        let mut trace = String::new();
        let _ = writeln!(trace, "ASSUMPTIONS:");
        let _ = writeln!(trace, "- Constant velocity per segment");
        let _ = writeln!(trace, "- Straight-line motion");
        let _ = writeln!(trace, "- No GPS noise");
        let _ = writeln!(trace, "- No wind");
        let _ = writeln!(trace, "- No acceleration\n");

        let _ = writeln!(trace, "Parametric model:");
        let _ = writeln!(trace, "P_A(t) = {} + {} * t", fmt_vec(p0_a), fmt_vec(v_a));
        let _ = writeln!(trace, "P_B(t) = {} + {} * t\n", fmt_vec(p0_b), fmt_vec(v_b));

        let _ = writeln!(trace, "Analytic optimization:");
        let _ = writeln!(trace, "Relative motion D(t) = {} + {} * t", fmt_vec(w0), fmt_vec(v));
        let _ = writeln!(trace, "Minimizing squared distance D^2(t)\n");

        let _ = writeln!(trace, "Exact evaluation:");
        let _ = writeln!(trace, "CPA time: {t_cpa:.3}s");
        let _ = writeln!(trace, "Min distance: {min_dist:.3}m");
        let _ = writeln!(trace, "Threshold: {:.1}m", self.safety_radius_m);
        let _ = writeln!(
            trace,
            "STATUS: {}\n",
            if violation { "VIOLATION" } else { "SAFE" }
        );

        let _ = writeln!(trace, "Conclusion:");
        if violation {
            let _ = writeln!(
                trace,
                "The mathematical bounds predict a critically severe minimum distance of {min_dist:.3}m at exactly t={t_cpa:.3}s."
            );
        } else {
            let _ = writeln!(
                trace,
                "The planned trajectory is mathematically guaranteed to maintain at least {min_dist:.3}m separation within the evaluation window."
            );
        }

        Proof {
            trace,
            t_cpa,
            min_dist,
            violation,
        }
    }
}

fn fmt_vec(v: Vector3<f64>) -> String {
    format!("[{:.2}, {:.2}, {:.2}]", v.x, v.y, v.z)
}
