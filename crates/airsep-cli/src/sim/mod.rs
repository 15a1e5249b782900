//! Synthetic traffic generators.
//!
//! Bogies fly unpredictable retargeting paths with noisy, stuttering
//! reports; controlled drones follow their filed waypoints exactly. Both
//! produce `Observation`s for the server's telemetry endpoint.

mod bogies;
mod controlled;

pub use bogies::BogieFleet;
pub use controlled::ControlledFleet;
