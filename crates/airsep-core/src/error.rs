//! Error types for mission loading.
//!
//! Arithmetic degeneracies (zero relative velocity, singular innovation
//! covariance, infeasible resolutions) are handled in-band by the components
//! themselves and never surface here.

use thiserror::Error;

/// Failure to load a mission file from disk.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("failed to read mission file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid mission JSON: {0}")]
    Json(#[from] serde_json::Error),
}
