//! Server configuration from environment.

use airsep_core::SeparationStandards;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub broadcast_interval_ms: u64,
    pub safety_radius_m: f64,
    pub vertical_safety_radius_m: f64,
    pub cell_resolution_m: f64,
    pub proof_safety_radius_m: f64,
    /// CORS origin allowlist. Empty means CORS stays disabled.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("AIRSEP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            broadcast_interval_ms: env::var("AIRSEP_BROADCAST_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(500),
            safety_radius_m: env_f64("AIRSEP_SAFETY_RADIUS", 35.0),
            vertical_safety_radius_m: env_f64("AIRSEP_VERTICAL_SAFETY_RADIUS", 15.0),
            cell_resolution_m: env_f64("AIRSEP_CELL_RESOLUTION", 66.0),
            proof_safety_radius_m: env_f64("AIRSEP_PROOF_SAFETY_RADIUS", 10.0),
            allowed_origins: env::var("AIRSEP_CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }

    pub fn standards(&self) -> SeparationStandards {
        SeparationStandards {
            safety_radius_m: self.safety_radius_m,
            vertical_safety_radius_m: self.vertical_safety_radius_m,
            cell_resolution_m: self.cell_resolution_m,
            ..SeparationStandards::default()
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
