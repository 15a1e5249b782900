//! Airsep CLI - operator tools for the separation-assurance system.
//!
//! Binaries:
//! - plan_check: offline mission check and resolution pipeline
//! - traffic_sim: synthetic cooperative + rogue traffic against a server

pub mod sim;
