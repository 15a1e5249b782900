//! Offline mission pipeline: load a mission file, detect every loss of
//! separation, optionally resolve, and write the report.

use std::path::PathBuf;

use airsep_core::rules::SeparationStandards;
use airsep_core::trajectory::{compile_missions, load_mission_file};
use airsep_core::{ConflictDetector, StrategicResolver};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ResolveMode {
    /// Detection only
    None,
    /// Delay the lower priority aircraft in 2 s steps
    TimeShift,
    /// Grid search over launch delays and parallel path offsets
    Spatial,
}

/// Pre-flight conflict check for a 4D waypoint mission file
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Mission JSON file (drone id -> waypoints/start_time/velocity)
    input: PathBuf,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Resolution strategy to apply after detection
    #[arg(long, value_enum, default_value = "none")]
    resolve: ResolveMode,

    /// Horizontal separation minimum in meters
    #[arg(long, default_value_t = 35.0)]
    safety_radius: f64,

    /// Vertical separation minimum in meters
    #[arg(long, default_value_t = 15.0)]
    vertical_radius: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let missions = load_mission_file(&args.input)?;
    let segments = compile_missions(&missions);
    println!(
        "Compiled {} segment(s) from {} mission(s)",
        segments.len(),
        missions.len()
    );

    let detector = ConflictDetector::new(SeparationStandards {
        safety_radius_m: args.safety_radius,
        vertical_safety_radius_m: args.vertical_radius,
        ..SeparationStandards::default()
    });

    let report = match args.resolve {
        ResolveMode::None => {
            let conflicts = detector.detect(&segments);
            println!("Found {} conflict(s)", conflicts.len());
            json!({ "report": conflicts, "segments": segments })
        }
        ResolveMode::TimeShift => {
            let resolver = StrategicResolver::new(detector.clone());
            let resolution = resolver.resolve_time_shift(&segments);
            let conflicts = detector.detect(&resolution.segments);
            println!(
                "Time-shift resolution: {} drone(s) delayed over {} iteration(s), {} conflict(s) remain",
                resolution.delays.len(),
                resolution.iterations,
                conflicts.len()
            );
            json!({
                "resolutions": resolution.delays,
                "report": conflicts,
                "segments": resolution.segments,
            })
        }
        ResolveMode::Spatial => {
            let resolver = StrategicResolver::new(detector.clone());
            let resolution = resolver.resolve_spatial(&segments);
            let conflicts = detector.detect(&resolution.segments);
            println!(
                "Grid-search resolution: {} ({} conflict(s) remain)",
                resolution.report.status,
                conflicts.len()
            );
            json!({
                "resolutions": resolution.report,
                "report": conflicts,
                "segments": resolution.segments,
            })
        }
    };

    let rendered = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, rendered)?;
            println!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
