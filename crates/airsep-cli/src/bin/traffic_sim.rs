//! Synthetic traffic simulator.
//!
//! Streams cooperative and rogue telemetry at a running airsep-server so the
//! tactical monitor has something to chew on.

use std::time::Duration;

use airsep_cli::sim::{BogieFleet, ControlledFleet};
use airsep_core::models::{Observation, Waypoint};
use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time;

/// Synthetic traffic generator for the separation-assurance server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Number of rogue drones to spawn
    #[arg(long, default_value_t = 3)]
    bogies: usize,

    /// Number of controlled drones flying crossing plans
    #[arg(long, default_value_t = 2)]
    controlled: usize,

    /// Duration in seconds
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

/// Crossing plans fanned around the origin: each drone flies a diameter of
/// the same 600 m circle, so everyone converges on the center.
fn crossing_plan(index: usize, total: usize) -> Vec<Waypoint> {
    let angle = std::f64::consts::TAU * index as f64 / total.max(1) as f64;
    let radius = 300.0;
    vec![
        Waypoint {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
            z: 50.0,
        },
        Waypoint {
            x: -radius * angle.cos(),
            y: -radius * angle.sin(),
            z: 50.0,
        },
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut bogies = match args.seed {
        Some(seed) => BogieFleet::with_seed(seed),
        None => BogieFleet::new(),
    };
    let mut controlled = ControlledFleet::new();

    for i in 0..args.bogies {
        let x = rng.random_range(-500.0..500.0);
        let y = rng.random_range(-500.0..500.0);
        bogies.spawn(&format!("ROGUE-{:03}", i + 1), x, y, 0.0);
    }
    for i in 0..args.controlled {
        controlled.add(
            &format!("UAS-{:03}", i + 1),
            crossing_plan(i, args.controlled),
            10.0,
            0.0,
        );
    }

    println!("Connecting to server at {}...", args.url);
    println!(
        "Streaming {} bogie(s) + {} controlled drone(s) for {}s\n",
        args.bogies, args.controlled, args.duration
    );

    let client = reqwest::Client::new();
    let start = time::Instant::now();
    let mut sent = 0usize;
    let mut interval = time::interval(Duration::from_millis(100));

    loop {
        interval.tick().await;
        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > args.duration as f64 {
            break;
        }

        let mut reports = bogies.tick(elapsed);
        reports.extend(controlled.tick(elapsed));

        for (drone_id, observation) in reports {
            match send_report(&client, &args.url, &drone_id, &observation).await {
                Ok(()) => {
                    sent += 1;
                    println!(
                        "[{elapsed:6.1}s] {drone_id}: ({:.1}, {:.1}, {:.1}) -> OK",
                        observation.x, observation.y, observation.z
                    );
                }
                Err(e) => eprintln!("[{drone_id}] send failed: {e}"),
            }
        }

        if controlled.is_empty() && bogies.is_empty() {
            break;
        }
    }

    println!("\nSimulation complete. Sent {sent} report(s).");
    Ok(())
}

async fn send_report(
    client: &reqwest::Client,
    base_url: &str,
    drone_id: &str,
    observation: &Observation,
) -> Result<()> {
    client
        .post(format!("{base_url}/api/telemetry/{drone_id}"))
        .json(observation)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
