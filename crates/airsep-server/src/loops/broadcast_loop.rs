//! Periodic airspace broadcast.
//!
//! Every tick: snapshot the fused states, run the tactical monitor when the
//! airspace is playing, and fan a JSON frame out to WS subscribers. Frames
//! are always broadcast so paused airspaces stay visible.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio::sync::broadcast;
use tokio::time::interval;

use crate::state::AppState;

pub async fn run_broadcast_loop(state: Arc<AppState>, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = interval(Duration::from_millis(state.config.broadcast_interval_ms));

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {}
        }

        let states = state.snapshot_states();
        if states.is_empty() {
            continue;
        }

        let started = Instant::now();
        let conflicts = if state.is_playing() {
            state.scan_airspace()
        } else {
            Vec::new()
        };
        let check_ms = started.elapsed().as_secs_f64() * 1000.0;

        if !conflicts.is_empty() {
            tracing::warn!(count = conflicts.len(), "tactical conflicts active");
        }

        let frame = json!({
            "type": "telemetry",
            "data": states.values().collect::<Vec<_>>(),
            "conflicts": conflicts,
            "conflict_check_ms": (check_ms * 10.0).round() / 10.0,
            "drone_count": states.len(),
            "is_playing": state.is_playing(),
        });

        // Send fails only when no subscriber is connected.
        let _ = state.frames_tx.send(frame.to_string());
    }
}
