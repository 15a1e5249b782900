//! REST API handlers.

pub mod ws;

use std::sync::Arc;

use airsep_core::models::Observation;
use airsep_core::trajectory::{compile_missions, MissionSet};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use nalgebra::Vector3;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::atc::FlightPlan;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plan/run", post(run_plan))
        .route("/api/plan/resolve", post(resolve_plan))
        .route("/api/plan/resolve-spatial", post(resolve_plan_spatial))
        .route("/api/proof/run", post(run_proof))
        .route("/api/telemetry/:drone_id", post(ingest_telemetry))
        .route("/api/atc/propose", post(propose_flight))
        .route("/api/atc/launch/:drone_id", post(launch_flight))
        .route("/api/atc/pause/:drone_id", post(pause_flight))
        .route("/api/atc/resume/:drone_id", post(resume_flight))
        .route("/api/atc/status", get(atc_status))
        .route("/api/atc/clear", post(clear_airspace))
        .route("/api/sim/toggle", post(toggle_sim))
        .route("/ws/telemetry", get(ws::ws_handler))
}

/// Compile a mission set and report every loss of separation.
async fn run_plan(State(state): State<Arc<AppState>>, Json(missions): Json<MissionSet>) -> Json<Value> {
    let segments = compile_missions(&missions);
    let report = state.detector().detect(&segments);
    tracing::info!(
        drones = missions.len(),
        segments = segments.len(),
        conflicts = report.len(),
        "pre-flight check complete"
    );
    Json(json!({
        "status": "success",
        "report": report,
        "segments": segments,
    }))
}

/// Time-shift-only resolution, then re-detect over the edited pool.
async fn resolve_plan(
    State(state): State<Arc<AppState>>,
    Json(missions): Json<MissionSet>,
) -> Json<Value> {
    let segments = compile_missions(&missions);
    let resolution = state.resolver().resolve_time_shift(&segments);
    let report = state.detector().detect(&resolution.segments);
    Json(json!({
        "status": "success",
        "resolutions": resolution.delays,
        "report": report,
        "segments": resolution.segments,
    }))
}

/// Grid-search resolution, then re-detect over the edited pool.
async fn resolve_plan_spatial(
    State(state): State<Arc<AppState>>,
    Json(missions): Json<MissionSet>,
) -> Json<Value> {
    let segments = compile_missions(&missions);
    let resolution = state.resolver().resolve_spatial(&segments);
    let report = state.detector().detect(&resolution.segments);
    Json(json!({
        "status": "success",
        "resolutions": resolution.report,
        "report": report,
        "segments": resolution.segments,
    }))
}

#[derive(Debug, Deserialize)]
struct ProofRequest {
    p0_a: [f64; 3],
    v_a: [f64; 3],
    p0_b: [f64; 3],
    v_b: [f64; 3],
    t_start: f64,
    t_end: f64,
}

async fn run_proof(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProofRequest>,
) -> Json<Value> {
    let proof = state.proof_engine().generate(
        Vector3::from(req.p0_a),
        Vector3::from(req.v_a),
        Vector3::from(req.p0_b),
        Vector3::from(req.v_b),
        req.t_start,
        req.t_end,
    );
    Json(json!({
        "status": "success",
        "trace": proof.trace,
        "violation": proof.violation,
    }))
}

/// Ingest one observation; the receiver stamps the wall clock. Reports are
/// dropped while the airspace is paused.
async fn ingest_telemetry(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<String>,
    Json(observation): Json<Observation>,
) -> Json<Value> {
    let accepted = state.ingest(&drone_id, observation);
    Json(json!({
        "status": if accepted { "success" } else { "paused" },
    }))
}

#[derive(Debug, Deserialize)]
struct ProposeRequest {
    drone_id: String,
    plan: FlightPlan,
}

async fn propose_flight(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProposeRequest>,
) -> Json<Value> {
    let response = state.atc.propose(&req.drone_id, req.plan);
    Json(json!(response))
}

async fn launch_flight(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<String>,
) -> Json<Value> {
    match state.atc.launch(&drone_id) {
        Some(flight) => Json(json!({
            "status": "success",
            "launched_at": flight.launched_at,
        })),
        None => Json(json!({
            "status": "error",
            "message": "Drone not found in pending queue",
        })),
    }
}

async fn pause_flight(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<String>,
) -> Json<Value> {
    let found = state.atc.pause(&drone_id);
    Json(json!({
        "status": if found { "paused" } else { "error" },
        "drone_id": drone_id,
    }))
}

async fn resume_flight(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<String>,
) -> Json<Value> {
    let found = state.atc.resume(&drone_id);
    Json(json!({
        "status": if found { "resumed" } else { "error" },
        "drone_id": drone_id,
    }))
}

async fn atc_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.atc.status(state.is_playing())))
}

async fn clear_airspace(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.clear();
    tracing::info!("airspace cleared and paused");
    Json(json!({ "status": "success", "is_playing": false }))
}

async fn toggle_sim(State(state): State<Arc<AppState>>) -> Json<Value> {
    let playing = state.toggle_playing();
    Json(json!({ "status": "success", "playing": playing }))
}
