//! HTTP surface integration tests.
//!
//! Run with: cargo test --test api_test -- --ignored
//! Requires a running airsep-server.

use reqwest::Client;
use serde_json::json;

fn base_url() -> String {
    std::env::var("AIRSEP_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn crossing_missions() -> serde_json::Value {
    json!({
        "A": {
            "waypoints": [
                {"x": 0.0, "y": 0.0, "z": 50.0},
                {"x": 100.0, "y": 100.0, "z": 50.0}
            ],
            "velocity": 5.0
        },
        "B": {
            "waypoints": [
                {"x": 0.0, "y": 100.0, "z": 50.0},
                {"x": 100.0, "y": 0.0, "z": 50.0}
            ],
            "velocity": 5.0
        }
    })
}

/// A coplanar crossing must come back with a conflict report.
#[tokio::test]
#[ignore]
async fn test_plan_run_reports_crossing() {
    let client = Client::new();
    let resp = client
        .post(format!("{}/api/plan/run", base_url()))
        .json(&crossing_missions())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();

    assert_eq!(body["status"], "success");
    let report = body["report"].as_array().unwrap();
    assert!(!report.is_empty(), "crossing missions should conflict");
    assert_eq!(report[0]["Drone_A"], "A");
    assert_eq!(report[0]["Drone_B"], "B");
}

/// Resolution must leave the edited mission conflict-free.
#[tokio::test]
#[ignore]
async fn test_plan_resolve_clears_conflicts() {
    let client = Client::new();
    let resp = client
        .post(format!("{}/api/plan/resolve", base_url()))
        .json(&crossing_missions())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();

    assert_eq!(body["status"], "success");
    assert!(body["report"].as_array().unwrap().is_empty());
    assert!(!body["resolutions"].as_object().unwrap().is_empty());
}

/// Telemetry accepted while playing, dropped after a clear.
#[tokio::test]
#[ignore]
async fn test_telemetry_gate() {
    let client = Client::new();
    let base = base_url();

    let obs = json!({"type": "controlled", "x": 0.0, "y": 0.0, "z": 50.0, "vx": 5.0});
    let resp = client
        .post(format!("{base}/api/telemetry/GATE-001"))
        .json(&obs)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "success");

    client
        .post(format!("{base}/api/atc/clear"))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{base}/api/telemetry/GATE-001"))
        .json(&obs)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "paused");

    // Restore the gate for other tests.
    client
        .post(format!("{base}/api/sim/toggle"))
        .send()
        .await
        .unwrap();
}
