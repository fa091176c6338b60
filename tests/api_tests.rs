//! Integration tests for the HTTP surface

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use kho_clock::{
    create_router,
    store::{InMemoryStore, MatchStore, MatchTimerRow},
    timer::ManualClock,
    AppState,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap()
}

struct Harness {
    app: Router,
    state: Arc<AppState>,
    store: Arc<InMemoryStore>,
    clock: ManualClock,
}

fn harness(rows: Vec<MatchTimerRow>) -> Harness {
    let store = Arc::new(InMemoryStore::with_rows(rows));
    let clock = ManualClock::new(t0());
    let state = Arc::new(AppState::new(
        store.clone(),
        Arc::new(clock.clone()),
        20554,
        "127.0.0.1".to_string(),
        Duration::from_secs(1),
    ));
    Harness {
        app: create_router(Arc::clone(&state)),
        state,
        store,
        clock,
    }
}

fn row(id: &str, value: i64, status: &str, updated_at: DateTime<Utc>) -> MatchTimerRow {
    let mut row = MatchTimerRow::new(id);
    row.timer_value = Some(value);
    row.timer_status = Some(status.to_string());
    row.updated_at = Some(updated_at);
    row
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let h = harness(vec![]);
    let (status, body) = send(&h.app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn mount_projects_initial_fetch() {
    let h = harness(vec![row("m1", 40, "running", t0() - ChronoDuration::seconds(2))]);

    let (status, body) = send(&h.app, "POST", "/matches/m1/viewer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["match_id"], "m1");
    assert_eq!(body["display"]["seconds"], 42);
    assert_eq!(body["display"]["formatted"], "00:42");
    assert_eq!(body["display"]["label"], "LIVE");

    let (status, body) = send(&h.app, "GET", "/matches/m1/timer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"]["status"], "running");

    h.state.shutdown().await;
}

#[tokio::test]
async fn timer_for_unmounted_match_is_not_found() {
    let h = harness(vec![]);
    let (status, body) = send(&h.app, "GET", "/matches/ghost/timer", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    let (status, _) = send(&h.app, "DELETE", "/matches/ghost/viewer", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_row_mounts_without_timer() {
    let h = harness(vec![]);
    let (status, body) = send(&h.app, "POST", "/matches/m9/viewer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"]["available"], false);
    assert_eq!(body["display"]["label"], "NO TIMER");
    h.state.shutdown().await;
}

#[tokio::test]
async fn pushed_change_replaces_snapshot() {
    let h = harness(vec![row("m1", 40, "paused", t0())]);
    send(&h.app, "POST", "/matches/m1/viewer", None).await;
    let mut rx = h.state.watch_display("m1").unwrap();

    let (status, body) = send(
        &h.app,
        "POST",
        "/changes",
        Some(json!({
            "eventType": "UPDATE",
            "table": "matches",
            // producer timestamp far in the future must not matter for a push
            "new": {"id": "m1", "timer_value": 50, "timer_status": "break", "updated_at": "2030-01-01T00:00:00Z"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["match_id"], "m1");

    rx.changed().await.unwrap();
    let (_, body) = send(&h.app, "GET", "/matches/m1/timer", None).await;
    assert_eq!(body["display"]["seconds"], 50);
    assert_eq!(body["display"]["label"], "BREAK");

    // the store mirror keeps the row for later mounts
    let stored = h.store.fetch_row("m1").unwrap().unwrap();
    assert_eq!(stored.timer_value, Some(50));

    h.state.shutdown().await;
}

#[tokio::test]
async fn malformed_change_is_rejected() {
    let h = harness(vec![]);

    let (status, _) = send(
        &h.app,
        "POST",
        "/changes",
        Some(json!({"eventType": "UPDATE", "table": "matches", "new": "not a row"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &h.app,
        "POST",
        "/changes",
        Some(json!({"eventType": "UPDATE", "table": "players", "new": {"id": "p1"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unmount_tears_down_subscription() {
    let h = harness(vec![row("m1", 0, "running", t0())]);
    send(&h.app, "POST", "/matches/m1/viewer", None).await;
    send(&h.app, "POST", "/matches/m2/viewer", None).await;

    let (_, body) = send(&h.app, "GET", "/status", None).await;
    assert_eq!(body["mounted_viewers"], json!(["m1", "m2"]));
    assert_eq!(body["feed_subscribers"], 2);
    assert_eq!(body["tick_interval_ms"], 1000);

    let (status, _) = send(&h.app, "DELETE", "/matches/m1/viewer", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&h.app, "GET", "/status", None).await;
    assert_eq!(body["mounted_viewers"], json!(["m2"]));
    assert_eq!(body["feed_subscribers"], 1);
    assert_eq!(body["last_action"], "unmount m1");

    h.state.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn finished_match_shows_finished_while_clock_runs() {
    let h = harness(vec![row("m1", 100, "running", t0())]);
    send(&h.app, "POST", "/matches/m1/viewer", None).await;
    let mut rx = h.state.watch_display("m1").unwrap();

    send(
        &h.app,
        "POST",
        "/changes",
        Some(json!({"eventType": "UPDATE", "new": {"id": "m1", "timer_value": 420, "timer_status": "stopped", "status": "completed"}})),
    )
    .await;
    rx.changed().await.unwrap();

    h.clock.advance(ChronoDuration::seconds(30));
    tokio::time::sleep(Duration::from_secs(30)).await;

    let (_, body) = send(&h.app, "GET", "/matches/m1/timer", None).await;
    assert_eq!(body["display"]["label"], "FINISHED");
    assert_eq!(body["display"]["seconds"], 420);
    assert_eq!(body["display"]["formatted"], "07:00");

    h.state.shutdown().await;
}
