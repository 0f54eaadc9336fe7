use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body, BodyDataStream},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::time::{advance, sleep};
use tower::ServiceExt;

use freefall::{
    catalog::{Catalog, HeroContent},
    clock::ManualClock,
    create_router,
    services::SimulatedGateway,
    state::{AppSettings, AppState, SessionLimits},
    tasks::TICK_INTERVAL,
};

const SUBMIT_DELAY: Duration = Duration::from_millis(1000);

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 6, 12, 0, 0).unwrap()
}

fn app() -> Router {
    app_with(SessionLimits::default()).0
}

fn app_with(sessions: SessionLimits) -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now()));
    let settings = AppSettings {
        port: 0,
        host: "127.0.0.1".to_string(),
        drop_target: now() + ChronoDuration::milliseconds(90_125_007),
        catalog: Catalog::default_drop(),
        hero: HeroContent::default(),
        sessions,
    };
    let state = AppState::new(
        settings,
        clock.clone(),
        Arc::new(SimulatedGateway::new(SUBMIT_DELAY)),
    );
    (create_router(Arc::new(state)), clock)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Read the next SSE frame and return its `tick` payload
async fn next_tick(body: &mut BodyDataStream) -> Value {
    let frame = body.next().await.unwrap().unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.starts_with("event: tick"), "{text}");
    let data = text.lines().find_map(|line| line.strip_prefix("data:")).unwrap();
    serde_json::from_str(data.trim_start()).unwrap()
}

async fn new_session(app: &Router) -> u64 {
    let (status, body) = send(app, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_u64().unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["address"], "127.0.0.1:0");
}

#[tokio::test]
async fn countdown_reports_breakdown() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/countdown", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drop_name"], "BLACK GOLD");
    assert_eq!(body["breakdown"], json!({"days": 1, "hours": 1, "minutes": 2, "seconds": 5}));
    assert_eq!(body["expired"], false);
}

#[tokio::test(start_paused = true)]
async fn countdown_stream_ticks_every_second() {
    let (app, clock) = app_with(SessionLimits::default());
    // Let the timer publish its first tick before subscribing
    sleep(Duration::from_millis(10)).await;

    let response = app
        .oneshot(Request::get("/countdown/stream").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    let mut body = response.into_body().into_data_stream();
    let first = next_tick(&mut body).await;
    assert_eq!(
        first["breakdown"],
        json!({"days": 1, "hours": 1, "minutes": 2, "seconds": 5})
    );
    assert_eq!(first["expired"], false);

    clock.advance(ChronoDuration::seconds(1));
    advance(TICK_INTERVAL).await;

    let second = next_tick(&mut body).await;
    assert_eq!(
        second["breakdown"],
        json!({"days": 1, "hours": 1, "minutes": 2, "seconds": 4})
    );
}

#[tokio::test]
async fn retarget_restarts_countdown() {
    let app = app();
    let target = now() + ChronoDuration::days(3);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/countdown/target",
        Some(json!({ "target": target })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (_, body) = send(&app, Method::GET, "/countdown", None).await;
    assert_eq!(body["breakdown"]["days"], 3);
    assert_eq!(body["breakdown"]["hours"], 0);
    assert_eq!(
        body["target"].as_str().unwrap().parse::<DateTime<Utc>>().unwrap(),
        target
    );
}

#[tokio::test]
async fn landing_page_renders() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("FREEFALL"));
    assert!(html.contains("GOLD DUST BOMBER"));
    assert!(html.contains("SUBSCRIBE FOR DROPS"));
}

#[tokio::test]
async fn catalog_endpoints() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 6);
    assert_eq!(body["hero"]["title"], "FREEFALL");

    let (status, body) = send(&app, Method::GET, "/products/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["availability"], "Sold Out");
    assert_eq!(body["action"]["enabled"], false);

    let (status, _) = send(&app, Method::GET, "/products/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_email_is_reported_then_cleared_by_edit() {
    let app = app();
    let id = new_session(&app).await;

    send(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/signup/email"),
        Some(json!({ "email": "not-an-email" })),
    )
    .await;

    let submit = format!("/sessions/{id}/signup/submit");
    let (status, body) = send(&app, Method::POST, &submit, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signup"]["status"], "error");
    assert_eq!(body["signup"]["message"], "Please enter a valid email address.");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/signup/email"),
        Some(json!({ "email": "not-an-email!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signup"]["status"], "idle");
    assert_eq!(body["signup"]["input_enabled"], true);
}

#[tokio::test(start_paused = true)]
async fn valid_email_submits_then_succeeds() {
    let app = app();
    let id = new_session(&app).await;

    send(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/signup/email"),
        Some(json!({ "email": "user@example.com" })),
    )
    .await;

    let submit = format!("/sessions/{id}/signup/submit");
    let (status, body) = send(&app, Method::POST, &submit, None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["signup"]["status"], "submitting");
    assert_eq!(body["signup"]["input_enabled"], false);
    assert_eq!(body["signup"]["submit_label"], "SUBMITTING...");

    // Disabled while submitting
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/signup/email"),
        Some(json!({ "email": "other@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, Method::POST, &submit, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    sleep(SUBMIT_DELAY + Duration::from_millis(10)).await;

    let (_, body) = send(&app, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(body["signup"]["status"], "success");
    assert_eq!(body["signup"]["input_enabled"], false);
    assert_eq!(body["signup"]["submit_label"], "SUBSCRIBED");

    let (status, _) = send(&app, Method::POST, &submit, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn nav_and_dialog_are_per_session() {
    let app = app();
    let id = new_session(&app).await;
    let other = new_session(&app).await;

    let toggle = format!("/sessions/{id}/nav/toggle");
    let (status, body) = send(&app, Method::POST, &toggle, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expanded"], true);
    assert_eq!(body["toggle_icon"], "x");
    assert_eq!(body["menu"]["brand"], "FreeFall");

    let (status, body) = send(&app, Method::POST, &format!("/sessions/{id}/dialog/3"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["name"], "HERITAGE CARGO PANTS");
    assert_eq!(body["product"]["action"]["label"], "Sold Out");

    let (status, _) = send(&app, Method::POST, &format!("/sessions/{id}/dialog/99"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, &format!("/sessions/{other}"), None).await;
    assert_eq!(body["nav"]["expanded"], false);
    assert_eq!(body["dialog"]["open"], false);

    let (status, body) = send(&app, Method::DELETE, &format!("/sessions/{id}/dialog"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dialog"]["open"], false);
    assert_eq!(body["dialog"]["selected"], "3");

    let (_, body) = send(&app, Method::POST, &toggle, None).await;
    assert_eq!(body["expanded"], false);
    assert_eq!(body["menu"], Value::Null);
}

#[tokio::test]
async fn session_page_renders_session_state() {
    let app = app();
    let id = new_session(&app).await;
    send(&app, Method::POST, &format!("/sessions/{id}/dialog/1"), None).await;

    let (status, body) = send(&app, Method::GET, &format!("/sessions/{id}/page"), None).await;
    assert_eq!(status, StatusCode::OK);
    let html = body.as_str().unwrap();
    assert!(html.contains("role=\"dialog\""));
    assert!(html.contains("Add to Cart"));
}

#[tokio::test]
async fn closed_sessions_are_gone() {
    let app = app();
    let id = new_session(&app).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for (method, uri) in [
        (Method::GET, format!("/sessions/{id}")),
        (Method::POST, format!("/sessions/{id}/signup/submit")),
        (Method::POST, format!("/sessions/{id}/nav/toggle")),
        (Method::GET, format!("/sessions/{id}/page")),
        (Method::DELETE, format!("/sessions/{id}")),
    ] {
        let (status, _) = send(&app, method, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn session_registry_stays_bounded() {
    let (app, clock) = app_with(SessionLimits {
        ttl: ChronoDuration::minutes(30),
        max_sessions: 50,
    });

    for _ in 0..500 {
        new_session(&app).await;
    }
    let (_, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(body["sessions"], 50);

    clock.advance(ChronoDuration::minutes(30));
    let (_, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(body["sessions"], 0);
}
