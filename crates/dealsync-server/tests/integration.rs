use axum::http::StatusCode;
use dealsync_core::config::Config;
use dealsync_core::record::ProjectRecord;
use dealsync_core::store::ProjectStore;
use dealsync_server::state::AppState;
use dealsync_server::worker::BatchReport;
use http_body_util::BodyExt;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// App state over a store file inside the given temp directory, no
/// credentials configured (mock mode).
fn test_state(dir: &TempDir) -> AppState {
    let config = Config {
        store_path: Some(dir.path().join("projects.json")),
        ..Config::default()
    };
    AppState::new(config)
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Wait for the reconcile worker to report a finished batch. The webhook ack
/// and this report are deliberately decoupled; tests observe both.
async fn next_report(rx: &mut broadcast::Receiver<BatchReport>) -> BatchReport {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("worker did not report within 5s")
        .expect("report channel closed")
}

fn closed_won_body(deal_id: &str) -> serde_json::Value {
    serde_json::json!({
        "objectId": deal_id,
        "propertyName": "dealstage",
        "propertyValue": "closedwon",
        "subscriptionType": "deal.propertyChange",
    })
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_reports_running_without_credentials() {
    let dir = TempDir::new().unwrap();
    let app = dealsync_server::build_router(test_state(&dir));

    let (status, json) = get(app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");
    assert_eq!(json["totalProjects"], 0);
    assert_eq!(json["hubspotConnected"], false);
}

#[tokio::test]
async fn root_serves_the_same_status_document() {
    let dir = TempDir::new().unwrap();
    let app = dealsync_server::build_router(test_state(&dir));

    let (status, json) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");
}

// ---------------------------------------------------------------------------
// Webhook → worker → store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn webhook_acks_before_processing() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = dealsync_server::build_router(state);

    let (status, json) = post_json(app, "/webhook/hubspot/deal-won", closed_won_body("1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["received"], true);
}

#[tokio::test]
async fn closed_won_event_creates_mock_record() {
    // End-to-end scenario A: no credentials configured.
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let mut reports = state.report_tx.subscribe();
    let app = dealsync_server::build_router(state.clone());

    let (status, _) =
        post_json(app.clone(), "/webhook/hubspot/deal-won", closed_won_body("111")).await;
    assert_eq!(status, StatusCode::OK);

    let report = next_report(&mut reports).await;
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].state, "created");
    assert_eq!(report.outcomes[0].deal_id, "111");

    let records = state.store.load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].deal_id, "111");
    assert_eq!(records[0].name, "New Project");
    assert_eq!(records[0].amount, 0.0);
    assert_eq!(records[0].source, "hubspot");
}

#[tokio::test]
async fn same_event_twice_yields_exactly_one_record() {
    // End-to-end scenario B.
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let mut reports = state.report_tx.subscribe();
    let app = dealsync_server::build_router(state.clone());

    post_json(app.clone(), "/webhook/hubspot/deal-won", closed_won_body("111")).await;
    let first = next_report(&mut reports).await;
    assert_eq!(first.outcomes[0].state, "created");

    post_json(app.clone(), "/webhook/hubspot/deal-won", closed_won_body("111")).await;
    let second = next_report(&mut reports).await;
    assert_eq!(second.outcomes[0].state, "duplicate");

    let records = state.store.load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].deal_id, "111");
}

#[tokio::test]
async fn other_stage_leaves_store_unchanged() {
    // End-to-end scenario C.
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let mut reports = state.report_tx.subscribe();
    let app = dealsync_server::build_router(state.clone());

    let body = serde_json::json!({
        "objectId": "222",
        "propertyName": "dealstage",
        "propertyValue": "qualifiedtobuy",
    });
    let (status, _) = post_json(app, "/webhook/hubspot/deal-won", body).await;
    assert_eq!(status, StatusCode::OK);

    let report = next_report(&mut reports).await;
    assert_eq!(report.outcomes[0].state, "ignored");
    assert!(state.store.load().is_empty());
}

#[tokio::test]
async fn batch_array_processes_each_event_independently() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let mut reports = state.report_tx.subscribe();
    let app = dealsync_server::build_router(state.clone());

    let body = serde_json::json!([
        { "objectId": 1, "propertyName": "dealstage", "propertyValue": "closedwon" },
        { "objectId": 2, "propertyName": "dealstage", "propertyValue": "appointmentscheduled" },
    ]);
    post_json(app, "/webhook/hubspot/deal-won", body).await;

    let report = next_report(&mut reports).await;
    let states: Vec<&str> = report.outcomes.iter().map(|o| o.state).collect();
    assert_eq!(states, vec!["created", "ignored"]);

    let records = state.store.load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].deal_id, "1");
}

#[tokio::test]
async fn malformed_webhook_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = dealsync_server::build_router(test_state(&dir));

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/webhook/hubspot/deal-won")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Test trigger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_trigger_reenters_the_webhook_path() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let mut reports = state.report_tx.subscribe();
    let app = dealsync_server::build_router(state.clone());

    let (status, json) = post_json(app, "/test/trigger", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Test webhook triggered");
    assert_eq!(json["data"]["objectId"], "12345");

    let report = next_report(&mut reports).await;
    assert_eq!(report.outcomes[0].state, "created");

    let records = state.store.load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].deal_id, "12345");
}

// ---------------------------------------------------------------------------
// Projects view
// ---------------------------------------------------------------------------

#[tokio::test]
async fn projects_lists_store_records_without_credentials() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let store = ProjectStore::new(dir.path().join("projects.json"));
    store.append(ProjectRecord::new(1, "Acme", "111", 15000.0));

    let app = dealsync_server::build_router(state);
    let (status, json) = get(app, "/projects").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["projects"][0]["dealId"], "111");
    assert_eq!(json["projects"][0]["amount"], 15000.0);
}

#[tokio::test]
async fn projects_reads_through_to_crm_when_connected() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/crm/v3/objects/deals/search")
        .with_status(200)
        .with_body(
            r#"{"results":[{"id":"7","properties":{"dealname":"Live Deal","amount":"250","dealstage":"closedwon"}}]}"#,
        )
        .create_async()
        .await;

    let mut state = test_state(&dir);
    state.hubspot =
        Some(dealsync_core::hubspot::HubSpotClient::new("token").with_base_url(server.url()));

    let app = dealsync_server::build_router(state.clone());
    let (status, json) = get(app, "/projects").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["projects"][0]["name"], "Live Deal");
    assert_eq!(json["projects"][0]["amount"], 250.0);
    // Read-through only: nothing is written back to the local store.
    assert!(state.store.load().is_empty());
}

// ---------------------------------------------------------------------------
// Debug log
// ---------------------------------------------------------------------------

#[tokio::test]
async fn debug_log_captures_reconcile_activity() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let mut reports = state.report_tx.subscribe();
    let app = dealsync_server::build_router(state.clone());

    post_json(app.clone(), "/webhook/hubspot/deal-won", closed_won_body("5")).await;
    next_report(&mut reports).await;

    let (status, json) = get(app, "/api/debug").await;
    assert_eq!(status, StatusCode::OK);
    let entries = json["entries"].as_array().expect("entries is array");
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["message"]
        .as_str()
        .unwrap()
        .contains("created project"));
}

// ---------------------------------------------------------------------------
// OAuth helper
// ---------------------------------------------------------------------------

#[tokio::test]
async fn authorize_without_registration_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = dealsync_server::build_router(test_state(&dir));

    let (status, json) = get(app, "/auth/basecamp").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("BASECAMP_CLIENT_ID"));
}

#[tokio::test]
async fn authorize_redirects_to_consent_page() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        store_path: Some(dir.path().join("projects.json")),
        basecamp_client_id: Some("cid".into()),
        basecamp_client_secret: Some("secret".into()),
        basecamp_redirect_uri: Some("http://localhost:3000/auth/basecamp/callback".into()),
        ..Config::default()
    };
    let app = dealsync_server::build_router(AppState::new(config));

    let req = axum::http::Request::builder()
        .uri("/auth/basecamp")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("https://launchpad.37signals.com/authorization/new?"));
    assert!(location.contains("client_id=cid"));
}

#[tokio::test]
async fn callback_with_unknown_state_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        store_path: Some(dir.path().join("projects.json")),
        basecamp_client_id: Some("cid".into()),
        basecamp_client_secret: Some("secret".into()),
        basecamp_redirect_uri: Some("http://localhost:3000/auth/basecamp/callback".into()),
        ..Config::default()
    };
    let app = dealsync_server::build_router(AppState::new(config));

    let (status, json) = get(app, "/auth/basecamp/callback?code=abc&state=forged").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("state"));
}
