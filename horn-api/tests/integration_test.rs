use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;

use horn_api::state::{AppState, AuthSettings};
use horn_core::model::{InquiryData, InquiryRecord};
use horn_core::repository::InquiryRepository;
use horn_inquiry::submission::SubmissionOrchestrator;
use horn_inquiry::summary::MockSummaryGenerator;
use horn_store::app_config::{AgencyConfig, DispatchConfig};
use horn_store::InMemoryInquiryStore;

fn test_app() -> (Router, Arc<InMemoryInquiryStore>) {
    let repo = Arc::new(InMemoryInquiryStore::new());

    let orchestrator = Arc::new(SubmissionOrchestrator::new(
        repo.clone(),
        Arc::new(MockSummaryGenerator::with_response("Internal brief body")),
        DispatchConfig {
            endpoint: "http://localhost:0/unused".to_string(),
            enabled: false,
        },
        AgencyConfig {
            name: "Horn Travel Agency".to_string(),
            email: "info@horntravel.com.au".to_string(),
            phone: "0410 374 786".to_string(),
        },
    ));

    let state = AppState {
        repo: repo.clone(),
        sessions: Arc::new(RwLock::new(HashMap::new())),
        orchestrator,
        auth: AuthSettings {
            admin_username: "horntravel".to_string(),
            admin_password: "Horn@2020".to_string(),
            secret: "test-secret".to_string(),
            expiration: 3600,
        },
    };

    (horn_api::app(state), repo)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn patch_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/v1/admin/login",
            json!({"username": "horntravel", "password": "Horn@2020"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn authed(token: &str, method: &str, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

fn encoded(id: &str) -> String {
    id.replace('#', "%23")
}

#[tokio::test]
async fn test_wizard_submit_flow() {
    let (app, repo) = test_app();

    // Create a session: fresh defaults, step 1.
    let (status, session) = send(&app, post_empty("/v1/inquiries/session")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["step"], "TripDetails");
    assert_eq!(session["stepOrdinal"], 1);
    assert_eq!(session["data"]["adults"], 1);
    let sid = session["sessionId"].as_str().unwrap().to_string();
    let pid = session["data"]["passengers"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Fill in the trip and move to passengers.
    let (status, _) = send(
        &app,
        patch_json(
            &format!("/v1/inquiries/session/{}/trip", sid),
            json!({"origin": "Melbourne", "destination": "Dubai", "departureDate": "2026-09-15"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, session) = send(&app, post_empty(&format!("/v1/inquiries/session/{}/next", sid))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["step"], "PassengerInfo");

    // Fill in the passenger and submit.
    let (status, _) = send(
        &app,
        patch_json(
            &format!("/v1/inquiries/session/{}/passengers/{}", sid, pid),
            json!({"fullName": "Jane Doe", "phone": "0410000000"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let before = chrono::Utc::now();
    let (status, receipt) = send(
        &app,
        post_empty(&format!("/v1/inquiries/session/{}/submit", sid)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["step"], "Confirmation");
    assert!(receipt.get("warning").is_none());

    let reference = receipt["reference"].as_str().unwrap();
    let digits = reference.strip_prefix("#TRV-").expect("reference prefix");
    assert_eq!(digits.len(), 5);
    assert!(digits.chars().all(|c| c.is_ascii_digit()));

    let mailto = receipt["mailto"].as_str().unwrap();
    assert!(mailto.starts_with("mailto:info@horntravel.com.au?subject="));
    assert!(mailto.contains("Melbourne"));

    // Exactly one stored record, stamped no later than now.
    let stored = repo.load().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, reference);
    assert_eq!(stored[0].data.passengers[0].full_name, "Jane Doe");
    assert!(stored[0].submitted_at >= before);
    assert!(stored[0].submitted_at <= chrono::Utc::now());

    // Restart clears the form and issues a new passenger id.
    let (status, session) = send(
        &app,
        post_empty(&format!("/v1/inquiries/session/{}/restart", sid)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["step"], "TripDetails");
    assert_eq!(session["data"]["origin"], "");
    assert_ne!(session["data"]["passengers"][0]["id"], pid.as_str());
}

#[tokio::test]
async fn test_illegal_transitions_are_conflicts() {
    let (app, _repo) = test_app();

    let (_, session) = send(&app, post_empty("/v1/inquiries/session")).await;
    let sid = session["sessionId"].as_str().unwrap().to_string();

    // back() from TripDetails.
    let (status, body) = send(&app, post_empty(&format!("/v1/inquiries/session/{}/back", sid))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Invalid step transition"));

    // submit from TripDetails.
    let (status, _) = send(
        &app,
        post_empty(&format!("/v1/inquiries/session/{}/submit", sid)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Zero adults is rejected outright.
    let (status, _) = send(
        &app,
        patch_json(
            &format!("/v1/inquiries/session/{}/trip", sid),
            json!({"adults": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/admin/inquiries")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json(
            "/v1/admin/login",
            json!({"username": "horntravel", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = admin_token(&app).await;
    let (status, body) = send(
        &app,
        authed(&token, "GET", "/v1/admin/inquiries", Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_admin_search_and_status() {
    let (app, repo) = test_app();

    let mut data = InquiryData::fresh();
    data.origin = "Melbourne".to_string();
    data.passengers[0].phone = "0410 374 786".to_string();
    let record = repo.save(data).await.unwrap();

    let token = admin_token(&app).await;

    // Unique match on a lowercased reference.
    let query = record.id.to_lowercase().replace('#', "%23");
    let (status, body) = send(
        &app,
        authed(
            &token,
            "GET",
            &format!("/v1/admin/inquiries/search?q={}", query),
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "unique");
    assert_eq!(body["record"]["id"], record.id.as_str());

    // No match.
    let (status, body) = send(
        &app,
        authed(
            &token,
            "GET",
            "/v1/admin/inquiries/search?q=no-such-lead",
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "notFound");

    // Status lifecycle over the API.
    let uri = format!("/v1/admin/inquiries/{}/status", encoded(&record.id));
    let (status, body) = send(
        &app,
        authed(
            &token,
            "POST",
            &uri,
            Body::from(json!({"status": "Contacted"}).to_string()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Contacted");

    // Backwards is rejected.
    let (status, _) = send(
        &app,
        authed(
            &token,
            "POST",
            &uri,
            Body::from(json!({"status": "New"}).to_string()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_edit_delete_and_export() {
    let (app, repo) = test_app();

    let mut data = InquiryData::fresh();
    data.origin = "Melbourne".to_string();
    data.destination = "Hargeisa".to_string();
    let pid = data.passengers[0].id.clone();
    let record = repo.save(data).await.unwrap();

    let token = admin_token(&app).await;
    let uri = format!("/v1/admin/inquiries/{}", encoded(&record.id));

    // Edit through the typed patches.
    let (status, body) = send(
        &app,
        authed(
            &token,
            "PUT",
            &uri,
            Body::from(
                json!({
                    "trip": {"destination": "Dubai", "agentCode": "AG-77"},
                    "passengers": [{"id": pid, "fullName": "Jane Doe"}]
                })
                .to_string(),
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"], "Dubai");
    assert_eq!(body["agentCode"], "AG-77");
    assert_eq!(body["passengers"][0]["fullName"], "Jane Doe");

    // CSV export carries the fixed header row.
    let (status, body) = send(
        &app,
        authed(&token, "GET", "/v1/admin/export/csv", Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let csv = body.as_str().unwrap();
    assert!(csv.starts_with(
        "ID,Date,Type,Origin,Destination,Departure,Return,Adults,Children,Agent Code,Passengers"
    ));
    assert!(csv.contains("Jane Doe"));

    // Delete, then the record is gone and a repeat delete is a no-op.
    let (status, _) = send(&app, authed(&token, "DELETE", &uri, Body::empty())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, authed(&token, "GET", &uri, Body::empty())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, authed(&token, "DELETE", &uri, Body::empty())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_admin_import_merge_keeps_existing_records() {
    let (app, repo) = test_app();

    let mut data = InquiryData::fresh();
    data.origin = "Melbourne".to_string();
    let existing = repo.save(data).await.unwrap();

    // Backup of three records, one colliding with the stored one.
    let mut colliding = InquiryRecord::from_data(InquiryData::fresh());
    colliding.id = existing.id.clone();
    colliding.data.origin = "Hijacked".to_string();
    let fresh_a = InquiryRecord::from_data(InquiryData::fresh());
    let fresh_b = InquiryRecord::from_data(InquiryData::fresh());
    let backup = serde_json::to_string(&vec![&colliding, &fresh_a, &fresh_b]).unwrap();

    let token = admin_token(&app).await;
    let (status, body) = send(
        &app,
        authed(&token, "POST", "/v1/admin/import", Body::from(backup)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["total"], 3);

    // The colliding record kept its original fields.
    let records = repo.load().await.unwrap();
    let kept = records.iter().find(|r| r.id == existing.id).unwrap();
    assert_eq!(kept.data.origin, "Melbourne");

    // A non-array body is rejected and the store is untouched.
    let (status, _) = send(
        &app,
        authed(
            &token,
            "POST",
            "/v1/admin/import",
            Body::from("{\"oops\": true}"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(repo.load().await.unwrap().len(), 3);
}
