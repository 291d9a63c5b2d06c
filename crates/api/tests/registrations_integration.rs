//! Integration tests for public registration, quota handling, registrant
//! status management and the participant list export.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method, StatusCode};
use common::{
    create_open_activity, create_test_app, create_test_app_with_notifier, create_test_year,
    get_request_with_auth, json_request, json_request_with_auth, operator_token,
    parse_response_body, post_request_with_auth, register_participant, response_bytes,
    setup_test_db, test_config, unique_test_email, wait_for_sent_messages,
};
use domain::services::MockNotificationService;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

// =============================================================================
// Public Registration
// =============================================================================

#[tokio::test]
async fn test_registration_creates_pending_registrant_and_confirms() {
    let pool = setup_test_db().await;
    let mock = MockNotificationService::new();
    let app = create_test_app_with_notifier(test_config(), pool.clone(), Arc::new(mock.clone()));

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Confirmation Year").await;
    let activity = create_open_activity(
        &app,
        &operator,
        year["id"].as_str().unwrap(),
        "Science Fair",
        None,
    )
    .await;
    let activity_id = activity["id"].as_str().unwrap();

    let request = json_request(
        Method::POST,
        &format!("/api/v1/public/activities/{}/register", activity_id),
        json!({
            "name": "Siti Rahma",
            "school": "SMA Negeri 3 Bandung",
            "phone": "+62 811-1111-2222",
            "email": unique_test_email()
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let registrant = parse_response_body(response).await;

    assert_eq!(registrant["name"], "Siti Rahma");
    assert_eq!(registrant["status"], "pending");
    assert_eq!(registrant["attended"], false);
    assert!(registrant["attendedAt"].is_null());
    assert_eq!(registrant["activityId"], activity_id);
    let code = registrant["checkInCode"].as_str().unwrap();
    assert_eq!(code.len(), 16);

    // The confirmation goes out on a background task
    let messages = wait_for_sent_messages(&mock, 1).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].phone, "+62 811-1111-2222");
    assert!(messages[0].message.contains("Siti Rahma"));
    assert!(messages[0].message.contains("*Science Fair*"));
}

#[tokio::test]
async fn test_registration_without_phone_skips_confirmation() {
    let pool = setup_test_db().await;
    let mock = MockNotificationService::new();
    let app = create_test_app_with_notifier(test_config(), pool.clone(), Arc::new(mock.clone()));

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "No Phone Year").await;
    let activity = create_open_activity(
        &app,
        &operator,
        year["id"].as_str().unwrap(),
        "Essay Contest",
        None,
    )
    .await;

    let request = json_request(
        Method::POST,
        &format!(
            "/api/v1/public/activities/{}/register",
            activity["id"].as_str().unwrap()
        ),
        json!({
            "name": "Andi",
            "school": "SMA Negeri 5",
            "email": unique_test_email()
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Give a would-be background send time to land before asserting silence
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(mock.sent_messages().is_empty());
}

#[tokio::test]
async fn test_confirmation_failure_does_not_fail_registration() {
    let pool = setup_test_db().await;
    let mock = MockNotificationService::failing();
    let app = create_test_app_with_notifier(test_config(), pool.clone(), Arc::new(mock.clone()));

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Broken Gateway Year").await;
    let activity = create_open_activity(
        &app,
        &operator,
        year["id"].as_str().unwrap(),
        "Robotics Demo",
        None,
    )
    .await;

    let request = json_request(
        Method::POST,
        &format!(
            "/api/v1/public/activities/{}/register",
            activity["id"].as_str().unwrap()
        ),
        json!({
            "name": "Dewi",
            "school": "SMK 2",
            "phone": "+62 813-0000-9999",
            "email": unique_test_email()
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The attempt is recorded even though the gateway reported failure
    let messages = wait_for_sent_messages(&mock, 1).await;
    assert_eq!(messages.len(), 1);
}

#[tokio::test]
async fn test_registration_fills_quota_and_closes_activity() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Quota Year").await;
    let activity = create_open_activity(
        &app,
        &operator,
        year["id"].as_str().unwrap(),
        "Chess Blitz",
        Some(1),
    )
    .await;
    let activity_id = activity["id"].as_str().unwrap();

    register_participant(&app, activity_id, "First In").await;

    // Quota of one is now exhausted
    let request = json_request(
        Method::POST,
        &format!("/api/v1/public/activities/{}/register", activity_id),
        json!({
            "name": "Too Late",
            "school": "SMA 9",
            "email": unique_test_email()
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "registration_closed");

    // The filling registration flipped the activity to closed
    let request = get_request_with_auth(
        &format!("/api/v1/admin/activities/{}", activity_id),
        &operator,
    );
    let response = app.oneshot(request).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "closed");
    assert_eq!(body["isFull"], true);
    assert_eq!(body["registeredCount"], 1);
}

#[tokio::test]
async fn test_upcoming_activity_rejects_registration() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Not Open Year").await;

    // Status defaults to upcoming when omitted
    let request = json_request_with_auth(
        Method::POST,
        &format!(
            "/api/v1/admin/years/{}/activities",
            year["id"].as_str().unwrap()
        ),
        json!({ "title": "Future Workshop", "kind": "non_competition" }),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let activity = parse_response_body(response).await;

    let request = json_request(
        Method::POST,
        &format!(
            "/api/v1/public/activities/{}/register",
            activity["id"].as_str().unwrap()
        ),
        json!({
            "name": "Eager",
            "school": "SMA 4",
            "email": unique_test_email()
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "registration_closed");
}

#[tokio::test]
async fn test_register_unknown_activity_returns_not_found() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let request = json_request(
        Method::POST,
        &format!("/api/v1/public/activities/{}/register", Uuid::new_v4()),
        json!({
            "name": "Nobody",
            "school": "Nowhere High",
            "email": unique_test_email()
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registration_validation() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Reg Validation Year").await;
    let activity = create_open_activity(
        &app,
        &operator,
        year["id"].as_str().unwrap(),
        "Validation Target",
        None,
    )
    .await;
    let uri = format!(
        "/api/v1/public/activities/{}/register",
        activity["id"].as_str().unwrap()
    );

    // Malformed email
    let request = json_request(
        Method::POST,
        &uri,
        json!({ "name": "Budi", "school": "SMA 1", "email": "not-an-email" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");

    // Empty name
    let request = json_request(
        Method::POST,
        &uri,
        json!({ "name": "", "school": "SMA 1", "email": unique_test_email() }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing school fails deserialization
    let request = json_request(
        Method::POST,
        &uri,
        json!({ "name": "Budi", "email": unique_test_email() }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Registrant Status Management
// =============================================================================

#[tokio::test]
async fn test_registrant_status_lifecycle() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Status Year").await;
    let activity = create_open_activity(
        &app,
        &operator,
        year["id"].as_str().unwrap(),
        "Status Target",
        None,
    )
    .await;
    let activity_id = activity["id"].as_str().unwrap();

    let first = register_participant(&app, activity_id, "Alpha").await;
    let second = register_participant(&app, activity_id, "Beta").await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    // Newest first
    let request = get_request_with_auth(
        &format!("/api/v1/admin/activities/{}/registrants", activity_id),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let listed = parse_response_body(response).await;
    let listed = listed.as_array().unwrap().clone();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["name"], "Beta");
    assert_eq!(listed[1]["name"], "Alpha");

    // Explicit status update
    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/admin/registrants/{}/status", first_id),
        json!({ "status": "verified" }),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "verified");

    // Verify shortcut
    let request = post_request_with_auth(
        &format!("/api/v1/admin/registrants/{}/verify", second_id),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "verified");

    // Unrecognized status coerces to pending instead of erroring
    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/admin/registrants/{}/status", first_id),
        json!({ "status": "banana" }),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "pending");

    // Filtered listing sees only the remaining verified registrant
    let request = get_request_with_auth(
        &format!(
            "/api/v1/admin/activities/{}/registrants?status=verified",
            activity_id
        ),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let listed = parse_response_body(response).await;
    let listed = listed.as_array().unwrap().clone();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], second_id);

    // Unknown registrant
    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/admin/registrants/{}/status", Uuid::new_v4()),
        json!({ "status": "verified" }),
        &operator,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Participant List Export
// =============================================================================

#[tokio::test]
async fn test_participant_list_export() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Export Year").await;
    let activity = create_open_activity(
        &app,
        &operator,
        year["id"].as_str().unwrap(),
        "Export Target",
        None,
    )
    .await;
    let activity_id = activity["id"].as_str().unwrap();

    register_participant(&app, activity_id, "Gamma").await;
    register_participant(&app, activity_id, "Delta").await;

    let request = get_request_with_auth(
        &format!(
            "/api/v1/admin/activities/{}/registrants/export",
            activity_id
        ),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"), "{}", disposition);
    assert!(disposition.contains(".pdf"), "{}", disposition);

    let bytes = response_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF-"), "not a PDF: {:?}", &bytes[..8]);

    let request = get_request_with_auth(
        &format!(
            "/api/v1/admin/activities/{}/registrants/export",
            Uuid::new_v4()
        ),
        &operator,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
