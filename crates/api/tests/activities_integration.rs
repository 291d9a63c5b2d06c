//! Integration tests for activity management, the public catalog and
//! guideline uploads.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    create_open_activity, create_test_app, create_test_year, delete_request_with_auth,
    get_request, get_request_with_auth, json_request_with_auth, multipart_body,
    multipart_request_with_auth, operator_token, parse_response_body, post_request_with_auth,
    response_bytes, setup_test_db, super_admin_token, test_config,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

// =============================================================================
// Admin CRUD
// =============================================================================

#[tokio::test]
async fn test_activity_crud_flow() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;
    let super_admin = super_admin_token(&app, &pool).await;

    let year = create_test_year(&app, &operator, "CRUD Flow Year").await;
    let year_id = year["id"].as_str().unwrap().to_string();

    // Create with an explicit date and quota; status defaults to upcoming
    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/years/{}/activities", year_id),
        json!({
            "title": "Slide Design Sprint",
            "description": "Teams build a deck in 90 minutes",
            "date": "2031-09-15",
            "kind": "competition",
            "quota": 30
        }),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let activity = parse_response_body(response).await;
    assert_eq!(activity["title"], "Slide Design Sprint");
    assert_eq!(activity["status"], "upcoming");
    assert_eq!(activity["kind"], "competition");
    assert_eq!(activity["quota"], 30);
    assert_eq!(activity["registeredCount"], 0);
    assert_eq!(activity["isFull"], false);
    assert_eq!(activity["canRegister"], false);
    assert_eq!(activity["hasGuideline"], false);
    let activity_id = activity["id"].as_str().unwrap().to_string();

    // Admin detail view
    let request = get_request_with_auth(
        &format!("/api/v1/admin/activities/{}", activity_id),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Update replaces every field; the omitted quota clears it
    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/admin/activities/{}", activity_id),
        json!({
            "title": "Slide Design Sprint 2031",
            "kind": "non_competition",
            "status": "open"
        }),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_response_body(response).await;
    assert_eq!(updated["title"], "Slide Design Sprint 2031");
    assert_eq!(updated["kind"], "non_competition");
    assert_eq!(updated["status"], "open");
    assert!(updated["quota"].is_null());
    assert!(updated["date"].is_null());
    assert_eq!(updated["canRegister"], true);

    // Listing under the year
    let request = get_request_with_auth(
        &format!("/api/v1/admin/years/{}/activities", year_id),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let listed = parse_response_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Deletion is super admin territory
    let request = delete_request_with_auth(
        &format!("/api/v1/admin/activities/{}", activity_id),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = delete_request_with_auth(
        &format!("/api/v1/admin/activities/{}", activity_id),
        &super_admin,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = get_request_with_auth(
        &format!("/api/v1/admin/activities/{}", activity_id),
        &operator,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_activity_validation() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Validation Year").await;
    let year_id = year["id"].as_str().unwrap();

    // Empty title
    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/years/{}/activities", year_id),
        json!({ "title": "", "kind": "competition" }),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown kind fails deserialization
    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/years/{}/activities", year_id),
        json!({ "title": "Quiz Bowl", "kind": "marathon" }),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Negative quota
    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/years/{}/activities", year_id),
        json!({ "title": "Quiz Bowl", "kind": "competition", "quota": -1 }),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown year
    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/years/{}/activities", Uuid::new_v4()),
        json!({ "title": "Quiz Bowl", "kind": "competition" }),
        &operator,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Public Catalog
// =============================================================================

#[tokio::test]
async fn test_public_catalog_scoped_to_active_year() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;

    let year = create_test_year(&app, &operator, "Public Catalog Year").await;
    let year_id = year["id"].as_str().unwrap().to_string();

    let first = create_open_activity(&app, &operator, &year_id, "Poster Contest", None).await;
    create_open_activity(&app, &operator, &year_id, "Quiz Bowl", Some(50)).await;

    let request = post_request_with_auth(
        &format!("/api/v1/admin/years/{}/activate", year_id),
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/public/activities"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = parse_response_body(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|a| a["yearId"] == year_id.as_str()));

    // Public detail works without a token
    let activity_id = first["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/public/activities/{}",
            activity_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["title"], "Poster Contest");

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/public/activities/{}",
            Uuid::new_v4()
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Guideline Uploads
// =============================================================================

#[tokio::test]
async fn test_guideline_upload_and_download() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let operator = operator_token(&app, &pool).await;
    let year = create_test_year(&app, &operator, "Guideline Year").await;
    let year_id = year["id"].as_str().unwrap();

    let activity =
        create_open_activity(&app, &operator, year_id, "Debate Championship", None).await;
    let activity_id = activity["id"].as_str().unwrap().to_string();

    // Without an upload the public endpoint has nothing to serve
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/public/activities/{}/guideline",
            activity_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let pdf_bytes = b"%PDF-1.4 debate guideline".to_vec();
    let body = multipart_body(&[], Some(("file", "rules.pdf", "application/pdf", &pdf_bytes)));
    let request = multipart_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/activities/{}/guideline", activity_id),
        body,
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded = parse_response_body(response).await;
    assert_eq!(uploaded["hasGuideline"], true);

    // Download carries the PDF back under a title-derived file name
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/public/activities/{}/guideline",
            activity_id
        )))
        .await
        .unwrap();
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
    assert_eq!(response_bytes(response).await, pdf_bytes);

    // Re-upload replaces the stored file
    let replacement = b"%PDF-1.4 revised rules".to_vec();
    let body = multipart_body(
        &[],
        Some(("file", "rules-v2.pdf", "application/pdf", &replacement)),
    );
    let request = multipart_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/activities/{}/guideline", activity_id),
        body,
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/public/activities/{}/guideline",
            activity_id
        )))
        .await
        .unwrap();
    assert_eq!(response_bytes(response).await, replacement);

    // Only PDFs are accepted
    let body = multipart_body(&[], Some(("file", "cover.png", "image/png", b"png".as_ref())));
    let request = multipart_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/activities/{}/guideline", activity_id),
        body,
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // A multipart body without a file part is a validation error
    let body = multipart_body(&[("caption", "no file")], None);
    let request = multipart_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/activities/{}/guideline", activity_id),
        body,
        &operator,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown activity
    let body = multipart_body(&[], Some(("file", "a.pdf", "application/pdf", b"%PDF".as_ref())));
    let request = multipart_request_with_auth(
        Method::POST,
        &format!("/api/v1/admin/activities/{}/guideline", Uuid::new_v4()),
        body,
        &operator,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_guideline_upload_requires_auth() {
    let pool = setup_test_db().await;
    let app = create_test_app(test_config(), pool.clone());

    let body = multipart_body(&[], Some(("file", "a.pdf", "application/pdf", b"%PDF".as_ref())));
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri(&format!(
            "/api/v1/admin/activities/{}/guideline",
            Uuid::new_v4()
        ))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", common::MULTIPART_BOUNDARY),
        )
        .body(axum::body::Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
