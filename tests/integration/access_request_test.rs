//! Integration tests for the access request lifecycle.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_submit_creates_pending_request() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/access-requests",
            Some(serde_json::json!({
                "email": "Submit.Test@Example.COM",
                "full_name": "Jane Prospect",
                "company": "Prospect Co",
                "use_case": "banking",
                "estimated_volume": "high",
                "message": "We process statements",
            })),
            false,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "pending");
    assert_eq!(response.body["data"]["email"], "submit.test@example.com");
    assert_eq!(response.body["data"]["use_case"], "banking");
}

#[tokio::test]
async fn test_submit_invalid_email_rejected() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/access-requests",
            Some(serde_json::json!({
                "email": "not-an-email",
                "full_name": "Jane",
                "company": "Co",
                "use_case": "other",
                "estimated_volume": "low",
            })),
            false,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_pending_submission_conflicts() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    app.submit_request("dupe@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/access-requests",
            Some(serde_json::json!({
                "email": "dupe@example.com",
                "full_name": "Jane Again",
                "company": "Prospect Co",
                "use_case": "api",
                "estimated_volume": "medium",
            })),
            false,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT, "{:?}", response.body);
}

#[tokio::test]
async fn test_approve_issues_checkout_link() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let id = app.submit_request("approve@example.com").await;
    let response = app.approve_request(id).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["request"]["status"], "approved");
    let checkout_url = response.body["data"]["checkout_url"].as_str().unwrap();
    assert!(checkout_url.contains(&id.to_string()));

    // Payment link email went to the prospect.
    assert_eq!(app.notifier.sent_to("approve@example.com"), 1);

    // The gateway saw the correlation id and plan.
    let requests = app.gateway.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].reference_id, id);
    assert_eq!(requests[0].plan, "pro");
}

#[tokio::test]
async fn test_approve_twice_is_already_processed() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let id = app.submit_request("twice@example.com").await;
    let first = app.approve_request(id).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.approve_request(id).await;
    assert_eq!(second.status, StatusCode::CONFLICT, "{:?}", second.body);
    assert_eq!(second.body["error"], "ALREADY_PROCESSED");
}

#[tokio::test]
async fn test_reject_records_reason() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let id = app.submit_request("reject@example.com").await;
    let response = app
        .request(
            "POST",
            &format!("/api/admin/access-requests/{}/reject", id),
            Some(serde_json::json!({
                "reason": "Use case out of scope",
                "send_email": false,
            })),
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "rejected");
    assert_eq!(response.body["data"]["rejected_reason"], "Use case out of scope");

    // Rejection leaves the approver column alone; the deciding admin is
    // only in the audit log.
    let approved_by: Option<uuid::Uuid> =
        sqlx::query_scalar("SELECT approved_by FROM access_requests WHERE id = $1")
            .bind(id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert!(approved_by.is_none());

    // send_email=false suppressed the notification.
    assert_eq!(app.notifier.sent_to("reject@example.com"), 0);

    // A rejected request cannot be approved afterwards.
    let approve = app.approve_request(id).await;
    assert_eq!(approve.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_filters_by_status_and_search() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let pending = app.submit_request("list.pending@example.com").await;
    let approved = app.submit_request("list.approved@example.com").await;
    app.approve_request(approved).await;

    let response = app
        .request(
            "GET",
            "/api/admin/access-requests?status=pending&search=list.",
            None,
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let items = response.body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], pending.to_string());
}

#[tokio::test]
async fn test_stats_reflect_decisions() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let a = app.submit_request("stats.a@example.com").await;
    let b = app.submit_request("stats.b@example.com").await;
    app.submit_request("stats.c@example.com").await;
    app.approve_request(a).await;
    app.request(
        "POST",
        &format!("/api/admin/access-requests/{}/reject", b),
        Some(serde_json::json!({"reason": "No", "send_email": false})),
        true,
    )
    .await;

    let response = app
        .request("GET", "/api/admin/access-requests/stats", None, true)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["pending"], 1);
    assert_eq!(response.body["data"]["total"], 3);
    assert_eq!(response.body["data"]["approved_today"], 1);
    let rate = response.body["data"]["conversion_rate"].as_f64().unwrap();
    assert!((rate - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_admin_routes_require_identity_headers() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/admin/access-requests", None, false)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_database_connected() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, false).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "connected");
}
