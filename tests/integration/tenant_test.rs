//! Integration tests for tenant administration.

mod helpers;

use http::StatusCode;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_update_tenant_and_audit_diff() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    let tenant_id = app.provision_tenant("update@example.com").await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/admin/tenants/{}", tenant_id),
            Some(serde_json::json!({
                "plan": "business",
                "monthly_quota": 500000,
                "internal_notes": "Upgraded after sales call",
            })),
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["plan"], "business");
    assert_eq!(response.body["data"]["monthly_quota"], 500000);
    assert_eq!(
        response.body["data"]["internal_notes"],
        "Upgraded after sales call"
    );

    let audit = app
        .request(
            "GET",
            &format!("/api/admin/audit?action=TENANT_UPDATED&entity_id={}", tenant_id),
            None,
            true,
        )
        .await;
    let items = audit.body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["actor_label"], helpers::ADMIN_EMAIL);
    assert_eq!(items[0]["changes"]["plan"]["previous"], "pro");
    assert_eq!(items[0]["changes"]["plan"]["next"], "business");
}

#[tokio::test]
async fn test_explicit_null_clears_nullable_field() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    let tenant_id = app.provision_tenant("nullable@example.com").await;

    app.request(
        "PATCH",
        &format!("/api/admin/tenants/{}", tenant_id),
        Some(serde_json::json!({"internal_notes": "temporary note"})),
        true,
    )
    .await;

    let cleared = app
        .request(
            "PATCH",
            &format!("/api/admin/tenants/{}", tenant_id),
            Some(serde_json::json!({"internal_notes": null})),
            true,
        )
        .await;

    assert_eq!(cleared.status, StatusCode::OK, "{:?}", cleared.body);
    assert!(cleared.body["data"]["internal_notes"].is_null());
}

#[tokio::test]
async fn test_empty_update_rejected() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    let tenant_id = app.provision_tenant("noop@example.com").await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/admin/tenants/{}", tenant_id),
            Some(serde_json::json!({})),
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_resend_credentials_rotates_password() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    let tenant_id = app.provision_tenant("resend@example.com").await;

    let before: String =
        sqlx::query_scalar("SELECT password_hash FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();

    let response = app
        .request(
            "POST",
            &format!("/api/admin/tenants/{}/resend-credentials", tenant_id),
            None,
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["email_sent"], true);
    assert!(response.body["data"]["password"].is_null());

    let after: String =
        sqlx::query_scalar("SELECT password_hash FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_ne!(before, after);

    let must_change: bool =
        sqlx::query_scalar("SELECT must_change_password FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert!(must_change);
}

#[tokio::test]
async fn test_resend_credentials_surfaces_password_when_email_fails() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    let tenant_id = app.provision_tenant("resend.fail@example.com").await;

    app.notifier.fail.store(true, Ordering::SeqCst);

    let response = app
        .request(
            "POST",
            &format!("/api/admin/tenants/{}/resend-credentials", tenant_id),
            None,
            true,
        )
        .await;

    // The password rotation committed; the admin gets the plaintext as
    // fallback because the email could not be delivered.
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["email_sent"], false);
    let password = response.body["data"]["password"].as_str().unwrap();

    // The surfaced plaintext matches the hash now on the tenant row.
    let stored_hash: String =
        sqlx::query_scalar("SELECT password_hash FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    let hasher = tenanthub_credential::PasswordHasher::new();
    assert!(hasher.verify(password, &stored_hash).unwrap());
}

#[tokio::test]
async fn test_list_tenants_with_search() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    app.provision_tenant("search.one@example.com").await;
    app.provision_tenant("search.two@example.com").await;
    app.provision_tenant("other@example.com").await;

    let response = app
        .request("GET", "/api/admin/tenants?search=search.", None, true)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["total"], 2);
    assert_eq!(response.body["data"]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_unknown_tenant_not_found() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "GET",
            &format!("/api/admin/tenants/{}", uuid::Uuid::new_v4()),
            None,
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
