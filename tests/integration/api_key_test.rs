//! Integration tests for the API key lifecycle.

mod helpers;

use http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_create_key_returns_secret_exactly_once() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    let tenant_id = app.provision_tenant("keys@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/admin/api-keys",
            Some(serde_json::json!({
                "tenant_id": tenant_id,
                "environment": "development",
                "name": "ci pipeline",
            })),
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let secret = response.body["data"]["secret"].as_str().unwrap();
    assert!(secret.starts_with("th_test_"));
    assert_eq!(secret.len(), "th_test_".len() + 64);

    let key = &response.body["data"]["key"];
    assert_eq!(key["key_prefix"], "th_test");
    assert_eq!(key["last_four"], secret[secret.len() - 4..]);
    assert_eq!(key["is_active"], true);
    assert_eq!(key["name"], "ci pipeline");
    assert!(key.get("key_hash").is_none());

    // Listing never exposes the secret again.
    let list = app
        .request(
            "GET",
            &format!("/api/admin/api-keys?tenant_id={}", tenant_id),
            None,
            true,
        )
        .await;
    let items = list.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].get("secret").is_none());
    assert!(items[0].get("key_hash").is_none());
}

#[tokio::test]
async fn test_production_keys_get_live_prefix() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    let tenant_id = app.provision_tenant("live.keys@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/admin/api-keys",
            Some(serde_json::json!({
                "tenant_id": tenant_id,
                "environment": "production",
            })),
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let secret = response.body["data"]["secret"].as_str().unwrap();
    assert!(secret.starts_with("th_live_"));
}

#[tokio::test]
async fn test_create_key_for_unknown_tenant_not_found() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/admin/api-keys",
            Some(serde_json::json!({
                "tenant_id": Uuid::new_v4(),
                "environment": "development",
            })),
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_revokes_and_reactivates() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;
    let tenant_id = app.provision_tenant("toggle@example.com").await;

    let created = app
        .request(
            "POST",
            "/api/admin/api-keys",
            Some(serde_json::json!({
                "tenant_id": tenant_id,
                "environment": "staging",
            })),
            true,
        )
        .await;
    let key_id = created.body["data"]["key"]["id"].as_str().unwrap().to_string();

    let revoked = app
        .request(
            "PATCH",
            &format!("/api/admin/api-keys/{}", key_id),
            Some(serde_json::json!({"is_active": false})),
            true,
        )
        .await;
    assert_eq!(revoked.status, StatusCode::OK, "{:?}", revoked.body);
    assert_eq!(revoked.body["data"]["is_active"], false);

    // Toggling to the current state is idempotent.
    let again = app
        .request(
            "PATCH",
            &format!("/api/admin/api-keys/{}", key_id),
            Some(serde_json::json!({"is_active": false})),
            true,
        )
        .await;
    assert_eq!(again.status, StatusCode::OK);

    let reactivated = app
        .request(
            "PATCH",
            &format!("/api/admin/api-keys/{}", key_id),
            Some(serde_json::json!({"is_active": true})),
            true,
        )
        .await;
    assert_eq!(reactivated.body["data"]["is_active"], true);

    // Revoke and reactivate each left an audit entry.
    let audit = app
        .request(
            "GET",
            &format!("/api/admin/audit?entity_id={}", key_id),
            None,
            true,
        )
        .await;
    let actions: Vec<&str> = audit.body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["action"].as_str())
        .collect();
    assert!(actions.contains(&"API_KEY_REVOKED"));
    assert!(actions.contains(&"API_KEY_REACTIVATED"));
}
