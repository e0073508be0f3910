//! Integration tests for webhook-driven tenant provisioning.

mod helpers;

use http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_checkout_completion_provisions_tenant() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let request_id = app.submit_request("provision@example.com").await;
    app.approve_request(request_id).await;

    let event = helpers::checkout_event(request_id, "provision@example.com", "cus_1", "pro");
    let delivery = app.deliver_webhook(&event).await;
    assert_eq!(delivery.status, StatusCode::OK, "{:?}", delivery.body);

    // The request is consumed and correlated.
    let request = app
        .request(
            "GET",
            &format!("/api/admin/access-requests/{}", request_id),
            None,
            true,
        )
        .await;
    let tenant_id = request.body["data"]["tenant_id"].as_str().unwrap();
    assert_eq!(request.body["data"]["payment_confirmed"], true);

    // The tenant starts its trial on the plan paid for.
    let tenant = app
        .request("GET", &format!("/api/admin/tenants/{}", tenant_id), None, true)
        .await;
    assert_eq!(tenant.status, StatusCode::OK, "{:?}", tenant.body);
    assert_eq!(tenant.body["data"]["email"], "provision@example.com");
    assert_eq!(tenant.body["data"]["plan"], "pro");
    assert_eq!(tenant.body["data"]["status"], "trial");
    assert_eq!(tenant.body["data"]["must_change_password"], true);
    assert!(tenant.body["data"].get("password_hash").is_none());

    // Welcome email on top of the earlier payment link email.
    assert_eq!(app.notifier.sent_to("provision@example.com"), 2);
}

#[tokio::test]
async fn test_redelivered_checkout_event_is_idempotent() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let request_id = app.submit_request("redeliver@example.com").await;
    app.approve_request(request_id).await;

    let event = helpers::checkout_event(request_id, "redeliver@example.com", "cus_2", "starter");
    assert_eq!(app.deliver_webhook(&event).await.status, StatusCode::OK);
    assert_eq!(app.deliver_webhook(&event).await.status, StatusCode::OK);
    assert_eq!(app.deliver_webhook(&event).await.status, StatusCode::OK);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM tenants WHERE email = 'redeliver@example.com'")
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    // Exactly one welcome email despite three deliveries.
    assert_eq!(app.notifier.sent_to("redeliver@example.com"), 2);
}

#[tokio::test]
async fn test_checkout_for_unknown_request_is_acknowledged() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let event = helpers::checkout_event(Uuid::new_v4(), "ghost@example.com", "cus_3", "pro");
    let delivery = app.deliver_webhook(&event).await;

    assert_eq!(delivery.status, StatusCode::OK, "{:?}", delivery.body);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_unknown_event_type_is_acknowledged() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let event = serde_json::json!({
        "id": "evt_unknown",
        "type": "invoice.payment_succeeded",
        "data": {"object": {"id": "in_123"}}
    });
    let delivery = app.deliver_webhook(&event).await;

    assert_eq!(delivery.status, StatusCode::OK, "{:?}", delivery.body);
}

#[tokio::test]
async fn test_unparseable_plan_falls_back_to_starter() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let request_id = app.submit_request("noplan@example.com").await;
    app.approve_request(request_id).await;

    let event = helpers::checkout_event(request_id, "noplan@example.com", "cus_4", "platinum");
    assert_eq!(app.deliver_webhook(&event).await.status, StatusCode::OK);

    let plan: String =
        sqlx::query_scalar("SELECT plan::TEXT FROM tenants WHERE email = 'noplan@example.com'")
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(plan, "starter");
}

#[tokio::test]
async fn test_subscription_deleted_cancels_tenant() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let request_id = app.submit_request("cancel@example.com").await;
    app.approve_request(request_id).await;
    let event = helpers::checkout_event(request_id, "cancel@example.com", "cus_cancel", "pro");
    assert_eq!(app.deliver_webhook(&event).await.status, StatusCode::OK);

    let deletion = helpers::subscription_deleted_event("cus_cancel");
    assert_eq!(app.deliver_webhook(&deletion).await.status, StatusCode::OK);

    let status: String =
        sqlx::query_scalar("SELECT status::TEXT FROM tenants WHERE email = 'cancel@example.com'")
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(status, "cancelled");

    // Redelivery of the deletion is a no-op.
    assert_eq!(app.deliver_webhook(&deletion).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_subscription_deleted_for_unknown_customer_is_acknowledged() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let deletion = helpers::subscription_deleted_event("cus_nobody");
    let delivery = app.deliver_webhook(&deletion).await;

    assert_eq!(delivery.status, StatusCode::OK, "{:?}", delivery.body);
}

#[tokio::test]
async fn test_provisioning_writes_audit_trail() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let tenant_id = app.provision_tenant("audit.trail@example.com").await;

    let response = app
        .request(
            "GET",
            &format!("/api/admin/audit?action=TENANT_CREATED_FROM_PAYMENT&entity_id={}", tenant_id),
            None,
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let items = response.body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["actor_label"], "payment-webhook");
    assert_eq!(items[0]["entity_type"], "Tenant");
}

#[tokio::test]
async fn test_audit_write_failure_rolls_back_provisioning() {
    let _guard = helpers::db_lock().await;
    let app = helpers::TestApp::new().await;

    let request_id = app.submit_request("atomic@example.com").await;
    app.approve_request(request_id).await;

    // Abort the provisioning transaction at its last write: every audit
    // insert raises until the trigger is dropped again.
    sqlx::query(
        "CREATE FUNCTION raise_audit_fault() RETURNS trigger AS $$ \
         BEGIN RAISE EXCEPTION 'injected audit fault'; END \
         $$ LANGUAGE plpgsql",
    )
    .execute(&app.db_pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER audit_insert_fault BEFORE INSERT ON audit_log \
         FOR EACH ROW EXECUTE FUNCTION raise_audit_fault()",
    )
    .execute(&app.db_pool)
    .await
    .unwrap();

    let event = helpers::checkout_event(request_id, "atomic@example.com", "cus_atomic", "pro");
    let delivery = app.deliver_webhook(&event).await;
    assert_eq!(delivery.status, StatusCode::INTERNAL_SERVER_ERROR);

    sqlx::query("DROP TRIGGER audit_insert_fault ON audit_log")
        .execute(&app.db_pool)
        .await
        .unwrap();
    sqlx::query("DROP FUNCTION raise_audit_fault()")
        .execute(&app.db_pool)
        .await
        .unwrap();

    // The tenant insert rolled back together with the failed audit write.
    let tenants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(tenants, 0);

    // The request stayed approved and unconsumed, and no welcome email
    // went out for the aborted attempt.
    let (confirmed, tenant_id): (bool, Option<Uuid>) =
        sqlx::query_as("SELECT payment_confirmed, tenant_id FROM access_requests WHERE id = $1")
            .bind(request_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert!(!confirmed);
    assert!(tenant_id.is_none());
    assert_eq!(app.notifier.sent_to("atomic@example.com"), 1);

    // The processor retries on 5xx; the redelivery provisions normally.
    let retry = app.deliver_webhook(&event).await;
    assert_eq!(retry.status, StatusCode::OK, "{:?}", retry.body);

    let tenants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(tenants, 1);
    assert_eq!(app.notifier.sent_to("atomic@example.com"), 2);
}
