//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::Utc;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;
use uuid::Uuid;

use tenanthub_core::config::AppConfig;
use tenanthub_core::error::AppError;
use tenanthub_core::result::AppResult;
use tenanthub_credential::{PasswordHasher, SecretGenerator};
use tenanthub_database::DatabasePool;
use tenanthub_database::repositories::{
    AccessRequestRepository, ApiKeyRepository, AuditRepository, TenantRepository,
};
use tenanthub_notify::Notifier;
use tenanthub_payment::{
    CheckoutRequest, CheckoutSession, PaymentGateway, SignatureVerifier,
};
use tenanthub_service::{
    AccessRequestService, ApiKeyService, AuditService, ProvisioningService, TenantService,
};

/// Admin identity attached to authenticated test requests.
pub const ADMIN_ID: &str = "c0a80101-0000-4000-8000-000000000001";
pub const ADMIN_EMAIL: &str = "admin@tenanthub.test";

static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Tests share one database; take this lock for the whole test body.
pub async fn db_lock() -> MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

/// Fake payment gateway minting deterministic checkout sessions.
pub struct FakeGateway {
    /// Every checkout request the service issued.
    pub requests: StdMutex<Vec<CheckoutRequest>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            requests: StdMutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> AppResult<CheckoutSession> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            id: format!("cs_test_{}", request.reference_id.simple()),
            url: format!("https://pay.tenanthub.test/c/{}", request.reference_id),
        })
    }
}

/// Recording notifier; flips to failure mode when `fail` is set.
pub struct RecordingNotifier {
    /// (to, subject) pairs of every delivered email.
    pub sent: StdMutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: StdMutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn sent_to(&self, email: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == email)
            .count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::external_service("Email provider unavailable"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
    /// Fake payment gateway
    pub gateway: Arc<FakeGateway>,
    /// Recording email notifier
    pub notifier: Arc<RecordingNotifier>,
    /// Signer matching the configured webhook secret
    pub verifier: SignatureVerifier,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let mut config = AppConfig::load_file("tests/fixtures/test_config")
            .expect("Failed to load test config");
        if let Ok(url) = std::env::var("TENANTHUB_TEST_DATABASE_URL") {
            config.database.url = url;
        }

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.into_pool();

        tenanthub_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let request_repo = Arc::new(AccessRequestRepository::new(db_pool.clone()));
        let tenant_repo = Arc::new(TenantRepository::new(db_pool.clone()));
        let api_key_repo = Arc::new(ApiKeyRepository::new(db_pool.clone()));
        let audit_repo = Arc::new(AuditRepository::new(db_pool.clone()));

        let hasher = Arc::new(PasswordHasher::new());
        let generator = Arc::new(SecretGenerator::new());

        let gateway = Arc::new(FakeGateway::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let gateway_dyn: Arc<dyn PaymentGateway> = gateway.clone();
        let notifier_dyn: Arc<dyn Notifier> = notifier.clone();

        let verifier = SignatureVerifier::new(
            config.payment.webhook_secret.clone(),
            config.payment.signature_tolerance_seconds,
        );

        let access_request_service = Arc::new(AccessRequestService::new(
            db_pool.clone(),
            Arc::clone(&request_repo),
            Arc::clone(&audit_repo),
            Arc::clone(&gateway_dyn),
            Arc::clone(&notifier_dyn),
        ));
        let provisioning_service = Arc::new(ProvisioningService::new(
            db_pool.clone(),
            Arc::clone(&request_repo),
            Arc::clone(&tenant_repo),
            Arc::clone(&audit_repo),
            Arc::clone(&hasher),
            Arc::clone(&generator),
            Arc::clone(&notifier_dyn),
            config.provisioning.clone(),
            config.email.dashboard_url.clone(),
        ));
        let tenant_service = Arc::new(TenantService::new(
            db_pool.clone(),
            Arc::clone(&tenant_repo),
            Arc::clone(&audit_repo),
            Arc::clone(&hasher),
            Arc::clone(&generator),
            Arc::clone(&notifier_dyn),
            config.provisioning.password_length,
            config.email.dashboard_url.clone(),
        ));
        let api_key_service = Arc::new(ApiKeyService::new(
            db_pool.clone(),
            Arc::clone(&api_key_repo),
            Arc::clone(&tenant_repo),
            Arc::clone(&audit_repo),
            Arc::clone(&hasher),
            Arc::clone(&generator),
        ));
        let audit_service = Arc::new(AuditService::new(Arc::clone(&audit_repo)));

        let app_state = tenanthub_api::AppState {
            config: Arc::new(config.clone()),
            db_pool: db_pool.clone(),
            signature_verifier: Arc::new(verifier.clone()),
            access_request_service,
            provisioning_service,
            tenant_service,
            api_key_service,
            audit_service,
        };

        let router = tenanthub_api::build_router(app_state);

        Self {
            router,
            db_pool,
            config,
            gateway,
            notifier,
            verifier,
        }
    }

    /// Clean all test data from the database
    async fn clean_database(pool: &PgPool) {
        // Fault-injection triggers may survive a failed test run.
        let _ = sqlx::query("DROP TRIGGER IF EXISTS audit_insert_fault ON audit_log")
            .execute(pool)
            .await;
        let _ = sqlx::query("DROP FUNCTION IF EXISTS raise_audit_fault()")
            .execute(pool)
            .await;

        let tables = ["audit_log", "api_keys", "access_requests", "tenants"];

        for table in &tables {
            let query = format!("DELETE FROM {}", table);
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Make an HTTP request to the test app; admin requests carry the
    /// trusted identity headers.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        admin: bool,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if admin {
            req = req
                .header("x-admin-id", ADMIN_ID)
                .header("x-admin-email", ADMIN_EMAIL);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Deliver a signed webhook event.
    pub async fn deliver_webhook(&self, event: &Value) -> TestResponse {
        let body = serde_json::to_string(event).expect("Failed to serialize event");
        let signature = self.verifier.sign(body.as_bytes(), Utc::now().timestamp());

        let req = Request::builder()
            .method("POST")
            .uri("/api/webhooks/payment")
            .header("Content-Type", "application/json")
            .header("x-webhook-signature", signature)
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Deliver a webhook body with an arbitrary signature header.
    pub async fn deliver_webhook_raw(
        &self,
        body: &str,
        signature: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri("/api/webhooks/payment")
            .header("Content-Type", "application/json");

        if let Some(sig) = signature {
            req = req.header("x-webhook-signature", sig);
        }

        let req = req
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Submit a pending access request and return its id
    pub async fn submit_request(&self, email: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/access-requests",
                Some(serde_json::json!({
                    "email": email,
                    "full_name": "Jane Prospect",
                    "company": "Prospect Co",
                    "use_case": "api",
                    "estimated_volume": "medium",
                    "message": "Evaluating the platform",
                })),
                false,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Submit failed: {:?}",
            response.body
        );
        response.body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("No request id in submit response")
    }

    /// Approve a request, returning the full response
    pub async fn approve_request(&self, id: Uuid) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/admin/access-requests/{}/approve", id),
            Some(serde_json::json!({"plan": "pro"})),
            true,
        )
        .await
    }

    /// Run the full submit -> approve -> paid-checkout flow and return
    /// the provisioned tenant id.
    pub async fn provision_tenant(&self, email: &str) -> Uuid {
        let request_id = self.submit_request(email).await;
        let approve = self.approve_request(request_id).await;
        assert_eq!(
            approve.status,
            StatusCode::OK,
            "Approve failed: {:?}",
            approve.body
        );

        let event = checkout_event(request_id, email, "cus_helper", "pro");
        let delivery = self.deliver_webhook(&event).await;
        assert_eq!(
            delivery.status,
            StatusCode::OK,
            "Webhook delivery failed: {:?}",
            delivery.body
        );

        let request = self
            .request(
                "GET",
                &format!("/api/admin/access-requests/{}", request_id),
                None,
                true,
            )
            .await;
        request.body["data"]["tenant_id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("Request not correlated to a tenant")
    }
}

/// Build a `checkout.session.completed` event for a request
pub fn checkout_event(request_id: Uuid, email: &str, customer: &str, plan: &str) -> Value {
    serde_json::json!({
        "id": format!("evt_{}", Uuid::new_v4().simple()),
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": format!("cs_{}", request_id.simple()),
                "client_reference_id": request_id.to_string(),
                "customer": customer,
                "subscription": format!("sub_{}", request_id.simple()),
                "customer_email": email,
                "metadata": {"plan": plan}
            }
        }
    })
}

/// Build a `customer.subscription.deleted` event
pub fn subscription_deleted_event(customer: &str) -> Value {
    serde_json::json!({
        "id": format!("evt_{}", Uuid::new_v4().simple()),
        "type": "customer.subscription.deleted",
        "data": {
            "object": {
                "id": format!("sub_{}", Uuid::new_v4().simple()),
                "customer": customer
            }
        }
    })
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
