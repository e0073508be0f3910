//! TenantHub Server — Access Request and Tenant Provisioning Backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use tenanthub_core::config::AppConfig;
use tenanthub_core::error::AppError;
use tenanthub_credential::{PasswordHasher, SecretGenerator};
use tenanthub_database::DatabasePool;
use tenanthub_database::repositories::{
    AccessRequestRepository, ApiKeyRepository, AuditRepository, TenantRepository,
};
use tenanthub_notify::{HttpNotifier, Notifier};
use tenanthub_payment::{HttpPaymentGateway, PaymentGateway, SignatureVerifier};
use tenanthub_service::{
    AccessRequestService, ApiKeyService, AuditService, ProvisioningService, TenantService,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TENANTHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TenantHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;
    let db_pool = db.into_pool();

    tracing::info!("Running database migrations...");
    tenanthub_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Initialize repositories ──────────────────────────
    let request_repo = Arc::new(AccessRequestRepository::new(db_pool.clone()));
    let tenant_repo = Arc::new(TenantRepository::new(db_pool.clone()));
    let api_key_repo = Arc::new(ApiKeyRepository::new(db_pool.clone()));
    let audit_repo = Arc::new(AuditRepository::new(db_pool.clone()));

    // ── Step 3: Initialize credential tooling ────────────────────
    let hasher = Arc::new(PasswordHasher::new());
    let generator = Arc::new(SecretGenerator::new());

    // ── Step 4: Initialize external clients ──────────────────────
    tracing::info!("Initializing payment gateway client...");
    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(HttpPaymentGateway::new(config.payment.clone())?);

    tracing::info!("Initializing email client...");
    let notifier: Arc<dyn Notifier> = Arc::new(HttpNotifier::new(config.email.clone())?);

    let signature_verifier = Arc::new(SignatureVerifier::new(
        config.payment.webhook_secret.clone(),
        config.payment.signature_tolerance_seconds,
    ));

    // ── Step 5: Initialize services ──────────────────────────────
    tracing::info!("Initializing services...");
    let access_request_service = Arc::new(AccessRequestService::new(
        db_pool.clone(),
        Arc::clone(&request_repo),
        Arc::clone(&audit_repo),
        Arc::clone(&gateway),
        Arc::clone(&notifier),
    ));
    let provisioning_service = Arc::new(ProvisioningService::new(
        db_pool.clone(),
        Arc::clone(&request_repo),
        Arc::clone(&tenant_repo),
        Arc::clone(&audit_repo),
        Arc::clone(&hasher),
        Arc::clone(&generator),
        Arc::clone(&notifier),
        config.provisioning.clone(),
        config.email.dashboard_url.clone(),
    ));
    let tenant_service = Arc::new(TenantService::new(
        db_pool.clone(),
        Arc::clone(&tenant_repo),
        Arc::clone(&audit_repo),
        Arc::clone(&hasher),
        Arc::clone(&generator),
        Arc::clone(&notifier),
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

    // ── Step 6: Build router and serve ───────────────────────────
    let app_state = tenanthub_api::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        signature_verifier,
        access_request_service,
        provisioning_service,
        tenant_service,
        api_key_service,
        audit_service,
    };

    let app = tenanthub_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("TenantHub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("TenantHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
