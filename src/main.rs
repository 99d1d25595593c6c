use std::sync::Arc;

use telecom_portal::{
    AppState, AuthState, HttpAuthClient, HttpServiceClient, ServiceState,
    config::{AppConfig, Env},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, collaborator clients and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production URLs)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "telecom_portal=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Portal starting in {:?} mode", config.env);

    // 3. Collaborator clients
    let auth = HttpAuthClient::new(&config.auth_service_url, config.request_timeout)
        .expect("FATAL: Failed to build the account service client.");
    let services = HttpServiceClient::new(&config)
        .expect("FATAL: Failed to build the service client.");

    tracing::info!(
        account = %config.auth_service_url,
        plans = %config.plan_service_url,
        payments = %config.payment_service_url,
        support = %config.support_service_url,
        "collaborator services configured"
    );

    // 4. State and server
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(
        config,
        Arc::new(auth) as AuthState,
        Arc::new(services) as ServiceState,
    );
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {bind_addr}");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
