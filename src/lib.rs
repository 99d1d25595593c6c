use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Role-based access core.
pub mod dispatch;
pub mod guard;
pub mod navigation;
pub mod session;
pub mod shell;
pub mod storage;

// Collaborator services and the screens fed by them.
pub mod accounts;
pub mod screens;
pub mod services;

// HTTP surface.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod views;

// Module for routing segregation (Public, Protected).
pub mod routes;
use routes::{protected, public};

// --- Public Re-exports ---

pub use accounts::{AuthClient, AuthState, HttpAuthClient};
pub use config::AppConfig;
pub use screens::ScreenRegistry;
pub use services::{HttpServiceClient, ServiceClient, ServiceState};
pub use session::{Role, Session, SessionStore};
pub use storage::{MemoryStorage, StorageRegistry};

/// AppState
///
/// Everything a request handler may need, shared across all requests. The
/// per-client session partitions live in `storage`; nothing about an individual
/// user lives here directly.
#[derive(Clone)]
pub struct AppState {
    /// Account service: login, registration, profile.
    pub auth: AuthState,
    /// Plan, payment and support services.
    pub services: ServiceState,
    /// Session partitions keyed by client id.
    pub storage: StorageRegistry,
    /// Screen loaders for every dashboard tab.
    pub screens: ScreenRegistry,
    pub config: AppConfig,
}

impl AppState {
    /// Builds a state with empty session partitions and the default screens.
    pub fn new(config: AppConfig, auth: AuthState, services: ServiceState) -> Self {
        Self {
            auth,
            services,
            storage: StorageRegistry::default(),
            screens: ScreenRegistry::default(),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for AuthState {
    fn from_ref(app_state: &AppState) -> AuthState {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for ServiceState {
    fn from_ref(app_state: &AppState) -> ServiceState {
        app_state.services.clone()
    }
}

impl FromRef<AppState> for StorageRegistry {
    fn from_ref(app_state: &AppState) -> StorageRegistry {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for ScreenRegistry {
    fn from_ref(app_state: &AppState) -> ScreenRegistry {
        app_state.screens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the portal: public pages, the guarded pages, and the client
/// identity and observability layers around both.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(public::public_routes())
        // Every protected path passes the route guard before its handler runs.
        .merge(
            protected::protected_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_credential,
            )),
        )
        .fallback(handlers::fallback)
        .with_state(state)
        // Must wrap every route: the session extractor reads the client id it inserts.
        .layer(middleware::from_fn(auth::client_identity));

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with its `x-request-id` so every log line of
/// the request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri().path(),
        req_id = %request_id,
    )
}
