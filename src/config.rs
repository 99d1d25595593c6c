use std::env;
use std::time::Duration;

/// AppConfig
///
/// Holds the portal's configuration. Immutable once loaded and pulled out of the
/// application state via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects log format and fail-fast behaviour.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Account service: login, registration, password reset, profile.
    pub auth_service_url: String,
    // Plan management service: plans, subscriptions, usage.
    pub plan_service_url: String,
    // Payment service: billing and transactions.
    pub payment_service_url: String,
    // Support service: tickets.
    pub support_service_url: String,
    // Upper bound for any single outbound collaborator call.
    pub request_timeout: Duration,
}

/// Env
///
/// Runtime context. `Local` falls back to the development ports of the services;
/// `Production` requires every service URL to be set explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration for tests; points at the local development ports.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            auth_service_url: "http://localhost:8081".to_string(),
            plan_service_url: "http://localhost:8082".to_string(),
            payment_service_url: "http://localhost:8083".to_string(),
            support_service_url: "http://localhost:8084".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn service_url(env: &Env, key: &str, local_default: &str) -> String {
    let value = match env {
        Env::Production => env::var(key)
            .unwrap_or_else(|_| panic!("FATAL: {key} must be set in production.")),
        Env::Local => env::var(key).unwrap_or_else(|_| local_default.to_string()),
    };
    value.trim_end_matches('/').to_string()
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the environment.
    ///
    /// # Panics
    /// Panics in production when a service URL is missing, so the portal never
    /// starts against half-configured collaborators.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").unwrap_or_default().as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };
        let defaults = Self::default();

        let request_timeout = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| match env {
            Env::Production => "0.0.0.0:3000".to_string(),
            Env::Local => defaults.bind_addr.clone(),
        });

        Self {
            auth_service_url: service_url(&env, "AUTH_SERVICE_URL", &defaults.auth_service_url),
            plan_service_url: service_url(&env, "PLAN_SERVICE_URL", &defaults.plan_service_url),
            payment_service_url: service_url(
                &env,
                "PAYMENT_SERVICE_URL",
                &defaults.payment_service_url,
            ),
            support_service_url: service_url(
                &env,
                "SUPPORT_SERVICE_URL",
                &defaults.support_service_url,
            ),
            bind_addr,
            request_timeout,
            env,
        }
    }
}
