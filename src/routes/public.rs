use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Pages any client may open, logged in or not. Handlers here still extract
/// the client's session so the header can offer the right links.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for load balancers.
        .route("/health", get(|| async { "ok" }))
        .route("/", get(handlers::landing))
        // GET/POST /login
        // The session is written only after the account service accepted the credentials.
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route(
            "/reset-password",
            get(handlers::reset_password_page).post(handlers::reset_password),
        )
        .route("/about-us", get(handlers::about))
        .route("/mission", get(handlers::mission))
        .route("/support", get(handlers::support))
        // POST /logout
        // Public so that a client with a stale session can always clear it.
        .route("/logout", post(handlers::logout))
}
