use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Protected Router Module
///
/// The pages of the protected targets. `create_router` wraps this router in
/// `auth::require_credential`, which redirects a client without a credential
/// token to `/login` before any handler runs.
///
/// Role checks are not done here: the dashboard dispatches on the role itself
/// and renders the unauthorized view for roles it does not know. Each mutation
/// handler checks for the one role it serves.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // GET /dashboard?tab=N
        // Mounts the role's navigation shell and loads the selected tab only.
        .route("/dashboard", get(handlers::dashboard))
        // POST /dashboard/plans
        // Admin form of the Create Plan tab.
        .route("/dashboard/plans", post(handlers::create_plan))
        // POST /dashboard/plans/{id}/activate | /deactivate
        // Admin row controls of the Current Plans tab.
        .route(
            "/dashboard/plans/{plan_id}/activate",
            post(handlers::activate_plan),
        )
        .route(
            "/dashboard/plans/{plan_id}/deactivate",
            post(handlers::deactivate_plan),
        )
        // POST /dashboard/tickets
        // User form of the Support Tickets tab.
        .route("/dashboard/tickets", post(handlers::create_ticket))
        .route(
            "/dashboard/tickets/{ticket_id}/assign",
            post(handlers::assign_ticket),
        )
        .route(
            "/dashboard/tickets/{ticket_id}/status",
            post(handlers::update_ticket_status),
        )
        .route(
            "/dashboard/subscriptions/{subscription_id}/cancel",
            post(handlers::cancel_subscription),
        )
        .route(
            "/payment-checkout",
            get(handlers::checkout_page).post(handlers::checkout),
        )
        .route(
            "/updatedetails",
            get(handlers::update_details_page).post(handlers::update_details),
        )
}
