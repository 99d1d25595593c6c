use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

use crate::{
    AppState,
    accounts::{AuthError, AuthState},
    auth::ClientSession,
    dispatch::{self, RoleView, UNAUTHORIZED_MESSAGE},
    error::PortalError,
    guard::Target,
    models::{
        AssignTicketForm, CheckoutForm, CheckoutQuery, CreatePlanForm, CreatePlanRequest,
        LoginForm, LoginRequest, PaymentRequest, RegisterForm, RegisterRequest,
        ResetPasswordRequest, SubscribeRequest, TabQuery, TicketForm, TicketStatusForm,
        UpdateUserRequest, resource_id,
    },
    navigation::{self, Navigation},
    screens::{ScreenContext, ScreenForm, ScreenView},
    services::ServiceError,
    session::{Role, Session},
    shell::{NavigationShell, TabId},
    views::{
        self, CheckoutPage, DashboardPage, InfoPage, LandingPage, LoginPage, NavBar,
        RegisterPage, ResetPasswordPage, UnauthorizedPage, UpdateDetailsPage,
    },
};

const WRONG_CREDENTIALS: &str = "Wrong username or password";
const SERVICE_DOWN: &str = "The service is unavailable right now. Please try again later.";
const SESSION_NOT_STARTED: &str = "We could not start your session. Please try again.";

/// Credential of an already-guarded request. `None` means the store was cleared
/// between the guard and the handler.
fn credential(session: &Session) -> Option<&str> {
    session.credential_token.as_deref()
}

/// Link to a tab of the role's shell, used after mutations so the affected list is
/// fetched again without a full reload of the portal.
fn dashboard_tab(role: Role, tab: TabId) -> Redirect {
    match NavigationShell::for_role(role).position(tab) {
        Some(index) => Redirect::to(&format!("/dashboard?tab={index}")),
        None => Redirect::to("/dashboard"),
    }
}

fn unauthorized_view(session: &Session) -> Result<Response, PortalError> {
    views::render(&UnauthorizedPage {
        nav: NavBar::from(session),
        message: UNAUTHORIZED_MESSAGE,
    })
}

/// The role's shell opened on `tab`, showing `view` in place of the tab's data.
fn dashboard_with(
    session: &Session,
    role: Role,
    tab: TabId,
    view: ScreenView,
) -> Result<Response, PortalError> {
    let shell = NavigationShell::for_role(role);
    let shell = shell.with_selection(shell.position(tab));
    views::render(&DashboardPage::new(NavBar::from(session), &shell, view))
}

/// Finishes a dashboard mutation: back to `tab` on success, forced logout on a
/// rejected credential, and the tab with `failure` shown otherwise.
fn after_mutation(
    client: &ClientSession,
    role: Role,
    tab: TabId,
    result: Result<(), ServiceError>,
    failure: &str,
) -> Result<Response, PortalError> {
    match result {
        Ok(()) => Ok(dashboard_tab(role, tab).into_response()),
        Err(ServiceError::Unauthorized(service)) => {
            warn!(?service, "mutation rejected the credential");
            Ok(navigation::force_logout(&client.store).into_response())
        }
        Err(error) => {
            warn!(%error, ?tab, "dashboard mutation failed");
            let message = match error {
                ServiceError::Rejected(message) => message,
                _ => failure.to_string(),
            };
            let heading = NavigationShell::for_role(role)
                .tabs()
                .iter()
                .find(|entry| entry.id == tab)
                .map_or("Dashboard", |entry| entry.label);
            dashboard_with(&client.session, role, tab, ScreenView::message(heading, message))
        }
    }
}

// --- Public Pages ---

/// landing
///
/// [Public Route] The home page.
pub async fn landing(client: ClientSession) -> Result<Response, PortalError> {
    views::render(&LandingPage {
        nav: NavBar::from(&client.session),
    })
}

pub async fn login_page(client: ClientSession) -> Result<Response, PortalError> {
    views::render(&LoginPage {
        nav: NavBar::from(&client.session),
        identifier: String::new(),
        error: None,
    })
}

/// login
///
/// [Public Route] Submits credentials to the account service. On success the session
/// is written and, only when the write succeeded, the client is sent to the dashboard.
pub async fn login(
    State(auth): State<AuthState>,
    client: ClientSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, PortalError> {
    let identifier = form.identifier.trim().to_string();
    let page = |error: &str| LoginPage {
        nav: NavBar::from(&client.session),
        identifier: identifier.clone(),
        error: Some(error.to_string()),
    };

    if identifier.is_empty() || form.password.is_empty() {
        return views::render(&page("Please enter your mobile number or email and password."));
    }

    let response = match auth.login(LoginRequest::from(form)).await {
        Ok(response) => response,
        Err(AuthError::InvalidCredentials | AuthError::Rejected(_) | AuthError::Unauthorized) => {
            info!("login rejected");
            return views::render(&page(WRONG_CREDENTIALS));
        }
        Err(AuthError::Unavailable(reason)) => {
            warn!(%reason, "login failed");
            return views::render(&page(SERVICE_DOWN));
        }
    };

    match navigation::complete_login(&client.store, response) {
        Ok(next) => Ok(next.into_response()),
        Err(error) => {
            warn!(%error, "session was not established");
            views::render(&page(SESSION_NOT_STARTED))
        }
    }
}

pub async fn register_page(client: ClientSession) -> Result<Response, PortalError> {
    views::render(&RegisterPage {
        nav: NavBar::from(&client.session),
        form: RegisterForm::default(),
        errors: Vec::new(),
        error: None,
    })
}

/// register
///
/// [Public Route] Validates the signup form and creates the account. When the
/// service answers with a session payload the user is logged in directly;
/// otherwise they are sent to the login page.
pub async fn register(
    State(auth): State<AuthState>,
    client: ClientSession,
    Form(form): Form<RegisterForm>,
) -> Result<Response, PortalError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return views::render(&RegisterPage {
            nav: NavBar::from(&client.session),
            form,
            errors,
            error: None,
        });
    }

    let error = match auth.register(RegisterRequest::from(form.clone())).await {
        Ok(Some(response)) => match navigation::complete_login(&client.store, response) {
            Ok(next) => return Ok(next.into_response()),
            // The account exists; the user can still log in by hand.
            Err(error) => {
                warn!(%error, "registered but session was not established");
                return Ok(Navigation::Push(Target::Login).into_response());
            }
        },
        Ok(None) => {
            info!("account registered");
            return Ok(Navigation::Push(Target::Login).into_response());
        }
        Err(AuthError::Rejected(message)) => message,
        Err(error) => {
            warn!(%error, "registration failed");
            "An error occurred. Please try again.".to_string()
        }
    };

    views::render(&RegisterPage {
        nav: NavBar::from(&client.session),
        form,
        errors: Vec::new(),
        error: Some(error),
    })
}

pub async fn reset_password_page(client: ClientSession) -> Result<Response, PortalError> {
    views::render(&ResetPasswordPage {
        nav: NavBar::from(&client.session),
        email: String::new(),
        error: None,
    })
}

/// reset_password
///
/// [Public Route] Resets the password via the security answer, then goes to login.
pub async fn reset_password(
    State(auth): State<AuthState>,
    client: ClientSession,
    Form(form): Form<ResetPasswordRequest>,
) -> Result<Response, PortalError> {
    let email = form.email.clone();
    let error = match auth.reset_password(form).await {
        Ok(()) => return Ok(Navigation::Push(Target::Login).into_response()),
        Err(AuthError::Rejected(message)) => message,
        Err(error) => {
            warn!(%error, "password reset failed");
            "Reset password failed. Please check your inputs.".to_string()
        }
    };

    views::render(&ResetPasswordPage {
        nav: NavBar::from(&client.session),
        email,
        error: Some(error),
    })
}

pub async fn about(client: ClientSession) -> Result<Response, PortalError> {
    views::render(&InfoPage {
        nav: NavBar::from(&client.session),
        title: "About Us",
        paragraphs: &[
            "We run prepaid and postpaid mobile plans for customers across the country.",
            "This portal brings plan selection, usage tracking, billing and support together.",
        ],
    })
}

pub async fn mission(client: ClientSession) -> Result<Response, PortalError> {
    views::render(&InfoPage {
        nav: NavBar::from(&client.session),
        title: "Our Mission",
        paragraphs: &[
            "Affordable, transparent connectivity with no surprises on the bill.",
            "Every customer should be able to see what they pay for and get help fast.",
        ],
    })
}

pub async fn support(client: ClientSession) -> Result<Response, PortalError> {
    views::render(&InfoPage {
        nav: NavBar::from(&client.session),
        title: "Support",
        paragraphs: &[
            "Logged-in customers can follow their tickets from the Support Tickets tab.",
            "For urgent issues call 198 from your registered number.",
        ],
    })
}

/// logout
///
/// Clears the session and returns to the landing page.
pub async fn logout(client: ClientSession) -> Navigation {
    navigation::logout(&client.store)
}

/// Unknown paths land on the login page.
pub async fn fallback() -> Navigation {
    Navigation::to_login()
}

// --- Protected Pages ---

/// dashboard
///
/// [Protected Route] Dispatches on the session's role and mounts the matching shell.
/// Only the selected tab's screen is loaded. A 401 from that screen's service
/// ends the session.
pub async fn dashboard(
    State(state): State<AppState>,
    client: ClientSession,
    Query(query): Query<TabQuery>,
) -> Result<Response, PortalError> {
    let session = &client.session;
    let Some(shell) = dispatch::resolve(session).shell() else {
        return unauthorized_view(session);
    };
    let shell = shell.with_selection(query.index());

    let Some(token) = credential(session) else {
        return Ok(Navigation::to_login().into_response());
    };

    let active = shell.active();
    let view = match state.screens.get(active.id) {
        Some(screen) => {
            let ctx = ScreenContext {
                token,
                user_id: session.user_id,
                api: state.services.as_ref(),
            };
            match screen.load(&ctx).await {
                Ok(view) => view,
                Err(ServiceError::Unauthorized(service)) => {
                    warn!(?service, tab = active.label, "screen fetch rejected the credential");
                    return Ok(navigation::force_logout(&client.store).into_response());
                }
                Err(error) => {
                    warn!(%error, tab = active.label, "screen fetch failed");
                    ScreenView::message(active.label, format!("Error loading {}.", active.label))
                }
            }
        }
        None => ScreenView::message(active.label, "This section is not available yet."),
    };

    views::render(&DashboardPage::new(NavBar::from(session), &shell, view))
}

/// create_plan
///
/// [Protected Route, ADMIN] Creates a plan, then shows the refreshed plan list.
pub async fn create_plan(
    State(state): State<AppState>,
    client: ClientSession,
    Form(form): Form<CreatePlanForm>,
) -> Result<Response, PortalError> {
    let session = &client.session;
    if dispatch::resolve(session) != RoleView::Admin {
        return unauthorized_view(session);
    }
    let Some(token) = credential(session) else {
        return Ok(Navigation::to_login().into_response());
    };
    let shell = NavigationShell::for_role(Role::Admin);

    let failure = |view: ScreenView| {
        views::render(&DashboardPage::new(NavBar::from(session), &shell, view))
    };

    let plan = match CreatePlanRequest::try_from(form) {
        Ok(plan) => plan,
        Err(errors) => {
            return failure(ScreenView {
                heading: "Create Plan",
                form: Some(ScreenForm::CreatePlan),
                errors,
                ..ScreenView::default()
            });
        }
    };

    match state.services.create_plan(token, plan).await {
        Ok(()) => {
            info!("plan created");
            Ok(dashboard_tab(Role::Admin, TabId::CurrentPlans).into_response())
        }
        Err(ServiceError::Unauthorized(_)) => {
            Ok(navigation::force_logout(&client.store).into_response())
        }
        Err(error) => {
            warn!(%error, "plan creation failed");
            let message = match error {
                ServiceError::Rejected(message) => message,
                _ => "Failed to create plan.".to_string(),
            };
            failure(ScreenView {
                heading: "Create Plan",
                form: Some(ScreenForm::CreatePlan),
                message: Some(message),
                ..ScreenView::default()
            })
        }
    }
}

/// set_plan_active
///
/// [Protected Route, ADMIN] Activates or deactivates a plan from the Current
/// Plans list, then shows the list again.
async fn set_plan_active(
    state: AppState,
    client: ClientSession,
    plan_id: String,
    active: bool,
) -> Result<Response, PortalError> {
    let session = &client.session;
    if dispatch::resolve(session) != RoleView::Admin {
        return unauthorized_view(session);
    }
    let Some(token) = credential(session) else {
        return Ok(Navigation::to_login().into_response());
    };
    let Some(plan_id) = resource_id(&plan_id) else {
        return Ok(dashboard_tab(Role::Admin, TabId::CurrentPlans).into_response());
    };

    let result = state.services.set_plan_active(token, plan_id, active).await;
    if result.is_ok() {
        info!(plan_id, active, "plan availability changed");
    }
    after_mutation(
        &client,
        Role::Admin,
        TabId::CurrentPlans,
        result,
        "Failed to update the plan.",
    )
}

pub async fn activate_plan(
    State(state): State<AppState>,
    client: ClientSession,
    Path(plan_id): Path<String>,
) -> Result<Response, PortalError> {
    set_plan_active(state, client, plan_id, true).await
}

pub async fn deactivate_plan(
    State(state): State<AppState>,
    client: ClientSession,
    Path(plan_id): Path<String>,
) -> Result<Response, PortalError> {
    set_plan_active(state, client, plan_id, false).await
}

/// assign_ticket
///
/// [Protected Route, ADMIN] Hands a ticket to the employee picked in its row.
pub async fn assign_ticket(
    State(state): State<AppState>,
    client: ClientSession,
    Path(ticket_id): Path<i64>,
    Form(form): Form<AssignTicketForm>,
) -> Result<Response, PortalError> {
    let session = &client.session;
    if dispatch::resolve(session) != RoleView::Admin {
        return unauthorized_view(session);
    }
    let Some(token) = credential(session) else {
        return Ok(Navigation::to_login().into_response());
    };
    let Some(employee_id) = form.employee_id() else {
        return dashboard_with(
            session,
            Role::Admin,
            TabId::TicketManagement,
            ScreenView::message("Ticket Management", "Please select an employee."),
        );
    };

    let result = state
        .services
        .assign_ticket(token, ticket_id, employee_id)
        .await;
    if result.is_ok() {
        info!(ticket_id, employee_id, "ticket assigned");
    }
    after_mutation(
        &client,
        Role::Admin,
        TabId::TicketManagement,
        result,
        "Failed to assign the ticket.",
    )
}

/// update_ticket_status
///
/// [Protected Route, EMPLOYEE] Moves one of the employee's tickets to a new status.
pub async fn update_ticket_status(
    State(state): State<AppState>,
    client: ClientSession,
    Path(ticket_id): Path<i64>,
    Form(form): Form<TicketStatusForm>,
) -> Result<Response, PortalError> {
    let session = &client.session;
    if dispatch::resolve(session) != RoleView::Employee {
        return unauthorized_view(session);
    }
    let Some(token) = credential(session) else {
        return Ok(Navigation::to_login().into_response());
    };
    let Some(status) = form.status() else {
        return dashboard_with(
            session,
            Role::Employee,
            TabId::AssignedTickets,
            ScreenView::message("Tickets Assigned to You", "Please select a valid status."),
        );
    };

    let result = state
        .services
        .update_ticket_status(token, ticket_id, status)
        .await;
    if result.is_ok() {
        info!(ticket_id, status, "ticket status updated");
    }
    after_mutation(
        &client,
        Role::Employee,
        TabId::AssignedTickets,
        result,
        "Failed to update the ticket.",
    )
}

/// create_ticket
///
/// [Protected Route, USER] Raises a support ticket, then shows the user's tickets.
pub async fn create_ticket(
    State(state): State<AppState>,
    client: ClientSession,
    Form(form): Form<TicketForm>,
) -> Result<Response, PortalError> {
    let session = &client.session;
    if dispatch::resolve(session) != RoleView::User {
        return unauthorized_view(session);
    }
    let (Some(token), Some(user_id)) = (credential(session), session.user_id) else {
        return Ok(navigation::force_logout(&client.store).into_response());
    };

    let ticket = match form.into_request(user_id) {
        Ok(ticket) => ticket,
        Err(errors) => {
            return dashboard_with(
                session,
                Role::User,
                TabId::SupportTickets,
                ScreenView {
                    heading: "My Support Tickets",
                    form: Some(ScreenForm::RaiseTicket),
                    errors,
                    ..ScreenView::default()
                },
            );
        }
    };

    let result = state.services.create_ticket(token, ticket).await;
    if result.is_ok() {
        info!(user_id, "support ticket raised");
    }
    after_mutation(
        &client,
        Role::User,
        TabId::SupportTickets,
        result,
        "Failed to create the ticket.",
    )
}

/// cancel_subscription
///
/// [Protected Route, USER] Cancels a subscription from the Active Plan tab.
pub async fn cancel_subscription(
    State(state): State<AppState>,
    client: ClientSession,
    Path(subscription_id): Path<String>,
) -> Result<Response, PortalError> {
    let session = &client.session;
    if dispatch::resolve(session) != RoleView::User {
        return unauthorized_view(session);
    }
    let Some(token) = credential(session) else {
        return Ok(Navigation::to_login().into_response());
    };
    let Some(subscription_id) = resource_id(&subscription_id) else {
        return Ok(dashboard_tab(Role::User, TabId::ActivePlan).into_response());
    };

    let result = state
        .services
        .cancel_subscription(token, subscription_id)
        .await;
    if result.is_ok() {
        info!(subscription_id, "subscription cancelled");
    }
    after_mutation(
        &client,
        Role::User,
        TabId::ActivePlan,
        result,
        "Failed to cancel the subscription.",
    )
}

/// checkout_page
///
/// [Protected Route] Shows the selected plan and the payment form.
pub async fn checkout_page(
    client: ClientSession,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response, PortalError> {
    views::render(&CheckoutPage {
        nav: NavBar::from(&client.session),
        plan_id: query
            .plan_id
            .as_deref()
            .and_then(resource_id)
            .map(str::to_string),
        amount: query.amount,
        error: None,
    })
}

/// checkout
///
/// [Protected Route] Subscribes the user to the plan, then processes the payment.
pub async fn checkout(
    State(state): State<AppState>,
    client: ClientSession,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, PortalError> {
    let session = &client.session;
    let (Some(token), Some(user_id)) = (credential(session), session.user_id) else {
        return Ok(navigation::force_logout(&client.store).into_response());
    };

    let page = |error: String| {
        views::render(&CheckoutPage {
            nav: NavBar::from(session),
            plan_id: resource_id(&form.plan_id).map(str::to_string),
            amount: Some(form.amount),
            error: Some(error),
        })
    };

    let Some(plan_id) = resource_id(&form.plan_id).map(str::to_string) else {
        return page("No plan selected.".to_string());
    };

    let subscribed = state
        .services
        .subscribe(
            token,
            SubscribeRequest {
                user_id,
                plan_id: plan_id.clone(),
            },
        )
        .await;
    match subscribed {
        Ok(outcome) if outcome.success => {}
        Ok(outcome) => {
            return page(outcome.message.unwrap_or_else(|| {
                "Subscription failed. You cannot subscribe to more than 2 plans.".to_string()
            }));
        }
        Err(ServiceError::Unauthorized(_)) => {
            return Ok(navigation::force_logout(&client.store).into_response());
        }
        Err(error) => {
            warn!(%error, "subscription failed");
            return page("Error processing payment".to_string());
        }
    }

    let payment = PaymentRequest {
        plan_id: plan_id.clone(),
        user_id,
        amount: form.amount,
        payment_method: form.payment_method.clone(),
    };
    match state.services.process_payment(token, payment).await {
        Ok(_) => {
            info!(user_id, %plan_id, "payment processed");
            Ok(dashboard_tab(Role::User, TabId::ActivePlan).into_response())
        }
        Err(ServiceError::Unauthorized(_)) => {
            Ok(navigation::force_logout(&client.store).into_response())
        }
        Err(error) => {
            warn!(%error, "payment failed");
            page("Error processing payment".to_string())
        }
    }
}

/// update_details_page
///
/// [Protected Route] Loads the current profile from the account service, falling
/// back to the cached snapshot when the service is unreachable.
pub async fn update_details_page(
    State(state): State<AppState>,
    client: ClientSession,
) -> Result<Response, PortalError> {
    let session = &client.session;
    let (Some(token), Some(user_id)) = (credential(session), session.user_id) else {
        return Ok(navigation::force_logout(&client.store).into_response());
    };

    let (form, error) = match state.auth.find_user(token, user_id).await {
        Ok(record) => (UpdateUserRequest::from_profile(&record.profile), None),
        Err(AuthError::Unauthorized) => {
            return Ok(navigation::force_logout(&client.store).into_response());
        }
        Err(error) => {
            warn!(%error, "could not load user details");
            let cached = session
                .profile
                .as_ref()
                .map(UpdateUserRequest::from_profile)
                .unwrap_or_default();
            (cached, Some("Could not load your latest details.".to_string()))
        }
    };

    views::render(&UpdateDetailsPage {
        nav: NavBar::from(session),
        form,
        errors: Vec::new(),
        error,
    })
}

/// update_details
///
/// [Protected Route] Saves the profile and refreshes the cached snapshot.
pub async fn update_details(
    State(state): State<AppState>,
    client: ClientSession,
    Form(form): Form<UpdateUserRequest>,
) -> Result<Response, PortalError> {
    let session = &client.session;
    let (Some(token), Some(user_id)) = (credential(session), session.user_id) else {
        return Ok(navigation::force_logout(&client.store).into_response());
    };

    let errors = form.validate();
    if !errors.is_empty() {
        return views::render(&UpdateDetailsPage {
            nav: NavBar::from(session),
            form,
            errors,
            error: None,
        });
    }

    match state.auth.update_user(token, user_id, form.clone()).await {
        Ok(record) => {
            client.store.update_profile(&record.profile)?;
            info!(user_id, "user details updated");
            let role = session.role().unwrap_or(Role::User);
            Ok(dashboard_tab(role, TabId::AccountDetails).into_response())
        }
        Err(AuthError::Unauthorized) => {
            Ok(navigation::force_logout(&client.store).into_response())
        }
        Err(error) => {
            let message = match error {
                AuthError::Rejected(message) => message,
                other => {
                    warn!(error = %other, "user update failed");
                    "Failed to update user details.".to_string()
                }
            };
            views::render(&UpdateDetailsPage {
                nav: NavBar::from(session),
                form,
                errors: Vec::new(),
                error: Some(message),
            })
        }
    }
}
