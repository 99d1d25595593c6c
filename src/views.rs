use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::PortalError;
use crate::models::{FieldError, Profile, RegisterForm, UpdateUserRequest};
use crate::screens::ScreenView;
use crate::session::Session;
use crate::shell::NavigationShell;

/// Renders a template into an HTML response.
pub fn render<T: Template>(template: &T) -> Result<Response, PortalError> {
    Ok(Html(template.render()?).into_response())
}

/// NavBar
///
/// Header state shared by every page: whether to offer "Dashboard / Logout" or
/// "Login / Register".
#[derive(Debug, Clone, Default)]
pub struct NavBar {
    pub authenticated: bool,
    pub display_name: Option<String>,
}

impl From<&Session> for NavBar {
    fn from(session: &Session) -> Self {
        Self {
            authenticated: session.is_authenticated(),
            display_name: session
                .profile
                .as_ref()
                .map(Profile::display_name)
                .filter(|name| !name.is_empty()),
        }
    }
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingPage {
    pub nav: NavBar,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub nav: NavBar,
    pub identifier: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub nav: NavBar,
    pub form: RegisterForm,
    pub errors: Vec<FieldError>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "reset_password.html")]
pub struct ResetPasswordPage {
    pub nav: NavBar,
    pub email: String,
    pub error: Option<String>,
}

/// InfoPage
///
/// The static about / mission / support pages.
#[derive(Template)]
#[template(path = "info.html")]
pub struct InfoPage {
    pub nav: NavBar,
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
}

pub struct TabLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// DashboardPage
///
/// A mounted navigation shell: the tab strip plus the active tab's panel.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub nav: NavBar,
    pub title: &'static str,
    pub tabs: Vec<TabLink>,
    pub view: ScreenView,
}

impl DashboardPage {
    pub fn new(nav: NavBar, shell: &NavigationShell, view: ScreenView) -> Self {
        let tabs = shell
            .tabs()
            .iter()
            .enumerate()
            .map(|(index, tab)| TabLink {
                label: tab.label,
                href: format!("/dashboard?tab={index}"),
                active: index == shell.selected(),
            })
            .collect();
        Self {
            nav,
            title: shell.title(),
            tabs,
            view,
        }
    }
}

#[derive(Template)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedPage {
    pub nav: NavBar,
    pub message: &'static str,
}

#[derive(Template)]
#[template(path = "checkout.html")]
pub struct CheckoutPage {
    pub nav: NavBar,
    pub plan_id: Option<String>,
    pub amount: Option<f64>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "update_details.html")]
pub struct UpdateDetailsPage {
    pub nav: NavBar,
    pub form: UpdateUserRequest,
    pub errors: Vec<FieldError>,
    pub error: Option<String>,
}
