//! Session lifecycle policies and the navigation state machine.
//!
//! ```text
//! [Unauthenticated] --login success--> [Authenticated:Role]
//! [Authenticated:Role] --logout / 401--> [Unauthenticated]
//! [Authenticated:known role] --dashboard--> [RoleShell]
//! [Authenticated:other] --dashboard--> [UnauthorizedView]
//! [Unauthenticated] --protected target--> [Login]
//! ```

use axum::response::{IntoResponse, Redirect, Response};
use tracing::info;

use crate::dispatch::{self, RoleView};
use crate::guard::{self, GuardDecision, Target};
use crate::models::AuthResponse;
use crate::session::{NewSession, SessionError, SessionStore};

/// Navigation
///
/// A navigation the portal asks the client to perform. `Replace` overwrites the
/// current history entry so "back" cannot return to the page that was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Push(Target),
    Replace(Target),
}

impl Navigation {
    pub fn target(self) -> Target {
        match self {
            Self::Push(target) | Self::Replace(target) => target,
        }
    }

    pub fn to_login() -> Self {
        Self::Replace(Target::Login)
    }
}

impl IntoResponse for Navigation {
    // A redirect never becomes a history entry of its own, which is the
    // replace behaviour; a push is the browser landing on the new target.
    fn into_response(self) -> Response {
        Redirect::to(self.target().path()).into_response()
    }
}

/// complete_login
///
/// Establishes the session from a login or registration response and, only when
/// the write succeeded, navigates to the dashboard.
pub fn complete_login(
    store: &SessionStore,
    response: AuthResponse,
) -> Result<Navigation, SessionError> {
    store.set(&NewSession::from(response))?;
    Ok(Navigation::Push(Target::Dashboard))
}

/// logout
///
/// Explicit logout: clears the session and goes to the landing page.
pub fn logout(store: &SessionStore) -> Navigation {
    store.clear();
    info!("user logged out");
    Navigation::Push(Target::Landing)
}

/// force_logout
///
/// The shared handler for a 401-class response from any collaborator. Every feature
/// screen routes through here instead of clearing state on its own.
pub fn force_logout(store: &SessionStore) -> Navigation {
    store.clear();
    info!("credential rejected downstream, forcing logout");
    Navigation::to_login()
}

/// View
///
/// What the current history entry renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Page(Target),
    Dashboard(RoleView),
}

/// Navigator
///
/// In-process model of one client's history stack. Every entry, including one
/// reached with `back`, passes through the route guard before it renders.
pub struct Navigator {
    store: SessionStore,
    entries: Vec<Target>,
    cursor: usize,
}

impl Navigator {
    /// Starts on the landing page.
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            entries: vec![Target::Landing],
            cursor: 0,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn current(&self) -> Target {
        self.entries[self.cursor]
    }

    pub fn history(&self) -> &[Target] {
        &self.entries[..=self.cursor]
    }

    pub fn navigate(&mut self, target: Target) -> Target {
        self.apply(Navigation::Push(target))
    }

    /// Steps back one entry, if there is one, and re-enters it.
    pub fn back(&mut self) -> Target {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.enter()
    }

    pub fn apply(&mut self, navigation: Navigation) -> Target {
        match navigation {
            Navigation::Push(target) => {
                self.entries.truncate(self.cursor + 1);
                self.entries.push(target);
                self.cursor = self.entries.len() - 1;
            }
            Navigation::Replace(target) => self.entries[self.cursor] = target,
        }
        self.enter()
    }

    fn enter(&mut self) -> Target {
        let session = self.store.get();
        if guard::check(self.current(), &session) == GuardDecision::RedirectToLogin {
            self.entries[self.cursor] = Target::Login;
        }
        self.current()
    }

    pub fn view(&self) -> View {
        match self.current() {
            Target::Dashboard => View::Dashboard(dispatch::resolve(&self.store.get())),
            target => View::Page(target),
        }
    }

    pub fn login(&mut self, response: AuthResponse) -> Result<Target, SessionError> {
        let navigation = complete_login(&self.store, response)?;
        Ok(self.apply(navigation))
    }

    pub fn logout(&mut self) -> Target {
        let navigation = logout(&self.store);
        self.apply(navigation)
    }

    pub fn reject_credential(&mut self) -> Target {
        let navigation = force_logout(&self.store);
        self.apply(navigation)
    }
}
