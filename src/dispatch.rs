use crate::session::{Role, Session};
use crate::shell::NavigationShell;

/// Message of the terminal view shown for a missing or unrecognized role.
pub const UNAUTHORIZED_MESSAGE: &str =
    "You are not authorized to access this resource. Please contact your administrator.";

/// RoleView
///
/// What mounts under the dashboard target. The four states are mutually exclusive
/// and cover every possible role value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleView {
    Admin,
    Employee,
    User,
    Unauthorized,
}

impl RoleView {
    /// The shell to mount, `None` for the unauthorized view.
    pub fn shell(self) -> Option<NavigationShell> {
        match self {
            Self::Admin => Some(NavigationShell::for_role(Role::Admin)),
            Self::Employee => Some(NavigationShell::for_role(Role::Employee)),
            Self::User => Some(NavigationShell::for_role(Role::User)),
            Self::Unauthorized => None,
        }
    }
}

impl From<Option<Role>> for RoleView {
    fn from(role: Option<Role>) -> Self {
        match role {
            Some(Role::Admin) => Self::Admin,
            Some(Role::Employee) => Self::Employee,
            Some(Role::User) => Self::User,
            None => Self::Unauthorized,
        }
    }
}

/// resolve
///
/// Maps the session's role label to the view to mount. Read once per mount; a live
/// role change is not a transition, it requires a fresh session.
pub fn resolve(session: &Session) -> RoleView {
    RoleView::from(session.role())
}
