use tracing::debug;

use crate::session::Session;

/// Target
///
/// Every navigation destination the portal knows about. The set is closed and
/// fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Landing,
    Login,
    Register,
    ResetPassword,
    About,
    Mission,
    Support,
    Dashboard,
    PaymentCheckout,
    UpdateDetails,
}

/// Targets reachable only while a credential token is present.
pub const PROTECTED_TARGETS: [Target; 3] = [
    Target::Dashboard,
    Target::PaymentCheckout,
    Target::UpdateDetails,
];

impl Target {
    pub const ALL: [Target; 10] = [
        Target::Landing,
        Target::Login,
        Target::Register,
        Target::ResetPassword,
        Target::About,
        Target::Mission,
        Target::Support,
        Target::Dashboard,
        Target::PaymentCheckout,
        Target::UpdateDetails,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ResetPassword => "/reset-password",
            Self::About => "/about-us",
            Self::Mission => "/mission",
            Self::Support => "/support",
            Self::Dashboard => "/dashboard",
            Self::PaymentCheckout => "/payment-checkout",
            Self::UpdateDetails => "/updatedetails",
        }
    }

    /// Resolves a request path. Sub-paths belong to their top-level target, so
    /// `/dashboard/plans` is guarded like `/dashboard`.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Self::Landing);
        }
        Self::ALL
            .into_iter()
            .filter(|target| *target != Self::Landing)
            .find(|target| {
                let root = target.path();
                trimmed == root
                    || trimmed
                        .strip_prefix(root)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
    }

    pub fn is_protected(self) -> bool {
        PROTECTED_TARGETS.contains(&self)
    }
}

/// GuardDecision
///
/// Outcome of entering a target. A redirect always goes to the login target and
/// replaces the entry that was being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

/// check
///
/// Decides whether `target` may render for `session`. The decision depends only on
/// the presence of a credential token; the token's content, age and the role are
/// never inspected. Callers evaluate it on every entry so a session cleared in the
/// meantime blocks the next navigation.
pub fn check(target: Target, session: &Session) -> GuardDecision {
    if !target.is_protected() || session.is_authenticated() {
        return GuardDecision::Allow;
    }
    debug!(target = target.path(), "no credential token, redirecting to login");
    GuardDecision::RedirectToLogin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_through_from_path() {
        for target in Target::ALL {
            assert_eq!(Target::from_path(target.path()), Some(target));
        }
    }

    #[test]
    fn sub_paths_belong_to_their_root() {
        assert_eq!(Target::from_path("/dashboard/plans"), Some(Target::Dashboard));
        assert_eq!(Target::from_path("/dashboard/"), Some(Target::Dashboard));
        assert_eq!(Target::from_path("/dashboards"), None);
        assert_eq!(Target::from_path("/nowhere"), None);
    }
}
