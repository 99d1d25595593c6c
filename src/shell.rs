use crate::session::Role;

/// TabId
///
/// Identifies a feature screen. Each id belongs to exactly one role's tab set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    // Admin
    CreatePlan,
    CurrentPlans,
    TicketManagement,
    // Employee
    AssignedTickets,
    // User
    AllPlans,
    ActivePlan,
    PlanHistory,
    BillingDetails,
    TransactionDetails,
    UsageDetails,
    SupportTickets,
    AccountDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSpec {
    pub id: TabId,
    pub label: &'static str,
}

const fn tab(id: TabId, label: &'static str) -> TabSpec {
    TabSpec { id, label }
}

const ADMIN_TABS: &[TabSpec] = &[
    tab(TabId::CreatePlan, "Create Plan"),
    tab(TabId::CurrentPlans, "Current Plans"),
    tab(TabId::TicketManagement, "Ticket Management"),
];

const EMPLOYEE_TABS: &[TabSpec] = &[tab(TabId::AssignedTickets, "Tickets Assigned to You")];

const USER_TABS: &[TabSpec] = &[
    tab(TabId::AllPlans, "All Plans"),
    tab(TabId::ActivePlan, "Active Plan"),
    tab(TabId::PlanHistory, "Plan History"),
    tab(TabId::BillingDetails, "Billing Details"),
    tab(TabId::TransactionDetails, "Transaction Details"),
    tab(TabId::UsageDetails, "Usage Details"),
    tab(TabId::SupportTickets, "Support Tickets"),
    tab(TabId::AccountDetails, "Account Details"),
];

/// Index selected on every fresh mount.
pub const DEFAULT_TAB: usize = 0;

/// NavigationShell
///
/// One role's tabbed container. It owns the tab set and the selected index and
/// nothing else: the index lives only as long as the shell value, so a fresh mount
/// always starts on the default tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationShell {
    role: Role,
    tabs: &'static [TabSpec],
    selected: usize,
}

impl NavigationShell {
    pub fn for_role(role: Role) -> Self {
        let tabs = match role {
            Role::Admin => ADMIN_TABS,
            Role::Employee => EMPLOYEE_TABS,
            Role::User => USER_TABS,
        };
        Self {
            role,
            tabs,
            selected: DEFAULT_TAB,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn title(&self) -> &'static str {
        match self.role {
            Role::Admin => "Admin Dashboard",
            Role::Employee => "Employee Dashboard",
            Role::User => "My Account",
        }
    }

    pub fn tabs(&self) -> &'static [TabSpec] {
        self.tabs
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Selects `index`; indices outside the tab set fall back to the default tab.
    pub fn select(&mut self, index: usize) {
        self.selected = if index < self.tabs.len() {
            index
        } else {
            DEFAULT_TAB
        };
    }

    /// Builder form of [`select`](Self::select), taking the optional `?tab=` value.
    pub fn with_selection(mut self, index: Option<usize>) -> Self {
        self.select(index.unwrap_or(DEFAULT_TAB));
        self
    }

    /// The only tab whose screen is loaded and rendered.
    pub fn active(&self) -> TabSpec {
        self.tabs[self.selected]
    }

    /// Position of `id` in this shell, if the role owns that screen.
    pub fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_sets_are_disjoint() {
        let admin = NavigationShell::for_role(Role::Admin);
        let employee = NavigationShell::for_role(Role::Employee);
        let user = NavigationShell::for_role(Role::User);

        for tab in admin.tabs() {
            assert!(employee.position(tab.id).is_none());
            assert!(user.position(tab.id).is_none());
        }
        for tab in employee.tabs() {
            assert!(user.position(tab.id).is_none());
        }
    }

    #[test]
    fn out_of_range_selection_falls_back() {
        let mut shell = NavigationShell::for_role(Role::User);
        shell.select(3);
        assert_eq!(shell.active().id, TabId::BillingDetails);
        shell.select(99);
        assert_eq!(shell.selected(), DEFAULT_TAB);
        assert_eq!(shell.active().id, TabId::AllPlans);
    }
}
