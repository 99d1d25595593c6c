use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{FieldError, TICKET_STATUSES, resource_id};
use crate::services::{Service, ServiceClient, ServiceError};
use crate::shell::TabId;

/// ScreenContext
///
/// What a feature screen receives when its tab is the active one.
pub struct ScreenContext<'a> {
    pub token: &'a str,
    pub user_id: Option<i64>,
    pub api: &'a dyn ServiceClient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLink {
    pub href: String,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn fixed(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.replace('_', " "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelect {
    /// Form field the chosen value is posted under.
    pub name: &'static str,
    pub options: Vec<SelectOption>,
}

/// RowForm
///
/// A one-button form in a table row that posts back to the dashboard, with an
/// optional select for the value being set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowForm {
    pub action: String,
    pub label: &'static str,
    pub select: Option<RowSelect>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub action: Option<RowLink>,
    pub form: Option<RowForm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn has_actions(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.action.is_some() || row.form.is_some())
    }
}

/// Forms a screen can render beside or in place of its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenForm {
    CreatePlan,
    RaiseTicket,
}

/// ScreenView
///
/// The rendered content of one tab panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenView {
    pub heading: &'static str,
    pub table: Option<Table>,
    pub form: Option<ScreenForm>,
    pub message: Option<String>,
    pub errors: Vec<FieldError>,
}

impl ScreenView {
    pub fn message(heading: &'static str, message: impl Into<String>) -> Self {
        Self {
            heading,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn shows_plan_form(&self) -> bool {
        self.form == Some(ScreenForm::CreatePlan)
    }

    pub fn shows_ticket_form(&self) -> bool {
        self.form == Some(ScreenForm::RaiseTicket)
    }
}

/// Screen
///
/// A feature screen mounted inside a navigation shell. It is only loaded while its
/// tab is selected and performs its own data fetching.
#[async_trait]
pub trait Screen: Send + Sync {
    async fn load(&self, ctx: &ScreenContext<'_>) -> Result<ScreenView, ServiceError>;
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub label: &'static str,
    /// Dotted path into the record, e.g. `plan.name`.
    pub key: &'static str,
    pub truncate: Option<usize>,
}

const fn col(label: &'static str, key: &'static str) -> Column {
    Column {
        label,
        key,
        truncate: None,
    }
}

const fn short(label: &'static str, key: &'static str, max: usize) -> Column {
    Column {
        label,
        key,
        truncate: Some(max),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Links a plan row to the checkout page.
    BuyPlan,
    /// Activates an inactive plan, deactivates an active one (admin).
    TogglePlan,
    /// Cancels the user's subscription.
    CancelSubscription,
    /// Hands the ticket to one of the listed employees (admin).
    AssignTicket,
    /// Moves an assigned ticket to a new status (employee).
    ChangeTicketStatus,
}

/// ListScreen
///
/// A table rendered from a list fetched from one service endpoint. `{userId}` in
/// the path is replaced with the session's user id.
#[derive(Debug, Clone)]
pub struct ListScreen {
    pub heading: &'static str,
    pub service: Service,
    pub path: &'static str,
    pub columns: &'static [Column],
    pub empty: &'static str,
    /// Keep only records whose `active` flag is true.
    pub only_active: bool,
    pub action: Option<RowAction>,
    /// Shown with the list, and on its own when the list is empty.
    pub form: Option<ScreenForm>,
}

/// Keys under which the services wrap their lists.
const ENVELOPE_KEYS: [&str; 3] = ["data", "content", "planHistory"];

/// Flattens the services' response shapes into records: a bare list, an object
/// wrapping a list under one of the envelope keys (possibly nested), or a single
/// record.
pub fn extract_records(value: &Value) -> Vec<Map<String, Value>> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        Value::Object(object) => {
            for key in ENVELOPE_KEYS {
                match object.get(key) {
                    Some(inner @ (Value::Array(_) | Value::Object(_))) => {
                        return extract_records(inner);
                    }
                    Some(Value::Null) => return Vec::new(),
                    _ => {}
                }
            }
            vec![object.clone()]
        }
        _ => Vec::new(),
    }
}

fn lookup<'v>(record: &'v Map<String, Value>, path: &str) -> Option<&'v Value> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

/// The record's `id`, whether the service sends it as a number or a string.
fn record_id(record: &Map<String, Value>) -> Option<String> {
    match lookup(record, "id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => resource_id(s).map(str::to_string),
        _ => None,
    }
}

/// Renders one JSON value as table text. Timestamps are shortened to minutes.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => format_text(s),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| format_cell(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(object @ Value::Object(_)) => object.to_string(),
    }
}

fn format_text(raw: &str) -> String {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return stamp.format("%d %b %Y %H:%M").to_string();
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return stamp.format("%d %b %Y %H:%M").to_string();
    }
    raw.to_string()
}

fn truncate(text: String, max: Option<usize>) -> String {
    match max {
        Some(max) if text.chars().count() > max => {
            let head: String = text.chars().take(max).collect();
            format!("{head}...")
        }
        _ => text,
    }
}

impl ListScreen {
    fn row_link(&self, record: &Map<String, Value>) -> Option<RowLink> {
        match self.action? {
            RowAction::BuyPlan => {
                let id = record_id(record)?;
                let amount = lookup(record, "price")?.as_f64()?;
                Some(RowLink {
                    href: format!("/payment-checkout?plan_id={id}&amount={amount}"),
                    label: "Buy Plan",
                })
            }
            _ => None,
        }
    }

    fn row_form(&self, record: &Map<String, Value>, employees: &[SelectOption]) -> Option<RowForm> {
        let form = match self.action? {
            RowAction::BuyPlan => return None,
            RowAction::TogglePlan => {
                let id = record_id(record)?;
                let active = lookup(record, "active").and_then(Value::as_bool) == Some(true);
                let (verb, label) = if active {
                    ("deactivate", "Deactivate")
                } else {
                    ("activate", "Activate")
                };
                RowForm {
                    action: format!("/dashboard/plans/{id}/{verb}"),
                    label,
                    select: None,
                }
            }
            RowAction::CancelSubscription => RowForm {
                action: format!("/dashboard/subscriptions/{}/cancel", record_id(record)?),
                label: "Cancel",
                select: None,
            },
            RowAction::AssignTicket => {
                if employees.is_empty() {
                    return None;
                }
                RowForm {
                    action: format!("/dashboard/tickets/{}/assign", record_id(record)?),
                    label: "Assign",
                    select: Some(RowSelect {
                        name: "employee_id",
                        options: employees.to_vec(),
                    }),
                }
            }
            RowAction::ChangeTicketStatus => RowForm {
                action: format!("/dashboard/tickets/{}/status", record_id(record)?),
                label: "Update",
                select: Some(RowSelect {
                    name: "status",
                    options: TICKET_STATUSES.into_iter().map(SelectOption::fixed).collect(),
                }),
            },
        };
        Some(form)
    }

    /// Builds the table for already-fetched data.
    pub fn table(&self, data: &Value) -> Table {
        self.table_with(data, &[])
    }

    /// Builds the table, offering `employees` in each row's assignment select.
    pub fn table_with(&self, data: &Value, employees: &[SelectOption]) -> Table {
        let rows = extract_records(data)
            .into_iter()
            .filter(|record| {
                !self.only_active || lookup(record, "active").and_then(Value::as_bool) == Some(true)
            })
            .map(|record| TableRow {
                cells: self
                    .columns
                    .iter()
                    .map(|column| truncate(format_cell(lookup(&record, column.key)), column.truncate))
                    .collect(),
                action: self.row_link(&record),
                form: self.row_form(&record, employees),
            })
            .collect();

        Table {
            columns: self.columns.iter().map(|column| column.label).collect(),
            rows,
        }
    }

    fn resolve_path(&self, ctx: &ScreenContext<'_>) -> Result<String, ServiceError> {
        if !self.path.contains("{userId}") {
            return Ok(self.path.to_string());
        }
        // A session without a user id cannot scope the fetch; treat it like a
        // rejected credential.
        let user_id = ctx.user_id.ok_or(ServiceError::Unauthorized(self.service))?;
        Ok(self.path.replace("{userId}", &user_id.to_string()))
    }

    fn view(&self, table: Table) -> ScreenView {
        if table.rows.is_empty() {
            return ScreenView {
                form: self.form,
                ..ScreenView::message(self.heading, self.empty)
            };
        }
        ScreenView {
            heading: self.heading,
            table: Some(table),
            form: self.form,
            ..ScreenView::default()
        }
    }
}

#[async_trait]
impl Screen for ListScreen {
    async fn load(&self, ctx: &ScreenContext<'_>) -> Result<ScreenView, ServiceError> {
        let path = self.resolve_path(ctx)?;
        let data = ctx.api.fetch(self.service, &path, ctx.token).await?;
        Ok(self.view(self.table(&data)))
    }
}

/// TicketAssignmentScreen
///
/// The admin's ticket list. It also loads the employee directory so every row
/// can offer the assignment select.
pub struct TicketAssignmentScreen {
    pub tickets: ListScreen,
}

const EMPLOYEES_PATH: &str = "/account/get-all-employees";

/// Employee records as select options labelled "First Last".
pub fn employee_options(data: &Value) -> Vec<SelectOption> {
    extract_records(data)
        .iter()
        .filter_map(|record| {
            let value = record_id(record)?;
            let name = ["firstName", "lastName"]
                .iter()
                .filter_map(|key| lookup(record, key).and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(" ");
            let label = if name.trim().is_empty() {
                format!("Employee #{value}")
            } else {
                name
            };
            Some(SelectOption { value, label })
        })
        .collect()
}

#[async_trait]
impl Screen for TicketAssignmentScreen {
    async fn load(&self, ctx: &ScreenContext<'_>) -> Result<ScreenView, ServiceError> {
        let path = self.tickets.resolve_path(ctx)?;
        let tickets = ctx.api.fetch(self.tickets.service, &path, ctx.token).await?;
        let employees = match ctx.api.fetch(Service::Account, EMPLOYEES_PATH, ctx.token).await {
            Ok(data) => employee_options(&data),
            Err(ServiceError::Unauthorized(service)) => {
                return Err(ServiceError::Unauthorized(service));
            }
            // The list is still useful without the assignment select.
            Err(error) => {
                warn!(%error, "employee directory unavailable");
                Vec::new()
            }
        };
        Ok(self.tickets.view(self.tickets.table_with(&tickets, &employees)))
    }
}

/// CreatePlanScreen
///
/// The admin's default tab: a form posted to `/dashboard/plans`.
pub struct CreatePlanScreen;

#[async_trait]
impl Screen for CreatePlanScreen {
    async fn load(&self, _ctx: &ScreenContext<'_>) -> Result<ScreenView, ServiceError> {
        Ok(ScreenView {
            heading: "Create Plan",
            form: Some(ScreenForm::CreatePlan),
            ..ScreenView::default()
        })
    }
}

const PLAN_COLUMNS: &[Column] = &[
    col("Name", "name"),
    col("Price (₹)", "price"),
    col("Duration (days)", "duration"),
    col("Data (GB)", "dataLimit"),
    col("SMS", "smsLimit"),
    col("Talktime Minutes", "talkTimeMinutes"),
];

const ADMIN_PLAN_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Price (₹)", "price"),
    col("Duration (days)", "duration"),
    col("Data (GB)", "dataLimit"),
    col("SMS", "smsLimit"),
    col("Active", "active"),
];

const TICKET_COLUMNS: &[Column] = &[
    col("Ticket ID", "id"),
    col("Title", "title"),
    short("Description", "description", 10),
    col("Status", "status"),
    col("Priority", "priority"),
    col("User ID", "userId"),
    col("Assigned To", "employeeId"),
    col("Created At", "createdAt"),
];

const SUBSCRIPTION_COLUMNS: &[Column] = &[
    col("Plan", "planName"),
    col("Status", "status"),
    col("Start Date", "startDate"),
    col("End Date", "endDate"),
];

const PAYMENT_COLUMNS: &[Column] = &[
    col("Payment ID", "id"),
    col("Plan ID", "planId"),
    col("Amount (₹)", "amount"),
    col("Status", "status"),
    col("Date", "paymentDate"),
];

const TRANSACTION_COLUMNS: &[Column] = &[
    col("Transaction ID", "transactionId"),
    col("Amount (₹)", "amount"),
    col("Method", "paymentMethod"),
    col("Status", "status"),
    col("Date", "paymentDate"),
];

const USAGE_COLUMNS: &[Column] = &[
    col("Plan", "planName"),
    col("Data Used (GB)", "dataUsed"),
    col("SMS Used", "smsUsed"),
    col("Talktime Used", "talkTimeUsed"),
];

const ACCOUNT_COLUMNS: &[Column] = &[
    col("First Name", "firstName"),
    col("Last Name", "lastName"),
    col("Email", "email"),
    col("Mobile", "mobile"),
    col("Alternate Phone", "alternatePhone"),
    col("Address", "address"),
];

const fn list(
    heading: &'static str,
    service: Service,
    path: &'static str,
    columns: &'static [Column],
    empty: &'static str,
) -> ListScreen {
    ListScreen {
        heading,
        service,
        path,
        columns,
        empty,
        only_active: false,
        action: None,
        form: None,
    }
}

/// ScreenRegistry
///
/// The screen mounted for each tab id. `default()` wires every tab to its service
/// endpoint; tests swap individual screens with `with`.
#[derive(Clone)]
pub struct ScreenRegistry {
    screens: HashMap<TabId, Arc<dyn Screen>>,
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        let lists = [
            (
                TabId::CurrentPlans,
                ListScreen {
                    action: Some(RowAction::TogglePlan),
                    ..list(
                        "Current Plans",
                        Service::Plan,
                        "/admin/plans/all",
                        ADMIN_PLAN_COLUMNS,
                        "No plans available.",
                    )
                },
            ),
            (
                TabId::AssignedTickets,
                ListScreen {
                    action: Some(RowAction::ChangeTicketStatus),
                    ..list(
                        "Tickets Assigned to You",
                        Service::Support,
                        "/support/tickets/employee/{userId}",
                        TICKET_COLUMNS,
                        "No tickets assigned.",
                    )
                },
            ),
            (
                TabId::AllPlans,
                ListScreen {
                    only_active: true,
                    action: Some(RowAction::BuyPlan),
                    ..list(
                        "All Available Plans",
                        Service::Plan,
                        "/plans?page=0",
                        PLAN_COLUMNS,
                        "No plans available.",
                    )
                },
            ),
            (
                TabId::ActivePlan,
                ListScreen {
                    action: Some(RowAction::CancelSubscription),
                    ..list(
                        "Active Plan",
                        Service::Plan,
                        "/user-plans/user/{userId}/active",
                        SUBSCRIPTION_COLUMNS,
                        "You have no active plan.",
                    )
                },
            ),
            (
                TabId::PlanHistory,
                list(
                    "Plan History",
                    Service::Plan,
                    "/user-plans/user/{userId}/history",
                    SUBSCRIPTION_COLUMNS,
                    "No plan history.",
                ),
            ),
            (
                TabId::BillingDetails,
                list(
                    "Billing Details",
                    Service::Payment,
                    "/payments/user/{userId}",
                    PAYMENT_COLUMNS,
                    "No bills yet.",
                ),
            ),
            (
                TabId::TransactionDetails,
                list(
                    "Transaction Details",
                    Service::Payment,
                    "/payments/user/{userId}",
                    TRANSACTION_COLUMNS,
                    "No transactions yet.",
                ),
            ),
            (
                TabId::UsageDetails,
                list(
                    "Usage Details",
                    Service::Plan,
                    "/user-plans/user/{userId}/usage",
                    USAGE_COLUMNS,
                    "No usage recorded.",
                ),
            ),
            (
                TabId::SupportTickets,
                ListScreen {
                    form: Some(ScreenForm::RaiseTicket),
                    ..list(
                        "My Support Tickets",
                        Service::Support,
                        "/support/tickets/user/{userId}",
                        TICKET_COLUMNS,
                        "You have not raised any tickets.",
                    )
                },
            ),
            (
                TabId::AccountDetails,
                list(
                    "Account Details",
                    Service::Account,
                    "/account/find-user/{userId}",
                    ACCOUNT_COLUMNS,
                    "No account details found.",
                ),
            ),
        ];

        let mut screens: HashMap<TabId, Arc<dyn Screen>> = lists
            .into_iter()
            .map(|(id, screen)| (id, Arc::new(screen) as Arc<dyn Screen>))
            .collect();
        screens.insert(TabId::CreatePlan, Arc::new(CreatePlanScreen));
        screens.insert(
            TabId::TicketManagement,
            Arc::new(TicketAssignmentScreen {
                tickets: list(
                    "Ticket Management",
                    Service::Support,
                    "/support/tickets/get-all-tickets",
                    TICKET_COLUMNS,
                    "No tickets found.",
                ),
            }),
        );

        Self { screens }
    }
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the screen mounted for `id`.
    pub fn with(mut self, id: TabId, screen: Arc<dyn Screen>) -> Self {
        self.screens.insert(id, screen);
        self
    }

    pub fn get(&self, id: TabId) -> Option<Arc<dyn Screen>> {
        self.screens.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_are_found_inside_envelopes() {
        let paged = json!({ "data": { "content": [{ "id": 1 }, { "id": 2 }] } });
        assert_eq!(extract_records(&paged).len(), 2);

        let history = json!({ "planHistory": [{ "id": 3 }] });
        assert_eq!(extract_records(&history).len(), 1);

        let single = json!({ "firstName": "Asha", "lastName": "Rao" });
        assert_eq!(extract_records(&single).len(), 1);

        assert!(extract_records(&json!({ "data": null })).is_empty());
        assert!(extract_records(&Value::Null).is_empty());
    }

    #[test]
    fn long_descriptions_are_shortened() {
        let screen = list("Tickets", Service::Support, "/t", TICKET_COLUMNS, "none");
        let table = screen.table(&json!([{ "id": 4, "description": "Router keeps rebooting" }]));
        assert_eq!(table.rows[0].cells[2], "Router kee...");
    }

    #[test]
    fn inactive_plans_are_hidden_and_active_ones_link_to_checkout() {
        let screen = ListScreen {
            only_active: true,
            action: Some(RowAction::BuyPlan),
            ..list("Plans", Service::Plan, "/plans", PLAN_COLUMNS, "none")
        };
        let table = screen.table(&json!({ "data": { "content": [
            { "id": 1, "name": "Basic", "price": 199.0, "active": true },
            { "id": 2, "name": "Retired", "price": 99.0, "active": false }
        ] } }));

        assert_eq!(table.rows.len(), 1);
        let link = table.rows[0].action.as_ref().expect("buy link");
        assert_eq!(link.href, "/payment-checkout?plan_id=1&amount=199");
    }

    #[test]
    fn string_plan_ids_link_to_checkout() {
        let screen = ListScreen {
            action: Some(RowAction::BuyPlan),
            ..list("Plans", Service::Plan, "/plans", PLAN_COLUMNS, "none")
        };
        let table = screen.table(&json!([
            { "id": "64f1c2", "name": "Basic", "price": 199.0 },
            { "id": "../admin", "name": "Odd", "price": 1.0 }
        ]));

        let link = table.rows[0].action.as_ref().expect("buy link");
        assert_eq!(link.href, "/payment-checkout?plan_id=64f1c2&amount=199");
        assert_eq!(table.rows[1].action, None);
    }

    #[test]
    fn plan_rows_offer_the_opposite_of_their_state() {
        let screen = ListScreen {
            action: Some(RowAction::TogglePlan),
            ..list("Plans", Service::Plan, "/admin/plans/all", ADMIN_PLAN_COLUMNS, "none")
        };
        let table = screen.table(&json!([
            { "id": "p1", "active": true },
            { "id": "p2", "active": false }
        ]));

        let forms: Vec<_> = table.rows.iter().map(|row| row.form.clone().unwrap()).collect();
        assert_eq!(forms[0].action, "/dashboard/plans/p1/deactivate");
        assert_eq!(forms[0].label, "Deactivate");
        assert_eq!(forms[1].action, "/dashboard/plans/p2/activate");
        assert!(table.has_actions());
    }

    #[test]
    fn assigned_tickets_offer_employee_statuses() {
        let screen = ListScreen {
            action: Some(RowAction::ChangeTicketStatus),
            ..list("Tickets", Service::Support, "/t", TICKET_COLUMNS, "none")
        };
        let table = screen.table(&json!([{ "id": 12, "status": "ASSIGNED" }]));

        let form = table.rows[0].form.as_ref().expect("status form");
        assert_eq!(form.action, "/dashboard/tickets/12/status");
        let select = form.select.as_ref().expect("status select");
        assert_eq!(select.name, "status");
        let values: Vec<_> = select.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["IN_PROGRESS", "RESOLVED", "CLOSED"]);
        assert_eq!(select.options[0].label, "IN PROGRESS");
    }

    #[test]
    fn ticket_assignment_needs_employees() {
        let screen = ListScreen {
            action: Some(RowAction::AssignTicket),
            ..list("Tickets", Service::Support, "/t", TICKET_COLUMNS, "none")
        };
        let tickets = json!([{ "id": 3, "status": "NEW" }]);
        assert_eq!(screen.table(&tickets).rows[0].form, None);

        let employees = employee_options(&json!([
            { "id": 5, "firstName": "Ravi", "lastName": "Kumar" },
            { "id": 6 }
        ]));
        assert_eq!(employees[0].label, "Ravi Kumar");
        assert_eq!(employees[1].label, "Employee #6");

        let table = screen.table_with(&tickets, &employees);
        let form = table.rows[0].form.as_ref().expect("assign form");
        assert_eq!(form.action, "/dashboard/tickets/3/assign");
        assert_eq!(form.select.as_ref().map(|s| s.options.len()), Some(2));
    }

    #[test]
    fn empty_list_still_shows_its_form() {
        let screen = ListScreen {
            form: Some(ScreenForm::RaiseTicket),
            ..list("My Tickets", Service::Support, "/t", TICKET_COLUMNS, "No tickets.")
        };
        let view = screen.view(screen.table(&json!([])));
        assert_eq!(view.message.as_deref(), Some("No tickets."));
        assert_eq!(view.form, Some(ScreenForm::RaiseTicket));
    }

    #[test]
    fn cells_format_booleans_and_timestamps() {
        assert_eq!(format_cell(Some(&json!(true))), "Yes");
        assert_eq!(format_cell(None), "-");
        assert_eq!(
            format_cell(Some(&json!("2025-03-04T09:15:30"))),
            "04 Mar 2025 09:15"
        );
    }
}
