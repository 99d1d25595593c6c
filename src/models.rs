use serde::{Deserialize, Serialize};

// --- Identity Schemas (exchanged with the account service) ---

/// Profile
///
/// The last-known snapshot of the user record, cached in the client partition under
/// the `user` key for display. It can go stale relative to the account service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub alternate_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// UserRecord
///
/// The `user` object of a login response. The role travels as a raw label so an
/// unknown value survives until the dispatcher decides what to render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub profile: Profile,
}

/// AuthResponse
///
/// Successful login (and, when the service returns one, registration) payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRecord,
}

// --- Request Payloads (Input Schemas) ---

/// LoginForm
///
/// The login page's form. `identifier` accepts either an email or a mobile number.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

/// LoginRequest
///
/// Body of `POST /account/login`. Exactly one of `email` or `mobile` is sent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub password: String,
}

impl From<LoginForm> for LoginRequest {
    fn from(form: LoginForm) -> Self {
        let identifier = form.identifier.trim().to_string();
        if identifier.contains('@') {
            Self {
                email: Some(identifier),
                mobile: None,
                password: form.password,
            }
        } else {
            Self {
                email: None,
                mobile: Some(identifier),
                password: form.password,
            }
        }
    }
}

/// RegisterForm
///
/// The signup page's form, validated locally before anything is sent.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub mobile: String,
    pub alternate_mobile: String,
    pub address: String,
    pub role: String,
    pub security_question: String,
    pub security_answer: String,
}

/// FieldError
///
/// One validation failure, keyed by form field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

const PASSWORD_SPECIALS: &[char] = &['@', '#', '$', '%'];

/// Checks the strength rule used at signup: at least 8 characters with an upper
/// case letter, a lower case letter, a digit and one of `@ # $ %`.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(&c))
}

fn is_mobile_number(value: &str) -> bool {
    value.len() == 10 && value.chars().all(|c| c.is_ascii_digit())
}

impl RegisterForm {
    /// validate
    ///
    /// Returns every failing field. An empty vector means the form can be sent.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut fail = |field, message| errors.push(FieldError { field, message });

        if self.first_name.trim().is_empty() {
            fail("first_name", "First Name is required");
        } else if !self.first_name.trim().chars().all(|c| c.is_ascii_alphabetic()) {
            fail("first_name", "First Name may only contain letters");
        }
        if self.last_name.trim().is_empty() {
            fail("last_name", "Last Name is required");
        } else if !self.last_name.trim().chars().all(|c| c.is_ascii_alphabetic()) {
            fail("last_name", "Last Name may only contain letters");
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') || !email.contains('.') {
            fail("email", "Valid Email is required");
        }
        if self.password.trim().is_empty() {
            fail("password", "Password is required");
        } else if !is_strong_password(&self.password) {
            fail(
                "password",
                "Weak password. Must be at least 8 characters long with uppercase, lowercase, a number, and a special character (@, #, $, %).",
            );
        }
        if self.password != self.confirm_password {
            fail("confirm_password", "Passwords do not match");
        }
        if !is_mobile_number(self.mobile.trim()) {
            fail("mobile", "Valid Mobile number is required");
        }
        if self.mobile.trim() == self.alternate_mobile.trim() {
            fail(
                "alternate_mobile",
                "Alternate Mobile Number should be different from Mobile Number",
            );
        }
        if self.address.trim().is_empty() {
            fail("address", "Address is required");
        }
        if self.security_question.trim().is_empty() {
            fail("security_question", "Security Question is required");
        }
        if self.security_answer.trim().is_empty() {
            fail("security_answer", "Security Answer is required");
        }
        errors
    }
}

/// RegisterRequest
///
/// Body of `POST /account/register`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub alternate_phone: String,
    pub address: String,
    pub role: String,
    pub security_question: String,
    pub security_answer: String,
}

impl From<RegisterForm> for RegisterRequest {
    fn from(form: RegisterForm) -> Self {
        let role = if form.role.trim().is_empty() {
            "USER".to_string()
        } else {
            form.role.trim().to_string()
        };
        Self {
            email: form.email.trim().to_string(),
            password: form.password,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            mobile: form.mobile.trim().to_string(),
            alternate_phone: form.alternate_mobile.trim().to_string(),
            address: form.address.trim().to_string(),
            role,
            security_question: form.security_question.trim().to_string(),
            security_answer: form.security_answer,
        }
    }
}

/// ResetPasswordRequest
///
/// Body of `POST /account/reset-password`. The form posts the same fields in
/// snake case; the service expects camel case.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all(serialize = "camelCase"))]
pub struct ResetPasswordRequest {
    pub email: String,
    pub security_question: String,
    pub security_answer: String,
    pub new_password: String,
}

/// UpdateUserRequest
///
/// Body of `PUT /account/update-user/{id}` and the update-details form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all(serialize = "camelCase"))]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub alternate_phone: String,
    pub address: String,
}

impl UpdateUserRequest {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            alternate_phone: profile.alternate_phone.clone().unwrap_or_default(),
            address: profile.address.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.first_name.trim().is_empty() {
            errors.push(FieldError {
                field: "first_name",
                message: "First Name is required",
            });
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError {
                field: "last_name",
                message: "Last Name is required",
            });
        }
        let phone = self.alternate_phone.trim();
        if !phone.is_empty() && !is_mobile_number(phone) {
            errors.push(FieldError {
                field: "alternate_phone",
                message: "Alternate phone must be 10 digits",
            });
        }
        errors
    }
}

/// CreatePlanForm
///
/// The admin "Create Plan" form. Numbers arrive as text and are parsed in
/// `CreatePlanRequest::try_from`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CreatePlanForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub duration: String,
    pub data_limit: String,
    pub sms_limit: String,
    pub talk_time_minutes: String,
    /// Comma separated feature list.
    pub features: String,
}

/// CreatePlanRequest
///
/// Body of `POST /plans` on the plan service.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration: u32,
    pub data_limit: u32,
    pub sms_limit: u32,
    pub talk_time_minutes: String,
    pub features: Vec<String>,
    pub active: bool,
}

impl TryFrom<CreatePlanForm> for CreatePlanRequest {
    type Error = Vec<FieldError>;

    fn try_from(form: CreatePlanForm) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        if form.name.trim().is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "Plan name is required",
            });
        }
        let price = form.price.trim().parse::<f64>().ok().filter(|p| *p > 0.0);
        if price.is_none() {
            errors.push(FieldError {
                field: "price",
                message: "Price must be a positive number",
            });
        }
        let mut whole = |field: &'static str, value: &str, message: &'static str| {
            let parsed = value.trim().parse::<u32>().ok();
            if parsed.is_none() {
                errors.push(FieldError { field, message });
            }
            parsed.unwrap_or_default()
        };
        let duration = whole("duration", &form.duration, "Duration must be a whole number of days");
        let data_limit = whole("data_limit", &form.data_limit, "Data limit must be a whole number");
        let sms_limit = whole("sms_limit", &form.sms_limit, "SMS limit must be a whole number");

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            price: price.unwrap_or_default(),
            duration,
            data_limit,
            sms_limit,
            talk_time_minutes: form.talk_time_minutes.trim().to_string(),
            features: form
                .features
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
            active: true,
        })
    }
}

/// CheckoutQuery
///
/// The plan being bought, carried from the "All Plans" tab to `/payment-checkout`.
/// Plan ids are opaque strings issued by the plan service.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CheckoutQuery {
    pub plan_id: Option<String>,
    pub amount: Option<f64>,
}

/// CheckoutForm
///
/// The confirmation form posted by the checkout page.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CheckoutForm {
    pub plan_id: String,
    pub amount: f64,
    pub payment_method: String,
}

/// SubscribeRequest
///
/// Body of `POST /user-plans/subscribe`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub user_id: i64,
    pub plan_id: String,
}

/// PaymentRequest
///
/// Body of `POST /payments/process`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub plan_id: String,
    pub user_id: i64,
    pub amount: f64,
    pub payment_method: String,
}

/// Accepts an id taken from a record or a URL segment when it is safe to place
/// inside a collaborator path: non-empty ASCII alphanumerics, `-` and `_` only.
pub fn resource_id(raw: &str) -> Option<&str> {
    let id = raw.trim();
    let safe = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    safe.then_some(id)
}

// --- Support Tickets ---

/// Priorities a customer can pick when raising a ticket.
pub const TICKET_PRIORITIES: [&str; 3] = ["LOW", "MEDIUM", "HIGH"];

/// Statuses an employee can move an assigned ticket to.
pub const TICKET_STATUSES: [&str; 3] = ["IN_PROGRESS", "RESOLVED", "CLOSED"];

/// TicketForm
///
/// The "Raise a Ticket" form on the user's Support Tickets tab.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TicketForm {
    pub title: String,
    pub description: String,
    pub priority: String,
}

/// TicketRequest
///
/// Body of `POST /support/tickets`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub user_id: i64,
}

impl TicketForm {
    /// Validates the form and binds it to the ticket's owner. A blank priority
    /// is raised as `HIGH`.
    pub fn into_request(self, user_id: i64) -> Result<TicketRequest, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError {
                field: "title",
                message: "Title is required",
            });
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError {
                field: "description",
                message: "Description is required",
            });
        }
        let priority = match self.priority.trim() {
            "" => "HIGH",
            given => given,
        };
        if !TICKET_PRIORITIES.contains(&priority) {
            errors.push(FieldError {
                field: "priority",
                message: "Priority must be LOW, MEDIUM or HIGH",
            });
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(TicketRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            priority: priority.to_string(),
            user_id,
        })
    }
}

/// AssignTicketForm
///
/// The employee picked in the admin's Ticket Management row.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AssignTicketForm {
    pub employee_id: String,
}

impl AssignTicketForm {
    pub fn employee_id(&self) -> Option<i64> {
        self.employee_id.trim().parse().ok().filter(|id| *id > 0)
    }
}

/// TicketStatusForm
///
/// The status picked in the employee's Assigned Tickets row.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TicketStatusForm {
    pub status: String,
}

impl TicketStatusForm {
    /// The chosen status when it is one an employee may set.
    pub fn status(&self) -> Option<&'static str> {
        let chosen = self.status.trim();
        TICKET_STATUSES.into_iter().find(|status| *status == chosen)
    }
}

/// TabQuery
///
/// `?tab=` on the dashboard. The raw value is kept so that a malformed index
/// falls back to the shell's default tab instead of rejecting the request.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TabQuery {
    #[serde(default)]
    pub tab: Option<String>,
}

impl TabQuery {
    /// The requested tab index, `None` when absent or not a non-negative integer.
    pub fn index(&self) -> Option<usize> {
        self.tab.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}
