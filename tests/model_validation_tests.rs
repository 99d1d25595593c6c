use telecom_portal::models::{
    AssignTicketForm, CreatePlanForm, CreatePlanRequest, LoginForm, LoginRequest, RegisterForm,
    RegisterRequest, TabQuery, TicketForm, TicketStatusForm, UpdateUserRequest,
    is_strong_password, resource_id,
};

// --- Helpers ---

fn valid_registration() -> RegisterForm {
    RegisterForm {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        email: "asha@example.com".into(),
        password: "Secret@123".into(),
        confirm_password: "Secret@123".into(),
        mobile: "9876543210".into(),
        alternate_mobile: "9123456780".into(),
        address: "12 Lake Road".into(),
        role: String::new(),
        security_question: "First pet?".into(),
        security_answer: "Tommy".into(),
    }
}

fn failing_fields(form: &RegisterForm) -> Vec<&'static str> {
    form.validate().into_iter().map(|e| e.field).collect()
}

// --- Registration ---

#[test]
fn test_valid_registration_passes() {
    assert!(valid_registration().validate().is_empty());
}

#[test]
fn test_registration_reports_every_failing_field() {
    let form = RegisterForm::default();
    let fields = failing_fields(&form);
    for field in [
        "first_name",
        "last_name",
        "email",
        "password",
        "mobile",
        "address",
        "security_question",
        "security_answer",
    ] {
        assert!(fields.contains(&field), "{field} should fail");
    }
}

#[test]
fn test_registration_field_rules() {
    let cases: [(&str, fn(&mut RegisterForm)); 6] = [
        ("first_name", |f| f.first_name = "Asha2".into()),
        ("email", |f| f.email = "asha-at-example".into()),
        ("confirm_password", |f| f.confirm_password = "Secret@124".into()),
        ("mobile", |f| f.mobile = "98765".into()),
        ("alternate_mobile", |f| f.alternate_mobile = f.mobile.clone()),
        ("password", |f| {
            f.password = "secret123".into();
            f.confirm_password = "secret123".into();
        }),
    ];
    for (field, break_it) in cases {
        let mut form = valid_registration();
        break_it(&mut form);
        assert_eq!(failing_fields(&form), [field], "rule for {field}");
    }
}

#[test]
fn test_password_strength() {
    assert!(is_strong_password("Secret@123"));
    assert!(!is_strong_password("Sh@1t"));
    assert!(!is_strong_password("secret@123"));
    assert!(!is_strong_password("SECRET@123"));
    assert!(!is_strong_password("Secret1234"));
    assert!(!is_strong_password("Secret!123"));
}

#[test]
fn test_registration_defaults_to_user_role() {
    let request = RegisterRequest::from(valid_registration());
    assert_eq!(request.role, "USER");
    assert_eq!(request.alternate_phone, "9123456780");
}

// --- Login ---

#[test]
fn test_login_identifier_selects_email_or_mobile() {
    let by_email = LoginRequest::from(LoginForm {
        identifier: " asha@example.com ".into(),
        password: "pw".into(),
    });
    assert_eq!(by_email.email.as_deref(), Some("asha@example.com"));
    assert_eq!(by_email.mobile, None);

    let by_mobile = LoginRequest::from(LoginForm {
        identifier: "9876543210".into(),
        password: "pw".into(),
    });
    assert_eq!(by_mobile.mobile.as_deref(), Some("9876543210"));
    assert_eq!(by_mobile.email, None);
}

// --- Plans & Profile ---

#[test]
fn test_create_plan_parses_numbers_and_features() {
    let form = CreatePlanForm {
        name: " Gold ".into(),
        price: "499.5".into(),
        duration: "28".into(),
        data_limit: "2".into(),
        sms_limit: "100".into(),
        features: "5G, OTT,,".into(),
        ..CreatePlanForm::default()
    };
    let plan = CreatePlanRequest::try_from(form).unwrap();
    assert_eq!(plan.name, "Gold");
    assert_eq!(plan.price, 499.5);
    assert_eq!(plan.duration, 28);
    assert_eq!(plan.features, ["5G", "OTT"]);
    assert!(plan.active);
}

#[test]
fn test_create_plan_rejects_bad_numbers() {
    let form = CreatePlanForm {
        name: "Gold".into(),
        price: "-1".into(),
        duration: "four weeks".into(),
        data_limit: "2".into(),
        sms_limit: "100".into(),
        ..CreatePlanForm::default()
    };
    let errors = CreatePlanRequest::try_from(form).unwrap_err();
    let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, ["price", "duration"]);
}

#[test]
fn test_update_details_validation() {
    let mut request = UpdateUserRequest {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        alternate_phone: String::new(),
        address: String::new(),
    };
    assert!(request.validate().is_empty());

    request.alternate_phone = "123".into();
    assert_eq!(request.validate().len(), 1);
}

// --- Support Tickets ---

#[test]
fn test_ticket_form_defaults_to_high_priority() {
    let form = TicketForm {
        title: " No signal ".into(),
        description: "Since morning".into(),
        priority: String::new(),
    };
    let request = form.into_request(7).unwrap();
    assert_eq!(request.title, "No signal");
    assert_eq!(request.priority, "HIGH");
    assert_eq!(request.user_id, 7);
}

#[test]
fn test_ticket_form_rejects_missing_fields_and_unknown_priority() {
    let form = TicketForm {
        title: String::new(),
        description: "  ".into(),
        priority: "URGENT".into(),
    };
    let errors = form.into_request(7).unwrap_err();
    let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, ["title", "description", "priority"]);
}

#[test]
fn test_ticket_status_accepts_employee_statuses_only() {
    let status = |raw: &str| {
        TicketStatusForm {
            status: raw.into(),
        }
        .status()
    };
    assert_eq!(status("RESOLVED"), Some("RESOLVED"));
    assert_eq!(status(" CLOSED "), Some("CLOSED"));
    assert_eq!(status("NEW"), None);
    assert_eq!(status("resolved"), None);
}

#[test]
fn test_assignment_needs_a_positive_employee_id() {
    let id = |raw: &str| {
        AssignTicketForm {
            employee_id: raw.into(),
        }
        .employee_id()
    };
    assert_eq!(id("5"), Some(5));
    assert_eq!(id(""), None);
    assert_eq!(id("0"), None);
    assert_eq!(id("five"), None);
}

// --- Query Parsing ---

#[test]
fn test_tab_index_ignores_malformed_values() {
    let index = |raw: Option<&str>| {
        TabQuery {
            tab: raw.map(str::to_string),
        }
        .index()
    };
    assert_eq!(index(Some("2")), Some(2));
    assert_eq!(index(None), None);
    assert_eq!(index(Some("")), None);
    assert_eq!(index(Some("abc")), None);
    assert_eq!(index(Some("-1")), None);
}

#[test]
fn test_resource_ids_stay_inside_one_path_segment() {
    assert_eq!(resource_id(" 64f1c2 "), Some("64f1c2"));
    assert_eq!(resource_id("sub-1_a"), Some("sub-1_a"));
    assert_eq!(resource_id(""), None);
    assert_eq!(resource_id("../plans"), None);
    assert_eq!(resource_id("a/b"), None);
    assert_eq!(resource_id("1?x=2"), None);
}
