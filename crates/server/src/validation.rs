//! Pure request validation for the auth endpoints.
//!
//! Runs synchronously at the boundary before any workflow; returns every
//! violation at once so clients see the full picture. The workflows may
//! assume a request that passed here has at least one contact method.

use crate::errors::FieldError;
use crate::routes::auth::{LoginRequest, RegisterRequest};

const MAX_NAME_LEN: usize = 100;

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn violation(field: &str, message: &str) -> FieldError {
    FieldError { field: field.to_string(), message: message.to_string() }
}

/// Loose email shape check: one `@` with non-empty local and domain parts,
/// no whitespace.
fn valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
}

/// E.164: `+`, a non-zero leading digit, 10 to 15 digits total.
fn valid_e164(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    (10..=15).contains(&digits.len())
        && !digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit())
}

fn valid_password(password: &str) -> Option<&'static str> {
    if password.len() < 8 {
        return Some("Password must be at least 8 characters");
    }
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Some("Password must contain at least one letter and one number");
    }
    None
}

fn check_name(violations: &mut Vec<FieldError>, field: &str, label: &str, value: &Option<String>) {
    if blank(value) {
        violations.push(violation(field, &format!("{label} is required")));
    } else if value.as_deref().map_or(0, |v| v.trim().chars().count()) > MAX_NAME_LEN {
        violations.push(violation(field, &format!("{label} must not exceed 100 characters")));
    }
}

pub fn validate_register(req: &RegisterRequest) -> Vec<FieldError> {
    let mut violations = Vec::new();

    let has_email = !blank(&req.email);
    let has_phone = !blank(&req.phone);
    if !has_email && !has_phone {
        violations.push(violation(
            "contact",
            "At least one contact method (email or phone) is required",
        ));
    }
    if has_email {
        if let Some(email) = req.email.as_deref() {
            if !valid_email(email.trim()) {
                violations.push(violation("email", "Invalid email format"));
            }
        }
    }
    if has_phone {
        if let Some(phone) = req.phone.as_deref() {
            if !valid_e164(phone.trim()) {
                violations.push(violation(
                    "phone",
                    "Phone must be in E.164 format (e.g., +14155552671)",
                ));
            }
        }
    }

    match req.password.as_deref() {
        None => violations.push(violation("password", "Password is required")),
        Some(p) if p.is_empty() => violations.push(violation("password", "Password is required")),
        Some(p) => {
            if let Some(msg) = valid_password(p) {
                violations.push(violation("password", msg));
            }
        }
    }

    check_name(&mut violations, "firstName", "First name", &req.first_name);
    check_name(&mut violations, "lastName", "Last name", &req.last_name);

    violations
}

pub fn validate_login(req: &LoginRequest) -> Vec<FieldError> {
    let mut violations = Vec::new();
    if blank(&req.identifier) {
        violations.push(violation("identifier", "Identifier (email or phone) is required"));
    }
    if blank(&req.password) {
        violations.push(violation("password", "Password is required"));
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_register() -> RegisterRequest {
        RegisterRequest {
            email: Some("john@x.com".into()),
            phone: None,
            password: Some("Password123".into()),
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
        }
    }

    #[test]
    fn valid_request_has_no_violations() {
        assert!(validate_register(&base_register()).is_empty());
    }

    // A draft with neither contact must be rejected before the workflow runs.
    #[test]
    fn missing_both_contacts_rejected() {
        let mut req = base_register();
        req.email = None;
        req.phone = Some("   ".into());
        let violations = validate_register(&req);
        assert!(violations.iter().any(|v| v.field == "contact"));
    }

    #[test]
    fn phone_only_is_acceptable() {
        let mut req = base_register();
        req.email = None;
        req.phone = Some("+14155552671".into());
        assert!(validate_register(&req).is_empty());
    }

    #[test]
    fn malformed_email_and_phone_flagged() {
        let mut req = base_register();
        req.email = Some("not-an-email".into());
        req.phone = Some("0123".into());
        let fields: Vec<_> = validate_register(&req).into_iter().map(|v| v.field).collect();
        assert!(fields.contains(&"email".to_string()));
        assert!(fields.contains(&"phone".to_string()));
    }

    #[test]
    fn weak_passwords_flagged() {
        let mut req = base_register();
        req.password = Some("short1".into());
        assert!(validate_register(&req).iter().any(|v| v.field == "password"));

        req.password = Some("allletters".into());
        assert!(validate_register(&req).iter().any(|v| v.field == "password"));

        req.password = Some("12345678".into());
        assert!(validate_register(&req).iter().any(|v| v.field == "password"));
    }

    #[test]
    fn blank_and_overlong_names_flagged() {
        let mut req = base_register();
        req.first_name = Some("  ".into());
        req.last_name = Some("x".repeat(101));
        let fields: Vec<_> = validate_register(&req).into_iter().map(|v| v.field).collect();
        assert!(fields.contains(&"firstName".to_string()));
        assert!(fields.contains(&"lastName".to_string()));
    }

    #[test]
    fn login_requires_both_fields() {
        let req = LoginRequest { identifier: None, password: Some("".into()) };
        let fields: Vec<_> = validate_login(&req).into_iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["identifier".to_string(), "password".to_string()]);
    }
}
