use lazy_static::lazy_static;
use regex::Regex;

use super::dto::{AuthRequest, LoginInput, RegisterInput};
use crate::error::ValidationErrors;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn required<'a>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &'a Option<String>,
) -> Option<&'a str> {
    match value.as_deref() {
        Some(v) => Some(v),
        None => {
            errors.push(field, "field required");
            None
        }
    }
}

fn check_len(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: Option<usize>,
) {
    let len = value.chars().count();
    match max {
        Some(max) if len < min || len > max => {
            errors.push(field, format!("length must be between {min} and {max}"))
        }
        None if len < min => errors.push(field, format!("length must be at least {min}")),
        _ => {}
    }
}

pub fn validate_register(req: &AuthRequest) -> Result<RegisterInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = required(&mut errors, "username", &req.username);
    if let Some(u) = username {
        check_len(&mut errors, "username", u, USERNAME_MIN, Some(USERNAME_MAX));
    }

    let email = required(&mut errors, "email", &req.email);
    if let Some(e) = email {
        if !is_valid_email(e) {
            errors.push("email", "not a valid email address");
        }
    }

    let password = required(&mut errors, "password", &req.password);
    if let Some(p) = password {
        check_len(&mut errors, "password", p, PASSWORD_MIN, None);
    }

    match (username, email, password) {
        (Some(username), Some(email), Some(password)) if errors.is_empty() => Ok(RegisterInput {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }),
        _ => Err(errors),
    }
}

pub fn validate_login(req: &AuthRequest) -> Result<LoginInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = required(&mut errors, "username", &req.username);
    if let Some(u) = username {
        check_len(&mut errors, "username", u, USERNAME_MIN, None);
    }

    let password = required(&mut errors, "password", &req.password);
    if let Some(p) = password {
        check_len(&mut errors, "password", p, PASSWORD_MIN, None);
    }

    match (username, password) {
        (Some(username), Some(password)) if errors.is_empty() => Ok(LoginInput {
            username: username.to_owned(),
            password: password.to_owned(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> AuthRequest {
        AuthRequest {
            action: Some("register".into()),
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("cat@kombat.io"));
        assert!(!is_valid_email("cat@kombat"));
        assert!(!is_valid_email("cat kombat@x.io"));
        assert!(!is_valid_email("@kombat.io"));
    }

    #[test]
    fn accepts_good_registration() {
        let input = validate_register(&register("tom", "tom@cats.io", "secret")).unwrap();
        assert_eq!(input.username, "tom");
        assert_eq!(input.email, "tom@cats.io");
    }

    #[test]
    fn username_bounds_count_characters() {
        assert!(validate_register(&register("ab", "a@b.cd", "secret")).is_err());
        assert!(validate_register(&register(&"x".repeat(51), "a@b.cd", "secret")).is_err());
        assert!(validate_register(&register(&"x".repeat(50), "a@b.cd", "secret")).is_ok());
        // three Cyrillic letters are six bytes but three characters
        assert!(validate_register(&register("кот", "a@b.cd", "secret")).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let errors = validate_register(&register("ab", "nope", "123")).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, ["username", "email", "password"]);
    }

    #[test]
    fn missing_fields_are_reported() {
        let errors = validate_login(&AuthRequest::default()).unwrap_err();
        assert_eq!(errors.to_string(), "username: field required; password: field required");
    }

    #[test]
    fn login_requires_minimum_lengths() {
        let req = AuthRequest {
            username: Some("tom".into()),
            password: Some("12345".into()),
            ..Default::default()
        };
        let errors = validate_login(&req).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["password"]);
    }
}
