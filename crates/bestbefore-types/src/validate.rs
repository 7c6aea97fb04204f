//! Client-side input validation.
//!
//! Invalid input is rejected here, before any network call is made. The
//! messages are the exact strings surfaced inline in the UI.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$")
            .expect("email regex is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError("Please enter a valid email".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_non_empty(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("Please enter {field}")));
    }
    Ok(())
}

/// Both fields must be present before a login request is attempted.
pub fn validate_login_input(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError(
            "Please enter both email/nickname and password".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_plain_address() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
    }

    #[test]
    fn email_rejects_missing_domain() {
        assert!(!is_valid_email("user@"));
    }

    #[test]
    fn email_rejects_missing_at_sign() {
        assert!(!is_valid_email("user.example.com"));
    }

    #[test]
    fn email_rejects_empty() {
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_boundary_is_six_characters() {
        assert!(validate_password("abcdef").is_ok());
        assert!(validate_password("abcde").is_err());
    }

    #[test]
    fn login_input_requires_both_fields() {
        assert!(validate_login_input("", "secret").is_err());
        assert!(validate_login_input("user@example.com", "").is_err());
        assert!(validate_login_input("", "").is_err());
        assert!(validate_login_input("user@example.com", "secret").is_ok());
    }

    #[test]
    fn non_empty_message_names_the_field() {
        let err = validate_non_empty("  ", "a room name").unwrap_err();
        assert_eq!(err.0, "Please enter a room name");
    }
}
