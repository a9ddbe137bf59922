//! Input validation
//!
//! Every write path validates its input here before touching the database.
//! Failures are collected per field and returned as `Error::Validation`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, FieldErrors, Result};
use crate::models::{AccountUpdate, ContactInput, LeadUpdate, NewLead, RegisterInput};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_SCORE: u8 = 100;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Collects field errors, then converts them into a single result
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.error(field, message);
        }
    }

    pub fn required(&mut self, field: &str, value: &str) {
        self.check(!value.trim().is_empty(), field, "Required");
    }

    pub fn email(&mut self, field: &str, value: &str) {
        self.check(is_valid_email(value.trim()), field, "Invalid email address");
    }

    pub fn score(&mut self, field: &str, value: u8) {
        self.check(value <= MAX_SCORE, field, "Must be between 0 and 100");
    }

    pub fn value(&mut self, field: &str, value: f64) {
        self.check(
            value.is_finite() && value >= 0.0,
            field,
            "Must be a non-negative number",
        );
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

impl RegisterInput {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.check(
            self.name.trim().chars().count() >= MIN_NAME_LEN,
            "name",
            "Name must be at least 2 characters",
        );
        v.email("email", &self.email);
        v.check(
            self.password.chars().count() >= MIN_PASSWORD_LEN,
            "password",
            "Password must be at least 8 characters",
        );
        v.check(
            self.password == self.confirm_password,
            "confirmPassword",
            "Passwords don't match",
        );
        v.finish()
    }
}

impl AccountUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.check(
                name.trim().chars().count() >= MIN_NAME_LEN,
                "name",
                "Name must be at least 2 characters",
            );
        }
        if let Some(password) = &self.new_password {
            v.check(
                password.chars().count() >= MIN_PASSWORD_LEN,
                "newPassword",
                "Password must be at least 8 characters",
            );
            v.check(
                self.current_password.is_some(),
                "currentPassword",
                "Current password is required to set a new password",
            );
        }
        v.finish()
    }
}

impl ContactInput {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("firstName", &self.first_name);
        v.required("lastName", &self.last_name);
        v.email("email", &self.email);
        v.finish()
    }
}

impl NewLead {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.score("score", self.score);
        v.value("value", self.value);
        v.finish()
    }
}

impl LeadUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if let Some(score) = self.score {
            v.score("score", score);
        }
        if let Some(value) = self.value {
            v.value("value", value);
        }
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeadSource, LeadStatus};

    fn field_errors(result: Result<()>) -> FieldErrors {
        match result {
            Err(Error::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("demo@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("demo@example"));
        assert!(!is_valid_email("no at sign.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_register_collects_all_errors() {
        let input = RegisterInput {
            name: "J".to_string(),
            email: "bad".to_string(),
            password: "short".to_string(),
            confirm_password: "other".to_string(),
        };
        let errors = field_errors(input.validate());
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
        assert!(errors.contains_key("confirmPassword"));
    }

    #[test]
    fn test_register_valid() {
        let input = RegisterInput {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            password: "password1".to_string(),
            confirm_password: "password1".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_account_update_needs_current_password() {
        let update = AccountUpdate {
            new_password: Some("longenough".to_string()),
            ..Default::default()
        };
        let errors = field_errors(update.validate());
        assert!(errors.contains_key("currentPassword"));
    }

    #[test]
    fn test_contact_requires_names_and_email() {
        let errors = field_errors(ContactInput::default().validate());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_lead_rejects_bad_numbers() {
        let lead = NewLead {
            contact_id: 1,
            source: LeadSource::Website,
            status: LeadStatus::New,
            score: 101,
            value: f64::NAN,
            expected_close_date: None,
            tags: vec![],
        };
        let errors = field_errors(lead.validate());
        assert!(errors.contains_key("score"));
        assert!(errors.contains_key("value"));

        let update = LeadUpdate {
            value: Some(-1.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
