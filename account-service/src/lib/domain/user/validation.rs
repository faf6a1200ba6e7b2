//! Declarative field validation for sign-up and password-reset input.
//!
//! Rules are evaluated eagerly and never fail fast: every violated rule
//! contributes one entry to the aggregate [`ValidationError`] so the
//! caller sees all problems at once.

use std::fmt;

use crate::user::models::EmailAddress;
use crate::user::models::SignUpInput;
use crate::user::models::Username;

pub const PASSWORD_MIN_LENGTH: usize = 3;
pub const PASSWORD_MAX_LENGTH: usize = 50;
const NAME_MIN_LENGTH: usize = 2;
const NAME_MAX_LENGTH: usize = 50;

/// A single violated rule on a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Aggregate of every field violation found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.messages().join("; ");
        f.write_str(&joined)
    }
}

/// Sign-up fields after every rule passed, with the unique-field values
/// promoted to their value types.
#[derive(Debug)]
pub struct ValidatedSignUp {
    pub first_name: String,
    pub last_name: String,
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

/// Length-bounds rule over a required string field.
struct LengthRule {
    field: &'static str,
    min: usize,
    max: usize,
}

impl LengthRule {
    fn check(&self, value: &str) -> Option<FieldViolation> {
        let length = value.chars().count();
        if length < self.min {
            Some(FieldViolation::new(
                self.field,
                format!("{} must be at least {} characters", self.field, self.min),
            ))
        } else if length > self.max {
            Some(FieldViolation::new(
                self.field,
                format!("{} must be at most {} characters", self.field, self.max),
            ))
        } else {
            None
        }
    }
}

const FIRST_NAME_RULE: LengthRule = LengthRule {
    field: "first name",
    min: NAME_MIN_LENGTH,
    max: NAME_MAX_LENGTH,
};
const LAST_NAME_RULE: LengthRule = LengthRule {
    field: "last name",
    min: NAME_MIN_LENGTH,
    max: NAME_MAX_LENGTH,
};
const PASSWORD_RULE: LengthRule = LengthRule {
    field: "password",
    min: PASSWORD_MIN_LENGTH,
    max: PASSWORD_MAX_LENGTH,
};

/// Validate all sign-up fields, collecting every violation.
///
/// # Errors
/// * `ValidationError` - One or more fields violated their rules
pub fn validate_sign_up(input: SignUpInput) -> Result<ValidatedSignUp, ValidationError> {
    let mut violations = Vec::new();

    if let Some(v) = FIRST_NAME_RULE.check(&input.first_name) {
        violations.push(v);
    }
    if let Some(v) = LAST_NAME_RULE.check(&input.last_name) {
        violations.push(v);
    }

    let username = match Username::new(input.username) {
        Ok(username) => Some(username),
        Err(e) => {
            violations.push(FieldViolation::new("username", e.to_string()));
            None
        }
    };

    let email = match EmailAddress::new(input.email) {
        Ok(email) => Some(email),
        Err(e) => {
            violations.push(FieldViolation::new("email", e.to_string()));
            None
        }
    };

    if let Some(v) = PASSWORD_RULE.check(&input.password) {
        violations.push(v);
    }

    match (username, email) {
        (Some(username), Some(email)) if violations.is_empty() => Ok(ValidatedSignUp {
            first_name: input.first_name,
            last_name: input.last_name,
            username,
            email,
            password: input.password,
        }),
        _ => Err(ValidationError { violations }),
    }
}

/// Validate a replacement password on its own (password-reset flow).
///
/// # Errors
/// * `ValidationError` - Password violated its length rule
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    match PASSWORD_RULE.check(password) {
        None => Ok(()),
        Some(v) => Err(ValidationError {
            violations: vec![v],
        }),
    }
}
