use thiserror::Error;

use crate::user::validation::ValidationError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username must be at least {min} characters")]
    TooShort { min: usize },

    #[error("username must be at most {max} characters")]
    TooLong { max: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("email must be at least {min} characters")]
    TooShort { min: usize },

    #[error("email must be at most {max} characters")]
    TooLong { max: usize },

    #[error("email must be a valid email")]
    InvalidFormat,
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Error for ephemeral token store operations
#[derive(Debug, Clone, Error)]
pub enum TokenStoreError {
    #[error("Token store error: {0}")]
    Backend(String),
}

/// Error for session store operations
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    #[error("Session store error: {0}")]
    Backend(String),
}

/// Error for notification dispatch operations
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Mail request failed: {0}")]
    Request(String),

    #[error("Mail delivery rejected with status {status}")]
    Rejected { status: u16 },
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Aggregate field validation, returned as a value to the caller
    #[error("{0}")]
    Validation(#[from] ValidationError),

    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    // Infrastructure errors
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),

    #[error(transparent)]
    SessionStore(#[from] SessionStoreError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}
