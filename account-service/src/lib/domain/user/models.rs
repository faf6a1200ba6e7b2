use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Lifecycle: created unconfirmed by sign-up, flips to confirmed when the
/// confirmation token is redeemed, and may finally be deleted by an admin.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub confirmed: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Derived display name: first name, space, last name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures the username is 2-50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub const MIN_LENGTH: usize = 2;
    pub const MAX_LENGTH: usize = 50;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 2 characters
    /// * `TooLong` - Username longer than 50 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            })
        } else {
            Ok(Self(username))
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates length bounds and email shape (RFC 5322 compliant parser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 50;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `TooShort` - Email shorter than 3 characters
    /// * `TooLong` - Email longer than 50 characters
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let length = email.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(EmailError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|_| EmailError::InvalidFormat)
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authorization role held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespace prefix distinguishing the two token families sharing the
/// ephemeral store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenNamespace {
    /// Account confirmation tokens.
    Confirm,
    /// Password reset tokens.
    Forgot,
}

impl TokenNamespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            TokenNamespace::Confirm => "confirm",
            TokenNamespace::Forgot => "forgot",
        }
    }
}

/// Raw sign-up fields as submitted by the caller.
///
/// Field-level validation happens in [`crate::user::validation`]; the
/// service only accepts these after the aggregate check passes.
#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_joins_first_and_last() {
        let user = User {
            id: UserId::new(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            username: Username::new("annlee".to_string()).unwrap(),
            email: EmailAddress::new("ann@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            confirmed: false,
            role: Role::User,
            created_at: Utc::now(),
        };

        assert_eq!(user.full_name(), "Ann Lee");
    }

    #[test]
    fn test_username_bounds() {
        assert!(Username::new("ab".to_string()).is_ok());
        assert!(matches!(
            Username::new("a".to_string()),
            Err(UsernameError::TooShort { .. })
        ));
        assert!(matches!(
            Username::new("x".repeat(51)),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_email_shape() {
        assert!(EmailAddress::new("ann@example.com".to_string()).is_ok());
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat)
        ));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "user");
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_id_from_malformed_string() {
        assert!(UserId::from_string("not-a-uuid").is_err());
    }
}
