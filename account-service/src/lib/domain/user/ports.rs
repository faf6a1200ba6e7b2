use std::time::Duration;

use async_trait::async_trait;

use crate::domain::user::models::SignUpInput;
use crate::domain::user::models::TokenNamespace;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::MailerError;
use crate::user::errors::SessionStoreError;
use crate::user::errors::TokenStoreError;
use crate::user::errors::UserError;

/// Port for the account orchestrations.
///
/// Denial-style results (`Option`/`bool`) deliberately carry no reason:
/// a failed sign-in looks the same whether the login was unknown, the
/// password wrong, or the account unconfirmed.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account in the unconfirmed state.
    ///
    /// Validates all fields (aggregate, non-fail-fast), hashes the
    /// password off the async path, stores the user, issues a
    /// confirmation token, and dispatches the confirmation link.
    ///
    /// # Errors
    /// * `Validation` - One or more fields violated their rules
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - Uniqueness conflict
    /// * `DatabaseError` / `TokenStore` - Store operation failed
    async fn sign_up(&self, input: SignUpInput) -> Result<User, UserError>;

    /// Authenticate by login (username or email) and password.
    ///
    /// # Returns
    /// The user on success; `None` for unknown login, wrong password,
    /// or unconfirmed account. The three cases are indistinguishable.
    async fn sign_in(&self, login: &str, password: &str) -> Result<Option<User>, UserError>;

    /// Redeem a confirmation token and mark its subject confirmed.
    ///
    /// # Returns
    /// False when the token is unknown, expired, or already consumed.
    async fn confirm_user(&self, token: &str) -> Result<bool, UserError>;

    /// Start the password-reset flow for an email address.
    ///
    /// Always succeeds; a reset link is dispatched only when the email
    /// belongs to an account (no enumeration leak).
    async fn forgot_password(&self, email: &str) -> Result<(), UserError>;

    /// Redeem a reset token and replace the subject's password.
    ///
    /// # Returns
    /// `None` when the token is unknown, expired, or already consumed;
    /// the updated user otherwise.
    ///
    /// # Errors
    /// * `Validation` - New password violated its rules (no mutation)
    async fn change_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Option<User>, UserError>;

    /// Delete an account by id. Malformed ids are a `false` result, not
    /// an error. Authorization is enforced by the inbound layer.
    async fn delete_user(&self, id: &str) -> Result<bool, UserError>;

    /// Retrieve a user by identifier.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve all users.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier (None if not found).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by login identifier: matches username or email.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address (None if not found).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all users from storage.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Returns
    /// Whether a record was actually removed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserError>;
}

/// Ephemeral single-use token store.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Store a fresh opaque token mapping to `user_id` under the given
    /// namespace, expiring after `ttl`.
    ///
    /// # Returns
    /// The generated token (to be embedded in a URL by the caller).
    async fn issue(
        &self,
        namespace: TokenNamespace,
        user_id: &UserId,
        ttl: Duration,
    ) -> Result<String, TokenStoreError>;

    /// Atomically look up and delete a token.
    ///
    /// Lookup and deletion are one step: under concurrent redemption of
    /// the same token exactly one caller observes the subject id, all
    /// others observe `None`. Expired entries behave as absent.
    async fn consume(
        &self,
        namespace: TokenNamespace,
        token: &str,
    ) -> Result<Option<UserId>, TokenStoreError>;
}

/// Server-side session records keyed by an opaque session id.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Create a session record for `user_id` expiring after `ttl`.
    ///
    /// # Returns
    /// The generated session id.
    async fn create(&self, user_id: &UserId, ttl: Duration) -> Result<String, SessionStoreError>;

    /// Resolve a session id to its user (None when absent or expired).
    /// Always re-reads the store; session state is never cached locally.
    async fn get(&self, session_id: &str) -> Result<Option<UserId>, SessionStoreError>;

    /// Remove a session record.
    ///
    /// # Returns
    /// Whether a record was actually removed.
    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError>;
}

/// Outbound notification delivery: a URL sent to an email address.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver `url` to `address`.
    ///
    /// # Errors
    /// * `Request` - Transport failure
    /// * `Rejected` - Delivery endpoint refused the message
    async fn send(&self, address: &str, url: &str) -> Result<(), MailerError>;
}
