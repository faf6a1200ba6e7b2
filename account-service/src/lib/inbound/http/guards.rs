//! Composable authorization guards.
//!
//! A handler that needs protection builds a [`GuardChain`] and runs it
//! against the resolved caller before its own body executes. Guards are
//! checked left-to-right; the first denial short-circuits the chain.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;

/// The caller's session-derived identity, if any.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user: Option<User>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn from_user(user: User) -> Self {
        Self { user: Some(user) }
    }
}

/// Guard denial, surfaced as an operation failure distinct from a
/// normal `false` result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not authorized")]
    NotAuthorized,
}

/// A single authorization predicate.
#[async_trait]
pub trait Guard: Send + Sync {
    async fn check(&self, caller: &Caller) -> Result<(), AccessDenied>;
}

/// Requires any signed-in user.
pub struct RequireAuthenticated;

#[async_trait]
impl Guard for RequireAuthenticated {
    async fn check(&self, caller: &Caller) -> Result<(), AccessDenied> {
        match caller.user {
            Some(_) => Ok(()),
            None => Err(AccessDenied::NotAuthenticated),
        }
    }
}

/// Requires the caller to hold a specific role.
pub struct RequireRole(pub Role);

#[async_trait]
impl Guard for RequireRole {
    async fn check(&self, caller: &Caller) -> Result<(), AccessDenied> {
        match &caller.user {
            Some(user) if user.role == self.0 => Ok(()),
            Some(_) => Err(AccessDenied::NotAuthorized),
            None => Err(AccessDenied::NotAuthenticated),
        }
    }
}

/// Ordered chain of guards with first-denial short-circuit.
#[derive(Default)]
pub struct GuardChain {
    guards: Vec<Box<dyn Guard>>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    pub fn with(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub async fn check(&self, caller: &Caller) -> Result<(), AccessDenied> {
        for guard in &self.guards {
            guard.check(caller).await?;
        }
        Ok(())
    }
}

/// The chain protecting admin-only operations.
pub fn admin_only() -> GuardChain {
    GuardChain::new()
        .with(RequireAuthenticated)
        .with(RequireRole(Role::Admin))
}
