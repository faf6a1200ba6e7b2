use std::sync::Arc;
use std::time::Duration;

use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;

use crate::domain::user::models::UserId;
use crate::user::errors::SessionStoreError;
use crate::user::ports::SessionStore;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "qid";

/// Sessions are treated as durable rather than short-lived: the record
/// and the cookie both live ~7 years.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 7);

/// Cookie-backed session management over a [`SessionStore`].
///
/// The cookie carries only the opaque session id; the user id lives in
/// the server-side record and is re-read per request.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    secure_cookies: bool,
}

impl SessionManager {
    /// # Arguments
    /// * `store` - Server-side session record store
    /// * `secure_cookies` - Set the cookie `Secure` flag (production)
    pub fn new(store: Arc<dyn SessionStore>, secure_cookies: bool) -> Self {
        Self {
            store,
            secure_cookies,
        }
    }

    /// Create a session record for `user_id` and set the session cookie.
    pub async fn establish(
        &self,
        jar: CookieJar,
        user_id: &UserId,
    ) -> Result<CookieJar, SessionStoreError> {
        let session_id = self.store.create(user_id, SESSION_TTL).await?;

        let mut cookie = Cookie::new(SESSION_COOKIE, session_id);
        cookie.set_http_only(true);
        cookie.set_secure(self.secure_cookies);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_max_age(time::Duration::seconds(SESSION_TTL.as_secs() as i64));

        Ok(jar.add(cookie))
    }

    /// Invalidate the server-side record and instruct the client to drop
    /// the cookie. With no cookie present there is nothing to destroy and
    /// the call succeeds.
    ///
    /// # Errors
    /// * `Backend` - The store could not delete the record
    pub async fn destroy(&self, jar: CookieJar) -> Result<CookieJar, SessionStoreError> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(jar);
        };

        self.store.delete(cookie.value()).await?;

        let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
        Ok(jar.remove(removal))
    }

    /// Resolve the session cookie to the signed-in user id, if any.
    pub async fn current(&self, jar: &CookieJar) -> Result<Option<UserId>, SessionStoreError> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(None);
        };

        self.store.get(cookie.value()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::memory::MemorySessionStore;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MemorySessionStore::new()), false)
    }

    #[tokio::test]
    async fn test_establish_sets_httponly_cookie_and_resolves() {
        let manager = manager();
        let user_id = UserId::new();

        let jar = manager
            .establish(CookieJar::new(), &user_id)
            .await
            .expect("establish should succeed");

        let cookie = jar.get(SESSION_COOKIE).expect("cookie should be set");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));

        let resolved = manager.current(&jar).await.unwrap();
        assert_eq!(resolved, Some(user_id));
    }

    #[tokio::test]
    async fn test_destroy_invalidates_record() {
        let manager = manager();
        let user_id = UserId::new();

        let jar = manager.establish(CookieJar::new(), &user_id).await.unwrap();
        let session_id = jar.get(SESSION_COOKIE).unwrap().value().to_string();

        let jar = manager.destroy(jar).await.expect("destroy should succeed");

        // Record is gone even if a stale client re-sends the old id.
        let stale = CookieJar::new().add(Cookie::new(SESSION_COOKIE, session_id));
        assert_eq!(manager.current(&stale).await.unwrap(), None);
        assert!(manager.current(&jar).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_destroy_without_cookie_is_noop() {
        let manager = manager();
        assert!(manager.destroy(CookieJar::new()).await.is_ok());
    }
}
