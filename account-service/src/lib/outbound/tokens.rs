use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::user::models::TokenNamespace;
use crate::domain::user::models::UserId;
use crate::user::errors::TokenStoreError;
use crate::user::ports::TokenStore;

/// Generate an opaque identifier: 32 bytes from the OS CSPRNG,
/// URL-safe base64 without padding.
pub(crate) fn opaque_id() -> String {
    let mut buf = [0u8; 32];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// Redis-backed single-use token store.
///
/// Keys are `confirm:<token>` / `forgot:<token>`, values are the subject
/// user id, expiry is enforced by Redis TTL.
#[derive(Clone)]
pub struct RedisTokenStore {
    conn: ConnectionManager,
}

impl RedisTokenStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn key(namespace: TokenNamespace, token: &str) -> String {
        format!("{}:{}", namespace.prefix(), token)
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn issue(
        &self,
        namespace: TokenNamespace,
        user_id: &UserId,
        ttl: Duration,
    ) -> Result<String, TokenStoreError> {
        let token = opaque_id();
        let key = Self::key(namespace, &token);

        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, user_id.to_string(), ttl.as_secs())
            .await
            .map_err(|e| TokenStoreError::Backend(e.to_string()))?;

        Ok(token)
    }

    async fn consume(
        &self,
        namespace: TokenNamespace,
        token: &str,
    ) -> Result<Option<UserId>, TokenStoreError> {
        let key = Self::key(namespace, token);

        // GETDEL is the lookup and the deletion in one round trip, so two
        // concurrent redemptions of the same token cannot both succeed.
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| TokenStoreError::Backend(e.to_string()))?;

        match value {
            Some(raw) => UserId::from_string(&raw)
                .map(Some)
                .map_err(|e| TokenStoreError::Backend(format!("Corrupt token value: {}", e))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_ids_are_unique_and_url_safe() {
        let first = opaque_id();
        let second = opaque_id();

        assert_ne!(first, second);
        assert_eq!(first.len(), 43); // 32 bytes, base64 without padding
        assert!(first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_keys_are_namespaced() {
        assert_eq!(
            RedisTokenStore::key(TokenNamespace::Confirm, "abc"),
            "confirm:abc"
        );
        assert_eq!(
            RedisTokenStore::key(TokenNamespace::Forgot, "abc"),
            "forgot:abc"
        );
    }
}
