//! In-memory token and session stores.
//!
//! Drop-in substitutes for the Redis adapters, used by tests and local
//! runs without an ephemeral store. Consumption removes the entry under
//! one mutex acquisition, so the one-shot guarantee holds here too.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;

use super::tokens::opaque_id;
use crate::domain::user::models::TokenNamespace;
use crate::domain::user::models::UserId;
use crate::user::errors::SessionStoreError;
use crate::user::errors::TokenStoreError;
use crate::user::ports::SessionStore;
use crate::user::ports::TokenStore;

struct Entry {
    user_id: UserId,
    expires_at: Instant,
}

impl Entry {
    fn new(user_id: UserId, ttl: Duration) -> Self {
        Self {
            user_id,
            expires_at: Instant::now() + ttl,
        }
    }

    fn live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(namespace: TokenNamespace, token: &str) -> String {
        format!("{}:{}", namespace.prefix(), token)
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn issue(
        &self,
        namespace: TokenNamespace,
        user_id: &UserId,
        ttl: Duration,
    ) -> Result<String, TokenStoreError> {
        let token = opaque_id();

        let mut entries = self
            .entries
            .lock()
            .map_err(|e| TokenStoreError::Backend(e.to_string()))?;
        entries.insert(Self::key(namespace, &token), Entry::new(*user_id, ttl));

        Ok(token)
    }

    async fn consume(
        &self,
        namespace: TokenNamespace,
        token: &str,
    ) -> Result<Option<UserId>, TokenStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| TokenStoreError::Backend(e.to_string()))?;

        // Remove-then-inspect: expired entries are consumed but report
        // absent, matching a TTL'd key that silently disappeared.
        Ok(entries
            .remove(&Self::key(namespace, token))
            .filter(Entry::live)
            .map(|entry| entry.user_id))
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: &UserId, ttl: Duration) -> Result<String, SessionStoreError> {
        let session_id = opaque_id();

        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;
        entries.insert(session_id.clone(), Entry::new(*user_id, ttl));

        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<UserId>, SessionStoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;

        Ok(entries
            .get(session_id)
            .filter(|entry| entry.live())
            .map(|entry| entry.user_id))
    }

    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;

        Ok(entries.remove(session_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_token_round_trip() {
        let store = MemoryTokenStore::new();
        let user_id = UserId::new();

        let token = store
            .issue(TokenNamespace::Confirm, &user_id, Duration::from_secs(60))
            .await
            .unwrap();

        let consumed = store
            .consume(TokenNamespace::Confirm, &token)
            .await
            .unwrap();
        assert_eq!(consumed, Some(user_id));
    }

    #[tokio::test]
    async fn test_token_is_one_shot() {
        let store = MemoryTokenStore::new();
        let user_id = UserId::new();

        let token = store
            .issue(TokenNamespace::Confirm, &user_id, Duration::from_secs(60))
            .await
            .unwrap();

        assert!(store
            .consume(TokenNamespace::Confirm, &token)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .consume(TokenNamespace::Confirm, &token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_namespaces_do_not_collide() {
        let store = MemoryTokenStore::new();
        let user_id = UserId::new();

        let token = store
            .issue(TokenNamespace::Confirm, &user_id, Duration::from_secs(60))
            .await
            .unwrap();

        // A confirmation token is not redeemable as a reset token.
        assert!(store
            .consume(TokenNamespace::Forgot, &token)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .consume(TokenNamespace::Confirm, &token)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_expired_token_is_absent() {
        let store = MemoryTokenStore::new();
        let user_id = UserId::new();

        let token = store
            .issue(TokenNamespace::Forgot, &user_id, Duration::ZERO)
            .await
            .unwrap();

        assert!(store
            .consume(TokenNamespace::Forgot, &token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_concurrent_consumption_has_exactly_one_winner() {
        let store = Arc::new(MemoryTokenStore::new());
        let user_id = UserId::new();

        let token = store
            .issue(TokenNamespace::Confirm, &user_id, Duration::from_secs(60))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let token = token.clone();
            handles.push(tokio::spawn(async move {
                store
                    .consume(TokenNamespace::Confirm, &token)
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_session_delete_reports_outcome() {
        let store = MemorySessionStore::new();
        let user_id = UserId::new();

        let session_id = store
            .create(&user_id, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.get(&session_id).await.unwrap(), Some(user_id));
        assert!(store.delete(&session_id).await.unwrap());
        assert!(!store.delete(&session_id).await.unwrap());
        assert_eq!(store.get(&session_id).await.unwrap(), None);
    }
}
