use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::tokens::opaque_id;
use crate::domain::user::models::UserId;
use crate::user::errors::SessionStoreError;
use crate::user::ports::SessionStore;

const KEY_PREFIX: &str = "sess";

/// Redis-backed session records: `sess:<id> -> user id` with TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn key(session_id: &str) -> String {
        format!("{}:{}", KEY_PREFIX, session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: &UserId, ttl: Duration) -> Result<String, SessionStoreError> {
        let session_id = opaque_id();

        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(Self::key(&session_id), user_id.to_string(), ttl.as_secs())
            .await
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;

        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<UserId>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .get(Self::key(session_id))
            .await
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;

        match value {
            Some(raw) => UserId::from_string(&raw)
                .map(Some)
                .map_err(|e| SessionStoreError::Backend(format!("Corrupt session value: {}", e))),
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(Self::key(session_id))
            .await
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;

        Ok(removed > 0)
    }
}
