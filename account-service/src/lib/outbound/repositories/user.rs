use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const SELECT_COLUMNS: &str =
    "id, first_name, last_name, username, email, password_hash, confirmed, role, created_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<User, UserError> {
        let id: Uuid = row
            .try_get("id")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let first_name: String = row
            .try_get("first_name")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let last_name: String = row
            .try_get("last_name")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let username: String = row
            .try_get("username")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let email: String = row
            .try_get("email")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let confirmed: bool = row
            .try_get("confirmed")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let role: String = row
            .try_get("role")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(User {
            id: UserId(id),
            first_name,
            last_name,
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password_hash,
            confirmed,
            role: Role::from_str(&role)?,
            created_at,
        })
    }

    fn map_unique_violation(e: sqlx::Error, user: &User) -> UserError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                if db_err.constraint() == Some("users_username_key") {
                    return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
                }
                if db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
        }
        UserError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, first_name, last_name, username, email, password_hash, confirmed, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.0)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.confirmed)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, &user))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = $1 OR email = $1",
            SELECT_COLUMNS
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, username = $4, email = $5,
                password_hash = $6, confirmed = $7, role = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.confirmed)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, &user))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
