//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tg_core::domain::entities::user::User;
use tg_core::errors::DomainError;
use tg_core::repositories::UserRepository;
use tg_shared::utils::email::normalize_email;

use super::{is_unique_violation, store_error};

/// MySQL implementation of UserRepository
///
/// Emails are stored normalised, so lookups compare against the normalised
/// form of the input.
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| store_error("Failed to get id", e))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            email: row
                .try_get("email")
                .map_err(|e| store_error("Failed to get email", e))?,
            first_name: row
                .try_get("first_name")
                .map_err(|e| store_error("Failed to get first_name", e))?,
            last_name: row
                .try_get("last_name")
                .map_err(|e| store_error("Failed to get last_name", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| store_error("Failed to get password_hash", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| store_error("Failed to get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| store_error("Failed to get updated_at", e))?,
        })
    }
}

const SELECT_USER: &str = r#"
    SELECT id, email, first_name, last_name, password_hash, created_at, updated_at
    FROM users
"#;

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE email = ? LIMIT 1", SELECT_USER);

        let row = sqlx::query(&query)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find user by email", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_USER);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find user by id", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn create(&self, mut user: User) -> Result<User, DomainError> {
        user.email = normalize_email(&user.email);

        sqlx::query(
            r#"
            INSERT INTO users (id, email, first_name, last_name, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Validation {
                    message: "Email already registered".to_string(),
                }
            } else {
                store_error("Failed to create user", e)
            }
        })?;

        Ok(user)
    }
}
