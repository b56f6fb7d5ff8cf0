//! MySQL implementation of the UserRepository trait.
//!
//! Emails are stored lowercased; uniqueness is enforced by the
//! `uq_users_email` index and surfaced as a conflict.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use nexo_core::domain::entities::{Role, User, UserFilter};
use nexo_core::errors::DomainError;
use nexo_core::repositories::UserRepository;

use super::rows::{contains_pattern, db_error, get, get_uuid, is_unique_violation};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, phone, phone_country, \
                            avatar_url, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let role: String = get(row, "role")?;
        let role = role.parse::<Role>().map_err(DomainError::internal)?;

        Ok(User {
            id: get_uuid(row, "id")?,
            name: get(row, "name")?,
            email: get(row, "email")?,
            password_hash: get(row, "password_hash")?,
            role,
            phone: get(row, "phone")?,
            phone_country: get(row, "phone_country")?,
            avatar_url: get(row, "avatar_url")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }

    fn email_conflict(email: &str) -> DomainError {
        DomainError::Conflict {
            message: format!("User with email \"{}\" already exists", email),
        }
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = ? LIMIT 1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email.trim().to_lowercase()).await
    }

    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM users WHERE 1 = 1", USER_COLUMNS));

        if let Some(role) = filter.role {
            builder.push(" AND role = ").push_bind(role.as_str());
        }
        if let Some(term) = &filter.search {
            let pattern = contains_pattern(term);
            builder
                .push(" AND (LOWER(name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(email) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list users", e))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, name, email, password_hash, role,
                phone, phone_country, avatar_url,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.phone)
            .bind(&user.phone_country)
            .bind(&user.avatar_url)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Self::email_conflict(&user.email)
                } else {
                    db_error("Failed to create user", e)
                }
            })?;

        tracing::debug!(user_id = %user.id, "User row inserted");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users SET
                name = ?,
                email = ?,
                password_hash = ?,
                role = ?,
                phone = ?,
                phone_country = ?,
                avatar_url = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.phone)
            .bind(&user.phone_country)
            .bind(&user.avatar_url)
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Self::email_conflict(&user.email)
                } else {
                    db_error("Failed to update user", e)
                }
            })?;

        // MySQL reports zero affected rows for unchanged values too
        if result.rows_affected() == 0 && self.find_by_id(user.id).await?.is_none() {
            return Err(DomainError::not_found("User", user.id));
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check email", e))?;

        Ok(count > 0)
    }
}
