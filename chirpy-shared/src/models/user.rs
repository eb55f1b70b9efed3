/// User model and database operations
///
/// A user is the identity every token and chirp refers back to. The `id` is
/// assigned once at creation and never changes.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     email TEXT NOT NULL UNIQUE,
///     hashed_password TEXT NOT NULL,
///     is_chirpy_red BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use chirpy_shared::models::user::{User, CreateUser};
/// use chirpy_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an account
///
/// The password hash is skipped when serializing so a `User` can never leak
/// it through a response body.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub hashed_password: String,

    /// Whether the user has paid for Chirpy Red
    pub is_chirpy_red: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub hashed_password: String,
}

/// New login credentials for an existing user
#[derive(Debug, Clone)]
pub struct UpdateCredentials {
    pub email: String,
    pub hashed_password: String,
}

impl User {
    /// Builds a fresh user record with a new random ID
    pub fn new(data: CreateUser, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: data.email,
            hashed_password: data.hashed_password,
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails if the email already exists (unique constraint violation) or the
    /// database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = User::new(data, Utc::now());

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, hashed_password, is_chirpy_red, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, hashed_password, is_chirpy_red, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.hashed_password)
        .bind(user.is_chirpy_red)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, is_chirpy_red, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (exact match)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, is_chirpy_red, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replaces a user's email and password hash
    ///
    /// # Returns
    ///
    /// The updated user, or `None` if no user has this ID
    pub async fn update_credentials(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCredentials,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, hashed_password = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, hashed_password, is_chirpy_red, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.email)
        .bind(data.hashed_password)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Marks a user as a Chirpy Red member
    ///
    /// # Returns
    ///
    /// True if the user exists (upgrading twice is not an error)
    pub async fn upgrade_to_red(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_chirpy_red = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every user
    ///
    /// ⚠️  **WARNING**: Cascades to all chirps and refresh tokens. Only the
    /// development reset endpoint calls this.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users").execute(pool).await?;

        Ok(result.rows_affected())
    }
}
