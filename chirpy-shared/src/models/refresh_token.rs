/// Refresh token model and database operations
///
/// Refresh tokens are opaque random strings stored server-side. A row is
/// written once at issuance and afterwards only ever gains a `revoked_at`
/// timestamp.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE refresh_tokens (
///     token TEXT PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL,
///     revoked_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// How long a refresh token stays redeemable
pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 60;

/// Refresh token record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    /// 64-char hex token, also the primary key
    pub token: String,

    /// Owner identity
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,

    /// Set once, on first revocation
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Input for storing a refresh token
#[derive(Debug, Clone)]
pub struct CreateRefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CreateRefreshToken {
    /// Record for `token` issued at `now`, expiring 60 days later
    pub fn new(token: String, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            expires_at: now + Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
        }
    }
}

/// Result of a revocation request
///
/// Clients always see the same response; the distinction exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// The token was live (or expired) and is now revoked
    Revoked,

    /// The token had been revoked earlier; its `revoked_at` is unchanged
    AlreadyRevoked,

    /// No such token
    Unknown,
}

impl RefreshToken {
    /// Builds the stored record from creation input
    pub fn from_create(data: CreateRefreshToken) -> Self {
        Self {
            token: data.token,
            user_id: data.user_id,
            created_at: data.created_at,
            updated_at: data.created_at,
            expires_at: data.expires_at,
            revoked_at: None,
        }
    }

    /// True once `now` has reached `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Inserts a refresh token
    pub async fn create(pool: &PgPool, data: CreateRefreshToken) -> Result<Self, sqlx::Error> {
        let record = RefreshToken::from_create(data);

        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING token, user_id, created_at, updated_at, expires_at, revoked_at
            "#,
        )
        .bind(record.token)
        .bind(record.user_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.expires_at)
        .bind(record.revoked_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Finds a refresh token by exact token match
    pub async fn find(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Revokes a refresh token, keeping the first revocation time
    pub async fn revoke(
        pool: &PgPool,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RevocationOutcome, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $2, updated_at = $2
            WHERE token = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token)
        .bind(now)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(RevocationOutcome::Revoked);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM refresh_tokens WHERE token = $1)")
                .bind(token)
                .fetch_one(pool)
                .await?;

        Ok(if exists {
            RevocationOutcome::AlreadyRevoked
        } else {
            RevocationOutcome::Unknown
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_create_sets_sixty_day_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let data = CreateRefreshToken::new("abc".to_string(), Uuid::new_v4(), now);

        assert_eq!(data.expires_at, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let record = RefreshToken::from_create(CreateRefreshToken::new(
            "abc".to_string(),
            Uuid::new_v4(),
            now,
        ));

        assert!(!record.is_revoked());
        assert!(!record.is_expired_at(now + Duration::days(59)));
        assert!(record.is_expired_at(now + Duration::days(60)));
    }
}
