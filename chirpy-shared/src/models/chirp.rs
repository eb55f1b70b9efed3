/// Chirp model and database operations
///
/// A chirp is a short post owned by exactly one user. The owner recorded in
/// `user_id` is the only identity allowed to delete it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE chirps (
///     id UUID PRIMARY KEY,
///     body TEXT NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Chirp model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,

    /// Moderated chirp text
    pub body: String,

    /// Owner of the chirp
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a chirp
#[derive(Debug, Clone)]
pub struct CreateChirp {
    /// Already validated and cleaned body
    pub body: String,
    pub user_id: Uuid,
}

/// Listing order by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses the `sort` query parameter; anything but "desc" is ascending
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Filter for listing chirps
#[derive(Debug, Clone, Copy, Default)]
pub struct ChirpFilter {
    /// Only chirps by this author
    pub author_id: Option<Uuid>,
    pub sort: SortOrder,
}

impl Chirp {
    /// Builds a fresh chirp record with a new random ID
    pub fn new(data: CreateChirp, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            body: data.body,
            user_id: data.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Inserts a new chirp
    pub async fn create(pool: &PgPool, data: CreateChirp) -> Result<Self, sqlx::Error> {
        let chirp = Chirp::new(data, Utc::now());

        let chirp = sqlx::query_as::<_, Chirp>(
            r#"
            INSERT INTO chirps (id, body, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, body, user_id, created_at, updated_at
            "#,
        )
        .bind(chirp.id)
        .bind(chirp.body)
        .bind(chirp.user_id)
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(chirp)
    }

    /// Finds a chirp by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let chirp = sqlx::query_as::<_, Chirp>(
            r#"
            SELECT id, body, user_id, created_at, updated_at
            FROM chirps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(chirp)
    }

    /// Returns only the owner of a chirp
    pub async fn find_owner(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM chirps WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(owner)
    }

    /// Lists chirps, optionally for one author, ordered by creation time
    pub async fn list(pool: &PgPool, filter: ChirpFilter) -> Result<Vec<Self>, sqlx::Error> {
        // Order direction comes from a closed enum, never from user input
        let query = format!(
            r#"
            SELECT id, body, user_id, created_at, updated_at
            FROM chirps
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at {}, id {}
            "#,
            filter.sort.as_sql(),
            filter.sort.as_sql()
        );

        let chirps = sqlx::query_as::<_, Chirp>(&query)
            .bind(filter.author_id)
            .fetch_all(pool)
            .await?;

        Ok(chirps)
    }

    /// Deletes a chirp if it belongs to `user_id`
    ///
    /// # Returns
    ///
    /// True if a row was deleted
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_from_query() {
        assert_eq!(SortOrder::from_query(None), SortOrder::Asc);
        assert_eq!(SortOrder::from_query(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_query(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_query(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::from_query(Some("sideways")), SortOrder::Asc);
    }

    #[test]
    fn test_new_chirp() {
        let owner = Uuid::new_v4();
        let chirp = Chirp::new(
            CreateChirp {
                body: "hello".to_string(),
                user_id: owner,
            },
            Utc::now(),
        );

        assert_eq!(chirp.user_id, owner);
        assert_eq!(chirp.created_at, chirp.updated_at);
    }
}
