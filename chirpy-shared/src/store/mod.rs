/// Persistence port
///
/// The auth subsystem and the HTTP handlers never talk to a database
/// directly; they go through the [`Store`] trait. Two adapters exist:
///
/// - [`postgres::PgStore`]: production adapter over a sqlx `PgPool`
/// - [`memory::MemoryStore`]: in-process adapter for tests and local runs
///
/// Callers only distinguish "not found" and "conflict" from every other
/// failure. Timeouts and retries are the adapter's business; nothing above
/// this trait retries a call.
///
/// # Example
///
/// ```
/// use chirpy_shared::store::{memory::MemoryStore, Store};
/// use chirpy_shared::models::user::CreateUser;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store.create_user(CreateUser {
///     email: "user@example.com".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
/// }).await?;
///
/// assert!(store.find_user_by_id(user.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    chirp::{Chirp, ChirpFilter, CreateChirp},
    refresh_token::{CreateRefreshToken, RefreshToken, RevocationOutcome},
    user::{CreateUser, UpdateCredentials, User},
};

pub mod memory;
pub mod postgres;

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Record does not exist
    #[error("Record not found")]
    NotFound,

    /// Unique or foreign key constraint violated
    #[error("Constraint violation: {0}")]
    Conflict(String),

    /// Pool exhausted, closed, or the connection dropped
    #[error("Database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// Any other backend failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(constraint) = db_err.constraint() {
                return StoreError::Conflict(constraint.to_string());
            }
        }

        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            err @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
                StoreError::Unavailable(err)
            }
            other => StoreError::Database(other),
        }
    }
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence port consumed by the auth subsystem and the API handlers
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Creates a user; `Conflict` if the email is taken
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Replaces email and password hash; `None` if the user is gone
    async fn update_user_credentials(
        &self,
        id: Uuid,
        data: UpdateCredentials,
    ) -> StoreResult<Option<User>>;

    /// Sets `is_chirpy_red`; false if the user does not exist
    async fn upgrade_user(&self, id: Uuid) -> StoreResult<bool>;

    /// Deletes all users together with their chirps and refresh tokens
    async fn delete_all_users(&self) -> StoreResult<u64>;

    async fn create_refresh_token(&self, data: CreateRefreshToken) -> StoreResult<RefreshToken>;

    async fn find_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>>;

    /// Sets `revoked_at = now` unless already set
    async fn revoke_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<RevocationOutcome>;

    async fn create_chirp(&self, data: CreateChirp) -> StoreResult<Chirp>;

    async fn find_chirp(&self, id: Uuid) -> StoreResult<Option<Chirp>>;

    async fn list_chirps(&self, filter: ChirpFilter) -> StoreResult<Vec<Chirp>>;

    /// Deletes a chirp only if `owner` owns it; true if a chirp was removed
    async fn delete_chirp(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;

    /// Owner of a chirp, if the chirp exists
    async fn find_chirp_owner(&self, id: Uuid) -> StoreResult<Option<Uuid>>;
}
