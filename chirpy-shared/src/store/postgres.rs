/// PostgreSQL adapter for the persistence port
///
/// Thin delegation to the model methods; every `sqlx::Error` is converted to
/// a [`StoreError`] on the way out.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    chirp::{Chirp, ChirpFilter, CreateChirp},
    refresh_token::{CreateRefreshToken, RefreshToken, RevocationOutcome},
    user::{CreateUser, UpdateCredentials, User},
};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool (for migrations and shutdown)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn update_user_credentials(
        &self,
        id: Uuid,
        data: UpdateCredentials,
    ) -> StoreResult<Option<User>> {
        Ok(User::update_credentials(&self.pool, id, data).await?)
    }

    async fn upgrade_user(&self, id: Uuid) -> StoreResult<bool> {
        Ok(User::upgrade_to_red(&self.pool, id).await?)
    }

    async fn delete_all_users(&self) -> StoreResult<u64> {
        Ok(User::delete_all(&self.pool).await?)
    }

    async fn create_refresh_token(&self, data: CreateRefreshToken) -> StoreResult<RefreshToken> {
        Ok(RefreshToken::create(&self.pool, data).await?)
    }

    async fn find_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>> {
        Ok(RefreshToken::find(&self.pool, token).await?)
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<RevocationOutcome> {
        Ok(RefreshToken::revoke(&self.pool, token, now).await?)
    }

    async fn create_chirp(&self, data: CreateChirp) -> StoreResult<Chirp> {
        Ok(Chirp::create(&self.pool, data).await?)
    }

    async fn find_chirp(&self, id: Uuid) -> StoreResult<Option<Chirp>> {
        Ok(Chirp::find_by_id(&self.pool, id).await?)
    }

    async fn list_chirps(&self, filter: ChirpFilter) -> StoreResult<Vec<Chirp>> {
        Ok(Chirp::list(&self.pool, filter).await?)
    }

    async fn delete_chirp(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        Ok(Chirp::delete(&self.pool, id, owner).await?)
    }

    async fn find_chirp_owner(&self, id: Uuid) -> StoreResult<Option<Uuid>> {
        Ok(Chirp::find_owner(&self.pool, id).await?)
    }
}
