/// In-memory adapter for the persistence port
///
/// Mirrors the PostgreSQL schema's constraints (unique email, foreign keys,
/// cascading user deletion) so handlers behave the same against either
/// adapter. All state sits behind one `RwLock`, which gives every call
/// serializable isolation: a completed revoke is visible to the next redeem.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    chirp::{Chirp, ChirpFilter, CreateChirp, SortOrder},
    refresh_token::{CreateRefreshToken, RefreshToken, RevocationOutcome},
    user::{CreateUser, UpdateCredentials, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // Insertion order doubles as the tie-breaker for equal timestamps
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Store that keeps every table in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.email_taken(&data.email, None) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let user = User::new(data, Utc::now());
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn update_user_credentials(
        &self,
        id: Uuid,
        data: UpdateCredentials,
    ) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;

        if tables.email_taken(&data.email, Some(id)) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        user.email = data.email;
        user.hashed_password = data.hashed_password;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn upgrade_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        match tables.users.get_mut(&id) {
            Some(user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_users(&self) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;

        let deleted = tables.users.len() as u64;
        tables.users.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();
        Ok(deleted)
    }

    async fn create_refresh_token(&self, data: CreateRefreshToken) -> StoreResult<RefreshToken> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.user_id) {
            return Err(StoreError::Conflict("refresh_tokens_user_id_fkey".to_string()));
        }
        if tables.refresh_tokens.contains_key(&data.token) {
            return Err(StoreError::Conflict("refresh_tokens_pkey".to_string()));
        }

        let record = RefreshToken::from_create(data);
        tables.refresh_tokens.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn find_refresh_token(&self, token: &str) -> StoreResult<Option<RefreshToken>> {
        let tables = self.tables.read().await;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<RevocationOutcome> {
        let mut tables = self.tables.write().await;

        let Some(record) = tables.refresh_tokens.get_mut(token) else {
            return Ok(RevocationOutcome::Unknown);
        };

        if record.revoked_at.is_some() {
            return Ok(RevocationOutcome::AlreadyRevoked);
        }

        record.revoked_at = Some(now);
        record.updated_at = now;
        Ok(RevocationOutcome::Revoked)
    }

    async fn create_chirp(&self, data: CreateChirp) -> StoreResult<Chirp> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.user_id) {
            return Err(StoreError::Conflict("chirps_user_id_fkey".to_string()));
        }

        let chirp = Chirp::new(data, Utc::now());
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn find_chirp(&self, id: Uuid) -> StoreResult<Option<Chirp>> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn list_chirps(&self, filter: ChirpFilter) -> StoreResult<Vec<Chirp>> {
        let tables = self.tables.read().await;

        let mut chirps: Vec<Chirp> = tables
            .chirps
            .iter()
            .filter(|c| filter.author_id.map_or(true, |author| c.user_id == author))
            .cloned()
            .collect();

        chirps.sort_by_key(|c| c.created_at);
        if filter.sort == SortOrder::Desc {
            chirps.reverse();
        }

        Ok(chirps)
    }

    async fn delete_chirp(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.chirps.len();
        tables.chirps.retain(|c| !(c.id == id && c.user_id == owner));
        Ok(tables.chirps.len() < before)
    }

    async fn find_chirp_owner(&self, id: Uuid) -> StoreResult<Option<Uuid>> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).map(|c| c.user_id))
    }
}
