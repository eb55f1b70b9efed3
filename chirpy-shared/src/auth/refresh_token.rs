/// Refresh token issuance, redemption, and revocation
///
/// A refresh token is 32 bytes from the operating system RNG, hex-encoded to
/// 64 characters. The token itself is the lookup key in the store; there is
/// no signature. A token is redeemable until 60 days after issuance or until
/// it is revoked, whichever comes first.
///
/// Redemption does not consume the token: the same refresh token can mint
/// any number of session tokens within its lifetime.
///
/// # Example
///
/// ```
/// use chirpy_shared::auth::refresh_token::{issue_refresh_token, redeem_refresh_token};
/// use chirpy_shared::models::user::CreateUser;
/// use chirpy_shared::store::{memory::MemoryStore, Store};
/// use chrono::Utc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store.create_user(CreateUser {
///     email: "user@example.com".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
/// }).await?;
///
/// let now = Utc::now();
/// let record = issue_refresh_token(&store, user.id, now).await?;
/// assert_eq!(redeem_refresh_token(&store, &record.token, now).await?, user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

use crate::models::refresh_token::{CreateRefreshToken, RefreshToken, RevocationOutcome};
use crate::store::{Store, StoreError};

/// Raw entropy per token
const REFRESH_TOKEN_BYTES: usize = 32;

/// Error type for refresh token operations
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    /// The system RNG failed
    #[error("Failed to gather entropy: {0}")]
    Entropy(String),

    /// No stored token matches
    #[error("Unknown refresh token")]
    Unknown,

    /// Token lifetime has elapsed
    #[error("Refresh token expired")]
    Expired,

    /// Token was revoked
    #[error("Refresh token revoked")]
    Revoked,

    /// Store failure, propagated unchanged
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Generates a fresh 64-character hex refresh token
pub fn generate_refresh_token() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RefreshTokenError::Entropy(e.to_string()))?;

    Ok(hex::encode(bytes))
}

/// Stores `token` for `owner`, expiring 60 days after `now`
pub async fn persist_refresh_token(
    store: &dyn Store,
    token: String,
    owner: Uuid,
    now: DateTime<Utc>,
) -> Result<RefreshToken, RefreshTokenError> {
    let record = store
        .create_refresh_token(CreateRefreshToken::new(token, owner, now))
        .await?;

    tracing::debug!(user_id = %owner, expires_at = %record.expires_at, "Refresh token stored");

    Ok(record)
}

/// Generates and stores a new refresh token for `owner`
pub async fn issue_refresh_token(
    store: &dyn Store,
    owner: Uuid,
    now: DateTime<Utc>,
) -> Result<RefreshToken, RefreshTokenError> {
    let token = generate_refresh_token()?;
    persist_refresh_token(store, token, owner, now).await
}

/// Resolves a refresh token to its owner
///
/// # Errors
///
/// - `Unknown` if no stored token matches exactly
/// - `Expired` if `now` has reached the token's expiry
/// - `Revoked` if the token was revoked
/// - `Persistence` if the store fails
pub async fn redeem_refresh_token(
    store: &dyn Store,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, RefreshTokenError> {
    let record = store
        .find_refresh_token(token)
        .await?
        .ok_or(RefreshTokenError::Unknown)?;

    if record.is_expired_at(now) {
        return Err(RefreshTokenError::Expired);
    }

    if record.is_revoked() {
        return Err(RefreshTokenError::Revoked);
    }

    Ok(record.user_id)
}

/// Revokes a refresh token
///
/// Idempotent: a second revocation leaves the first `revoked_at` in place.
pub async fn revoke_refresh_token(
    store: &dyn Store,
    token: &str,
    now: DateTime<Utc>,
) -> Result<RevocationOutcome, RefreshTokenError> {
    let outcome = store.revoke_refresh_token(token, now).await?;

    match outcome {
        RevocationOutcome::Revoked => tracing::info!("Refresh token revoked"),
        RevocationOutcome::AlreadyRevoked => tracing::debug!("Refresh token was already revoked"),
        RevocationOutcome::Unknown => tracing::debug!("Revocation requested for unknown token"),
    }

    Ok(outcome)
}
