/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Readiness and health check endpoints
/// - `users`: Registration and credential updates
/// - `auth`: Login, token refresh, and revocation
/// - `chirps`: Chirp create, list, read, delete
/// - `webhooks`: Payment provider callbacks
/// - `admin`: Hit counter and dev reset

pub mod health;
pub mod users;
pub mod auth;
pub mod chirps;
pub mod webhooks;
pub mod admin;

use crate::error::{ApiError, ApiResult};
use chirpy_shared::auth::password;

/// Argon2 is CPU-bound; keep it off the async workers
pub(crate) async fn hash_password(plain: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

pub(crate) async fn verify_password(plain: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))
}
