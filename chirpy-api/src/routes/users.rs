/// User endpoints
///
/// - `POST /api/users` - Register a new user
/// - `PUT /api/users` - Change the caller's own email and password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chirpy_shared::{
    auth::middleware::AuthContext,
    models::user::{CreateUser, UpdateCredentials, User},
};
use serde::Deserialize;
use validator::Validate;

/// Credentials request, shared by registration and update
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "04234" }
/// ```
///
/// # Response
///
/// `201 Created` with the user (never the password hash):
///
/// ```json
/// {
///   "id": "uuid",
///   "email": "user@example.com",
///   "is_chirpy_red": false,
///   "created_at": "...",
///   "updated_at": "..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Body is not valid JSON or misses a field
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(req) = payload?;
    req.validate()?;

    let hashed_password = super::hash_password(req.password).await?;

    let user = state
        .store
        .create_user(CreateUser {
            email: req.email,
            hashed_password,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Update the authenticated user's email and password
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token, or the account is gone
/// - `409 Conflict`: Email belongs to another user
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(req) = payload?;
    req.validate()?;

    let hashed_password = super::hash_password(req.password).await?;

    let user = state
        .store
        .update_user_credentials(
            auth.user_id,
            UpdateCredentials {
                email: req.email,
                hashed_password,
            },
        )
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    tracing::info!(user_id = %user.id, "User credentials updated");

    Ok(Json(user))
}
