/// Request authentication for Axum
///
/// Turns the `Authorization` header into an [`AuthContext`] or a uniform
/// 401. Callers never learn why a credential was rejected; the cause is
/// logged at `debug` level only.
///
/// # Request Extensions
///
/// After successful authentication, the JWT middleware adds an
/// `AuthContext` carrying the caller's user ID.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware, Extension};
/// use chirpy_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(handler))
///     .layer(middleware::from_fn(create_jwt_middleware("secret".to_string())));
/// ```

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::credentials::extract_bearer;
use super::jwt::validate_token;
use super::refresh_token::{redeem_refresh_token, RefreshTokenError};
use crate::store::{Store, StoreError};

/// Authenticated caller, added to request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
}

impl AuthContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing, malformed, expired, revoked, or forged credential
    #[error("Unauthorized")]
    Unauthorized,

    /// The store failed while looking up a credential
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized", "message": "Unauthorized" })),
            )
                .into_response(),
            AuthError::Store(e) => {
                tracing::error!(error = %e, "Store failure during authentication");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "internal_error",
                        "message": "An internal error occurred"
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Authenticates a request carrying a session token
///
/// Bearer extraction followed by signature, issuer, and expiry checks
/// against `now`.
pub fn authenticate_request(
    headers: &HeaderMap,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<AuthContext, AuthError> {
    let token = extract_bearer(headers).map_err(|e| {
        tracing::debug!(error = %e, "Bearer credential rejected");
        AuthError::Unauthorized
    })?;

    let user_id = validate_token(&token, secret, now).map_err(|e| {
        tracing::debug!(error = %e, "Session token rejected");
        AuthError::Unauthorized
    })?;

    Ok(AuthContext::new(user_id))
}

/// Authenticates a request carrying a refresh token
///
/// Returns the token's owner. Unknown, expired, and revoked tokens are all
/// `Unauthorized`; store failures surface as `AuthError::Store`.
pub async fn authenticate_refresh_request(
    store: &dyn Store,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Result<AuthContext, AuthError> {
    let token = extract_bearer(headers).map_err(|e| {
        tracing::debug!(error = %e, "Refresh credential rejected");
        AuthError::Unauthorized
    })?;

    match redeem_refresh_token(store, &token, now).await {
        Ok(user_id) => Ok(AuthContext::new(user_id)),
        Err(RefreshTokenError::Persistence(e)) => Err(AuthError::Store(e)),
        Err(e) => {
            tracing::debug!(error = %e, "Refresh token rejected");
            Err(AuthError::Unauthorized)
        }
    }
}

/// JWT authentication middleware
///
/// Validates the session token in `Authorization: Bearer <token>` and adds
/// an `AuthContext` to request extensions.
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing or malformed, or the
/// token is forged, expired, or issued by someone else.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate_request(req.headers(), &secret, Utc::now())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Helper function that takes ownership of the JWT secret and returns a
/// `'static` middleware function suitable for `route_layer`.
pub fn create_jwt_middleware(
    secret: String,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
