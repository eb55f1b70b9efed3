/// Session token codec
///
/// Session tokens are short-lived JWTs that assert a user's identity. They are
/// self-contained: validity is decided by the signature and the expiry claim
/// alone, nothing is persisted and a token cannot be revoked before it expires.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256), and only HS256. A token whose
///   header declares any other algorithm is rejected before its signature
///   is considered.
/// - **Expiration**: At most one hour. Expiry is exact: a token is dead at
///   `exp`, no clock-skew leeway is granted.
/// - **Issuer**: Always `"chirpy"`.
/// - **Secret**: Passed in on every call; there is no process-wide key.
///
/// # Example
///
/// ```
/// use chirpy_shared::auth::jwt::{default_session_ttl, issue_token, validate_token};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let now = Utc::now();
///
/// let token = issue_token(user_id, "your-secret-key", default_session_ttl(), now)?;
/// assert_eq!(validate_token(&token, "your-secret-key", now)?, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in every session token
pub const ISSUER: &str = "chirpy";

/// Longest lifetime a session token may be issued with (seconds)
pub const MAX_SESSION_TTL_SECONDS: i64 = 3600;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// The nil UUID cannot be the subject of a token
    #[error("Invalid identity: subject cannot be the nil UUID")]
    InvalidIdentity,

    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token header declares an algorithm other than HS256
    #[error("Token signed with an unexpected algorithm")]
    InvalidAlgorithm,

    /// Signature does not match
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Invalid issuer
    #[error("Invalid issuer: expected {}", ISSUER)]
    InvalidIssuer,

    /// Token could not be decoded or its subject is not an identity
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Default session lifetime (one hour)
pub fn default_session_ttl() -> Duration {
    Duration::seconds(MAX_SESSION_TTL_SECONDS)
}

/// Resolves the lifetime of a session token requested at login
///
/// Missing, non-positive, or over-long requests fall back to one hour.
///
/// ```
/// use chirpy_shared::auth::jwt::session_ttl;
/// use chrono::Duration;
///
/// assert_eq!(session_ttl(Some(60)), Duration::seconds(60));
/// assert_eq!(session_ttl(Some(7200)), Duration::hours(1));
/// assert_eq!(session_ttl(None), Duration::hours(1));
/// ```
pub fn session_ttl(requested_seconds: Option<i64>) -> Duration {
    match requested_seconds {
        Some(seconds) if seconds > 0 && seconds <= MAX_SESSION_TTL_SECONDS => {
            Duration::seconds(seconds)
        }
        _ => default_session_ttl(),
    }
}

/// JWT claims structure
///
/// - `iss`: Issuer (always "chirpy")
/// - `sub`: Subject (user ID, hyphenated UUID string)
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration (Unix timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `user_id` issued at `now`, valid for `ttl`
    pub fn new(user_id: Uuid, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the token is expired at `now` (expired exactly at `exp`)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Parses the subject back into a user ID
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        if self.sub.is_empty() {
            return Err(JwtError::Malformed("token subject is missing".to_string()));
        }

        let user_id = Uuid::parse_str(&self.sub)
            .map_err(|e| JwtError::Malformed(format!("invalid UUID in token subject: {}", e)))?;

        if user_id.is_nil() {
            return Err(JwtError::Malformed("token subject is the nil UUID".to_string()));
        }

        Ok(user_id)
    }
}

/// Signs a session token for `user_id`
///
/// # Errors
///
/// - `JwtError::InvalidIdentity` if `user_id` is the nil UUID
/// - `JwtError::CreateError` if encoding fails
pub fn issue_token(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, JwtError> {
    if user_id.is_nil() {
        return Err(JwtError::InvalidIdentity);
    }

    let claims = Claims::new(user_id, ttl, now);
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies signature, algorithm and issuer, and returns the claims
///
/// Expiry is NOT checked here; see [`validate_token`].
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    // Expiry is checked against the caller's clock with zero leeway
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::Malformed(e.to_string()),
    })?;

    Ok(token_data.claims)
}

/// Validates a session token and returns the user ID it asserts
///
/// # Errors
///
/// - `JwtError::InvalidAlgorithm` / `InvalidSignature` / `InvalidIssuer`
/// - `JwtError::Expired` if `now >= exp`
/// - `JwtError::Malformed` if the token or its subject cannot be decoded
pub fn validate_token(token: &str, secret: &str, now: DateTime<Utc>) -> Result<Uuid, JwtError> {
    let claims = decode_claims(token, secret)?;

    if claims.is_expired_at(now) {
        return Err(JwtError::Expired);
    }

    claims.user_id()
}
