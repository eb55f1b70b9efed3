/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token (JWT) issuance and validation
/// - [`refresh_token`]: Opaque refresh tokens backed by the store
/// - [`credentials`]: `Authorization` header parsing
/// - [`api_key`]: Webhook API key verification
/// - [`middleware`]: Request authentication and the Axum middleware
/// - [`authorization`]: Resource ownership checks
///
/// # Example
///
/// ```
/// use chirpy_shared::auth::password::{hash_password, verify_password};
/// use chirpy_shared::auth::jwt::{default_session_ttl, issue_token, validate_token};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// let secret = "a-secret-of-at-least-thirty-two-bytes!";
/// let user_id = Uuid::new_v4();
/// let now = Utc::now();
/// let token = issue_token(user_id, secret, default_session_ttl(), now)?;
/// assert_eq!(validate_token(&token, secret, now)?, user_id);
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod jwt;
pub mod refresh_token;
pub mod credentials;
pub mod api_key;
pub mod middleware;
pub mod authorization;
