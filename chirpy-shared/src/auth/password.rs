/// Password hashing module using Argon2id
///
/// Passwords are hashed with Argon2id into self-describing PHC strings, so the
/// salt and cost parameters travel with the digest and verification needs
/// nothing but the stored string.
///
/// Cost: m=64 MiB, t=3, p=4, 32-byte output. A hash takes tens of
/// milliseconds, so async callers run it on a blocking thread.
///
/// # Example
///
/// ```
/// use chirpy_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &hash));
/// assert!(!verify_password("wrong_password", &hash));
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password (bad cost parameters or RNG failure)
    #[error("Failed to hash password: {0}")]
    HashError(String),
}

/// Salt size in bytes before base64 encoding
const SALT_LEN: usize = 16;

/// Builds the Argon2id hasher with the configured cost parameters
fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password using Argon2id with a fresh random salt
///
/// Never fails because of the password content; any byte string (including
/// the empty string) hashes.
///
/// # Returns
///
/// PHC string format hash, e.g.
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if parameter setup or salt generation fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_with_rng(password, &mut OsRng)
}

/// Draws a salt from `rng`; an RNG failure is reported, not panicked on
fn generate_salt(rng: &mut impl RngCore) -> Result<SaltString, PasswordError> {
    let mut bytes = [0u8; SALT_LEN];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| PasswordError::HashError(format!("Salt generation failed: {}", e)))?;

    SaltString::encode_b64(&bytes)
        .map_err(|e| PasswordError::HashError(format!("Salt encoding failed: {}", e)))
}

fn hash_with_rng(password: &str, rng: &mut impl RngCore) -> Result<String, PasswordError> {
    let salt = generate_salt(rng)?;

    let password_hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// The comparison is constant-time. A wrong password and an unparseable
/// digest both return `false`; the caller cannot tell them apart.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            return false;
        }
    };

    // Parameters are embedded in the hash
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => true,
        Err(argon2::password_hash::Error::Password) => false,
        Err(e) => {
            tracing::warn!(error = %e, "Password verification failed");
            false
        }
    }
}
