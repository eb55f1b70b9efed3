/// Webhook API key verification
///
/// The payment provider authenticates its webhook calls with a shared key
/// sent as `Authorization: ApiKey <key>`. Keys are compared as SHA-256
/// digests in constant time so response timing reveals nothing about how
/// much of a guessed key was right.
///
/// # Example
///
/// ```
/// use chirpy_shared::auth::api_key::{hash_api_key, verify_api_key};
///
/// let expected = hash_api_key("f271c81ff7084ee5b99a5091b42d486e");
/// assert!(verify_api_key("f271c81ff7084ee5b99a5091b42d486e", &expected));
/// assert!(!verify_api_key("wrong", &expected));
/// ```

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

use super::credentials::extract_api_key;
use super::middleware::AuthError;

/// Hex-encoded SHA-256 digest of an API key (64 characters)
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Checks a plaintext key against a stored digest
pub fn verify_api_key(key: &str, stored_hash: &str) -> bool {
    let computed_hash = hash_api_key(key);
    constant_time_compare(&computed_hash, stored_hash)
}

/// Constant-time string comparison
///
/// Length is not secret here: both sides are always 64-char digests.
///
/// ```
/// use chirpy_shared::auth::api_key::constant_time_compare;
///
/// assert!(constant_time_compare("hello", "hello"));
/// assert!(!constant_time_compare("hello", "world"));
/// ```
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Authenticates a webhook request against the configured key
///
/// Any extraction failure or mismatch is `AuthError::Unauthorized`.
pub fn authenticate_webhook(headers: &HeaderMap, expected_key: &str) -> Result<(), AuthError> {
    let supplied = extract_api_key(headers).map_err(|e| {
        tracing::debug!(error = %e, "Webhook credential rejected");
        AuthError::Unauthorized
    })?;

    if !verify_api_key(&supplied, &hash_api_key(expected_key)) {
        tracing::debug!("Webhook API key mismatch");
        return Err(AuthError::Unauthorized);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    const KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_hash_api_key() {
        let hash = hash_api_key(KEY);
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_api_key(KEY));
        assert_ne!(hash, hash_api_key("different"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_authenticate_webhook_accepts_matching_key() {
        let headers = headers_with(&format!("ApiKey {}", KEY));
        assert!(authenticate_webhook(&headers, KEY).is_ok());
    }

    #[test]
    fn test_authenticate_webhook_rejects_wrong_key() {
        let headers = headers_with("ApiKey nope");
        assert!(matches!(
            authenticate_webhook(&headers, KEY),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_authenticate_webhook_rejects_bearer() {
        let headers = headers_with(&format!("Bearer {}", KEY));
        assert!(matches!(
            authenticate_webhook(&headers, KEY),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_authenticate_webhook_rejects_missing_header() {
        assert!(matches!(
            authenticate_webhook(&HeaderMap::new(), KEY),
            Err(AuthError::Unauthorized)
        ));
    }
}
