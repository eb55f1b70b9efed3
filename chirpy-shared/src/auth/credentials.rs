/// Credential extraction from request headers
///
/// Both credential classes travel in the `Authorization` header and are told
/// apart by a case-sensitive scheme prefix:
///
/// - `Authorization: Bearer <token>` for session and refresh tokens
/// - `Authorization: ApiKey <key>` for the payment provider's webhook key
///
/// A validator asks for one [`CredentialKind`] and never accepts the other.

use axum::http::{header, HeaderMap};

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Which credential class a caller expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Bearer,
    ApiKey,
}

impl CredentialKind {
    fn prefix(self) -> &'static str {
        match self {
            CredentialKind::Bearer => BEARER_PREFIX,
            CredentialKind::ApiKey => API_KEY_PREFIX,
        }
    }
}

/// A credential pulled from the `Authorization` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
}

impl Credential {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::Bearer(_) => CredentialKind::Bearer,
            Credential::ApiKey(_) => CredentialKind::ApiKey,
        }
    }

    /// The credential value without its scheme
    pub fn into_inner(self) -> String {
        match self {
            Credential::Bearer(value) | Credential::ApiKey(value) => value,
        }
    }
}

/// Error type for credential extraction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// No `Authorization` header
    #[error("Authorization header missing")]
    Absent,

    /// Wrong scheme, non-ASCII header, or empty value
    #[error("Authorization header malformed")]
    Malformed,
}

/// Extracts a credential of the given kind from the `Authorization` header
///
/// # Errors
///
/// - `Absent` if the header is missing
/// - `Malformed` if the header is not visible ASCII, lacks the exact
///   prefix for `kind`, or is empty after trimming the prefix
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use chirpy_shared::auth::credentials::{extract_credential, Credential, CredentialKind};
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
///
/// let credential = extract_credential(&headers, CredentialKind::Bearer).unwrap();
/// assert_eq!(credential, Credential::Bearer("abc".to_string()));
/// assert!(extract_credential(&headers, CredentialKind::ApiKey).is_err());
/// ```
pub fn extract_credential(
    headers: &HeaderMap,
    kind: CredentialKind,
) -> Result<Credential, ExtractionError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ExtractionError::Absent)?
        .to_str()
        .map_err(|_| ExtractionError::Malformed)?;

    let remainder = value
        .strip_prefix(kind.prefix())
        .ok_or(ExtractionError::Malformed)?
        .trim();

    if remainder.is_empty() {
        return Err(ExtractionError::Malformed);
    }

    let remainder = remainder.to_string();
    Ok(match kind {
        CredentialKind::Bearer => Credential::Bearer(remainder),
        CredentialKind::ApiKey => Credential::ApiKey(remainder),
    })
}

/// Bearer token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, ExtractionError> {
    extract_credential(headers, CredentialKind::Bearer).map(Credential::into_inner)
}

/// API key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, ExtractionError> {
    extract_credential(headers, CredentialKind::ApiKey).map(Credential::into_inner)
}
