/// Database models for Chirpy
///
/// Each model carries its own SQL; the [`crate::store::postgres::PgStore`]
/// adapter exposes them through the persistence port.
///
/// # Models
///
/// - `user`: Accounts and their password hashes
/// - `chirp`: Short posts owned by a user
/// - `refresh_token`: Opaque long-lived session tokens

pub mod chirp;
pub mod refresh_token;
pub mod user;
