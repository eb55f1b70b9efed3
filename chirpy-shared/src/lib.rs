//! # Chirpy Shared Library
//!
//! This crate contains the domain types, persistence port, and the
//! authentication/session subsystem used by the Chirpy API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, session tokens, refresh tokens, credential
//!   extraction and the authorization guard
//! - `models`: Database models and data structures
//! - `store`: Persistence port and its PostgreSQL / in-memory implementations
//! - `db`: Connection pool and migrations
//! - `moderation`: Chirp body validation and profanity cleaning

pub mod auth;
pub mod db;
pub mod models;
pub mod moderation;
pub mod store;

/// Current version of the Chirpy shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
