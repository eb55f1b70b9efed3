//! # Chirpy API Server Library
//!
//! HTTP surface of Chirpy: accounts, sessions, chirps, the payment provider
//! webhook, and a small admin area.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Fileserver hit counter
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
