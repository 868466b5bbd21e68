//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the session service:
//! - Environment configuration helpers
//! - Cookie rendering and parsing
//! - Cryptographic utilities (HMAC-SHA256 signing, Base64url)
//! - Password hashing (Argon2id) for the bundled identity provider

pub mod config;
pub mod cookie;
pub mod crypto;
pub mod password;
