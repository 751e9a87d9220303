//! Authentication Module
//!
//! Issues and verifies the bearer credentials every other route requires.
//!
//! ## Flow
//! 1. **Register/Login**: email + password exchanged for an access token
//!    (short-lived) and a refresh token (long-lived), both HS256 JWTs.
//! 2. **Request auth**: the [`AuthUser`] extractor pulls the bearer token
//!    from the `Authorization` header, verifies it, and loads the caller's
//!    user record. Handlers receive the caller as a typed argument.
//! 3. **Refresh**: a valid refresh token yields a fresh access token.
//!
//! Passwords are stored as Argon2id hashes, never in the clear.
//!
//! [`AuthUser`]: extract::AuthUser

pub mod extract;
pub mod handlers;
pub mod service;
pub mod types;
