//! Credential Handling
//!
//! Password hashing (Argon2id) and JWT issue/verify. `AuthService` holds the
//! signing keys and token lifetimes; it is constructed once at startup and
//! shared via an axum `Extension`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use regex::Regex;
use std::sync::Arc;

use super::types::{Claims, TokenKind, User};
use crate::error::{Error, Result};
use crate::store::documents::Store;

pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_minutes: i64,
    refresh_ttl_days: i64,
    email_pattern: Regex,
}

impl AuthService {
    pub fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_days: i64) -> Arc<Self> {
        Arc::new(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_minutes,
            refresh_ttl_days,
            email_pattern: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap(),
        })
    }

    /// Registers a new user: validates the email shape, rejects duplicate
    /// registrations, hashes the password.
    pub fn register(
        &self,
        store: &Store,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        if !self.email_pattern.is_match(email) {
            return Err(Error::Validation("invalid email format".to_string()));
        }

        if store.users.find_one(|u| u.email == email).is_some() {
            return Err(Error::BadRequest("email already registered".to_string()));
        }

        let password_hash = hash_password(password)?;
        let user = store
            .users
            .insert(User::new(name.to_string(), email.to_string(), password_hash));

        tracing::info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Verifies email + password. Wrong email and wrong password are
    /// indistinguishable to the caller.
    pub fn authenticate(&self, store: &Store, email: &str, password: &str) -> Result<User> {
        let user = store
            .users
            .find_one(|u| u.email == email)
            .ok_or(Error::Unauthorized)?;

        if !verify_password(password, &user.password_hash) {
            return Err(Error::Unauthorized);
        }

        Ok(user)
    }

    pub fn issue_access_token(&self, user_id: &str) -> Result<String> {
        self.issue(user_id, TokenKind::Access, Duration::minutes(self.access_ttl_minutes))
    }

    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String> {
        self.issue(user_id, TokenKind::Refresh, Duration::days(self.refresh_ttl_days))
    }

    fn issue(&self, user_id: &str, kind: TokenKind, ttl: Duration) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            kind,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| Error::Upstream(format!("token signing failed: {}", err)))
    }

    /// Decodes and verifies a token, checking it was issued as `expected`.
    pub fn verify_token(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
                .map_err(|_| Error::Unauthorized)?;

        if data.claims.kind != expected {
            return Err(Error::Unauthorized);
        }

        Ok(data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::Upstream(format!("password hashing failed: {}", err)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
