//! Authentication Data Types
//!
//! The persisted `User` record plus the request/response DTOs for the auth
//! endpoints and the JWT claim set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::documents::{Document, new_id};

/// A registered user. The only entity not owned by another user; it owns
/// itself for the purposes of the `Document` contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string. Never serialized into API responses; handlers
    /// always answer with [`UserOut`].
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: new_id(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl Document for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.id
    }

    fn sort_timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Public projection of a user, safe to return to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserOut {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user: UserOut,
}

/// What kind of token a claim set was issued as. A refresh token is never
/// accepted where an access token is required, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user id the token was issued for.
    pub sub: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
    pub kind: TokenKind,
}
