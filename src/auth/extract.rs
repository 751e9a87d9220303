//! Authenticated Caller Extraction
//!
//! [`AuthUser`] is an axum extractor: it reads the `Authorization: Bearer`
//! header, verifies the access token, and resolves the caller's user record.
//! Handlers that take an `AuthUser` argument can only be reached with a
//! valid credential; everything else gets a 401.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;

use super::service::AuthService;
use super::types::{TokenKind, User};
use crate::error::Error;
use crate::store::documents::Store;

/// The authenticated caller, resolved from the bearer token.
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<Arc<AuthService>>()
            .expect("AuthService extension not installed")
            .clone();
        let store = parts
            .extensions
            .get::<Arc<Store>>()
            .expect("Store extension not installed")
            .clone();

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(Error::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(Error::Unauthorized)?;
        let claims = auth.verify_token(token, TokenKind::Access)?;

        let user = store
            .users
            .find_one(|u| u.id == claims.sub)
            .ok_or(Error::Unauthorized)?;

        Ok(AuthUser(user))
    }
}
