//! Authentication HTTP Handlers

use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{Value, json};
use std::sync::Arc;

use super::extract::AuthUser;
use super::service::AuthService;
use super::types::{
    LoginRequest, RefreshRequest, RegisterRequest, TokenKind, TokenResponse, UserOut,
};
use crate::error::Result;
use crate::store::documents::Store;

pub async fn handle_register(
    Extension(auth): Extension<Arc<AuthService>>,
    Extension(store): Extension<Arc<Store>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let user = auth.register(&store, &req.name, &req.email, &req.password)?;

    let response = TokenResponse {
        access_token: auth.issue_access_token(&user.id)?,
        refresh_token: auth.issue_refresh_token(&user.id)?,
        token_type: "bearer",
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_login(
    Extension(auth): Extension<Arc<AuthService>>,
    Extension(store): Extension<Arc<Store>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let user = auth.authenticate(&store, &req.email, &req.password)?;

    Ok(Json(TokenResponse {
        access_token: auth.issue_access_token(&user.id)?,
        refresh_token: auth.issue_refresh_token(&user.id)?,
        token_type: "bearer",
        user: user.into(),
    }))
}

pub async fn handle_me(AuthUser(user): AuthUser) -> Json<UserOut> {
    Json(user.into())
}

pub async fn handle_refresh(
    Extension(auth): Extension<Arc<AuthService>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<Value>> {
    let claims = auth.verify_token(&req.refresh_token, TokenKind::Refresh)?;
    let access_token = auth.issue_access_token(&claims.sub)?;

    Ok(Json(json!({
        "access_token": access_token,
        "token_type": "bearer",
    })))
}

/// Token-based auth has no server-side session; logout is handled by the
/// client dropping its tokens.
pub async fn handle_logout() -> Json<Value> {
    Json(json!({ "message": "successfully logged out" }))
}
