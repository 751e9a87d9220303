//! Doubt Clarification HTTP Handlers

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

use super::service::DoubtService;
use super::types::{AskRequest, AskResponse, Conversation};
use crate::auth::extract::AuthUser;
use crate::error::{Error, Result};
use crate::notes::types::ListQuery;
use crate::store::documents::Store;

pub async fn handle_ask(
    AuthUser(user): AuthUser,
    Extension(service): Extension<Arc<DoubtService>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let response = service.ask(&user.id, req).await?;
    Ok(Json(response))
}

pub async fn handle_list_conversations(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Conversation>> {
    Json(store.conversations.list(&user.id, query.skip, query.limit))
}

pub async fn handle_get_conversation(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Conversation>> {
    store
        .conversations
        .get(&conversation_id, &user.id)
        .map(Json)
        .ok_or(Error::NotFound("conversation"))
}

pub async fn handle_delete_conversation(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(conversation_id): Path<String>,
) -> Result<StatusCode> {
    store
        .conversations
        .delete(&conversation_id, &user.id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Error::NotFound("conversation"))
}
