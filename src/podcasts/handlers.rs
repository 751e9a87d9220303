//! Podcasts HTTP Handlers

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{Value, json};
use std::sync::Arc;

use super::service::{PodcastService, available_voices};
use super::types::{Podcast, PodcastCreate, VoiceInfo};
use crate::auth::extract::AuthUser;
use crate::error::{Error, Result};
use crate::notes::types::ListQuery;
use crate::store::documents::Store;

pub async fn handle_generate_podcast(
    AuthUser(user): AuthUser,
    Extension(service): Extension<Arc<PodcastService>>,
    Json(req): Json<PodcastCreate>,
) -> Result<(StatusCode, Json<Podcast>)> {
    let podcast = service.generate(&user.id, req).await?;
    Ok((StatusCode::CREATED, Json(podcast)))
}

pub async fn handle_list_podcasts(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Podcast>> {
    Json(store.podcasts.list(&user.id, query.skip, query.limit))
}

pub async fn handle_get_podcast(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(podcast_id): Path<String>,
) -> Result<Json<Podcast>> {
    store
        .podcasts
        .get(&podcast_id, &user.id)
        .map(Json)
        .ok_or(Error::NotFound("podcast"))
}

/// Returns the stored audio reference for download. When the duration was
/// estimated rather than measured, the response says so.
pub async fn handle_download_podcast(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(podcast_id): Path<String>,
) -> Result<Json<Value>> {
    let podcast = store
        .podcasts
        .get(&podcast_id, &user.id)
        .ok_or(Error::NotFound("podcast"))?;

    Ok(Json(json!({
        "download_url": podcast.audio_url,
        "duration_seconds": podcast.duration_seconds,
        "duration_estimated": podcast.duration_estimated,
    })))
}

pub async fn handle_delete_podcast(
    AuthUser(user): AuthUser,
    Extension(service): Extension<Arc<PodcastService>>,
    Path(podcast_id): Path<String>,
) -> Result<StatusCode> {
    service.delete(&podcast_id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn handle_list_voices() -> Json<Vec<VoiceInfo>> {
    Json(available_voices())
}
