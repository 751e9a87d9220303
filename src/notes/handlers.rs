//! Notes HTTP Handlers

use axum::extract::{Multipart, Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;

use super::service::{NoteService, parse_tags};
use super::types::{
    ListQuery, Note, NoteCreate, NoteFromUrl, NoteFromYoutube, NoteSource, NoteUpdate,
};
use crate::auth::extract::AuthUser;
use crate::error::{Error, Result};
use crate::store::documents::Store;

pub async fn handle_create_note(
    AuthUser(user): AuthUser,
    Extension(service): Extension<Arc<NoteService>>,
    Json(req): Json<NoteCreate>,
) -> Result<(StatusCode, Json<Note>)> {
    let note = service
        .ingest(
            &user.id,
            NoteSource::Manual {
                content: req.content,
            },
            Some(req.title),
            req.tags,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn handle_create_from_pdf(
    AuthUser(user): AuthUser,
    Extension(service): Extension<Arc<NoteService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Note>)> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut file_name = "document.pdf".to_string();
    let mut title: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| Error::Validation(format!("unreadable multipart body: {}", err)))?
    {
        match field.name() {
            Some("file") => {
                if let Some(name) = field.file_name() {
                    file_name = name.to_string();
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| Error::Validation(format!("unreadable file field: {}", err)))?;
                bytes = Some(data.to_vec());
            }
            Some("title") => {
                let value = field.text().await.unwrap_or_default();
                if !value.is_empty() {
                    title = Some(value);
                }
            }
            Some("tags") => {
                tags = parse_tags(&field.text().await.unwrap_or_default());
            }
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| Error::Validation("missing 'file' field".to_string()))?;

    let note = service
        .ingest(&user.id, NoteSource::Pdf { bytes, file_name }, title, tags)
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn handle_create_from_youtube(
    AuthUser(user): AuthUser,
    Extension(service): Extension<Arc<NoteService>>,
    Json(req): Json<NoteFromYoutube>,
) -> Result<(StatusCode, Json<Note>)> {
    let note = service
        .ingest(
            &user.id,
            NoteSource::Youtube {
                url: req.youtube_url,
            },
            req.title,
            req.tags,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn handle_create_from_url(
    AuthUser(user): AuthUser,
    Extension(service): Extension<Arc<NoteService>>,
    Json(req): Json<NoteFromUrl>,
) -> Result<(StatusCode, Json<Note>)> {
    let note = service
        .ingest(
            &user.id,
            NoteSource::Url { url: req.url },
            req.title,
            req.tags,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn handle_list_notes(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Note>> {
    Json(store.notes.list(&user.id, query.skip, query.limit))
}

pub async fn handle_get_note(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(note_id): Path<String>,
) -> Result<Json<Note>> {
    store
        .notes
        .get(&note_id, &user.id)
        .map(Json)
        .ok_or(Error::NotFound("note"))
}

pub async fn handle_update_note(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(note_id): Path<String>,
    Json(req): Json<NoteUpdate>,
) -> Result<Json<Note>> {
    let updated = store.notes.update(&note_id, &user.id, |note| {
        if let Some(title) = req.title.clone() {
            note.title = title;
        }
        if let Some(content) = req.content.clone() {
            note.content = content;
        }
        if let Some(tags) = req.tags.clone() {
            note.tags = tags;
        }
        note.updated_at = Utc::now();
    });

    updated.map(Json).ok_or(Error::NotFound("note"))
}

pub async fn handle_delete_note(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(note_id): Path<String>,
) -> Result<StatusCode> {
    store
        .notes
        .delete(&note_id, &user.id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Error::NotFound("note"))
}
