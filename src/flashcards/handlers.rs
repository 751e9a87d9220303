//! Flashcards HTTP Handlers

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;

use super::service::FlashcardService;
use super::types::{
    Flashcard, FlashcardCreate, FlashcardGenerate, FlashcardListQuery, FlashcardUpdate,
    ReviewRequest, validate_difficulty,
};
use crate::auth::extract::AuthUser;
use crate::error::{Error, Result};
use crate::store::documents::Store;

pub async fn handle_create_flashcard(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Json(req): Json<FlashcardCreate>,
) -> Result<(StatusCode, Json<Flashcard>)> {
    let card = store.flashcards.insert(Flashcard::new(
        user.id,
        req.question,
        req.answer,
        req.image_url,
        req.deck_name,
        req.tags,
    ));

    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn handle_generate_flashcards(
    AuthUser(user): AuthUser,
    Extension(service): Extension<Arc<FlashcardService>>,
    Json(req): Json<FlashcardGenerate>,
) -> Result<(StatusCode, Json<Vec<Flashcard>>)> {
    let cards = service.generate(&user.id, req).await?;
    Ok((StatusCode::CREATED, Json(cards)))
}

pub async fn handle_list_flashcards(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Query(query): Query<FlashcardListQuery>,
) -> Json<Vec<Flashcard>> {
    let cards = match &query.deck {
        Some(deck) => store
            .flashcards
            .list_in_deck(&user.id, deck, query.skip, query.limit),
        None => store.flashcards.list(&user.id, query.skip, query.limit),
    };
    Json(cards)
}

pub async fn handle_list_decks(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
) -> Json<Vec<String>> {
    Json(store.flashcards.deck_names(&user.id))
}

pub async fn handle_get_flashcard(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(card_id): Path<String>,
) -> Result<Json<Flashcard>> {
    store
        .flashcards
        .get(&card_id, &user.id)
        .map(Json)
        .ok_or(Error::NotFound("flashcard"))
}

pub async fn handle_update_flashcard(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(card_id): Path<String>,
    Json(req): Json<FlashcardUpdate>,
) -> Result<Json<Flashcard>> {
    if let Some(difficulty) = req.difficulty {
        validate_difficulty(difficulty)?;
    }

    let updated = store.flashcards.update(&card_id, &user.id, |card| {
        if let Some(question) = req.question.clone() {
            card.question = question;
        }
        if let Some(answer) = req.answer.clone() {
            card.answer = answer;
        }
        if let Some(image_url) = req.image_url.clone() {
            card.image_url = Some(image_url);
        }
        if let Some(deck_name) = req.deck_name.clone() {
            card.deck_name = deck_name;
        }
        if let Some(tags) = req.tags.clone() {
            card.tags = tags;
        }
        if let Some(difficulty) = req.difficulty {
            card.difficulty = difficulty;
        }
        card.updated_at = Utc::now();
    });

    updated.map(Json).ok_or(Error::NotFound("flashcard"))
}

/// Records a review event: sets the reported difficulty, stamps
/// `last_reviewed`, and increments the monotonic review counter.
pub async fn handle_review_flashcard(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(card_id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<Flashcard>> {
    let difficulty = validate_difficulty(req.difficulty)?;

    let updated = store.flashcards.update(&card_id, &user.id, |card| {
        let now = Utc::now();
        card.last_reviewed = Some(now);
        card.difficulty = difficulty;
        card.review_count += 1;
        card.updated_at = now;
    });

    updated.map(Json).ok_or(Error::NotFound("flashcard"))
}

pub async fn handle_delete_flashcard(
    AuthUser(user): AuthUser,
    Extension(store): Extension<Arc<Store>>,
    Path(card_id): Path<String>,
) -> Result<StatusCode> {
    store
        .flashcards
        .delete(&card_id, &user.id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Error::NotFound("flashcard"))
}
