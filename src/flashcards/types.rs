//! Flashcard Data Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::documents::{Document, new_id};

/// Highest accepted difficulty on the 0–5 review scale (0 is easiest).
pub const MAX_DIFFICULTY: u8 = 5;

/// A question/answer card, optionally illustrated. `image_url` is always
/// present in the serialized form, null when no image was generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub user_id: String,
    pub question: String,
    pub answer: String,
    pub image_url: Option<String>,
    pub deck_name: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Incremented only by review events; never decreases.
    pub review_count: u32,
    pub difficulty: u8,
}

impl Flashcard {
    pub fn new(
        user_id: String,
        question: String,
        answer: String,
        image_url: Option<String>,
        deck_name: String,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id,
            question,
            answer,
            image_url,
            deck_name,
            tags,
            created_at: now,
            updated_at: now,
            last_reviewed: None,
            review_count: 0,
            difficulty: 0,
        }
    }
}

/// Rejects difficulties outside the 0–5 scale.
pub fn validate_difficulty(difficulty: u8) -> Result<u8> {
    if difficulty > MAX_DIFFICULTY {
        return Err(Error::Validation(format!(
            "difficulty must be between 0 and {}, got {}",
            MAX_DIFFICULTY, difficulty
        )));
    }
    Ok(difficulty)
}

impl Document for Flashcard {
    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn sort_timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn default_deck() -> String {
    "Default".to_string()
}

fn default_count() -> u32 {
    5
}

fn default_generate_images() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct FlashcardCreate {
    pub question: String,
    pub answer: String,
    pub image_url: Option<String>,
    #[serde(default = "default_deck")]
    pub deck_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlashcardUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub image_url: Option<String>,
    pub deck_name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub difficulty: Option<u8>,
}

/// Request for the AI-derived batch create.
#[derive(Debug, Deserialize)]
pub struct FlashcardGenerate {
    pub content: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_deck")]
    pub deck_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_generate_images")]
    pub generate_images: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub difficulty: u8,
}

#[derive(Debug, Deserialize)]
pub struct FlashcardListQuery {
    pub deck: Option<String>,
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_card_limit")]
    pub limit: usize,
}

fn default_card_limit() -> usize {
    100
}
