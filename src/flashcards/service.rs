//! Derivation Fan-out

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::types::{Flashcard, FlashcardGenerate};
use crate::capability::imagegen::ImageGenerator;
use crate::capability::textgen::TextGenerator;
use crate::error::{Error, Result};
use crate::store::documents::Store;

/// One question/answer pair as produced by the generation capability.
#[derive(Debug, Deserialize, PartialEq)]
pub struct GeneratedCard {
    pub question: String,
    pub answer: String,
}

/// Parses the raw generation output. Accepted shapes: a bare JSON array of
/// `{question, answer}` pairs, or an object wrapping that array under a
/// `flashcards` key. Anything else is malformed.
pub fn parse_generated_cards(raw: &str) -> Result<Vec<GeneratedCard>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| Error::MalformedGeneration(format!("not valid JSON: {}", err)))?;

    let array = match &value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match map.get("flashcards") {
            Some(Value::Array(items)) => items.clone(),
            _ => {
                return Err(Error::MalformedGeneration(
                    "object response missing a 'flashcards' array".to_string(),
                ));
            }
        },
        _ => {
            return Err(Error::MalformedGeneration(
                "response is neither an array nor a wrapping object".to_string(),
            ));
        }
    };

    array
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|err| Error::MalformedGeneration(format!("bad pair shape: {}", err)))
        })
        .collect()
}

pub struct FlashcardService {
    store: Arc<Store>,
    textgen: Arc<dyn TextGenerator>,
    imagegen: Arc<dyn ImageGenerator>,
}

impl FlashcardService {
    pub fn new(
        store: Arc<Store>,
        textgen: Arc<dyn TextGenerator>,
        imagegen: Arc<dyn ImageGenerator>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            textgen,
            imagegen,
        })
    }

    /// Generates and persists a batch of flashcards from text content,
    /// returning them in generation order.
    pub async fn generate(
        &self,
        user_id: &str,
        req: FlashcardGenerate,
    ) -> Result<Vec<Flashcard>> {
        let raw = self
            .textgen
            .generate_flashcards(&req.content, req.count)
            .await?;
        let pairs = parse_generated_cards(&raw)?;

        let mut created = Vec::with_capacity(pairs.len());
        for pair in pairs {
            // Image failure degrades to a null image, never aborts the
            // batch. This is the one local-recovery point in the system.
            let image_url = if req.generate_images {
                match self.imagegen.generate_for_concept(&pair.question).await {
                    Ok(url) => Some(url),
                    Err(err) => {
                        tracing::warn!(
                            "image generation failed for '{}', continuing without: {}",
                            pair.question,
                            err
                        );
                        None
                    }
                }
            } else {
                None
            };

            let card = Flashcard::new(
                user_id.to_string(),
                pair.question,
                pair.answer,
                image_url,
                req.deck_name.clone(),
                req.tags.clone(),
            );

            created.push(self.store.flashcards.insert(card));
        }

        tracing::info!(
            "Generated {} flashcards for user {} (deck '{}')",
            created.len(),
            user_id,
            req.deck_name
        );
        Ok(created)
    }
}
