//! Flashcards Module Tests
//!
//! Covers the generation-output parser, the fan-out batch semantics
//! (count, per-card image degradation), the review bookkeeping, and the
//! wire shape of the card.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::capability::imagegen::ImageGenerator;
    use crate::capability::textgen::TextGenerator;
    use crate::error::{Error, Result};
    use crate::flashcards::service::{parse_generated_cards, FlashcardService, GeneratedCard};
    use crate::flashcards::types::{validate_difficulty, Flashcard, FlashcardGenerate};
    use crate::store::documents::Store;

    struct FakeTextGenerator;

    #[async_trait]
    impl TextGenerator for FakeTextGenerator {
        async fn generate_notes(&self, _text: &str) -> Result<String> {
            unreachable!("not used by fan-out")
        }

        async fn generate_flashcards(&self, _content: &str, count: u32) -> Result<String> {
            let pairs: Vec<serde_json::Value> = (0..count)
                .map(|i| {
                    serde_json::json!({
                        "question": format!("Q{}", i),
                        "answer": format!("A{}", i),
                    })
                })
                .collect();
            Ok(serde_json::json!({ "flashcards": pairs }).to_string())
        }

        async fn answer_question(&self, _question: &str, _context: &str) -> Result<String> {
            unreachable!("not used by fan-out")
        }
    }

    struct FakeImageGenerator {
        fail: bool,
    }

    #[async_trait]
    impl ImageGenerator for FakeImageGenerator {
        async fn generate_for_concept(&self, concept: &str) -> Result<String> {
            if self.fail {
                return Err(Error::Upstream("image model down".to_string()));
            }
            Ok(format!("https://images.example.com/{}", concept))
        }
    }

    fn generate_request(count: u32, generate_images: bool) -> FlashcardGenerate {
        FlashcardGenerate {
            content: "The mitochondria is the powerhouse of the cell.".to_string(),
            count,
            deck_name: "Biology".to_string(),
            tags: vec!["bio".to_string()],
            generate_images,
        }
    }

    // ============================================================
    // GENERATION OUTPUT PARSING
    // ============================================================

    #[test]
    fn test_parse_bare_array() {
        let cards =
            parse_generated_cards(r#"[{"question":"Q","answer":"A"}]"#).unwrap();
        assert_eq!(
            cards,
            vec![GeneratedCard {
                question: "Q".to_string(),
                answer: "A".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_wrapped_object() {
        let cards = parse_generated_cards(
            r#"{"flashcards":[{"question":"Q1","answer":"A1"},{"question":"Q2","answer":"A2"}]}"#,
        )
        .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].question, "Q2");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for raw in [
            "not json at all",
            r#""just a string""#,
            r#"{"cards":[]}"#,
            r#"[{"question":"Q"}]"#,
        ] {
            assert!(
                matches!(
                    parse_generated_cards(raw),
                    Err(Error::MalformedGeneration(_))
                ),
                "expected malformed for {}",
                raw
            );
        }
    }

    // ============================================================
    // FAN-OUT
    // ============================================================

    #[tokio::test]
    async fn test_generate_produces_requested_count() {
        let store = Store::new();
        let svc = FlashcardService::new(
            store.clone(),
            Arc::new(FakeTextGenerator),
            Arc::new(FakeImageGenerator { fail: false }),
        );

        let cards = svc.generate("user-1", generate_request(5, true)).await.unwrap();

        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].question, "Q0");
        assert_eq!(cards[4].answer, "A4");
        assert_eq!(cards[0].deck_name, "Biology");
        assert_eq!(cards[0].image_url.as_deref(), Some("https://images.example.com/Q0"));
        assert_eq!(store.flashcards.list("user-1", 0, 100).len(), 5);
    }

    #[tokio::test]
    async fn test_image_failure_degrades_without_aborting() {
        let store = Store::new();
        let svc = FlashcardService::new(
            store.clone(),
            Arc::new(FakeTextGenerator),
            Arc::new(FakeImageGenerator { fail: true }),
        );

        let cards = svc.generate("user-1", generate_request(3, true)).await.unwrap();

        // Every card survives; all end up without an image.
        assert_eq!(cards.len(), 3);
        assert!(cards.iter().all(|c| c.image_url.is_none()));
        assert_eq!(store.flashcards.list("user-1", 0, 100).len(), 3);
    }

    #[tokio::test]
    async fn test_images_skipped_when_not_requested() {
        let store = Store::new();
        let svc = FlashcardService::new(
            store,
            Arc::new(FakeTextGenerator),
            Arc::new(FakeImageGenerator { fail: false }),
        );

        let cards = svc.generate("user-1", generate_request(2, false)).await.unwrap();
        assert!(cards.iter().all(|c| c.image_url.is_none()));
    }

    // ============================================================
    // REVIEW AND VALIDATION
    // ============================================================

    #[test]
    fn test_difficulty_scale_bounds() {
        assert_eq!(validate_difficulty(0).unwrap(), 0);
        assert_eq!(validate_difficulty(5).unwrap(), 5);
        assert!(matches!(validate_difficulty(6), Err(Error::Validation(_))));
    }

    #[test]
    fn test_new_card_starts_unreviewed() {
        let card = Flashcard::new(
            "user-1".to_string(),
            "Q".to_string(),
            "A".to_string(),
            None,
            "Default".to_string(),
            vec![],
        );
        assert_eq!(card.review_count, 0);
        assert_eq!(card.difficulty, 0);
        assert!(card.last_reviewed.is_none());
    }

    #[test]
    fn test_card_serializes_image_url_even_when_absent() {
        let card = Flashcard::new(
            "user-1".to_string(),
            "Q".to_string(),
            "A".to_string(),
            None,
            "Default".to_string(),
            vec![],
        );

        let value = serde_json::to_value(&card).unwrap();
        // The key must be present with an explicit null, not omitted.
        assert!(value.as_object().unwrap().contains_key("image_url"));
        assert!(value["image_url"].is_null());
    }
}
