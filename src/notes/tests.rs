//! Notes Module Tests
//!
//! Exercises the ingestion pipeline end to end against fake providers:
//! manual notes bypass generation, extracted sources run through it, and
//! a failing stage persists nothing.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::capability::extractors::SourceExtractor;
    use crate::capability::textgen::TextGenerator;
    use crate::error::{Error, Result};
    use crate::notes::service::{parse_tags, NoteService};
    use crate::notes::types::{Note, NoteSource, SourceType};
    use crate::store::documents::Store;

    struct FakeExtractor {
        fail: bool,
    }

    #[async_trait]
    impl SourceExtractor for FakeExtractor {
        async fn pdf(&self, _bytes: &[u8]) -> Result<String> {
            if self.fail {
                return Err(Error::Upstream("pdf extraction failed".to_string()));
            }
            Ok("extracted pdf text".to_string())
        }

        async fn youtube(&self, _url: &str) -> Result<(String, String)> {
            if self.fail {
                return Err(Error::Upstream("no captions".to_string()));
            }
            Ok(("extracted transcript".to_string(), "Intro to Rust".to_string()))
        }

        async fn web_page(&self, _url: &str) -> Result<String> {
            if self.fail {
                return Err(Error::Upstream("fetch failed".to_string()));
            }
            Ok("extracted page text".to_string())
        }
    }

    struct FakeTextGenerator {
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for FakeTextGenerator {
        async fn generate_notes(&self, text: &str) -> Result<String> {
            if self.fail {
                return Err(Error::Upstream("model unavailable".to_string()));
            }
            Ok(format!("notes for: {}", text))
        }

        async fn generate_flashcards(&self, _content: &str, _count: u32) -> Result<String> {
            unreachable!("not used by ingestion")
        }

        async fn answer_question(&self, _question: &str, _context: &str) -> Result<String> {
            unreachable!("not used by ingestion")
        }
    }

    fn service(
        store: Arc<Store>,
        extractor_fails: bool,
        textgen_fails: bool,
    ) -> Arc<NoteService> {
        NoteService::new(
            store,
            Arc::new(FakeExtractor {
                fail: extractor_fails,
            }),
            Arc::new(FakeTextGenerator { fail: textgen_fails }),
        )
    }

    // ============================================================
    // MANUAL NOTES
    // ============================================================

    #[tokio::test]
    async fn test_manual_note_is_persisted_verbatim() {
        let store = Store::new();
        let svc = service(store.clone(), false, false);

        let note = svc
            .ingest(
                "user-1",
                NoteSource::Manual {
                    content: "my own words".to_string(),
                },
                Some("My Note".to_string()),
                vec!["rust".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(note.content, "my own words");
        assert_eq!(note.source_type, SourceType::Manual);
        assert_eq!(note.source_url, None);
        assert_eq!(note.title, "My Note");
        assert_eq!(note.tags, vec!["rust"]);
        assert!(store.notes.get(&note.id, "user-1").is_some());
    }

    #[tokio::test]
    async fn test_manual_note_without_title_gets_default() {
        let store = Store::new();
        let svc = service(store, false, false);

        let note = svc
            .ingest(
                "user-1",
                NoteSource::Manual {
                    content: "text".to_string(),
                },
                None,
                vec![],
            )
            .await
            .unwrap();

        assert_eq!(note.title, "Untitled note");
    }

    // ============================================================
    // EXTRACTED SOURCES
    // ============================================================

    #[tokio::test]
    async fn test_pdf_ingestion_runs_through_generation() {
        let store = Store::new();
        let svc = service(store, false, false);

        let note = svc
            .ingest(
                "user-1",
                NoteSource::Pdf {
                    bytes: vec![1, 2, 3],
                    file_name: "lecture.pdf".to_string(),
                },
                None,
                vec![],
            )
            .await
            .unwrap();

        assert_eq!(note.content, "notes for: extracted pdf text");
        assert_eq!(note.source_type, SourceType::Pdf);
        assert_eq!(note.source_url.as_deref(), Some("lecture.pdf"));
        assert_eq!(note.title, "Notes from lecture.pdf");
    }

    #[tokio::test]
    async fn test_youtube_default_title_uses_video_title() {
        let store = Store::new();
        let svc = service(store, false, false);

        let note = svc
            .ingest(
                "user-1",
                NoteSource::Youtube {
                    url: "https://youtu.be/abc123".to_string(),
                },
                None,
                vec![],
            )
            .await
            .unwrap();

        assert_eq!(note.title, "Notes from Intro to Rust");
        assert_eq!(note.source_url.as_deref(), Some("https://youtu.be/abc123"));
        assert_eq!(note.source_type, SourceType::Youtube);
    }

    #[tokio::test]
    async fn test_url_ingestion_records_provenance() {
        let store = Store::new();
        let svc = service(store, false, false);

        let note = svc
            .ingest(
                "user-1",
                NoteSource::Url {
                    url: "https://example.com/article".to_string(),
                },
                Some("Saved Article".to_string()),
                vec![],
            )
            .await
            .unwrap();

        assert_eq!(note.title, "Saved Article");
        assert_eq!(note.source_url.as_deref(), Some("https://example.com/article"));
    }

    // ============================================================
    // FAILURE ATOMICITY
    // ============================================================

    #[tokio::test]
    async fn test_extraction_failure_persists_nothing() {
        let store = Store::new();
        let svc = service(store.clone(), true, false);

        let result = svc
            .ingest(
                "user-1",
                NoteSource::Pdf {
                    bytes: vec![1],
                    file_name: "bad.pdf".to_string(),
                },
                None,
                vec![],
            )
            .await;

        assert!(result.is_err());
        assert!(store.notes.list("user-1", 0, 10).is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_persists_nothing() {
        let store = Store::new();
        let svc = service(store.clone(), false, true);

        let result = svc
            .ingest(
                "user-1",
                NoteSource::Url {
                    url: "https://example.com".to_string(),
                },
                None,
                vec![],
            )
            .await;

        assert!(result.is_err());
        assert!(store.notes.list("user-1", 0, 10).is_empty());
    }

    // ============================================================
    // VALIDATION HELPERS
    // ============================================================

    #[test]
    fn test_non_manual_note_requires_source_url() {
        let result = Note::new(
            "user-1".to_string(),
            "title".to_string(),
            "content".to_string(),
            SourceType::Youtube,
            None,
            vec![],
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        assert_eq!(
            parse_tags(" rust, async , ,tokio,"),
            vec!["rust", "async", "tokio"]
        );
        assert!(parse_tags("").is_empty());
    }
}
