//! Ingestion Pipeline

use std::sync::Arc;

use super::types::{Note, NoteSource, SourceType};
use crate::capability::extractors::SourceExtractor;
use crate::capability::textgen::TextGenerator;
use crate::error::Result;
use crate::store::documents::Store;

pub struct NoteService {
    store: Arc<Store>,
    extractor: Arc<dyn SourceExtractor>,
    textgen: Arc<dyn TextGenerator>,
}

impl NoteService {
    pub fn new(
        store: Arc<Store>,
        extractor: Arc<dyn SourceExtractor>,
        textgen: Arc<dyn TextGenerator>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            extractor,
            textgen,
        })
    }

    /// Turns one declared source into one persisted Note.
    ///
    /// Manual sources persist the caller's text verbatim with no AI step.
    /// Extracted sources run through one note-generation call; if either
    /// extraction or generation fails, nothing is persisted.
    pub async fn ingest(
        &self,
        user_id: &str,
        source: NoteSource,
        title: Option<String>,
        tags: Vec<String>,
    ) -> Result<Note> {
        let (content, source_type, source_url, default_title) = match source {
            NoteSource::Manual { content } => {
                (content, SourceType::Manual, None, "Untitled note".to_string())
            }
            NoteSource::Pdf { bytes, file_name } => {
                let extracted = self.extractor.pdf(&bytes).await?;
                let content = self.textgen.generate_notes(&extracted).await?;
                let default_title = format!("Notes from {}", file_name);
                (content, SourceType::Pdf, Some(file_name), default_title)
            }
            NoteSource::Youtube { url } => {
                let (transcript, video_title) = self.extractor.youtube(&url).await?;
                let content = self.textgen.generate_notes(&transcript).await?;
                let default_title = format!("Notes from {}", video_title);
                (content, SourceType::Youtube, Some(url), default_title)
            }
            NoteSource::Url { url } => {
                let extracted = self.extractor.web_page(&url).await?;
                let content = self.textgen.generate_notes(&extracted).await?;
                let default_title = format!("Notes from {}", url);
                (content, SourceType::Url, Some(url), default_title)
            }
        };

        let title = title.filter(|t| !t.is_empty()).unwrap_or(default_title);
        let note = Note::new(
            user_id.to_string(),
            title,
            content,
            source_type,
            source_url,
            tags,
        )?;

        let note = self.store.notes.insert(note);
        tracing::info!(
            "Ingested note {} for user {} (source {:?})",
            note.id,
            user_id,
            note.source_type
        );
        Ok(note)
    }
}

/// Parses a comma-separated tag string into trimmed, non-empty tags.
/// Multipart forms submit tags this way.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
