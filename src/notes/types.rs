//! Note Data Types
//!
//! The persisted `Note` entity, the ingestion source descriptor, and the
//! request DTOs for the notes endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::documents::{Document, new_id};

/// Where a note's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Manual,
    Pdf,
    Youtube,
    Url,
}

/// A study note derived from one ingested source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub source_type: SourceType,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Constructs a note, enforcing that every non-manual source carries a
    /// provenance reference.
    pub fn new(
        user_id: String,
        title: String,
        content: String,
        source_type: SourceType,
        source_url: Option<String>,
        tags: Vec<String>,
    ) -> Result<Self> {
        if source_type != SourceType::Manual && source_url.is_none() {
            return Err(Error::Validation(
                "source_url is required for non-manual notes".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: new_id(),
            user_id,
            title,
            content,
            source_type,
            source_url,
            tags,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Document for Note {
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

/// One declared ingestion source: the payload plus enough metadata to pick
/// the extractor and derive defaults.
pub enum NoteSource {
    Manual { content: String },
    Pdf { bytes: Vec<u8>, file_name: String },
    Youtube { url: String },
    Url { url: String },
}

fn default_tags() -> Vec<String> {
    Vec::new()
}

#[derive(Debug, Deserialize)]
pub struct NoteCreate {
    pub title: String,
    pub content: String,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct NoteFromYoutube {
    pub youtube_url: String,
    pub title: Option<String>,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteFromUrl {
    pub url: String,
    pub title: Option<String>,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}
