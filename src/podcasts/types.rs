//! Podcast Data Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::documents::{Document, new_id};

/// A synthesized audio artifact derived from text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Podcast {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// The source text the audio was synthesized from.
    pub content: String,
    pub audio_url: String,
    /// Derived from the generated audio, never user-supplied.
    pub duration_seconds: f64,
    /// True when the duration was estimated from output byte size at a
    /// fixed bitrate assumption (hosted synthesis strategy) rather than
    /// measured from the samples.
    pub duration_estimated: bool,
    pub voice_id: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Podcast {
    pub fn new(
        user_id: String,
        title: String,
        content: String,
        audio_url: String,
        duration_seconds: f64,
        duration_estimated: bool,
        voice_id: String,
        tags: Vec<String>,
    ) -> Result<Self> {
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(Error::Validation(format!(
                "duration must be a non-negative number, got {}",
                duration_seconds
            )));
        }

        Ok(Self {
            id: new_id(),
            user_id,
            title,
            content,
            audio_url,
            duration_seconds,
            duration_estimated,
            voice_id,
            tags,
            created_at: Utc::now(),
        })
    }
}

impl Document for Podcast {
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

fn default_voice() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PodcastCreate {
    pub title: String,
    pub content: String,
    #[serde(default = "default_voice")]
    pub voice_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One selectable synthesis voice.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: &'static str,
    pub preview_url: Option<String>,
}
