//! Podcast Generation

use std::sync::Arc;

use super::types::{Podcast, PodcastCreate, VoiceInfo};
use crate::capability::speech::SpeechSynthesizer;
use crate::error::{Error, Result};
use crate::store::blobs::BlobStore;
use crate::store::documents::Store;

const AUDIO_FOLDER: &str = "podcasts";

pub struct PodcastService {
    store: Arc<Store>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    blobs: Arc<dyn BlobStore>,
}

impl PodcastService {
    pub fn new(
        store: Arc<Store>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        blobs: Arc<dyn BlobStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            synthesizer,
            blobs,
        })
    }

    /// Synthesizes audio for the content, uploads it, and persists the
    /// Podcast record. Duration comes from the synthesis strategy — either
    /// measured from the samples or flagged as a byte-size estimate.
    pub async fn generate(&self, user_id: &str, req: PodcastCreate) -> Result<Podcast> {
        let output = self
            .synthesizer
            .synthesize(&req.content, &req.voice_id)
            .await?;

        let audio_url = self
            .blobs
            .upload(
                AUDIO_FOLDER,
                output.extension,
                output.audio,
                output.content_type,
            )
            .await?;

        let podcast = Podcast::new(
            user_id.to_string(),
            req.title,
            req.content,
            audio_url,
            output.duration_seconds,
            output.estimated,
            req.voice_id,
            req.tags,
        )?;

        let podcast = self.store.podcasts.insert(podcast);
        tracing::info!(
            "Generated podcast {} for user {} ({:.1}s{})",
            podcast.id,
            user_id,
            podcast.duration_seconds,
            if podcast.duration_estimated {
                ", estimated"
            } else {
                ""
            }
        );
        Ok(podcast)
    }

    /// Hard-deletes the record and releases its audio blob. A failed blob
    /// release is logged but does not fail the request; the record is
    /// already gone.
    pub async fn delete(&self, podcast_id: &str, user_id: &str) -> Result<()> {
        let podcast = self
            .store
            .podcasts
            .delete(podcast_id, user_id)
            .ok_or(Error::NotFound("podcast"))?;

        if let Err(err) = self.blobs.delete(&podcast.audio_url).await {
            tracing::warn!(
                "failed to release audio blob for podcast {}: {}",
                podcast.id,
                err
            );
        }

        Ok(())
    }
}

/// The fixed set of selectable voices. The local strategy passes ids
/// through to the model server; the hosted strategy maps them to its own
/// voice names.
pub fn available_voices() -> Vec<VoiceInfo> {
    vec![
        VoiceInfo {
            id: "default",
            name: "Default",
            gender: "neutral",
            preview_url: None,
        },
        VoiceInfo {
            id: "male1",
            name: "Male Voice 1",
            gender: "male",
            preview_url: None,
        },
        VoiceInfo {
            id: "female1",
            name: "Female Voice 1",
            gender: "female",
            preview_url: None,
        },
        VoiceInfo {
            id: "neutral1",
            name: "Neutral Voice",
            gender: "neutral",
            preview_url: None,
        },
    ]
}
