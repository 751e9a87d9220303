//! Podcasts Module Tests
//!
//! Exercises the generate/delete lifecycle against a fake synthesizer and
//! an in-memory blob store: upload failure persists no record, delete
//! releases the blob, and the duration provenance flag is carried through.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::capability::speech::{SpeechOutput, SpeechSynthesizer};
    use crate::error::{Error, Result};
    use crate::podcasts::service::{available_voices, PodcastService};
    use crate::podcasts::types::{Podcast, PodcastCreate};
    use crate::store::blobs::BlobStore;
    use crate::store::documents::Store;

    struct FakeSynthesizer {
        duration: f64,
        estimated: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeSynthesizer {
        async fn synthesize(&self, _text: &str, _voice_id: &str) -> Result<SpeechOutput> {
            Ok(SpeechOutput {
                audio: vec![0u8; 64],
                duration_seconds: self.duration,
                estimated: self.estimated,
                content_type: "audio/wav",
                extension: ".wav",
            })
        }
    }

    #[derive(Default)]
    struct FakeBlobStore {
        fail_upload: bool,
        uploads: Mutex<Vec<String>>,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BlobStore for FakeBlobStore {
        async fn upload(
            &self,
            folder: &str,
            extension: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String> {
            if self.fail_upload {
                return Err(Error::Upstream("bucket unavailable".to_string()));
            }
            let url = format!("https://blobs.example.com/{}/object{}", folder, extension);
            self.uploads.lock().unwrap().push(url.clone());
            Ok(url)
        }

        async fn delete(&self, url: &str) -> Result<()> {
            self.deleted.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    /// Always fails, for exercising the warn-and-continue delete path.
    struct BrokenBlobStore {
        delete_attempted: AtomicBool,
    }

    #[async_trait]
    impl BlobStore for BrokenBlobStore {
        async fn upload(
            &self,
            folder: &str,
            extension: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String> {
            Ok(format!("https://blobs.example.com/{}/object{}", folder, extension))
        }

        async fn delete(&self, _url: &str) -> Result<()> {
            self.delete_attempted.store(true, Ordering::SeqCst);
            Err(Error::Upstream("bucket unavailable".to_string()))
        }
    }

    fn request() -> PodcastCreate {
        PodcastCreate {
            title: "Episode 1".to_string(),
            content: "Some study notes to narrate.".to_string(),
            voice_id: "female1".to_string(),
            tags: vec!["bio".to_string()],
        }
    }

    // ============================================================
    // GENERATION
    // ============================================================

    #[tokio::test]
    async fn test_generate_persists_record_with_blob_url() {
        let store = Store::new();
        let blobs = Arc::new(FakeBlobStore::default());
        let svc = PodcastService::new(
            store.clone(),
            Arc::new(FakeSynthesizer {
                duration: 12.5,
                estimated: false,
            }),
            blobs.clone(),
        );

        let podcast = svc.generate("user-1", request()).await.unwrap();

        assert_eq!(podcast.audio_url, "https://blobs.example.com/podcasts/object.wav");
        assert!((podcast.duration_seconds - 12.5).abs() < 1e-9);
        assert!(!podcast.duration_estimated);
        assert_eq!(podcast.voice_id, "female1");
        assert!(store.podcasts.get(&podcast.id, "user-1").is_some());
        assert_eq!(blobs.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_carries_estimate_flag() {
        let store = Store::new();
        let svc = PodcastService::new(
            store,
            Arc::new(FakeSynthesizer {
                duration: 30.0,
                estimated: true,
            }),
            Arc::new(FakeBlobStore::default()),
        );

        let podcast = svc.generate("user-1", request()).await.unwrap();
        assert!(podcast.duration_estimated);
    }

    #[tokio::test]
    async fn test_upload_failure_persists_nothing() {
        let store = Store::new();
        let svc = PodcastService::new(
            store.clone(),
            Arc::new(FakeSynthesizer {
                duration: 1.0,
                estimated: false,
            }),
            Arc::new(FakeBlobStore {
                fail_upload: true,
                ..Default::default()
            }),
        );

        assert!(svc.generate("user-1", request()).await.is_err());
        assert!(store.podcasts.list("user-1", 0, 10).is_empty());
    }

    // ============================================================
    // DELETION
    // ============================================================

    #[tokio::test]
    async fn test_delete_removes_record_and_releases_blob() {
        let store = Store::new();
        let blobs = Arc::new(FakeBlobStore::default());
        let svc = PodcastService::new(
            store.clone(),
            Arc::new(FakeSynthesizer {
                duration: 1.0,
                estimated: false,
            }),
            blobs.clone(),
        );

        let podcast = svc.generate("user-1", request()).await.unwrap();
        svc.delete(&podcast.id, "user-1").await.unwrap();

        assert!(store.podcasts.get(&podcast.id, "user-1").is_none());
        assert_eq!(
            blobs.deleted.lock().unwrap().as_slice(),
            &[podcast.audio_url]
        );
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_not_found() {
        let store = Store::new();
        let blobs = Arc::new(FakeBlobStore::default());
        let svc = PodcastService::new(
            store,
            Arc::new(FakeSynthesizer {
                duration: 1.0,
                estimated: false,
            }),
            blobs.clone(),
        );

        let podcast = svc.generate("user-1", request()).await.unwrap();

        assert!(matches!(
            svc.delete(&podcast.id, "user-2").await,
            Err(Error::NotFound(_))
        ));
        // The blob is untouched when the record was not removed.
        assert!(blobs.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blob_release_failure_does_not_fail_delete() {
        let store = Store::new();
        let blobs = Arc::new(BrokenBlobStore {
            delete_attempted: AtomicBool::new(false),
        });
        let svc = PodcastService::new(
            store.clone(),
            Arc::new(FakeSynthesizer {
                duration: 1.0,
                estimated: false,
            }),
            blobs.clone(),
        );

        let podcast = svc.generate("user-1", request()).await.unwrap();
        svc.delete(&podcast.id, "user-1").await.unwrap();

        assert!(blobs.delete_attempted.load(Ordering::SeqCst));
        assert!(store.podcasts.get(&podcast.id, "user-1").is_none());
    }

    // ============================================================
    // VALIDATION AND VOICES
    // ============================================================

    #[test]
    fn test_podcast_rejects_bad_durations() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let result = Podcast::new(
                "user-1".to_string(),
                "t".to_string(),
                "c".to_string(),
                "https://example.com/a.wav".to_string(),
                bad,
                false,
                "default".to_string(),
                vec![],
            );
            assert!(matches!(result, Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_voice_catalog_is_fixed() {
        let voices = available_voices();
        assert_eq!(voices.len(), 4);
        assert!(voices.iter().any(|v| v.id == "default"));
    }
}
