//! Runtime Configuration
//!
//! Settings are read once from the environment at startup. Missing required
//! variables abort startup with a descriptive error rather than failing on
//! the first request that needs them.

use anyhow::{Context, Result};
use std::net::SocketAddr;

/// Which speech synthesis strategy the server uses. The two strategies are
/// mutually exclusive alternatives, never composed or used as fallback for
/// each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechBackend {
    /// Self-hosted model server, fronted by the owned [`TtsWorker`]
    /// resource. Produces WAV with a measured duration.
    ///
    /// [`TtsWorker`]: crate::capability::speech::TtsWorker
    Local,
    /// Hosted speech API. Produces MP3; duration is estimated from byte
    /// size at a fixed bitrate assumption.
    Hosted,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,

    pub jwt_secret: String,
    pub jwt_access_ttl_minutes: i64,
    pub jwt_refresh_ttl_days: i64,

    pub openai_api_key: String,

    pub s3_bucket: String,
    pub s3_region: String,

    pub speech_backend: SpeechBackend,
    /// HTTP endpoint of the self-hosted TTS model server. Only required
    /// when `speech_backend` is `Local`.
    pub tts_endpoint: Option<String>,
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {}", name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8000".to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        let cors_origins = optional("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let speech_backend = match optional("SPEECH_BACKEND").as_deref() {
            Some("local") => SpeechBackend::Local,
            Some("hosted") | None => SpeechBackend::Hosted,
            Some(other) => {
                anyhow::bail!("SPEECH_BACKEND must be 'local' or 'hosted', got '{}'", other)
            }
        };

        let tts_endpoint = optional("TTS_ENDPOINT");
        if speech_backend == SpeechBackend::Local && tts_endpoint.is_none() {
            anyhow::bail!("TTS_ENDPOINT is required when SPEECH_BACKEND=local");
        }

        Ok(Self {
            bind_addr,
            cors_origins,
            jwt_secret: required("JWT_SECRET")?,
            jwt_access_ttl_minutes: optional("JWT_ACCESS_TOKEN_EXPIRE_MINUTES")
                .map(|v| v.parse())
                .transpose()
                .context("JWT_ACCESS_TOKEN_EXPIRE_MINUTES is not a number")?
                .unwrap_or(30),
            jwt_refresh_ttl_days: optional("JWT_REFRESH_TOKEN_EXPIRE_DAYS")
                .map(|v| v.parse())
                .transpose()
                .context("JWT_REFRESH_TOKEN_EXPIRE_DAYS is not a number")?
                .unwrap_or(7),
            openai_api_key: required("OPENAI_API_KEY")?,
            s3_bucket: required("S3_BUCKET_NAME")?,
            s3_region: required("AWS_REGION")?,
            speech_backend,
            tts_endpoint,
        })
    }
}
