//! Speech Synthesis Capability
//!
//! Two mutually exclusive strategies produce audio from text; the server
//! picks one at startup and never falls back to the other:
//!
//! - [`TtsWorker`]: fronts a self-hosted model server. The worker is an
//!   explicitly constructed, explicitly shut down resource owned by `main`;
//!   requests are serialized through its channel so the model server never
//!   sees concurrent synthesis calls. Output is WAV and the duration is
//!   measured: total sample count divided by the sample rate.
//! - [`OpenAiSpeech`]: calls a hosted speech API. Output is MP3 and the
//!   provider does not report a duration, so it is **estimated** from the
//!   output byte size at a fixed bitrate assumption. The estimate is
//!   flagged on the result and carried through to API consumers.
//!
//! Text longer than [`CHUNK_THRESHOLD`] characters is split on sentence
//! terminators into chunks each under [`MAX_CHUNK_SIZE`], synthesized
//! independently, and concatenated in order.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Text at or under this length is synthesized in one call.
pub const CHUNK_THRESHOLD: usize = 500;
/// Each chunk stays under this many characters.
pub const MAX_CHUNK_SIZE: usize = 500;

/// Assumed MP3 bitrate for the hosted strategy's duration estimate.
const MP3_BITRATE_BITS_PER_SEC: f64 = 128_000.0;

const OPENAI_SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";

/// The result of one synthesis operation.
pub struct SpeechOutput {
    pub audio: Vec<u8>,
    pub duration_seconds: f64,
    /// True when `duration_seconds` is a byte-size estimate rather than a
    /// measured value.
    pub estimated: bool,
    pub content_type: &'static str,
    pub extension: &'static str,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<SpeechOutput>;
}

/// Splits text into chunks on sentence boundaries (`.`, `!`, `?` are all
/// sentence terminators), keeping each chunk under `max_chunk_size`. A
/// single sentence longer than the limit becomes its own oversized chunk.
pub fn split_into_chunks(text: &str, max_chunk_size: usize) -> Vec<String> {
    let normalized = text.replace(['!', '?'], ".");
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in normalized.split('.') {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        if current.len() + sentence.len() < max_chunk_size {
            current.push_str(sentence);
            current.push_str(". ");
        } else {
            if !current.is_empty() {
                chunks.push(current.trim().to_string());
            }
            current = format!("{}. ", sentence);
        }
    }

    if !current.is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}

fn chunks_for(text: &str) -> Vec<String> {
    if text.len() > CHUNK_THRESHOLD {
        split_into_chunks(text, MAX_CHUNK_SIZE)
    } else {
        vec![text.to_string()]
    }
}

// ============================================================
// WAV HANDLING
// ============================================================

/// Decoded PCM audio from one WAV payload.
pub struct WavAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub data: Vec<u8>,
}

impl WavAudio {
    pub fn duration_seconds(&self) -> f64 {
        let bytes_per_second =
            self.sample_rate as f64 * self.channels as f64 * (self.bits_per_sample / 8) as f64;
        if bytes_per_second == 0.0 {
            return 0.0;
        }
        self.data.len() as f64 / bytes_per_second
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    Some(u16::from_le_bytes(
        bytes.get(offset..offset + 2)?.try_into().ok()?,
    ))
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    Some(u32::from_le_bytes(
        bytes.get(offset..offset + 4)?.try_into().ok()?,
    ))
}

/// Parses a RIFF/WAVE payload: walks the chunk list, pulling the PCM format
/// from `fmt ` and the samples from `data`.
pub fn parse_wav(bytes: &[u8]) -> Result<WavAudio> {
    let malformed = |why: &str| Error::Upstream(format!("malformed WAV payload: {}", why));

    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(malformed("missing RIFF/WAVE header"));
    }

    let mut format: Option<(u32, u16, u16)> = None;
    let mut data: Option<Vec<u8>> = None;
    let mut offset = 12;

    while offset + 8 <= bytes.len() {
        let chunk_id = &bytes[offset..offset + 4];
        let chunk_size = read_u32(bytes, offset + 4).ok_or_else(|| malformed("truncated chunk"))?
            as usize;
        let body_start = offset + 8;
        let body_end = body_start + chunk_size;
        if body_end > bytes.len() {
            return Err(malformed("chunk extends past end of payload"));
        }

        match chunk_id {
            b"fmt " => {
                let channels =
                    read_u16(bytes, body_start + 2).ok_or_else(|| malformed("short fmt chunk"))?;
                let sample_rate =
                    read_u32(bytes, body_start + 4).ok_or_else(|| malformed("short fmt chunk"))?;
                let bits_per_sample =
                    read_u16(bytes, body_start + 14).ok_or_else(|| malformed("short fmt chunk"))?;
                format = Some((sample_rate, channels, bits_per_sample));
            }
            b"data" => {
                data = Some(bytes[body_start..body_end].to_vec());
            }
            _ => {}
        }

        // Chunk bodies are padded to even lengths.
        offset = body_end + (chunk_size & 1);
    }

    let (sample_rate, channels, bits_per_sample) =
        format.ok_or_else(|| malformed("no fmt chunk"))?;
    let data = data.ok_or_else(|| malformed("no data chunk"))?;

    Ok(WavAudio {
        sample_rate,
        channels,
        bits_per_sample,
        data,
    })
}

/// Encodes PCM audio as a single-`data`-chunk WAV file.
pub fn encode_wav(audio: &WavAudio) -> Vec<u8> {
    let byte_rate =
        audio.sample_rate * audio.channels as u32 * (audio.bits_per_sample as u32 / 8);
    let block_align = audio.channels * (audio.bits_per_sample / 8);
    let data_len = audio.data.len() as u32;

    let mut out = Vec::with_capacity(44 + audio.data.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&audio.channels.to_le_bytes());
    out.extend_from_slice(&audio.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&audio.bits_per_sample.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&audio.data);
    out
}

/// Concatenates per-chunk PCM streams in order. All parts must share one
/// format; the model server always answers in a single format, so a
/// mismatch means something upstream went wrong.
pub fn concat_wav(parts: Vec<WavAudio>) -> Result<WavAudio> {
    let mut iter = parts.into_iter();
    let mut combined = iter
        .next()
        .ok_or_else(|| Error::Upstream("no audio chunks to combine".to_string()))?;

    for part in iter {
        if part.sample_rate != combined.sample_rate
            || part.channels != combined.channels
            || part.bits_per_sample != combined.bits_per_sample
        {
            return Err(Error::Upstream(
                "audio chunks disagree on PCM format".to_string(),
            ));
        }
        combined.data.extend_from_slice(&part.data);
    }

    Ok(combined)
}

// ============================================================
// SELF-HOSTED STRATEGY
// ============================================================

struct WorkerRequest {
    text: String,
    voice_id: String,
    reply: oneshot::Sender<Result<Vec<u8>>>,
}

/// The owned worker resource fronting the self-hosted model server.
///
/// Constructed once at startup with [`TtsWorker::start`] and torn down with
/// [`TtsWorker::shutdown`]. All synthesis requests flow through one channel,
/// serializing access to the model server.
pub struct TtsWorker {
    tx: mpsc::Sender<WorkerRequest>,
    stop: watch::Sender<bool>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl TtsWorker {
    pub fn start(endpoint: String, client: reqwest::Client) -> Arc<Self> {
        let (tx, mut rx) = mpsc::channel::<WorkerRequest>(32);
        let (stop, mut stopped) = watch::channel(false);

        let join = tokio::spawn(async move {
            tracing::info!("TTS worker started (model server at {})", endpoint);
            loop {
                tokio::select! {
                    request = rx.recv() => {
                        let Some(request) = request else { break };
                        let result =
                            synthesize_chunk(&client, &endpoint, &request.text, &request.voice_id)
                                .await;
                        if let Err(err) = &result {
                            tracing::error!("TTS synthesis failed: {}", err);
                        }
                        let _ = request.reply.send(result);
                    }
                    _ = stopped.changed() => break,
                }
            }
            tracing::info!("TTS worker stopped");
        });

        Arc::new(Self {
            tx,
            stop,
            join: Mutex::new(Some(join)),
        })
    }

    /// Stops the worker loop and waits for it to finish. Requests submitted
    /// after shutdown fail as upstream errors.
    pub async fn shutdown(&self) {
        let _ = self.stop.send(true);
        if let Some(join) = self.join.lock().await.take() {
            let _ = join.await;
        }
    }

    async fn request(&self, text: String, voice_id: String) -> Result<Vec<u8>> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(WorkerRequest {
                text,
                voice_id,
                reply,
            })
            .await
            .map_err(|_| Error::Upstream("TTS worker is not running".to_string()))?;

        response
            .await
            .map_err(|_| Error::Upstream("TTS worker dropped the request".to_string()))?
    }
}

async fn synthesize_chunk(
    client: &reqwest::Client,
    endpoint: &str,
    text: &str,
    voice_id: &str,
) -> Result<Vec<u8>> {
    let response = client
        .post(endpoint)
        .json(&json!({ "text": text, "voice": voice_id }))
        .send()
        .await?
        .error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

#[async_trait]
impl SpeechSynthesizer for TtsWorker {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<SpeechOutput> {
        let mut parts = Vec::new();
        for chunk in chunks_for(text) {
            let bytes = self.request(chunk, voice_id.to_string()).await?;
            parts.push(parse_wav(&bytes)?);
        }

        let combined = concat_wav(parts)?;
        let duration_seconds = combined.duration_seconds();

        Ok(SpeechOutput {
            audio: encode_wav(&combined),
            duration_seconds,
            estimated: false,
            content_type: "audio/wav",
            extension: ".wav",
        })
    }
}

// ============================================================
// HOSTED STRATEGY
// ============================================================

pub struct OpenAiSpeech {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiSpeech {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn map_voice(voice_id: &str) -> &'static str {
        match voice_id {
            "male1" => "onyx",
            "female1" => "nova",
            "neutral1" => "shimmer",
            _ => "alloy",
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<SpeechOutput> {
        let voice = Self::map_voice(voice_id);
        let mut audio = Vec::new();

        // MP3 frames concatenate cleanly, so chunks append byte-for-byte.
        for chunk in chunks_for(text) {
            let response = self
                .client
                .post(OPENAI_SPEECH_URL)
                .bearer_auth(&self.api_key)
                .json(&json!({ "model": "tts-1", "input": chunk, "voice": voice }))
                .send()
                .await?
                .error_for_status()?;
            audio.extend_from_slice(&response.bytes().await?);
        }

        // The provider does not report a duration; estimate from size at
        // the assumed bitrate. This is an approximation, flagged as such.
        let duration_seconds = audio.len() as f64 * 8.0 / MP3_BITRATE_BITS_PER_SEC;

        Ok(SpeechOutput {
            audio,
            duration_seconds,
            estimated: true,
            content_type: "audio/mpeg",
            extension: ".mp3",
        })
    }
}
