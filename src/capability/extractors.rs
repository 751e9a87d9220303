//! Source Extractors
//!
//! Turn one declared source payload into plain text:
//!
//! - **PDF**: parses the document and returns the concatenated page text
//!   (pages separated by blank lines). An unparseable payload is an
//!   upstream failure, surfaced to the caller and never retried.
//! - **YouTube**: derives the video id from the URL, fetches the caption
//!   track as an ordered sequence of fragments (joined with single spaces),
//!   and fetches the human-readable title via the oEmbed endpoint.
//! - **Web URL**: fetches the page, strips markup tags by pattern
//!   substitution, and collapses whitespace runs. The only call in the
//!   system with an explicit per-call timeout.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{Error, Result};

const WEB_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait SourceExtractor: Send + Sync {
    async fn pdf(&self, bytes: &[u8]) -> Result<String>;

    /// Returns `(transcript, video_title)`.
    async fn youtube(&self, url: &str) -> Result<(String, String)>;

    async fn web_page(&self, url: &str) -> Result<String>;
}

/// Derives the stable video identifier from the two known URL shapes:
/// `.../watch?v=ID` (substring between `v=` and the next `&` or end) and
/// the short link `youtu.be/ID` (path segment after the last `/`, before
/// any `?`). Anything else fails validation.
pub fn parse_youtube_video_id(url: &str) -> Result<String> {
    static VIDEO_ID_PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"v=([^&]+)").unwrap());

    if url.contains("youtube.com/watch") {
        if let Some(caps) = VIDEO_ID_PATTERN.captures(url) {
            return Ok(caps[1].to_string());
        }
    } else if url.contains("youtu.be") {
        let segment = url
            .rsplit('/')
            .next()
            .and_then(|last| last.split('?').next())
            .unwrap_or("");
        if !segment.is_empty() {
            return Ok(segment.to_string());
        }
    }

    Err(Error::Validation(format!(
        "could not extract a YouTube video id from '{}'",
        url
    )))
}

/// Production extractor backed by HTTP fetches and the PDF parser.
pub struct HttpExtractor {
    client: reqwest::Client,
    tag_pattern: Regex,
    whitespace_pattern: Regex,
}

impl HttpExtractor {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            tag_pattern: Regex::new(r"(?s)<.*?>").unwrap(),
            whitespace_pattern: Regex::new(r"\s+").unwrap(),
        }
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        let url = format!(
            "https://www.youtube.com/api/timedtext?lang=en&v={}&fmt=json3",
            video_id
        );
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let track: CaptionTrack = response
            .json()
            .await
            .map_err(|err| Error::Upstream(format!("caption track unreadable: {}", err)))?;

        let fragments: Vec<String> = track
            .events
            .into_iter()
            .flat_map(|event| event.segs)
            .map(|seg| seg.utf8.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();

        if fragments.is_empty() {
            return Err(Error::Upstream(format!(
                "no caption fragments for video {}",
                video_id
            )));
        }

        Ok(fragments.join(" "))
    }

    async fn fetch_title(&self, video_url: &str) -> Result<String> {
        let url = format!(
            "https://www.youtube.com/oembed?url={}&format=json",
            video_url
        );
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let meta: OembedResponse = response
            .json()
            .await
            .map_err(|err| Error::Upstream(format!("oEmbed response unreadable: {}", err)))?;
        Ok(meta.title)
    }
}

#[async_trait]
impl SourceExtractor for HttpExtractor {
    async fn pdf(&self, bytes: &[u8]) -> Result<String> {
        // CPU-bound parse; documents are request-sized, so run inline.
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|err| Error::Upstream(format!("PDF extraction failed: {}", err)))
    }

    async fn youtube(&self, url: &str) -> Result<(String, String)> {
        let video_id = parse_youtube_video_id(url)?;
        let transcript = self.fetch_transcript(&video_id).await?;
        let title = self.fetch_title(url).await?;
        Ok((transcript, title))
    }

    async fn web_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(WEB_FETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;

        let stripped = self.tag_pattern.replace_all(&html, " ");
        let collapsed = self.whitespace_pattern.replace_all(&stripped, " ");
        Ok(collapsed.trim().to_string())
    }
}

// Shape of YouTube's json3 caption format: an ordered event list, each
// event carrying text segments.
#[derive(Deserialize)]
struct CaptionTrack {
    #[serde(default)]
    events: Vec<CaptionEvent>,
}

#[derive(Deserialize)]
struct CaptionEvent {
    #[serde(default)]
    segs: Vec<CaptionSegment>,
}

#[derive(Deserialize)]
struct CaptionSegment {
    #[serde(default)]
    utf8: String,
}

#[derive(Deserialize)]
struct OembedResponse {
    title: String,
}
