//! Image Generation Capability
//!
//! One call to a hosted image model per concept. The fan-out service treats
//! a failure here as "no image" rather than aborting the batch; this module
//! just reports the failure.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};

const IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one illustrative image for a concept and returns its URL.
    async fn generate_for_concept(&self, concept: &str) -> Result<String>;
}

pub struct OpenAiImageGenerator {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiImageGenerator {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate_for_concept(&self, concept: &str) -> Result<String> {
        let prompt = format!(
            "{} as an educational diagram, minimalist, clear, educational illustration",
            concept
        );

        let response = self
            .client
            .post(IMAGES_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": "dall-e-3",
                "prompt": prompt,
                "n": 1,
                "size": "1024x1024",
                "quality": "standard",
                "response_format": "url",
            }))
            .send()
            .await?
            .error_for_status()?;

        let generated: ImageResponse = response
            .json()
            .await
            .map_err(|err| Error::Upstream(format!("image response unreadable: {}", err)))?;

        generated
            .data
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or_else(|| Error::Upstream("image response contained no data".to_string()))
    }
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: String,
}
