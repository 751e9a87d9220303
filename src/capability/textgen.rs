//! Text Generation Capability
//!
//! Three isolated calls to a hosted chat-completion API: note derivation,
//! flashcard JSON generation, and grounded question answering. Each is one
//! request with no retry; the caller decides what a failure means.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Summarizes raw extracted text into structured study notes.
    async fn generate_notes(&self, text: &str) -> Result<String>;

    /// Requests `count` question/answer pairs as raw JSON. The response is
    /// parsed by the fan-out service, not here.
    async fn generate_flashcards(&self, content: &str, count: u32) -> Result<String>;

    /// Answers a question, optionally grounded in concatenated note
    /// content. `context` is empty when nothing resolved.
    async fn answer_question(&self, question: &str, context: &str) -> Result<String>;
}

pub struct OpenAiTextGenerator {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiTextGenerator {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    async fn chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f64,
        json_mode: bool,
    ) -> Result<String> {
        let mut body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });
        if json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|err| Error::Upstream(format!("completion unreadable: {}", err)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Upstream("completion contained no choices".to_string()))
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn generate_notes(&self, text: &str) -> Result<String> {
        let prompt = format!(
            "Summarize this content and create organized notes.\n\n\
             Content to process:\n{}\n\n\
             Format the notes in a clear structure with:\n\
             - Main topics as headings\n\
             - Key points as bullet points\n\
             - Important definitions highlighted\n\
             - Examples where relevant",
            text
        );

        self.chat(
            "gpt-4",
            "You are an educational assistant that creates well-organized study notes.",
            &prompt,
            2000,
            0.5,
            false,
        )
        .await
    }

    async fn generate_flashcards(&self, content: &str, count: u32) -> Result<String> {
        let prompt = format!(
            "Create {} flashcards based on the following content.\n\
             For each flashcard, provide:\n\
             1. A clear and concise question\n\
             2. A comprehensive but brief answer\n\n\
             Content:\n{}\n\n\
             Format should be a JSON array:\n\
             [{{\"question\": \"Question text here?\", \"answer\": \"Answer text here.\"}}, ...]\n\n\
             Focus on key concepts, definitions, and important facts.",
            count, content
        );

        self.chat(
            "gpt-3.5-turbo",
            "You are an educational assistant that creates effective study flashcards.",
            &prompt,
            1500,
            0.7,
            true,
        )
        .await
    }

    async fn answer_question(&self, question: &str, context: &str) -> Result<String> {
        let prompt = if context.is_empty() {
            format!("Question: {}", question)
        } else {
            format!(
                "Question: {}\n\n\
                 Use the following context to answer the question:\n{}\n\n\
                 If you cannot answer the question based on the provided context, \
                 say so and provide general information if possible.",
                question, context
            )
        };

        self.chat(
            "gpt-4",
            "You are a helpful educational assistant that answers questions clearly and accurately.",
            &prompt,
            1000,
            0.4,
            false,
        )
        .await
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}
