//! Doubt-Clarification Data Types
//!
//! A `Conversation` threads question/answer exchanges. Messages always come
//! in pairs: each user question is appended atomically together with its
//! assistant answer in a single document write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::documents::{Document, new_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(content: String, role: Role) -> Self {
        Self {
            content,
            role,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub messages: Vec<Message>,
    /// Note ids whose content grounded the answers in this thread.
    pub context_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(
        user_id: String,
        title: String,
        messages: Vec<Message>,
        context_ids: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id,
            title,
            messages,
            context_ids,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Conversation {
    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Conversations list by recency of activity, not creation.
    fn sort_timestamp(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// The question text.
    pub content: String,
    /// When present, the pair is appended to this conversation; otherwise a
    /// new conversation is started.
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub context_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub conversation: Conversation,
    pub message: Message,
}
