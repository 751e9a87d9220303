//! Question Answering & Conversation Threading

use chrono::Utc;
use std::sync::Arc;

use super::types::{AskRequest, AskResponse, Conversation, Message, Role};
use crate::capability::textgen::TextGenerator;
use crate::error::{Error, Result};
use crate::store::documents::Store;

/// New conversations are titled with the question truncated to this many
/// characters (plus an ellipsis when truncation happened).
const TITLE_MAX_CHARS: usize = 50;

pub fn derive_title(question: &str) -> String {
    let truncated: String = question.chars().take(TITLE_MAX_CHARS).collect();
    if question.chars().count() > TITLE_MAX_CHARS {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

pub struct DoubtService {
    store: Arc<Store>,
    textgen: Arc<dyn TextGenerator>,
}

impl DoubtService {
    pub fn new(store: Arc<Store>, textgen: Arc<dyn TextGenerator>) -> Arc<Self> {
        Arc::new(Self { store, textgen })
    }

    /// Answers a question inside a conversation thread.
    ///
    /// Context note ids that resolve (owner-scoped) ground the answer;
    /// missing ones are silently skipped. With a `conversation_id` the
    /// user/assistant pair is appended to that conversation atomically;
    /// without one a new conversation is created.
    pub async fn ask(&self, user_id: &str, req: AskRequest) -> Result<AskResponse> {
        let context = self.resolve_context(user_id, &req.context_ids);
        let answer = self.textgen.answer_question(&req.content, &context).await?;

        let user_message = Message::new(req.content.clone(), Role::User);
        let assistant_message = Message::new(answer, Role::Assistant);

        let conversation = match &req.conversation_id {
            Some(conversation_id) => {
                let pair = [user_message, assistant_message.clone()];
                self.store
                    .conversations
                    .update(conversation_id, user_id, |conversation| {
                        conversation.messages.extend(pair);
                        conversation.updated_at = Utc::now();
                    })
                    .ok_or(Error::NotFound("conversation"))?
            }
            None => self.store.conversations.insert(Conversation::new(
                user_id.to_string(),
                derive_title(&req.content),
                vec![user_message, assistant_message.clone()],
                req.context_ids,
            )),
        };

        Ok(AskResponse {
            conversation,
            message: assistant_message,
        })
    }

    /// Concatenates the bodies of the resolvable context notes, separated
    /// by blank lines. Empty when nothing resolves.
    fn resolve_context(&self, user_id: &str, context_ids: &[String]) -> String {
        let bodies: Vec<String> = context_ids
            .iter()
            .filter_map(|note_id| self.store.notes.get(note_id, user_id))
            .map(|note| note.content)
            .collect();
        bodies.join("\n\n")
    }
}
