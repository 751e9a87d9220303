//! Typed Document Collections
//!
//! A [`Collection<T>`] stores one entity kind keyed by its generated id.
//! Every entity is owned by exactly one user; ownership is an equality check
//! between the record's `user_id` and the authenticated caller, enforced at
//! the collection boundary so a non-owner lookup is indistinguishable from
//! an absent record.
//!
//! Backed by `DashMap`: per-key locking gives each record single-document
//! atomicity, which is the only consistency guarantee the system offers.

use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::auth::types::User;
use crate::doubts::types::Conversation;
use crate::flashcards::types::Flashcard;
use crate::notes::types::Note;
use crate::podcasts::types::Podcast;

/// Implemented by every persisted entity kind.
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn user_id(&self) -> &str;
    /// Timestamp used for newest-first listing. Defaults to creation time;
    /// conversations override this with their last-update time.
    fn sort_timestamp(&self) -> chrono::DateTime<chrono::Utc>;
}

pub struct Collection<T: Document> {
    records: DashMap<String, T>,
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl<T: Document> Collection<T> {
    /// Persists a new record and returns it as stored.
    pub fn insert(&self, doc: T) -> T {
        self.records.insert(doc.id().to_string(), doc.clone());
        doc
    }

    /// Owner-scoped lookup. Returns `None` both when the record is absent
    /// and when it belongs to another user.
    pub fn get(&self, id: &str, user_id: &str) -> Option<T> {
        self.records
            .get(id)
            .filter(|doc| doc.user_id() == user_id)
            .map(|doc| doc.clone())
    }

    /// Owner-scoped atomic update. The mutation runs while the record's
    /// shard lock is held, so concurrent updates to the same record are
    /// serialized.
    pub fn update<F>(&self, id: &str, user_id: &str, mutate: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut entry = self.records.get_mut(id)?;
        if entry.user_id() != user_id {
            return None;
        }
        mutate(entry.value_mut());
        Some(entry.clone())
    }

    /// Owner-scoped hard delete. Returns the removed record.
    pub fn delete(&self, id: &str, user_id: &str) -> Option<T> {
        // Two-step check-then-remove is safe: ids are never reused, so the
        // record cannot change owners between the check and the removal.
        if self.get(id, user_id).is_none() {
            return None;
        }
        self.records.remove(id).map(|(_, doc)| doc)
    }

    /// All records owned by `user_id`, newest first, paginated.
    pub fn list(&self, user_id: &str, skip: usize, limit: usize) -> Vec<T> {
        let mut docs: Vec<T> = self
            .records
            .iter()
            .filter(|doc| doc.user_id() == user_id)
            .map(|doc| doc.clone())
            .collect();
        docs.sort_by(|a, b| b.sort_timestamp().cmp(&a.sort_timestamp()));
        docs.into_iter().skip(skip).take(limit).collect()
    }

    /// First record matching a predicate, regardless of owner. Used for
    /// email lookups during registration and login.
    pub fn find_one<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .iter()
            .find(|doc| predicate(doc))
            .map(|doc| doc.clone())
    }
}

impl Collection<Flashcard> {
    /// Distinct deck names across a user's flashcards, sorted.
    pub fn deck_names(&self, user_id: &str) -> Vec<String> {
        let decks: BTreeSet<String> = self
            .records
            .iter()
            .filter(|card| card.user_id() == user_id)
            .map(|card| card.deck_name.clone())
            .collect();
        decks.into_iter().collect()
    }

    /// A user's flashcards in one deck, newest first, paginated. The deck
    /// filter applies before pagination, so a page is always drawn from the
    /// full matching set.
    pub fn list_in_deck(
        &self,
        user_id: &str,
        deck: &str,
        skip: usize,
        limit: usize,
    ) -> Vec<Flashcard> {
        let mut cards: Vec<Flashcard> = self
            .records
            .iter()
            .filter(|card| card.user_id() == user_id && card.deck_name == deck)
            .map(|card| card.clone())
            .collect();
        cards.sort_by(|a, b| b.sort_timestamp().cmp(&a.sort_timestamp()));
        cards.into_iter().skip(skip).take(limit).collect()
    }
}

/// The document store: one collection per entity kind.
#[derive(Default)]
pub struct Store {
    pub users: Collection<User>,
    pub notes: Collection<Note>,
    pub flashcards: Collection<Flashcard>,
    pub podcasts: Collection<Podcast>,
    pub conversations: Collection<Conversation>,
}

impl Store {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// Generates a store identity for a new record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
