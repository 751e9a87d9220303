//! Store Module Tests
//!
//! Validates the document collection contract.
//!
//! ## Test Scopes
//! - **Ownership**: every access path is scoped to the owning user; a
//!   non-owner lookup is indistinguishable from an absent record.
//! - **Collection mechanics**: insert/get/update/delete, newest-first
//!   listing with pagination, predicate lookup.
//!
//! *Note: the S3 blob store is network-dependent and exercised through
//! fakes in the podcasts module tests.*

#[cfg(test)]
mod tests {
    use crate::auth::types::User;
    use crate::flashcards::types::Flashcard;
    use crate::notes::types::{Note, SourceType};
    use crate::store::documents::Store;

    fn manual_note(user_id: &str, title: &str) -> Note {
        Note::new(
            user_id.to_string(),
            title.to_string(),
            "content".to_string(),
            SourceType::Manual,
            None,
            vec![],
        )
        .unwrap()
    }

    // ============================================================
    // OWNERSHIP ISOLATION
    // ============================================================

    #[test]
    fn test_get_is_owner_scoped() {
        let store = Store::new();
        let note = store.notes.insert(manual_note("user-1", "Mine"));

        assert!(store.notes.get(&note.id, "user-1").is_some());
        // The record exists, but another user cannot see it.
        assert!(store.notes.get(&note.id, "user-2").is_none());
    }

    #[test]
    fn test_update_is_owner_scoped() {
        let store = Store::new();
        let note = store.notes.insert(manual_note("user-1", "Mine"));

        let result = store.notes.update(&note.id, "user-2", |n| {
            n.title = "hijacked".to_string();
        });
        assert!(result.is_none());

        // Unchanged for the owner.
        let unchanged = store.notes.get(&note.id, "user-1").unwrap();
        assert_eq!(unchanged.title, "Mine");
    }

    #[test]
    fn test_delete_is_owner_scoped() {
        let store = Store::new();
        let note = store.notes.insert(manual_note("user-1", "Mine"));

        assert!(store.notes.delete(&note.id, "user-2").is_none());
        assert!(store.notes.get(&note.id, "user-1").is_some());

        assert!(store.notes.delete(&note.id, "user-1").is_some());
        assert!(store.notes.get(&note.id, "user-1").is_none());
    }

    // ============================================================
    // COLLECTION MECHANICS
    // ============================================================

    #[test]
    fn test_update_applies_mutation_atomically() {
        let store = Store::new();
        let note = store.notes.insert(manual_note("user-1", "Before"));

        let updated = store
            .notes
            .update(&note.id, "user-1", |n| n.title = "After".to_string())
            .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(store.notes.get(&note.id, "user-1").unwrap().title, "After");
    }

    #[test]
    fn test_list_is_newest_first_and_paginated() {
        let store = Store::new();
        for i in 0..5 {
            store.notes.insert(manual_note("user-1", &format!("note-{}", i)));
            // Distinct creation timestamps so ordering is deterministic.
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        store.notes.insert(manual_note("user-2", "other"));

        let all = store.notes.list("user-1", 0, 10);
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].title, "note-4");
        assert_eq!(all[4].title, "note-0");

        let page = store.notes.list("user-1", 1, 2);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "note-3");
        assert_eq!(page[1].title, "note-2");
    }

    #[test]
    fn test_find_one_by_email() {
        let store = Store::new();
        store
            .users
            .insert(User::new("Ada".into(), "ada@example.com".into(), "hash".into()));

        assert!(store
            .users
            .find_one(|u| u.email == "ada@example.com")
            .is_some());
        assert!(store
            .users
            .find_one(|u| u.email == "nobody@example.com")
            .is_none());
    }

    #[test]
    fn test_deck_names_are_distinct_and_sorted() {
        let store = Store::new();
        for deck in ["Physics", "Default", "Physics", "Biology"] {
            store.flashcards.insert(Flashcard::new(
                "user-1".to_string(),
                "q".to_string(),
                "a".to_string(),
                None,
                deck.to_string(),
                vec![],
            ));
        }
        store.flashcards.insert(Flashcard::new(
            "user-2".to_string(),
            "q".to_string(),
            "a".to_string(),
            None,
            "Chemistry".to_string(),
            vec![],
        ));

        let decks = store.flashcards.deck_names("user-1");
        assert_eq!(decks, vec!["Biology", "Default", "Physics"]);
    }

    #[test]
    fn test_list_in_deck_filters_before_pagination() {
        let store = Store::new();
        let card = |deck: &str, question: &str| {
            Flashcard::new(
                "user-1".to_string(),
                question.to_string(),
                "a".to_string(),
                None,
                deck.to_string(),
                vec![],
            )
        };

        // Three "History" cards first, then newer cards that fill up the
        // top of the overall newest-first ordering.
        for question in ["H0", "H1", "H2"] {
            store.flashcards.insert(card("History", question));
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        for i in 0..5 {
            store.flashcards.insert(card("Biology", &format!("B{}", i)));
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        // A plain listing capped at 5 would contain only Biology cards;
        // the deck listing must still find the History ones.
        let page = store.flashcards.list_in_deck("user-1", "History", 0, 2);
        let questions: Vec<&str> = page.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["H2", "H1"]);

        let rest = store.flashcards.list_in_deck("user-1", "History", 2, 2);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].question, "H0");

        assert!(store
            .flashcards
            .list_in_deck("user-1", "Chemistry", 0, 10)
            .is_empty());
    }
}
