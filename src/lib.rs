//! StudySpark Backend Library
//!
//! AI-powered study assistant: users upload content (manual text, PDFs,
//! YouTube links, web URLs), the system derives study notes, flashcards,
//! and podcast-style audio via third-party AI capabilities, and persists
//! everything per-user behind a token-authenticated REST API.
//!
//! ## Architecture Modules
//! - **`auth`**: registration/login, JWT issue/verify, the authenticated
//!   caller extractor, Argon2 password hashing.
//! - **`capability`**: the external AI collaborators — source extractors
//!   (PDF/YouTube/URL to text), text generation, image generation, and the
//!   two speech synthesis strategies.
//! - **`notes`**: the ingestion pipeline (source → extracted text →
//!   generated note → persisted record) plus note CRUD.
//! - **`flashcards`**: the derivation fan-out (content → N cards, per-item
//!   image-failure isolation) plus card CRUD and review events.
//! - **`podcasts`**: chunked speech synthesis, blob upload, podcast CRUD.
//! - **`doubts`**: note-grounded question answering threaded into
//!   conversations.
//! - **`store`**: typed document collections (single-document atomicity)
//!   and blob storage for generated audio.

pub mod auth;
pub mod capability;
pub mod config;
pub mod doubts;
pub mod error;
pub mod flashcards;
pub mod notes;
pub mod podcasts;
pub mod store;
