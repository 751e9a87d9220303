//! External Capabilities
//!
//! Every AI or extraction step in the system is one call to an external,
//! black-box capability. Each capability is a trait seam so pipelines can be
//! exercised against fakes in tests:
//!
//! - **`extractors`**: source payload (PDF bytes, YouTube URL, web URL) →
//!   plain text. Three independent extractors, no shared state.
//! - **`textgen`**: text → study notes, flashcard JSON, or a grounded answer.
//! - **`imagegen`**: concept text → illustrative image URL.
//! - **`speech`**: text → synthesized audio. Two mutually exclusive
//!   strategies (self-hosted worker vs. hosted API), never composed.
//!
//! Failures here are [`Error::Upstream`] and are never retried.
//!
//! [`Error::Upstream`]: crate::error::Error::Upstream

pub mod extractors;
pub mod imagegen;
pub mod speech;
pub mod textgen;
