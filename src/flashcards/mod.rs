//! Flashcards Module
//!
//! Derivation fan-out: one text input becomes a bounded set of persisted
//! flashcards, each optionally illustrated.
//!
//! ## Failure policy
//! - The single generation call failing aborts the whole batch, nothing
//!   persisted.
//! - A per-card image failure degrades that card to a null image and the
//!   batch continues.

pub mod handlers;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
