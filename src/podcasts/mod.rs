//! Podcasts Module
//!
//! Text content becomes a durable audio artifact with a known duration:
//! synthesis (chunked for long text) → blob upload → persisted Podcast
//! record. An upload failure aborts the whole operation; no Podcast is
//! persisted without its audio.

pub mod handlers;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
