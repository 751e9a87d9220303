//! Notes Module
//!
//! The ingestion pipeline: one declared source becomes one persisted Note.
//!
//! ## Workflow
//! 1. **Extract**: the declared source type picks the extractor (PDF parse,
//!    YouTube transcript fetch, web page fetch); manual sources skip this.
//! 2. **Generate**: extracted text goes through one note-generation call
//!    that structures it into headings, bullets, and definitions.
//! 3. **Persist**: the resulting Note is written with its provenance
//!    (`source_type`, `source_url`) and returned.
//!
//! Any extraction or generation failure aborts before persistence: the
//! operation is all-or-nothing at the granularity of one Note.

pub mod handlers;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
