//! Persistence Layer
//!
//! Two collaborators live here:
//!
//! - **`documents`**: typed, per-entity document collections. Each collection
//!   guarantees single-document atomicity (concurrent updates to one record
//!   are serialized; last write wins across requests). There are no
//!   transactions spanning multiple records.
//! - **`blobs`**: binary payload storage for generated audio, behind the
//!   [`BlobStore`] trait. Keys follow `{folder}/{uuid}{extension}` and
//!   public URLs follow a deterministic bucket/region/key template.
//!
//! [`BlobStore`]: blobs::BlobStore

pub mod blobs;
pub mod documents;

#[cfg(test)]
mod tests;
