//! Doubt Clarification Module
//!
//! Question answering, optionally grounded in the caller's notes, threaded
//! into conversations. Each question and its answer are appended to the
//! conversation as one atomic pair.

pub mod handlers;
pub mod service;
pub mod types;
