//! Data models for the Research Hub backend.
//!
//! Records and request bodies use camelCase JSON keys (`isFavorite`, `createdAt`). The chat
//! payloads keep the snake_case keys of the chat endpoint (`conversation_history`,
//! `research_actions`).

mod chat;
mod citation;
mod file;

pub use chat::*;
pub use citation::*;
pub use file::*;
