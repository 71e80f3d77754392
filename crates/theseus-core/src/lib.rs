//! Core logic for Theseus: session lifecycle, chat-context assembly, and
//! the trait seams implemented by `theseus-infra`.
//!
//! This crate never performs I/O itself. The session store, model backend,
//! and context extractor are traits; the orchestrator and boot policy are
//! generic over them so every path is testable with in-memory fakes.

pub mod chat;
pub mod context;
pub mod llm;
pub mod session;
