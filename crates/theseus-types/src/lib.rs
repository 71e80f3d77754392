//! Shared domain types for Theseus.
//!
//! This crate has no business logic and no I/O. It defines the data shapes
//! exchanged between the core (session lifecycle, chat orchestration), the
//! infrastructure implementations (JSON session store, Ollama backend,
//! context extraction), and the CLI.

pub mod chat;
pub mod config;
pub mod context;
pub mod error;
pub mod gpu;
pub mod llm;
