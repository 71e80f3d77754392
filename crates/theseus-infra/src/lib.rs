//! Infrastructure adapters for Theseus.
//!
//! Concrete implementations of the `theseus-core` trait seams: a JSON
//! directory session store, the Ollama HTTP backend, PDF/image context
//! extraction, the GPU probe, and configuration loading.

pub mod config;
pub mod extract;
pub mod gpu;
pub mod llm;
pub mod paths;
pub mod store;
